use std::env;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

use rentdesk_cli::commands::{config, doctor, extend, list, migrate, rates, seed, status, submit};
use rentdesk_core::admin::AdminAction;
use rentdesk_core::config::LoadOptions;
use rentdesk_core::rental::request::ReservationRequest;

#[test]
fn migrate_returns_success_with_file_database() {
    with_temp_database(|options| {
        let result = migrate::run(options);
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("RENTDESK_DATABASE_URL", "postgres://localhost/rentals")], || {
        let result = migrate::run(&LoadOptions::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_temp_database(|options| {
        let first = seed::run(options);
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_message = message(&first.output);
        assert!(first_message.starts_with("default rate table applied (4 new)"));
        assert!(first_message.contains("  - Pick-up: 65/day (seeded)"));

        let second = seed::run(options);
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        assert!(message(&second.output).starts_with("default rate table applied (0 new)"));

        let listed = rates::list(options);
        let payload = parse_payload(&listed.output);
        assert_eq!(payload["data"].as_array().map(Vec::len), Some(4));
    });
}

#[test]
fn weekly_booking_is_listed_approved_and_keeps_its_total() {
    with_temp_database(|options| {
        assert_eq!(rates::set(options, "sedan", "100").exit_code, 0);

        let submitted = submit::run_at(
            options,
            form("Ada Lovelace", "Sedan", "03-14-2027", "10:00", "03-20-2027"),
            now(),
        );
        assert_eq!(submitted.exit_code, 0, "expected accepted submission: {}", submitted.output);
        let payload = parse_payload(&submitted.output);
        assert_eq!(payload["message"], "Reservation made for Ada Lovelace.");
        assert_eq!(payload["data"]["rental_days"], 7);
        assert_eq!(decimal(&payload["data"]["total_charge"]), Decimal::new(630, 0));
        let reservation_id = payload["data"]["reservation_id"].as_str().unwrap_or_default();

        let listed = parse_payload(&list::run(options, true).output);
        let cards = listed["data"].as_array().cloned().unwrap_or_default();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["reservation_id"], reservation_id);
        assert!(message(&list::run(options, false).output).contains(
            "Reservation Date: 03-14-2027 @ 10:00\nReturn Date: 03-20-2027 @ 10:00\nStatus: Pending"
        ));

        let approved = status::run(options, AdminAction::Approve, reservation_id);
        assert_eq!(approved.exit_code, 0);
        assert!(message(&approved.output).ends_with("is now Approved"));

        let relisted = parse_payload(&list::run(options, true).output);
        let card = &relisted["data"][0];
        assert!(card["details"].as_str().unwrap_or_default().ends_with("Status: Approved"));
        assert_eq!(decimal(&card["total_charge"]), Decimal::new(630, 0));
    });
}

#[test]
fn rejected_submissions_report_the_form_message() {
    with_temp_database(|options| {
        let incomplete = submit::run_at(options, form("", "Select Car Type", "", "", ""), now());
        assert_eq!(incomplete.exit_code, 7);
        let payload = parse_payload(&incomplete.output);
        assert_eq!(payload["error_class"], "bad_request");
        assert!(message(&incomplete.output).starts_with("Please fill in all fields."));

        let too_soon =
            submit::run_at(options, form("Ada", "Van", "03-01-2027", "12:00", "03-02-2027"), now());
        assert_eq!(too_soon.exit_code, 7);
        assert!(message(&too_soon.output)
            .starts_with("Reservations must be made at least 24 hours in advance."));

        let listed = parse_payload(&list::run(options, false).output);
        assert_eq!(listed["message"], "no reservations");
    });
}

#[test]
fn overlapping_submission_is_a_conflict() {
    with_temp_database(|options| {
        seed::run(options);
        let first =
            submit::run_at(options, form("A", "SUV", "04-01-2027", "09:00", "04-03-2027"), now());
        assert_eq!(first.exit_code, 0);

        let clash =
            submit::run_at(options, form("B", "SUV", "04-03-2027", "09:00", "04-04-2027"), now());
        assert_eq!(clash.exit_code, 7);
        assert_eq!(parse_payload(&clash.output)["error_class"], "conflict");

        let other =
            submit::run_at(options, form("C", "Van", "04-02-2027", "09:00", "04-02-2027"), now());
        assert_eq!(other.exit_code, 0);
    });
}

#[test]
fn oversized_rate_rejects_the_booking_instead_of_crashing() {
    with_temp_database(|options| {
        let stored = rates::set(options, "van", "79228162514264337593543950335");
        assert_eq!(stored.exit_code, 0, "expected rate stored: {}", stored.output);

        let result =
            submit::run_at(options, form("Ada", "Van", "04-01-2027", "09:00", "04-02-2027"), now());
        assert_eq!(result.exit_code, 7);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "bad_request");
        assert!(message(&result.output).starts_with("The rental charge is too large to compute."));

        let listed = parse_payload(&list::run(options, false).output);
        assert_eq!(listed["message"], "no reservations");
    });
}

#[test]
fn extend_moves_return_date_with_start_time() {
    with_temp_database(|options| {
        seed::run(options);
        let submitted = submit::run_at(
            options,
            form("Grace", "Pick-up", "05-01-2027", "07:45", "05-02-2027"),
            now(),
        );
        let payload = parse_payload(&submitted.output);
        let reservation_id = payload["data"]["reservation_id"].as_str().unwrap_or_default();

        let extended = extend::run(options, reservation_id, "05-09-2027", None);
        assert_eq!(extended.exit_code, 0, "expected extension: {}", extended.output);
        assert!(message(&extended.output).ends_with("now returns 05-09-2027 @ 07:45"));

        let listed = parse_payload(&list::run(options, true).output);
        assert_eq!(decimal(&listed["data"][0]["total_charge"]), Decimal::new(130, 0));
    });
}

#[test]
fn unknown_reservation_ids_are_not_found() {
    with_temp_database(|options| {
        let result = status::run(options, AdminAction::Deny, "no-such-id");
        assert_eq!(result.exit_code, 8);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "deny");
        assert_eq!(payload["error_class"], "not_found");
    });
}

#[test]
fn rate_set_rejects_bad_arguments_before_touching_the_database() {
    with_env(&[("RENTDESK_DATABASE_URL", "postgres://never-used")], || {
        let result = rates::set(&LoadOptions::default(), "Sedan", "-10");
        assert_eq!(result.exit_code, 9);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_argument");
    });
}

#[test]
fn config_attributes_env_values() {
    with_env(
        &[("RENTDESK_DATABASE_URL", "sqlite::memory:"), ("RENTDESK_BOOKING_DISCOUNT_PCT", "15")],
        || {
            let result = config::run(&LoadOptions::default());
            assert_eq!(result.exit_code, 0);

            let text = message(&result.output);
            assert!(text.contains(
                "- booking.discount_pct = 15 (source: env (RENTDESK_BOOKING_DISCOUNT_PCT))"
            ));
            assert!(text.contains("- booking.min_lead_time_hours = 24 (source: default)"));
        },
    );
}

#[test]
fn doctor_flags_missing_rates_until_seeded() {
    with_temp_database(|options| {
        let before = doctor::run(options, true);
        assert_eq!(before.exit_code, 1);
        let report: Value = serde_json::from_str(&before.output).expect("doctor json");
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][1]["name"], "database_connectivity");
        assert_eq!(report["checks"][1]["status"], "pass");
        assert_eq!(report["checks"][3]["status"], "fail");

        seed::run(options);

        let after = doctor::run(options, true);
        assert_eq!(after.exit_code, 0);
        let report: Value = serde_json::from_str(&after.output).expect("doctor json");
        assert_eq!(report["overall_status"], "pass");
    });
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2027, 3, 1)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid fixture datetime")
}

fn form(
    name: &str,
    category: &str,
    date: &str,
    time: &str,
    return_date: &str,
) -> ReservationRequest {
    ReservationRequest {
        driver_name: name.to_string(),
        category: category.to_string(),
        start_date: date.to_string(),
        start_time: time.to_string(),
        return_date: return_date.to_string(),
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn message(output: &str) -> String {
    parse_payload(output)["message"].as_str().unwrap_or_default().to_string()
}

fn decimal(value: &Value) -> Decimal {
    let raw = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Decimal::from_str(&raw).expect("decimal amount")
}

fn with_temp_database(test_fn: impl FnOnce(&LoadOptions)) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("rentdesk.db").display());

    with_env(&[("RENTDESK_DATABASE_URL", url.as_str())], || {
        test_fn(&LoadOptions::default());
    });
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "RENTDESK_DATABASE_URL",
        "RENTDESK_DATABASE_MAX_CONNECTIONS",
        "RENTDESK_DATABASE_TIMEOUT_SECS",
        "RENTDESK_BOOKING_MIN_LEAD_TIME_HOURS",
        "RENTDESK_BOOKING_DISCOUNT_THRESHOLD_DAYS",
        "RENTDESK_BOOKING_DISCOUNT_PCT",
        "RENTDESK_BOOKING_MISSING_RATE",
        "RENTDESK_LOGGING_LEVEL",
        "RENTDESK_LOGGING_FORMAT",
        "RENTDESK_LOG_LEVEL",
        "RENTDESK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
