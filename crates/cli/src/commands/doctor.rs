use rentdesk_core::config::{AppConfig, LoadOptions};
use rentdesk_db::{connect, migrations, DefaultRateSeed};
use serde::Serialize;
use serde_json::json;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: &LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report)
            .unwrap_or_else(|error| serialization_fallback(&error.to_string()))
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            let reason = "configuration did not load";
            checks.push(DoctorCheck::skipped("database_connectivity", reason));
            checks.push(DoctorCheck::skipped("schema_migrations", reason));
            checks.push(DoctorCheck::skipped("rate_table", reason));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Connectivity, migrations and rate coverage, each skipped once an earlier step fails.
fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            let reason = "the async runtime did not start";
            return vec![
                DoctorCheck {
                    name: "database_connectivity",
                    status: CheckStatus::Fail,
                    details: format!("failed to initialize async runtime: {error}"),
                },
                DoctorCheck::skipped("schema_migrations", reason),
                DoctorCheck::skipped("rate_table", reason),
            ];
        }
    };

    runtime.block_on(async {
        let mut checks = Vec::new();

        let pool = match connect(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                let reason = "the database is unreachable";
                checks.push(DoctorCheck {
                    name: "database_connectivity",
                    status: CheckStatus::Fail,
                    details: format!("failed to connect to database: {error}"),
                });
                checks.push(DoctorCheck::skipped("schema_migrations", reason));
                checks.push(DoctorCheck::skipped("rate_table", reason));
                return checks;
            }
        };
        checks.push(DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        });

        match migrations::run_pending(&pool).await {
            Ok(()) => {
                checks.push(DoctorCheck {
                    name: "schema_migrations",
                    status: CheckStatus::Pass,
                    details: "schema is up to date".to_string(),
                });
                checks.push(check_rate_table(&pool).await);
            }
            Err(error) => {
                checks.push(DoctorCheck {
                    name: "schema_migrations",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                });
                checks.push(DoctorCheck::skipped("rate_table", "migrations failed"));
            }
        }

        pool.close().await;
        checks
    })
}

async fn check_rate_table(pool: &rentdesk_db::DbPool) -> DoctorCheck {
    match DefaultRateSeed::verify(pool).await {
        Ok(verification) if verification.all_present => DoctorCheck {
            name: "rate_table",
            status: CheckStatus::Pass,
            details: "every car type has a daily rate".to_string(),
        },
        Ok(verification) => {
            let missing = verification
                .checks
                .iter()
                .filter_map(|(category, present)| (!present).then_some(*category))
                .collect::<Vec<_>>();
            DoctorCheck {
                name: "rate_table",
                status: CheckStatus::Fail,
                details: format!(
                    "no daily rate for {}; run `rentdesk seed` or `rentdesk rate-set`",
                    missing.join(", ")
                ),
            }
        }
        Err(error) => DoctorCheck {
            name: "rate_table",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn serialization_fallback(error: &str) -> String {
    json!({
        "overall_status": "fail",
        "summary": "doctor serialization failed",
        "error": error,
    })
    .to_string()
}
