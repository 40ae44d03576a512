use std::env;
use std::fs;
use std::path::Path;

use rentdesk_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct ConfigField {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
    overridden: bool,
}

/// Effective configuration with the layer each value came from.
pub fn run(options: &LoadOptions) -> super::CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return super::CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec![
        "effective config (source precedence: override > env > file > default):".to_string(),
    ];
    for field in effective_fields(&config, options) {
        let source = field_source(
            &field,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    super::CommandResult::success("config", lines.join("\n"))
}

fn effective_fields(config: &AppConfig, options: &LoadOptions) -> Vec<ConfigField> {
    let overrides = &options.overrides;
    vec![
        ConfigField {
            key_path: "database.url",
            value: config.database.url.clone(),
            env_keys: &["RENTDESK_DATABASE_URL"],
            overridden: overrides.database_url.is_some(),
        },
        ConfigField {
            key_path: "database.max_connections",
            value: config.database.max_connections.to_string(),
            env_keys: &["RENTDESK_DATABASE_MAX_CONNECTIONS"],
            overridden: false,
        },
        ConfigField {
            key_path: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            env_keys: &["RENTDESK_DATABASE_TIMEOUT_SECS"],
            overridden: false,
        },
        ConfigField {
            key_path: "booking.min_lead_time_hours",
            value: config.booking.min_lead_time_hours.to_string(),
            env_keys: &["RENTDESK_BOOKING_MIN_LEAD_TIME_HOURS"],
            overridden: overrides.min_lead_time_hours.is_some(),
        },
        ConfigField {
            key_path: "booking.discount_threshold_days",
            value: config.booking.discount_threshold_days.to_string(),
            env_keys: &["RENTDESK_BOOKING_DISCOUNT_THRESHOLD_DAYS"],
            overridden: false,
        },
        ConfigField {
            key_path: "booking.discount_pct",
            value: config.booking.discount_pct.to_string(),
            env_keys: &["RENTDESK_BOOKING_DISCOUNT_PCT"],
            overridden: false,
        },
        ConfigField {
            key_path: "booking.missing_rate",
            value: format!("{:?}", config.booking.missing_rate),
            env_keys: &["RENTDESK_BOOKING_MISSING_RATE"],
            overridden: overrides.missing_rate.is_some(),
        },
        ConfigField {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["RENTDESK_LOGGING_LEVEL", "RENTDESK_LOG_LEVEL"],
            overridden: overrides.log_level.is_some(),
        },
        ConfigField {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["RENTDESK_LOGGING_FORMAT", "RENTDESK_LOG_FORMAT"],
            overridden: false,
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &ConfigField,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if field.overridden {
        return "override (command line)".to_string();
    }

    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
