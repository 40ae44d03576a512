pub mod config;
pub mod doctor;
pub mod extend;
pub mod list;
pub mod migrate;
pub mod rates;
pub mod seed;
pub mod status;
pub mod submit;

use std::future::Future;

use rentdesk_core::config::{AppConfig, LoadOptions};
use rentdesk_core::errors::{ApplicationError, InterfaceError};
use rentdesk_db::{connect, migrations, DbPool, DeskError};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn from_failure(command: &str, (error_class, message, exit_code): Failure) -> Self {
        Self::failure(command, error_class, message, exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        json!({
            "command": "unknown",
            "status": "error",
            "error_class": "serialization",
            "message": error.to_string(),
        })
        .to_string()
    })
}

/// Error class, operator-facing message, process exit code.
pub(crate) type Failure = (&'static str, String, u8);

/// Loaded configuration plus a current-thread runtime for one command invocation.
pub(crate) struct CommandContext {
    pub config: AppConfig,
    runtime: tokio::runtime::Runtime,
}

impl CommandContext {
    pub(crate) fn prepare(command: &str, options: &LoadOptions) -> Result<Self, CommandResult> {
        let config = AppConfig::load(options.clone()).map_err(|error| {
            CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            )
        })?;

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
            |error| {
                CommandResult::failure(
                    command,
                    "runtime_init",
                    format!("failed to initialize async runtime: {error}"),
                    3,
                )
            },
        )?;

        Ok(Self { config, runtime })
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Runs `future`, rendering its failure tuple as the command's outcome.
    pub(crate) fn finish<F>(&self, command: &str, future: F) -> CommandResult
    where
        F: Future<Output = Result<CommandResult, Failure>>,
    {
        match self.block_on(future) {
            Ok(result) => result,
            Err(failure) => CommandResult::from_failure(command, failure),
        }
    }
}

/// Connects and brings the schema up to date.
pub(crate) async fn open_pool(config: &AppConfig) -> Result<DbPool, Failure> {
    let pool = connect(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
    migrations::run_pending(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), 5u8))?;
    Ok(pool)
}

pub(crate) fn desk_failure(error: DeskError) -> Failure {
    let interface = InterfaceError::from(ApplicationError::from(error));
    let (error_class, exit_code, detail) = match &interface {
        InterfaceError::BadRequest { detail, .. } => ("bad_request", 7, detail),
        InterfaceError::Conflict { detail, .. } => ("conflict", 7, detail),
        InterfaceError::NotFound { detail } => ("not_found", 8, detail),
        InterfaceError::ServiceUnavailable { detail } => ("db_unavailable", 4, detail),
        InterfaceError::Internal { detail } => ("internal", 3, detail),
    };
    (error_class, format!("{} ({detail})", interface.user_message()), exit_code)
}
