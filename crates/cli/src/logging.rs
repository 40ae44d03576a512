use rentdesk_core::config::{LogFormat, LoggingConfig};
use tracing::Level;

/// Installs the global subscriber. Events go to stderr so stdout carries only command output.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let log_level = parse_level(&config.level);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}

fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::parse_level;

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level(" debug "), Level::DEBUG);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
