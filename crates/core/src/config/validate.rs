use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Timeouts and retention windows are non-zero
/// - SMTP section, when present, names a host and a recipient
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let non_zero = [
        ("download.artifact_ttl_secs", config.download.artifact_ttl_secs),
        ("download.request_timeout_secs", config.download.request_timeout_secs),
        ("extractor.timeout_secs", config.extractor.timeout_secs),
        ("muxer.timeout_secs", config.muxer.timeout_secs),
        ("progress.retention_secs", config.progress.retention_secs),
        ("progress.sweep_interval_secs", config.progress.sweep_interval_secs),
    ];
    for (name, value) in non_zero {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be 0",
                name
            )));
        }
    }

    if let Some(ref smtp) = config.smtp {
        if smtp.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "smtp.host cannot be empty".to_string(),
            ));
        }
        if smtp.recipient.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "smtp.recipient cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
