use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - All timeouts are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.converter.convert_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.convert_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.converter.download_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.download_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.fonts.download_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fonts.download_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.pipeline.probe_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.probe_timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
