//! Checks that run after the layers are merged.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, ParleyConfig, RuntimeConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &ParleyConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_runtime_config(&config.runtime)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File {
        match &logging.file_path {
            None => {
                return Err(ConfigError::invalid(
                    "logging.file_path",
                    "required when output is `file`",
                ));
            }
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::invalid("logging.file_path", "cannot be empty"));
            }
            Some(_) => {}
        }
    }

    if logging.filters.keys().any(|module| module.trim().is_empty()) {
        return Err(ConfigError::invalid(
            "logging.filters",
            "module names cannot be blank",
        ));
    }

    Ok(())
}

fn validate_runtime_config(runtime: &RuntimeConfig) -> ConfigResult<()> {
    // The prompt is written without a trailing newline.
    if let Some(prompt) = &runtime.prompt
        && prompt.contains('\n')
    {
        return Err(ConfigError::invalid(
            "runtime.prompt",
            "cannot contain a newline",
        ));
    }

    if runtime
        .no_match_message
        .as_deref()
        .is_some_and(|message| message.trim().is_empty())
    {
        return Err(ConfigError::invalid(
            "runtime.no_match_message",
            "cannot be blank, unset it to stay silent",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::schema::LogLevel;

    fn invalid_field(config: &ParleyConfig) -> Option<&'static str> {
        match validate_config(config) {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = ParleyConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = ParleyConfig::default();
        config.logging.output = LogOutput::File;
        assert_eq!(invalid_field(&config), Some("logging.file_path"));

        config.logging.file_path = Some(PathBuf::new());
        assert_eq!(invalid_field(&config), Some("logging.file_path"));

        config.logging.file_path = Some(PathBuf::from("logs/parley.log"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_blank_filter_module() {
        let mut config = ParleyConfig::default();
        config.logging.filters.insert(" ".to_string(), LogLevel::Debug);
        assert_eq!(invalid_field(&config), Some("logging.filters"));
    }

    #[test]
    fn test_prompt_with_newline() {
        let mut config = ParleyConfig::default();
        config.runtime.prompt = Some("> \n".to_string());
        assert_eq!(invalid_field(&config), Some("runtime.prompt"));
    }

    #[test]
    fn test_blank_no_match_message() {
        let mut config = ParleyConfig::default();
        config.runtime.no_match_message = Some("  ".to_string());
        assert_eq!(invalid_field(&config), Some("runtime.no_match_message"));

        config.runtime.no_match_message = None;
        assert!(validate_config(&config).is_ok());
    }
}
