use crate::config::types::{BrowserSettings, Config, FetcherSettings};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_settings(&config.fetcher)?;
    validate_browser_settings(&config.browser)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_settings(settings: &FetcherSettings) -> Result<(), ConfigError> {
    if settings.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if settings.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetcher timeout-secs must be >= 1".to_string(),
        ));
    }

    if settings.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetcher connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_settings(settings: &BrowserSettings) -> Result<(), ConfigError> {
    if settings.viewport_width == 0 || settings.viewport_height == 0 {
        return Err(ConfigError::Validation(format!(
            "viewport must be non-zero, got {}x{}",
            settings.viewport_width, settings.viewport_height
        )));
    }

    if settings.navigation_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "navigation-timeout-secs must be >= 1".to_string(),
        ));
    }

    if settings.content_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "content-timeout-secs must be >= 1".to_string(),
        ));
    }

    if settings.max_concurrent_sessions == Some(0) {
        return Err(ConfigError::Validation(
            "max-concurrent-sessions must be >= 1 when set".to_string(),
        ));
    }

    if let Some(path) = &settings.chrome_executable {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chrome-executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
