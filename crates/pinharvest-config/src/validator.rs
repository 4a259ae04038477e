//! Configuration validation.

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse errors into a single [`ConfigError::Invalid`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let message = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Invalid(message))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_board(config, &mut result);
        Self::validate_scroll(config, &mut result);
        Self::validate_resolve(config, &mut result)?;

        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }

        Ok(result)
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_board(config: &Config, result: &mut ValidationResult) {
        if config.board.link_selector.trim().is_empty() {
            result.add_error(ValidationError::new(
                "board.link_selector",
                "Link selector cannot be empty",
            ));
        }

        if let Some(ref url) = config.board.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_warning(ValidationWarning::new(
                    "board.url",
                    "Not an http(s) URL, it will only be matched against open tabs",
                ));
            }
        }

        if config.board.count == Some(0) {
            result.add_warning(ValidationWarning::new(
                "board.count",
                "count is 0, nothing will be resolved",
            ));
        }
    }

    fn validate_scroll(config: &Config, result: &mut ValidationResult) {
        if config.scroll.enabled && config.scroll.max_rounds == 0 {
            result.add_error(ValidationError::new(
                "scroll.max_rounds",
                "max_rounds must be greater than 0",
            ));
        }

        if config.scroll.max_rounds > 1000 {
            result.add_warning(ValidationWarning::new(
                "scroll.max_rounds",
                "max_rounds is very high (>1000), saturation may take a long time",
            ));
        }

        if config.scroll.scroll_multiplier <= 0.0 || !config.scroll.scroll_multiplier.is_finite() {
            result.add_error(ValidationError::new(
                "scroll.scroll_multiplier",
                "scroll_multiplier must be a positive number",
            ));
        }

        if config.scroll.settle_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "scroll.settle_ms",
                "settle_ms is 0, the page may not get a chance to load more items",
            ));
        }
    }

    fn validate_resolve(config: &Config, result: &mut ValidationResult) -> Result<(), ConfigError> {
        if config.resolve.load_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "resolve.load_timeout_secs",
                "load_timeout_secs must be greater than 0",
            ));
        }

        let valid_extractors = ["last", "largest"];
        if !valid_extractors.contains(&config.resolve.extractor.to_ascii_lowercase().as_str()) {
            result.add_error(ValidationError::new(
                "resolve.extractor",
                format!(
                    "Unknown extractor '{}', valid values: {:?}",
                    config.resolve.extractor, valid_extractors
                ),
            ));
        }

        let resolution = Regex::new(r"^\s*\d+\s*[xX]\s*\d+\s*$")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !resolution.is_match(&config.resolve.min_resolution) {
            result.add_error(ValidationError::new(
                "resolve.min_resolution",
                format!(
                    "Expected WIDTHxHEIGHT, got '{}'",
                    config.resolve.min_resolution
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
