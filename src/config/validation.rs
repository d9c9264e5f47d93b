//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use syncable_proto::quant::is_quant;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("at least one [[input]] is required")]
    NoInputs,
    #[error("input.path does not exist: {0}")]
    InputNotFound(String),
    #[error("input.filter for {path} is not a valid specifier: {reason}")]
    InvalidFilter { path: String, reason: String },
    #[error("protocol.diff_ops contains an empty name")]
    EmptyDiffOp,
    #[error("protocol.diff_ops name contains a quant character: '{0}'")]
    InvalidDiffOp(String),
    #[error("protocol.max_entry_len must be greater than zero")]
    ZeroMaxEntryLen,
    #[error("log.level is not a valid filter directive: '{0}'")]
    InvalidLogLevel(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if EnvFilter::try_new(&config.log.level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(config.log.level.clone()));
    }

    // Diff op names are matched against operation token bodies
    for name in &config.protocol.diff_ops {
        if name.is_empty() {
            errors.push(ValidationError::EmptyDiffOp);
        } else if name.chars().any(is_quant) {
            errors.push(ValidationError::InvalidDiffOp(name.clone()));
        }
    }
    if config.protocol.max_entry_len == 0 {
        errors.push(ValidationError::ZeroMaxEntryLen);
    }

    if config.input.is_empty() {
        errors.push(ValidationError::NoInputs);
    }
    for input in &config.input {
        let path = input.path.display().to_string();
        if !input.path.exists() {
            errors.push(ValidationError::InputNotFound(path.clone()));
        }
        if let Err(e) = input.filter_spec() {
            errors.push(ValidationError::InvalidFilter {
                path,
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
