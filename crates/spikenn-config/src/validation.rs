//! Configuration validation
//!
//! Checks that values are within usable ranges before a network is built
//! from them.

use crate::{ConfigError, ConfigResult, SpikennConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NotPositive { field: String, value: f64 },
    Negative { field: String, value: f64 },
    InvertedRange { field: String, min: f64, max: f64 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{} = {} must be greater than zero", field, value)
            }
            Self::Negative { field, value } => {
                write!(f, "{} = {} must not be negative", field, value)
            }
            Self::InvertedRange { field, min, max } => {
                write!(f, "{}: min {} exceeds max {}", field, min, max)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SpikennConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_clock(config, &mut errors);
    validate_learning(config, &mut errors);
    validate_ranges(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn require_positive(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !(value > 0.0) {
        errors.push(ConfigValidationError::NotPositive {
            field: field.to_string(),
            value,
        });
    }
}

fn require_non_negative(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if value < 0.0 {
        errors.push(ConfigValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
}

fn require_ordered(field: &str, min: f64, max: f64, errors: &mut Vec<ConfigValidationError>) {
    if min > max {
        errors.push(ConfigValidationError::InvertedRange {
            field: field.to_string(),
            min,
            max,
        });
    }
}

fn validate_clock(config: &SpikennConfig, errors: &mut Vec<ConfigValidationError>) {
    require_positive("simulation.time_step", config.simulation.time_step, errors);
    require_positive("learning.stdp_period", config.learning.stdp_period, errors);
}

fn validate_learning(config: &SpikennConfig, errors: &mut Vec<ConfigValidationError>) {
    let learning = &config.learning;
    require_non_negative("learning.a_plus", learning.a_plus as f64, errors);
    require_non_negative("learning.a_minus", learning.a_minus as f64, errors);
    require_positive("learning.tau_plus", learning.tau_plus as f64, errors);
    require_positive("learning.tau_minus", learning.tau_minus as f64, errors);
    if learning.max_trace_events == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "learning.max_trace_events".to_string(),
            reason: "at least one event per side must be kept".to_string(),
        });
    }
    if config.construction.fanout_retry_budget == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "construction.fanout_retry_budget".to_string(),
            reason: "fan-out construction needs at least one draw".to_string(),
        });
    }
}

fn validate_ranges(config: &SpikennConfig, errors: &mut Vec<ConfigValidationError>) {
    let bounds = &config.bounds;
    require_ordered(
        "bounds.ex_rand_weight",
        bounds.ex_min_rand_weight as f64,
        bounds.ex_max_rand_weight as f64,
        errors,
    );
    require_ordered(
        "bounds.in_rand_weight",
        bounds.in_min_rand_weight as f64,
        bounds.in_max_rand_weight as f64,
        errors,
    );
    require_ordered(
        "bounds.rand_delay",
        bounds.min_rand_delay as f64,
        bounds.max_rand_delay as f64,
        errors,
    );
    require_ordered(
        "input.current",
        config.input.min_current as f64,
        config.input.max_current as f64,
        errors,
    );
}

fn validate_logging(config: &SpikennConfig, errors: &mut Vec<ConfigValidationError>) {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    let level = config.logging.log_level.to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.log_level".to_string(),
            reason: format!("expected one of {}", LEVELS.join(", ")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_time_step_rejected() {
        let mut config = SpikennConfig::default();
        config.simulation.time_step = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_inverted_delay_range_rejected() {
        let mut config = SpikennConfig::default();
        config.bounds.min_rand_delay = 5;
        config.bounds.max_rand_delay = 1;

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("bounds.rand_delay"));
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut config = SpikennConfig::default();
        config.learning.tau_plus = 0.0;
        config.logging.log_level = "loud".to_string();

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("learning.tau_plus"));
        assert!(err.contains("logging.log_level"));
    }
}
