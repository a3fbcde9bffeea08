//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, hop limit > 0)
//! - Check the metrics address parses when metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ResolverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ResolverConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    ZeroLoadTimeout,
    ZeroRedirectHops,
    UnknownLogLevel(String),
    InvalidMetricsAddress(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ZeroLoadTimeout => write!(f, "resolver.load_timeout_secs must be > 0"),
            ValidationError::ZeroRedirectHops => write!(f, "resolver.max_redirect_hops must be > 0"),
            ValidationError::UnknownLogLevel(level) => {
                write!(f, "observability.log_level '{}' is not a known level", level)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address '{}' is not a socket address", addr)
            }
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ResolverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.resolver.load_timeout_secs == 0 {
        errors.push(ValidationError::ZeroLoadTimeout);
    }
    if config.resolver.max_redirect_hops == 0 {
        errors.push(ValidationError::ZeroRedirectHops);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&ResolverConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = ResolverConfig::default();
        config.resolver.load_timeout_secs = 0;
        config.resolver.max_redirect_hops = 0;
        config.observability.log_level = "loud".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroLoadTimeout,
                ValidationError::ZeroRedirectHops,
                ValidationError::UnknownLogLevel("loud".into()),
                ValidationError::InvalidMetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ResolverConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}
