//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Check that addresses parse before anything tries to bind them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `probe.interval_secs`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check the settings for values that would leave the service unusable.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_host_port(&config.listener.bind_address) {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not of the form host:port", config.listener.bind_address),
        ));
    }

    if config.probe.interval_secs == 0 {
        errors.push(ValidationError::new("probe.interval_secs", "must be greater than 0"));
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::new("probe.timeout_secs", "must be greater than 0"));
    }

    if config.storage.enabled && config.storage.file_name.trim().is_empty() {
        errors.push(ValidationError::new("storage.file_name", "must not be empty"));
    }

    if config.subscribers.queue_capacity == 0 {
        errors.push(ValidationError::new("subscribers.queue_capacity", "must be greater than 0"));
    }
    if config.subscribers.write_timeout_secs == 0 {
        errors.push(ValidationError::new("subscribers.write_timeout_secs", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` with a numeric port. The host may be empty, a name or an IP literal.
fn is_host_port(addr: &str) -> bool {
    if addr.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => port.parse::<u16>().is_ok() && !host.contains(char::is_whitespace),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.probe.interval_secs = 0;
        config.subscribers.queue_capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "probe.interval_secs", "subscribers.queue_capacity"]
        );
    }

    #[test]
    fn test_bind_address_forms() {
        let mut config = ServiceConfig::default();
        for ok in [":8081", "localhost:8081", "127.0.0.1:80", "[::1]:8081"] {
            config.listener.bind_address = ok.into();
            assert!(validate_config(&config).is_ok(), "{} should be accepted", ok);
        }
        for bad in ["8081", "localhost", "localhost:http", "host:70000"] {
            config.listener.bind_address = bad.into();
            assert!(validate_config(&config).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
