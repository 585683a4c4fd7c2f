use crate::OpenBidConfig;
use std::fmt;

/// One validation error, displayed as `[field] message`.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn warn(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.into(),
        });
    }
}

/// Validate a loaded configuration.
///
/// Errors block startup; warnings are logged and allowed through.
pub fn validate_config(config: &OpenBidConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.service.name.trim().is_empty() {
        report.error("service.name", "must not be empty");
    }
    if config.service.version.trim().is_empty() {
        report.error("service.version", "must not be empty");
    }

    if config.auction.min_increment < 0.0 {
        report.error("auction.min_increment", "must not be negative");
    } else if config.auction.min_increment == 0.0 {
        report.warn(
            "auction.min_increment",
            "zero increment admits any bid above the current winner",
        );
    }
    if config.auction.reserve_price < 0.0 {
        report.error("auction.reserve_price", "must not be negative");
    }

    if config.lifecycle.tick_interval_ms == 0 {
        report.error("lifecycle.tick_interval_ms", "must be greater than zero");
    } else if config.lifecycle.tick_interval_ms > 10_000 {
        report.warn(
            "lifecycle.tick_interval_ms",
            "ticks above 10s delay auction close transitions noticeably",
        );
    }

    if config.dispatch.queue_capacity == 0 {
        report.error("dispatch.queue_capacity", "must be greater than zero");
    } else if config.dispatch.queue_capacity < 16 {
        report.warn(
            "dispatch.queue_capacity",
            "small queues drop events aggressively under bursts",
        );
    }

    if config.persistence.recent_bids_retained == 0 {
        report.error("persistence.recent_bids_retained", "must be greater than zero");
    }

    match config.logging.format.as_str() {
        "pretty" | "json" | "compact" => {}
        other => {
            report.error("logging.format", format!("unknown format: {}", other));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_default_config;

    #[test]
    fn test_default_config_is_valid() {
        let report = validate_config(&generate_default_config());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let mut config = generate_default_config();
        config.lifecycle.tick_interval_ms = 0;
        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert!(report.errors[0].to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn test_zero_increment_warns() {
        let mut config = generate_default_config();
        config.auction.min_increment = 0.0;
        let report = validate_config(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_bad_log_format_rejected() {
        let mut config = generate_default_config();
        config.logging.format = "xml".to_string();
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }
}
