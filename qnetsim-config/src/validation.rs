//! Custom validation functions for configuration.
//!
//! Provides shared validation logic used across multiple configuration sections.

use validator::ValidationError;

/// Validate a `tracing` level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate an entity name used as a node or channel prefix.
pub fn validate_entity_name(name: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^[A-Za-z][A-Za-z0-9_-]{0,31}$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_entity_name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels() {
        assert!(validate_log_level("info").is_ok());
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn entity_names() {
        assert!(validate_entity_name("hub").is_ok());
        assert!(validate_entity_name("router_1-a").is_ok());
        assert!(validate_entity_name("").is_err());
        assert!(validate_entity_name("1hub").is_err());
        assert!(validate_entity_name("has space").is_err());
    }
}
