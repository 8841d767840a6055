//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,

    // Schema registry
    /// A schema was registered under (name, action)
    SchemaRegistered,
    /// A directory of schema definitions was loaded
    SchemasLoaded,
    /// A schema definition was rejected at load time
    SchemaRejected,

    // Validation
    /// Input accepted
    ValidationPassed,
    /// Input rejected
    ValidationFailed,
    /// Input nesting exceeded the configured depth
    DepthLimitExceeded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::DepthLimitExceeded => "DEPTH_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_unique_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::SchemaRegistered,
            Event::SchemasLoaded,
            Event::SchemaRejected,
            Event::ValidationPassed,
            Event::ValidationFailed,
            Event::DepthLimitExceeded,
        ];

        let mut names: Vec<_> = events.iter().map(Event::as_str).collect();
        for name in &names {
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }
}
