//! Observability
//!
//! Structured JSON logging of schema loading and validation outcomes.
//! Observability is read-only: nothing logged here changes a validation
//! result.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
