pub mod logging;

pub use logging::{initialize_logging, log_registry_event, redact_identity, LoggingError};
