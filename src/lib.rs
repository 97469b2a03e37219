// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{config, registry, utils};

// Re-export commonly used types
pub use modules::config::{ConfigError, RegistryConfig};
pub use modules::registry::{
    AdminRegistry, AdminStore, Identity, MemoryStore, RegistryError, RegistryResult,
    RegistrySnapshot, SharedRegistry,
};
pub use modules::utils::logging::initialize_logging;

// Error codes, part of the public contract
pub const ERR_LAST_ADMIN: u16 = 400;
pub const ERR_FORBIDDEN: u16 = 403;
pub const ERR_NOT_ADMIN: u16 = 404;
pub const ERR_ALREADY_ADMIN: u16 = 409;
pub const ERR_ALREADY_INITIALIZED: u16 = 409;

// Bytes of the public key digest kept in a derived address
pub const ADDRESS_LENGTH: usize = 20;
pub const DEFAULT_LOG_LEVEL: &str = "info";
