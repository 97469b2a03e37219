pub mod error;
pub mod identity;
pub mod operations;
pub mod shared;
pub mod snapshot;
pub mod store;

// Re-export the main types
pub use error::{RegistryError, RegistryResult};
pub use identity::Identity;
pub use operations::AdminRegistry;
pub use shared::SharedRegistry;
pub use snapshot::{RegistrySnapshot, SnapshotError};
pub use store::{AdminStore, Change, MemoryStore, Transition};
