// Declare all modules
pub mod config;
pub mod registry;
pub mod utils;

// No re-exports here as they're handled in lib.rs
