use env_logger::{Builder, WriteStyle};
use log::{info, warn};
use std::fs::OpenOptions;
use std::io;
use thiserror::Error;

use crate::modules::config::{ConfigError, RegistryConfig};
use crate::modules::registry::{Identity, RegistryResult};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open log file: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Install the global logger described by `config`
pub fn initialize_logging(config: &RegistryConfig) -> Result<(), LoggingError> {
    build_logger(config)?.try_init()?;

    info!("Logging system initialized");
    Ok(())
}

fn build_logger(config: &RegistryConfig) -> Result<Builder, LoggingError> {
    let mut builder = Builder::new();
    builder
        .filter_level(config.level_filter()?)
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Auto);

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    Ok(builder)
}

/// Mask an identity for log output.
///
/// Identities longer than 8 characters keep their first and last 4
/// characters (`ST1P***PZGM`); shorter ones are masked completely.
pub fn redact_identity(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Emit one structured line for a registry mutation attempt
pub fn log_registry_event(
    operation: &str,
    caller: &Identity,
    target: Option<&Identity>,
    result: &RegistryResult,
    redact: bool,
) {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let show = |identity: &Identity| {
        if redact {
            redact_identity(identity.as_str())
        } else {
            identity.to_string()
        }
    };
    let target = target.map(&show).unwrap_or_else(|| "-".to_string());

    match result {
        Ok(_) => info!(
            "Registry event: op={}, caller={}, target={}, success=true, timestamp={}",
            operation,
            show(caller),
            target,
            timestamp
        ),
        Err(e) => warn!(
            "Registry event: op={}, caller={}, target={}, success=false, code={}, reason={}, timestamp={}",
            operation,
            show(caller),
            target,
            e.code(),
            e,
            timestamp
        ),
    }
}
