use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreightError {
    #[error("Config directory not found at {0}. Run 'freight init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to read snapshot {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid ROS value '{0}': must be a finite number")]
    InvalidRosValue(f64),

    #[error("Invalid date_format '{0}' in config.toml: not a valid strftime pattern")]
    InvalidDateFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, FreightError>;
