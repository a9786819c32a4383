use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Unknown gender option: {0:?}")]
    UnknownGender(String),

    #[error("Could not read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Could not encode confetti options: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
