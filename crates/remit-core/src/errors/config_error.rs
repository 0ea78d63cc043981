//! Configuration errors.

use super::error_code::{self, RemitErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl RemitErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TomlParse(_) => error_code::CONFIG_PARSE_ERROR,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
