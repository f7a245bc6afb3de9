//! Settings errors.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot locate config directory: {0}")]
    ConfigDirectory(String),

    /// Writing the config file or creating its directory failed.
    #[error("cannot save config: {0}")]
    SaveError(String),

    #[error("config file I/O: {0}")]
    IoError(#[from] io::Error),

    #[error("malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot encode config as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// The file parsed but its contents were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SettingsError {
    /// True when the config file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SettingsError::IoError(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Rejected config contents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.toml` and `.json` files are understood.
    #[error("unsupported config format '{0}' (expected toml or json)")]
    UnsupportedFormat(String),

    #[error("{key} = {value} is out of range")]
    ValueOutOfRange { key: String, value: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = ConfigError::ValueOutOfRange {
            key: "grid.pitch_ft".to_string(),
            value: "-1".to_string(),
        };
        assert_eq!(err.to_string(), "grid.pitch_ft = -1 is out of range");

        let wrapped = SettingsError::from(ConfigError::UnsupportedFormat("yaml".to_string()));
        assert_eq!(
            wrapped.to_string(),
            "unsupported config format 'yaml' (expected toml or json)"
        );
    }

    #[test]
    fn test_not_found_detection() {
        let missing = SettingsError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(missing.is_not_found());

        let denied = SettingsError::from(io::Error::new(io::ErrorKind::PermissionDenied, "no"));
        assert!(!denied.is_not_found());
        assert!(!SettingsError::SaveError("disk full".to_string()).is_not_found());
    }
}
