use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A file passed to [`ConfigLoader::file`](super::ConfigLoader::file) does not exist.
    #[error("config file {} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The file extension matches no format enabled in this build.
    #[error("config file {} has no supported format, enable `toml-config` or `yaml-config`", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// A value was read but makes no sense, e.g. a file log output without a path.
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
