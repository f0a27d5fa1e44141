//! Errors raised while reading `kiln.toml`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsed, but the merged values make no sense.
    #[error("invalid config: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("site/kiln.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "cannot read config `site/kiln.toml`");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_toml_error_inlined() {
        let err: ConfigError = toml::from_str::<toml::Value>("a = ").unwrap_err().into();
        assert!(err.to_string().starts_with("malformed config: "));
    }
}
