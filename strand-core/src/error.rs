//! Structured error types for the strand toolkit.

use thiserror::Error;

/// Unified error type for all strand operations.
#[derive(Debug, Error)]
pub enum StrandError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed container (bad magic, truncated header, corrupt index or block tables)
    #[error("format error: {0}")]
    Format(String),

    /// Container version this reader does not decode.
    #[error("{}", unsupported_version_message(.version))]
    UnsupportedVersion { version: u32 },

    /// Slice or materialize request outside the declared length.
    #[error("range [{start}..{end}) out of bounds for sequence of length {len}")]
    Bounds { start: usize, end: usize, len: usize },

    /// Content inspection of a sequence whose content is unknown.
    #[error("sequence content is undefined (length {len})")]
    UndefinedContent { len: usize },

    /// Pattern absent from the searched window (`index`/`rindex`).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid input (bad arguments, unknown names)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

fn unsupported_version_message(version: &u32) -> String {
    if *version == 1 {
        "version-1 twoBit files with 64-bit offsets for index are currently not supported"
            .to_string()
    } else {
        format!("found unexpected file version {}; aborting", version)
    }
}

impl StrandError {
    /// Whether this error reports content inspection of an undefined sequence.
    pub fn is_undefined_content(&self) -> bool {
        matches!(self, StrandError::UndefinedContent { .. })
    }
}

/// Convenience alias used throughout the strand toolkit.
pub type Result<T> = std::result::Result<T, StrandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_one_message_is_exact() {
        let err = StrandError::UnsupportedVersion { version: 1 };
        assert_eq!(
            err.to_string(),
            "version-1 twoBit files with 64-bit offsets for index are currently not supported"
        );
    }

    #[test]
    fn other_versions_name_the_value() {
        let err = StrandError::UnsupportedVersion { version: 7 };
        assert_eq!(err.to_string(), "found unexpected file version 7; aborting");
    }

    #[test]
    fn bounds_message() {
        let err = StrandError::Bounds { start: 3, end: 12, len: 10 };
        assert!(err.to_string().contains("[3..12)"));
        assert!(err.to_string().contains("length 10"));
    }

    #[test]
    fn undefined_predicate() {
        assert!(StrandError::UndefinedContent { len: 4 }.is_undefined_content());
        assert!(!StrandError::NotFound("CT".into()).is_undefined_content());
    }
}
