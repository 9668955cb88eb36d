//! Global error handling for gdipak
//!
//! This module provides a centralized error type covering name mapping,
//! descriptor rewriting, discovery and packaging.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for gdipak operations
#[derive(Error, Debug)]
pub enum GdipakError {
    /// File extension is not one of the GDI dump extensions
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Track file name without a "track" marker followed by digits
    #[error("File name does not contain track information: {0}")]
    AmbiguousName(String),

    /// Game directory without a descriptor
    #[error("Directory does not contain a gdi file: {}", .0.display())]
    MissingDescriptor(PathBuf),

    /// Game directory with more than one descriptor
    #[error("Directory contains more than one gdi file: {}", .0.display())]
    MultipleDescriptors(PathBuf),

    /// Game path outside of the input root
    #[error("{} is not inside {}", .path.display(), .base.display())]
    NotUnderBase {
        /// Game directory
        path: PathBuf,
        /// Input root it was expected under
        base: PathBuf,
    },

    /// Descriptor line without a quoted file name
    #[error("Line {line} does not contain a file name between double quotes")]
    MissingFileNameReference {
        /// 1-based line number
        line: usize,
    },

    /// Descriptor line with a single double quote
    #[error("Line {line} only contains a single quote, file names should be between two quotes")]
    UnterminatedFileNameReference {
        /// 1-based line number
        line: usize,
    },

    /// Descriptor track line with a missing or non-numeric field
    #[error("Line {line} has an invalid {field} field")]
    InvalidDescriptorEntry {
        /// 1-based line number
        line: usize,
        /// Name of the offending field
        field: &'static str,
    },

    /// Copy or move of a game file failed
    #[error("Failed to {action} {} to {}: {source}", .from.display(), .to.display())]
    FileAction {
        /// Name of the action ("copy" or "move")
        action: &'static str,
        /// Source file
        from: PathBuf,
        /// Destination file
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for gdipak operations
pub type Result<T> = std::result::Result<T, GdipakError>;

/// Creates a GdipakError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::GdipakError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            GdipakError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_macro() {
        fn check(value: usize) -> Result<usize> {
            ensure!(value > 0, Config, "value must be positive, got {}", value);
            Ok(value)
        }

        assert_eq!(check(3).unwrap(), 3);
        let err = check(0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: value must be positive, got 0"
        );
    }

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.with_context(|| "reading disc.gdi").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected error: reading disc.gdi: gone");
    }

    #[test]
    fn test_line_errors_report_line_number() {
        let err = GdipakError::UnterminatedFileNameReference { line: 4 };
        assert!(err.to_string().starts_with("Line 4 "));
    }
}
