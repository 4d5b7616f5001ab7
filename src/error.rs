//! Error types for Hjson parsing and encoding.

use thiserror::Error;

/// Result type for Hjson operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Hjson operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input encountered while decoding.
    ///
    /// Carries the 1-based line and column of the offending byte and up
    /// to 20 bytes of source starting at the beginning of that line.
    #[error("{message} at line {line},{column} >>> {context}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        context: String,
    },

    /// I/O failure in one of the file-based entry points.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A code point outside the Unicode range was handed to the UTF-8
    /// encoder. Indicates a caller bug rather than bad input.
    #[error("invalid unicode code point U+{0:X}")]
    CodePoint(u32),
}

impl Error {
    /// Returns `true` if this is a syntax error.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }
}
