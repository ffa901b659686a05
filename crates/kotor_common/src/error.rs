//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// A read would run past the end of the buffer
    #[error("read of {requested} bytes at offset {offset:#x} runs past the end of the buffer ({available} bytes available)")]
    #[diagnostic(code(kotor::out_of_bounds))]
    OutOfBounds {
        /// Position the read started at
        offset: usize,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// A value does not fit into the fixed size slot it is written to
    #[error("value of {actual} bytes does not fit into a {max} byte field")]
    #[diagnostic(code(kotor::field_too_long))]
    FieldTooLong {
        /// Size of the slot
        max: usize,
        /// Size of the value
        actual: usize,
    },

    /// A delimited string was never terminated
    #[error("string starting at offset {offset:#x} is missing its {delimiter:#04x} terminator")]
    #[diagnostic(code(kotor::unterminated_string))]
    UnterminatedString {
        /// Position the string started at
        offset: usize,
        /// Expected terminator byte
        delimiter: u8,
    },

    /// Text cannot be represented in the target code page
    #[error("text {text:?} cannot be encoded as {encoding}")]
    #[diagnostic(code(kotor::unencodable_text))]
    UnencodableText {
        /// Offending text
        text: String,
        /// Name of the code page
        encoding: &'static str,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
