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

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`kotor_common::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    BinaryError(#[from] kotor_common::Error),

    /// The header does not describe a TLK V3.0 file
    #[error("malformed TLK header: {reason}")]
    #[diagnostic(code(kotor_tlk::malformed_header))]
    MalformedHeader {
        /// What is wrong with it
        reason: String,
    },

    /// The entry table or a string extends past the end of the file
    #[error("{what} at {offset:#x} needs {size} bytes but the file is {available} bytes long")]
    #[diagnostic(code(kotor_tlk::truncated_data))]
    TruncatedData {
        /// What was being read
        what: &'static str,
        /// Where it starts
        offset: usize,
        /// How many bytes it needs
        size: usize,
        /// Size of the file
        available: usize,
    },

    /// More entries than a string reference can address
    #[error("{count} entries exceed the {max} addressable string references")]
    #[diagnostic(code(kotor_tlk::table_too_large))]
    TableTooLarge {
        /// Number of entries
        count: usize,
        /// Highest number of entries
        max: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
