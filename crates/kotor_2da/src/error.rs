//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::schema::ColumnType;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`kotor_common::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    BinaryError(#[from] kotor_common::Error),

    /// The file does not start with a known 2DA signature
    #[error("invalid 2DA signature {signature:?}")]
    #[diagnostic(code(kotor_2da::malformed_header), help("expected \"2DA V2.b\" or \"2DA V2.0\""))]
    MalformedHeader {
        /// The bytes found where the signature should be
        signature: String,
    },

    /// Declared sizes or offsets point past the data that is actually present
    #[error("truncated 2DA data at offset {offset:#x}: {reason}")]
    #[diagnostic(code(kotor_2da::truncated_data))]
    TruncatedData {
        /// Position in the file where the problem was found
        offset: usize,
        /// What was expected there
        reason: String,
    },

    /// A column with this name already exists
    #[error("duplicate column {0:?}")]
    #[diagnostic(code(kotor_2da::duplicate_column))]
    DuplicateColumn(String),

    /// No column with this name exists
    #[error("unknown column {0:?}")]
    #[diagnostic(code(kotor_2da::column_not_found))]
    ColumnNotFound(String),

    /// No row with this index exists
    #[error("row {0} does not exist")]
    #[diagnostic(code(kotor_2da::row_not_found))]
    RowNotFound(usize),

    /// The table cannot be represented in the binary format
    #[error("{what} of {count} exceeds the binary format limit of {max}")]
    #[diagnostic(code(kotor_2da::table_too_large))]
    TableTooLarge {
        /// Which limit was hit
        what: &'static str,
        /// The value found
        count: usize,
        /// The limit
        max: usize,
    },

    /// A cell could not be read as the requested type
    #[error(transparent)]
    #[diagnostic(transparent)]
    ParseError(#[from] ParseError),
}

/// A cell whose text does not parse as the type the caller asked for
///
/// This is recoverable: callers usually substitute the documented default of the column.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("cell ({row}, {column:?}) holds {value:?}, which is not a valid {expected}")]
#[diagnostic(code(kotor_2da::parse_error))]
pub struct ParseError {
    /// Row index of the cell
    pub row: usize,
    /// Column name of the cell
    pub column: String,
    /// Text stored in the cell
    pub value: String,
    /// Type the caller asked for
    pub expected: ColumnType,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
