//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::types::GffFieldType;

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

    /// The header does not describe a GFF V3.2 file
    #[error("malformed GFF header: {reason}")]
    #[diagnostic(code(kotor_gff::malformed_header))]
    MalformedHeader {
        /// What is wrong with it
        reason: String,
    },

    /// A block declared by the header extends past the end of the file
    #[error("{block} block at {offset:#x} needs {size} bytes but the file is {available} bytes long")]
    #[diagnostic(code(kotor_gff::truncated_data))]
    TruncatedData {
        /// Name of the block
        block: &'static str,
        /// Declared start of the block
        offset: usize,
        /// Declared size of the block
        size: usize,
        /// Size of the file
        available: usize,
    },

    /// An index or offset points outside the block it addresses
    #[error("offset {offset:#x} is outside the {block} block (limit {limit:#x})")]
    #[diagnostic(code(kotor_gff::dangling_offset))]
    DanglingOffset {
        /// Name of the addressed block
        block: &'static str,
        /// The offending index or offset
        offset: usize,
        /// Size of the addressed block
        limit: usize,
    },

    /// A field carries a type tag outside the known set
    #[error("field {field} has unknown type tag {tag}")]
    #[diagnostic(code(kotor_gff::unknown_field_type))]
    UnknownFieldType {
        /// The type tag found
        tag: u32,
        /// Index of the field entry
        field: usize,
    },

    /// A struct is referenced more than once, which would make the tree a graph
    #[error("struct {index} is referenced more than once")]
    #[diagnostic(code(kotor_gff::struct_cycle))]
    StructCycle {
        /// Index of the struct entry
        index: usize,
    },

    /// Structs are nested deeper than [`GffStruct::MAX_DEPTH`](crate::GffStruct::MAX_DEPTH)
    #[error("struct {index} is nested {depth} levels deep, the limit is {max}")]
    #[diagnostic(code(kotor_gff::nesting_too_deep))]
    NestingTooDeep {
        /// Index of the struct entry, or of the struct in writing order
        index: usize,
        /// Levels below the root
        depth: usize,
        /// The deepest nesting allowed
        max: usize,
    },

    /// A label or resource name does not fit its fixed size slot
    #[error("{value:?} is {actual} bytes long, the limit is {max}")]
    #[diagnostic(code(kotor_gff::field_too_long))]
    FieldTooLong {
        /// The value that was too long
        value: String,
        /// Size of the slot
        max: usize,
        /// Encoded size of the value
        actual: usize,
    },

    /// A field holds a different kind of value than the one requested
    #[error("field {label:?} is a {actual}, not a {expected}")]
    #[diagnostic(code(kotor_gff::field_type_mismatch))]
    FieldTypeMismatch {
        /// Label of the field
        label: String,
        /// The requested kind
        expected: GffFieldType,
        /// The stored kind
        actual: GffFieldType,
    },

    /// No field with this label exists
    #[error("field {0:?} does not exist")]
    #[diagnostic(code(kotor_gff::field_not_found))]
    FieldNotFound(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
