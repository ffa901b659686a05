//! This library handles reading from and creating **GFF** files used by *Star Wars: Knights of the
//! Old Republic* and its sequel.
//!
//! # GFF Format Documentation
//!
//! The Generic File Format is a tree of structs holding labelled, typed fields. Blueprints
//! (`.utc`, `.uti`, `.utp`, ...), dialogues, area files and save games are all GFF files that
//! differ only in their four byte file type and in which fields the engine reads. The
//! [`templates`] module gives typed access to the common blueprints; everything else is reachable
//! through [`GffStruct`].
//!
//! ## File Structure (`V3.2`)
//!
//! | Offset (bytes) | Field                  | Description                                                   |
//! |----------------|------------------------|---------------------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: e.g. `"UTI "`                                        |
//! | 0x0004         | Version                | 4 bytes: `"V3.2"`                                             |
//! | 0x0008         | Struct Offset / Count  | 2 x 4 bytes: array of 12 byte struct entries                  |
//! | 0x0010         | Field Offset / Count   | 2 x 4 bytes: array of 12 byte field entries                   |
//! | 0x0018         | Label Offset / Count   | 2 x 4 bytes: array of 16 byte NUL padded labels               |
//! | 0x0020         | Field Data             | 2 x 4 bytes: offset and size of the complex value block       |
//! | 0x0028         | Field Indices          | 2 x 4 bytes: offset and size of the field index block         |
//! | 0x0030         | List Indices           | 2 x 4 bytes: offset and size of the list index block          |
//!
//! A struct entry is `(struct id, data or offset, field count)`: a single field is referenced
//! directly, more fields through a run of `u32` indices in the field index block.
//!
//! A field entry is `(type, label index, data or offset)`. Values of 4 bytes or less are stored
//! inline; bigger values live in the field data block. A struct field holds the index of the
//! child struct and a list field holds an offset into the list index block, where a count is
//! followed by that many struct indices.
//!
//! ## Field Types
//!
//! | Type | Name          | Storage                                                         |
//! |------|---------------|-----------------------------------------------------------------|
//! | 0-5  | Byte to Int   | Inline, zero or sign extended                                   |
//! | 6, 7 | DWord64/Int64 | 8 bytes of field data                                           |
//! | 8    | Float         | Inline                                                          |
//! | 9    | Double        | 8 bytes of field data                                           |
//! | 10   | CExoString    | `u32` length + text                                             |
//! | 11   | ResRef        | `u8` length + text, at most 16 bytes                            |
//! | 12   | CExoLocString | Size, string ref, count, then `(language id, length, text)`     |
//! | 13   | Void          | `u32` length + bytes                                            |
//! | 14   | Struct        | Index of the child struct                                       |
//! | 15   | List          | Offset into the list index block                                |
//! | 16   | Orientation   | 4 floats of field data                                          |
//! | 17   | Vector        | 3 floats of field data                                          |
//!
//! ## Localized Strings
//!
//! A [`LocalizedString`] pairs a talk table reference with inline substrings keyed by language
//! and gender. [`LocalizedString::resolve`] picks the text to display: the requested substring,
//! then the talk table, then (optionally) any other substring.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian throughout
//! - **Root Struct**: always struct 0, conventionally with id `0xFFFFFFFF`
//! - **Labels**: at most 16 bytes, shared between every field with the same name
//!

pub mod error;
pub mod header;
pub mod locstring;
pub mod read;
pub mod templates;
pub mod types;
pub mod write;

pub use error::{Error, Result};
pub use locstring::{LocalizedString, ResolveOptions, Resolved};
pub use types::{FileType, Gff, GffFieldType, GffStruct, GffValue};
