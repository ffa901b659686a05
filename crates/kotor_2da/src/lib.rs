//! This library handles reading from and creating **2DA** tables used by *Star Wars: Knights of the
//! Old Republic* and its sequel.
//!
//! # 2DA Format Documentation
//!
//! A 2DA file is a two dimensional table of text cells addressed by a numeric row index and a
//! column name. The games use them for almost every rule table (`appearance.2da`,
//! `baseitems.2da`, `iprp_*.2da`, ...). Every cell is stored as text; whether a column holds
//! integers, floats, resource references or talk table references is decided by the code reading
//! the table, so the same file can be read with a different column layout by each game. This
//! crate therefore never bakes in a column schema: see [`ColumnSchema`] and the `cell_as_*`
//! accessors on [`TwoDA`].
//!
//! ## Binary File Structure (`2DA V2.b`)
//!
//! | Offset (bytes) | Field                  | Description                                                   |
//! |----------------|------------------------|---------------------------------------------------------------|
//! | 0x0000         | Signature              | 8 bytes: `"2DA V2.b"`                                         |
//! | 0x0008         | Newline                | 1 byte: `0x0A`                                                |
//! | 0x0009         | Column Names           | Each name terminated by `\t`, the list terminated by `\0`     |
//! | ...            | Row Count              | 4 bytes: number of rows                                       |
//! | ...            | Row Labels             | Row count labels, each terminated by `\t`                     |
//! | ...            | Cell Offsets           | Rows * columns `u16` offsets into the cell data, row-major    |
//! | ...            | Cell Data Size         | 2 bytes: size of the cell data block                          |
//! | ...            | Cell Data              | NUL terminated strings, each distinct value stored once       |
//!
//! Empty cells are stored as the empty string. `****`, the empty marker of the text format, is
//! also read as empty.
//!
//! ## Text File Structure (`2DA V2.0`)
//!
//! ```text
//! 2DA V2.0
//! DEFAULT: ****
//!         label        modela
//! 0       Bastila      "p_bast bb"
//! 1       ****         ****
//! ```
//!
//! The second line is either blank or holds a `DEFAULT:` value. The third line names the columns,
//! every following line is a row label followed by one value per column. Values containing
//! whitespace are double quoted; `****` marks an empty cell.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.2da`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Limits**: the binary format addresses cells with 16 bit offsets, so the cell data block
//!   (and, by convention, the row and column counts) must fit in 16 bits
//!

pub mod error;
pub mod read;
pub mod schema;
pub mod types;
pub mod write;

pub use error::{Error, ParseError, Result};
pub use schema::{ColumnSchema, ColumnType, TypedCell, TypedRow};
pub use types::{Cell, Row, TwoDA};
