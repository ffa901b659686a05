//! This library handles reading from and creating **TLK** talk tables used by *Star Wars: Knights
//! of the Old Republic* and its sequel.
//!
//! # TLK Format Documentation
//!
//! A talk table holds every player visible string of a game in one language. Other files refer
//! to a string by its index, the string reference ([`StrRef`](kotor_common::StrRef)). Languages
//! with gendered text ship a second table, `dialogf.tlk`, with the same indices.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Signature              | 8 bytes: `"TLK V3.0"`                                      |
//! | 0x0008         | Language ID            | 4 bytes: language of every string, decides the code page   |
//! | 0x000C         | String Count           | 4 bytes: number of entries                                 |
//! | 0x0010         | Strings Offset         | 4 bytes: start of the string data                          |
//!
//! ### String Entries
//!
//! The header is followed by one 40 byte entry per string:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Flags                  | 4 bytes: 0x1 text, 0x2 sound, 0x4 sound length present  |
//! | 0x0004         | Sound                  | 16 bytes: NUL padded voice over resource name           |
//! | 0x0014         | Volume Variance        | 4 bytes: unused                                         |
//! | 0x0018         | Pitch Variance         | 4 bytes: unused                                         |
//! | 0x001C         | Text Offset            | 4 bytes: relative to the strings offset                 |
//! | 0x0020         | Text Length            | 4 bytes: in bytes                                       |
//! | 0x0024         | Sound Length           | 4 bytes: float, seconds                                 |
//!
//! ### String Data
//!
//! Text of every entry, not NUL terminated, in the code page of the table's language.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tlk`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Lookup**: [`TalkTableFile`] and [`TalkTables`] implement
//!   [`TalkTable`](kotor_common::TalkTable), so they can resolve localized strings directly
//!

pub mod error;
pub mod header;
pub mod read;
pub mod types;
pub mod write;

pub use error::{Error, Result};
pub use types::{TalkTableEntry, TalkTableFile, TalkTables};
