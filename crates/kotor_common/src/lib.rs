//! Shared building blocks for the **KotOR** (BioWare Odyssey engine) file format crates.
//!
//! Every format in this workspace is little-endian and is read from an in-memory buffer.
//! This crate provides:
//!
//! - [`BinaryReader`] / [`BinaryWriter`]: position-tracked primitive reads and writes over a byte
//!   buffer, failing with [`Error::OutOfBounds`] instead of panicking.
//! - [`ResRef`]: the 16 byte resource reference used as a filename-like key.
//! - [`Language`], [`Gender`] and [`LanguageId`]: the language/gender pair used by localized strings
//!   and talk tables.
//! - [`StrRef`] and the [`TalkTable`] trait: the talk table lookup capability consumed by
//!   localized string resolution.
//!
//! ## Text encoding
//!
//! The games store text as single or double byte code page strings, not UTF-8. The
//! [`text`] module maps each [`Language`] to its code page and converts with `encoding_rs`.

pub mod binary;
pub mod error;
pub mod language;
pub mod resref;
pub mod talk;
pub mod text;

pub use binary::{BinaryReader, BinaryWriter};
pub use error::{Error, Result};
pub use language::{Gender, Language, LanguageId};
pub use resref::ResRef;
pub use talk::{StrRef, TalkTable};
