//! Fixed size records of the TLK layout.

use binrw::{BinRead, BinWrite};

/// Signature and version of the only supported layout
pub const SIGNATURE: [u8; 8] = *b"TLK V3.0";

/// TLK file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TlkHeader {
    /// `TLK V3.0`
    pub signature: [u8; 8],
    pub language_id: u32,
    pub string_count: u32,
    /// Start of the string data, which every entry's text offset is relative to
    pub strings_offset: u32,
}

impl TlkHeader {
    /// Size of the header on disk, the entry table follows immediately
    pub const SIZE: usize = 20;
}

/// String entry
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct StringEntry {
    pub flags: u32,
    /// NUL padded voice over resource name
    pub sound: [u8; 16],
    pub volume_variance: u32,
    pub pitch_variance: u32,
    pub text_offset: u32,
    pub text_length: u32,
    pub sound_length: f32,
}

impl StringEntry {
    /// Size of an entry on disk
    pub const SIZE: usize = 40;
}
