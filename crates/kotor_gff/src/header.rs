//! Fixed size records of the GFF layout.

use binrw::{BinRead, BinWrite};

/// Version tag of the only supported layout
pub const VERSION: [u8; 4] = *b"V3.2";

/// GFF file header
///
/// Every block is described by its offset from the start of the file and a count. The count is
/// a number of entries for structs, fields and labels and a number of bytes for the other blocks.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct GffHeader {
    /// File type tag, such as `UTI `
    pub file_type: [u8; 4],
    /// Version tag, `V3.2`
    pub version: [u8; 4],
    pub struct_offset: u32,
    pub struct_count: u32,
    pub field_offset: u32,
    pub field_count: u32,
    pub label_offset: u32,
    pub label_count: u32,
    pub field_data_offset: u32,
    pub field_data_size: u32,
    pub field_indices_offset: u32,
    pub field_indices_size: u32,
    pub list_indices_offset: u32,
    pub list_indices_size: u32,
}

impl GffHeader {
    /// Size of the header on disk
    pub const SIZE: usize = 56;
}

/// Struct entry
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct StructEntry {
    pub struct_id: u32,
    /// Index of the only field when `field_count` is 1, otherwise a byte offset into the field
    /// indices block (`0xFFFFFFFF` for an empty struct)
    pub data_or_offset: u32,
    pub field_count: u32,
}

impl StructEntry {
    /// Size of an entry on disk
    pub const SIZE: usize = 12;
}

/// Field entry
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct FieldEntry {
    pub field_type: u32,
    pub label_index: u32,
    /// The value itself for inline kinds, a struct index, or a byte offset into the field data
    /// or list indices block
    pub data_or_offset: u32,
}

impl FieldEntry {
    /// Size of an entry on disk
    pub const SIZE: usize = 12;
}

/// Size of a label on disk
pub const LABEL_SIZE: usize = 16;
