//! In-memory GFF tree.

use derive_more::derive::{Display, From};
use indexmap::IndexMap;
use kotor_common::ResRef;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::locstring::LocalizedString;

/// Kind of a GFF field, with its on-disk type tag as discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum GffFieldType {
    Byte = 0,
    Char = 1,
    Word = 2,
    Short = 3,
    DWord = 4,
    Int = 5,
    DWord64 = 6,
    Int64 = 7,
    Float = 8,
    Double = 9,
    CExoString = 10,
    ResRef = 11,
    CExoLocString = 12,
    Void = 13,
    Struct = 14,
    List = 15,
    Orientation = 16,
    Vector = 17,
}

impl GffFieldType {
    /// The type tag stored in field entries
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Whether the value fits in the 4 byte slot of the field entry
    pub const fn is_inline(self) -> bool {
        matches!(
            self,
            GffFieldType::Byte
                | GffFieldType::Char
                | GffFieldType::Word
                | GffFieldType::Short
                | GffFieldType::DWord
                | GffFieldType::Int
                | GffFieldType::Float
        )
    }

    /// Whether the value lives in the field data block
    pub const fn is_complex(self) -> bool {
        !self.is_inline() && !matches!(self, GffFieldType::Struct | GffFieldType::List)
    }
}

impl TryFrom<u32> for GffFieldType {
    type Error = u32;

    fn try_from(value: u32) -> core::result::Result<Self, Self::Error> {
        Ok(match value {
            0 => GffFieldType::Byte,
            1 => GffFieldType::Char,
            2 => GffFieldType::Word,
            3 => GffFieldType::Short,
            4 => GffFieldType::DWord,
            5 => GffFieldType::Int,
            6 => GffFieldType::DWord64,
            7 => GffFieldType::Int64,
            8 => GffFieldType::Float,
            9 => GffFieldType::Double,
            10 => GffFieldType::CExoString,
            11 => GffFieldType::ResRef,
            12 => GffFieldType::CExoLocString,
            13 => GffFieldType::Void,
            14 => GffFieldType::Struct,
            15 => GffFieldType::List,
            16 => GffFieldType::Orientation,
            17 => GffFieldType::Vector,
            other => return Err(other),
        })
    }
}

/// Value of a GFF field
#[derive(Debug, Clone, PartialEq, From)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GffValue {
    Byte(u8),
    Char(i8),
    Word(u16),
    Short(i16),
    DWord(u32),
    Int(i32),
    DWord64(u64),
    Int64(i64),
    Float(f32),
    Double(f64),
    CExoString(String),
    ResRef(ResRef),
    CExoLocString(LocalizedString),
    Void(Vec<u8>),
    Struct(GffStruct),
    List(Vec<GffStruct>),
    /// Quaternion, `w x y z`
    Orientation([f32; 4]),
    Vector([f32; 3]),
}

impl GffValue {
    /// Kind of the value
    pub fn field_type(&self) -> GffFieldType {
        match self {
            GffValue::Byte(_) => GffFieldType::Byte,
            GffValue::Char(_) => GffFieldType::Char,
            GffValue::Word(_) => GffFieldType::Word,
            GffValue::Short(_) => GffFieldType::Short,
            GffValue::DWord(_) => GffFieldType::DWord,
            GffValue::Int(_) => GffFieldType::Int,
            GffValue::DWord64(_) => GffFieldType::DWord64,
            GffValue::Int64(_) => GffFieldType::Int64,
            GffValue::Float(_) => GffFieldType::Float,
            GffValue::Double(_) => GffFieldType::Double,
            GffValue::CExoString(_) => GffFieldType::CExoString,
            GffValue::ResRef(_) => GffFieldType::ResRef,
            GffValue::CExoLocString(_) => GffFieldType::CExoLocString,
            GffValue::Void(_) => GffFieldType::Void,
            GffValue::Struct(_) => GffFieldType::Struct,
            GffValue::List(_) => GffFieldType::List,
            GffValue::Orientation(_) => GffFieldType::Orientation,
            GffValue::Vector(_) => GffFieldType::Vector,
        }
    }
}

impl From<&str> for GffValue {
    fn from(value: &str) -> Self {
        GffValue::CExoString(value.to_owned())
    }
}

impl From<bool> for GffValue {
    fn from(value: bool) -> Self {
        GffValue::Byte(value.into())
    }
}

macro_rules! copy_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, label: &str) -> Result<$ty> {
            match self.field(label)? {
                GffValue::$variant(value) => Ok(*value),
                other => Err(mismatch(label, GffFieldType::$variant, other)),
            }
        }
    };
}

macro_rules! ref_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, label: &str) -> Result<&$ty> {
            match self.field(label)? {
                GffValue::$variant(value) => Ok(value),
                other => Err(mismatch(label, GffFieldType::$variant, other)),
            }
        }
    };
}

fn mismatch(label: &str, expected: GffFieldType, actual: &GffValue) -> Error {
    Error::FieldTypeMismatch {
        label: label.to_owned(),
        expected,
        actual: actual.field_type(),
    }
}

/// A struct of labelled fields
///
/// Field order is kept as read and labels are compared exactly, including case.
///
/// ```
/// use kotor_gff::{GffStruct, GffValue};
///
/// let mut root = GffStruct::root();
/// root.set_field("Tag", "bastila");
/// root.set_field("Plot", true);
/// root.add_list_element("ItemList", 0)?
///     .set_field("InventoryRes", GffValue::ResRef("g_w_lghtsbr01".parse()?));
///
/// assert_eq!(root.get_string("Tag")?, "bastila");
/// assert_eq!(root.get_byte("Plot")?, 1);
/// assert!(root.get_float("Tag").is_err());
/// assert_eq!(root.get_list("ItemList")?.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GffStruct {
    /// Id of the struct. List elements carry one chosen by the writer of the file.
    pub struct_id: u32,
    fields: IndexMap<String, GffValue>,
}

impl GffStruct {
    /// Id conventionally given to the top level struct
    pub const ROOT_ID: u32 = 0xFFFF_FFFF;

    /// Longest label a field can have
    pub const MAX_LABEL_LENGTH: usize = 16;

    /// Deepest nesting of structs below the root that files may carry
    ///
    /// Dropping, comparing and encoding a tree recurse once per level, so decoding refuses
    /// anything deeper.
    pub const MAX_DEPTH: usize = 512;

    /// An empty struct
    pub fn new(struct_id: u32) -> Self {
        Self {
            struct_id,
            fields: IndexMap::new(),
        }
    }

    /// An empty top level struct
    pub fn root() -> Self {
        Self::new(Self::ROOT_ID)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the struct has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &GffValue)> {
        self.fields.iter().map(|(label, value)| (label.as_str(), value))
    }

    /// Whether a field with this label exists
    pub fn contains_field(&self, label: &str) -> bool {
        self.fields.contains_key(label)
    }

    /// The field with this label
    pub fn get_field(&self, label: &str) -> Option<&GffValue> {
        self.fields.get(label)
    }

    /// The field with this label, mutably
    pub fn get_field_mut(&mut self, label: &str) -> Option<&mut GffValue> {
        self.fields.get_mut(label)
    }

    /// Store a field, replacing an existing one in place. Returns the previous value.
    pub fn set_field(&mut self, label: impl Into<String>, value: impl Into<GffValue>) -> Option<GffValue> {
        self.fields.insert(label.into(), value.into())
    }

    /// Remove a field, keeping the order of the others
    pub fn remove_field(&mut self, label: &str) -> Option<GffValue> {
        self.fields.shift_remove(label)
    }

    /// Store an empty struct under `label` and return it for filling in
    ///
    /// An existing struct field is replaced; any other kind of field is left alone and reported
    /// as a mismatch.
    pub fn add_struct_field(&mut self, label: impl Into<String>, struct_id: u32) -> Result<&mut GffStruct> {
        let label = label.into();
        let value = self
            .fields
            .entry(label.clone())
            .or_insert_with(|| GffValue::Struct(GffStruct::new(struct_id)));

        match value {
            GffValue::Struct(child) => {
                *child = GffStruct::new(struct_id);
                Ok(child)
            }
            other => Err(mismatch(&label, GffFieldType::Struct, other)),
        }
    }

    /// Append an empty struct to the list under `label`, creating the list on first use
    pub fn add_list_element(&mut self, label: impl Into<String>, struct_id: u32) -> Result<&mut GffStruct> {
        let label = label.into();
        let value = self
            .fields
            .entry(label.clone())
            .or_insert_with(|| GffValue::List(Vec::new()));

        match value {
            GffValue::List(list) => {
                list.push(GffStruct::new(struct_id));
                let index = list.len() - 1;
                Ok(&mut list[index])
            }
            other => Err(mismatch(&label, GffFieldType::List, other)),
        }
    }

    fn field(&self, label: &str) -> Result<&GffValue> {
        self.fields
            .get(label)
            .ok_or_else(|| Error::FieldNotFound(label.to_owned()))
    }

    copy_getter!(
        /// A `Byte` field
        get_byte, Byte, u8
    );
    copy_getter!(
        /// A `Char` field
        get_char, Char, i8
    );
    copy_getter!(
        /// A `Word` field
        get_word, Word, u16
    );
    copy_getter!(
        /// A `Short` field
        get_short, Short, i16
    );
    copy_getter!(
        /// A `DWord` field
        get_dword, DWord, u32
    );
    copy_getter!(
        /// An `Int` field
        get_int, Int, i32
    );
    copy_getter!(
        /// A `DWord64` field
        get_dword64, DWord64, u64
    );
    copy_getter!(
        /// An `Int64` field
        get_int64, Int64, i64
    );
    copy_getter!(
        /// A `Float` field
        get_float, Float, f32
    );
    copy_getter!(
        /// A `Double` field
        get_double, Double, f64
    );
    ref_getter!(
        /// A `CExoString` field
        get_string, CExoString, str
    );
    ref_getter!(
        /// A `ResRef` field
        get_resref, ResRef, ResRef
    );
    ref_getter!(
        /// A `CExoLocString` field
        get_locstring, CExoLocString, LocalizedString
    );
    ref_getter!(
        /// A `Void` field
        get_void, Void, [u8]
    );
    ref_getter!(
        /// A `Struct` field
        get_struct, Struct, GffStruct
    );
    ref_getter!(
        /// A `List` field
        get_list, List, [GffStruct]
    );
    copy_getter!(
        /// An `Orientation` field
        get_orientation, Orientation, [f32; 4]
    );
    copy_getter!(
        /// A `Vector` field
        get_vector, Vector, [f32; 3]
    );

    /// A `Struct` field, mutably
    pub fn get_struct_mut(&mut self, label: &str) -> Result<&mut GffStruct> {
        match self.fields.get_mut(label) {
            Some(GffValue::Struct(value)) => Ok(value),
            Some(other) => Err(mismatch(label, GffFieldType::Struct, other)),
            None => Err(Error::FieldNotFound(label.to_owned())),
        }
    }

    /// A `List` field, mutably
    pub fn get_list_mut(&mut self, label: &str) -> Result<&mut Vec<GffStruct>> {
        match self.fields.get_mut(label) {
            Some(GffValue::List(value)) => Ok(value),
            Some(other) => Err(mismatch(label, GffFieldType::List, other)),
            None => Err(Error::FieldNotFound(label.to_owned())),
        }
    }
}

/// Four character file type tag, such as `UTI ` or `GFF `
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct FileType([u8; 4]);

impl FileType {
    /// Tag for files without a more specific type
    pub const GFF: FileType = FileType(*b"GFF ");

    /// Wrap a tag
    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    /// The tag as stored on disk
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub(crate) fn is_valid(tag: &[u8; 4]) -> bool {
        tag.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl Default for FileType {
    fn default() -> Self {
        Self::GFF
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{}", byte as char)?;
        }
        Ok(())
    }
}

impl FromStr for FileType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let tag: [u8; 4] = value
            .as_bytes()
            .try_into()
            .map_err(|_| Error::MalformedHeader {
                reason: format!("file type {value:?} is not four characters"),
            })?;
        if !Self::is_valid(&tag) {
            return Err(Error::MalformedHeader {
                reason: format!("file type {value:?} is not printable ascii"),
            });
        }
        Ok(Self(tag))
    }
}

impl TryFrom<String> for FileType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self {
        value.to_string()
    }
}

/// A decoded GFF file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gff {
    /// What the file contains
    pub file_type: FileType,
    /// The top level struct
    pub root: GffStruct,
}

impl Default for Gff {
    fn default() -> Self {
        Self::new(FileType::GFF)
    }
}

impl Gff {
    /// An empty file of the given type
    pub fn new(file_type: FileType) -> Self {
        Self {
            file_type,
            root: GffStruct::root(),
        }
    }
}

#[cfg(test)]
mod test {
    use kotor_common::ResRef;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::types::{FileType, GffFieldType, GffStruct, GffValue};

    #[test]
    fn field_type_tags() {
        assert_eq!(GffFieldType::try_from(12), Ok(GffFieldType::CExoLocString));
        assert_eq!(GffFieldType::try_from(17), Ok(GffFieldType::Vector));
        assert_eq!(GffFieldType::try_from(18), Err(18));
        assert!(GffFieldType::Float.is_inline());
        assert!(!GffFieldType::Double.is_inline());
        assert!(GffFieldType::Double.is_complex());
        assert!(!GffFieldType::List.is_complex());
        assert_eq!(GffFieldType::ResRef.tag(), 11);
    }

    #[test]
    fn typed_access_is_strict() -> Result<()> {
        let mut root = GffStruct::root();
        root.set_field("Tag", "sith_trooper");
        root.set_field("HP", GffValue::Short(30));

        assert_eq!(root.get_string("Tag")?, "sith_trooper");
        assert_eq!(root.get_short("HP")?, 30);

        let result = root.get_float("Tag");
        assert!(matches!(
            result,
            Err(Error::FieldTypeMismatch {
                expected: GffFieldType::Float,
                actual: GffFieldType::CExoString,
                ..
            })
        ));
        assert!(matches!(root.get_int("HP"), Err(Error::FieldTypeMismatch { .. })));
        assert!(matches!(root.get_int("Missing"), Err(Error::FieldNotFound(_))));

        Ok(())
    }

    #[test]
    fn mutation_keeps_order() -> Result<()> {
        let mut root = GffStruct::root();
        root.set_field("A", GffValue::Byte(1));
        root.set_field("B", GffValue::Byte(2));
        root.set_field("C", GffValue::Byte(3));
        root.set_field("A", GffValue::Int(4));
        root.remove_field("B");

        let labels: Vec<_> = root.fields().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["A", "C"]);
        assert_eq!(root.get_int("A")?, 4);

        Ok(())
    }

    #[test]
    fn nested_builders() -> Result<()> {
        let mut root = GffStruct::root();
        for index in 0..3 {
            root.add_list_element("StoreList", index)?
                .set_field("ID", GffValue::DWord(index));
        }
        root.add_struct_field("Position", 7)?
            .set_field("X", GffValue::Float(1.5));

        let list = root.get_list("StoreList")?;
        assert_eq!(list.len(), 3);
        assert_eq!(list[2].struct_id, 2);
        assert_eq!(root.get_struct("Position")?.get_float("X")?, 1.5);

        root.set_field("Tag", "x");
        assert!(root.add_list_element("Tag", 0).is_err());

        root.get_list_mut("StoreList")?.clear();
        assert!(root.get_list("StoreList")?.is_empty());

        Ok(())
    }

    #[test]
    fn file_types() -> Result<()> {
        assert_eq!("UTI ".parse::<FileType>()?, FileType::new(*b"UTI "));
        assert_eq!(FileType::GFF.to_string(), "GFF ");
        assert!("UTIX ".parse::<FileType>().is_err());
        assert!("U\u{1}I ".parse::<FileType>().is_err());

        let resref: ResRef = "g_w_blstrpstl001".parse()?;
        assert_eq!(GffValue::from(resref).field_type(), GffFieldType::ResRef);

        Ok(())
    }
}
