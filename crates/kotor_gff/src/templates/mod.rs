//! Typed views over blueprint templates.
//!
//! Each template owns the root struct of its file and exposes the fields the games read from it.
//! Getters return the documented default when a field is absent and a
//! [`FieldTypeMismatch`](crate::Error::FieldTypeMismatch) when it holds something else. Fields a
//! template does not know about, such as the additions of the second game, stay in the backing
//! struct and are written back unchanged.
//!
//! ```
//! use kotor_gff::templates::{Template, Utp};
//!
//! let mut chest = Utp::default();
//! chest.set_tag("footlocker01");
//! chest.set_locked(true);
//! chest.set_open_lock_dc(18);
//!
//! let bytes = chest.encode()?;
//! let chest = Utp::decode(&bytes)?;
//! assert!(chest.locked()?);
//! assert_eq!(chest.open_lock_dc()?, 18);
//! assert_eq!(chest.close_lock_dc()?, None);
//! # Ok::<(), kotor_gff::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::types::{FileType, Gff, GffStruct};

mod utc;
mod utd;
mod ute;
mod uti;
mod utm;
mod utp;
mod uts;
mod utt;
mod utw;

pub use utc::{CreatureClass, Utc};
pub use utd::Utd;
pub use ute::{Ute, UteCreature};
pub use uti::{Uti, UtiProperty};
pub use utm::{Utm, UtmItem};
pub use utp::{InventoryItem, Utp};
pub use uts::Uts;
pub use utt::Utt;
pub use utw::Utw;

/// A blueprint backed by the root struct of a GFF file
pub trait Template: Sized {
    /// File type tag of the template
    const FILE_TYPE: FileType;

    /// Wrap a root struct without checking it
    fn from_struct(root: GffStruct) -> Self;

    /// The backing struct
    fn as_struct(&self) -> &GffStruct;

    /// The backing struct, mutably
    fn as_struct_mut(&mut self) -> &mut GffStruct;

    /// Unwrap the backing struct
    fn into_struct(self) -> GffStruct;

    /// Wrap a decoded file, checking its file type
    fn from_gff(gff: Gff) -> Result<Self> {
        if gff.file_type != Self::FILE_TYPE {
            return Err(Error::MalformedHeader {
                reason: format!("expected a {} file, found {}", Self::FILE_TYPE, gff.file_type),
            });
        }
        Ok(Self::from_struct(gff.root))
    }

    /// Turn back into a file
    fn into_gff(self) -> Gff {
        Gff {
            file_type: Self::FILE_TYPE,
            root: self.into_struct(),
        }
    }

    /// Decode a template file
    fn decode(data: &[u8]) -> Result<Self> {
        Self::from_gff(Gff::decode(data)?)
    }

    /// Encode as a template file
    fn encode(&self) -> Result<Vec<u8>> {
        Gff {
            file_type: Self::FILE_TYPE,
            root: self.as_struct().clone(),
        }
        .encode()
    }
}

/// Substitute `default` when the field is absent
pub(crate) fn or_default<T>(value: Result<T>, default: T) -> Result<T> {
    match value {
        Err(Error::FieldNotFound(_)) => Ok(default),
        value => value,
    }
}

/// `None` when the field is absent
pub(crate) fn optional<T>(value: Result<T>) -> Result<Option<T>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(Error::FieldNotFound(_)) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Elements of a list field, empty when the list is absent
pub(crate) fn elements<T: From<GffStruct>>(root: &GffStruct, label: &str) -> Result<Vec<T>> {
    Ok(or_default(root.get_list(label), &[][..])?
        .iter()
        .cloned()
        .map(T::from)
        .collect())
}

/// Getter and setter pairs for template fields
///
/// `flag` fields are bytes read as booleans. Kinds prefixed with `opt_` only exist in some
/// versions of the games and read as `None` when absent.
macro_rules! template_fields {
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, flag) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<bool> {
            Ok($crate::templates::or_default(self.root.get_byte($label), 0)? != 0)
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: bool) {
            self.root.set_field($label, $crate::GffValue::Byte(value.into()));
        }
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, opt_flag) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<Option<bool>> {
            Ok($crate::templates::optional(self.root.get_byte($label))?.map(|value| value != 0))
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: bool) {
            self.root.set_field($label, $crate::GffValue::Byte(value.into()));
        }
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, string) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<&str> {
            $crate::templates::or_default(self.root.get_string($label), "")
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: impl Into<String>) {
            self.root.set_field($label, $crate::GffValue::CExoString(value.into()));
        }
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, resref) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<kotor_common::ResRef> {
            Ok($crate::templates::optional(self.root.get_resref($label))?
                .cloned()
                .unwrap_or_default())
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: kotor_common::ResRef) {
            self.root.set_field($label, $crate::GffValue::ResRef(value));
        }
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, locstring) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<$crate::LocalizedString> {
            Ok($crate::templates::optional(self.root.get_locstring($label))?
                .cloned()
                .unwrap_or_default())
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: $crate::LocalizedString) {
            self.root.set_field($label, $crate::GffValue::CExoLocString(value));
        }
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, byte, $default:expr) => {
        template_fields!(@number $(#[$doc])* $label, $get, $set, get_byte, Byte, u8, $default);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, word, $default:expr) => {
        template_fields!(@number $(#[$doc])* $label, $get, $set, get_word, Word, u16, $default);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, short, $default:expr) => {
        template_fields!(@number $(#[$doc])* $label, $get, $set, get_short, Short, i16, $default);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, dword, $default:expr) => {
        template_fields!(@number $(#[$doc])* $label, $get, $set, get_dword, DWord, u32, $default);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, int, $default:expr) => {
        template_fields!(@number $(#[$doc])* $label, $get, $set, get_int, Int, i32, $default);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, float, $default:expr) => {
        template_fields!(@number $(#[$doc])* $label, $get, $set, get_float, Float, f32, $default);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, opt_byte) => {
        template_fields!(@optional $(#[$doc])* $label, $get, $set, get_byte, Byte, u8);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, opt_int) => {
        template_fields!(@optional $(#[$doc])* $label, $get, $set, get_int, Int, i32);
    };
    (@field $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, opt_float) => {
        template_fields!(@optional $(#[$doc])* $label, $get, $set, get_float, Float, f32);
    };

    (@number $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, $getter:ident, $variant:ident, $ty:ty, $default:expr) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<$ty> {
            $crate::templates::or_default(self.root.$getter($label), $default)
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: $ty) {
            self.root.set_field($label, $crate::GffValue::$variant(value));
        }
    };
    (@optional $(#[$doc:meta])* $label:literal, $get:ident, $set:ident, $getter:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $get(&self) -> $crate::Result<Option<$ty>> {
            $crate::templates::optional(self.root.$getter($label))
        }

        #[doc = concat!("Set `", $label, "`")]
        pub fn $set(&mut self, value: $ty) {
            self.root.set_field($label, $crate::GffValue::$variant(value));
        }
    };

    ($($(#[$doc:meta])* $label:literal => $get:ident, $set:ident: $kind:ident $(= $default:expr)?;)*) => {
        $(template_fields!(@field $(#[$doc])* $label, $get, $set, $kind $(, $default)?);)*
    };
}

pub(crate) use template_fields;

/// Boilerplate shared by templates and list elements: a wrapper around one struct
macro_rules! gff_wrapper {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name {
            root: $crate::GffStruct,
        }

        impl From<$crate::GffStruct> for $name {
            fn from(root: $crate::GffStruct) -> Self {
                Self { root }
            }
        }

        impl From<$name> for $crate::GffStruct {
            fn from(value: $name) -> Self {
                value.root
            }
        }

        impl AsRef<$crate::GffStruct> for $name {
            fn as_ref(&self) -> &$crate::GffStruct {
                &self.root
            }
        }
    };
    ($(#[$doc:meta])* $name:ident, $file_type:literal) => {
        gff_wrapper!($(#[$doc])* $name);

        impl Default for $name {
            fn default() -> Self {
                Self {
                    root: $crate::GffStruct::root(),
                }
            }
        }

        impl $crate::templates::Template for $name {
            const FILE_TYPE: $crate::FileType = $crate::FileType::new(*$file_type);

            fn from_struct(root: $crate::GffStruct) -> Self {
                Self { root }
            }

            fn as_struct(&self) -> &$crate::GffStruct {
                &self.root
            }

            fn as_struct_mut(&mut self) -> &mut $crate::GffStruct {
                &mut self.root
            }

            fn into_struct(self) -> $crate::GffStruct {
                self.root
            }
        }
    };
}

pub(crate) use gff_wrapper;

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::templates::{Template, Uti, Utp};
    use crate::types::{FileType, Gff, GffValue};

    #[test]
    fn file_type_is_checked() -> Result<()> {
        let gff = Gff::new(FileType::new(*b"UTI "));
        assert!(Uti::from_gff(gff.clone()).is_ok());
        assert!(matches!(Utp::from_gff(gff), Err(Error::MalformedHeader { .. })));

        let bytes = Uti::default().encode()?;
        assert!(matches!(Utp::decode(&bytes), Err(Error::MalformedHeader { .. })));

        Ok(())
    }

    #[test]
    fn defaults_and_mismatches() -> Result<()> {
        let mut placeable = Utp::default();
        assert!(!placeable.locked()?);
        assert_eq!(placeable.tag()?, "");
        assert!(placeable.template_resref()?.is_blank());

        placeable
            .as_struct_mut()
            .set_field("Locked", GffValue::CExoString("yes".into()));
        assert!(matches!(
            placeable.locked(),
            Err(Error::FieldTypeMismatch { .. })
        ));

        Ok(())
    }

    #[test]
    fn into_gff_keeps_file_type() {
        let gff = Utp::default().into_gff();
        assert_eq!(gff.file_type, FileType::new(*b"UTP "));
    }
}
