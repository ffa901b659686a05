//! Talk table references and the lookup capability used to resolve them.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::language::Gender;

/// Index into a talk table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StrRef(u32);

impl StrRef {
    /// Marks a string that is not backed by the talk table
    pub const INVALID: StrRef = StrRef(0xFFFF_FFFF);

    /// Highest index the format can address
    pub const MAX_INDEX: u32 = 0x00FF_FFFF;

    /// Wrap a raw index
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw index
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this is the "no talk table entry" marker
    pub const fn is_invalid(self) -> bool {
        self.0 == Self::INVALID.0
    }

    /// Whether the index is inside the addressable range.
    ///
    /// Values between `0x01000000` and `0xFFFFFFFE` are reserved and never resolve.
    pub const fn is_addressable(self) -> bool {
        self.0 <= Self::MAX_INDEX
    }
}

impl Default for StrRef {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<u32> for StrRef {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<StrRef> for u32 {
    fn from(value: StrRef) -> Self {
        value.0
    }
}

impl From<i32> for StrRef {
    /// 2DA files write the invalid reference as `-1`
    fn from(value: i32) -> Self {
        Self(value as u32)
    }
}

/// Talk table lookup capability
///
/// Implemented by the TLK reader, and by a plain map for tests and tools that keep strings in
/// memory. Returns `Some` for an entry that exists, even when its text is empty.
pub trait TalkTable {
    /// Look up the text of `strref` in the table for `gender`
    fn lookup(&self, strref: StrRef, gender: Gender) -> Option<String>;
}

impl<T: TalkTable + ?Sized> TalkTable for &T {
    fn lookup(&self, strref: StrRef, gender: Gender) -> Option<String> {
        (**self).lookup(strref, gender)
    }
}

/// No talk table available; every lookup misses
impl TalkTable for () {
    fn lookup(&self, _strref: StrRef, _gender: Gender) -> Option<String> {
        None
    }
}

/// A single gender-less table held in memory
impl<S: std::hash::BuildHasher> TalkTable for HashMap<StrRef, String, S> {
    fn lookup(&self, strref: StrRef, _gender: Gender) -> Option<String> {
        self.get(&strref).cloned()
    }
}

/// A gendered table held in memory
impl<S: std::hash::BuildHasher> TalkTable for HashMap<(StrRef, Gender), String, S> {
    fn lookup(&self, strref: StrRef, gender: Gender) -> Option<String> {
        self.get(&(strref, gender)).cloned()
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use crate::language::Gender;
    use crate::talk::{StrRef, TalkTable};

    #[test]
    fn strref_ranges() {
        assert!(StrRef::INVALID.is_invalid());
        assert!(!StrRef::INVALID.is_addressable());
        assert!(StrRef::new(0x00FF_FFFF).is_addressable());
        assert!(!StrRef::new(0x0100_0000).is_addressable());
        assert_eq!(StrRef::from(-1i32), StrRef::INVALID);
        assert_eq!(StrRef::default(), StrRef::INVALID);
    }

    #[test]
    fn map_lookup() {
        let table = HashMap::from([(StrRef::new(42), "Talk table text".to_string())]);
        assert_eq!(
            table.lookup(StrRef::new(42), Gender::Female).as_deref(),
            Some("Talk table text")
        );
        assert_eq!(table.lookup(StrRef::new(43), Gender::Male), None);
        assert_eq!(().lookup(StrRef::new(42), Gender::Male), None);
    }
}
