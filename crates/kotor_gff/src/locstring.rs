//! Localized strings (`CExoLocString`) and their resolution against a talk table.
//!
//! A localized string carries a talk table reference and any number of embedded substrings keyed
//! by a combined language/gender id. Resolving one for a language and gender follows a fixed
//! order:
//!
//! 1. an embedded substring for exactly that language and gender, even when it is empty
//! 2. the talk table entry for the string reference, unless the reference is `0xFFFFFFFF`
//! 3. when fallback is enabled, the first embedded substring in the order English, French,
//!    German, Italian, Spanish with the same gender
//!
//! Nothing falls back across genders.

use bon::Builder;
use kotor_common::{text, BinaryReader, BinaryWriter, Gender, Language, LanguageId, StrRef, TalkTable};
use std::collections::BTreeMap;
use tracing::{trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `CExoLocString` value
///
/// ```
/// use kotor_common::{Gender, Language, StrRef};
/// use kotor_gff::{LocalizedString, ResolveOptions};
///
/// let name = LocalizedString::from_strref(StrRef::new(42))
///     .with_substring(Language::French, Gender::Male, "Épée");
///
/// let resolved = name.resolve(Language::French, Gender::Male, &(), ResolveOptions::default());
/// assert!(resolved.found);
/// assert_eq!(resolved.text, "Épée");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalizedString {
    /// Talk table reference, [`StrRef::INVALID`] when the string is embedded only
    pub string_ref: StrRef,
    substrings: BTreeMap<LanguageId, String>,
}

/// Outcome of [`LocalizedString::resolve`]
///
/// `found` tells a deliberately empty string apart from a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    /// The resolved text, empty on a miss
    pub text: String,
    /// Whether any source provided the text
    pub found: bool,
}

impl Resolved {
    fn found(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            found: true,
        }
    }

    fn missing() -> Self {
        Self::default()
    }
}

/// Options for [`LocalizedString::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct ResolveOptions {
    /// Scan the other languages' substrings when neither the requested substring nor the talk
    /// table has the text
    #[builder(default = true)]
    pub fallback: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { fallback: true }
    }
}

impl LocalizedString {
    /// A string with no talk table reference and no substrings
    pub fn new() -> Self {
        Self::default()
    }

    /// A string backed by the talk table only
    pub fn from_strref(string_ref: StrRef) -> Self {
        Self {
            string_ref,
            substrings: BTreeMap::new(),
        }
    }

    /// Add a substring, builder style
    pub fn with_substring(mut self, language: Language, gender: Gender, text: impl Into<String>) -> Self {
        self.set_substring(language, gender, text);
        self
    }

    /// Store the substring for a language and gender, returning the previous one
    pub fn set_substring(&mut self, language: Language, gender: Gender, text: impl Into<String>) -> Option<String> {
        self.substrings
            .insert(LanguageId::new(language, gender), text.into())
    }

    /// The substring for a language and gender
    pub fn get_substring(&self, language: Language, gender: Gender) -> Option<&str> {
        self.substrings
            .get(&LanguageId::new(language, gender))
            .map(String::as_str)
    }

    /// Remove the substring for a language and gender
    pub fn remove_substring(&mut self, language: Language, gender: Gender) -> Option<String> {
        self.substrings.remove(&LanguageId::new(language, gender))
    }

    /// All substrings by raw id, including ids of languages this crate does not know
    pub fn substrings(&self) -> impl Iterator<Item = (LanguageId, &str)> {
        self.substrings.iter().map(|(id, text)| (*id, text.as_str()))
    }

    /// Number of substrings
    pub fn substring_count(&self) -> usize {
        self.substrings.len()
    }

    /// Whether the string has neither a talk table reference nor substrings
    pub fn is_blank(&self) -> bool {
        self.string_ref.is_invalid() && self.substrings.is_empty()
    }

    /// Resolve the text for a language and gender
    pub fn resolve(
        &self,
        language: Language,
        gender: Gender,
        talk_table: &impl TalkTable,
        options: ResolveOptions,
    ) -> Resolved {
        let key = LanguageId::new(language, gender);
        if let Some(text) = self.substrings.get(&key) {
            trace!(%key, "resolved from substring");
            return Resolved::found(text.as_str());
        }

        if !self.string_ref.is_invalid() {
            if let Some(text) = talk_table.lookup(self.string_ref, gender) {
                trace!(string_ref = %self.string_ref, "resolved from talk table");
                return Resolved::found(text);
            }
        }

        if !options.fallback {
            return Resolved::missing();
        }

        for language in Language::FALLBACK_ORDER {
            if let Some(text) = self.substrings.get(&LanguageId::new(language, gender)) {
                trace!(?language, "resolved from fallback substring");
                return Resolved::found(text.as_str());
            }
        }

        Resolved::missing()
    }

    /// Read the wire layout: `u32` size, `u32` string reference, `u32` count, then per substring
    /// a `u32` id, `u32` length and the text in the language's code page
    pub fn read(reader: &mut BinaryReader<'_>) -> kotor_common::Result<Self> {
        let size = reader.read_u32()? as usize;
        let start = reader.tell();
        let string_ref = StrRef::new(reader.read_u32()?);
        let count = reader.read_u32()?;

        let mut substrings = BTreeMap::new();
        for _ in 0..count {
            let id = LanguageId::from_raw(reader.read_u32()?);
            let length = reader.read_u32()? as usize;
            let bytes = reader.read_bytes(length)?;
            substrings.insert(id, text::decode(bytes, id.encoding()));
        }

        if reader.tell() - start != size {
            warn!(
                declared = size,
                actual = reader.tell() - start,
                "localized string size does not match its contents"
            );
        }

        Ok(Self {
            string_ref,
            substrings,
        })
    }

    /// Write the wire layout read by [`LocalizedString::read`]
    pub fn write(&self, writer: &mut BinaryWriter) -> kotor_common::Result<()> {
        let mut body = BinaryWriter::new();
        body.write_u32(self.string_ref.value())?;
        body.write_u32(self.substrings.len() as u32)?;
        for (id, value) in &self.substrings {
            let bytes = text::encode(value, id.encoding())?;
            body.write_u32(id.raw())?;
            body.write_u32(bytes.len() as u32)?;
            body.write_bytes(&bytes)?;
        }

        let body = body.into_inner();
        writer.write_u32(body.len() as u32)?;
        writer.write_bytes(&body)
    }
}

#[cfg(test)]
mod test {
    use kotor_common::{BinaryReader, BinaryWriter, Gender, Language, StrRef};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tracing_test::traced_test;

    use crate::error::Result;
    use crate::locstring::{LocalizedString, ResolveOptions, Resolved};

    fn talk_table() -> HashMap<StrRef, String> {
        HashMap::from([(StrRef::new(42), "Talk table text".to_owned())])
    }

    #[test]
    fn embedded_substring() {
        let value = LocalizedString::new().with_substring(Language::English, Gender::Male, "Hello");

        assert_eq!(
            value.resolve(Language::English, Gender::Male, &talk_table(), ResolveOptions::default()),
            Resolved {
                text: "Hello".into(),
                found: true
            }
        );
    }

    #[test]
    fn language_fallback() {
        let value = LocalizedString::new().with_substring(Language::French, Gender::Male, "Bonjour");

        let resolved = value.resolve(Language::English, Gender::Male, &(), ResolveOptions::default());
        assert!(resolved.found);
        assert_eq!(resolved.text, "Bonjour");
    }

    #[test]
    fn fallback_disabled() {
        let value = LocalizedString::new();
        let options = ResolveOptions::builder().fallback(false).build();

        assert_eq!(
            value.resolve(Language::English, Gender::Male, &talk_table(), options),
            Resolved::default()
        );
    }

    #[test]
    fn talk_table_lookup() {
        let value = LocalizedString::from_strref(StrRef::new(42));

        let resolved = value.resolve(Language::English, Gender::Male, &talk_table(), ResolveOptions::default());
        assert!(resolved.found);
        assert_eq!(resolved.text, "Talk table text");
    }

    #[test]
    fn blank_substring_wins_over_talk_table() {
        let value = LocalizedString::from_strref(StrRef::new(42))
            .with_substring(Language::English, Gender::Male, "");

        let resolved = value.resolve(Language::English, Gender::Male, &talk_table(), ResolveOptions::default());
        assert!(resolved.found);
        assert_eq!(resolved.text, "");
    }

    #[test]
    fn no_gender_fallback() {
        let value = LocalizedString::new().with_substring(Language::German, Gender::Male, "Hallo");

        let resolved = value.resolve(Language::German, Gender::Female, &(), ResolveOptions::default());
        assert!(!resolved.found);
        assert_eq!(resolved.text, "");
    }

    #[test]
    fn talk_table_before_fallback() {
        let value = LocalizedString::from_strref(StrRef::new(42))
            .with_substring(Language::English, Gender::Male, "Embedded");

        let resolved = value.resolve(Language::French, Gender::Male, &talk_table(), ResolveOptions::default());
        assert_eq!(resolved.text, "Talk table text");

        let resolved = value.resolve(Language::French, Gender::Male, &(), ResolveOptions::default());
        assert_eq!(resolved.text, "Embedded");
    }

    #[traced_test]
    #[test]
    fn read_wire_layout() -> Result<()> {
        #[rustfmt::skip]
        let data = vec![
            0x1A, 0x00, 0x00, 0x00,
            0x2A, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            b'H', b'i',
            0x03, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let mut reader = BinaryReader::new(&data);
        let value = LocalizedString::read(&mut reader)?;

        assert_eq!(value.string_ref, StrRef::new(42));
        assert_eq!(value.get_substring(Language::English, Gender::Male), Some("Hi"));
        assert_eq!(value.get_substring(Language::French, Gender::Female), Some(""));
        assert_eq!(value.substring_count(), 2);

        let mut writer = BinaryWriter::new();
        value.write(&mut writer)?;
        assert_eq!(writer.into_inner(), data);

        Ok(())
    }

    #[test]
    fn blank_and_mutation() {
        let mut value = LocalizedString::new();
        assert!(value.is_blank());

        value.set_substring(Language::Spanish, Gender::Female, "Hola");
        assert!(!value.is_blank());
        assert_eq!(
            value.remove_substring(Language::Spanish, Gender::Female),
            Some("Hola".to_owned())
        );
        assert!(value.is_blank());
    }
}
