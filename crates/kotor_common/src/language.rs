//! Languages and genders used by localized strings and talk tables.

use encoding_rs::Encoding;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Game language
///
/// The numeric values are the language ids stored in TLK headers and in the combined
/// language/gender id of localized substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum Language {
    English = 0,
    French = 1,
    German = 2,
    Italian = 3,
    Spanish = 4,
    Polish = 5,
    Korean = 128,
    ChineseTraditional = 129,
    ChineseSimplified = 130,
    Japanese = 131,
}

impl Language {
    /// Order in which embedded substrings are searched when the requested language is missing
    pub const FALLBACK_ORDER: [Language; 5] = [
        Language::English,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Spanish,
    ];

    /// Numeric id of the language
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Code page the games use for text in this language
    pub fn encoding(self) -> &'static Encoding {
        match self {
            Language::English
            | Language::French
            | Language::German
            | Language::Italian
            | Language::Spanish => encoding_rs::WINDOWS_1252,
            Language::Polish => encoding_rs::WINDOWS_1250,
            Language::Korean => encoding_rs::EUC_KR,
            Language::ChineseTraditional => encoding_rs::BIG5,
            Language::ChineseSimplified => encoding_rs::GBK,
            Language::Japanese => encoding_rs::SHIFT_JIS,
        }
    }
}

impl TryFrom<u32> for Language {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Language::English,
            1 => Language::French,
            2 => Language::German,
            3 => Language::Italian,
            4 => Language::Spanish,
            5 => Language::Polish,
            128 => Language::Korean,
            129 => Language::ChineseTraditional,
            130 => Language::ChineseSimplified,
            131 => Language::Japanese,
            other => return Err(other),
        })
    }
}

/// Grammatical gender of a string variant. Male doubles as neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum Gender {
    #[default]
    Male = 0,
    Female = 1,
}

impl Gender {
    /// The gender bit of a combined language/gender id
    pub const fn bit(self) -> u32 {
        self as u32
    }
}

/// Combined language/gender id, `2 * language + gender`
///
/// Kept as the raw number so ids for languages this crate does not know about still round-trip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LanguageId(u32);

impl LanguageId {
    /// Combine a language and a gender
    pub const fn new(language: Language, gender: Gender) -> Self {
        Self(language.id() * 2 + gender.bit())
    }

    /// Wrap a raw id as stored on disk
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id as stored on disk
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The language part, if it is a known language
    pub fn language(self) -> Option<Language> {
        Language::try_from(self.0 / 2).ok()
    }

    /// The gender part
    pub const fn gender(self) -> Gender {
        if self.0 & 1 == 1 {
            Gender::Female
        } else {
            Gender::Male
        }
    }

    /// Code page of the language part, falling back to the default code page
    pub fn encoding(self) -> &'static Encoding {
        self.language()
            .map(Language::encoding)
            .unwrap_or(crate::text::DEFAULT_ENCODING)
    }
}

impl From<(Language, Gender)> for LanguageId {
    fn from((language, gender): (Language, Gender)) -> Self {
        Self::new(language, gender)
    }
}

#[cfg(test)]
mod test {
    use crate::language::{Gender, Language, LanguageId};

    #[test]
    fn combined_id() {
        assert_eq!(LanguageId::new(Language::English, Gender::Male).raw(), 0);
        assert_eq!(LanguageId::new(Language::French, Gender::Female).raw(), 3);
        assert_eq!(LanguageId::new(Language::Korean, Gender::Male).raw(), 256);

        let id = LanguageId::from_raw(5);
        assert_eq!(id.language(), Some(Language::German));
        assert_eq!(id.gender(), Gender::Female);
    }

    #[test]
    fn unknown_language_survives() {
        let id = LanguageId::from_raw(99);
        assert_eq!(id.language(), None);
        assert_eq!(id.raw(), 99);
        assert_eq!(id.encoding(), encoding_rs::WINDOWS_1252);
    }
}
