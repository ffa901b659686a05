//! Talk table types
//!

use bon::bon;
use kotor_common::{Gender, Language, ResRef, StrRef, TalkTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One string of a talk table
///
/// ```
/// use kotor_tlk::TalkTableEntry;
///
/// let entry = TalkTableEntry::builder()
///     .text("There's a Sith patrol up ahead.")
///     .sound("n_carth_01".parse()?)
///     .sound_length(2.5)
///     .build();
///
/// assert!(entry.has_text());
/// assert_eq!(entry.flags, TalkTableEntry::TEXT_PRESENT | TalkTableEntry::SOUND_PRESENT | TalkTableEntry::SOUND_LENGTH_PRESENT);
/// # Ok::<(), kotor_common::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TalkTableEntry {
    /// Combination of [`TalkTableEntry::TEXT_PRESENT`], [`TalkTableEntry::SOUND_PRESENT`] and
    /// [`TalkTableEntry::SOUND_LENGTH_PRESENT`], kept as stored
    pub flags: u32,
    pub text: String,
    /// Voice over played with the text
    pub sound: ResRef,
    /// Unused by the games, kept as stored
    pub volume_variance: u32,
    /// Unused by the games, kept as stored
    pub pitch_variance: u32,
    /// Length of the voice over in seconds
    pub sound_length: f32,
}

impl TalkTableEntry {
    /// The entry has text
    pub const TEXT_PRESENT: u32 = 0x0001;
    /// The entry has a voice over
    pub const SOUND_PRESENT: u32 = 0x0002;
    /// The voice over length is meaningful
    pub const SOUND_LENGTH_PRESENT: u32 = 0x0004;

    /// Whether the text present flag is set
    pub fn has_text(&self) -> bool {
        self.flags & Self::TEXT_PRESENT != 0
    }

    /// Whether the sound present flag is set
    pub fn has_sound(&self) -> bool {
        self.flags & Self::SOUND_PRESENT != 0
    }
}

#[bon]
impl TalkTableEntry {
    /// Build an entry, setting the flags from the parts given
    #[builder]
    pub fn new(
        #[builder(into)] text: Option<String>,
        sound: Option<ResRef>,
        sound_length: Option<f32>,
        #[builder(default)] volume_variance: u32,
        #[builder(default)] pitch_variance: u32,
    ) -> Self {
        let mut flags = 0;
        if text.is_some() {
            flags |= Self::TEXT_PRESENT;
        }
        if sound.is_some() {
            flags |= Self::SOUND_PRESENT;
        }
        if sound_length.is_some() {
            flags |= Self::SOUND_LENGTH_PRESENT;
        }

        Self {
            flags,
            text: text.unwrap_or_default(),
            sound: sound.unwrap_or_default(),
            volume_variance,
            pitch_variance,
            sound_length: sound_length.unwrap_or_default(),
        }
    }
}

/// A decoded TLK file
///
/// The index of an entry is its string reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TalkTableFile {
    /// Language of every string in the table, which also decides the code page
    pub language: Language,
    pub(crate) entries: Vec<TalkTableEntry>,
}

impl TalkTableFile {
    /// An empty table
    pub fn new(language: Language) -> Self {
        Self {
            language,
            entries: Vec::new(),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in string reference order
    pub fn entries(&self) -> &[TalkTableEntry] {
        &self.entries
    }

    /// The entry for `strref`, `None` for references past the end or outside the addressable range
    pub fn get(&self, strref: StrRef) -> Option<&TalkTableEntry> {
        if !strref.is_addressable() {
            return None;
        }
        self.entries.get(strref.value() as usize)
    }

    /// Mutable access to the entry for `strref`
    pub fn get_mut(&mut self, strref: StrRef) -> Option<&mut TalkTableEntry> {
        if !strref.is_addressable() {
            return None;
        }
        self.entries.get_mut(strref.value() as usize)
    }

    /// The text for `strref`
    pub fn text(&self, strref: StrRef) -> Option<&str> {
        self.get(strref).map(|entry| entry.text.as_str())
    }

    /// Append an entry and return its string reference
    pub fn push(&mut self, entry: TalkTableEntry) -> StrRef {
        self.entries.push(entry);
        StrRef::new(self.entries.len() as u32 - 1)
    }
}

/// A single table answers for both genders
impl TalkTable for TalkTableFile {
    fn lookup(&self, strref: StrRef, _gender: Gender) -> Option<String> {
        self.text(strref).map(str::to_owned)
    }
}

/// The tables loaded for a game: `dialog.tlk` and, for languages with gendered text,
/// `dialogf.tlk`
#[derive(Debug, Clone, PartialEq)]
pub struct TalkTables {
    pub male: TalkTableFile,
    pub female: Option<TalkTableFile>,
}

impl TalkTables {
    /// Tables without a female variant
    pub fn new(male: TalkTableFile) -> Self {
        Self { male, female: None }
    }

    /// Tables with a female variant
    pub fn with_female(male: TalkTableFile, female: TalkTableFile) -> Self {
        Self {
            male,
            female: Some(female),
        }
    }

    /// The table consulted for `gender`
    pub fn table(&self, gender: Gender) -> &TalkTableFile {
        match (gender, &self.female) {
            (Gender::Female, Some(female)) => female,
            _ => &self.male,
        }
    }
}

impl TalkTable for TalkTables {
    fn lookup(&self, strref: StrRef, gender: Gender) -> Option<String> {
        self.table(gender).lookup(strref, gender)
    }
}
