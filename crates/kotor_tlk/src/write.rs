//! Encoding of TLK files
//!

use binrw::BinWrite;
use kotor_common::{text, BinaryWriter, ResRef, StrRef};
use std::io::Cursor;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::header::{StringEntry, TlkHeader, SIGNATURE};
use crate::types::TalkTableFile;

impl TalkTableFile {
    /// Encode as a TLK V3.0 file
    ///
    /// Strings are stored in entry order, each entry keeping the flags it carries.
    #[instrument(skip_all, err, fields(language = ?self.language, entries = self.len()))]
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.len() > StrRef::MAX_INDEX as usize + 1 {
            return Err(Error::TableTooLarge {
                count: self.len(),
                max: StrRef::MAX_INDEX as usize + 1,
            });
        }

        let encoding = self.language.encoding();
        let mut strings = BinaryWriter::new();
        let mut records = Vec::with_capacity(self.len());
        for entry in &self.entries {
            let bytes = text::encode(&entry.text, encoding)?;
            let mut sound = BinaryWriter::with_capacity(ResRef::MAX_LENGTH);
            sound.write_fixed_string(&entry.sound, ResRef::MAX_LENGTH)?;

            let mut slot = [0u8; 16];
            slot.copy_from_slice(sound.as_slice());
            records.push(StringEntry {
                flags: entry.flags,
                sound: slot,
                volume_variance: entry.volume_variance,
                pitch_variance: entry.pitch_variance,
                text_offset: strings.tell() as u32,
                text_length: bytes.len() as u32,
                sound_length: entry.sound_length,
            });
            strings.write_bytes(&bytes)?;
        }

        let header = TlkHeader {
            signature: SIGNATURE,
            language_id: self.language.id(),
            string_count: records.len() as u32,
            strings_offset: (TlkHeader::SIZE + records.len() * StringEntry::SIZE) as u32,
        };
        debug!(
            strings_offset = header.strings_offset,
            strings_size = strings.tell(),
            "assembled tlk blocks"
        );

        let mut output = Cursor::new(Vec::with_capacity(header.strings_offset as usize + strings.tell()));
        header.write(&mut output)?;
        for record in &records {
            record.write(&mut output)?;
        }

        let mut output = output.into_inner();
        output.extend_from_slice(strings.as_slice());
        Ok(output)
    }
}
