//! Decoding of TLK files
//!

use binrw::BinRead;
use kotor_common::{text, Language, ResRef};
use std::io::Cursor;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::header::{StringEntry, TlkHeader, SIGNATURE};
use crate::types::{TalkTableEntry, TalkTableFile};

impl TalkTableFile {
    /// Decode a TLK V3.0 file
    ///
    /// Text is read whenever an entry has a length, whether or not its text flag is set, so
    /// tables written by tools that leave the flags at zero still read correctly.
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn decode(data: &[u8]) -> Result<TalkTableFile> {
        if data.len() < TlkHeader::SIZE {
            return Err(Error::TruncatedData {
                what: "header",
                offset: 0,
                size: TlkHeader::SIZE,
                available: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let header = TlkHeader::read(&mut cursor)?;
        if header.signature != SIGNATURE {
            return Err(Error::MalformedHeader {
                reason: format!(
                    "unexpected signature {:?}",
                    String::from_utf8_lossy(&header.signature)
                ),
            });
        }
        let language = Language::try_from(header.language_id).map_err(|id| Error::MalformedHeader {
            reason: format!("unknown language id {id}"),
        })?;
        debug!(
            ?language,
            strings = header.string_count,
            strings_offset = header.strings_offset,
            "read tlk header"
        );

        let table_size = (header.string_count as usize).saturating_mul(StringEntry::SIZE);
        if TlkHeader::SIZE.saturating_add(table_size) > data.len() {
            return Err(Error::TruncatedData {
                what: "entry table",
                offset: TlkHeader::SIZE,
                size: table_size,
                available: data.len(),
            });
        }

        let encoding = language.encoding();
        let strings_offset = header.strings_offset as usize;
        let mut entries = Vec::with_capacity(header.string_count as usize);
        for _ in 0..header.string_count {
            let entry = StringEntry::read(&mut cursor)?;

            let offset = strings_offset.saturating_add(entry.text_offset as usize);
            let size = entry.text_length as usize;
            let bytes = offset
                .checked_add(size)
                .and_then(|end| data.get(offset..end))
                .ok_or(Error::TruncatedData {
                    what: "string",
                    offset,
                    size,
                    available: data.len(),
                })?;

            let sound = entry.sound.split(|b| *b == 0).next().unwrap_or_default();
            entries.push(TalkTableEntry {
                flags: entry.flags,
                text: text::decode(bytes, encoding),
                sound: ResRef::new(text::decode(sound, text::DEFAULT_ENCODING))?,
                volume_variance: entry.volume_variance,
                pitch_variance: entry.pitch_variance,
                sound_length: entry.sound_length,
            });
        }

        Ok(TalkTableFile { language, entries })
    }
}
