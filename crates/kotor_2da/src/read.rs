//! Decoding of binary and text 2DA files
//!

use indexmap::IndexSet;
use kotor_common::{text, BinaryReader};
use std::collections::HashMap;
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::types::{Cell, TwoDA};

/// Signature of the binary format
pub const BINARY_SIGNATURE: &[u8; 8] = b"2DA V2.b";

/// Signature of the text format
pub const TEXT_SIGNATURE: &[u8; 8] = b"2DA V2.0";

impl TwoDA {
    /// Decode a 2DA file, detecting the binary or text format from its signature
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn decode(data: &[u8]) -> Result<TwoDA> {
        let signature = data.get(..8).unwrap_or(data);
        if signature == BINARY_SIGNATURE {
            Self::decode_binary(data)
        } else if signature == TEXT_SIGNATURE {
            Self::decode_text(data)
        } else {
            Err(Error::MalformedHeader {
                signature: String::from_utf8_lossy(signature).into_owned(),
            })
        }
    }

    /// Decode a `2DA V2.b` file
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn decode_binary(data: &[u8]) -> Result<TwoDA> {
        let mut reader = BinaryReader::new(data);

        let signature = reader.read_signature::<8>()?;
        if &signature != BINARY_SIGNATURE {
            return Err(Error::MalformedHeader {
                signature: String::from_utf8_lossy(&signature).into_owned(),
            });
        }
        if reader.read_u8()? != b'\n' {
            return Err(Error::MalformedHeader {
                signature: String::from_utf8_lossy(&signature).into_owned(),
            });
        }

        let columns = read_columns(&mut reader)?;
        let row_count = reader.read_u32()? as usize;
        debug!(columns = columns.len(), rows = row_count, "read 2da header");

        // every label needs at least its terminator
        if row_count > reader.remaining() {
            return Err(Error::TruncatedData {
                offset: reader.tell() - 4,
                reason: format!(
                    "{row_count} rows declared but only {} bytes remain",
                    reader.remaining()
                ),
            });
        }

        let mut labels = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let label = reader.read_until(b'\t')?;
            labels.push(text::decode(label, text::DEFAULT_ENCODING));
        }

        let cell_count = row_count
            .checked_mul(columns.len())
            .ok_or_else(|| Error::TruncatedData {
                offset: reader.tell(),
                reason: "cell count overflows".to_owned(),
            })?;
        if cell_count * 2 + 2 > reader.remaining() {
            return Err(Error::TruncatedData {
                offset: reader.tell(),
                reason: format!(
                    "{cell_count} cell offsets declared but only {} bytes remain",
                    reader.remaining()
                ),
            });
        }

        let offsets = (0..cell_count)
            .map(|_| reader.read_u16())
            .collect::<kotor_common::Result<Vec<u16>>>()?;

        let data_size = reader.read_u16()? as usize;
        let data_start = reader.tell();
        let cell_data = reader.read_bytes(data_size).map_err(|_| Error::TruncatedData {
            offset: data_start,
            reason: format!(
                "cell data of {data_size} bytes declared but only {} bytes remain",
                reader.remaining()
            ),
        })?;
        trace!(data_size, "read cell data block");

        let mut cache: HashMap<u16, Cell> = HashMap::new();
        let mut rows = Vec::with_capacity(row_count);
        let mut offsets = offsets.into_iter();
        for label in labels {
            let mut cells = Vec::with_capacity(columns.len());
            for offset in offsets.by_ref().take(columns.len()) {
                if let Some(cell) = cache.get(&offset) {
                    cells.push(cell.clone());
                    continue;
                }

                let cell = read_cell(cell_data, offset, data_start)?;
                cache.insert(offset, cell.clone());
                cells.push(cell);
            }
            rows.push((label, cells));
        }

        if reader.remaining() > 0 {
            warn!(trailing = reader.remaining(), "ignoring data after the 2da cell block");
        }

        Ok(TwoDA::from_parts(columns, None, rows))
    }

    /// Decode a `2DA V2.0` text file
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn decode_text(data: &[u8]) -> Result<TwoDA> {
        // the code page has one byte per character, so offsets count characters of the raw lines
        let mut lines = data.split_inclusive(|b| *b == b'\n').scan(0, |offset, raw| {
            let line_offset = *offset;
            *offset += raw.len();
            let line = raw.strip_suffix(b"\n").unwrap_or(raw);
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            Some((line_offset, text::decode(line, text::DEFAULT_ENCODING)))
        });

        let (_, signature) = lines.next().unwrap_or_default();
        if signature.trim_end().as_bytes() != TEXT_SIGNATURE {
            return Err(Error::MalformedHeader {
                signature: signature.to_owned(),
            });
        }

        let mut default_value = None;
        let mut columns: Option<IndexSet<String>> = None;
        let mut rows = Vec::new();
        for (line_offset, line) in lines {
            let line = line.as_str();
            let tokens = tokenize(line, line_offset)?;
            if tokens.is_empty() {
                continue;
            }

            let Some(header) = columns.as_ref() else {
                if let Some(value) = line.trim_start().strip_prefix("DEFAULT:") {
                    let value_offset = line_offset + line.chars().count() - value.chars().count();
                    default_value = tokenize(value, value_offset)?
                        .into_iter()
                        .next()
                        .map(|token| token.text);
                    continue;
                }

                let mut set = IndexSet::with_capacity(tokens.len());
                for token in tokens {
                    if set.contains(&token.text) {
                        return Err(Error::DuplicateColumn(token.text));
                    }
                    set.insert(token.text);
                }
                columns = Some(set);
                continue;
            };

            let mut tokens = tokens.into_iter();
            let label = tokens.next().map(|token| token.text).unwrap_or_default();
            let mut cells: Vec<Cell> = tokens
                .by_ref()
                .take(header.len())
                .map(Cell::from)
                .collect();
            if tokens.next().is_some() {
                warn!(row = rows.len(), "ignoring cells past the last column");
            }
            cells.resize(header.len(), Cell::Empty);
            rows.push((label, cells));
        }

        let Some(columns) = columns else {
            return Err(Error::TruncatedData {
                offset: data.len(),
                reason: "missing column header line".to_owned(),
            });
        };
        debug!(columns = columns.len(), rows = rows.len(), "read 2da text");

        Ok(TwoDA::from_parts(columns, default_value, rows))
    }
}

fn read_columns(reader: &mut BinaryReader<'_>) -> Result<IndexSet<String>> {
    let mut columns = IndexSet::new();
    loop {
        if reader.peek_bytes(1)? == [0] {
            reader.skip(1)?;
            return Ok(columns);
        }

        let column = text::decode(reader.read_until(b'\t')?, text::DEFAULT_ENCODING);
        if columns.contains(&column) {
            return Err(Error::DuplicateColumn(column));
        }
        columns.insert(column);
    }
}

fn read_cell(cell_data: &[u8], offset: u16, data_start: usize) -> Result<Cell> {
    let start = offset as usize;
    let Some(rest) = cell_data.get(start..).filter(|rest| !rest.is_empty()) else {
        return Err(Error::TruncatedData {
            offset: data_start + start,
            reason: format!(
                "cell offset {offset} is outside the {} byte cell data block",
                cell_data.len()
            ),
        });
    };

    let Some(end) = rest.iter().position(|b| *b == 0) else {
        return Err(Error::TruncatedData {
            offset: data_start + start,
            reason: "cell value is missing its terminator".to_owned(),
        });
    };

    let value = text::decode(&rest[..end], text::DEFAULT_ENCODING);
    Ok(if value.is_empty() {
        Cell::Empty
    } else {
        Cell::from_stored(value)
    })
}

/// A whitespace separated token of the text format, remembering whether it was quoted
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

impl From<Token> for Cell {
    fn from(token: Token) -> Self {
        if token.quoted {
            Cell::Value(token.text)
        } else {
            Cell::from_stored(token.text)
        }
    }
}

fn tokenize(line: &str, line_offset: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().enumerate().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        if c == '"' {
            let mut text = String::new();
            let mut closed = false;
            for (_, c) in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                text.push(c);
            }
            if !closed {
                return Err(Error::TruncatedData {
                    offset: line_offset + start,
                    reason: "unterminated quoted value".to_owned(),
                });
            }
            tokens.push(Token { text, quoted: true });
            continue;
        }

        let mut text = String::from(c);
        while let Some((_, c)) = chars.next_if(|(_, c)| !c.is_whitespace()) {
            text.push(c);
        }
        tokens.push(Token {
            text,
            quoted: false,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::types::{Cell, TwoDA};

    #[traced_test]
    #[test]
    fn read_binary() -> Result<()> {
        let mut data = Vec::new();
        data.extend_from_slice(b"2DA V2.b\n");
        data.extend_from_slice(b"label\tmodel\t\0");
        data.extend_from_slice(&[0x02, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"0\t1\t");
        #[rustfmt::skip]
        data.extend_from_slice(&[
            0x00, 0x00, 0x08, 0x00,
            0x11, 0x00, 0x11, 0x00,
        ]);
        data.extend_from_slice(&[0x12, 0x00]);
        data.extend_from_slice(b"Bastila\0p_bastbb\0\0");

        let table = TwoDA::decode(&data)?;

        assert_eq!(table.columns().collect::<Vec<_>>(), vec!["label", "model"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row_label(1), Some("1"));
        assert_eq!(table.cell(0, "label"), Some("Bastila"));
        assert_eq!(table.cell(0, "model"), Some("p_bastbb"));
        assert_eq!(table.cell_raw(1, "label"), Some(&Cell::Empty));
        assert_eq!(table.cell_raw(1, "model"), Some(&Cell::Empty));

        Ok(())
    }

    #[test]
    fn read_binary_star_marker_is_empty() -> Result<()> {
        let mut data = Vec::new();
        data.extend_from_slice(b"2DA V2.b\nlabel\t\0");
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"0\t");
        data.extend_from_slice(&[0x00, 0x00, 0x05, 0x00]);
        data.extend_from_slice(b"****\0");

        let table = TwoDA::decode(&data)?;
        assert_eq!(table.cell_raw(0, "label"), Some(&Cell::Empty));

        Ok(())
    }

    #[test]
    fn read_invalid_signature() {
        let result = TwoDA::decode(b"2DA V9.9\n");
        assert!(matches!(result, Err(Error::MalformedHeader { .. })));

        let result = TwoDA::decode(b"2D");
        assert!(matches!(result, Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn read_truncated_row_count() {
        let mut data = Vec::new();
        data.extend_from_slice(b"2DA V2.b\nlabel\t\0");
        data.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00]);
        data.extend_from_slice(b"0\t");

        assert!(matches!(
            TwoDA::decode(&data),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn read_truncated_cell_data() {
        let mut data = Vec::new();
        data.extend_from_slice(b"2DA V2.b\nlabel\t\0");
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"0\t");
        data.extend_from_slice(&[0x00, 0x00, 0x20, 0x00]);
        data.extend_from_slice(b"abc\0");

        assert!(matches!(
            TwoDA::decode(&data),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[traced_test]
    #[test]
    fn read_text() -> Result<()> {
        let data = b"2DA V2.0\r\n\
DEFAULT: ****\r\n\
\r\n\
        label        modela      race\r\n\
0       Bastila      p_bastbb    \"P Bast BB\"\r\n\
1       ****         ****\r\n\
2       Carth        \"\"          P_CarthBB  extra\r\n";

        let table = TwoDA::decode(data)?;

        assert_eq!(table.default_value(), Some("****"));
        assert_eq!(
            table.columns().collect::<Vec<_>>(),
            vec!["label", "modela", "race"]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, "race"), Some("P Bast BB"));
        assert_eq!(table.cell_raw(1, "label"), Some(&Cell::Empty));
        assert_eq!(table.cell_raw(1, "race"), Some(&Cell::Empty));
        assert_eq!(table.cell_raw(2, "modela"), Some(&Cell::Value(String::new())));
        assert_eq!(table.cell(2, "race"), Some("P_CarthBB"));

        Ok(())
    }

    #[test]
    fn read_text_unterminated_quote() {
        let data = b"2DA V2.0\n\nlabel\n0 \"open\n";
        assert!(matches!(
            TwoDA::decode(data),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn read_text_error_offset_counts_raw_bytes() {
        // three CRLF terminated lines take 19 bytes, then 0xE9 and a space
        let data = b"2DA V2.0\r\n\r\nlabel\r\n\xE9 \"open\r\n";
        match TwoDA::decode(data) {
            Err(Error::TruncatedData { offset, .. }) => assert_eq!(offset, 21),
            other => panic!("expected an unterminated quote, got {other:?}"),
        }
    }
}
