//! Encoding of binary and text 2DA files
//!

use kotor_common::{text, BinaryWriter};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::read::{BINARY_SIGNATURE, TEXT_SIGNATURE};
use crate::types::{Cell, TwoDA, EMPTY_MARKER};

impl TwoDA {
    /// Encode the table in the binary format the games load
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_binary()
    }

    /// Encode the table as a `2DA V2.b` file
    ///
    /// Cell strings are stored once each, in row-major order of first use. Empty cells are
    /// stored as the empty string.
    #[instrument(skip_all, err, fields(columns = self.column_count(), rows = self.row_count()))]
    pub fn encode_binary(&self) -> Result<Vec<u8>> {
        if self.column_count() > u16::MAX as usize {
            return Err(Error::TableTooLarge {
                what: "columns",
                count: self.column_count(),
                max: u16::MAX as usize,
            });
        }
        if self.row_count() > u16::MAX as usize {
            return Err(Error::TableTooLarge {
                what: "rows",
                count: self.row_count(),
                max: u16::MAX as usize,
            });
        }

        let mut writer = BinaryWriter::new();
        writer.write_bytes(BINARY_SIGNATURE)?;
        writer.write_u8(b'\n')?;

        for column in self.columns() {
            writer.write_bytes(&text::encode(column, text::DEFAULT_ENCODING)?)?;
            writer.write_u8(b'\t')?;
        }
        writer.write_u8(0)?;

        writer.write_u32(self.row_count() as u32)?;
        for row in self.rows() {
            writer.write_bytes(&text::encode(row.label(), text::DEFAULT_ENCODING)?)?;
            writer.write_u8(b'\t')?;
        }

        let mut blob = Vec::new();
        let mut offsets: HashMap<&str, u16> = HashMap::new();
        let mut cell_offsets = Vec::with_capacity(self.row_count() * self.column_count());
        for row in self.rows() {
            for cell in row.cells() {
                let value = cell.as_str().unwrap_or_default();
                if let Some(offset) = offsets.get(value) {
                    cell_offsets.push(*offset);
                    continue;
                }

                let offset = u16::try_from(blob.len()).map_err(|_| Error::TableTooLarge {
                    what: "bytes of cell data",
                    count: blob.len(),
                    max: u16::MAX as usize,
                })?;
                blob.extend_from_slice(&text::encode(value, text::DEFAULT_ENCODING)?);
                blob.push(0);
                offsets.insert(value, offset);
                cell_offsets.push(offset);
            }
        }

        let blob_size = u16::try_from(blob.len()).map_err(|_| Error::TableTooLarge {
            what: "bytes of cell data",
            count: blob.len(),
            max: u16::MAX as usize,
        })?;
        debug!(unique = offsets.len(), size = blob.len(), "built cell data block");

        for offset in cell_offsets {
            writer.write_u16(offset)?;
        }
        writer.write_u16(blob_size)?;
        writer.write_bytes(&blob)?;

        Ok(writer.into_inner())
    }

    /// Encode the table as a `2DA V2.0` text file
    ///
    /// Columns are separated by tabs. Empty cells are written as `****`, empty strings as `""`
    /// and values containing whitespace are quoted.
    #[instrument(skip_all, err, fields(columns = self.column_count(), rows = self.row_count()))]
    pub fn encode_text(&self) -> Result<Vec<u8>> {
        let mut out = String::new();
        out.push_str(&String::from_utf8_lossy(TEXT_SIGNATURE));
        out.push_str("\r\n");
        if let Some(default) = self.default_value() {
            out.push_str("DEFAULT: ");
            out.push_str(&quote(default));
        }
        out.push_str("\r\n");

        for column in self.columns() {
            out.push('\t');
            out.push_str(&quote(column));
        }
        out.push_str("\r\n");

        for row in self.rows() {
            out.push_str(&quote(row.label()));
            for cell in row.cells() {
                out.push('\t');
                match cell {
                    Cell::Empty => out.push_str(EMPTY_MARKER),
                    Cell::Value(value) => out.push_str(&quote(value)),
                }
            }
            out.push_str("\r\n");
        }

        Ok(text::encode(&out, text::DEFAULT_ENCODING)?)
    }
}

fn quote(value: &str) -> std::borrow::Cow<'_, str> {
    if value.is_empty() || value == EMPTY_MARKER || value.contains(char::is_whitespace) {
        format!("\"{value}\"").into()
    } else {
        value.into()
    }
}
