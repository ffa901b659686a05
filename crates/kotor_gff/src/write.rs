//! Encoding of GFF files
//!

use binrw::BinWrite;
use indexmap::IndexSet;
use kotor_common::{text, BinaryWriter, ResRef};
use std::io::Cursor;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::header::{FieldEntry, GffHeader, StructEntry, LABEL_SIZE, VERSION};
use crate::types::{Gff, GffStruct, GffValue};

/// Blocks of the file being assembled
#[derive(Default)]
struct GffBuilder {
    structs: Vec<StructEntry>,
    fields: Vec<FieldEntry>,
    labels: IndexSet<String>,
    field_data: BinaryWriter,
    field_indices: BinaryWriter,
    list_indices: BinaryWriter,
}

impl Gff {
    /// Encode as a GFF V3.2 file
    ///
    /// Structs are numbered depth first with the root at index 0 and labels are stored once each.
    /// Trees nested deeper than [`GffStruct::MAX_DEPTH`] are refused, as decoding would refuse
    /// them.
    #[instrument(skip_all, err, fields(file_type = %self.file_type))]
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut builder = GffBuilder::default();
        builder.add_struct(&self.root, 0)?;
        builder.finish(self.file_type.as_bytes())
    }
}

impl GffBuilder {
    /// Append a struct and everything below it, returning its index
    fn add_struct(&mut self, value: &GffStruct, depth: usize) -> Result<u32> {
        let index = self.structs.len();
        if depth > GffStruct::MAX_DEPTH {
            return Err(Error::NestingTooDeep {
                index,
                depth,
                max: GffStruct::MAX_DEPTH,
            });
        }
        self.structs.push(StructEntry {
            struct_id: value.struct_id,
            ..Default::default()
        });

        let mut field_indices = Vec::with_capacity(value.len());
        for (label, field) in value.fields() {
            field_indices.push(self.add_field(label, field, depth)?);
        }

        let data_or_offset = match field_indices.as_slice() {
            [] => 0xFFFF_FFFF,
            [field] => *field,
            fields => {
                let offset = self.field_indices.tell() as u32;
                for field in fields {
                    self.field_indices.write_u32(*field)?;
                }
                offset
            }
        };

        self.structs[index].data_or_offset = data_or_offset;
        self.structs[index].field_count = field_indices.len() as u32;
        Ok(index as u32)
    }

    fn add_field(&mut self, label: &str, value: &GffValue, depth: usize) -> Result<u32> {
        let label_index = self.label(label)?;

        let data_or_offset = match value {
            GffValue::Byte(value) => u32::from(*value),
            GffValue::Char(value) => u32::from(*value as u8),
            GffValue::Word(value) => u32::from(*value),
            GffValue::Short(value) => u32::from(*value as u16),
            GffValue::DWord(value) => *value,
            GffValue::Int(value) => *value as u32,
            GffValue::Float(value) => value.to_bits(),
            GffValue::Struct(child) => self.add_struct(child, depth + 1)?,
            GffValue::List(children) => {
                let indices = children
                    .iter()
                    .map(|child| self.add_struct(child, depth + 1))
                    .collect::<Result<Vec<_>>>()?;

                let offset = self.list_indices.tell() as u32;
                self.list_indices.write_u32(indices.len() as u32)?;
                for index in indices {
                    self.list_indices.write_u32(index)?;
                }
                offset
            }
            complex => {
                let offset = self.field_data.tell() as u32;
                self.write_complex(complex)?;
                offset
            }
        };

        let index = self.fields.len() as u32;
        self.fields.push(FieldEntry {
            field_type: value.field_type().tag(),
            label_index,
            data_or_offset,
        });
        Ok(index)
    }

    fn write_complex(&mut self, value: &GffValue) -> Result<()> {
        let data = &mut self.field_data;
        match value {
            GffValue::DWord64(value) => data.write_u64(*value)?,
            GffValue::Int64(value) => data.write_i64(*value)?,
            GffValue::Double(value) => data.write_f64(*value)?,
            GffValue::CExoString(value) => {
                let bytes = text::encode(value, text::DEFAULT_ENCODING)?;
                data.write_u32(bytes.len() as u32)?;
                data.write_bytes(&bytes)?;
            }
            GffValue::ResRef(value) => {
                let bytes = text::encode(value, text::DEFAULT_ENCODING)?;
                if bytes.len() > ResRef::MAX_LENGTH {
                    return Err(Error::FieldTooLong {
                        value: value.to_string(),
                        max: ResRef::MAX_LENGTH,
                        actual: bytes.len(),
                    });
                }
                data.write_u8(bytes.len() as u8)?;
                data.write_bytes(&bytes)?;
            }
            GffValue::CExoLocString(value) => value.write(data)?,
            GffValue::Void(value) => {
                data.write_u32(value.len() as u32)?;
                data.write_bytes(value)?;
            }
            GffValue::Orientation(values) => {
                for value in values {
                    data.write_f32(*value)?;
                }
            }
            GffValue::Vector(values) => {
                for value in values {
                    data.write_f32(*value)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn label(&mut self, label: &str) -> Result<u32> {
        if let Some(index) = self.labels.get_index_of(label) {
            return Ok(index as u32);
        }

        let length = text::encode(label, text::DEFAULT_ENCODING)?.len();
        if length > LABEL_SIZE {
            return Err(Error::FieldTooLong {
                value: label.to_owned(),
                max: LABEL_SIZE,
                actual: length,
            });
        }

        let (index, _) = self.labels.insert_full(label.to_owned());
        Ok(index as u32)
    }

    fn finish(self, file_type: &[u8; 4]) -> Result<Vec<u8>> {
        let field_data = self.field_data.into_inner();
        let field_indices = self.field_indices.into_inner();
        let list_indices = self.list_indices.into_inner();

        let struct_offset = GffHeader::SIZE;
        let field_offset = struct_offset + self.structs.len() * StructEntry::SIZE;
        let label_offset = field_offset + self.fields.len() * FieldEntry::SIZE;
        let field_data_offset = label_offset + self.labels.len() * LABEL_SIZE;
        let field_indices_offset = field_data_offset + field_data.len();
        let list_indices_offset = field_indices_offset + field_indices.len();
        let size = list_indices_offset + list_indices.len();

        let header = GffHeader {
            file_type: *file_type,
            version: VERSION,
            struct_offset: struct_offset as u32,
            struct_count: self.structs.len() as u32,
            field_offset: field_offset as u32,
            field_count: self.fields.len() as u32,
            label_offset: label_offset as u32,
            label_count: self.labels.len() as u32,
            field_data_offset: field_data_offset as u32,
            field_data_size: field_data.len() as u32,
            field_indices_offset: field_indices_offset as u32,
            field_indices_size: field_indices.len() as u32,
            list_indices_offset: list_indices_offset as u32,
            list_indices_size: list_indices.len() as u32,
        };
        debug!(
            structs = header.struct_count,
            fields = header.field_count,
            labels = header.label_count,
            size,
            "assembled gff blocks"
        );

        let mut output = Cursor::new(Vec::with_capacity(size));
        header.write(&mut output)?;
        for entry in &self.structs {
            entry.write(&mut output)?;
        }
        for entry in &self.fields {
            entry.write(&mut output)?;
        }

        let mut output = BinaryWriter::from(output.into_inner());
        for label in &self.labels {
            output.write_fixed_string(label, LABEL_SIZE)?;
        }
        output.write_bytes(&field_data)?;
        output.write_bytes(&field_indices)?;
        output.write_bytes(&list_indices)?;

        Ok(output.into_inner())
    }
}

#[cfg(test)]
mod test {
    use kotor_common::{Gender, Language, ResRef, StrRef};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::locstring::LocalizedString;
    use crate::types::{FileType, Gff, GffValue};

    #[traced_test]
    #[test]
    fn write_single_field() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x55, 0x54, 0x49, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x50, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x60, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00,
            0x6A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x6A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            b'T', b'e', b'm', b'p', b'l', b'a', b't', b'e',
            b'R', b'e', b's', b'R', b'e', b'f', 0x00, 0x00,
            0x09, b'g', b'_', b'i', b'_', b'f', b'r', b'm', b'1', b'1',
        ];

        let mut gff = Gff::new(FileType::new(*b"UTI "));
        gff.root
            .set_field("TemplateResRef", ResRef::new("g_i_frm11")?);

        assert_eq!(gff.encode()?, expected);

        Ok(())
    }

    #[test]
    fn write_every_kind() -> Result<()> {
        let mut gff = Gff::default();
        let root = &mut gff.root;
        root.set_field("Byte", GffValue::Byte(200));
        root.set_field("Char", GffValue::Char(-3));
        root.set_field("Word", GffValue::Word(60000));
        root.set_field("Short", GffValue::Short(-300));
        root.set_field("DWord", GffValue::DWord(0xDEAD_BEEF));
        root.set_field("Int", GffValue::Int(-70000));
        root.set_field("DWord64", GffValue::DWord64(u64::MAX - 1));
        root.set_field("Int64", GffValue::Int64(i64::MIN + 1));
        root.set_field("Float", GffValue::Float(-0.5));
        root.set_field("Double", GffValue::Double(1e100));
        root.set_field("CExoString", "Dantooine");
        root.set_field("ResRef", ResRef::new("dan13_jedi")?);
        root.set_field(
            "CExoLocString",
            LocalizedString::from_strref(StrRef::new(1234))
                .with_substring(Language::German, Gender::Female, "Meisterin"),
        );
        root.set_field("Void", GffValue::Void(vec![0, 1, 2, 255]));
        root.set_field("Orientation", GffValue::Orientation([1.0, 0.0, 0.0, 0.5]));
        root.set_field("Vector", GffValue::Vector([1.5, -2.0, 3.25]));
        root.add_struct_field("Struct", 9)?
            .set_field("Inner", GffValue::Byte(1));
        root.add_list_element("List", 4)?;
        root.add_list_element("List", 5)?
            .add_list_element("Nested", 6)?;
        root.set_field("EmptyList", GffValue::List(Vec::new()));

        let decoded = Gff::decode(&gff.encode()?)?;
        assert_eq!(decoded, gff);

        Ok(())
    }

    #[test]
    fn write_rejects_long_label() {
        let mut gff = Gff::default();
        gff.root
            .set_field("ThisLabelIsTooLong", GffValue::Byte(1));

        assert!(matches!(
            gff.encode(),
            Err(Error::FieldTooLong { max: 16, actual: 18, .. })
        ));
    }

    #[test]
    fn write_deduplicates_labels() -> Result<()> {
        let mut gff = Gff::default();
        for index in 0..3 {
            gff.root
                .add_list_element("ItemList", index)?
                .set_field("InventoryRes", ResRef::new("g_i_medeqpmnt01")?);
        }

        let data = gff.encode()?;
        // ItemList and InventoryRes
        assert_eq!(u32::from_le_bytes([data[28], data[29], data[30], data[31]]), 2);

        Ok(())
    }
}
