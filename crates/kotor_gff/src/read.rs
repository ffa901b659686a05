//! Decoding of GFF files
//!

use binrw::BinRead;
use kotor_common::{text, BinaryReader, ResRef};
use std::io::Cursor;
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::header::{FieldEntry, GffHeader, StructEntry, LABEL_SIZE, VERSION};
use crate::locstring::LocalizedString;
use crate::types::{FileType, Gff, GffFieldType, GffStruct, GffValue};

/// A field whose struct children have not been built yet
enum Pending {
    Value(GffValue),
    Struct(usize),
    List(Vec<usize>),
}

/// The blocks of a file, checked against its size
struct Blocks<'a> {
    structs: Vec<StructEntry>,
    fields: Vec<FieldEntry>,
    labels: Vec<String>,
    field_data: &'a [u8],
    field_indices: &'a [u8],
    list_indices: &'a [u8],
}

impl Gff {
    /// Decode a GFF V3.2 file
    ///
    /// Decoding is all or nothing: any offset outside its block, unknown field type or struct
    /// referenced twice fails the whole file.
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn decode(data: &[u8]) -> Result<Gff> {
        if data.len() < GffHeader::SIZE {
            return Err(Error::TruncatedData {
                block: "header",
                offset: 0,
                size: GffHeader::SIZE,
                available: data.len(),
            });
        }

        let header = GffHeader::read(&mut Cursor::new(data))?;
        if header.version != VERSION {
            return Err(Error::MalformedHeader {
                reason: format!(
                    "unsupported version {:?}",
                    String::from_utf8_lossy(&header.version)
                ),
            });
        }
        if !FileType::is_valid(&header.file_type) {
            return Err(Error::MalformedHeader {
                reason: format!("file type {:02x?} is not printable ascii", header.file_type),
            });
        }
        debug!(
            file_type = %String::from_utf8_lossy(&header.file_type),
            structs = header.struct_count,
            fields = header.field_count,
            labels = header.label_count,
            "read gff header"
        );

        let blocks = Blocks::read(data, &header)?;
        let root = blocks.build_tree()?;

        Ok(Gff {
            file_type: FileType::new(header.file_type),
            root,
        })
    }
}

fn block<'a>(data: &'a [u8], name: &'static str, offset: u32, size: usize) -> Result<&'a [u8]> {
    let offset = offset as usize;
    offset
        .checked_add(size)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::TruncatedData {
            block: name,
            offset,
            size,
            available: data.len(),
        })
}

fn entries_size(count: u32, entry_size: usize) -> usize {
    (count as usize).saturating_mul(entry_size)
}

impl<'a> Blocks<'a> {
    fn read(data: &'a [u8], header: &GffHeader) -> Result<Self> {
        let struct_block = block(
            data,
            "struct",
            header.struct_offset,
            entries_size(header.struct_count, StructEntry::SIZE),
        )?;
        let field_block = block(
            data,
            "field",
            header.field_offset,
            entries_size(header.field_count, FieldEntry::SIZE),
        )?;
        let label_block = block(
            data,
            "label",
            header.label_offset,
            entries_size(header.label_count, LABEL_SIZE),
        )?;
        let field_data = block(
            data,
            "field data",
            header.field_data_offset,
            header.field_data_size as usize,
        )?;
        let field_indices = block(
            data,
            "field indices",
            header.field_indices_offset,
            header.field_indices_size as usize,
        )?;
        let list_indices = block(
            data,
            "list indices",
            header.list_indices_offset,
            header.list_indices_size as usize,
        )?;

        let mut cursor = Cursor::new(struct_block);
        let structs = (0..header.struct_count)
            .map(|_| StructEntry::read(&mut cursor))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let mut cursor = Cursor::new(field_block);
        let fields = (0..header.field_count)
            .map(|_| FieldEntry::read(&mut cursor))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let labels = label_block
            .chunks_exact(LABEL_SIZE)
            .map(|label| {
                let end = label.iter().position(|b| *b == 0).unwrap_or(LABEL_SIZE);
                text::decode(&label[..end], text::DEFAULT_ENCODING)
            })
            .collect();

        trace!(
            field_data = field_data.len(),
            field_indices = field_indices.len(),
            list_indices = list_indices.len(),
            "read gff blocks"
        );

        Ok(Self {
            structs,
            fields,
            labels,
            field_data,
            field_indices,
            list_indices,
        })
    }

    /// Build the tree below struct 0
    ///
    /// Structs are discovered top down and assembled bottom up, so children always exist before
    /// the parent takes them. Nesting is capped at [`GffStruct::MAX_DEPTH`] because the returned
    /// tree is dropped recursively.
    fn build_tree(&self) -> Result<GffStruct> {
        if self.structs.is_empty() {
            return Err(Error::DanglingOffset {
                block: "struct",
                offset: 0,
                limit: 0,
            });
        }

        let mut visited = vec![false; self.structs.len()];
        let mut pending: Vec<Option<Vec<(String, Pending)>>> = Vec::new();
        pending.resize_with(self.structs.len(), || None);
        let mut order = Vec::new();
        let mut stack = vec![(0, 0)];
        visited[0] = true;

        while let Some((index, depth)) = stack.pop() {
            order.push(index);
            let fields = self.struct_fields(index)?;

            for (_, field) in &fields {
                let children = match field {
                    Pending::Value(_) => continue,
                    Pending::Struct(child) => std::slice::from_ref(child),
                    Pending::List(children) => children.as_slice(),
                };
                for &child in children {
                    if child >= self.structs.len() {
                        return Err(Error::DanglingOffset {
                            block: "struct",
                            offset: child,
                            limit: self.structs.len(),
                        });
                    }
                    if visited[child] {
                        return Err(Error::StructCycle { index: child });
                    }
                    if depth >= GffStruct::MAX_DEPTH {
                        return Err(Error::NestingTooDeep {
                            index: child,
                            depth: depth + 1,
                            max: GffStruct::MAX_DEPTH,
                        });
                    }
                    visited[child] = true;
                    stack.push((child, depth + 1));
                }
            }

            pending[index] = Some(fields);
        }

        let unreachable = visited.iter().filter(|seen| !**seen).count();
        if unreachable > 0 {
            warn!(unreachable, "ignoring structs not reachable from the root");
        }

        let mut built: Vec<Option<GffStruct>> = Vec::new();
        built.resize_with(self.structs.len(), || None);
        for &index in order.iter().rev() {
            let fields = pending[index]
                .take()
                .ok_or(Error::StructCycle { index })?;

            let mut value = GffStruct::new(self.structs[index].struct_id);
            for (label, field) in fields {
                let field = match field {
                    Pending::Value(field) => field,
                    Pending::Struct(child) => GffValue::Struct(take(&mut built, child)?),
                    Pending::List(children) => GffValue::List(
                        children
                            .into_iter()
                            .map(|child| take(&mut built, child))
                            .collect::<Result<_>>()?,
                    ),
                };
                if value.set_field(label.clone(), field).is_some() {
                    warn!(label = %label, struct_index = index, "duplicate field label, keeping the last");
                }
            }
            built[index] = Some(value);
        }

        take(&mut built, 0)
    }

    /// Field entry indices of a struct
    fn field_indices_of(&self, index: usize) -> Result<Vec<usize>> {
        let entry = self.structs[index];
        let count = entry.field_count as usize;

        let indices = match count {
            0 => Vec::new(),
            1 => vec![entry.data_or_offset as usize],
            _ => {
                let offset = entry.data_or_offset as usize;
                let bytes = offset
                    .checked_add(count.saturating_mul(4))
                    .and_then(|end| self.field_indices.get(offset..end))
                    .ok_or(Error::DanglingOffset {
                        block: "field indices",
                        offset,
                        limit: self.field_indices.len(),
                    })?;
                bytes
                    .chunks_exact(4)
                    .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize)
                    .collect()
            }
        };

        match indices.iter().find(|field| **field >= self.fields.len()) {
            Some(field) => Err(Error::DanglingOffset {
                block: "field",
                offset: *field,
                limit: self.fields.len(),
            }),
            None => Ok(indices),
        }
    }

    fn struct_fields(&self, index: usize) -> Result<Vec<(String, Pending)>> {
        self.field_indices_of(index)?
            .into_iter()
            .map(|field| {
                let entry = self.fields[field];
                let label = self
                    .labels
                    .get(entry.label_index as usize)
                    .ok_or(Error::DanglingOffset {
                        block: "label",
                        offset: entry.label_index as usize,
                        limit: self.labels.len(),
                    })?;
                Ok((label.clone(), self.field_value(field, entry)?))
            })
            .collect()
    }

    fn field_value(&self, field: usize, entry: FieldEntry) -> Result<Pending> {
        let field_type = GffFieldType::try_from(entry.field_type).map_err(|tag| Error::UnknownFieldType { tag, field })?;
        let data = entry.data_or_offset;

        Ok(Pending::Value(match field_type {
            GffFieldType::Byte => GffValue::Byte(data as u8),
            GffFieldType::Char => GffValue::Char(data as u8 as i8),
            GffFieldType::Word => GffValue::Word(data as u16),
            GffFieldType::Short => GffValue::Short(data as u16 as i16),
            GffFieldType::DWord => GffValue::DWord(data),
            GffFieldType::Int => GffValue::Int(data as i32),
            GffFieldType::Float => GffValue::Float(f32::from_bits(data)),
            GffFieldType::Struct => return Ok(Pending::Struct(data as usize)),
            GffFieldType::List => return Ok(Pending::List(self.list(data as usize)?)),
            complex => self.complex_value(complex, data as usize)?,
        }))
    }

    fn complex_value(&self, field_type: GffFieldType, offset: usize) -> Result<GffValue> {
        let dangling = || Error::DanglingOffset {
            block: "field data",
            offset,
            limit: self.field_data.len(),
        };

        let mut reader = BinaryReader::new(self.field_data);
        reader.seek(offset).map_err(|_| dangling())?;

        let value = read_complex(&mut reader, field_type);
        value.map_err(|error| match error {
            kotor_common::Error::OutOfBounds { .. } => dangling(),
            other => Error::BinaryError(other),
        })
    }

    fn list(&self, offset: usize) -> Result<Vec<usize>> {
        let dangling = || Error::DanglingOffset {
            block: "list indices",
            offset,
            limit: self.list_indices.len(),
        };

        let mut reader = BinaryReader::new(self.list_indices);
        reader.seek(offset).map_err(|_| dangling())?;
        let count = reader.read_u32().map_err(|_| dangling())? as usize;
        if count.saturating_mul(4) > reader.remaining() {
            return Err(dangling());
        }

        (0..count)
            .map(|_| reader.read_u32().map(|index| index as usize).map_err(|_| dangling()))
            .collect()
    }
}

fn read_complex(reader: &mut BinaryReader<'_>, field_type: GffFieldType) -> kotor_common::Result<GffValue> {
    Ok(match field_type {
        GffFieldType::DWord64 => GffValue::DWord64(reader.read_u64()?),
        GffFieldType::Int64 => GffValue::Int64(reader.read_i64()?),
        GffFieldType::Double => GffValue::Double(reader.read_f64()?),
        GffFieldType::CExoString => {
            let length = reader.read_u32()? as usize;
            GffValue::CExoString(text::decode(reader.read_bytes(length)?, text::DEFAULT_ENCODING))
        }
        GffFieldType::ResRef => {
            let length = reader.read_u8()? as usize;
            let name = text::decode(reader.read_bytes(length)?, text::DEFAULT_ENCODING);
            GffValue::ResRef(ResRef::new(name)?)
        }
        GffFieldType::CExoLocString => GffValue::CExoLocString(LocalizedString::read(reader)?),
        GffFieldType::Void => {
            let length = reader.read_u32()? as usize;
            GffValue::Void(reader.read_bytes(length)?.to_vec())
        }
        GffFieldType::Orientation => GffValue::Orientation([
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
        ]),
        // only Vector is left once inline kinds, structs and lists are handled by the caller
        _ => GffValue::Vector([reader.read_f32()?, reader.read_f32()?, reader.read_f32()?]),
    })
}

fn take(built: &mut [Option<GffStruct>], index: usize) -> Result<GffStruct> {
    built
        .get_mut(index)
        .and_then(Option::take)
        .ok_or(Error::StructCycle { index })
}

#[cfg(test)]
mod test {
    use kotor_common::ResRef;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::types::{FileType, Gff, GffStruct};

    #[rustfmt::skip]
    fn single_field_file() -> Vec<u8> {
        vec![
            // header
            0x55, 0x54, 0x49, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x50, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x60, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00,
            0x6A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x6A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            // struct 0
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            // field 0, ResRef at field data offset 0
            0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // label 0
            b'T', b'e', b'm', b'p', b'l', b'a', b't', b'e',
            b'R', b'e', b's', b'R', b'e', b'f', 0x00, 0x00,
            // field data
            0x09, b'g', b'_', b'i', b'_', b'f', b'r', b'm', b'1', b'1',
        ]
    }

    #[traced_test]
    #[test]
    fn read_single_field() -> Result<()> {
        let gff = Gff::decode(&single_field_file())?;

        assert_eq!(gff.file_type, FileType::new(*b"UTI "));
        assert_eq!(gff.root.struct_id, GffStruct::ROOT_ID);
        assert_eq!(gff.root.len(), 1);
        assert_eq!(gff.root.get_resref("TemplateResRef")?, &ResRef::new("g_i_frm11")?);

        Ok(())
    }

    #[test]
    fn read_bad_version() {
        let mut data = single_field_file();
        data[7] = b'3';

        assert!(matches!(Gff::decode(&data), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn read_truncated() {
        let data = single_field_file();

        assert!(matches!(
            Gff::decode(&data[..data.len() - 1]),
            Err(Error::TruncatedData { block: "field data", .. })
        ));
        assert!(matches!(
            Gff::decode(&data[..20]),
            Err(Error::TruncatedData { block: "header", .. })
        ));
    }

    #[test]
    fn read_dangling_label() {
        let mut data = single_field_file();
        // label index of field 0
        data[0x48] = 0x05;

        assert!(matches!(
            Gff::decode(&data),
            Err(Error::DanglingOffset { block: "label", offset: 5, limit: 1 })
        ));
    }

    #[test]
    fn read_dangling_field_data() {
        let mut data = single_field_file();
        // data offset of field 0
        data[0x4C] = 0x08;

        assert!(matches!(
            Gff::decode(&data),
            Err(Error::DanglingOffset { block: "field data", .. })
        ));
    }

    #[test]
    fn read_unknown_field_type() {
        let mut data = single_field_file();
        data[0x44] = 0x20;

        assert!(matches!(
            Gff::decode(&data),
            Err(Error::UnknownFieldType { tag: 0x20, field: 0 })
        ));
    }

    #[test]
    fn read_self_referencing_struct() {
        let mut data = single_field_file();
        // turn the field into a struct field pointing at struct 0
        data[0x44] = 0x0E;

        assert!(matches!(
            Gff::decode(&data),
            Err(Error::StructCycle { index: 0 })
        ));
    }

    #[test]
    fn read_dangling_struct() {
        let mut data = single_field_file();
        data[0x44] = 0x0E;
        data[0x4C] = 0x03;

        assert!(matches!(
            Gff::decode(&data),
            Err(Error::DanglingOffset { block: "struct", offset: 3, limit: 1 })
        ));
    }
}
