//! Position-tracked little-endian reading and writing over in-memory buffers.
//!
//! The formats in this workspace mix sequential header reads with reads at absolute offsets into
//! data blocks, so [`BinaryReader`] exposes [`BinaryReader::seek`] and [`BinaryReader::tell`] next
//! to its primitive reads. Reads never panic: running past the end of the buffer is reported as
//! [`Error::OutOfBounds`] with the offset and the number of bytes that were missing.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};
use crate::text;

macro_rules! read_primitive {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $size:expr) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> Result<$ty> {
            let offset = self.tell();
            self.inner
                .$name::<LittleEndian>()
                .map_err(|_| self.out_of_bounds(offset, $size))
        }
    };
}

macro_rules! write_primitive {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: $ty) -> Result<()> {
            self.buffer.$name::<LittleEndian>(value)?;
            Ok(())
        }
    };
}

/// Sequential reader over a borrowed byte buffer
///
/// ```
/// use kotor_common::BinaryReader;
///
/// let data = [b'G', b'F', b'F', b' ', 0x2A, 0x00, 0x00, 0x00];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_fixed_string(4)?, "GFF ");
/// assert_eq!(reader.read_u32()?, 42);
/// assert!(reader.read_u8().is_err());
/// # Ok::<(), kotor_common::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current absolute position
    pub fn tell(&self) -> usize {
        self.inner.position() as usize
    }

    /// Number of bytes between the current position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.tell())
    }

    /// Move to an absolute position. Positioning exactly at the end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(Error::OutOfBounds {
                offset,
                requested: 0,
                available: 0,
            });
        }
        self.inner.set_position(offset as u64);
        Ok(())
    }

    /// Advance the position by `count` bytes
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.seek(self.tell() + count)
    }

    read_primitive!(
        /// Read a little-endian `u16`
        read_u16, u16, 2
    );
    read_primitive!(
        /// Read a little-endian `u32`
        read_u32, u32, 4
    );
    read_primitive!(
        /// Read a little-endian `u64`
        read_u64, u64, 8
    );
    read_primitive!(
        /// Read a little-endian `i16`
        read_i16, i16, 2
    );
    read_primitive!(
        /// Read a little-endian `i32`
        read_i32, i32, 4
    );
    read_primitive!(
        /// Read a little-endian `i64`
        read_i64, i64, 8
    );
    read_primitive!(
        /// Read a little-endian IEEE 754 single
        read_f32, f32, 4
    );
    read_primitive!(
        /// Read a little-endian IEEE 754 double
        read_f64, f64, 8
    );

    /// Read a single unsigned byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let offset = self.tell();
        self.inner
            .read_u8()
            .map_err(|_| self.out_of_bounds(offset, 1))
    }

    /// Read a single signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        let offset = self.tell();
        self.inner
            .read_i8()
            .map_err(|_| self.out_of_bounds(offset, 1))
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let start = self.tell();
        let data: &'a [u8] = *self.inner.get_ref();
        self.inner.set_position((start + count) as u64);
        Ok(&data[start..start + count])
    }

    /// Read a fixed size signature such as `b"GFF "` or `b"2DA V2.b"`
    pub fn read_signature<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut signature = [0u8; N];
        signature.copy_from_slice(self.read_bytes(N)?);
        Ok(signature)
    }

    /// Read `count` bytes as text, dropping a single trailing NUL if there is one
    pub fn read_fixed_string(&mut self, count: usize) -> Result<String> {
        let bytes = self.read_bytes(count)?;
        let bytes = bytes.strip_suffix(&[0]).unwrap_or(bytes);
        Ok(text::decode(bytes, text::DEFAULT_ENCODING))
    }

    /// Read a `count` byte NUL padded slot, keeping everything before the first NUL
    pub fn read_padded_string(&mut self, count: usize) -> Result<String> {
        let bytes = self.read_bytes(count)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Ok(text::decode(&bytes[..end], text::DEFAULT_ENCODING))
    }

    /// Borrow the bytes up to `delimiter`, consuming the delimiter as well
    pub fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.tell();
        let data: &'a [u8] = *self.inner.get_ref();
        let Some(length) = data[start.min(data.len())..]
            .iter()
            .position(|b| *b == delimiter)
        else {
            return Err(Error::UnterminatedString {
                offset: start,
                delimiter,
            });
        };

        self.inner.set_position((start + length + 1) as u64);
        Ok(&data[start..start + length])
    }

    /// Read a NUL terminated string
    pub fn read_null_terminated(&mut self) -> Result<String> {
        let bytes = self.read_until(0)?;
        Ok(text::decode(bytes, text::DEFAULT_ENCODING))
    }

    /// Peek at the next `count` bytes without moving
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let start = self.tell();
        let data: &'a [u8] = *self.inner.get_ref();
        Ok(&data[start..start + count])
    }

    fn ensure(&self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(self.out_of_bounds(self.tell(), count));
        }
        Ok(())
    }

    fn out_of_bounds(&self, offset: usize, requested: usize) -> Error {
        Error::OutOfBounds {
            offset,
            requested,
            available: self.len().saturating_sub(offset),
        }
    }
}

/// Append-only writer over a growable buffer
///
/// Offsets that are only known once later blocks have been laid out can be patched with
/// [`BinaryWriter::write_u32_at`].
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far, which is also the offset of the next write
    pub fn tell(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Borrow the bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Unwrap the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    write_primitive!(
        /// Write a little-endian `u16`
        write_u16, u16
    );
    write_primitive!(
        /// Write a little-endian `u32`
        write_u32, u32
    );
    write_primitive!(
        /// Write a little-endian `u64`
        write_u64, u64
    );
    write_primitive!(
        /// Write a little-endian `i16`
        write_i16, i16
    );
    write_primitive!(
        /// Write a little-endian `i32`
        write_i32, i32
    );
    write_primitive!(
        /// Write a little-endian `i64`
        write_i64, i64
    );
    write_primitive!(
        /// Write a little-endian IEEE 754 single
        write_f32, f32
    );
    write_primitive!(
        /// Write a little-endian IEEE 754 double
        write_f64, f64
    );

    /// Write a single unsigned byte
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer.write_u8(value)?;
        Ok(())
    }

    /// Write a single signed byte
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.buffer.write_i8(value)?;
        Ok(())
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Write `value` into a `size` byte slot, padding with NULs
    ///
    /// Fails with [`Error::FieldTooLong`] if the encoded text is longer than the slot.
    pub fn write_fixed_string(&mut self, value: &str, size: usize) -> Result<()> {
        let encoded = text::encode(value, text::DEFAULT_ENCODING)?;
        if encoded.len() > size {
            return Err(Error::FieldTooLong {
                max: size,
                actual: encoded.len(),
            });
        }

        self.buffer.extend_from_slice(&encoded);
        self.buffer.resize(self.buffer.len() + size - encoded.len(), 0);
        Ok(())
    }

    /// Write `value` followed by a NUL terminator
    pub fn write_null_terminated(&mut self, value: &str) -> Result<()> {
        let encoded = text::encode(value, text::DEFAULT_ENCODING)?;
        self.buffer.extend_from_slice(&encoded);
        self.buffer.push(0);
        Ok(())
    }

    /// Overwrite four already written bytes at `position`
    pub fn write_u32_at(&mut self, position: usize, value: u32) -> Result<()> {
        let Some(slot) = self.buffer.get_mut(position..position + 4) else {
            return Err(Error::OutOfBounds {
                offset: position,
                requested: 4,
                available: self.buffer.len().saturating_sub(position),
            });
        };
        LittleEndian::write_u32(slot, value);
        Ok(())
    }
}

/// Continue writing after existing bytes
impl From<Vec<u8>> for BinaryWriter {
    fn from(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }
}
