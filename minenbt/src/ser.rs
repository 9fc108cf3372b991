//! Encoding of a [`Tag`] tree back into NBT. Use [`to_bytes`][crate::to_bytes],
//! [`to_writer`][crate::to_writer] or [`to_path`][crate::to_path].
//!
//! The output mirrors the decoder exactly, so decoding what was encoded gives
//! back an equal tree.
use std::convert::TryInto;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::{Compound, Kind, List, Tag, Value};

pub(crate) trait WriteNbt: Write {
    fn write_kind(&mut self, kind: Kind) -> Result<()> {
        self.write_u8(kind as u8)?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str) -> Result<()> {
        let s = cesu8::to_java_cesu8(s);
        let len: u16 = s
            .len()
            .try_into()
            .map_err(|_| Error::too_long("string", s.len()))?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&s)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_i32::<BigEndian>(
            len.try_into()
                .map_err(|_| Error::too_long("sequence", len))?,
        )?;

        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}

/// Writes tags to a writer, keeping count of the bytes written.
pub struct Encoder<W: Write> {
    writer: Counter<W>,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Counter {
                inner: writer,
                count: 0,
            },
        }
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.writer.count
    }

    /// Consumes this encoder, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.inner
    }

    /// Write a complete named tag: its kind, name, then payload.
    pub fn write_tag(&mut self, tag: &Tag) -> Result<()> {
        self.writer.write_kind(tag.kind())?;
        self.writer.write_size_prefixed_str(tag.name())?;
        self.write_value(tag.value())
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        let w = &mut self.writer;
        match value {
            Value::Byte(v) => w.write_i8(*v)?,
            Value::Short(v) => w.write_i16::<BigEndian>(*v)?,
            Value::Int(v) => w.write_i32::<BigEndian>(*v)?,
            Value::Long(v) => w.write_i64::<BigEndian>(*v)?,
            Value::Float(v) => w.write_f32::<BigEndian>(*v)?,
            Value::Double(v) => w.write_f64::<BigEndian>(*v)?,
            Value::String(v) => w.write_size_prefixed_str(v)?,
            Value::ByteArray(v) => {
                w.write_len(v.len())?;
                w.write_all(v)?;
            }
            Value::IntArray(v) => {
                w.write_len(v.len())?;
                for i in v {
                    w.write_i32::<BigEndian>(*i)?;
                }
            }
            Value::LongArray(v) => {
                w.write_len(v.len())?;
                for i in v {
                    w.write_i64::<BigEndian>(*i)?;
                }
            }
            Value::List(v) => self.write_list(v)?,
            Value::Compound(v) => self.write_compound(v)?,
        }
        Ok(())
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        self.writer.write_kind(list.kind())?;
        self.writer.write_len(list.len())?;
        for element in list.iter() {
            self.write_value(element)?;
        }
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        for child in compound.iter() {
            self.write_tag(child)?;
        }
        self.writer.write_kind(Kind::End)
    }
}

struct Counter<W> {
    inner: W,
    count: usize,
}

impl<W: Write> Write for Counter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
