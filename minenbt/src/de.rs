//! Decoding of NBT into a [`Tag`] tree.
//!
//! Most users want [`from_path`][crate::from_path] or
//! [`from_bytes`][crate::from_bytes]. The [`Decoder`] is for reading tags from
//! a [`Source`][crate::Source] directly, for example several consecutive trees
//! out of one stream.
//!
//! ```
//! use minenbt::{de::Decoder, Kind, Source};
//!
//! let data = [8, 0, 1, b's', 0, 2, b'h', b'i'];
//! let mut source = Source::buffer(&data);
//!
//! let tag = Decoder::new(&mut source).read_tag().unwrap();
//! assert_eq!(tag.kind(), Kind::String);
//! assert_eq!(tag.as_str(), Some("hi"));
//! assert_eq!(source.position(), Some(data.len()));
//! ```
use byteorder::{BigEndian, ByteOrder};

use crate::{
    error::{Error, Result},
    input::Input,
    Compound, DecodeOpts, Kind, List, Tag, Value,
};

/// Reads tags from an [`Input`], recursing into lists and compounds.
pub struct Decoder<I: Input> {
    input: I,
    opts: DecodeOpts,
    depth: usize,
}

impl<I: Input> Decoder<I> {
    pub fn new(input: I) -> Self {
        Self::with_opts(input, DecodeOpts::default())
    }

    pub fn with_opts(input: I, opts: DecodeOpts) -> Self {
        Self {
            input,
            opts,
            depth: 0,
        }
    }

    /// Consumes this decoder, returning the underlying input.
    pub fn into_inner(self) -> I {
        self.input
    }

    /// Read one complete named tag: its kind, its name, then its payload. An
    /// End tag here is an error since it has no meaning outside a compound.
    pub fn read_tag(&mut self) -> Result<Tag> {
        // a failed read can leave levels entered but never left.
        self.depth = 0;
        match self.read_named()? {
            Some(tag) => Ok(tag),
            None => Err(Error::unexpected_end()),
        }
    }

    /// None when the tag read was End.
    fn read_named(&mut self) -> Result<Option<Tag>> {
        let kind = self.input.consume_kind()?;
        if kind == Kind::End {
            return Ok(None);
        }

        let name = self.input.consume_str()?;
        let value = self.read_value(kind)?;
        Ok(Some(Tag::new(name, value)))
    }

    /// Read a bare payload of the given kind, as found in lists.
    fn read_value(&mut self, kind: Kind) -> Result<Value> {
        Ok(match kind {
            Kind::End => return Err(Error::unexpected_end()),
            Kind::Byte => Value::Byte(self.input.consume_byte()? as i8),
            Kind::Short => Value::Short(self.input.consume_i16()?),
            Kind::Int => Value::Int(self.input.consume_i32()?),
            Kind::Long => Value::Long(self.input.consume_i64()?),
            Kind::Float => Value::Float(self.input.consume_f32()?),
            Kind::Double => Value::Double(self.input.consume_f64()?),
            Kind::String => Value::String(self.input.consume_str()?),
            Kind::ByteArray => {
                let len = self.consume_len()?;
                Value::ByteArray(self.input.consume_bytes(len)?)
            }
            Kind::IntArray => {
                let len = self.consume_len()?;
                let bytes = self.input.consume_bytes(try_size(len, 4)?)?;
                let mut data = vec![0; len];
                BigEndian::read_i32_into(&bytes, &mut data);
                Value::IntArray(data)
            }
            Kind::LongArray => {
                let len = self.consume_len()?;
                let bytes = self.input.consume_bytes(try_size(len, 8)?)?;
                let mut data = vec![0; len];
                BigEndian::read_i64_into(&bytes, &mut data);
                Value::LongArray(data)
            }
            Kind::List => Value::List(self.read_list()?),
            Kind::Compound => Value::Compound(self.read_compound()?),
        })
    }

    fn read_list(&mut self) -> Result<List> {
        let element_kind = self.input.consume_kind()?;
        let len = self.consume_len()?;

        // Empty lists are often written with an element kind of End, but an End
        // element has no payload so there is nothing to read for any other
        // length.
        if element_kind == Kind::End && len != 0 {
            return Err(Error::invalid_length(len as i64));
        }

        self.enter()?;
        let mut elements = Vec::with_capacity(self.capacity_for(len));
        for _ in 0..len {
            elements.push(self.read_value(element_kind)?);
        }
        self.leave();

        Ok(List::from_parts(element_kind, elements))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        self.enter()?;
        let mut compound = Compound::new();
        while let Some(tag) = self.read_named()? {
            compound.push(tag);
        }
        self.leave();

        Ok(compound)
    }

    fn consume_len(&mut self) -> Result<usize> {
        let len = self.input.consume_i32()?;
        usize::try_from(len).map_err(|_| Error::invalid_length(len as i64))
    }

    /// Every element takes at least one byte, so a buffer's remaining size
    /// bounds how many elements could really follow.
    fn capacity_for(&self, len: usize) -> usize {
        let cap = len.min(self.opts.prealloc_limit);
        match self.input.remaining() {
            Some(remaining) => cap.min(remaining),
            None => cap,
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.opts.max_depth {
            return Err(Error::too_deep(self.opts.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

fn try_size(len: usize, multiplier: usize) -> Result<usize> {
    len.checked_mul(multiplier)
        .ok_or_else(|| Error::invalid_length(len as i64))
}
