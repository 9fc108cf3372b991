//! minenbt reads and writes NBT (Named Binary Tag) data from *Minecraft: Java
//! Edition* world saves as an owned, mutable tree.
//!
//! * To parse data into a tree see [`from_path`], [`from_bytes`] and
//!   [`from_reader`], or drive a [`de::Decoder`] over a [`Source`] yourself.
//! * To write a tree back out see [`to_path`], [`to_writer`] and [`to_bytes`].
//! * For navigating and editing a tree see [`Tag`], [`Value`], [`List`] and
//!   [`Compound`].
//!
//! Both legacy chunk files and `level.dat` are single gzip compressed trees,
//! so [`from_path`] handles them directly. Chunks stored in region files are
//! inflated by the caller and decoded from memory with [`from_bytes`].
//!
//! # Quick example
//!
//! Find the player position in a `level.dat` file, falling back to the origin
//! if the world has no single player data.
//!
//!```no_run
//! use minenbt::error::Result;
//!
//! fn main() -> Result<()> {
//!     let root = minenbt::from_path("world/level.dat")?;
//!
//!     let pos = root
//!         .find_child("Data")
//!         .and_then(|data| data.find_child("Player"))
//!         .and_then(|player| player.find_child("Pos"))
//!         .and_then(|pos| pos.as_list());
//!
//!     match pos {
//!         Some(pos) => println!("player at {:?}", pos),
//!         None => println!("no player, using origin"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Building a tree
//!
//! ```
//! use minenbt::Tag;
//!
//! let mut root = Tag::compound("");
//! root.add_child(Tag::new("a", 5i32)).unwrap();
//!
//! let bytes = minenbt::to_bytes(&root).unwrap();
//! assert_eq!(bytes, [10, 0, 0, 3, 0, 1, b'a', 0, 0, 0, 5, 0]);
//!
//! let parsed = minenbt::from_bytes(&bytes).unwrap();
//! assert_eq!(parsed.find_child("a").and_then(Tag::as_int), Some(5));
//! assert_eq!(parsed, root);
//! ```

use std::{fs::File, io::Read, io::Write, path::Path};

use flate2::{write::GzEncoder, Compression};
use serde::Serialize;

pub mod de;
pub mod error;
pub mod input;
pub mod ser;

mod value;

pub use input::Source;
pub use value::*;

use crate::error::{Error, Result};

#[cfg(test)]
mod test;

/// The kind of an NBT tag. This does not carry the value or the name of the
/// data, and is the discriminant written on the wire.
#[derive(Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum Kind {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Raw bytes.
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// A list of unnamed values which all share the same kind.
    List = 9,
    /// An ordered collection of named tags.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl Kind {
    /// The conventional name of this kind, eg `TAG_Int`.
    pub fn name(self) -> &'static str {
        match self {
            Kind::End => "TAG_End",
            Kind::Byte => "TAG_Byte",
            Kind::Short => "TAG_Short",
            Kind::Int => "TAG_Int",
            Kind::Long => "TAG_Long",
            Kind::Float => "TAG_Float",
            Kind::Double => "TAG_Double",
            Kind::ByteArray => "TAG_Byte_Array",
            Kind::String => "TAG_String",
            Kind::List => "TAG_List",
            Kind::Compound => "TAG_Compound",
            Kind::IntArray => "TAG_Int_Array",
            Kind::LongArray => "TAG_Long_Array",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Crates exist to generate this code for us, but the kinds will very rarely
// change so writing it out is not a burden.
impl TryFrom<u8> for Kind {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use Kind::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Kind> for u8 {
    fn from(kind: Kind) -> Self {
        kind as u8
    }
}

/// Options for decoding. Use the builder methods to change the defaults.
///
/// ```
/// # use minenbt::DecodeOpts;
/// let opts = DecodeOpts::new().max_depth(64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct DecodeOpts {
    /// Maximum nesting of lists and compounds before decoding fails. The
    /// default of 128 decodes within a 2 MiB thread stack in debug builds.
    pub max_depth: usize,

    /// Upper bound on the number of elements allocated up front for a list or
    /// array. Larger declared lengths still decode, storage just grows as
    /// elements actually arrive.
    pub prealloc_limit: usize,
}

impl DecodeOpts {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Set the up front allocation limit for list and array elements.
    pub fn prealloc_limit(mut self, value: usize) -> Self {
        self.prealloc_limit = value;
        self
    }
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self {
            max_depth: 128,
            prealloc_limit: 4096,
        }
    }
}

/// Decode the root compound from a source. The source is left positioned after
/// the root tag; trailing data is not inspected.
pub fn decode(source: &mut Source<'_>) -> Result<Tag> {
    decode_with_opts(source, DecodeOpts::default())
}

/// As [`decode`] with the given options.
pub fn decode_with_opts(source: &mut Source<'_>, opts: DecodeOpts) -> Result<Tag> {
    let root = de::Decoder::with_opts(source, opts).read_tag()?;
    if root.kind() != Kind::Compound {
        return Err(Error::no_root_compound(root.kind()));
    }

    log::trace!("decoded root compound {:?}", root.name());
    Ok(root)
}

/// Parse a gzip compressed NBT file, eg a `level.dat` or a legacy chunk file.
/// The file is closed before returning, whether or not parsing succeeded.
pub fn from_path(path: impl AsRef<Path>) -> Result<Tag> {
    let mut source = Source::open(path)?;
    decode(&mut source)
}

/// Parse uncompressed NBT that has already been read into memory.
pub fn from_bytes(data: &[u8]) -> Result<Tag> {
    from_bytes_with_opts(data, DecodeOpts::default())
}

/// As [`from_bytes`] with the given options.
pub fn from_bytes_with_opts(data: &[u8], opts: DecodeOpts) -> Result<Tag> {
    decode_with_opts(&mut Source::buffer(data), opts)
}

/// Parse uncompressed NBT from a reader. Wrap the reader in a decoder such as
/// `flate2::read::GzDecoder` if the data is compressed, or use
/// [`Source::gzip`].
pub fn from_reader<R: Read>(reader: R) -> Result<Tag> {
    decode(&mut Source::raw(reader))
}

/// Serialize a tree to uncompressed NBT bytes.
pub fn to_bytes(tag: &Tag) -> Result<Vec<u8>> {
    let mut result = vec![];
    to_writer(&mut result, tag)?;
    Ok(result)
}

/// Serialize a tree as uncompressed NBT into the writer, returning the number
/// of bytes written.
pub fn to_writer<W: Write>(writer: W, tag: &Tag) -> Result<usize> {
    let mut encoder = ser::Encoder::new(writer);
    encoder.write_tag(tag)?;
    Ok(encoder.bytes_written())
}

/// Write a tree to a gzip compressed file, replacing any existing file.
/// Returns the number of uncompressed NBT bytes written.
pub fn to_path(path: impl AsRef<Path>, tag: &Tag) -> Result<usize> {
    let file = File::create(path.as_ref())?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    let written = to_writer(&mut encoder, tag)?;
    encoder.finish()?;

    log::debug!("wrote {} bytes to {}", written, path.as_ref().display());
    Ok(written)
}
