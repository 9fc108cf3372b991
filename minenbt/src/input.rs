//! Sources of NBT data for the decoder.
//!
//! A [`Source`] is either a stream that is read through a decompressor, or a
//! buffer that has already been inflated into memory (eg a chunk taken out of
//! a region file). Both are consumed strictly sequentially.
//!
//! The two behave differently when input runs out. A stream returns however
//! many bytes it could still produce, while a buffer refuses a read that would
//! go past its end and copies nothing.
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use byteorder::{BigEndian, ByteOrder};
use flate2::read::GzDecoder;

use crate::{
    error::{Error, Result},
    Kind,
};

mod private {
    // Only this crate can implement this trait. Other traits can inherit from
    // Sealed in order to prevent other crates from creating implementations.
    pub trait Sealed {}
}

/// Stream reads never allocate more than this ahead of the data actually
/// arriving, whatever length prefix the input claims.
const STREAM_READ_AHEAD: usize = 64 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Sequential input the decoder reads from. All multi-byte values are big
/// endian on the wire and are converted to host order here.
pub trait Input: private::Sealed {
    /// Fill the whole of `buf`, or fail with [`ErrorKind::Truncated`][crate::error::ErrorKind::Truncated].
    #[doc(hidden)]
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Read exactly `n` bytes. Implementations must not allocate for data the
    /// input cannot supply.
    #[doc(hidden)]
    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>>;

    /// How many bytes are left, if that is known.
    #[doc(hidden)]
    fn remaining(&self) -> Option<usize>;

    fn consume_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    fn consume_kind(&mut self) -> Result<Kind> {
        let tag = self.consume_byte()?;
        Kind::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    fn consume_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(BigEndian::read_u16(&buf))
    }

    fn consume_i16(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(BigEndian::read_i16(&buf))
    }

    fn consume_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(BigEndian::read_i32(&buf))
    }

    fn consume_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(BigEndian::read_i64(&buf))
    }

    fn consume_f32(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(BigEndian::read_f32(&buf))
    }

    fn consume_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(BigEndian::read_f64(&buf))
    }

    /// A string prefixed by its unsigned 16 bit length, in Java's modified
    /// UTF-8.
    fn consume_str(&mut self) -> Result<String> {
        let len = self.consume_u16()? as usize;
        let bytes = self.consume_bytes(len)?;

        match cesu8::from_java_cesu8(&bytes) {
            Ok(s) => Ok(s.into_owned()),
            Err(_) => Err(Error::nonunicode(&bytes)),
        }
    }
}

impl<T: Input + ?Sized> private::Sealed for &mut T {}

impl<T: Input + ?Sized> Input for &mut T {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).fill(buf)
    }

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        (**self).consume_bytes(n)
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// Pre-inflated NBT in memory, with a read position.
#[derive(Debug, Clone)]
pub struct Slice<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Slice<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Copy `buf.len()` bytes into `buf`. Reading past the end of the buffer
    /// fails without copying anything or moving the position.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let src = self.consume(buf.len())?;
        buf.copy_from_slice(src);
        Ok(buf.len())
    }

    fn consume(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(Error::truncated)?;

        let ret = &self.data[self.pos..end];
        self.pos = end;
        Ok(ret)
    }
}

impl<'a> private::Sealed for Slice<'a> {}

impl<'a> Input for Slice<'a> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read(buf).map(|_| ())
    }

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.consume(n)?.to_vec())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.data.len() - self.pos)
    }
}

/// A stream of NBT from any reader. Does not do decompression itself.
pub struct Reader<R: Read> {
    reader: R,
}

impl<R: Read> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read up to `buf.len()` bytes, stopping early only when the stream
    /// ends. A short count means the end of the stream was reached.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Consumes this reader, returning the underlying value.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> private::Sealed for Reader<R> {}

impl<R: Read> Input for Reader<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.read(buf)? < buf.len() {
            return Err(Error::truncated());
        }
        Ok(())
    }

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        // Growing with the data means a bogus length can't make us allocate
        // more than the stream really holds.
        let mut buf = Vec::with_capacity(n.min(STREAM_READ_AHEAD));
        (&mut self.reader).take(n as u64).read_to_end(&mut buf)?;

        if buf.len() < n {
            return Err(Error::truncated());
        }
        Ok(buf)
    }

    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Where the decoder gets its bytes from, chosen when the source is
/// constructed.
pub enum Source<'a> {
    /// A stream, typically a file read through a gzip decompressor.
    Stream(Reader<Box<dyn Read + 'a>>),
    /// A pre-inflated buffer in memory.
    Buffer(Slice<'a>),
}

impl Source<'static> {
    /// Open a gzip compressed file. Fails straight away if the file is missing
    /// or does not start with a gzip header. The file is closed when the
    /// source is dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = BufReader::new(File::open(path)?);

        if !file.fill_buf()?.starts_with(&GZIP_MAGIC) {
            return Err(Error::io(format!(
                "not a gzip file: {}",
                path.display()
            )));
        }

        log::trace!("opened {} for decoding", path.display());
        Ok(Source::gzip(file))
    }
}

impl<'a> Source<'a> {
    /// Read gzip compressed NBT from a reader.
    pub fn gzip<R: Read + 'a>(reader: R) -> Self {
        Source::Stream(Reader::new(Box::new(GzDecoder::new(reader))))
    }

    /// Read uncompressed NBT from a reader.
    pub fn raw<R: Read + 'a>(reader: R) -> Self {
        Source::Stream(Reader::new(Box::new(reader)))
    }

    /// Read from an inflated buffer in memory.
    pub fn buffer(data: &'a [u8]) -> Self {
        Source::Buffer(Slice::new(data))
    }

    /// Read into `buf`, returning how many bytes were read. A stream returns a
    /// short count at the end of its data; a buffer instead fails with a
    /// truncation error and reads nothing.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self {
            Source::Stream(r) => r.read(buf),
            Source::Buffer(s) => s.read(buf),
        }
    }

    /// The read position for a buffer. Streams don't track one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Source::Stream(_) => None,
            Source::Buffer(s) => Some(s.position()),
        }
    }
}

impl<'a> private::Sealed for Source<'a> {}

impl<'a> Input for Source<'a> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self {
            Source::Stream(r) => r.fill(buf),
            Source::Buffer(s) => s.fill(buf),
        }
    }

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        match self {
            Source::Stream(r) => r.consume_bytes(n),
            Source::Buffer(s) => s.consume_bytes(n),
        }
    }

    fn remaining(&self) -> Option<usize> {
        match self {
            Source::Stream(r) => r.remaining(),
            Source::Buffer(s) => s.remaining(),
        }
    }
}
