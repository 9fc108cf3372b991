use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::{GzDecoder, ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use minenbt::Tag;
use num_enum::TryFromPrimitive;

use crate::{Error, Result};

/// the size in bytes of a 'sector' in a region file. Sectors are Minecraft's size unit
/// for chunks. For example, a chunk might be `3 * SECTOR_SIZE` bytes. The
/// actual compressed bytes of a chunk may be smaller and the exact value is
/// tracked in the chunk header.
pub const SECTOR_SIZE: usize = 4096;

/// the size of the region file header.
pub const REGION_HEADER_SIZE: usize = 2 * SECTOR_SIZE;

/// size of header for each chunk in the region file. This header precedes the
/// compressed chunk data.
pub const CHUNK_HEADER_SIZE: usize = 5;

/// Number of chunks along each side of a region.
pub const REGION_WIDTH: usize = 32;

/// Largest a chunk may be once inflated. Reading a chunk that inflates past
/// this is [`Error::ChunkTooLarge`].
pub const CHUNK_INFLATE_LIMIT: usize = 8 * 1024 * 1024;

/// First sector after the header, where chunk data can start.
const FIRST_DATA_SECTOR: u64 = (REGION_HEADER_SIZE / SECTOR_SIZE) as u64;

/// A region file: up to 32x32 chunks, each compressed separately and found
/// through a table of sector offsets at the start of the file.
pub struct Region<S> {
    stream: S,
    // last offset is always the next valid place to write a chunk.
    offsets: Vec<u64>,
}

impl<S> Region<S>
where
    S: Read + Seek,
{
    /// Load a region from an existing stream. Will assume a seek of zero is the
    /// start of the region. Chunks are read from the underlying stream when
    /// needed.
    pub fn from_stream(stream: S) -> Result<Self> {
        let mut tmp = Self {
            stream,
            offsets: vec![],
        };

        let mut end = FIRST_DATA_SECTOR;

        for z in 0..REGION_WIDTH {
            for x in 0..REGION_WIDTH {
                if let Some(loc) = tmp.location(x, z)? {
                    tmp.offsets.push(loc.offset);
                    end = end.max(loc.offset + loc.sectors);
                }
            }
        }

        tmp.offsets.sort_unstable();

        // we add an offset representing the end of sectors that are in use.
        tmp.offsets.push(end);
        log::trace!("loaded region with {} chunks", tmp.offsets.len() - 1);
        Ok(tmp)
    }

    /// Return the inner stream, rewound to the start of the region.
    pub fn into_inner(mut self) -> io::Result<S> {
        self.stream.rewind()?;
        Ok(self.stream)
    }

    /// Read the chunk at the region-local coordinates x, z, which must both be
    /// in 0..32. The data returned is uncompressed NBT, or None if the region
    /// has no such chunk.
    pub fn read_chunk(&mut self, x: usize, z: usize) -> Result<Option<Vec<u8>>> {
        let loc = match self.location(x, z)? {
            Some(loc) => loc,
            None => return Ok(None),
        };

        self.stream
            .seek(SeekFrom::Start(loc.offset * SECTOR_SIZE as u64))?;

        let mut buf = [0u8; CHUNK_HEADER_SIZE];
        self.stream.read_exact(&mut buf)?;
        let meta = ChunkMeta::new(&buf)?;

        let allocated = loc.sectors as usize * SECTOR_SIZE;
        if CHUNK_HEADER_SIZE + meta.compressed_len as usize > allocated {
            return Err(Error::ChunkLengthMismatch);
        }

        let mut compressed = Vec::with_capacity(meta.compressed_len as usize);
        (&mut self.stream)
            .take(meta.compressed_len as u64)
            .read_to_end(&mut compressed)?;

        if compressed.len() < meta.compressed_len as usize {
            return Err(Error::InsufficientData);
        }

        let chunk = match meta.compression_scheme {
            CompressionScheme::Zlib => inflate(ZlibDecoder::new(compressed.as_slice()))?,
            CompressionScheme::Gzip => inflate(GzDecoder::new(compressed.as_slice()))?,
            CompressionScheme::Uncompressed => compressed,
        };

        Ok(Some(chunk))
    }

    /// Read and decode the chunk at x, z.
    pub fn read_chunk_tag(&mut self, x: usize, z: usize) -> Result<Option<Tag>> {
        match self.read_chunk(x, z)? {
            Some(data) => Ok(Some(minenbt::from_bytes(&data)?)),
            None => Ok(None),
        }
    }

    /// Where a chunk is stored, or None if it is not present.
    pub fn location(&mut self, x: usize, z: usize) -> Result<Option<ChunkLocation>> {
        self.stream.seek(SeekFrom::Start(header_pos(x, z)?))?;

        let mut buf = [0u8; 4];
        self.stream.read_exact(&mut buf[..])?;

        let offset = u64::from(buf[0]) << 16 | u64::from(buf[1]) << 8 | u64::from(buf[2]);
        let sectors = u64::from(buf[3]);

        if offset == 0 && sectors == 0 {
            return Ok(None);
        }
        Ok(Some(ChunkLocation { offset, sectors }))
    }
}

impl<S> Region<S>
where
    S: Read + Write + Seek,
{
    /// Create an entirely empty region. The provided stream will be
    /// overwritten, and will assume a seek to 0 is the start of the region.
    pub fn new(mut stream: S) -> Result<Self> {
        stream.rewind()?;
        stream.write_all(&[0; REGION_HEADER_SIZE])?;

        Ok(Self {
            stream,
            offsets: vec![FIRST_DATA_SECTOR],
        })
    }

    /// Write uncompressed NBT chunk data to x, z, compressing it with zlib.
    pub fn write_chunk(&mut self, x: usize, z: usize, uncompressed_chunk: &[u8]) -> Result<()> {
        let mut buf = vec![];
        let mut enc = ZlibEncoder::new(uncompressed_chunk, Compression::fast());
        enc.read_to_end(&mut buf)?;
        self.write_compressed_chunk(x, z, CompressionScheme::Zlib, &buf)
    }

    /// Encode a tree and write it to x, z.
    pub fn write_chunk_tag(&mut self, x: usize, z: usize, chunk: &Tag) -> Result<()> {
        let data = minenbt::to_bytes(chunk)?;
        self.write_chunk(x, z, &data)
    }

    /// Write already compressed chunk data to x, z. The chunk is written in
    /// place if it fits in the sectors it already has, otherwise it moves to
    /// the end of the region.
    pub fn write_compressed_chunk(
        &mut self,
        x: usize,
        z: usize,
        scheme: CompressionScheme,
        compressed_chunk: &[u8],
    ) -> Result<()> {
        let required_sectors = div_ceil(CHUNK_HEADER_SIZE + compressed_chunk.len(), SECTOR_SIZE);
        if required_sectors > u8::MAX as usize {
            return Err(Error::ChunkTooLarge);
        }

        let existing = self
            .location(x, z)?
            .and_then(|loc| self.offsets.binary_search(&loc.offset).ok());

        let offset = match existing {
            Some(i)
                if i + 1 < self.offsets.len()
                    && required_sectors as u64 <= self.offsets[i + 1] - self.offsets[i] =>
            {
                // we fit in the current gap in the file.
                self.offsets[i]
            }
            _ => {
                if let Some(i) = existing.filter(|i| i + 1 < self.offsets.len()) {
                    // this chunk will no longer be here.
                    self.offsets.remove(i);
                }
                let end = self.end();
                self.offsets.push(end + required_sectors as u64);
                end
            }
        };

        self.set_chunk(offset, scheme, compressed_chunk)?;
        self.set_header(x, z, offset, required_sectors)
    }

    /// Remove the chunk at x, z from the region. Its sectors are not reused
    /// until the region is rewritten.
    pub fn remove_chunk(&mut self, x: usize, z: usize) -> Result<()> {
        let loc = match self.location(x, z)? {
            Some(loc) => loc,
            None => return Ok(()),
        };

        if let Ok(i) = self.offsets.binary_search(&loc.offset) {
            if i + 1 < self.offsets.len() {
                self.offsets.remove(i);
            }
        }
        self.set_header(x, z, 0, 0)
    }

    fn end(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(FIRST_DATA_SECTOR)
    }

    fn set_chunk(&mut self, offset: u64, scheme: CompressionScheme, chunk: &[u8]) -> Result<()> {
        self.stream
            .seek(SeekFrom::Start(offset * SECTOR_SIZE as u64))?;

        // the length on disk includes the byte for the compression scheme.
        let len = u32::try_from(chunk.len() + 1).map_err(|_| Error::ChunkTooLarge)?;
        self.stream.write_all(&len.to_be_bytes())?;
        self.stream.write_all(&[scheme as u8])?;
        self.stream.write_all(chunk)?;

        // keep the file a whole number of sectors long.
        let padding = (SECTOR_SIZE - (CHUNK_HEADER_SIZE + chunk.len()) % SECTOR_SIZE) % SECTOR_SIZE;
        self.stream.write_all(&vec![0; padding])?;
        Ok(())
    }

    fn set_header(&mut self, x: usize, z: usize, offset: u64, sectors: usize) -> Result<()> {
        let sectors = u8::try_from(sectors).map_err(|_| Error::ChunkTooLarge)?;
        if offset > 0xFF_FFFF {
            return Err(Error::ChunkTooLarge);
        }
        let offset = offset.to_be_bytes();

        self.stream.seek(SeekFrom::Start(header_pos(x, z)?))?;
        self.stream.write_all(&[offset[5], offset[6], offset[7], sectors])?;
        Ok(())
    }
}

/// Various compression schemes that chunk data is compressed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CompressionScheme {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ChunkLocation {
    /// The offset, in units of 4kiB sectors, into the region file this chunk is
    /// located at. Offset 0 is the start of the file.
    pub offset: u64,

    /// The number of 4 kiB sectors that this chunk occupies in the region file.
    pub sectors: u64,
}

/// The 5 byte header in front of every chunk's data.
#[derive(Debug)]
struct ChunkMeta {
    compressed_len: u32,
    compression_scheme: CompressionScheme,
}

impl ChunkMeta {
    fn new(data: &[u8]) -> Result<Self> {
        if data.len() < CHUNK_HEADER_SIZE {
            return Err(Error::InsufficientData);
        }

        let mut buf = &data[..CHUNK_HEADER_SIZE];
        let len = buf.read_u32::<BigEndian>()?;
        let scheme = buf.read_u8()?;
        let scheme = CompressionScheme::try_from(scheme).map_err(|_| Error::InvalidChunkMeta)?;

        Ok(Self {
            // this len includes the compression byte.
            compressed_len: len.checked_sub(1).ok_or(Error::InvalidChunkMeta)?,
            compression_scheme: scheme,
        })
    }
}

fn inflate<R: Read>(decoder: R) -> Result<Vec<u8>> {
    let mut chunk = vec![];
    decoder
        .take(CHUNK_INFLATE_LIMIT as u64 + 1)
        .read_to_end(&mut chunk)?;

    if chunk.len() > CHUNK_INFLATE_LIMIT {
        return Err(Error::ChunkTooLarge);
    }
    Ok(chunk)
}

fn div_ceil(lhs: usize, rhs: usize) -> usize {
    (lhs + rhs - 1) / rhs
}

fn header_pos(x: usize, z: usize) -> Result<u64> {
    if x >= REGION_WIDTH || z >= REGION_WIDTH {
        return Err(Error::InvalidOffset(x as isize, z as isize));
    }
    Ok((4 * (x + z * REGION_WIDTH)) as u64)
}
