//! Access to the chunks of a Minecraft world save.
//!
//! Older worlds keep every chunk in its own gzip compressed file, nested two
//! directories deep by coordinate. Later worlds pack 32x32 chunks into region
//! files. [`World`] hides the difference: it looks for a chunk in its region
//! file first and falls back to the per chunk file.
//!
//! ```no_run
//! use mineanvil::{LegacyChunk, World};
//!
//! # fn main() -> mineanvil::Result<()> {
//! let world = World::new("saves/World1");
//! let (cx, cz) = world.player_chunk()?.unwrap_or((0, 0));
//!
//! if let Some(tag) = world.load_chunk(cx, cz)? {
//!     if let Some(chunk) = LegacyChunk::from_tag(&tag) {
//!         println!("block at the bottom corner: {:?}", chunk.block(0, 0, 0));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod chunk;
mod files;
mod region;

pub use chunk::*;
pub use files::*;
pub use region::*;

#[cfg(test)]
mod test;

#[derive(Debug)]
pub enum Error {
    InsufficientData,
    IO(std::io::Error),
    InvalidOffset(isize, isize),
    InvalidChunkMeta,
    ChunkTooLarge,
    ChunkLengthMismatch,
    Nbt(minenbt::error::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IO(err)
    }
}

impl From<minenbt::error::Error> for Error {
    fn from(err: minenbt::error::Error) -> Error {
        Error::Nbt(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InsufficientData => f.write_str("insufficient data to parse chunk"),
            Error::IO(e) => f.write_fmt(format_args!("io error: {}", e)),
            Error::InvalidOffset(x, z) => {
                f.write_fmt(format_args!("invalid offset: x = {}, z = {}", x, z))
            }
            Error::InvalidChunkMeta => {
                f.write_str("compression scheme was not recognised for chunk")
            }
            Error::ChunkTooLarge => f.write_str("chunk too large to store in region"),
            Error::ChunkLengthMismatch => {
                f.write_str("chunk length is larger than its allocated sectors")
            }
            Error::Nbt(e) => f.write_fmt(format_args!("nbt error: {}", e)),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(e) => Some(e),
            Error::Nbt(e) => Some(e),
            _ => None,
        }
    }
}
