use std::io::Cursor;

use crate::SECTOR_SIZE;

mod region;

/// Builds raw region bytes, for regions that [`crate::Region`] itself would
/// refuse to write.
pub struct Builder {
    inner: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn location(mut self, offset: u32, sectors: u8) -> Self {
        self.inner.extend_from_slice(&offset.to_be_bytes()[1..4]);
        self.inner.push(sectors);
        self
    }

    /// Jump to the start of the given sector, zero filling.
    pub fn sector(mut self, sector: usize) -> Self {
        self.inner.resize(sector * SECTOR_SIZE, 0);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.inner.extend_from_slice(bytes);
        self
    }

    pub fn build(mut self) -> Cursor<Vec<u8>> {
        let padded_sector_count = (self.inner.len() / SECTOR_SIZE) + 1;
        self.inner.resize(padded_sector_count * SECTOR_SIZE, 0);
        Cursor::new(self.inner)
    }

    pub fn build_unpadded(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.inner)
    }
}
