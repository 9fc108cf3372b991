use minenbt::Tag;

/// Width of a chunk along x and z, in blocks.
pub const CHUNK_WIDTH: usize = 16;

/// Height of a chunk in the old chunk format.
pub const CHUNK_HEIGHT: usize = 128;

/// Sky light assumed when a chunk carries no sky light data.
pub const DEFAULT_SKY_LIGHT: u8 = 15;

/// Block light assumed when a chunk carries no block light data.
pub const DEFAULT_BLOCK_LIGHT: u8 = 0;

/// A read only view of a chunk in the old, pre-Anvil format, where blocks are
/// one flat array ordered y, then z, then x, and light is packed two values to
/// a byte.
#[derive(Debug, Clone, Copy)]
pub struct LegacyChunk<'a> {
    level: &'a Tag,
    blocks: &'a [u8],
    sky_light: Option<&'a [u8]>,
    block_light: Option<&'a [u8]>,
}

impl<'a> LegacyChunk<'a> {
    /// View the root tag of a chunk. None if it has no `Level` compound or no
    /// `Blocks` array. Light arrays that are missing are treated as fully
    /// lit by the sky and unlit by blocks.
    pub fn from_tag(root: &'a Tag) -> Option<Self> {
        let level = root.find_child("Level")?;
        let blocks = level.find_child("Blocks")?.as_byte_array()?;

        let nibbles = |name: &str| {
            level
                .find_child(name)
                .and_then(Tag::as_byte_array)
                .map(Vec::as_slice)
        };

        Some(Self {
            level,
            blocks,
            sky_light: nibbles("SkyLight"),
            block_light: nibbles("BlockLight"),
        })
    }

    /// The chunk's own coordinates, from `xPos` and `zPos`.
    pub fn pos(&self) -> Option<(i32, i32)> {
        let x = self.level.find_child("xPos")?.as_int()?;
        let z = self.level.find_child("zPos")?.as_int()?;
        Some((x, z))
    }

    /// Block id at chunk-local x, y, z. None outside the chunk or if the
    /// block array is too short.
    pub fn block(&self, x: usize, y: usize, z: usize) -> Option<u8> {
        self.blocks.get(block_index(x, y, z)?).copied()
    }

    pub fn sky_light(&self, x: usize, y: usize, z: usize) -> u8 {
        light(self.sky_light, x, y, z).unwrap_or(DEFAULT_SKY_LIGHT)
    }

    pub fn block_light(&self, x: usize, y: usize, z: usize) -> u8 {
        light(self.block_light, x, y, z).unwrap_or(DEFAULT_BLOCK_LIGHT)
    }
}

fn block_index(x: usize, y: usize, z: usize) -> Option<usize> {
    if x >= CHUNK_WIDTH || y >= CHUNK_HEIGHT || z >= CHUNK_WIDTH {
        return None;
    }
    Some(y + z * CHUNK_HEIGHT + x * CHUNK_HEIGHT * CHUNK_WIDTH)
}

fn light(data: Option<&[u8]>, x: usize, y: usize, z: usize) -> Option<u8> {
    let i = block_index(x, y, z)?;
    let packed = *data?.get(i / 2)?;

    // even indices are the low nibble.
    Some(if i % 2 == 0 { packed & 0x0F } else { packed >> 4 })
}
