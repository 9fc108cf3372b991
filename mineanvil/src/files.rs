use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use minenbt::{Tag, Value};

use crate::{Region, Result, REGION_WIDTH};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Format a number in base 36 with lowercase digits, as used in the names of
/// per chunk files. Negative numbers get a leading `-`.
pub fn base36(n: i32) -> String {
    let mut m = n.unsigned_abs();
    let mut digits = vec![];
    loop {
        digits.push(DIGITS[(m % 36) as usize]);
        m /= 36;
        if m == 0 {
            break;
        }
    }
    if n < 0 {
        digits.push(b'-');
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

/// Path of the per chunk file for chunk x, z, relative to the world
/// directory. Chunks are spread over 64x64 directories by coordinate, eg
/// chunk (-13, 44) is at `1f/18/c.-d.18.dat`.
pub fn chunk_file_path(x: i32, z: i32) -> PathBuf {
    let mut path = PathBuf::new();
    path.push(base36(x.rem_euclid(64)));
    path.push(base36(z.rem_euclid(64)));
    path.push(format!("c.{}.{}.dat", base36(x), base36(z)));
    path
}

/// Name of the region file holding chunk x, z.
pub fn region_file_name(x: i32, z: i32) -> String {
    format!("r.{}.{}.mcr", x >> 5, z >> 5)
}

/// A world save directory.
#[derive(Debug, Clone)]
pub struct World {
    dir: PathBuf,
}

impl World {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The region file for chunk x, z, if the world has one. McRegion files
    /// are preferred over Anvil ones.
    pub fn region_path(&self, x: i32, z: i32) -> Option<PathBuf> {
        let mcr = self.dir.join("region").join(region_file_name(x, z));
        if mcr.is_file() {
            return Some(mcr);
        }

        let mca = mcr.with_extension("mca");
        mca.is_file().then_some(mca)
    }

    /// Load chunk x, z. The region file is tried first, then the chunk's own
    /// gzip file. A chunk that is in neither place is `Ok(None)`.
    pub fn load_chunk(&self, x: i32, z: i32) -> Result<Option<Tag>> {
        if let Some(path) = self.region_path(x, z) {
            let mut region = Region::from_stream(BufReader::new(File::open(&path)?))?;
            let (rx, rz) = region_local(x, z);

            if let Some(tag) = region.read_chunk_tag(rx, rz)? {
                log::trace!("chunk ({}, {}) read from {}", x, z, path.display());
                return Ok(Some(tag));
            }
        }

        let path = self.dir.join(chunk_file_path(x, z));
        match minenbt::from_path(&path) {
            Ok(tag) => {
                log::trace!("chunk ({}, {}) read from {}", x, z, path.display());
                Ok(Some(tag))
            }
            Err(_) if !path.is_file() => {
                log::debug!("no chunk at ({}, {})", x, z);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse the world's `level.dat`.
    pub fn level(&self) -> Result<Tag> {
        Ok(minenbt::from_path(self.dir.join("level.dat"))?)
    }

    /// The chunk the single player is standing in, from `Data.Player.Pos` in
    /// `level.dat`. None if the world has no player or the level file is
    /// missing.
    pub fn player_chunk(&self) -> Result<Option<(i32, i32)>> {
        let level = match self.level() {
            Ok(level) => level,
            Err(crate::Error::Nbt(e)) if !self.dir.join("level.dat").is_file() => {
                log::debug!("no level.dat in {}: {}", self.dir.display(), e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let pos = level
            .find_child("Data")
            .and_then(|data| data.find_child("Player"))
            .and_then(|player| player.find_child("Pos"))
            .and_then(Tag::as_list);

        let coords: Vec<f64> = match pos {
            Some(pos) => pos.iter().filter_map(Value::as_double).collect(),
            None => return Ok(None),
        };

        match coords[..] {
            [x, _, z] => Ok(Some((block_to_chunk(x), block_to_chunk(z)))),
            _ => {
                log::warn!("player position has {} coordinates", coords.len());
                Ok(None)
            }
        }
    }
}

/// Region-local coordinates of a chunk, each in 0..32.
pub fn region_local(x: i32, z: i32) -> (usize, usize) {
    let mask = REGION_WIDTH as i32 - 1;
    ((x & mask) as usize, (z & mask) as usize)
}

fn block_to_chunk(coord: f64) -> i32 {
    (coord / 16.0).floor() as i32
}
