use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::info;
use mineanvil::{LegacyChunk, World};

/// Print a chunk of a world save, found through its region file or its own
/// chunk file.
#[derive(Parser)]
#[command(name = "chunk-dump")]
struct Args {
    /// The world directory, containing level.dat.
    world: PathBuf,

    /// Chunk x coordinate. Defaults to the player's chunk.
    #[arg(allow_negative_numbers = true, requires = "z")]
    x: Option<i32>,

    /// Chunk z coordinate.
    #[arg(allow_negative_numbers = true)]
    z: Option<i32>,

    /// Only print a summary of the blocks and light in the chunk.
    #[arg(long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let world = World::new(&args.world);

    let (x, z) = match (args.x, args.z) {
        (Some(x), Some(z)) => (x, z),
        _ => {
            let pos = world
                .player_chunk()
                .with_context(|| format!("reading level.dat in {}", args.world.display()))?;
            let pos = pos.unwrap_or((0, 0));
            info!("using player chunk ({}, {})", pos.0, pos.1);
            pos
        }
    };

    let root = match world
        .load_chunk(x, z)
        .with_context(|| format!("loading chunk ({}, {})", x, z))?
    {
        Some(root) => root,
        None => bail!("no chunk at ({}, {})", x, z),
    };

    if !args.summary {
        print!("{}", root);
        return Ok(());
    }

    let chunk = match LegacyChunk::from_tag(&root) {
        Some(chunk) => chunk,
        None => bail!("chunk ({}, {}) has no block data", x, z),
    };

    let mut solid = 0;
    let mut lit = 0;
    for bx in 0..mineanvil::CHUNK_WIDTH {
        for bz in 0..mineanvil::CHUNK_WIDTH {
            for y in 0..mineanvil::CHUNK_HEIGHT {
                if chunk.block(bx, y, bz).unwrap_or(0) != 0 {
                    solid += 1;
                }
                if chunk.block_light(bx, y, bz) > 0 {
                    lit += 1;
                }
            }
        }
    }

    println!("chunk ({}, {}) at {:?}", x, z, chunk.pos());
    println!("non-air blocks: {}", solid);
    println!("block lit: {}", lit);
    Ok(())
}
