use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

/// Print the tree in an NBT file, eg a level.dat or an old style chunk file.
#[derive(Parser)]
#[command(name = "nbt-dump")]
struct Args {
    /// File to read. Gzip compressed unless --raw is given.
    file: PathBuf,

    /// Print the tree as JSON rather than indented text.
    #[arg(long)]
    json: bool,

    /// The file holds uncompressed NBT.
    #[arg(long)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let parsed = if args.raw {
        let data = std::fs::read(&args.file)
            .with_context(|| format!("reading {}", args.file.display()))?;
        minenbt::from_bytes(&data)
    } else {
        minenbt::from_path(&args.file)
    };
    let root = parsed.with_context(|| format!("parsing {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        print!("{}", root);
    }

    Ok(())
}
