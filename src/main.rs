use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};

use repertoire_session::{App, AppConfig, FileStore, KeyValueStore, MemoryStore, Repertoire};

/// Record opening lines and practice them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file the repertoire is stored in
    #[arg(short, long, default_value = "repertoire.json")]
    store: PathBuf,

    /// Keep the repertoire in memory only
    #[arg(long, conflicts_with = "store")]
    memory: bool,

    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,

    /// Seed for the practice order
    #[arg(long)]
    seed: Option<u64>,

    /// Practice lines in saved order instead of shuffled
    #[arg(long)]
    in_order: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();
    info!("repertoire starting");

    let config = AppConfig {
        seed: args.seed,
        shuffle_practice: !args.in_order,
        ..AppConfig::default()
    };
    let store: Box<dyn KeyValueStore> = if args.memory {
        Box::new(MemoryStore::new())
    } else {
        info!(path = %args.store.display(), "using file store");
        Box::new(FileStore::new(args.store))
    };
    let repertoire = Repertoire::load(store, &config);

    let stdin = io::stdin();
    let mut app = App::new(repertoire, &config, io::stdout());
    app.run(stdin.lock())?;
    Ok(())
}
