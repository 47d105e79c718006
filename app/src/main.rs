use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use common::{constant::DEFAULT_TOP_N, logger};
use engine::{run, EngineOptions};
use utils::pairs::{build_pair_list, load_pairs_file};

#[derive(Parser, Debug)]
#[command(
    name = "funding-monitor",
    about = "Live Binance funding rates, 24h movers and funding countdown"
)]
struct Cli {
    /// Pairs to watch, e.g. SOLUSDT dogeusdt
    #[arg(value_name = "PAIR")]
    pairs: Vec<String>,

    /// Read pairs from a newline-separated file instead of the arguments
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Do not add BTCUSDT and ETHUSDT automatically
    #[arg(long)]
    no_default_pairs: bool,

    /// Entries per side in each ranking
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logging(Path::new(logger::LOG_DIR))?;

    let raw = match &cli.file {
        Some(path) => load_pairs_file(path)?,
        None => cli.pairs,
    };
    let opts = EngineOptions {
        pairs: build_pair_list(raw, !cli.no_default_pairs),
        top_n: cli.top_n,
        ..EngineOptions::default()
    };
    run(opts).await
}
