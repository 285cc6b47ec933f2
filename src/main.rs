//! CLI entry point for adjacency-constrained tile grid generation

use clap::Parser;
use tilewave::io::cli::{Cli, GenerationRunner};

fn main() -> tilewave::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let mut runner = GenerationRunner::new(cli);
    runner.process()
}
