mod app;
mod cli;

use anyhow::Result;
use clap::Parser;
use log::error;

use crate::cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        error!("command failed: {err}");
        for cause in err.chain().skip(1) {
            error!("caused by: {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => app::analyze(args),
        Commands::Filter(args) => app::filter(args),
        Commands::Negatives(args) => app::negatives(args),
        Commands::Schema => app::schema(),
    }
}
