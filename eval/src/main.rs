mod cli;
mod config;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reviewer::logging;

use crate::config::Overrides;

const DEFAULT_RUN: &str = "airline-gpt4.1-mini.json";

#[derive(Parser)]
#[command(
    name = "eval",
    version,
    about = "Review and score benchmark simulation runs"
)]
struct Cli {
    /// Config file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "review.toml")]
    config: PathBuf,

    /// Data directory (overrides `data_dir` from the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print evaluation-criteria statistics for every domain.
    Stats,
    /// Print the formatted case of every failed simulation in a run.
    Cases {
        #[arg(default_value = DEFAULT_RUN)]
        name: String,
    },
    /// Review every failed simulation of a run with the model.
    Review {
        #[arg(default_value = DEFAULT_RUN)]
        name: String,
        /// Maximum review requests in flight.
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Regenerate the readable report from a run's review file.
    Readable {
        #[arg(default_value = DEFAULT_RUN)]
        name: String,
        /// Include the case text before each review.
        #[arg(long)]
        include_case: bool,
    },
    /// Print pass rates and the agent error distribution of a reviewed run.
    Score {
        #[arg(default_value = DEFAULT_RUN)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let concurrency = match &cli.command {
        Command::Review { concurrency, .. } => *concurrency,
        _ => None,
    };
    let overrides = Overrides {
        data_dir: cli.data_dir,
        concurrency,
    };
    let cfg = config::load(&cli.config, &overrides)?;

    match cli.command {
        Command::Stats => cli::show_stats(&cfg),
        Command::Cases { name } => cli::show_cases(&cfg, &name),
        Command::Review { name, .. } => cli::review(&cfg, &name).await,
        Command::Readable { name, include_case } => cli::readable(&cfg, &name, include_case),
        Command::Score { name } => cli::score_run(&cfg, &name),
    }
}
