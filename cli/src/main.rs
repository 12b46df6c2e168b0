//! DEX Sim CLI - Interactive constant-product exchange simulator
//!
//! Deposits liquidity into a two-asset x·y=k pool and swaps against it from
//! a menu, persisting pool and wallet to a JSON state file between runs.

use amm_model::PoolEngine;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

mod config;
mod display;
mod menu;
mod prompt;
mod store;

use config::SimConfig;
use menu::Session;
use prompt::Prompter;
use store::JsonFileStore;

#[derive(Parser)]
#[command(name = "dex-sim")]
#[command(about = "Uniswap V2 DEX Sim - Uniswap V2 based DEX simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./dex-sim.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the JSON state file (overrides the config file)
    #[arg(short, long, env = "DEX_SIM_STATE")]
    state: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the DEX user menu
    Menu,

    /// Create the state file from the configured seed state
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = SimConfig::new(cli.config.clone(), cli.state.clone())?;

    if cli.verbose {
        if let Some(path) = &config.config_path {
            println!("{} {}", "Config:".bright_cyan(), path.display());
        }
        println!("{} {}", "State file:".bright_cyan(), config.state_path.display());
    }

    match cli.command {
        Commands::Menu => {
            let store = JsonFileStore::new(&config.state_path);
            if !store.exists() {
                println!(
                    "{} {} (run `dex-sim init` to create it)",
                    "Warning: state file not found:".yellow(),
                    config.state_path.display()
                );
            }

            let stdin = io::stdin();
            let prompter = Prompter::new(stdin.lock(), io::stdout());
            Session::new(PoolEngine::new(store), prompter).run()?;
        }
        Commands::Init { force } => {
            let mut store = JsonFileStore::new(&config.state_path);
            store
                .init(&config.seed, force)
                .with_context(|| format!("Failed to initialize {}", config.state_path.display()))?;

            println!("{}", "=== State Initialized ===".bright_green().bold());
            println!("{} {}", "State file:".bright_cyan(), config.state_path.display());
            display::show_pool(&mut io::stdout(), &config.seed.pool)?;
            display::show_wallet(&mut io::stdout(), &config.seed.wallet)?;
        }
    }

    Ok(())
}
