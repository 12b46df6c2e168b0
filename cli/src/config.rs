//! Simulator configuration: state file location and seed state

use amm_model::{Pool, State, Wallet};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "dex-sim.toml";

/// State file used when neither the CLI nor the config file names one
pub const DEFAULT_STATE_PATH: &str = "data/database.json";

pub struct SimConfig {
    pub state_path: PathBuf,
    pub config_path: Option<PathBuf>,
    /// State written by `init`
    pub seed: State,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    state_path: Option<String>,
    seed: SeedSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SeedSection {
    pool: SeedPool,
    wallet: Wallet,
}

/// Seed reserves; K is always derived from them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedPool {
    #[serde(rename = "tokenA")]
    reserve_a: f64,
    #[serde(rename = "tokenB")]
    reserve_b: f64,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            pool: SeedPool {
                reserve_a: 1000.0,
                reserve_b: 1000.0,
            },
            wallet: Wallet::new(100.0, 100.0),
        }
    }
}

impl SimConfig {
    pub fn new(config_path: Option<PathBuf>, state_path: Option<String>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path)
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let file = match &config_path {
            Some(path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };

        Self::resolve(file, config_path, state_path)
    }

    fn resolve(
        file: ConfigFile,
        config_path: Option<PathBuf>,
        state_override: Option<String>,
    ) -> Result<Self> {
        let state_path = match (state_override, &file.state_path) {
            (Some(cli), _) => expand_path(&cli)?,
            (None, Some(from_file)) => {
                let path = expand_path(from_file)?;
                // Relative paths in a config file are relative to that file.
                match config_path.as_deref().and_then(Path::parent) {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                }
            }
            (None, None) => PathBuf::from(DEFAULT_STATE_PATH),
        };

        let seed = State::new(
            Pool::new(file.seed.pool.reserve_a, file.seed.pool.reserve_b),
            file.seed.wallet,
        );
        seed.validate().context("Invalid [seed] section in config")?;

        Ok(Self {
            state_path,
            config_path,
            seed,
        })
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&data).with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

/// Expand `~` and `$VARS` in a user-supplied path
fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
