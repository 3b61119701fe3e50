//! Command-line arguments, the optional TOML config file, and how they
//! combine. CLI flags override the config file, which overrides defaults.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use userboard_core::source::DEFAULT_RESULT_COUNT;

use crate::client::{ApiConfig, DEFAULT_BASE_URL};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "userboard", about = "Terminal dashboard for sample user records")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Sample-data endpoint (default: https://randomuser.me/api/).
  #[arg(long, env = "USERBOARD_URL")]
  pub url: Option<String>,

  /// Number of users to fetch on load (default: 10).
  #[arg(short = 'n', long, env = "USERBOARD_RESULTS")]
  pub results: Option<usize>,

  /// Seed passed to the endpoint for reproducible results.
  #[arg(long, env = "USERBOARD_SEED")]
  pub seed: Option<String>,

  /// Request timeout in seconds. No timeout when unset.
  #[arg(long, value_name = "SECS")]
  pub timeout: Option<u64>,

  /// Where diagnostics are written (default: $TMPDIR/userboard.log).
  #[arg(long, env = "USERBOARD_LOG_FILE", value_name = "FILE")]
  pub log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
pub struct ConfigFile {
  #[serde(default)]
  pub url:      Option<String>,
  #[serde(default)]
  pub results:  Option<usize>,
  #[serde(default)]
  pub seed:     Option<String>,
  #[serde(default)]
  pub timeout:  Option<u64>,
  #[serde(default)]
  pub log_file: Option<PathBuf>,
}

impl ConfigFile {
  /// Read `path` if given, otherwise return an empty config.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

// ─── Resolved settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Settings {
  pub api:      ApiConfig,
  pub results:  usize,
  pub log_file: PathBuf,
}

impl Settings {
  pub fn resolve(args: Args, file: ConfigFile) -> Self {
    let api = ApiConfig {
      base_url: args
        .url
        .or(file.url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
      seed:     args.seed.or(file.seed),
      timeout:  args.timeout.or(file.timeout).map(Duration::from_secs),
    };
    Self {
      api,
      results: args
        .results
        .or(file.results)
        .unwrap_or(DEFAULT_RESULT_COUNT),
      log_file: args
        .log_file
        .or(file.log_file)
        .unwrap_or_else(|| std::env::temp_dir().join("userboard.log")),
    }
  }
}
