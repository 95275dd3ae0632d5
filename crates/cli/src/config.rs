//! Command-line configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use corelib::{HashRing, RingConfig};
use tracing::{info, Level};

use crate::commands::Command;

/// Inspect a consistent hash ring.
///
/// The ring is built from `--config` (a JSON `RingConfig`), then `--vnodes`
/// overrides its virtual-node count and `--servers` adds to its server list.
#[derive(Debug, Parser)]
#[command(name = "hashring", version, about)]
pub struct CliConfig {
    /// JSON ring configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Virtual nodes per server
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub vnodes: Option<usize>,

    /// Servers to add, comma separated
    #[arg(short, long, value_delimiter = ',', value_name = "NAMES")]
    pub servers: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Merge the config file (if any) with command-line overrides.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RingConfig::default(),
        };
        if let Some(vnodes) = self.vnodes {
            config.virtual_nodes = vnodes;
        }
        config.servers.extend(self.servers.iter().cloned());
        Ok(config)
    }

    pub fn build_ring(&self) -> anyhow::Result<HashRing> {
        let config = self.ring_config()?;
        let ring = HashRing::from_config(&config).context("failed to build ring")?;
        info!(
            servers = ring.server_count(),
            positions = ring.position_count(),
            virtual_nodes = ring.virtual_nodes(),
            "ring built"
        );
        Ok(ring)
    }

    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(self.verbose);
        let ring = self.build_ring()?;
        let result = self.command.execute(&ring)?;
        print!("{result}");
        Ok(())
    }
}

/// Read a JSON `RingConfig` from `path`.
pub fn load_config(path: &Path) -> anyhow::Result<RingConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // Logs go to stderr so stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
