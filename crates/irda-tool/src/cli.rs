//! Command-line definitions and how they merge with the config file.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use irda_core::IrdaConfig;

/// Discover IrDA devices and exchange data with them.
///
/// Settings come from the TOML file given with `--config` (if any); the
/// flags below override the file.
#[derive(Debug, Parser)]
#[command(name = "irda-tool", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "IRDA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read timeout in milliseconds; negative blocks indefinitely.
    #[arg(long, env = "IRDA_TIMEOUT_MS", allow_negative_numbers = true)]
    pub timeout_ms: Option<i64>,

    /// Log level used when `RUST_LOG` is unset (error, warn, info, debug, trace).
    #[arg(long, env = "IRDA_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List nearby devices.
    Discover {
        /// Print the devices as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Connect to a service and send data.
    Send {
        #[command(flatten)]
        target: Target,
        /// Data to send.
        data: String,
    },
    /// Connect, send data, then print the reply.
    Request {
        #[command(flatten)]
        target: Target,
        /// Data to send.
        data: String,
        /// Maximum number of reply bytes to read.
        #[arg(long, default_value_t = 1024)]
        max_bytes: usize,
    },
    /// Connect and report how many reply bytes are already waiting.
    Available {
        #[command(flatten)]
        target: Target,
    },
    /// Print the effective configuration as TOML, or save it to a file.
    Config {
        /// Write the configuration to this file instead of printing it.
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

/// Where to connect: a device address plus a service name or LSAP selector.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Target {
    /// Device address, hexadecimal (`0x01020304`) or decimal.
    #[arg(long, value_parser = parse_address)]
    pub address: u32,

    /// Service name, e.g. `OBEX` or `IrDA:IrCOMM`.
    #[arg(long, conflicts_with = "lsap")]
    pub service: Option<String>,

    /// Numeric LSAP selector.
    #[arg(long)]
    pub lsap: Option<u8>,
}

impl Cli {
    /// Loads the config file (or defaults) and applies the flag overrides.
    pub fn resolve_config(&self) -> anyhow::Result<IrdaConfig> {
        let mut config = match &self.config {
            Some(path) => IrdaConfig::load_from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => IrdaConfig::default(),
        };
        if let Some(timeout_ms) = self.timeout_ms {
            config.socket.timeout_ms = timeout_ms;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        Ok(config)
    }
}

/// Parses a device address written in hex (`0x` prefix) or decimal.
pub fn parse_address(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid device address '{text}': {e}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
