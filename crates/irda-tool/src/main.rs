//! irda-tool: discover IrDA devices and exchange data with them.
//!
//! # Usage
//!
//! ```text
//! irda-tool [--config FILE] [--timeout-ms MS] [--log-level LEVEL] <COMMAND>
//!
//! Commands:
//!   discover [--json]                                  list nearby devices
//!   send      --address ADDR (--service NAME | --lsap N) DATA
//!   request   --address ADDR (--service NAME | --lsap N) DATA [--max-bytes N]
//!   available --address ADDR (--service NAME | --lsap N)
//!   config [--write FILE]                              print or save the effective config
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Flag            |
//! |-------------------|-----------------|
//! | `IRDA_CONFIG`     | `--config`      |
//! | `IRDA_TIMEOUT_MS` | `--timeout-ms`  |
//! | `IRDA_LOG_LEVEL`  | `--log-level`   |
//!
//! `RUST_LOG` takes precedence over the configured log level.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use irda_core::IrdaConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins when present; otherwise the configured level applies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Command::Config { write } = &cli.command {
        let stdout = std::io::stdout();
        return commands::config(&config, write.as_deref(), &mut stdout.lock());
    }

    let _subsystem =
        irda_socket::subsystem::Subsystem::start().context("starting the network subsystem")?;

    let result = run(cli.command, &config);
    if result.is_err() {
        let code = irda_socket::last_error::error_code();
        if code != 0 {
            tracing::debug!(
                code,
                message = irda_socket::last_error::error_message().unwrap_or_default(),
                "last platform error"
            );
        }
    }
    result
}

#[cfg(any(target_os = "linux", target_os = "windows"))]
fn run(command: Command, config: &IrdaConfig) -> anyhow::Result<()> {
    use irda_socket::NativeIrdaSocket;

    let mut socket = NativeIrdaSocket::open()
        .context("opening an IrDA socket")?
        .with_discovery_policy(config.discovery_policy());
    socket.set_timeout(config.socket.timeout_ms)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Discover { json } => commands::discover(&socket, json, &mut out)?,
        Command::Send { target, data } => {
            commands::send(&mut socket, &target, data.as_bytes(), &mut out)?
        }
        Command::Request {
            target,
            data,
            max_bytes,
        } => commands::request(&mut socket, &target, data.as_bytes(), max_bytes, &mut out)?,
        Command::Available { target } => commands::available(&socket, &target, &mut out)?,
        Command::Config { write } => commands::config(config, write.as_deref(), &mut out)?,
    }

    socket.close().context("closing the IrDA socket")?;
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn run(_command: Command, _config: &IrdaConfig) -> anyhow::Result<()> {
    anyhow::bail!("IrDA sockets are only available on Linux and Windows")
}
