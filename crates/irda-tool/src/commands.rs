//! The subcommands, written against any [`RawSocket`] backend.
//!
//! `main` hands in a socket opened on the native backend; the tests hand in
//! a scripted mock.  Output goes to the supplied writer.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use irda_core::{IrdaConfig, ReadStop};
use irda_socket::{IrdaSocket, RawSocket};
use tracing::info;

use crate::cli::Target;

/// Prints every discovered device, one per line or as a JSON array.
pub fn discover<S: RawSocket>(
    socket: &IrdaSocket<S>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let devices = socket.discover_devices().context("discovering devices")?;
    info!(count = devices.len(), "discovery complete");

    if json {
        serde_json::to_writer_pretty(&mut *out, &devices).context("encoding devices")?;
        writeln!(out)?;
        return Ok(());
    }

    if devices.is_empty() {
        writeln!(out, "no devices found")?;
    }
    for device in &devices {
        let hints = device.hints.names().join(",");
        writeln!(out, "{device} [{hints}]")?;
    }
    Ok(())
}

/// Connects to `target` by service name or LSAP selector.
pub fn connect<S: RawSocket>(socket: &IrdaSocket<S>, target: &Target) -> anyhow::Result<()> {
    let result = match target.lsap {
        Some(lsap) => socket.connect_by_lsap(target.address, lsap),
        None => socket.connect_by_name(target.address, target.service.as_deref()),
    };
    result.with_context(|| format!("connecting to 0x{:08X}", target.address))
}

/// Connects and sends `data`.
pub fn send<S: RawSocket>(
    socket: &mut IrdaSocket<S>,
    target: &Target,
    data: &[u8],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    connect(socket, target)?;
    let sent = socket.write(data).context("sending data")?;
    writeln!(out, "sent {sent} bytes")?;
    Ok(())
}

/// Connects, sends `data`, then prints up to `max_bytes` of reply.
pub fn request<S: RawSocket>(
    socket: &mut IrdaSocket<S>,
    target: &Target,
    data: &[u8],
    max_bytes: usize,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    connect(socket, target)?;
    socket.write(data).context("sending request")?;

    let mut reply = vec![0u8; max_bytes];
    let report = socket.read_report(&mut reply).context("reading reply")?;
    let reason = match report.stop {
        ReadStop::Filled => "buffer full",
        ReadStop::TimedOut => "timed out",
        ReadStop::EndOfStream => "peer closed",
    };
    writeln!(
        out,
        "{}",
        String::from_utf8_lossy(&reply[..report.bytes])
    )?;
    writeln!(out, "received {} bytes ({reason})", report.bytes)?;
    Ok(())
}

/// Connects and prints the number of bytes readable without blocking.
pub fn available<S: RawSocket>(
    socket: &IrdaSocket<S>,
    target: &Target,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    connect(socket, target)?;
    let pending = socket.available().context("querying pending bytes")?;
    writeln!(out, "{pending}")?;
    Ok(())
}

/// Prints the effective configuration as TOML, or saves it to `write`.
///
/// Needs no socket, so it works on hosts without IrDA support.
pub fn config(
    config: &IrdaConfig,
    write: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match write {
        Some(path) => {
            config
                .save_to_path(path)
                .with_context(|| format!("saving config to {}", path.display()))?;
            info!(path = %path.display(), "configuration saved");
            writeln!(out, "wrote {}", path.display())?;
        }
        None => {
            let text = config.to_toml_string().context("encoding config")?;
            write!(out, "{text}")?;
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
