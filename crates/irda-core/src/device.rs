//! The uniform device tuple produced by discovery.
//!
//! Both platform layouts decode their native device-list entries into a
//! [`DiscoveredDevice`]: a 32-bit address, a display name, a character-set
//! identifier and a 16-bit service-hint mask.  Devices are transient; the
//! socket layer hands them to the discovery callback and keeps nothing.

use std::fmt;

use serde::Serialize;

/// Width of the device-name field in both native device-list layouts.
pub const DEVICE_NAME_FIELD_LEN: usize = 22;

/// IrLMP character-set identifier for ISO-8859-1.
pub const CHARSET_ISO_8859_1: u8 = 1;

/// 16-bit IrLMP service-hint bitmask.
///
/// The first hint byte occupies the high half, the second byte the low half,
/// matching how both native layouts are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct HintFlags(pub u16);

impl HintFlags {
    pub const PNP: u16 = 1 << 8;
    pub const PDA: u16 = 1 << 9;
    pub const COMPUTER: u16 = 1 << 10;
    pub const PRINTER: u16 = 1 << 11;
    pub const MODEM: u16 = 1 << 12;
    pub const FAX: u16 = 1 << 13;
    pub const LAN_ACCESS: u16 = 1 << 14;
    /// Set when a further hint byte follows on the wire.
    pub const EXTENSION: u16 = 1 << 15;
    pub const TELEPHONY: u16 = 1 << 0;
    pub const FILE_SERVER: u16 = 1 << 1;
    pub const IRCOMM: u16 = 1 << 2;
    pub const MESSAGE: u16 = 1 << 3;
    pub const HTTP: u16 = 1 << 4;
    pub const OBEX: u16 = 1 << 5;

    const NAMES: [(u16, &'static str); 14] = [
        (Self::PNP, "pnp"),
        (Self::PDA, "pda"),
        (Self::COMPUTER, "computer"),
        (Self::PRINTER, "printer"),
        (Self::MODEM, "modem"),
        (Self::FAX, "fax"),
        (Self::LAN_ACCESS, "lan"),
        (Self::EXTENSION, "extension"),
        (Self::TELEPHONY, "telephony"),
        (Self::FILE_SERVER, "file-server"),
        (Self::IRCOMM, "ircomm"),
        (Self::MESSAGE, "message"),
        (Self::HTTP, "http"),
        (Self::OBEX, "obex"),
    ];

    /// Assembles the mask big-endian from the two raw hint bytes.
    pub fn from_bytes(first: u8, second: u8) -> Self {
        HintFlags(u16::from_be_bytes([first, second]))
    }

    /// Returns `true` if every bit in `flag` is set.
    pub fn contains(&self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// Returns the names of the set hint bits, high byte first.
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for HintFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// One device reported by the kernel's discovery log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    /// 32-bit IrDA device address, usable directly with the connect calls.
    pub address: u32,
    /// Display name advertised by the device.
    pub name: String,
    /// IrLMP character-set identifier of `name` (0 = ASCII, 1 = ISO-8859-1, …).
    pub charset: u8,
    /// Service hints advertised by the device.
    pub hints: HintFlags,
}

impl DiscoveredDevice {
    /// Decodes a fixed-width, NUL-padded name field using `charset`.
    ///
    /// The name ends at the first NUL or at the field boundary.  ISO-8859-1
    /// bytes map one-to-one onto code points; every other charset is read
    /// as UTF-8 with invalid sequences replaced.
    pub fn decode_name(raw: &[u8], charset: u8) -> String {
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let bytes = &raw[..end];
        if charset == CHARSET_ISO_8859_1 {
            bytes.iter().map(|&b| char::from(b)).collect()
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

impl fmt::Display for DiscoveredDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08X} {:?} charset={} hints={}",
            self.address, self.name, self.charset, self.hints
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
