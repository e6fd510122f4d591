//! Peer addressing: service selectors and the fixed-width service-name field.
//!
//! An IrDA connect names its target with a 32-bit device address plus one of:
//!
//! - a **service name** looked up in the peer's IAS (Information Access
//!   Service) database, e.g. `"OBEX"` or `"IrDA:IrCOMM"`; or
//! - an **LSAP selector**, the numeric service access point, which skips the
//!   IAS lookup.
//!
//! Both native address records reserve a 25-byte name field.  The field is
//! always rebuilt from zero for each connect so nothing from an earlier call
//! can leak onto the wire.

use std::fmt;

/// Size of the service-name field in both native address records.
pub const SERVICE_NAME_FIELD_LEN: usize = 25;

/// Longest service name that still leaves room for the NUL terminator.
pub const SERVICE_NAME_CAPACITY: usize = SERVICE_NAME_FIELD_LEN - 1;

/// Prefix Winsock uses to address an LSAP selector through the name field.
pub const LSAP_NAME_PREFIX: &str = "LSAP-SEL";

/// What a connect call targets on the peer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSelector<'a> {
    /// A named service; `None` sends an all-zero name field.
    Name(Option<&'a str>),
    /// A numeric link-service-access-point selector.
    Lsap(u8),
}

impl fmt::Display for ServiceSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceSelector::Name(Some(name)) => write!(f, "service {name:?}"),
            ServiceSelector::Name(None) => f.write_str("unnamed service"),
            ServiceSelector::Lsap(lsap) => write!(f, "LSAP {lsap}"),
        }
    }
}

/// Builds a service-name field from an optional name.
///
/// The name is truncated to [`SERVICE_NAME_CAPACITY`] bytes so the field
/// always ends in at least one NUL.  `None` yields an all-zero field.
pub fn service_name_field(name: Option<&str>) -> [u8; SERVICE_NAME_FIELD_LEN] {
    let mut field = [0u8; SERVICE_NAME_FIELD_LEN];
    if let Some(name) = name {
        let bytes = name.as_bytes();
        let len = bytes.len().min(SERVICE_NAME_CAPACITY);
        field[..len].copy_from_slice(&bytes[..len]);
    }
    field
}

/// Builds the `"LSAP-SEL<n>"` service-name field for a numeric selector.
pub fn lsap_name_field(lsap: u8) -> [u8; SERVICE_NAME_FIELD_LEN] {
    let name = format!("{LSAP_NAME_PREFIX}{lsap}");
    service_name_field(Some(&name))
}

/// A native peer-address record, ready to be handed to `connect`.
///
/// The bytes are laid out exactly as the target platform's `sockaddr`
/// structure; see [`crate::layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddress {
    bytes: Vec<u8>,
}

impl PeerAddress {
    /// Wraps an already laid-out record.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw record.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Record length in bytes, as passed to `connect`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
