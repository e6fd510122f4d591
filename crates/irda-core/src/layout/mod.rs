//! Native binary layouts for peer addresses and discovery device lists.
//!
//! # Why two layouts?
//!
//! The Linux IrDA stack and Winsock describe the same information with
//! incompatible structures:
//!
//! | Concept          | Linux (`<linux/irda.h>`)        | Windows (`<af_irda.h>`)          |
//! |------------------|---------------------------------|----------------------------------|
//! | Peer address     | `sockaddr_irda`, 36 bytes       | `SOCKADDR_IRDA`, 32 bytes        |
//! | Device address   | `u32` in host order             | 4 ID bytes, big-endian           |
//! | LSAP connect     | numeric `sir_lsap_sel` field    | `"LSAP-SEL<n>"` in the name      |
//! | Device-list entry| `irda_device_info`, 36 bytes    | `IRDA_DEVICE_INFO`, 29 bytes     |
//!
//! Each layout implements [`AddressLayout`].  The socket layer picks one at
//! compile time through its `RawSocket::Layout` associated type and is
//! otherwise written once against the trait.
//!
//! Both implementations are plain byte manipulation, so both are compiled on
//! every host and tested everywhere.

use crate::address::{PeerAddress, ServiceSelector};
use crate::device::DiscoveredDevice;
use crate::error::IrdaError;

pub mod linux;
pub mod windows;

pub use linux::LinuxLayout;
pub use windows::WinsockLayout;

/// Size of the `u32` device-count header that starts both device lists.
pub const DEVICE_LIST_HEADER_LEN: usize = 4;

/// Translation between the uniform types and one platform's native records.
pub trait AddressLayout {
    /// Value of `AF_IRDA` on this platform.
    const ADDRESS_FAMILY: u16;

    /// Size of the native peer-address record passed to `connect`.
    const PEER_ADDRESS_LEN: usize;

    /// Size of one native device-list entry.
    const DEVICE_ENTRY_LEN: usize;

    /// Size of the buffer handed to the enumeration query: the header plus
    /// room for [`crate::DISCOVER_MAX_DEVICES`] entries.
    const DEVICE_LIST_LEN: usize;

    /// Lays out the peer-address record for `address` and `selector`.
    ///
    /// The service-name field is either fully overwritten or fully zeroed.
    fn build_peer_address(address: u32, selector: ServiceSelector<'_>) -> PeerAddress;

    /// Decodes the device list the kernel wrote into `buf`.
    ///
    /// Entries are returned in list order.  The count comes from the list
    /// header, never from the buffer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`IrdaError::MalformedDeviceList`] if `buf` is shorter than
    /// the header or the header claims more entries than `buf` holds.
    fn decode_device_list(buf: &[u8]) -> Result<Vec<DiscoveredDevice>, IrdaError>;

    /// Writes `devices` in the native list format, as the kernel would.
    ///
    /// Used by the mock socket and the benchmarks.
    fn encode_device_list(devices: &[DiscoveredDevice]) -> Vec<u8>;
}

/// Splits a device-list buffer into its header count and entry slices.
///
/// `read_count` interprets the 4 header bytes in the platform's byte order.
pub(crate) fn split_entries(
    buf: &[u8],
    entry_len: usize,
    read_count: fn([u8; 4]) -> u32,
) -> Result<Vec<&[u8]>, IrdaError> {
    let header: [u8; DEVICE_LIST_HEADER_LEN] = buf
        .get(..DEVICE_LIST_HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| {
            IrdaError::MalformedDeviceList(format!(
                "buffer of {} bytes is shorter than the list header",
                buf.len()
            ))
        })?;
    let count = read_count(header) as usize;

    let body = &buf[DEVICE_LIST_HEADER_LEN..];
    let fits = body.len() / entry_len;
    if count > fits {
        return Err(IrdaError::MalformedDeviceList(format!(
            "header reports {count} devices but the buffer holds {fits}"
        )));
    }

    Ok(body.chunks_exact(entry_len).take(count).collect())
}
