//! Linux IrDA layouts (`<linux/irda.h>`).
//!
//! ```text
//! struct sockaddr_irda {            struct irda_device_info {
//!     u16  sir_family;   // 0           u32  saddr;       // 0
//!     u8   sir_lsap_sel; // 2           u32  daddr;       // 4
//!     /* pad */          // 3           char info[22];    // 8
//!     u32  sir_addr;     // 4           u8   charset;     // 30
//!     char sir_name[25]; // 8           u8   hints[2];    // 31
//!     /* pad to 36 */                   /* pad to 36 */
//! };                                };
//! ```
//!
//! The device list is a `u32` count followed by `irda_device_info` entries.
//! All integers are in host byte order: the kernel fills them for this very
//! machine, and `sir_addr` / `daddr` are handed back and forth unchanged.

use crate::address::{service_name_field, PeerAddress, ServiceSelector, SERVICE_NAME_FIELD_LEN};
use crate::device::{DiscoveredDevice, HintFlags, DEVICE_NAME_FIELD_LEN};
use crate::discovery::DISCOVER_MAX_DEVICES;
use crate::error::IrdaError;

use super::{split_entries, AddressLayout, DEVICE_LIST_HEADER_LEN};

const ENTRY_LEN: usize = 36;

const SIR_LSAP_SEL_OFFSET: usize = 2;
const SIR_ADDR_OFFSET: usize = 4;
const SIR_NAME_OFFSET: usize = 8;

const DADDR_OFFSET: usize = 4;
const INFO_OFFSET: usize = 8;
const CHARSET_OFFSET: usize = INFO_OFFSET + DEVICE_NAME_FIELD_LEN;
const HINTS_OFFSET: usize = CHARSET_OFFSET + 1;

/// Layout used by the Linux kernel IrDA stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxLayout;

impl AddressLayout for LinuxLayout {
    const ADDRESS_FAMILY: u16 = 23;
    const PEER_ADDRESS_LEN: usize = 36;
    const DEVICE_ENTRY_LEN: usize = ENTRY_LEN;
    const DEVICE_LIST_LEN: usize =
        DEVICE_LIST_HEADER_LEN + Self::DEVICE_ENTRY_LEN * DISCOVER_MAX_DEVICES;

    fn build_peer_address(address: u32, selector: ServiceSelector<'_>) -> PeerAddress {
        let mut record = vec![0u8; Self::PEER_ADDRESS_LEN];
        record[..2].copy_from_slice(&Self::ADDRESS_FAMILY.to_ne_bytes());
        record[SIR_ADDR_OFFSET..SIR_ADDR_OFFSET + 4].copy_from_slice(&address.to_ne_bytes());

        // The kernel takes the selector natively; the name stays all-zero.
        let name = match selector {
            ServiceSelector::Name(name) => service_name_field(name),
            ServiceSelector::Lsap(lsap) => {
                record[SIR_LSAP_SEL_OFFSET] = lsap;
                [0u8; SERVICE_NAME_FIELD_LEN]
            }
        };
        record[SIR_NAME_OFFSET..SIR_NAME_OFFSET + SERVICE_NAME_FIELD_LEN].copy_from_slice(&name);

        PeerAddress::from_bytes(record)
    }

    fn decode_device_list(buf: &[u8]) -> Result<Vec<DiscoveredDevice>, IrdaError> {
        let entries = split_entries(buf, Self::DEVICE_ENTRY_LEN, u32::from_ne_bytes)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let daddr = u32::from_ne_bytes([
                    entry[DADDR_OFFSET],
                    entry[DADDR_OFFSET + 1],
                    entry[DADDR_OFFSET + 2],
                    entry[DADDR_OFFSET + 3],
                ]);
                let charset = entry[CHARSET_OFFSET];
                DiscoveredDevice {
                    address: daddr,
                    name: DiscoveredDevice::decode_name(
                        &entry[INFO_OFFSET..CHARSET_OFFSET],
                        charset,
                    ),
                    charset,
                    hints: HintFlags::from_bytes(entry[HINTS_OFFSET], entry[HINTS_OFFSET + 1]),
                }
            })
            .collect())
    }

    fn encode_device_list(devices: &[DiscoveredDevice]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            DEVICE_LIST_HEADER_LEN + devices.len() * Self::DEVICE_ENTRY_LEN,
        );
        buf.extend_from_slice(&(devices.len() as u32).to_ne_bytes());
        for device in devices {
            let mut entry = [0u8; ENTRY_LEN];
            entry[DADDR_OFFSET..DADDR_OFFSET + 4].copy_from_slice(&device.address.to_ne_bytes());
            let name = device.name.as_bytes();
            let len = name.len().min(DEVICE_NAME_FIELD_LEN);
            entry[INFO_OFFSET..INFO_OFFSET + len].copy_from_slice(&name[..len]);
            entry[CHARSET_OFFSET] = device.charset;
            entry[HINTS_OFFSET..HINTS_OFFSET + 2].copy_from_slice(&device.hints.0.to_be_bytes());
            buf.extend_from_slice(&entry);
        }
        buf
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
