//! Winsock IrDA layouts (`<af_irda.h>`).
//!
//! ```text
//! typedef struct _SOCKADDR_IRDA {        typedef struct _IRDA_DEVICE_INFO {
//!     u_short irdaAddressFamily;  // 0       u_char irdaDeviceID[4];   // 0
//!     u_char  irdaDeviceID[4];    // 2       char   irdaDeviceName[22]; // 4
//!     char    irdaServiceName[25];// 6       u_char irdaDeviceHints1;  // 26
//!     /* pad to 32 */                        u_char irdaDeviceHints2;  // 27
//! } SOCKADDR_IRDA;                           u_char irdaCharSet;       // 28
//!                                        } IRDA_DEVICE_INFO;           // 29, packed
//! ```
//!
//! The device list (`DEVICELIST`) is a little-endian `ULONG` count followed
//! by packed `IRDA_DEVICE_INFO` entries.  Device IDs are four raw bytes that
//! this layout assembles big-endian into the uniform 32-bit address.
//!
//! Winsock has no numeric LSAP field; a selector is addressed by writing
//! `"LSAP-SEL<n>"` into the service name.

use crate::address::{
    lsap_name_field, service_name_field, PeerAddress, ServiceSelector, SERVICE_NAME_FIELD_LEN,
};
use crate::device::{DiscoveredDevice, HintFlags, DEVICE_NAME_FIELD_LEN};
use crate::discovery::DISCOVER_MAX_DEVICES;
use crate::error::IrdaError;

use super::{split_entries, AddressLayout, DEVICE_LIST_HEADER_LEN};

const ENTRY_LEN: usize = 29;

const DEVICE_ID_OFFSET: usize = 2;
const SERVICE_NAME_OFFSET: usize = 6;

const NAME_OFFSET: usize = 4;
const HINTS1_OFFSET: usize = NAME_OFFSET + DEVICE_NAME_FIELD_LEN;
const HINTS2_OFFSET: usize = HINTS1_OFFSET + 1;
const CHARSET_OFFSET: usize = HINTS2_OFFSET + 1;

/// Layout used by Winsock's `AF_IRDA` provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinsockLayout;

impl AddressLayout for WinsockLayout {
    const ADDRESS_FAMILY: u16 = 26;
    const PEER_ADDRESS_LEN: usize = 32;
    const DEVICE_ENTRY_LEN: usize = ENTRY_LEN;
    // sizeof(DEVICELIST) already includes one entry and is padded to 36.
    const DEVICE_LIST_LEN: usize = 36 + Self::DEVICE_ENTRY_LEN * (DISCOVER_MAX_DEVICES - 1);

    fn build_peer_address(address: u32, selector: ServiceSelector<'_>) -> PeerAddress {
        let mut record = vec![0u8; Self::PEER_ADDRESS_LEN];
        record[..2].copy_from_slice(&Self::ADDRESS_FAMILY.to_le_bytes());
        record[DEVICE_ID_OFFSET..DEVICE_ID_OFFSET + 4].copy_from_slice(&address.to_be_bytes());

        let name = match selector {
            ServiceSelector::Name(name) => service_name_field(name),
            ServiceSelector::Lsap(lsap) => lsap_name_field(lsap),
        };
        record[SERVICE_NAME_OFFSET..SERVICE_NAME_OFFSET + SERVICE_NAME_FIELD_LEN]
            .copy_from_slice(&name);

        PeerAddress::from_bytes(record)
    }

    fn decode_device_list(buf: &[u8]) -> Result<Vec<DiscoveredDevice>, IrdaError> {
        let entries = split_entries(buf, Self::DEVICE_ENTRY_LEN, u32::from_le_bytes)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let charset = entry[CHARSET_OFFSET];
                DiscoveredDevice {
                    address: u32::from_be_bytes([entry[0], entry[1], entry[2], entry[3]]),
                    name: DiscoveredDevice::decode_name(
                        &entry[NAME_OFFSET..HINTS1_OFFSET],
                        charset,
                    ),
                    charset,
                    hints: HintFlags::from_bytes(entry[HINTS1_OFFSET], entry[HINTS2_OFFSET]),
                }
            })
            .collect())
    }

    fn encode_device_list(devices: &[DiscoveredDevice]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            DEVICE_LIST_HEADER_LEN + devices.len() * Self::DEVICE_ENTRY_LEN,
        );
        buf.extend_from_slice(&(devices.len() as u32).to_le_bytes());
        for device in devices {
            let mut entry = [0u8; ENTRY_LEN];
            entry[..4].copy_from_slice(&device.address.to_be_bytes());
            let name = device.name.as_bytes();
            let len = name.len().min(DEVICE_NAME_FIELD_LEN);
            entry[NAME_OFFSET..NAME_OFFSET + len].copy_from_slice(&name[..len]);
            let [hints1, hints2] = device.hints.0.to_be_bytes();
            entry[HINTS1_OFFSET] = hints1;
            entry[HINTS2_OFFSET] = hints2;
            entry[CHARSET_OFFSET] = device.charset;
            buf.extend_from_slice(&entry);
        }
        buf
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
