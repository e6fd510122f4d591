//! Integration tests for the two native layouts through the public API.
//!
//! These tests check the properties every [`AddressLayout`] must share,
//! whichever platform it describes:
//!
//! - The service-name field never carries bytes from an earlier connect.
//! - Device lists decode in kernel order and honour the reported count.
//! - The same uniform device survives both native encodings unchanged.

use irda_core::{
    AddressLayout, DiscoveredDevice, HintFlags, IrdaError, LinuxLayout, ServiceSelector,
    WinsockLayout, DISCOVER_MAX_DEVICES, SERVICE_NAME_FIELD_LEN,
};

/// Offset of the 25-byte service-name field inside each peer record.
const LINUX_NAME_OFFSET: usize = 8;
const WINSOCK_NAME_OFFSET: usize = 6;

fn name_field<L: AddressLayout>(offset: usize, selector: ServiceSelector<'_>) -> Vec<u8> {
    let peer = L::build_peer_address(0x0102_0304, selector);
    peer.as_bytes()[offset..offset + SERVICE_NAME_FIELD_LEN].to_vec()
}

fn sample_devices() -> Vec<DiscoveredDevice> {
    vec![
        DiscoveredDevice {
            address: 0x0102_0304,
            name: "Nokia 6310i".into(),
            charset: 0,
            hints: HintFlags(HintFlags::PDA | HintFlags::TELEPHONY | HintFlags::OBEX),
        },
        DiscoveredDevice {
            address: 0xFFFF_0001,
            name: "HP LaserJet".into(),
            charset: 0,
            hints: HintFlags(HintFlags::PRINTER),
        },
        DiscoveredDevice {
            address: 0x7A7A_7A7A,
            name: "Zaurus".into(),
            charset: 1,
            hints: HintFlags(HintFlags::COMPUTER | HintFlags::IRCOMM),
        },
    ]
}

// ── Service-name field hygiene ────────────────────────────────────────────────

#[test]
fn test_absent_name_is_fully_zeroed_on_both_layouts() {
    assert!(name_field::<LinuxLayout>(LINUX_NAME_OFFSET, ServiceSelector::Name(None))
        .iter()
        .all(|&b| b == 0));
    assert!(
        name_field::<WinsockLayout>(WINSOCK_NAME_OFFSET, ServiceSelector::Name(None))
            .iter()
            .all(|&b| b == 0)
    );
}

#[test]
fn test_short_name_after_long_name_leaves_no_residue() {
    // Arrange: build a long name first, as an earlier connect would.
    let _ = LinuxLayout::build_peer_address(1, ServiceSelector::Name(Some("IrDA:IrCOMM:Parameters")));

    // Act
    let field = name_field::<LinuxLayout>(LINUX_NAME_OFFSET, ServiceSelector::Name(Some("OBEX")));

    // Assert
    assert_eq!(&field[..4], b"OBEX");
    assert!(field[4..].iter().all(|&b| b == 0));
}

#[test]
fn test_lsap_connect_never_leaves_name_bytes_on_linux() {
    let field = name_field::<LinuxLayout>(LINUX_NAME_OFFSET, ServiceSelector::Lsap(9));
    assert!(field.iter().all(|&b| b == 0));
}

// ── Device-list decoding ──────────────────────────────────────────────────────

#[test]
fn test_devices_decode_in_kernel_order_on_both_layouts() {
    let devices = sample_devices();

    let linux = LinuxLayout::decode_device_list(&LinuxLayout::encode_device_list(&devices))
        .expect("linux decode");
    let winsock = WinsockLayout::decode_device_list(&WinsockLayout::encode_device_list(&devices))
        .expect("winsock decode");

    assert_eq!(linux, devices);
    assert_eq!(winsock, devices);
}

#[test]
fn test_encoded_lists_fit_the_query_buffer_at_capacity() {
    let devices: Vec<_> = (0..DISCOVER_MAX_DEVICES)
        .map(|i| DiscoveredDevice {
            address: i as u32,
            name: String::new(),
            charset: 0,
            hints: HintFlags::default(),
        })
        .collect();

    assert!(LinuxLayout::encode_device_list(&devices).len() <= LinuxLayout::DEVICE_LIST_LEN);
    assert!(WinsockLayout::encode_device_list(&devices).len() <= WinsockLayout::DEVICE_LIST_LEN);
}

#[test]
fn test_long_device_names_are_cut_at_field_width() {
    let devices = vec![DiscoveredDevice {
        address: 1,
        name: "a device name well beyond twenty-two bytes".into(),
        charset: 0,
        hints: HintFlags::default(),
    }];

    let decoded = WinsockLayout::decode_device_list(&WinsockLayout::encode_device_list(&devices))
        .expect("decode");

    assert_eq!(decoded[0].name, "a device name well bey");
}

#[test]
fn test_empty_buffer_is_malformed() {
    assert!(matches!(
        LinuxLayout::decode_device_list(&[]),
        Err(IrdaError::MalformedDeviceList(_))
    ));
}
