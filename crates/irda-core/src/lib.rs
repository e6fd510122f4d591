//! # irda-core
//!
//! Platform-neutral building blocks for the IrDA socket layer.
//!
//! This crate has zero dependencies on OS APIs.  Everything in it is plain
//! byte manipulation and bookkeeping, so it compiles and tests the same way
//! on every host, including hosts whose kernel has no IrDA stack at all.
//!
//! # Architecture overview (for beginners)
//!
//! IrDA (Infrared Data Association) sockets look like ordinary stream
//! sockets once connected, but the two operating systems that expose them
//! disagree on almost every binary detail:
//!
//! - The **peer address record** passed to `connect` has a different field
//!   order, size and byte order on Linux (`sockaddr_irda`) and Windows
//!   (`SOCKADDR_IRDA`).
//! - The **device list** returned by the discovery socket option uses
//!   different entry sizes and field orders.
//!
//! This crate defines:
//!
//! - **`layout`** – The [`AddressLayout`] trait and one implementation per
//!   platform family.  Both are always compiled so either can be tested on
//!   any machine.
//! - **`device`** – The uniform [`DiscoveredDevice`] tuple every layout
//!   decodes into, plus the [`HintFlags`] service-hint bitmask.
//! - **`address`** – The [`ServiceSelector`] (service name or LSAP number)
//!   and the fixed-width service-name field rules.
//! - **`cursor`** – Accumulating cursors that replace manual offset math in
//!   the partial read/write loops.
//! - **`timeout`** – The signed millisecond read timeout and its conversion
//!   to an optional [`std::time::Duration`].
//! - **`discovery`** – The bounded retry policy for the kernel device query.
//! - **`config`** – TOML configuration schema shared by the tool.
//! - **`error`** – The error taxonomy.

pub mod address;
pub mod config;
pub mod cursor;
pub mod device;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod timeout;

// Re-export the most-used types at the crate root so callers can write
// `irda_core::IrdaError` instead of `irda_core::error::IrdaError`.
pub use address::{PeerAddress, ServiceSelector, SERVICE_NAME_CAPACITY, SERVICE_NAME_FIELD_LEN};
pub use config::{ConfigError, IrdaConfig};
pub use cursor::{ReadCursor, ReadReport, ReadStop, WriteCursor};
pub use device::{DiscoveredDevice, HintFlags, DEVICE_NAME_FIELD_LEN};
pub use discovery::{DiscoveryPolicy, DISCOVER_MAX_DEVICES, DISCOVER_MAX_RETRIES};
pub use error::{ErrorKind, IrdaError, Operation};
pub use layout::{AddressLayout, LinuxLayout, WinsockLayout};
pub use timeout::ReadTimeout;
