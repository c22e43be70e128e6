//! # Event Bus
//!
//! Typed, in-process publish/subscribe for vertical slices.
//!
//! Events are keyed by their Rust type and fanned out over broadcast channels: every
//! subscriber sees every event published after it subscribed. Publishing never blocks and
//! events without subscribers are dropped.
//!
//! # Example
//!
//! ```rust
//! use folio_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct LayoutCommitted { version: u64 }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<LayoutCommitted>()?;
//!     bus.publish(LayoutCommitted { version: 2 })?;
//!
//!     let event = rx.next_event().await.unwrap();
//!     assert_eq!(event.version, 2);
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
