//! Sandbox-side gateway.
//!
//! [`BridgeGateway`] is installed into the sandboxed process before any
//! application logic runs. It exposes the minimal call vocabulary
//! (`signal`, `subscribe`/`unsubscribe`, `call`) plus the fixed named
//! capability wrappers; nothing else reaches the host.

pub mod capabilities;
pub mod connection;

pub use connection::{BridgeGateway, SubscriptionHandle};
