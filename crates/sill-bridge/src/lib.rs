//! sill-bridge: the cross-process capability bridge.
//!
//! The bridge is the only code that exists on both sides of the isolation
//! boundary. The host side ([`server`]) accepts sandboxed presentation
//! processes on a Unix socket, dispatches their capability calls through
//! the [`registry`], routes their signals, and fans out host pushes. The
//! sandbox side ([`client`]) exposes the minimal call vocabulary -
//! `signal`, `subscribe`/`unsubscribe`, `call` - plus the fixed named
//! capability wrappers.
//!
//! Only plain data crosses the boundary: results and errors are
//! serialized values, never live object references.

pub mod client;
pub mod errors;
pub mod protocol;
pub mod registry;
pub mod server;

pub use client::{BridgeGateway, SubscriptionHandle};
pub use errors::{BridgeError, GatewayError};
pub use protocol::channels;
pub use protocol::messages::{HostMessage, SandboxMessage};
pub use registry::CapabilityRegistry;
pub use server::{PushSender, SignalRouter, run_server};
