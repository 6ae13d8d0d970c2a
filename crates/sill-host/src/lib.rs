//! sill-host: the privileged host process of the sill desktop shell.
//!
//! The host owns every OS-facing concern: the single-instance lock, the
//! window table and main-window singleton, the lifecycle handlers, and
//! the capability registry served over the bridge. Sandboxed
//! presentation processes never touch the OS directly.
//!
//! # Main Entry Points
//!
//! - [`instance`] - Acquire or yield the single-instance lock
//! - [`controller`] - Window lifecycle and OS event handling
//! - [`windows`] - Window backends (process-spawning and headless)
//! - [`loader`] - Loader targets and external navigation policy
//! - [`platform`] - Startup tweaks derived from the OS

pub mod cli;
pub mod controller;
pub mod instance;
pub mod loader;
pub mod platform;
pub mod windows;

pub use controller::{DesktopPlatform, HostController, ShutdownDecision};
pub use instance::{InstanceLock, acquire_instance_lock, notify_running_instance};
pub use loader::{LoaderSettings, LoaderTarget};
pub use windows::types::{WindowConfig, WindowHandle, WindowId, WindowKind};
