//! Signal routes into the controller.
//!
//! The route table is the reviewed set of sandbox signals the host acts
//! on; anything else the router drops. Handlers take the controller lock
//! briefly and never block beyond it.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::error;

use sill_bridge::{SignalRouter, channels};

use super::HostController;

/// Wire the closed set of signal routes onto a shared controller.
pub fn signal_router(controller: Arc<Mutex<HostController>>) -> SignalRouter {
    let mut router = SignalRouter::new();

    let shared = controller.clone();
    router.route_to(channels::OPEN_WIN, move |args| {
        let hint = args
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match shared.lock() {
            Ok(mut controller) => {
                if let Err(e) = controller.create_child_window(&hint) {
                    error!(event = "host.lifecycle.open_win_failed", hint = hint, error = %e);
                }
            }
            Err(_) => error!(event = "host.lifecycle.controller_poisoned"),
        }
    });

    let shared = controller.clone();
    router.route_to(channels::SECOND_INSTANCE, move |_args| {
        match shared.lock() {
            Ok(mut controller) => controller.on_second_instance(),
            Err(_) => error!(event = "host.lifecycle.controller_poisoned"),
        }
    });

    router
}
