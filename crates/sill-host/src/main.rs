use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sill_bridge::{CapabilityRegistry, PushSender, run_server};
use sill_core::config::{HostConfig, ShellConfig};
use sill_host::cli::Cli;
use sill_host::controller::{DesktopPlatform, HostController, ShutdownDecision, routes};
use sill_host::instance::{self, InstanceLock, acquire_instance_lock, notify_running_instance};
use sill_host::loader::LoaderSettings;
use sill_host::platform::{self, StartupTweaks};
use sill_host::windows::backends::{WindowBackend, backend_for};
use sill_host::windows::types::WindowConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    sill_core::init_logging(cli.quiet);

    let host_config = HostConfig::new();
    let shell_config = match ShellConfig::load(&host_config.sill_dir) {
        Ok(config) => config,
        Err(e) => {
            error!(event = "host.startup.config_failed", error = %e);
            return ExitCode::FAILURE;
        }
    };

    let socket_path = cli.socket.unwrap_or_else(|| host_config.socket_path());

    // The lock check runs to completion before any window is created.
    let listener = match acquire_instance_lock(&socket_path).await {
        Ok(InstanceLock::Acquired(listener)) => listener,
        Ok(InstanceLock::AlreadyRunning) => {
            if let Err(e) = notify_running_instance(&socket_path).await {
                warn!(event = "host.startup.notify_failed", error = %e);
            }
            info!(event = "host.startup.second_instance_exit");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!(event = "host.startup.lock_failed", error = %e);
            return ExitCode::FAILURE;
        }
    };

    let presentation_command = cli
        .presentation_command
        .or_else(|| shell_config.presentation.command.clone());

    run(
        listener,
        socket_path,
        host_config,
        shell_config,
        presentation_command,
    )
    .await
}

async fn run(
    listener: tokio::net::UnixListener,
    socket_path: std::path::PathBuf,
    host_config: HostConfig,
    shell_config: ShellConfig,
    presentation_command: Option<String>,
) -> ExitCode {
    let tweaks = platform::startup_tweaks("sill");
    let window_config = window_config_from(&shell_config, &host_config, &tweaks);
    let loader = LoaderSettings::from_config(&host_config);
    let backend = backend_for(presentation_command.as_deref());

    let push = PushSender::new(256);
    let controller = Arc::new(Mutex::new(HostController::new(
        backend.clone(),
        push.clone(),
        DesktopPlatform::current(),
        window_config,
        loader,
    )));

    let router = Arc::new(routes::signal_router(controller.clone()));
    let registry = Arc::new(CapabilityRegistry::with_builtin());
    let shutdown = CancellationToken::new();

    let server = tokio::spawn(run_server(
        listener,
        registry,
        router,
        push.clone(),
        shutdown.clone(),
    ));

    // Window creation failures are fatal startup errors.
    let created = match controller.lock() {
        Ok(mut controller) => controller.create_main_window(),
        Err(_) => {
            error!(event = "host.startup.controller_poisoned");
            shutdown.cancel();
            let _ = server.await;
            instance::release_instance_lock(&socket_path);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = created {
        error!(event = "host.startup.main_window_failed", error = %e);
        shutdown.cancel();
        let _ = server.await;
        instance::release_instance_lock(&socket_path);
        return ExitCode::FAILURE;
    }

    serve_until_shutdown(&controller, backend, &shutdown).await;

    match tokio::time::timeout(Duration::from_secs(3), server).await {
        Ok(_) => {}
        Err(_) => warn!(event = "host.shutdown.server_slow_to_stop"),
    }
    instance::release_instance_lock(&socket_path);

    info!(event = "host.shutdown.complete");
    ExitCode::SUCCESS
}

/// Drive the host loop: ctrl-c, shutdown, and the window reaper.
async fn serve_until_shutdown(
    controller: &Arc<Mutex<HostController>>,
    backend: Arc<dyn WindowBackend>,
    shutdown: &CancellationToken,
) {
    let mut reaper = tokio::time::interval(Duration::from_millis(500));

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(event = "host.shutdown.signal_listen_failed", error = %e);
                }
                info!(event = "host.shutdown.interrupted");
                shutdown.cancel();
                break;
            }
            _ = shutdown.cancelled() => {
                break;
            }
            _ = reaper.tick() => {
                let closed = backend.drain_closed();
                if closed.is_empty() {
                    continue;
                }

                let decision = match controller.lock() {
                    Ok(mut controller) => closed
                        .into_iter()
                        .map(|id| controller.on_window_closed(id))
                        .fold(ShutdownDecision::StayResident, |acc, decision| {
                            if decision == ShutdownDecision::Exit {
                                ShutdownDecision::Exit
                            } else {
                                acc
                            }
                        }),
                    Err(_) => {
                        error!(event = "host.lifecycle.controller_poisoned");
                        ShutdownDecision::Exit
                    }
                };

                if decision == ShutdownDecision::Exit {
                    shutdown.cancel();
                    break;
                }
            }
        }
    }
}

/// Merge window defaults, derived asset paths, and platform tweaks.
fn window_config_from(
    shell_config: &ShellConfig,
    host_config: &HostConfig,
    tweaks: &StartupTweaks,
) -> WindowConfig {
    let icon_path = shell_config.window.icon.as_ref().map(|icon| {
        if icon.is_absolute() {
            icon.clone()
        } else {
            host_config.public_dir.join(icon)
        }
    });

    WindowConfig {
        title: shell_config.window.title.clone(),
        width: shell_config.window.width,
        height: shell_config.window.height,
        icon_path,
        preload_path: shell_config.window.preload.clone(),
        disable_hardware_acceleration: tweaks.disable_hardware_acceleration,
    }
}
