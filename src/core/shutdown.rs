//! Signal-driven shutdown coordination
//!
//! Bridges OS signals (handled on the tokio runtime) to the
//! [`CancellationToken`] tree that the worker threads block on. The first
//! signal cancels the root token so every worker unwinds; a second signal
//! forces an immediate exit.

use crate::core::cancellation::CancellationToken;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    pub shutdown_tx: broadcast::Sender<()>,
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a coordinator that cancels `token` when shutdown is triggered
    pub fn new(token: CancellationToken) -> (Self, broadcast::Receiver<()>) {
        // Room for a burst of signals without lagging receivers
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);

        (Self { shutdown_tx, token }, shutdown_rx)
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// The token cancelled on shutdown
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel the worker tree and notify async subscribers
    pub fn trigger_shutdown(&self) {
        self.token.cancel();
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Install SIGINT/SIGTERM/SIGHUP/SIGQUIT and ctrl-c handlers
    ///
    /// Must be called from within a tokio runtime.
    pub fn install_signal_handlers(&self) {
        setup_signal_handlers(self.shutdown_tx.clone(), self.token.clone());
    }
}

fn on_signal(
    name: &str,
    shutdown_tx: &broadcast::Sender<()>,
    token: &CancellationToken,
    signal_count: &AtomicUsize,
) {
    let prev = signal_count.fetch_add(1, Ordering::AcqRel);
    if prev >= 1 {
        log::warn!("{} received again; exiting", name);
        std::process::exit(130);
    }
    log::info!("{} received; stopping workers", name);
    token.cancel();
    let _ = shutdown_tx.send(());
}

fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>, token: CancellationToken) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            ("SIGINT", SignalKind::interrupt()),
            ("SIGTERM", SignalKind::terminate()),
            ("SIGHUP", SignalKind::hangup()),
            ("SIGQUIT", SignalKind::quit()),
        ];

        for (name, kind) in signals {
            let tx = shutdown_tx.clone();
            let token = token.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                match signal(kind) {
                    Ok(mut sig) => {
                        while sig.recv().await.is_some() {
                            on_signal(name, &tx, &token, &sig_ctr);
                        }
                    }
                    Err(e) => log::warn!("Could not install {} handler: {}", name, e),
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                on_signal("Ctrl-C", &shutdown_tx, &token, &signal_count);
            }
        });
    }
}
