use crate::app::cli::args::Args;
use crate::app::config::{AppConfig, LoggingConfig};
use crate::app::simulation::{Simulation, SimulationReport};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, LoggingError};
use crate::core::shutdown::ShutdownCoordinator;
use clap::Parser;
use std::io::IsTerminal;
use std::time::Duration;

/// How long a bounded run waits for consumers to empty the channel
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Run the application and return the process exit code
pub async fn startup() -> i32 {
    let args = Args::parse();

    // Logging destination and format may come from the file, so load it first
    let loaded = AppConfig::load(&args);
    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::from_args(&args),
    };
    let color = logging
        .color
        .unwrap_or_else(|| std::io::stdout().is_terminal());

    if let Err(e) = start_logging(&logging, color) {
        eprintln!("Failed to initialise logging: {}", e);
        return 1;
    }

    log::info!("signalrank {} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return 1;
        }
    };
    if let Some(path) = &config.source {
        log::debug!("Configuration loaded from {}", path.display());
    }
    for key in &config.ignored_keys {
        log::warn!("Ignoring unknown configuration key '{}'", key);
    }

    let simulation_config = config.simulation;
    let reporter = simulation_config.report.reporter(color);
    let simulation = match Simulation::start(&simulation_config, reporter) {
        Ok(simulation) => simulation,
        Err(e) => {
            log_error_with_context(&e, "Starting simulation");
            return 1;
        }
    };

    let (coordinator, _shutdown_rx) = ShutdownCoordinator::new(simulation.token().clone());
    coordinator.install_signal_handlers();

    if let Some(limit) = simulation_config.duration {
        let mut shutdown_rx = coordinator.subscribe();
        let token = coordinator.token().clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(limit) => {
                    log::info!("Run time limit of {:?} reached", limit);
                    token.cancel();
                }
                _ = shutdown_rx.recv() => {}
            }
        });
    }

    let bounded = simulation_config.max_signals.is_some();
    let report = match tokio::task::spawn_blocking(move || {
        simulation.run_to_completion(bounded, DRAIN_TIMEOUT)
    })
    .await
    {
        Ok(report) => report,
        Err(e) => {
            log::error!("Simulation task failed: {}", e);
            return 1;
        }
    };
    // Stop the timer task if it is still pending
    let _ = coordinator.shutdown_tx.send(());

    log_summary(&report);
    if report.panicked.is_empty() {
        0
    } else {
        1
    }
}

/// Install the logger from the merged file and CLI settings
fn start_logging(logging: &LoggingConfig, color: bool) -> Result<(), LoggingError> {
    let log_file = logging.file.as_ref().map(|p| p.to_string_lossy().to_string());
    init_logging(
        logging.level.as_deref(),
        logging.format.as_deref(),
        log_file.as_deref(),
        color,
    )
}

fn log_summary(report: &SimulationReport) {
    log::info!(
        "Run finished after {:.1?}: {} signals produced, {} consumed, grand total {}",
        report.elapsed,
        report.signals_produced(),
        report.signals_consumed(),
        report.grand_total
    );
    if let Some(leader) = report.leaderboard.first() {
        log::info!("Busiest location: {} with {}", leader.source_id, leader.total);
    }
    if !report.panicked.is_empty() {
        log::error!("Workers panicked: {}", report.panicked.join(", "));
    }
}
