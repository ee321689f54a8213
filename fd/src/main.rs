//! fleetd - package transport fleet coordinator
//!
//! CLI entry point for running a fleet and inspecting its configuration.

use clap::Parser;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use fleetd::cli::{Cli, Command, ConfigFormat, OutputFormat, get_log_path};
use fleetd::config::Config;
use fleetd::coordinator::CoordinatorSnapshot;
use fleetd::fleet::Fleet;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file so stdout stays free for status output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Run {
            units,
            seed,
            duration_secs,
            format,
        } => {
            if let Some(units) = units {
                config.fleet.units = units;
            }
            if seed.is_some() {
                config.fleet.seed = seed;
            }
            config.validate().context("Invalid configuration")?;
            info!(
                units = config.fleet.units,
                capacity = config.coordinator.capacity,
                "fleetd loaded config"
            );
            cmd_run(&config, format, duration_secs.map(Duration::from_secs)).await
        }
        Command::Config { format } => cmd_config(&config, format),
    }
}

/// Run the fleet until a signal or the optional deadline
async fn cmd_run(config: &Config, format: OutputFormat, duration: Option<Duration>) -> Result<()> {
    let fleet = Fleet::launch(config)?;
    println!(
        "Fleet running: {} units, capacity {}. Press Ctrl+C to stop.",
        fleet.unit_ids().len(),
        config.coordinator.capacity
    );

    let mut status = tokio::time::interval(config.fleet.status_interval());
    status.tick().await;

    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let signal = shutdown_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            _ = status.tick() => {
                match fleet.coordinator().snapshot().await {
                    Ok(snapshot) => print_status(&snapshot, format)?,
                    Err(e) => {
                        warn!(error = %e, "Status snapshot failed");
                        break;
                    }
                }
            }
            _ = &mut deadline => {
                info!("Run duration elapsed");
                break;
            }
            result = &mut signal => {
                result?;
                break;
            }
        }
    }

    let snapshot = fleet.shutdown().await?;
    print_final(&snapshot, format)
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => warn!("SIGINT received"),
            _ = sigterm.recv() => warn!("SIGTERM received"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        warn!("Ctrl+C received");
    }

    Ok(())
}

fn print_status(snapshot: &CoordinatorSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(snapshot)?),
        OutputFormat::Text => {
            let m = &snapshot.metrics;
            println!(
                "[{}] packages {}/{} ({} unassigned) | delivered {} dropped {} inspected {} | diversions {}",
                snapshot.taken_at.format("%H:%M:%S"),
                snapshot.packages.len(),
                snapshot.capacity,
                snapshot.unassigned(),
                m.delivered,
                m.dropped,
                m.inspected,
                m.diversions
            );
        }
    }
    Ok(())
}

fn print_final(snapshot: &CoordinatorSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(snapshot)?),
        OutputFormat::Text => {
            println!("Final state:");
            for package in &snapshot.packages {
                let executor = package.executor.as_ref().map(|e| e.as_str()).unwrap_or("-");
                println!("  {} {:<10} {}", package.id, package.status, executor);
            }
            for (unit, progress) in &snapshot.positions {
                println!(
                    "  {} -> {} {:.0}%",
                    unit,
                    progress.destination.as_str(),
                    progress.distance * 100.0
                );
            }
            println!("Recent activity:");
            for line in &snapshot.activity {
                println!("  {}", line);
            }
            let m = &snapshot.metrics;
            println!(
                "Totals: created {} assigned {} delivered {} dropped {} inspected {}",
                m.packages_created, m.assignments, m.delivered, m.dropped, m.inspected
            );
        }
    }
    Ok(())
}

fn cmd_config(config: &Config, format: ConfigFormat) -> Result<()> {
    let rendered = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config).context("Failed to render config")?,
        ConfigFormat::Json => serde_json::to_string_pretty(config).context("Failed to render config")?,
    };
    println!("{}", rendered);
    Ok(())
}
