//! CLI Entry Point for radar-sweep
//!
//! Running the binary with no arguments opens the configured serial port on a
//! background thread and shows the radar window on the main thread.
//!
//! # Usage
//!
//! ```bash
//! radar-sweep
//! radar-sweep --config config/lab.toml
//! radar-sweep --list-ports
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use radar_sweep::config::{RadarConfig, DEFAULT_CONFIG_PATH};
use radar_sweep::history::HistoryStore;
use radar_sweep::{gui, reader, tracing_setup};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "radar-sweep")]
#[command(about = "Fading polar radar display for a serial angle/distance sensor", long_about = None)]
struct Cli {
    /// TOML configuration file (optional; defaults are used when it is missing)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the serial ports found on this machine and exit
    #[arg(long)]
    list_ports: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_ports {
        return list_ports();
    }

    let config = RadarConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    tracing_setup::init_from_config(&config)?;
    info!("Launching radar display...");

    let store = HistoryStore::new();
    // Detached: the reader is abandoned when the window closes.
    let _reader = reader::spawn_serial_reader(config.serial.clone(), store.clone())
        .context("Failed to spawn sample reader thread")?;

    gui::run(&config, store).context("Radar display failed")?;
    Ok(())
}

fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}", port.port_name);
    }
    Ok(())
}
