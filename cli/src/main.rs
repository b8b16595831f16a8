//! Villa booking gateway, CLI server
//!
//! ```sh
//! # Default config (~/.config/villa-booking/config.toml)
//! villa-booking
//!
//! # Custom config path and port
//! villa-booking --config /etc/villa-booking/config.toml --port 9000
//!
//! # Seeded in-memory data, no upstream services needed
//! villa-booking --in-memory
//!
//! # Validate config without starting
//! villa-booking --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use villa_booking::config::AppConfig;
use villa_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Availability, price quotes and reservations for villa stays.
#[derive(Parser, Debug)]
#[command(
    name = "villa-booking",
    version,
    about = "Villa booking gateway over the villa and reservation services",
    long_about = "REST gateway for villa search, availability calendars, price quotes \
                  and reservations.\n\n\
                  Default config: ~/.config/villa-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "VILLA_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log filter (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Serve seeded in-memory data instead of calling the upstream services.
    #[arg(long)]
    in_memory: bool,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(villa_booking::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config.logging);

    if let Some(e) = load_error {
        error!("Failed to load config from {}: {}", config_path.display(), e);
        if cli.check {
            return ExitCode::FAILURE;
        }
        error!("Using default configuration.");
    } else {
        info!("Configuration loaded from {}", config_path.display());
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("  Config file     : {}", config_path.display());
        println!("  Listen address  : {}", config.address());
        println!("  Villa service   : {}", config.services.villa_url);
        println!("  Reservations    : {}", config.services.reservation_url);
        println!("  Log level       : {} ({})", config.logging.level, config.logging.format);
        return ExitCode::SUCCESS;
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        in_memory: cli.in_memory,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.wait().await;
    ExitCode::SUCCESS
}
