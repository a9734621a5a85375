// src/main.rs
//! GPS Clock - satellite-synchronized terminal clock

use clap::Parser;
use gps_clock::{config::ClockConfig, error::Result, monitor, monitor::ClockMonitor};

#[derive(Parser, Debug)]
#[command(name = "gps-clock", version, about = "GPS-synchronized terminal clock")]
struct Cli {
    /// Serial port the GPS receiver is attached to
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Whole-hour UTC offset for the displayed time and date
    #[arg(short = 'o', long, allow_negative_numbers = true)]
    utc_offset: Option<i32>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Persist the effective settings to the config file
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list_ports {
        return monitor::list_serial_ports().await;
    }

    let mut config = ClockConfig::load().unwrap_or_default();
    if let Some(port) = cli.port {
        config.serial_port = port;
    }
    if let Some(baud) = cli.baud {
        config.baudrate = baud;
    }
    if let Some(offset) = cli.utc_offset {
        config.utc_offset = offset;
    }
    if cli.save {
        config.save()?;
    }

    let clock = ClockMonitor::new();
    clock.connect_serial(&config.serial_port, config.baudrate).await?;
    clock.run_display(config.utc_offset).await
}
