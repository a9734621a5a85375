// src/monitor.rs
//! Serial session coordination: wires the receiver core to a serial port
//! and the terminal display

use crate::{
    display::terminal::TerminalDisplay,
    error::{ClockError, Result},
    gps::GpsReceiver,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};
use tokio::io::AsyncReadExt;
use tokio_serial::SerialPortBuilderExt;

/// Coordinates the byte-drain task and the display loop around one
/// receiver session
pub struct ClockMonitor {
    receiver: Arc<RwLock<GpsReceiver>>,
    running: Arc<AtomicBool>,
}

impl ClockMonitor {
    pub fn new() -> Self {
        Self {
            receiver: Arc::new(RwLock::new(GpsReceiver::new())),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared handle to the receiver session
    pub fn receiver(&self) -> Arc<RwLock<GpsReceiver>> {
        Arc::clone(&self.receiver)
    }

    /// Open the serial port and start draining bytes into the parser
    pub async fn connect_serial(&self, port: &str, baudrate: u32) -> Result<()> {
        log::info!("Connecting to GPS on {} at {} baud", port, baudrate);

        let mut serial = tokio_serial::new(port, baudrate)
            .open_native_async()
            .map_err(|e| ClockError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

        log::info!("Connected");

        let receiver = Arc::clone(&self.receiver);
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let mut buf = [0u8; 512];

            while running.load(Ordering::Relaxed) {
                match serial.read(&mut buf).await {
                    Ok(0) => {
                        log::warn!("Serial port closed");
                        break;
                    }
                    Ok(n) => {
                        // Drain the whole chunk in one lock hold so
                        // sentences stay byte-ordered
                        let mut rx = receiver.write().unwrap();
                        for &byte in &buf[..n] {
                            if let Some(kind) = rx.feed_byte(byte) {
                                log::debug!("Decoded {} sentence", kind.label());
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Error reading from serial port: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    /// Run the terminal clock display until stopped
    pub async fn run_display(&self, utc_offset: i32) -> Result<()> {
        let display = TerminalDisplay::new(utc_offset);
        display.run(Arc::clone(&self.receiver), Arc::clone(&self.running)).await
    }

    /// Stop the monitor
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Check if the monitor is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Default for ClockMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// List available serial ports
pub async fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| ClockError::Other(format!("Failed to list serial ports: {}", e)))?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_stop_flag() {
        let monitor = ClockMonitor::new();
        assert!(monitor.is_running());
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[test]
    fn test_receiver_shared_between_handles() {
        let monitor = ClockMonitor::new();
        let handle = monitor.receiver();

        handle
            .write()
            .unwrap()
            .feed(b"$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39");

        assert_eq!(monitor.receiver().read().unwrap().fix_type_str(), "3D");
    }
}
