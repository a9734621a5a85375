// src/lib.rs
//! GPS Clock Library
//!
//! A GPS-synchronized clock built around a byte-level NMEA-0183 parser
//! and a geodetic derivation layer (decimal degrees, Maidenhead locator,
//! UTM) with change-based caching.

pub mod config;
pub mod display;
pub mod error;
pub mod gps;
pub mod monitor;

// Re-export main types for convenience
pub use config::ClockConfig;
pub use error::{ClockError, Result};
pub use gps::{FixType, GpsFix, GpsReceiver, NmeaParser, SentenceKind};
pub use monitor::ClockMonitor;
