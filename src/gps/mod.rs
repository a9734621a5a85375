// src/gps/mod.rs
//! GPS data handling: NMEA parsing, fix state and geodetic derivations

pub mod data;
pub mod geodetic;
pub mod parser;
pub mod receiver;

pub use data::{FixType, GpsFix};
pub use parser::{NmeaParser, SentenceKind};
pub use receiver::GpsReceiver;
