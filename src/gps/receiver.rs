// src/gps/receiver.rs
//! Receiver session: parser, fix data and geodetic derivations in one place

use chrono::{DateTime, Utc};

use super::data::GpsFix;
use super::geodetic::GeodeticDeriver;
use super::parser::{NmeaParser, SentenceKind};

/// Shown for the grid locator until a fix has ever been obtained
const GRID_PLACEHOLDER: &str = "------";

/// Shown for the UTM readout until a fix has ever been obtained
const UTM_PLACEHOLDER: &str = "-- ------E -------N";

/// One GPS receiver session.
///
/// Owns the parser, the fix record and the derivation caches, and is the
/// read surface for everything the clock displays. Collaborators supply
/// the UTC offset per call; it is never stored here.
pub struct GpsReceiver {
    parser: NmeaParser,
    fix: GpsFix,
    deriver: GeodeticDeriver,
    has_ever_had_fix: bool,
    last_fix_time: Option<DateTime<Utc>>,
    last_sentence: Option<SentenceKind>,
}

impl GpsReceiver {
    pub fn new() -> Self {
        Self {
            parser: NmeaParser::new(),
            fix: GpsFix::new(),
            deriver: GeodeticDeriver::new(),
            has_ever_had_fix: false,
            last_fix_time: None,
            last_sentence: None,
        }
    }

    /// Feed one byte from the serial stream
    pub fn feed_byte(&mut self, byte: u8) -> Option<SentenceKind> {
        let kind = self.parser.feed(&mut self.fix, byte);
        if let Some(kind) = kind {
            self.last_sentence = Some(kind);
            if self.fix.valid {
                self.has_ever_had_fix = true;
                self.last_fix_time = Some(Utc::now());
            }
        }
        kind
    }

    /// Feed a whole chunk of bytes, e.g. one serial read
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed_byte(byte);
        }
    }

    /// Raw fix record, for direct field access
    pub fn fix(&self) -> &GpsFix {
        &self.fix
    }

    /// True while the receiver reports a valid position
    pub fn has_fix(&self) -> bool {
        self.fix.valid
    }

    /// True once any valid fix has been seen; the clock keeps running on
    /// the last good data after signal loss
    pub fn has_ever_had_fix(&self) -> bool {
        self.has_ever_had_fix
    }

    /// Seconds since the last valid fix, if there ever was one
    pub fn fix_age_seconds(&self) -> Option<i64> {
        self.last_fix_time
            .map(|t| Utc::now().signed_duration_since(t).num_seconds())
    }

    /// Kind of the most recent successfully decoded sentence
    pub fn last_sentence(&self) -> Option<SentenceKind> {
        self.last_sentence
    }

    /// HH:MM:SS for the given whole-hour UTC offset
    pub fn time_str(&self, utc_offset: i32) -> String {
        self.fix.time_str(utc_offset)
    }

    /// YYYY-MM-DD for the given whole-hour UTC offset
    pub fn date_str(&self, utc_offset: i32) -> String {
        self.fix.date_str(utc_offset)
    }

    pub fn fix_type_str(&self) -> &'static str {
        self.fix.fix_type_str()
    }

    pub fn satellites_in_use(&self) -> u8 {
        self.fix.satellites_in_use
    }

    pub fn satellites_in_view(&self) -> u8 {
        self.fix.satellites_in_view
    }

    /// Signed decimal latitude, positive north
    pub fn latitude_decimal(&mut self) -> f64 {
        self.deriver.latitude_decimal(&self.fix)
    }

    /// Signed decimal longitude, positive east
    pub fn longitude_decimal(&mut self) -> f64 {
        self.deriver.longitude_decimal(&self.fix)
    }

    /// Latitude as an unsigned decimal with hemisphere, e.g. `40.7128 N`
    pub fn lat_str(&mut self) -> String {
        let decimal = self.latitude_decimal().abs();
        format!("{:.4} {}", decimal, self.fix.latitude.hemisphere)
    }

    /// Longitude as an unsigned decimal with hemisphere, e.g. `74.0060 W`
    pub fn lon_str(&mut self) -> String {
        let decimal = self.longitude_decimal().abs();
        format!("{:.4} {}", decimal, self.fix.longitude.hemisphere)
    }

    /// 6-character Maidenhead locator, dashes until the first fix
    pub fn maidenhead(&mut self) -> String {
        if !self.has_ever_had_fix {
            return GRID_PLACEHOLDER.to_string();
        }
        self.deriver.maidenhead(&self.fix)
    }

    /// UTM coordinate string, dashes until the first fix
    pub fn utm(&mut self) -> String {
        if !self.has_ever_had_fix {
            return UTM_PLACEHOLDER.to_string();
        }
        self.deriver.utm(&self.fix)
    }
}

impl Default for GpsReceiver {
    fn default() -> Self {
        Self::new()
    }
}
