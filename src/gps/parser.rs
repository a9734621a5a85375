// src/gps/parser.rs
//! Byte-driven NMEA 0183 sentence parser
//!
//! Sentences are reassembled one byte at a time from the serial stream,
//! checksum-verified, split into fields and dispatched to a decoder that
//! updates [`GpsFix`]. Malformed input never surfaces an error to the
//! caller; every failure mode ends up in the diagnostic counters so the
//! feed loop can run unattended.

use super::data::{FixType, GpsDate, GpsFix, RawCoordinate, UtcTime};

/// Longest supported sentence (GGA), counted from the byte after `$`
const SENTENCE_LIMIT: usize = 90;

/// Enough for GSV's 20 comma-separated fields with headroom
const MAX_FIELDS: usize = 24;

/// Supported sentence types. GP/GL/GN talker variants share a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    Rmc,
    Gga,
    Gsa,
    Gsv,
    Gll,
}

impl SentenceKind {
    /// Resolve a 5-character identifier field (talker + type) to a kind
    fn from_identifier(id: &str) -> Option<Self> {
        if id.len() != 5 {
            return None;
        }
        match &id[..2] {
            "GP" | "GL" | "GN" => {}
            _ => return None,
        }
        match &id[2..] {
            "RMC" => Some(SentenceKind::Rmc),
            "GGA" => Some(SentenceKind::Gga),
            "GSA" => Some(SentenceKind::Gsa),
            "GSV" => Some(SentenceKind::Gsv),
            "GLL" => Some(SentenceKind::Gll),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentenceKind::Rmc => "RMC",
            SentenceKind::Gga => "GGA",
            SentenceKind::Gsa => "GSA",
            SentenceKind::Gsv => "GSV",
            SentenceKind::Gll => "GLL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Idle,
    InSentence,
    InChecksum,
}

/// NMEA sentence reassembly state machine.
///
/// One instance per receiver session. The only storage is the fixed
/// sentence buffer and the checksum registers; the per-byte path does not
/// allocate.
pub struct NmeaParser {
    state: ParserState,
    buf: [u8; SENTENCE_LIMIT],
    len: usize,
    crc: u8,
    checksum: [u8; 2],
    checksum_len: usize,
    char_count: usize,
}

impl NmeaParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            buf: [0; SENTENCE_LIMIT],
            len: 0,
            crc: 0,
            checksum: [0; 2],
            checksum_len: 0,
            char_count: 0,
        }
    }

    /// Feed one byte from the receiver.
    ///
    /// Returns the sentence kind when this byte completes a sentence that
    /// passed checksum verification and field decoding; `None` for every
    /// other byte. Checksum failures bump `fix.crc_fails`, valid but
    /// unrecognized or undecodable sentences bump only
    /// `fix.clean_sentences`.
    pub fn feed(&mut self, fix: &mut GpsFix, byte: u8) -> Option<SentenceKind> {
        // Line noise still counts toward the length bound so a jammed
        // receiver cannot hold a sentence open forever.
        self.char_count = self.char_count.saturating_add(1);
        if !(10..=126).contains(&byte) {
            self.enforce_limit();
            return None;
        }

        if byte == b'$' {
            self.begin_sentence();
            return None;
        }

        match self.state {
            ParserState::Idle => None,
            ParserState::InSentence => {
                if byte == b'*' {
                    self.state = ParserState::InChecksum;
                    self.checksum_len = 0;
                    self.enforce_limit();
                } else {
                    if self.len < SENTENCE_LIMIT {
                        self.buf[self.len] = byte;
                        self.len += 1;
                    }
                    self.crc ^= byte;
                    self.enforce_limit();
                }
                None
            }
            ParserState::InChecksum => {
                self.checksum[self.checksum_len] = byte;
                self.checksum_len += 1;
                if self.checksum_len < 2 {
                    self.enforce_limit();
                    return None;
                }

                self.state = ParserState::Idle;
                let expected = match hex_pair(self.checksum[0], self.checksum[1]) {
                    Some(value) => value,
                    // Garbage where the hex digits belong: abandon silently
                    None => return None,
                };
                if expected != self.crc {
                    fix.crc_fails += 1;
                    return None;
                }

                fix.clean_sentences += 1;
                self.dispatch(fix)
            }
        }
    }

    /// Reset the sentence registers; `$` restarts mid-sentence as well
    fn begin_sentence(&mut self) {
        self.state = ParserState::InSentence;
        self.len = 0;
        self.crc = 0;
        self.checksum_len = 0;
        self.char_count = 0;
    }

    fn enforce_limit(&mut self) {
        if self.state != ParserState::Idle && self.char_count > SENTENCE_LIMIT {
            self.state = ParserState::Idle;
        }
    }

    /// Split the verified sentence into fields and run the matching decoder
    fn dispatch(&self, fix: &mut GpsFix) -> Option<SentenceKind> {
        let raw = match std::str::from_utf8(&self.buf[..self.len]) {
            Ok(s) => s,
            Err(_) => return None,
        };

        let mut fields = [""; MAX_FIELDS];
        let mut count = 0;
        for part in raw.split(',') {
            if count == MAX_FIELDS {
                break;
            }
            fields[count] = part;
            count += 1;
        }
        let fields = &fields[..count];

        let kind = SentenceKind::from_identifier(fields.first()?)?;
        let decoded = match kind {
            SentenceKind::Rmc => decode_rmc(fix, fields),
            SentenceKind::Gga => decode_gga(fix, fields),
            SentenceKind::Gsa => decode_gsa(fix, fields),
            SentenceKind::Gsv => decode_gsv(fix, fields),
            SentenceKind::Gll => decode_gll(fix, fields),
        };

        if decoded {
            fix.parsed_sentences += 1;
            Some(kind)
        } else {
            None
        }
    }
}

impl Default for NmeaParser {
    fn default() -> Self {
        Self::new()
    }
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Parse an hhmmss[.sss] field. An empty field resets to midnight.
fn parse_utc_time(field: &str) -> Option<UtcTime> {
    if field.is_empty() {
        return Some(UtcTime::default());
    }
    let hours = field.get(0..2)?.parse::<u8>().ok()?;
    let minutes = field.get(2..4)?.parse::<u8>().ok()?;
    let seconds = field.get(4..)?.parse::<f64>().ok()?;
    Some(UtcTime { hours, minutes, seconds })
}

/// Parse a ddmmyy date field. An empty field resets to the unset sentinel.
fn parse_date(field: &str) -> Option<GpsDate> {
    if field.is_empty() {
        return Some(GpsDate::default());
    }
    let day = field.get(0..2)?.parse::<u8>().ok()?;
    let month = field.get(2..4)?.parse::<u8>().ok()?;
    let year = field.get(4..6)?.parse::<u8>().ok()?;
    Some(GpsDate { day, month, year })
}

/// Parse a ddmm.mmmm latitude with its hemisphere field
fn parse_latitude(deg_min: &str, hemi: &str) -> Option<RawCoordinate> {
    let degrees = deg_min.get(0..2)?.parse::<u16>().ok()?;
    let minutes = deg_min.get(2..)?.parse::<f64>().ok()?;
    let hemisphere = match hemi {
        "N" => 'N',
        "S" => 'S',
        _ => return None,
    };
    Some(RawCoordinate { degrees, minutes, hemisphere })
}

/// Parse a dddmm.mmmm longitude with its hemisphere field
fn parse_longitude(deg_min: &str, hemi: &str) -> Option<RawCoordinate> {
    let degrees = deg_min.get(0..3)?.parse::<u16>().ok()?;
    let minutes = deg_min.get(3..)?.parse::<f64>().ok()?;
    let hemisphere = match hemi {
        "E" => 'E',
        "W" => 'W',
        _ => return None,
    };
    Some(RawCoordinate { degrees, minutes, hemisphere })
}

/// RMC: UTC time, date, and position gated on the receiver status flag.
///
/// Time and date are committed before the status field is examined, so a
/// sentence that fails later leaves them written. Position is only written
/// for an `A` status; anything else clears it to the zero sentinel and
/// drops validity.
fn decode_rmc(fix: &mut GpsFix, fields: &[&str]) -> bool {
    if fields.len() < 10 {
        return false;
    }

    match parse_utc_time(fields[1]) {
        Some(time) => fix.timestamp = time,
        None => return false,
    }

    match parse_date(fields[9]) {
        Some(date) => fix.date = date,
        None => return false,
    }

    if fields[2] == "A" {
        let lat = parse_latitude(fields[3], fields[4]);
        let lon = parse_longitude(fields[5], fields[6]);
        match (lat, lon) {
            (Some(lat), Some(lon)) => {
                fix.latitude = lat;
                fix.longitude = lon;
                fix.valid = true;
            }
            _ => return false,
        }
    } else {
        fix.latitude = RawCoordinate::zero('N');
        fix.longitude = RawCoordinate::zero('W');
        fix.valid = false;
    }

    true
}

/// GGA: UTC time, fix quality and satellites in use always; position only
/// while the quality field reports a fix. Validity belongs to RMC/GLL and
/// is left alone here.
fn decode_gga(fix: &mut GpsFix, fields: &[&str]) -> bool {
    if fields.len() < 8 {
        return false;
    }

    let time = match parse_utc_time(fields[1]) {
        Some(time) => time,
        None => return false,
    };
    let quality = match fields[6].parse::<u8>() {
        Ok(q) => q,
        Err(_) => return false,
    };
    let in_use = match fields[7].parse::<u8>() {
        Ok(n) => n,
        Err(_) => return false,
    };

    if quality != 0 {
        let lat = parse_latitude(fields[2], fields[3]);
        let lon = parse_longitude(fields[4], fields[5]);
        match (lat, lon) {
            (Some(lat), Some(lon)) => {
                fix.latitude = lat;
                fix.longitude = lon;
            }
            _ => return false,
        }
    }

    fix.timestamp = time;
    fix.fix_quality = quality;
    fix.satellites_in_use = in_use;
    true
}

/// GSA: solution type from the fixed field position
fn decode_gsa(fix: &mut GpsFix, fields: &[&str]) -> bool {
    if fields.len() < 3 {
        return false;
    }
    let fix_type = match fields[2].parse::<u8>() {
        Ok(1) => FixType::NoFix,
        Ok(2) => FixType::Fix2D,
        Ok(3) => FixType::Fix3D,
        _ => return false,
    };
    fix.fix_type = fix_type;
    true
}

/// GSV: satellites in view from the fixed field position. A later part of
/// a multi-part group simply overwrites the count.
fn decode_gsv(fix: &mut GpsFix, fields: &[&str]) -> bool {
    if fields.len() < 4 {
        return false;
    }
    if fields[1].parse::<u8>().is_err() || fields[2].parse::<u8>().is_err() {
        return false;
    }
    let in_view = match fields[3].parse::<u8>() {
        Ok(n) => n,
        Err(_) => return false,
    };
    fix.satellites_in_view = in_view;
    true
}

/// GLL: UTC time plus position gated on the status flag, like RMC without
/// the date
fn decode_gll(fix: &mut GpsFix, fields: &[&str]) -> bool {
    if fields.len() < 7 {
        return false;
    }

    match parse_utc_time(fields[5]) {
        Some(time) => fix.timestamp = time,
        None => return false,
    }

    if fields[6] == "A" {
        let lat = parse_latitude(fields[1], fields[2]);
        let lon = parse_longitude(fields[3], fields[4]);
        match (lat, lon) {
            (Some(lat), Some(lon)) => {
                fix.latitude = lat;
                fix.longitude = lon;
                fix.valid = true;
            }
            _ => return false,
        }
    } else {
        fix.latitude = RawCoordinate::zero('N');
        fix.longitude = RawCoordinate::zero('W');
        fix.valid = false;
    }

    true
}
