// src/gps/data.rs
//! GPS fix data structures and display formatting

/// Days per month in a non-leap year
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Rendered when no date has ever been received
const DATE_PLACEHOLDER: &str = "----.--.--";

/// UTC time of day as reported by the receiver
#[derive(Debug, Clone, PartialEq)]
pub struct UtcTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: f64,
}

impl Default for UtcTime {
    fn default() -> Self {
        Self { hours: 0, minutes: 0, seconds: 0.0 }
    }
}

/// Calendar date as reported by the receiver (2-digit year)
///
/// All-zero means no date sentence has ever been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpsDate {
    pub day: u8,
    pub month: u8,
    pub year: u8,
}

impl GpsDate {
    pub fn is_set(&self) -> bool {
        !(self.day == 0 && self.month == 0 && self.year == 0)
    }
}

/// One coordinate axis in raw receiver form: whole degrees, decimal
/// minutes, and the hemisphere letter from the sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCoordinate {
    pub degrees: u16,
    pub minutes: f64,
    pub hemisphere: char,
}

impl RawCoordinate {
    /// Zero sentinel used before any position and after an invalid fix
    pub fn zero(hemisphere: char) -> Self {
        Self { degrees: 0, minutes: 0.0, hemisphere }
    }
}

/// Position solution type from the GSA sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixType {
    #[default]
    NoFix,
    Fix2D,
    Fix3D,
}

impl FixType {
    pub fn label(&self) -> &'static str {
        match self {
            FixType::NoFix => "None",
            FixType::Fix2D => "2D",
            FixType::Fix3D => "3D",
        }
    }
}

/// Latest validated receiver state plus parser diagnostics.
///
/// Field groups are owned by sentence type: RMC/GLL write time, date,
/// position and validity; GGA writes time, quality and satellites in use;
/// GSA writes the fix type; GSV writes satellites in view. Fields are never
/// reset once populated, so a signal loss leaves the last good data in
/// place rather than blanking the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsFix {
    pub timestamp: UtcTime,
    pub date: GpsDate,
    pub latitude: RawCoordinate,
    pub longitude: RawCoordinate,
    pub fix_type: FixType,
    pub valid: bool,
    pub fix_quality: u8,
    pub satellites_in_use: u8,
    pub satellites_in_view: u8,
    pub clean_sentences: u32,
    pub crc_fails: u32,
    pub parsed_sentences: u32,
}

impl Default for GpsFix {
    fn default() -> Self {
        Self {
            timestamp: UtcTime::default(),
            date: GpsDate::default(),
            latitude: RawCoordinate::zero('N'),
            longitude: RawCoordinate::zero('W'),
            fix_type: FixType::NoFix,
            valid: false,
            fix_quality: 0,
            satellites_in_use: 0,
            satellites_in_view: 0,
            clean_sentences: 0,
            crc_fails: 0,
            parsed_sentences: 0,
        }
    }
}

impl GpsFix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the time of day as HH:MM:SS, shifted by a whole-hour UTC offset
    pub fn time_str(&self, utc_offset: i32) -> String {
        let h = (self.timestamp.hours as i32 + utc_offset).rem_euclid(24);
        format!("{:02}:{:02}:{:02}", h, self.timestamp.minutes, self.timestamp.seconds as u8)
    }

    /// Format the date as YYYY-MM-DD, shifted by a whole-hour UTC offset.
    ///
    /// Crossing midnight in either direction rolls the day, month and year,
    /// including the February leap-day case.
    pub fn date_str(&self, utc_offset: i32) -> String {
        if !self.date.is_set() {
            return DATE_PLACEHOLDER.to_string();
        }

        let mut day = self.date.day as i32;
        let mut month = self.date.month as i32;
        let mut year = 2000 + self.date.year as i32;
        let local_hour = self.timestamp.hours as i32 + utc_offset;

        if local_hour < 0 {
            day -= 1;
            if day < 1 {
                month -= 1;
                if month < 1 {
                    month = 12;
                    year -= 1;
                }
                day = days_in_month(month as u8, year) as i32;
            }
        } else if local_hour >= 24 {
            day += 1;
            if day > days_in_month(month as u8, year) as i32 {
                day = 1;
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
        }

        format!("{:04}-{:02}-{:02}", year, month, day)
    }

    /// Human-readable fix type
    pub fn fix_type_str(&self) -> &'static str {
        self.fix_type.label()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(month: u8, year: i32) -> u8 {
    if month == 2 && is_leap_year(year) {
        return 29;
    }
    DAYS_IN_MONTH[(month as usize) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_with(hours: u8, day: u8, month: u8, year: u8) -> GpsFix {
        let mut fix = GpsFix::new();
        fix.timestamp = UtcTime { hours, minutes: 30, seconds: 15.0 };
        fix.date = GpsDate { day, month, year };
        fix
    }

    #[test]
    fn test_time_str_offsets() {
        let fix = fix_with(0, 1, 3, 24);
        assert_eq!(fix.time_str(0), "00:30:15");
        assert_eq!(fix.time_str(-5), "19:30:15");
        assert_eq!(fix.time_str(10), "10:30:15");
    }

    #[test]
    fn test_date_str_no_rollover() {
        let fix = fix_with(12, 15, 6, 24);
        assert_eq!(fix.date_str(0), "2024-06-15");
        assert_eq!(fix.date_str(3), "2024-06-15");
    }

    #[test]
    fn test_date_str_leap_day_rollback() {
        // UTC 2024-03-01 00:xx with offset -5 is still Feb 29 locally
        let fix = fix_with(0, 1, 3, 24);
        assert_eq!(fix.date_str(-5), "2024-02-29");
    }

    #[test]
    fn test_date_str_non_leap_rollback() {
        let fix = fix_with(0, 1, 3, 23);
        assert_eq!(fix.date_str(-5), "2023-02-28");
    }

    #[test]
    fn test_date_str_year_rollover_forward() {
        // UTC Dec 31 23:xx with offset +2 is Jan 1 next year
        let fix = fix_with(23, 31, 12, 24);
        assert_eq!(fix.date_str(2), "2025-01-01");
    }

    #[test]
    fn test_date_str_year_rollback() {
        let fix = fix_with(0, 1, 1, 25);
        assert_eq!(fix.date_str(-1), "2024-12-31");
    }

    #[test]
    fn test_date_placeholder_until_first_date() {
        let fix = GpsFix::new();
        assert_eq!(fix.date_str(0), "----.--.--");
    }

    #[test]
    fn test_fix_type_labels() {
        let mut fix = GpsFix::new();
        assert_eq!(fix.fix_type_str(), "None");
        fix.fix_type = FixType::Fix2D;
        assert_eq!(fix.fix_type_str(), "2D");
        fix.fix_type = FixType::Fix3D;
        assert_eq!(fix.fix_type_str(), "3D");
    }

    #[test]
    fn test_days_in_month_table() {
        assert_eq!(days_in_month(2, 2024), 29);
        assert_eq!(days_in_month(2, 2100), 28);
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(4, 2024), 30);
        assert_eq!(days_in_month(12, 2024), 31);
    }
}
