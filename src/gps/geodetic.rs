// src/gps/geodetic.rs
//! Derived coordinate representations: decimal degrees, Maidenhead grid
//! locator and UTM, with change-based caching
//!
//! The clock redraws several times a second, so every derivation is cached
//! against the value it was computed from and only recomputed when the
//! receiver actually reports something new.

use super::data::{GpsFix, RawCoordinate};

// WGS84 ellipsoid
const WGS84_A: f64 = 6378137.0;
const WGS84_F: f64 = 1.0 / 298.257223563;

/// Transverse Mercator scale factor at the central meridian
const UTM_K0: f64 = 0.9996;

/// Latitude band letters for 8-degree rows from 80S to 84N (I and O skipped)
const UTM_BANDS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";

/// Computes display-ready geodetic values from the raw fix, recomputing
/// only when the underlying coordinate changes.
pub struct GeodeticDeriver {
    lat_cache: Option<(RawCoordinate, f64)>,
    lon_cache: Option<(RawCoordinate, f64)>,
    grid_cache: Option<(f64, f64, String)>,
    utm_cache: Option<(f64, f64, String)>,
    /// Cache-miss counter; bumps once per recomputation
    pub recomputes: u32,
}

impl GeodeticDeriver {
    pub fn new() -> Self {
        Self {
            lat_cache: None,
            lon_cache: None,
            grid_cache: None,
            utm_cache: None,
            recomputes: 0,
        }
    }

    /// Signed decimal latitude (positive north)
    pub fn latitude_decimal(&mut self, fix: &GpsFix) -> f64 {
        if let Some((key, value)) = &self.lat_cache {
            if *key == fix.latitude {
                return *value;
            }
        }
        self.recomputes += 1;
        let mut decimal = fix.latitude.degrees as f64 + fix.latitude.minutes / 60.0;
        if fix.latitude.hemisphere == 'S' {
            decimal = -decimal;
        }
        self.lat_cache = Some((fix.latitude.clone(), decimal));
        decimal
    }

    /// Signed decimal longitude (positive east)
    pub fn longitude_decimal(&mut self, fix: &GpsFix) -> f64 {
        if let Some((key, value)) = &self.lon_cache {
            if *key == fix.longitude {
                return *value;
            }
        }
        self.recomputes += 1;
        let mut decimal = fix.longitude.degrees as f64 + fix.longitude.minutes / 60.0;
        if fix.longitude.hemisphere == 'W' {
            decimal = -decimal;
        }
        self.lon_cache = Some((fix.longitude.clone(), decimal));
        decimal
    }

    /// 6-character Maidenhead grid locator for the current position
    pub fn maidenhead(&mut self, fix: &GpsFix) -> String {
        let lat = self.latitude_decimal(fix);
        let lon = self.longitude_decimal(fix);
        if let Some((cached_lat, cached_lon, grid)) = &self.grid_cache {
            if *cached_lat == lat && *cached_lon == lon {
                return grid.clone();
            }
        }
        self.recomputes += 1;
        let grid = encode_maidenhead(lat, lon);
        self.grid_cache = Some((lat, lon, grid.clone()));
        grid
    }

    /// UTM coordinate string, e.g. `32U 687300E 5332401N`
    pub fn utm(&mut self, fix: &GpsFix) -> String {
        let lat = self.latitude_decimal(fix);
        let lon = self.longitude_decimal(fix);
        if let Some((cached_lat, cached_lon, utm)) = &self.utm_cache {
            if *cached_lat == lat && *cached_lon == lon {
                return utm.clone();
            }
        }
        self.recomputes += 1;
        let utm = project_utm(lat, lon);
        self.utm_cache = Some((lat, lon, utm.clone()));
        utm
    }
}

impl Default for GeodeticDeriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a decimal position as a field/square/subsquare grid locator
fn encode_maidenhead(lat_decimal: f64, lon_decimal: f64) -> String {
    // Shift both axes non-negative: lon 0..360, lat 0..180
    let lon = lon_decimal + 180.0;
    let lat = lat_decimal + 90.0;

    let lon_field = (lon / 20.0).floor();
    let lat_field = (lat / 10.0).floor();
    let lon_square = ((lon - lon_field * 20.0) / 2.0).floor();
    let lat_square = (lat - lat_field * 10.0).floor();
    let lon_sub = ((lon - lon_field * 20.0 - lon_square * 2.0) * 12.0).floor();
    let lat_sub = ((lat - lat_field * 10.0 - lat_square) * 24.0).floor();

    format!(
        "{}{}{}{}{}{}",
        (b'A' + lon_field as u8) as char,
        (b'A' + lat_field as u8) as char,
        (b'0' + lon_square as u8) as char,
        (b'0' + lat_square as u8) as char,
        (b'a' + lon_sub as u8) as char,
        (b'a' + lat_sub as u8) as char,
    )
}

/// WGS84 transverse Mercator projection (Redfearn series)
fn project_utm(lat_decimal: f64, lon_decimal: f64) -> String {
    let e2 = 2.0 * WGS84_F - WGS84_F * WGS84_F;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let zone = ((lon_decimal + 180.0) / 6.0).floor() as u32 + 1;
    let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;

    let lat = lat_decimal.to_radians();
    let delta_lon = (lon_decimal - central_meridian).to_radians();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ep2 * cos_lat * cos_lat;
    let a = cos_lat * delta_lon;

    // Meridional arc from the equator
    let m = WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin());

    let easting = UTM_K0
        * n
        * (a
            + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + 500_000.0;

    let mut northing = UTM_K0
        * (m + n
            * tan_lat
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    if lat_decimal < 0.0 {
        northing += 10_000_000.0;
    }

    format!(
        "{}{} {:06}E {:07}N",
        zone,
        band_letter(lat_decimal),
        easting.round() as u32,
        northing.round() as u32,
    )
}

/// Latitude band letter for the 8-degree UTM rows, clamped at the poles
fn band_letter(lat_decimal: f64) -> char {
    if lat_decimal > 84.0 {
        return 'X';
    }
    if lat_decimal < -80.0 {
        return 'C';
    }
    let index = ((lat_decimal + 80.0) / 8.0).floor() as usize;
    UTM_BANDS[index.min(UTM_BANDS.len() - 1)] as char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_at(
        lat_deg: u16,
        lat_min: f64,
        lat_hemi: char,
        lon_deg: u16,
        lon_min: f64,
        lon_hemi: char,
    ) -> GpsFix {
        let mut fix = GpsFix::new();
        fix.latitude = RawCoordinate { degrees: lat_deg, minutes: lat_min, hemisphere: lat_hemi };
        fix.longitude = RawCoordinate { degrees: lon_deg, minutes: lon_min, hemisphere: lon_hemi };
        fix.valid = true;
        fix
    }

    fn nyc() -> GpsFix {
        // 40.7128 N, 74.0060 W
        fix_at(40, 42.768, 'N', 74, 0.360, 'W')
    }

    fn sydney() -> GpsFix {
        // 33.8688 S, 151.2093 E
        fix_at(33, 52.128, 'S', 151, 12.558, 'E')
    }

    #[test]
    fn test_decimal_conversion() {
        let mut deriver = GeodeticDeriver::new();
        let fix = nyc();

        assert!((deriver.latitude_decimal(&fix) - 40.7128).abs() < 1e-9);
        assert!((deriver.longitude_decimal(&fix) - (-74.0060)).abs() < 1e-9);
    }

    #[test]
    fn test_decimal_conversion_southern_eastern() {
        let mut deriver = GeodeticDeriver::new();
        let fix = sydney();

        assert!((deriver.latitude_decimal(&fix) - (-33.8688)).abs() < 1e-9);
        assert!((deriver.longitude_decimal(&fix) - 151.2093).abs() < 1e-9);
    }

    #[test]
    fn test_decimal_cache_tracks_raw_coordinate() {
        let mut deriver = GeodeticDeriver::new();
        let mut fix = nyc();

        deriver.latitude_decimal(&fix);
        let after_first = deriver.recomputes;
        deriver.latitude_decimal(&fix);
        assert_eq!(deriver.recomputes, after_first);

        // Same minutes but different degrees still invalidates
        fix.latitude.degrees = 41;
        let decimal = deriver.latitude_decimal(&fix);
        assert_eq!(deriver.recomputes, after_first + 1);
        assert!((decimal - 41.7128).abs() < 1e-9);

        // Hemisphere flip alone invalidates too
        fix.latitude.hemisphere = 'S';
        assert!((deriver.latitude_decimal(&fix) + 41.7128).abs() < 1e-9);
    }

    #[test]
    fn test_maidenhead_known_locators() {
        let mut deriver = GeodeticDeriver::new();

        assert_eq!(deriver.maidenhead(&nyc()), "FN20xr");
        assert_eq!(deriver.maidenhead(&sydney()), "QF56od");
        // Munich area: 48 07.038 N, 011 31.000 E
        assert_eq!(deriver.maidenhead(&fix_at(48, 7.038, 'N', 11, 31.0, 'E')), "JN58sc");
    }

    #[test]
    fn test_maidenhead_idempotent_reads() {
        let mut deriver = GeodeticDeriver::new();
        let fix = nyc();

        let first = deriver.maidenhead(&fix);
        let after_first = deriver.recomputes;
        let second = deriver.maidenhead(&fix);

        assert_eq!(first, second);
        assert_eq!(deriver.recomputes, after_first);
    }

    #[test]
    fn test_utm_new_york() {
        let mut deriver = GeodeticDeriver::new();
        let utm = deriver.utm(&nyc());

        // 18T 583959E 4507351N
        assert!(utm.starts_with("18T "));
        let (easting, northing) = parse_utm_meters(&utm);
        assert!((easting - 583959).abs() <= 2, "easting {easting}");
        assert!((northing - 4507351).abs() <= 2, "northing {northing}");
    }

    #[test]
    fn test_utm_southern_hemisphere_offset() {
        let mut deriver = GeodeticDeriver::new();
        let utm = deriver.utm(&sydney());

        // 56H 334369E 6250948N, northing includes the 10,000 km false origin
        assert!(utm.starts_with("56H "));
        let (easting, northing) = parse_utm_meters(&utm);
        assert!((easting - 334369).abs() <= 2, "easting {easting}");
        assert!((northing - 6250948).abs() <= 2, "northing {northing}");
    }

    #[test]
    fn test_utm_idempotent_reads() {
        let mut deriver = GeodeticDeriver::new();
        let fix = sydney();

        let first = deriver.utm(&fix);
        let after_first = deriver.recomputes;
        let second = deriver.utm(&fix);

        assert_eq!(first, second);
        assert_eq!(deriver.recomputes, after_first);
    }

    #[test]
    fn test_band_letter_edges() {
        assert_eq!(band_letter(0.0), 'N');
        assert_eq!(band_letter(-0.1), 'M');
        assert_eq!(band_letter(85.0), 'X');
        assert_eq!(band_letter(83.0), 'X');
        assert_eq!(band_letter(-81.0), 'C');
        assert_eq!(band_letter(-79.9), 'C');
    }

    fn parse_utm_meters(utm: &str) -> (i64, i64) {
        let mut parts = utm.split_whitespace();
        let _zone_band = parts.next().unwrap();
        let easting = parts.next().unwrap().trim_end_matches('E').parse().unwrap();
        let northing = parts.next().unwrap().trim_end_matches('N').parse().unwrap();
        (easting, northing)
    }
}
