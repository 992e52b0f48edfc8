//! Deals with different time scales, specifically, conversion between TT and
//! UT, and from UT into local civil time.
//!
//! The difference ΔT = TT − UT is modelled with a piecewise cubic fitted to
//! historical observations, joined to a parabolic extrapolation after 2028.

use crate::julian::{J2000, JulianDay};

/// [Terristrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian date (JD).
///
/// Ephemeris data are computed in this time scale, and should be converted
/// to UT when calculating dates. TDB is treated numerically the same.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the actual date at a given time point.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl From<Tt> for Ut {
    fn from(tt: Tt) -> Ut {
        Ut(tt.0 - delta_t_days(tt.0))
    }
}

impl From<Ut> for Tt {
    fn from(ut: Ut) -> Tt {
        // ΔT is a function of TT; iterate once.
        let first = ut.0 + delta_t_days(ut.0);
        Tt(ut.0 + delta_t_days(first))
    }
}

impl Ut {
    /// Returns the local Julian Day in timezone ahead (east) of UTC by
    /// `tz_offset_minutes` minutes.
    ///
    /// For Beijing time (UTC+8), `tz_offset_minutes` should be +480.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::time_scales::Ut;
    /// let ut = Ut(2451543.1); // 1999-12-30 14:24 UT
    /// assert_eq!(2451543, ut.to_local(480).day_number());
    /// let ut = Ut(2451543.2); // 1999-12-30 16:48 UT
    /// assert_eq!(2451544, ut.to_local(480).day_number());
    /// ```
    pub fn to_local(&self, tz_offset_minutes: i32) -> JulianDay {
        JulianDay(self.0 + f64::from(tz_offset_minutes) / 1440.0)
    }
}

/// `(year, a0, a1, a2, a3)`: ΔT in seconds is `a0 + a1·t + a2·t² + a3·t³`
/// where `t` is the elapsed tenth of the interval to the next row.
const DELTA_T_TABLE: &[(f64, f64, f64, f64, f64)] = &[
    (-4000.0, 108371.7, -13036.80, 392.000, 0.0000),
    (-500.0, 17201.0, -627.82, 16.170, -0.3413),
    (-150.0, 12200.6, -346.41, 5.403, -0.1593),
    (150.0, 9113.8, -328.13, -1.647, 0.0377),
    (500.0, 5707.5, -391.41, 0.915, 0.3145),
    (900.0, 2203.4, -283.45, 13.034, -0.1778),
    (1300.0, 490.1, -57.35, 2.085, -0.0072),
    (1600.0, 120.0, -9.81, -1.532, 0.1403),
    (1700.0, 10.2, -0.91, 0.510, -0.0370),
    (1800.0, 13.4, -0.72, 0.202, -0.0193),
    (1830.0, 7.8, -1.81, 0.416, -0.0247),
    (1860.0, 8.3, -0.13, -0.406, 0.0292),
    (1880.0, -5.4, 0.32, -0.183, 0.0173),
    (1900.0, -2.3, 2.06, 0.169, -0.0135),
    (1920.0, 21.2, 1.69, -0.304, 0.0167),
    (1940.0, 24.2, 1.22, -0.064, 0.0031),
    (1960.0, 33.2, 0.51, 0.231, -0.0109),
    (1980.0, 51.0, 1.29, -0.026, 0.0032),
    (2000.0, 63.87, 0.1, 0.0, 0.0),
    (2005.0, 64.7, 0.21, 0.0, 0.0),
    (2012.0, 66.8, 0.22, 0.0, 0.0),
    (2018.0, 69.0, 0.36, 0.0, 0.0),
];
const TABLE_END_YEAR: f64 = 2028.0;
const TABLE_END_VALUE: f64 = 72.6;

fn extrapolate(year: f64) -> f64 {
    let t = (year - 1820.0) / 100.0;
    -20.0 + 31.0 * t * t
}

/// ΔT = TT − UT in seconds for a (fractional) year.
///
/// # Example
///
/// ```
/// use nongli::time_scales::delta_t_seconds;
/// assert!((delta_t_seconds(2000.0) - 63.87).abs() < 1e-9);
/// ```
pub fn delta_t_seconds(year: f64) -> f64 {
    if year < DELTA_T_TABLE[0].0 {
        return extrapolate(year);
    }
    if year >= TABLE_END_YEAR {
        return if year > TABLE_END_YEAR + 100.0 {
            extrapolate(year)
        } else {
            extrapolate(year)
                - (extrapolate(TABLE_END_YEAR) - TABLE_END_VALUE) * (TABLE_END_YEAR + 100.0 - year)
                    / 100.0
        };
    }
    let i = DELTA_T_TABLE.partition_point(|row| row.0 <= year) - 1;
    let (y0, a0, a1, a2, a3) = DELTA_T_TABLE[i];
    let y1 = DELTA_T_TABLE.get(i + 1).map_or(TABLE_END_YEAR, |row| row.0);
    let t = (year - y0) / (y1 - y0) * 10.0;
    a0 + t * (a1 + t * (a2 + t * a3))
}

/// ΔT in days for an instant given as a Julian Day.
fn delta_t_days(jd: f64) -> f64 {
    delta_t_seconds((jd - J2000) / 365.2425 + 2000.0) / 86400.0
}
