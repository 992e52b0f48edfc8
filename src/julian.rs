//! Julian Day arithmetic.
//!
//! A Julian Day is a continuous count of days (with fraction) from noon of
//! January 1, 4713 BC; `.0` falls on noon and `.5` on midnight.

use crate::date::{Date, MAX_YEAR, MIN_YEAR};
use crate::error::{Error, Result};

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2451545.0;

/// A Julian Day, i.e. a day count with fraction, noon-based.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay(pub f64);

impl JulianDay {
    /// Julian day number of the civil date containing the instant.
    pub fn day_number(self) -> i64 {
        (self.0 + 0.5).floor() as i64
    }
}

impl From<Date> for JulianDay {
    fn from(date: Date) -> Self {
        date.noon()
    }
}

/// Converts a civil timestamp into a Julian Day.
///
/// Dates before 1582-10-15 are read as Julian calendar dates.
///
/// # Example
///
/// ```
/// use nongli::julian::to_julian_day;
///
/// assert_eq!(2451545.0, to_julian_day(2000, 1, 1, 12, 0, 0).unwrap().0);
/// assert_eq!(2299160.5, to_julian_day(1582, 10, 15, 0, 0, 0).unwrap().0);
/// assert!(to_julian_day(1582, 10, 10, 0, 0, 0).is_err());
/// ```
pub fn to_julian_day(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<JulianDay> {
    let invalid = || Error::calendar_date((year, month, day), (hour, minute, second));
    let date = Date::from_ymd(year, month, day).map_err(|_| invalid())?;
    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }
    let secs = hour * 3600 + minute * 60 + second;
    Ok(JulianDay(
        f64::from(date.jdn()) - 0.5 + f64::from(secs) / 86400.0,
    ))
}

/// Converts a Julian Day back into `(year, month, day, hour, minute, second)`,
/// rounding to the nearest second.
///
/// # Example
///
/// ```
/// use nongli::julian::{from_julian_day, JulianDay};
///
/// assert_eq!((2000, 1, 1, 12, 0, 0), from_julian_day(JulianDay(2451545.0)).unwrap());
/// assert_eq!((1582, 10, 4, 23, 59, 59), from_julian_day(JulianDay(2299160.49999)).unwrap());
/// ```
pub fn from_julian_day(jd: JulianDay) -> Result<(i32, u32, u32, u32, u32, u32)> {
    let out_of_range = || Error::DateOutOfRange {
        year: approximate_year(jd),
        min: MIN_YEAR,
        max: MAX_YEAR,
    };
    if !jd.0.is_finite() {
        return Err(out_of_range());
    }
    let shifted = jd.0 + 0.5;
    let mut jdn = shifted.floor();
    let mut secs = ((shifted - jdn) * 86400.0).round() as u32;
    if secs >= 86400 {
        secs -= 86400;
        jdn += 1.0;
    }
    if jdn < f64::from(i32::MIN) || jdn > f64::from(i32::MAX) {
        return Err(out_of_range());
    }
    let date = Date::from_jdn(jdn as i32).ok_or_else(out_of_range)?;
    let (y, m, d) = date.ymd();
    Ok((y, m, d, secs / 3600, secs / 60 % 60, secs % 60))
}

fn approximate_year(jd: JulianDay) -> i32 {
    if jd.0.is_finite() {
        ((jd.0 - J2000) / 365.2425 + 2000.0).floor() as i32
    } else if jd.0 < 0.0 {
        i32::MIN
    } else {
        i32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_to_julian_day() {
        for (std, input) in [
            (2451545.0, (2000, 1, 1, 12, 0, 0)),
            (2451544.5, (2000, 1, 1, 0, 0, 0)),
            (2299160.5, (1582, 10, 15, 0, 0, 0)),
            (2299159.5, (1582, 10, 4, 0, 0, 0)),
            (-0.5, (-4712, 1, 1, 0, 0, 0)),
        ] {
            let (y, m, d, h, mi, s) = input;
            assert_eq!(std, to_julian_day(y, m, d, h, mi, s).unwrap().0);
        }
    }

    #[test]
    fn julian_day_to_civil() {
        for (std, input) in [
            ((2000, 1, 1, 12, 0, 0), 2451545.0),
            ((1999, 12, 31, 23, 59, 59), 2451544.4999885),
            ((2000, 1, 1, 0, 0, 0), 2451544.4999999),
            ((1582, 10, 15, 0, 0, 0), 2299160.5),
            ((1582, 10, 4, 12, 0, 0), 2299160.0),
        ] {
            assert_eq!(std, from_julian_day(JulianDay(input)).unwrap());
        }
    }

    #[test]
    fn round_trip_to_the_second() {
        for (y, m, d, h, mi, s) in [
            (2023, 1, 22, 9, 30, 15),
            (1000, 6, 30, 23, 59, 59),
            (-500, 3, 1, 0, 0, 1),
            (9999, 12, 31, 23, 59, 59),
        ] {
            let jd = to_julian_day(y, m, d, h, mi, s).unwrap();
            assert_eq!((y, m, d, h, mi, s), from_julian_day(jd).unwrap());
        }
    }

    #[test]
    fn out_of_range() {
        assert!(matches!(
            from_julian_day(JulianDay(-10.0)),
            Err(Error::DateOutOfRange { .. })
        ));
        assert!(matches!(
            from_julian_day(JulianDay(f64::NAN)),
            Err(Error::DateOutOfRange { .. })
        ));
        assert!(to_julian_day(2023, 1, 1, 24, 0, 0).is_err());
    }

    #[test]
    fn day_number() {
        assert_eq!(2451545, JulianDay(2451544.5).day_number());
        assert_eq!(2451544, JulianDay(2451544.4999).day_number());
    }
}
