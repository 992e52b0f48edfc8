//! Calendar-independant date, and the civil timestamp built on top of it.
//!
//! Dates before 1582-10-15 are read in the Julian calendar, dates from then
//! on in the Gregorian calendar; the ten days 1582-10-05..=1582-10-14 do not
//! exist.

use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Error, Result};
use crate::julian::{self, JulianDay};

/// Julian day number of 1582-10-15, the first Gregorian date.
pub const CUTOVER_JDN: i32 = 2299161;

/// Earliest supported year (astronomical numbering, 4713 BC).
pub const MIN_YEAR: i32 = -4712;
/// Latest supported year.
pub const MAX_YEAR: i32 = 10000;

const MIN_JDN: i32 = 0;
const MAX_JDN: i32 = 5373850;

/// A calendar-independant date.
///
/// Supported range is January 1, 4713 BC (proleptic Julian calendar) through
/// December 31, 10000.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Date {
    jdn: i32,
}

impl Date {
    /// Creates a `Date` with a Julian day number (JDN).
    ///
    /// Returns `None` if the day number is out of supported range.
    pub fn from_jdn(jdn: i32) -> Option<Self> {
        (MIN_JDN..=MAX_JDN).contains(&jdn).then_some(Self { jdn })
    }
    /// Returns the Julian day number (JDN) of the date.
    pub fn jdn(&self) -> i32 {
        self.jdn
    }

    /// Creates a `Date` from a civil date, Julian calendar before the 1582
    /// reform and Gregorian from 1582-10-15 on.
    ///
    /// `year` should be an astronomical year number, i.e. 1 BC is `0`, 2
    /// BC is `-1`, etc.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// let date = Date::from_ymd(2000, 1, 1).unwrap();
    /// assert_eq!(2451545, date.jdn());
    ///
    /// let last_julian = Date::from_ymd(1582, 10, 4).unwrap();
    /// let first_gregorian = Date::from_ymd(1582, 10, 15).unwrap();
    /// assert_eq!(1, first_gregorian - last_julian);
    /// assert!(Date::from_ymd(1582, 10, 10).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        let invalid = || Error::calendar_date((year, month, day), (0, 0, 0));
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || day < 1
            || day > days_in_month(year, month)
        {
            return Err(invalid());
        }
        if year == 1582 && month == 10 && (5..=14).contains(&day) {
            return Err(invalid());
        }
        let (y, m, d) = (i64::from(year), i64::from(month), i64::from(day));
        let a = (14 - m) / 12;
        let y = y + 4800 - a;
        let m = m + 12 * a - 3;
        let base = d + (153 * m + 2) / 5 + 365 * y + y / 4;
        let jdn = if is_julian(year, month, day) {
            base - 32083
        } else {
            base - y / 100 + y / 400 - 32045
        };
        i32::try_from(jdn)
            .ok()
            .and_then(Self::from_jdn)
            .ok_or_else(invalid)
    }
    /// Represents the date as a civil date, in `(year, month, day)` format.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// let date = Date::from_jdn(2451545).unwrap();
    /// assert_eq!((2000, 1, 1), date.ymd());
    /// let date = Date::from_jdn(2299160).unwrap();
    /// assert_eq!((1582, 10, 4), date.ymd());
    /// ```
    pub fn ymd(&self) -> (i32, u32, u32) {
        let jdn = i64::from(self.jdn);
        let f = if self.jdn >= CUTOVER_JDN {
            jdn + 1401 + (((4 * jdn + 274277) / 146097) * 3) / 4 - 38
        } else {
            jdn + 1401
        };
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        (year as i32, month as u32, day as u32)
    }
    /// Formats the date in ISO 8601 format.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// let date = Date::from_ymd(2000, 1, 1).unwrap();
    /// assert_eq!("2000-01-01", date.iso());
    /// ```
    pub fn iso(&self) -> String {
        let (y, m, d) = self.ymd();
        format!("{:04}-{:02}-{:02}", y, m, d)
    }

    /// Returns the day of week of the date, in ISO-8601 numbering (i.e.
    /// `1..=7` for Monday through Sunday)
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// let date = Date::from_ymd(2000, 1, 1).unwrap();
    /// assert_eq!(6, date.day_of_week()); // Saturday
    /// ```
    pub fn day_of_week(&self) -> u32 {
        self.jdn.rem_euclid(7) as u32 + 1
    }
    /// Returns the index of the date in the sexagenary day cycle, numbered
    /// from 0 (甲子) to 59 (癸亥).
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// let date = Date::from_ymd(2000, 1, 1).unwrap();
    /// assert_eq!(54, date.sexagenary()); // 戊午
    /// ```
    pub fn sexagenary(&self) -> u32 {
        (self.jdn - 11).rem_euclid(60) as u32
    }

    /// Returns the Julian Day of local noon of the date.
    pub fn noon(&self) -> JulianDay {
        JulianDay(f64::from(self.jdn))
    }

    /// Adds `days` days, returning `None` when leaving the supported range.
    pub fn checked_add(self, days: i32) -> Option<Self> {
        self.jdn.checked_add(days).and_then(Self::from_jdn)
    }
}

impl Add<i32> for Date {
    type Output = Date;
    /// # Panics
    ///
    /// Panics when the result leaves the supported range; use
    /// [`Date::checked_add`] to handle that case.
    fn add(self, rhs: i32) -> Self::Output {
        match self.checked_add(rhs) {
            Some(date) => date,
            None => panic!("date out of range: JDN {} + {}", self.jdn, rhs),
        }
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn - rhs.jdn
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso())
    }
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year, applying the Julian rule before
    /// 1582 and the Gregorian rule from 1582 on.
    pub fn from_year(year: i32) -> Self {
        if year < 1582 {
            Self::julian(year)
        } else {
            Self::gregorian(year)
        }
    }
    /// Determines if `year` is a leap year in Gregorian calendar.
    pub fn gregorian(year: i32) -> Self {
        if year % 4 == 0 && year % 100 != 0 || year % 400 == 0 {
            Self::Leap
        } else {
            Self::Common
        }
    }
    /// Determines if `year` is a leap year in Julian calendar.
    pub fn julian(year: i32) -> Self {
        if year.rem_euclid(4) == 0 {
            Self::Leap
        } else {
            Self::Common
        }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
}

/// Number of days in a civil month, `0` for a month outside `1..=12`.
///
/// October 1582 is reported with its nominal 31 days; the reform gap is
/// rejected separately by [`Date::from_ymd`].
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 28 + YearType::from_year(year).is_leap() as u32,
        _ => 0,
    }
}

fn is_julian(year: i32, month: u32, day: u32) -> bool {
    (year, month, day) < (1582, 10, 15)
}

/// A civil timestamp with second precision.
///
/// Fields are validated on construction, so ordering by fields is
/// chronological ordering.
///
/// # Example
///
/// ```
/// use nongli::SolarDate;
///
/// let solar = SolarDate::new(2023, 1, 22, 9, 30, 0).unwrap();
/// assert_eq!("2023-01-22 09:30:00", solar.to_string());
/// assert_eq!(solar, SolarDate::from_julian_day(solar.julian_day()).unwrap());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SolarDate {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl SolarDate {
    /// Creates a validated timestamp.
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Result<Self> {
        Date::from_ymd(year, month, day)
            .map_err(|_| Error::calendar_date((year, month, day), (hour, minute, second)))?;
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::calendar_date((year, month, day), (hour, minute, second)));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }
    /// Creates a timestamp at midnight.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        Self::new(year, month, day, 0, 0, 0)
    }
    /// Creates a timestamp from a [`Date`] and a time of day.
    pub fn from_date(date: Date, hour: u32, minute: u32, second: u32) -> Result<Self> {
        let (y, m, d) = date.ymd();
        Self::new(y, m, d, hour, minute, second)
    }
    /// Converts a Julian Day back into a timestamp, rounded to the second.
    pub fn from_julian_day(jd: JulianDay) -> Result<Self> {
        let (y, m, d, h, mi, s) = julian::from_julian_day(jd)?;
        Ok(Self {
            year: y,
            month: m,
            day: d,
            hour: h,
            minute: mi,
            second: s,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }
    pub fn month(&self) -> u32 {
        self.month
    }
    pub fn day(&self) -> u32 {
        self.day
    }
    pub fn hour(&self) -> u32 {
        self.hour
    }
    pub fn minute(&self) -> u32 {
        self.minute
    }
    pub fn second(&self) -> u32 {
        self.second
    }

    /// The calendar day of the timestamp.
    pub fn date(&self) -> Date {
        // Fields were validated on construction.
        match Date::from_ymd(self.year, self.month, self.day) {
            Ok(date) => date,
            Err(e) => unreachable!("validated SolarDate rejected: {e}"),
        }
    }
    /// The Julian Day of the timestamp (noon = `.0`).
    pub fn julian_day(&self) -> JulianDay {
        let secs = self.hour * 3600 + self.minute * 60 + self.second;
        JulianDay(f64::from(self.date().jdn()) - 0.5 + f64::from(secs) / 86400.0)
    }
    /// Whether the timestamp's year is a leap year.
    pub fn is_leap_year(&self) -> bool {
        YearType::from_year(self.year).is_leap()
    }
    /// Number of days in the timestamp's month.
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month)
    }
    /// Moves the timestamp by whole days, keeping the time of day.
    ///
    /// ```
    /// use nongli::SolarDate;
    ///
    /// let solar = SolarDate::new(1582, 10, 4, 8, 0, 0).unwrap();
    /// assert_eq!("1582-10-15 08:00:00", solar.next(1).unwrap().to_string());
    /// ```
    pub fn next(&self, days: i32) -> Result<Self> {
        let date = self.date().checked_add(days).ok_or(Error::DateOutOfRange {
            year: self.year.saturating_add(days / 365),
            min: MIN_YEAR,
            max: MAX_YEAR,
        })?;
        Self::from_date(date, self.hour, self.minute, self.second)
    }
    /// Number of calendar days from `other` to `self`, ignoring time of day.
    pub fn days_since(&self, other: &SolarDate) -> i32 {
        self.date() - other.date()
    }
}

impl fmt::Display for SolarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
