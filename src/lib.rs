//! Conversion between the Gregorian calendar and the Chinese lunisolar
//! calendar, with the sexagenary (stem-branch) labels of years, months, days
//! and double-hours.
//!
//! The lunar calendar is computed from astronomical series rather than read
//! from tables: solar terms and new moons come from an [`Ephemeris`]
//! (the built-in [`Meeus`] by default), and years before 1582-10-15 are
//! reckoned in the Julian calendar.
//!
//! [`Ephemeris`]: chinese::Ephemeris
//! [`Meeus`]: chinese::Meeus
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use nongli::Date;
//!
//! let date = Date::from_ymd(2000, 1, 1).unwrap();
//!
//! assert_eq!(6, date.day_of_week()); // Saturday
//! assert_eq!(2451545, date.jdn());
//! ```
//!
//! Chinese lunisolar calendar, through the shared default engine:
//!
//! ```
//! use nongli::chinese::SectMode;
//!
//! let date = nongli::solar_to_lunar(2023, 1, 22, 0, 0, 0).unwrap();
//! assert_eq!((2023, 1, 1), (date.year(), date.month(), date.day()));
//! assert_eq!(39, nongli::year_pillar(&date, SectMode::default()).index()); // 癸卯
//!
//! let solar = nongli::lunar_to_solar(2023, 1, false, 1, 0, 0, 0).unwrap();
//! assert_eq!("2023-01-22 00:00:00", solar.to_string());
//! ```
//!
//! A [`Calendar`](chinese::Calendar) of your own takes a [`Config`], e.g. for
//! another civil time zone:
//!
//! ```
//! use nongli::Config;
//! use nongli::chinese::Calendar;
//!
//! let calendar = Calendar::with_config(Config::new().with_utc_offset_minutes(540)).unwrap();
//! assert_eq!(540, calendar.config().utc_offset_minutes());
//! assert!(calendar.lunar_year(2023).is_ok());
//! ```

use once_cell::sync::Lazy;

pub mod chinese;
pub mod config;
pub mod date;
pub mod error;
pub mod julian;
pub mod time_scales;

pub use chinese::sexagenary::{day_pillar, hour_pillar, month_pillar, year_pillar};
pub use config::Config;
pub use date::{Date, SolarDate, YearType};
pub use error::{Error, Result};
pub use julian::JulianDay;

use chinese::{Calendar, LunarDate, SolarTermTable};

static DEFAULT: Lazy<Calendar> = Lazy::new(Calendar::new);

/// Converts a civil timestamp (UTC+8) to its lunar date, using the shared
/// default engine.
pub fn solar_to_lunar(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<LunarDate> {
    DEFAULT.solar_to_lunar(year, month, day, hour, minute, second)
}

/// Converts a lunar date and time of day to its civil timestamp (UTC+8),
/// using the shared default engine.
#[allow(clippy::too_many_arguments)]
pub fn lunar_to_solar(
    year: i32,
    month: u32,
    is_leap: bool,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<SolarDate> {
    DEFAULT.lunar_to_solar(year, month, is_leap, day, hour, minute, second)
}

/// The solar-term table of a Gregorian year, using the shared default engine.
pub fn solar_term_table(year: i32) -> Result<SolarTermTable> {
    DEFAULT.solar_term_table(year)
}
