//! Error type shared by every fallible operation of the crate.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all fallible operations in the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A civil date or time field is out of its nominal range, or the date
    /// falls inside the 1582 Gregorian reform gap (October 5..=14).
    #[error("invalid calendar date {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")]
    InvalidCalendarDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },

    /// The lunar month, leap flag or day does not exist in that lunar year.
    #[error("invalid lunar date: year {year} {}month {month} day {day}", leap_prefix(.is_leap))]
    InvalidLunarDate {
        year: i32,
        month: u32,
        is_leap: bool,
        day: u32,
    },

    /// The year lies outside the range the engine supports.
    #[error("year {year} is outside the supported range {min}..={max}")]
    DateOutOfRange { year: i32, min: i32, max: i32 },

    /// The astronomical provider failed to produce an instant.
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    /// A configuration value was rejected by [`Config::validate`](crate::Config::validate).
    #[error("invalid configuration: {field} = {value}")]
    InvalidConfig { field: &'static str, value: i64 },
}

fn leap_prefix(is_leap: &bool) -> &'static str {
    if *is_leap { "leap " } else { "" }
}

impl Error {
    pub(crate) fn calendar_date(
        (year, month, day): (i32, u32, u32),
        (hour, minute, second): (u32, u32, u32),
    ) -> Self {
        Error::InvalidCalendarDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_date_message() {
        let e = Error::calendar_date((1582, 10, 10), (0, 0, 0));
        assert_eq!(e.to_string(), "invalid calendar date 1582-10-10 00:00:00");
    }

    #[test]
    fn lunar_date_message() {
        let e = Error::InvalidLunarDate {
            year: 2023,
            month: 3,
            is_leap: true,
            day: 1,
        };
        assert_eq!(e.to_string(), "invalid lunar date: year 2023 leap month 3 day 1");
        let e = Error::InvalidLunarDate {
            year: 2023,
            month: 1,
            is_leap: false,
            day: 30,
        };
        assert_eq!(e.to_string(), "invalid lunar date: year 2023 month 1 day 30");
    }

    #[test]
    fn out_of_range_message() {
        let e = Error::DateOutOfRange {
            year: 10000,
            min: 1,
            max: 9999,
        };
        assert_eq!(e.to_string(), "year 10000 is outside the supported range 1..=9999");
    }

    #[test]
    fn error_is_send_sync_static() {
        fn assert_impl<T: std::error::Error + Send + Sync + 'static>() {}
        assert_impl::<Error>();
    }
}
