//! Configuration for a [`Calendar`](crate::chinese::Calendar) engine.

use crate::chinese::SectMode;
use crate::error::{Error, Result};

/// UTC offset of China Standard Time, in minutes.
pub const CHINA_STANDARD_TIME: i32 = 480;

/// Configuration for a calendar engine.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use nongli::Config;
/// use nongli::chinese::{DayBoundary, SectMode};
///
/// let config = Config::new()
///     .with_utc_offset_minutes(540)
///     .with_sect(SectMode::default().with_day_boundary(DayBoundary::LateRatNextDay));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Civil time zone in which astronomical instants become dates.
    utc_offset_minutes: i32,
    /// Sect used where a caller does not pass one.
    sect: SectMode,
}

impl Config {
    /// Creates a configuration with the defaults.
    ///
    /// Defaults: `utc_offset_minutes = 480` (UTC+8), `sect = SectMode::default()`.
    pub fn new() -> Self {
        Self {
            utc_offset_minutes: CHINA_STANDARD_TIME,
            sect: SectMode::default(),
        }
    }

    /// Sets the civil UTC offset, in minutes east of Greenwich.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Sets the default sect.
    pub fn with_sect(mut self, sect: SectMode) -> Self {
        self.sect = sect;
        self
    }

    /// Returns the civil UTC offset in minutes.
    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    /// Returns the default sect.
    pub fn sect(&self) -> SectMode {
        self.sect
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the UTC offset is outside `-720..=840`.
    pub fn validate(&self) -> Result<()> {
        if !(-720..=840).contains(&self.utc_offset_minutes) {
            return Err(Error::InvalidConfig {
                field: "utc_offset_minutes",
                value: i64::from(self.utc_offset_minutes),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::{MonthAnchor, YearStart};

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.utc_offset_minutes(), 480);
        assert_eq!(cfg.sect(), SectMode::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let sect = SectMode::default()
            .with_year_start(YearStart::SpringBeginsInstant)
            .with_month_anchor(MonthAnchor::NodeInstant);
        let cfg = Config::new().with_utc_offset_minutes(-300).with_sect(sect);
        assert_eq!(cfg.utc_offset_minutes(), -300);
        assert_eq!(cfg.sect(), sect);
    }

    #[test]
    fn test_invalid_offset() {
        for minutes in [-721, 841, i32::MAX] {
            let err = Config::new()
                .with_utc_offset_minutes(minutes)
                .validate()
                .unwrap_err();
            assert_eq!(
                err,
                Error::InvalidConfig {
                    field: "utc_offset_minutes",
                    value: i64::from(minutes),
                }
            );
        }
        assert!(Config::new().with_utc_offset_minutes(840).validate().is_ok());
        assert!(Config::new().with_utc_offset_minutes(-720).validate().is_ok());
    }
}
