//! 曆法引擎
//!
//! [`Calendar`] 持有天文曆算、配置與農曆年緩存，公曆與農曆的互換、月份推移及四柱反查均由此進行。

use std::ops::RangeInclusive;
use std::sync::Arc;

use tracing::debug;

use super::cache::YearCache;
use super::ephemeris::{Ephemeris, Meeus};
use super::lunar::LunarDate;
use super::search;
use super::sexagenary::{DayBoundary, FourPillars};
use super::solar_term::SolarTermTable;
use super::year::{LunarMonth, LunarYear};
use crate::config::Config;
use crate::date::{Date, SolarDate};
use crate::error::{Error, Result};

/// 支持換算的公元年
pub const SOLAR_YEARS: RangeInclusive<i32> = 1..=9999;
/// 支持編排的農曆年。農曆 0 年的冬月、臘月可落在公元 1 年初。
pub const LUNAR_YEARS: RangeInclusive<i32> = 0..=9999;

fn check_range(year: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&year) {
        Ok(())
    } else {
        Err(Error::DateOutOfRange {
            year,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// 曆法引擎。
///
/// 農曆年按需編排並緩存，同一年份在並發下只編排一次；引擎可經 `&` 在線程間共享。
///
/// # 用例
///
/// ```
/// use nongli::chinese::Calendar;
///
/// let calendar = Calendar::new();
/// let date = calendar.solar_to_lunar(2017, 7, 23, 8, 0, 0).unwrap();
/// assert_eq!((2017, 6, true, 1), (date.year(), date.month(), date.is_leap(), date.day()));
///
/// let solar = calendar.lunar_to_solar(2017, 6, true, 1, 8, 0, 0).unwrap();
/// assert_eq!(date.solar(), solar);
/// ```
#[derive(Debug)]
pub struct Calendar<E = Meeus> {
    ephemeris: E,
    config: Config,
    cache: YearCache,
}

impl Calendar<Meeus> {
    /// 以內置曆算及默認配置建立引擎。
    pub fn new() -> Self {
        Self::assemble(Meeus, Config::default())
    }

    /// 以內置曆算及給定配置建立引擎。
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_ephemeris(Meeus, config)
    }
}

impl Default for Calendar<Meeus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Ephemeris> Calendar<E> {
    /// 以給定曆算及配置建立引擎，配置不合則返回 [`Error::InvalidConfig`]。
    pub fn with_ephemeris(ephemeris: E, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(ephemeris, config))
    }

    fn assemble(ephemeris: E, config: Config) -> Self {
        debug!(?config, "calendar created");
        Self {
            ephemeris,
            config,
            cache: YearCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }
    /// 農曆年緩存
    pub fn cache(&self) -> &YearCache {
        &self.cache
    }

    /// 取得農曆 `year` 年，必要時編排並緩存。
    pub fn lunar_year(&self, year: i32) -> Result<Arc<LunarYear>> {
        check_range(year, &LUNAR_YEARS)?;
        self.cache.get_or_build(year, || {
            LunarYear::build(year, &self.ephemeris, self.config.utc_offset_minutes())
        })
    }

    /// 公元 `year` 年的節氣表
    ///
    /// ```
    /// use nongli::chinese::{Calendar, SolarTerm};
    ///
    /// let table = Calendar::new().solar_term_table(2017).unwrap();
    /// assert_eq!("2017-02-03", table.term(SolarTerm::LiChun).date().iso());
    /// ```
    pub fn solar_term_table(&self, year: i32) -> Result<SolarTermTable> {
        Ok(self.lunar_year(year)?.solar_terms().clone())
    }

    /// 公曆轉農曆
    pub fn solar_to_lunar(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<LunarDate> {
        self.lunar_date(SolarDate::new(year, month, day, hour, minute, second)?)
    }

    /// 公曆時刻轉農曆
    pub fn lunar_date(&self, solar: SolarDate) -> Result<LunarDate> {
        check_range(solar.year(), &SOLAR_YEARS)?;
        let context = self.lunar_year(solar.year())?;
        let date = solar.date();
        let index = context
            .months()
            .iter()
            .position(|m| m.contains(date))
            .ok_or(Error::DateOutOfRange {
                year: solar.year(),
                min: *SOLAR_YEARS.start(),
                max: *SOLAR_YEARS.end(),
            })?;
        Ok(LunarDate::new(context, index, solar))
    }

    /// 由農曆年月日及時刻構造農曆日期。
    ///
    /// 該月不存在（如無閏之年的閏月）或日數超出該月日數時返回 [`Error::InvalidLunarDate`]；
    /// 對應公曆年超出 [`SOLAR_YEARS`] 時返回 [`Error::DateOutOfRange`]。
    #[allow(clippy::too_many_arguments)]
    pub fn lunar(
        &self,
        year: i32,
        month: u32,
        is_leap: bool,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<LunarDate> {
        let invalid = Error::InvalidLunarDate {
            year,
            month,
            is_leap,
            day,
        };
        let lunar_year = self.lunar_year(year)?;
        let lunar_month = lunar_year.month(month, is_leap).ok_or(invalid.clone())?;
        if !(1..=lunar_month.day_count()).contains(&day) {
            return Err(invalid);
        }
        let date = lunar_month.first_day() + (day as i32 - 1);
        self.lunar_date(SolarDate::from_date(date, hour, minute, second)?)
    }

    /// 農曆轉公曆，錯誤同 [`Calendar::lunar`]。
    #[allow(clippy::too_many_arguments)]
    pub fn lunar_to_solar(
        &self,
        year: i32,
        month: u32,
        is_leap: bool,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<SolarDate> {
        self.lunar(year, month, is_leap, day, hour, minute, second)
            .map(|date| date.solar())
    }

    /// 往後推 `days` 日（可為負），時刻不變。
    pub fn add_days(&self, date: &LunarDate, days: i32) -> Result<LunarDate> {
        self.lunar_date(date.solar().next(days)?)
    }

    /// 自農曆 `year` 年某月起推移 `n` 個月（閏月亦計一月），`n` 可為負。
    ///
    /// ```
    /// use nongli::chinese::Calendar;
    ///
    /// let calendar = Calendar::new();
    /// let month = calendar.month_after(2017, 6, false, 1).unwrap();
    /// assert_eq!((2017, 6, true), (month.year(), month.month(), month.is_leap()));
    /// let month = calendar.month_after(2017, 1, false, -1).unwrap();
    /// assert_eq!((2016, 12, false), (month.year(), month.month(), month.is_leap()));
    /// ```
    pub fn month_after(&self, year: i32, month: u32, is_leap: bool, n: i32) -> Result<LunarMonth> {
        let mut current = *self
            .lunar_year(year)?
            .month(month, is_leap)
            .ok_or(Error::InvalidLunarDate {
                year,
                month,
                is_leap,
                day: 1,
            })?;
        for _ in 0..n.unsigned_abs() {
            let probe = if n > 0 {
                current.first_day() + current.day_count() as i32
            } else {
                current.first_day() + (-1)
            };
            current = self.month_containing(probe)?;
        }
        Ok(current)
    }

    /// 含 `date` 的月，取自其所屬農曆年的月表。
    fn month_containing(&self, date: Date) -> Result<LunarMonth> {
        let year = date.ymd().0;
        let out_of_range = Error::DateOutOfRange {
            year,
            min: *LUNAR_YEARS.start(),
            max: *LUNAR_YEARS.end(),
        };
        let found = *self
            .lunar_year(year)?
            .month_containing(date)
            .ok_or(out_of_range.clone())?;
        self.lunar_year(found.year())?
            .month(found.month(), found.is_leap())
            .copied()
            .ok_or(out_of_range)
    }

    /// 依配置的流派算出四柱。
    pub fn pillars(&self, date: &LunarDate) -> FourPillars {
        date.pillars(self.config.sect())
    }

    /// 在公元 `years` 範圍內反查四柱相合的時刻，見 [`search::solar_from_pillars`]。
    pub fn solar_from_pillars(
        &self,
        pillars: &FourPillars,
        day_boundary: DayBoundary,
        years: RangeInclusive<i32>,
    ) -> Result<Vec<SolarDate>> {
        search::solar_from_pillars(self, pillars, day_boundary, years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::SectMode;

    #[test]
    fn dates() {
        let calendar = Calendar::new();
        let data = [
            ((2016, 11, 29), (2016, 11, false, 1)),
            ((2017, 1, 27), (2016, 12, false, 30)),
            ((2017, 1, 28), (2017, 1, false, 1)),
            ((2017, 7, 22), (2017, 6, false, 29)),
            ((2017, 7, 23), (2017, 6, true, 1)),
            ((2017, 12, 17), (2017, 10, false, 30)),
            ((2017, 12, 18), (2017, 11, false, 1)),
            ((2000, 1, 1), (1999, 11, false, 25)),
        ];
        for ((y, m, d), std) in data {
            let date = calendar.solar_to_lunar(y, m, d, 0, 0, 0).unwrap();
            assert_eq!(std, (date.year(), date.month(), date.is_leap(), date.day()));
        }
    }

    #[test]
    fn invalid_lunar_dates() {
        let calendar = Calendar::new();
        let no_leap = calendar.lunar_to_solar(2023, 3, true, 1, 0, 0, 0);
        assert!(matches!(no_leap, Err(Error::InvalidLunarDate { month: 3, is_leap: true, .. })));
        let year = calendar.lunar_year(2017).unwrap();
        let short = year.months_in_year().find(|m| m.day_count() == 29).unwrap();
        let too_long = calendar.lunar_to_solar(2017, short.month(), short.is_leap(), 30, 0, 0, 0);
        assert!(matches!(too_long, Err(Error::InvalidLunarDate { day: 30, .. })));
        assert!(calendar.lunar_to_solar(2017, 1, false, 0, 0, 0, 0).is_err());
        assert!(matches!(
            calendar.lunar_to_solar(2017, 1, false, 1, 24, 0, 0),
            Err(Error::InvalidCalendarDate { .. })
        ));
    }

    #[test]
    fn ranges() {
        let calendar = Calendar::new();
        assert!(matches!(
            calendar.solar_to_lunar(10000, 1, 1, 0, 0, 0),
            Err(Error::DateOutOfRange { year: 10000, .. })
        ));
        assert!(matches!(
            calendar.solar_to_lunar(0, 6, 1, 0, 0, 0),
            Err(Error::DateOutOfRange { year: 0, .. })
        ));
        assert!(matches!(calendar.lunar_year(-1), Err(Error::DateOutOfRange { .. })));
        assert!(calendar.solar_to_lunar(1, 1, 1, 0, 0, 0).is_ok());
        assert!(calendar.solar_to_lunar(9999, 12, 31, 0, 0, 0).is_ok());
    }

    #[test]
    fn month_navigation() {
        let calendar = Calendar::new();
        let start = calendar.month_after(2017, 1, false, 0).unwrap();
        assert_eq!("2017-01-28", start.first_day().iso());
        let later = calendar.month_after(2017, 1, false, 13).unwrap();
        assert_eq!((2018, 1, false), (later.year(), later.month(), later.is_leap()));
        let back = calendar.month_after(2018, 1, false, -13).unwrap();
        assert_eq!(start, back);
        assert!(calendar.month_after(2023, 3, true, 1).is_err());
    }

    #[test]
    fn caching() {
        let calendar = Calendar::new();
        let a = calendar.lunar_year(2023).unwrap();
        let b = calendar.lunar_year(2023).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(calendar.cache().contains(2023));
    }

    #[test]
    fn config() {
        let config = Config::new().with_utc_offset_minutes(900);
        assert!(matches!(
            Calendar::with_config(config),
            Err(Error::InvalidConfig { field: "utc_offset_minutes", value: 900 })
        ));
        let calendar = Calendar::new();
        assert_eq!(&Config::default(), calendar.config());
        assert!(calendar.config().validate().is_ok());
        assert!(calendar.cache().is_empty());

        let sect = SectMode::EXACT;
        let calendar = Calendar::with_config(Config::new().with_sect(sect)).unwrap();
        let date = calendar.solar_to_lunar(2023, 1, 22, 23, 30, 0).unwrap();
        assert_eq!(date.pillars(sect), calendar.pillars(&date));
    }

    #[test]
    fn add_days() {
        let calendar = Calendar::new();
        let date = calendar.solar_to_lunar(2017, 7, 22, 10, 0, 0).unwrap();
        let next = date.next(1, &calendar).unwrap();
        assert_eq!((6, true, 1), (next.month(), next.is_leap(), next.day()));
        assert_eq!(10, next.hour());
        assert_eq!(date, calendar.add_days(&next, -1).unwrap());
    }
}
