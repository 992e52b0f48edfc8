//! 農曆日期

use std::fmt;
use std::sync::Arc;

use super::calendar::Calendar;
use super::ephemeris::Ephemeris;
use super::sexagenary::{self, FourPillars, Pillar, SectMode};
use super::solar_term::{SolarTermInstant, SolarTermTable, TermFilter, TermPrecision};
use super::year::{LunarMonth, LunarYear};
use crate::date::SolarDate;
use crate::error::Result;

/// 農曆日期，連同其公曆時刻。
///
/// 由 [`Calendar`] 產生。所攜月表與節氣表屬於公曆時刻所在的公元年，供干支與節氣推算之用。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{Calendar, SectMode, YearStart};
///
/// let calendar = Calendar::new();
/// let date = calendar.solar_to_lunar(2023, 1, 22, 12, 0, 0).unwrap();
/// assert_eq!((2023, 1, false, 1), (date.year(), date.month(), date.is_leap(), date.day()));
/// assert_eq!("2023年正月初一", date.to_string());
/// assert_eq!("癸卯", date.year_pillar(SectMode::default()).to_string());
///
/// let spring = SectMode::default().with_year_start(YearStart::SpringBeginsDay);
/// assert_eq!("壬寅", date.year_pillar(spring).to_string());
/// ```
#[derive(Debug, Clone)]
pub struct LunarDate {
    year: i32,
    month: u32,
    is_leap: bool,
    day: u32,
    solar: SolarDate,
    context: Arc<LunarYear>,
    month_index: usize,
}

impl LunarDate {
    /// `context` 須為 `solar` 所在公元年的農曆年，`month_index` 為其月表中含 `solar` 的月。
    pub(crate) fn new(context: Arc<LunarYear>, month_index: usize, solar: SolarDate) -> Self {
        let month = context.months()[month_index];
        Self {
            year: month.year(),
            month: month.month(),
            is_leap: month.is_leap(),
            day: (solar.date() - month.first_day()) as u32 + 1,
            solar,
            context,
            month_index,
        }
    }

    /// 農曆年
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 月序號 `1..=12`
    pub fn month(&self) -> u32 {
        self.month
    }
    pub fn is_leap(&self) -> bool {
        self.is_leap
    }
    /// 帶符號的月序號，閏月為負
    pub fn signed_month(&self) -> i32 {
        self.lunar_month().signed_month()
    }
    /// 日 `1..=30`
    pub fn day(&self) -> u32 {
        self.day
    }
    pub fn hour(&self) -> u32 {
        self.solar.hour()
    }
    pub fn minute(&self) -> u32 {
        self.solar.minute()
    }
    pub fn second(&self) -> u32 {
        self.solar.second()
    }
    /// 對應的公曆時刻
    pub fn solar(&self) -> SolarDate {
        self.solar
    }
    /// 所在農曆月，取自公曆年的月表
    pub fn lunar_month(&self) -> &LunarMonth {
        &self.context.months()[self.month_index]
    }
    /// 公曆時刻所在公元年的節氣表
    pub fn solar_terms(&self) -> &SolarTermTable {
        self.context.solar_terms()
    }

    /// 年柱，見 [`sexagenary::year_pillar`]。
    pub fn year_pillar(&self, sect: SectMode) -> Pillar {
        sexagenary::year_pillar(self, sect)
    }
    /// 月柱（以節換月），見 [`sexagenary::month_pillar`]。
    pub fn month_pillar(&self, sect: SectMode) -> Pillar {
        sexagenary::month_pillar(self, sect)
    }
    /// 日柱
    pub fn day_pillar(&self, sect: SectMode) -> Pillar {
        sexagenary::day_pillar(self, sect)
    }
    /// 時柱
    pub fn hour_pillar(&self) -> Pillar {
        sexagenary::hour_pillar(self)
    }
    /// 四柱
    pub fn pillars(&self, sect: SectMode) -> FourPillars {
        FourPillars::of(self, sect)
    }

    /// 當日所交節氣
    pub fn solar_term(&self) -> Option<&SolarTermInstant> {
        self.solar_terms().term_on(self.solar.date(), TermFilter::Any)
    }
    /// 此刻之前（含同刻）最近的節氣
    pub fn prev_term(&self, filter: TermFilter) -> Option<&SolarTermInstant> {
        self.solar_terms()
            .prev_term(&self.solar, filter, TermPrecision::Instant)
    }
    /// 此刻之後（含同刻）最近的節氣
    pub fn next_term(&self, filter: TermFilter) -> Option<&SolarTermInstant> {
        self.solar_terms()
            .next_term(&self.solar, filter, TermPrecision::Instant)
    }
    /// 前一個節氣及交節至今的日數，交節當日為 0。
    ///
    /// ```
    /// use nongli::chinese::{Calendar, SolarTerm, TermFilter};
    ///
    /// let calendar = Calendar::new();
    /// let date = calendar.solar_to_lunar(2017, 2, 10, 0, 0, 0).unwrap();
    /// let (term, days) = date.days_since_term(TermFilter::Any).unwrap();
    /// assert_eq!((SolarTerm::LiChun, 7), (term.term(), days));
    /// ```
    pub fn days_since_term(&self, filter: TermFilter) -> Option<(&SolarTermInstant, i32)> {
        self.solar_terms()
            .days_since_term(self.solar.date(), filter)
    }

    /// 往後推 `days` 日（可為負），時刻不變。
    pub fn next<E: Ephemeris>(&self, days: i32, calendar: &Calendar<E>) -> Result<LunarDate> {
        calendar.add_days(self, days)
    }
}

impl PartialEq for LunarDate {
    fn eq(&self, other: &Self) -> bool {
        (self.year, self.month, self.is_leap, self.day, self.solar)
            == (other.year, other.month, other.is_leap, other.day, other.solar)
    }
}

impl Eq for LunarDate {}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}年{}{}",
            self.year,
            super::fmt::month(self.month, self.is_leap),
            super::fmt::day(self.day)
        )
    }
}
