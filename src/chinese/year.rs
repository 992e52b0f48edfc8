//! 農曆年的編排
//!
//! 農曆年 Y 的月表自 Y−1 年十一月（冬至所在月）排起，共 15 個月，必含 Y 年全部月份（平年 12 個，閏年 13 個）。
//!
//! 置閏以「歲」為單位：一歲自冬至所在月起，至下一冬至所在月之前止，有 12 或 13 個月。
//! 月表由兩歲拼成：Y 歲（Y−1 年十一月至 Y 年十月）全部，加 Y+1 歲開頭數月。
//! 相鄰兩年的月表在重疊處取自同一歲，故同一月在兩表中名稱必然一致。
//!
//! 編排步驟：
//!
//! 1. 取 Y 年節氣表（見 [`SolarTermTable`]），記各中氣所在日；
//! 2. 求冬至當日或之前最近的朔日作為歲首，此後以朔望月為步長逐月求朔，得 16 個月首；
//! 3. 以下一歲首在月首中的位置定本歲月數；
//! 4. 十三個月的歲須置閏：先查例外表（見 [`leap`](super::leap)），否則首個不含中氣的月為閏月；
//! 5. 自十一月起依次命名，閏月沿用前月之名。

use tracing::{debug, warn};

use super::ephemeris::{Ephemeris, SYNODIC_MONTH};
use super::leap;
use super::sexagenary::Pillar;
use super::solar_term::SolarTermTable;
use crate::date::{Date, MAX_YEAR, MIN_YEAR};
use crate::error::{Error, Result};
use crate::julian::JulianDay;
use crate::time_scales::{Tt, Ut};

/// 月表長度
const MONTHS_IN_TABLE: usize = 15;
/// 朔望月編號按 `floor((x + 14 − 2451551) / 29.5306)` 取整，換算為 [`Ephemeris::nearest_lunation`] 的四捨五入須減半月。
const LUNATION_OFFSET: f64 = 14.0 - SYNODIC_MONTH / 2.0;

/// 農曆月
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LunarMonth {
    year: i32,
    month: u32,
    is_leap: bool,
    day_count: u32,
    first_day: Date,
    sequence_index: u32,
}

impl LunarMonth {
    /// 所屬農曆年
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 月序號 `1..=12`，無論平閏
    pub fn month(&self) -> u32 {
        self.month
    }
    /// 閏月為 `true`
    pub fn is_leap(&self) -> bool {
        self.is_leap
    }
    /// 帶符號的月序號，閏月為負
    pub fn signed_month(&self) -> i32 {
        let m = self.month as i32;
        if self.is_leap { -m } else { m }
    }
    /// 本月日數，29 或 30
    pub fn day_count(&self) -> u32 {
        self.day_count
    }
    /// 初一
    pub fn first_day(&self) -> Date {
        self.first_day
    }
    /// 初一正午的儒略日
    pub fn first_julian_day(&self) -> JulianDay {
        self.first_day.noon()
    }
    /// 月末日
    pub fn last_day(&self) -> Date {
        self.first_day + (self.day_count as i32 - 1)
    }
    /// 給定日期是否在本月
    pub fn contains(&self, date: Date) -> bool {
        let offset = date - self.first_day;
        offset >= 0 && offset < self.day_count as i32
    }
    /// 月序：正月為 1，其後遞增，閏月亦佔一序；前一年的十一、十二月為 11、12。
    pub fn sequence_index(&self) -> u32 {
        self.sequence_index
    }
    /// 本月干支。月支由月序推得，正月恆為寅；月干依所屬年的年干起寅月。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::Calendar;
    ///
    /// let calendar = Calendar::new();
    /// let year = calendar.lunar_year(2023).unwrap();
    /// let first = year.month(1, false).unwrap();
    /// assert_eq!("甲寅", first.pillar().to_string());
    /// ```
    pub fn pillar(&self) -> Pillar {
        let offset = (Pillar::from_year(self.year).stem() + 1) % 5 * 2;
        let position = self.sequence_index - 1;
        let stem = (position + offset) % 10;
        let branch = (position + 2) % 12;
        Pillar::combine(stem, branch)
    }
    /// 月名，如「閏二月」「冬月」
    pub fn name(&self) -> String {
        super::fmt::month(self.month, self.is_leap)
    }
}

/// 農曆年及其月表，見模塊說明。
///
/// # 用例
///
/// ```
/// use nongli::chinese::Calendar;
///
/// let calendar = Calendar::new();
/// let year = calendar.lunar_year(2017).unwrap();
/// assert_eq!(Some(6), year.leap_month());
/// assert_eq!(13, year.months_in_year().count());
/// ```
#[derive(Debug, Clone)]
pub struct LunarYear {
    year: i32,
    months: Vec<LunarMonth>,
    terms: SolarTermTable,
}

impl LunarYear {
    /// 編排農曆 `year` 年，節氣與朔日取東 `utc_offset_minutes` 分鐘時區的民用日。
    #[tracing::instrument(level = "debug", skip(ephemeris))]
    pub fn build<E>(year: i32, ephemeris: &E, utc_offset_minutes: i32) -> Result<Self>
    where
        E: Ephemeris + ?Sized,
    {
        let terms = SolarTermTable::build(year, ephemeris, utc_offset_minutes)?;
        // 表中第 1 項為前一年冬至，其後每隔一項為中氣
        let qi_days: Vec<i64> = terms
            .entries()
            .iter()
            .skip(1)
            .step_by(2)
            .map(|e| e.julian_day().day_number())
            .collect();
        let lunations = Lunations {
            ephemeris,
            utc_offset_minutes,
        };

        let start = lunations.sui_start(year)?;
        let starts = (0..=MONTHS_IN_TABLE)
            .map(|i| lunations.day(start as f64 + SYNODIC_MONTH * i as f64))
            .collect::<Result<Vec<_>>>()?;
        let end = lunations.sui_start(year + 1)?;
        let len = starts
            .iter()
            .position(|&d| d == end)
            .filter(|n| SUI_LENGTHS.contains(n))
            .ok_or_else(|| {
                Error::EphemerisUnavailable(format!(
                    "lunar year {year}: next winter-solstice month not found among the new moons"
                ))
            })?;
        let next_len = months_between(end, lunations.sui_start(year + 2)?);
        if len != 13 && leap::leap_override(year).is_some() {
            warn!(year, "leap exception ignored: only 12 months between winter solstices");
        }

        // 月表中閏月的下標：本歲一個，下一歲開頭若有閏月亦計入
        let leaps = [
            leap_in_sui(year, len, &starts, &qi_days[..=12]),
            leap_in_sui(year + 1, next_len, &starts[len..], &qi_days[12..])
                .map(|i| len + i)
                .filter(|&i| i < MONTHS_IN_TABLE),
        ];

        let mut months = Vec::with_capacity(MONTHS_IN_TABLE);
        let (mut y, mut m, mut index) = (year - 1, 11, 11);
        for i in 0..MONTHS_IN_TABLE {
            months.push(LunarMonth {
                year: y,
                month: m,
                is_leap: leaps.contains(&Some(i)),
                day_count: (starts[i + 1] - starts[i]) as u32,
                first_day: date_of(starts[i], year)?,
                sequence_index: index,
            });
            if !leaps.contains(&Some(i + 1)) {
                m += 1;
            }
            index += 1;
            if m == 13 {
                m = 1;
                index = 1;
                y += 1;
            }
        }

        let built = Self {
            year,
            months,
            terms,
        };
        debug!(
            year,
            leap_month = ?built.leap_month(),
            months = built.months_in_year().count(),
            "built lunar year"
        );
        if !built.is_curated() {
            warn!(
                year,
                "leap month placed by the astronomical rule only, outside the curated years"
            );
        }
        Ok(built)
    }

    /// 農曆年
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 年干支（正月初一換年）
    pub fn pillar(&self) -> Pillar {
        Pillar::from_year(self.year)
    }
    /// 月表全部 15 個月，含前一年十一、十二月及次年首月
    pub fn months(&self) -> &[LunarMonth] {
        &self.months
    }
    /// 屬於本年的月份，12 或 13 個
    pub fn months_in_year(&self) -> impl Iterator<Item = &LunarMonth> {
        self.months.iter().filter(move |m| m.year == self.year)
    }
    /// 本年閏幾月，無閏則為 `None`
    pub fn leap_month(&self) -> Option<u32> {
        self.months_in_year().find(|m| m.is_leap).map(|m| m.month)
    }
    /// 本年日數
    pub fn day_count(&self) -> u32 {
        self.months_in_year().map(|m| m.day_count).sum()
    }
    /// 取本年某月
    pub fn month(&self, month: u32, is_leap: bool) -> Option<&LunarMonth> {
        self.months_in_year()
            .find(|m| m.month == month && m.is_leap == is_leap)
    }
    /// 月表中含給定日期的月，可屬前一年
    pub fn month_containing(&self, date: Date) -> Option<&LunarMonth> {
        self.months.iter().find(|m| m.contains(date))
    }
    /// 與本年同數的公元年的節氣表
    pub fn solar_terms(&self) -> &SolarTermTable {
        &self.terms
    }
    /// 置閏是否在例外表覆蓋範圍內；範圍外純按規則置閏，與史曆或有出入。
    pub fn is_curated(&self) -> bool {
        leap::CURATED_YEARS.contains(&self.year)
    }
}

/// 一歲的月數
const SUI_LENGTHS: std::ops::RangeInclusive<usize> = 12..=13;

/// 逐月求朔，取其民用日。
struct Lunations<'a, E: ?Sized> {
    ephemeris: &'a E,
    utc_offset_minutes: i32,
}

impl<E: Ephemeris + ?Sized> Lunations<'_, E> {
    fn local_day(&self, tt: Tt) -> i64 {
        Ut::from(tt).to_local(self.utc_offset_minutes).day_number()
    }

    /// 距 `x` 日最近之朔所在日
    fn day(&self, x: f64) -> Result<i64> {
        let tt = self.ephemeris.nearest_lunation(Tt(x + LUNATION_OFFSET))?;
        Ok(self.local_day(tt))
    }

    /// `year − 1` 年冬至所在日
    fn winter_solstice(&self, year: i32) -> Result<i64> {
        let tt = self.ephemeris.solar_longitude_crossing(18, f64::from(year))?;
        Ok(self.local_day(tt))
    }

    /// `year − 1` 年冬至當日或之前最近的朔日，不計例外
    fn solstice_month(&self, year: i32) -> Result<i64> {
        let solstice = self.winter_solstice(year)?;
        let nearest = self.day(solstice as f64)?;
        if nearest > solstice {
            self.day(nearest as f64 - SYNODIC_MONTH)
        } else {
            Ok(nearest)
        }
    }

    /// `year` 歲之首，即 `year − 1` 年十一月初一。
    ///
    /// 對任一 `year` 結果唯一，前一歲之末與本歲之首由此必然相接。
    fn sui_start(&self, year: i32) -> Result<i64> {
        let solstice = self.winter_solstice(year)?;
        let nearest = self.day(solstice as f64)?;
        let mut start = if nearest <= solstice {
            nearest
        } else if self.keeps_seed(year, nearest)? {
            nearest
        } else {
            self.day(nearest as f64 - SYNODIC_MONTH)?
        };
        if self.boundary_shift(year)? == Some(Shift::Earlier) {
            start = self.day(start as f64 - SYNODIC_MONTH)?;
        }
        if self.boundary_shift(year - 1)? == Some(Shift::Later) {
            start = self.day(start as f64 + SYNODIC_MONTH)?;
        }
        Ok(start)
    }

    /// 首朔例外：保留冬至後之朔，須令前後兩歲仍各為 12 或 13 個月。
    fn keeps_seed(&self, year: i32, nearest: i64) -> Result<bool> {
        if !leap::keeps_seed(year) {
            return Ok(false);
        }
        let before = months_between(self.solstice_month(year - 1)?, nearest);
        let after = months_between(nearest, self.solstice_month(year + 1)?);
        let keeps = SUI_LENGTHS.contains(&before) && SUI_LENGTHS.contains(&after);
        if !keeps {
            debug!(year, before, after, "seed exception not applicable");
        }
        Ok(keeps)
    }

    /// 例外表記有閏月而按曆表只有 12 個月的歲，須自相鄰的十三個月之歲借入一月。
    ///
    /// 表中年份相隔至少三年，各歲的挪動互不重疊。
    fn boundary_shift(&self, year: i32) -> Result<Option<Shift>> {
        if leap::leap_override(year).is_none() {
            return Ok(None);
        }
        let start = self.solstice_month(year)?;
        let end = self.solstice_month(year + 1)?;
        if months_between(start, end) != 12 {
            return Ok(None);
        }
        let shift = if months_between(self.solstice_month(year - 1)?, start) == 13 {
            Some(Shift::Earlier)
        } else if months_between(end, self.solstice_month(year + 2)?) == 13 {
            Some(Shift::Later)
        } else {
            None
        };
        if let Some(shift) = shift {
            debug!(year, ?shift, "winter-solstice month moved for a leap exception");
        }
        Ok(shift)
    }
}

/// 挪動歲首或歲末以容納例外表所記的閏月
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Shift {
    /// 歲首提前一月
    Earlier,
    /// 歲末推後一月
    Later,
}

/// 兩朔日之間相隔的月數
fn months_between(from: i64, to: i64) -> usize {
    ((to - from) as f64 / SYNODIC_MONTH).round() as usize
}

/// 歲中閏月的位置，冬至所在月為 0。
///
/// `starts[i]` 為歲中第 `i` 月首日，`qi_days[k]` 為冬至後第 `k` 個中氣所在日；二者可只給開頭數項，
/// 此時只能判定開頭數月。十二個月的歲不置閏。
fn leap_in_sui(year: i32, len: usize, starts: &[i64], qi_days: &[i64]) -> Option<usize> {
    if len != 13 {
        return None;
    }
    if let Some(i) = leap::leap_override(year) {
        return Some(i);
    }
    let no_qi = |i: usize| match (starts.get(i + 1), qi_days.get(i)) {
        (Some(&next), Some(&qi)) => next <= qi,
        _ => false,
    };
    // 十三個月而每月皆有中氣，只在首朔例外時出現，閏在歲末
    (1..len).find(|&i| no_qi(i)).or(Some(len - 1))
}

fn date_of(jdn: i64, year: i32) -> Result<Date> {
    i32::try_from(jdn)
        .ok()
        .and_then(Date::from_jdn)
        .ok_or(Error::DateOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::ephemeris::Meeus;

    fn build(year: i32) -> LunarYear {
        LunarYear::build(year, &Meeus, 480).unwrap()
    }

    #[test]
    fn months() {
        let year = build(2000);
        let stds = [
            (11, "1999-12-08"),
            (12, "2000-01-07"),
            (1, "2000-02-05"),
            (2, "2000-03-06"),
            (3, "2000-04-05"),
            (4, "2000-05-04"),
            (5, "2000-06-02"),
            (6, "2000-07-02"),
            (7, "2000-07-31"),
            (8, "2000-08-29"),
            (9, "2000-09-28"),
            (10, "2000-10-27"),
            (11, "2000-11-26"),
        ];
        for (std, month) in stds.iter().zip(year.months()) {
            assert_eq!((std.0, false), (month.month(), month.is_leap()));
            assert_eq!(std.1, month.first_day().iso());
        }
        assert_eq!(None, year.leap_month());
        assert_eq!(12, year.months_in_year().count());
    }

    #[test]
    fn leap_months() {
        let stds = [
            (11, "2016-11-29"),
            (12, "2016-12-29"),
            (1, "2017-01-28"),
            (2, "2017-02-26"),
            (3, "2017-03-28"),
            (4, "2017-04-26"),
            (5, "2017-05-26"),
            (6, "2017-06-24"),
            (-6, "2017-07-23"),
            (7, "2017-08-22"),
            (8, "2017-09-20"),
            (9, "2017-10-20"),
            (10, "2017-11-18"),
            (11, "2017-12-18"),
        ];
        let year = build(2017);
        for (std, month) in stds.iter().zip(year.months()) {
            assert_eq!(
                (std.0, std.1.to_owned()),
                (month.signed_month(), month.first_day().iso())
            );
        }
        assert_eq!(Some(6), year.leap_month());
        assert_eq!(1, year.months().iter().filter(|m| m.is_leap()).count());
    }

    #[test]
    fn sequence_index() {
        let year = build(2017);
        let indices: Vec<u32> = year.months().iter().map(|m| m.sequence_index()).collect();
        assert_eq!(vec![11, 12, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13], indices);
        let leap = year.month(6, true).unwrap();
        assert_eq!("戊申", leap.pillar().to_string());
    }

    #[test]
    fn day_counts() {
        for y in [1900, 1984, 2000, 2017, 2023, 2033, 2100] {
            let year = build(y);
            let total = year.day_count();
            match year.leap_month() {
                Some(_) => assert!((383..=385).contains(&total), "{y}: {total}"),
                None => assert!((353..=355).contains(&total), "{y}: {total}"),
            }
            for m in year.months() {
                assert!((29..=30).contains(&m.day_count()));
            }
            assert!(year.months().windows(2).all(|w| w[0].last_day() + 1 == w[1].first_day()));
        }
    }

    #[test]
    fn leap_from_table() {
        // 2033 年閏十一月，定於例外表
        let year = build(2033);
        assert_eq!(Some(11), year.leap_month());
        assert!(year.month(11, true).is_some());
        let next = build(2034);
        assert_eq!(None, next.leap_month());
        assert!(next.months()[1].is_leap());
        assert_eq!((2033, 11), (next.months()[1].year(), next.months()[1].month()));
    }

    #[test]
    fn adjacent_tables_agree() {
        for y in [41, 192, 193, 288, 345, 391, 470, 918, 1013, 1033, 1498, 1499, 1500, 2033, 9049] {
            let (this, next) = (build(y), build(y + 1));
            let overlap: Vec<_> = this
                .months()
                .iter()
                .filter(|m| next.months().iter().any(|n| n.first_day() == m.first_day()))
                .collect();
            assert!(overlap.len() >= 2, "{y}");
            for m in overlap {
                let n = next.month_containing(m.first_day()).unwrap();
                assert_eq!(
                    (m.year(), m.signed_month(), m.day_count()),
                    (n.year(), n.signed_month(), n.day_count()),
                    "{y}: {}",
                    m.first_day()
                );
            }
            assert_eq!(this.months()[0].year(), y - 1);
            assert!(this.months_in_year().count() >= 12, "{y}");
            assert_eq!(next.months()[0].first_day(), this.month(11, false).unwrap().first_day());
        }
    }

    #[test]
    fn curated_range() {
        assert!(build(2023).is_curated());
        assert!(!build(20).is_curated());
    }
}
