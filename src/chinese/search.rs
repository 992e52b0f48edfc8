//! 四柱反查
//!
//! 給定年、月、日、時四柱，在一段公元年內找出所有相合的時刻。年柱以立春時刻換年，月柱以交節時刻換月，
//! 日柱按所選的晚子時規則。時刻取時辰中的偶數時，子時為 0 時，丑時為 2 時，餘類推。
//!
//! 對每個年柱相合的公元年 Y，自 Y−1 年十二月初一起逐月試探，找到年柱與月柱皆合的首個月初，
//! 退回一個月後逐日試探至多 61 日，首個四柱皆合的時刻即為該年的結果。

use std::ops::RangeInclusive;

use tracing::debug;

use super::calendar::{Calendar, SOLAR_YEARS};
use super::ephemeris::Ephemeris;
use super::lunar::LunarDate;
use super::sexagenary::{self, DayBoundary, FourPillars, Pillar, SectMode};
use crate::date::SolarDate;
use crate::error::Result;

/// 逐月試探的月數
const MONTH_PROBES: u32 = 15;
/// 逐日試探的日數
const DAY_PROBES: i32 = 61;

/// 反查四柱相合的時刻，按時間先後排列。
///
/// `years` 中超出 [`SOLAR_YEARS`] 的部分略去。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{search, Calendar, DayBoundary, SectMode};
///
/// let calendar = Calendar::new();
/// let date = calendar.solar_to_lunar(2023, 5, 17, 10, 0, 0).unwrap();
/// let sect = SectMode::EXACT.with_day_boundary(DayBoundary::LateRatSameDay);
/// let pillars = date.pillars(sect);
///
/// let found = search::solar_from_pillars(&calendar, &pillars, DayBoundary::LateRatSameDay, 1980..=2040)
///     .unwrap();
/// assert_eq!(vec![date.solar()], found);
/// ```
pub fn solar_from_pillars<E: Ephemeris>(
    calendar: &Calendar<E>,
    pillars: &FourPillars,
    day_boundary: DayBoundary,
    years: RangeInclusive<i32>,
) -> Result<Vec<SolarDate>> {
    let sect = SectMode::EXACT.with_day_boundary(day_boundary);
    let hour = pillars.hour.branch() * 2;
    let mut found = Vec::new();
    let first = *years.start().max(SOLAR_YEARS.start());
    let last = *years.end().min(SOLAR_YEARS.end());
    for year in (first..=last).filter(|&y| Pillar::from_year(y) == pillars.year) {
        let Some(month_start) = find_month(calendar, pillars, year, hour)? else {
            continue;
        };
        if let Some(solar) = find_day(calendar, pillars, sect, month_start)? {
            found.push(solar);
        }
    }
    debug!(count = found.len(), %pillars, "pillar search finished");
    Ok(found)
}

/// 首個年柱、月柱皆合的月初所在月的前一個月初。
fn find_month<E: Ephemeris>(
    calendar: &Calendar<E>,
    pillars: &FourPillars,
    year: i32,
    hour: u32,
) -> Result<Option<SolarDate>> {
    let (mut y, mut m) = (year - 1, 12);
    for _ in 0..MONTH_PROBES {
        if let Some(date) = probe(calendar, y, m, 1, hour)?
            && sexagenary::year_pillar(&date, SectMode::EXACT) == pillars.year
            && sexagenary::month_pillar(&date, SectMode::EXACT) == pillars.month
        {
            let (py, pm) = if m == 1 { (y - 1, 12) } else { (y, m - 1) };
            return match probe(calendar, py, pm, 1, hour)? {
                Some(prev) => Ok(Some(prev.solar())),
                None => Ok(Some(date.solar())),
            };
        }
        m += 1;
        if m > 12 {
            m = 1;
            y += 1;
        }
    }
    Ok(None)
}

fn find_day<E: Ephemeris>(
    calendar: &Calendar<E>,
    pillars: &FourPillars,
    sect: SectMode,
    start: SolarDate,
) -> Result<Option<SolarDate>> {
    let mut date = calendar.lunar_date(start)?;
    for _ in 0..DAY_PROBES {
        if FourPillars::of(&date, sect) == *pillars {
            return Ok(Some(date.solar()));
        }
        let next = date.solar().next(1)?;
        if !SOLAR_YEARS.contains(&next.year()) {
            break;
        }
        date = calendar.lunar_date(next)?;
    }
    Ok(None)
}

/// 試探 `y` 年 `m` 月 `d` 日 `hour` 時；公元年超出範圍則返回 `None`。
fn probe<E: Ephemeris>(
    calendar: &Calendar<E>,
    y: i32,
    m: u32,
    d: u32,
    hour: u32,
) -> Result<Option<LunarDate>> {
    if !SOLAR_YEARS.contains(&y) {
        return Ok(None);
    }
    calendar.solar_to_lunar(y, m, d, hour, 0, 0).map(Some)
}
