//! 干支
//!
//! 年、月、日、時四柱各為六十甲子中的一項，以序號 `0..60` 表示，`0` 為甲子。
//! 干序號為 `序號 mod 10`，支序號為 `序號 mod 12`。
//!
//! 各家對年、月、日之交界有不同主張，以 [`SectMode`] 選擇：
//!
//! - 年柱：以正月初一（[`YearStart::LunarNewYear`]）、立春當日（[`YearStart::SpringBeginsDay`]）或立春時刻（[`YearStart::SpringBeginsInstant`]）換年；
//! - 日柱：晚子時（23:00–23:59）算作次日（[`DayBoundary::LateRatNextDay`]）或當日（[`DayBoundary::LateRatSameDay`]）；
//! - 月柱：以交節當日（[`MonthAnchor::NodeDay`]）或交節時刻（[`MonthAnchor::NodeInstant`]）換月。
//!
//! 本模塊各函數均為純函數，只讀取 [`LunarDate`] 及其所攜節氣表。

use std::fmt;

use super::lunar::LunarDate;
use super::solar_term::{SolarTermInstant, TermPrecision};

/// 干支，六十甲子中的一項。
///
/// # 用例
///
/// ```
/// use nongli::chinese::Pillar;
///
/// let p = Pillar::from_year(1984);
/// assert_eq!((0, 0), (p.stem(), p.branch()));
/// assert_eq!("甲子", p.to_string());
/// assert_eq!(Some(Pillar::from_index(39)), Pillar::from_stem_branch(9, 3)); // 癸卯
/// assert_eq!(None, Pillar::from_stem_branch(0, 1));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Pillar {
    index: u32,
}

impl Pillar {
    /// 甲子
    pub const JIA_ZI: Pillar = Pillar { index: 0 };

    /// 由任意整數序號取得干支，按 60 取模。
    pub fn from_index(index: i64) -> Self {
        Self {
            index: index.rem_euclid(60) as u32,
        }
    }
    /// 由干、支序號取得干支；干支奇偶不合（如甲丑）則返回 `None`。
    pub fn from_stem_branch(stem: u32, branch: u32) -> Option<Self> {
        (stem < 10 && branch < 12 && stem % 2 == branch % 2).then(|| Self::combine(stem, branch))
    }
    /// 公元年（天文紀年）的干支，不論換年規則。
    pub fn from_year(year: i32) -> Self {
        Self::from_index(i64::from(year) - 4)
    }

    /// 干支奇偶已知相合時以中國剩餘定理合成序號。
    pub(crate) fn combine(stem: u32, branch: u32) -> Self {
        Self::from_index(6 * i64::from(stem) - 5 * i64::from(branch))
    }

    /// 六十甲子序號，`0..60`
    pub fn index(self) -> u32 {
        self.index
    }
    /// 天干序號，`0..10`，0 為甲
    pub fn stem(self) -> u32 {
        self.index % 10
    }
    /// 地支序號，`0..12`，0 為子
    pub fn branch(self) -> u32 {
        self.index % 12
    }
    /// 往後推 `n` 項，`n` 可為負。
    pub fn next(self, n: i64) -> Self {
        Self::from_index(i64::from(self.index) + n)
    }
    /// 地支對應的生肖
    pub fn zodiac(self) -> &'static str {
        super::fmt::zodiac(self.branch())
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::fmt::sexagenary(self.index))
    }
}

/// 年柱換年的時刻
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum YearStart {
    /// 正月初一
    #[default]
    LunarNewYear,
    /// 立春當日零時
    SpringBeginsDay,
    /// 立春交節時刻
    SpringBeginsInstant,
}

/// 晚子時（23:00–23:59）的日柱歸屬
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum DayBoundary {
    /// 算作次日
    LateRatNextDay,
    /// 算作當日
    #[default]
    LateRatSameDay,
}

/// 月柱換月的時刻
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum MonthAnchor {
    /// 交節當日零時
    #[default]
    NodeDay,
    /// 交節時刻
    NodeInstant,
}

impl MonthAnchor {
    fn precision(self) -> TermPrecision {
        match self {
            MonthAnchor::NodeDay => TermPrecision::Day,
            MonthAnchor::NodeInstant => TermPrecision::Instant,
        }
    }
    fn year_start(self) -> YearStart {
        match self {
            MonthAnchor::NodeDay => YearStart::SpringBeginsDay,
            MonthAnchor::NodeInstant => YearStart::SpringBeginsInstant,
        }
    }
}

/// 流派：年、日、月三條交界規則各選其一。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{DayBoundary, MonthAnchor, SectMode, YearStart};
///
/// let sect = SectMode::default()
///     .with_year_start(YearStart::SpringBeginsInstant)
///     .with_month_anchor(MonthAnchor::NodeInstant);
/// assert_eq!(DayBoundary::LateRatSameDay, sect.day_boundary);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SectMode {
    pub year_start: YearStart,
    pub day_boundary: DayBoundary,
    pub month_anchor: MonthAnchor,
}

impl SectMode {
    /// 八字常用的「精確」流派：立春時刻換年、交節時刻換月、晚子時算次日。
    pub const EXACT: SectMode = SectMode {
        year_start: YearStart::SpringBeginsInstant,
        day_boundary: DayBoundary::LateRatNextDay,
        month_anchor: MonthAnchor::NodeInstant,
    };

    pub fn with_year_start(mut self, year_start: YearStart) -> Self {
        self.year_start = year_start;
        self
    }
    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }
    pub fn with_month_anchor(mut self, month_anchor: MonthAnchor) -> Self {
        self.month_anchor = month_anchor;
        self
    }
}

/// 年柱。
///
/// 依立春換年時，以農曆年的干支為基準：農曆年與公元年相同而未到立春則退一年，
/// 農曆年尚屬前一年（正月前）而已過立春則進一年。
pub fn year_pillar(date: &LunarDate, sect: SectMode) -> Pillar {
    let lunar = Pillar::from_year(date.year());
    let precision = match sect.year_start {
        YearStart::LunarNewYear => return lunar,
        YearStart::SpringBeginsDay => TermPrecision::Day,
        YearStart::SpringBeginsInstant => TermPrecision::Instant,
    };
    let solar = date.solar();
    let crossed = date
        .solar_terms()
        .spring_begins()
        .cmp_at(&solar, precision)
        .is_le();
    if date.year() == solar.year() && !crossed {
        lunar.next(-1)
    } else if date.year() < solar.year() && crossed {
        lunar.next(1)
    } else {
        lunar
    }
}

/// 月柱。
///
/// 依節氣表逐個比對「節」定出所在月位，立春所在之寅月為 0；月干由同一換年規則下的年干按「甲己之年丙作首」推得。
pub fn month_pillar(date: &LunarDate, sect: SectMode) -> Pillar {
    let anchor = sect.month_anchor;
    let index = month_position(date, anchor.precision());
    let year_stem = year_pillar(date, sect.with_year_start(anchor.year_start())).stem();
    // 立春前的月位屬前一年，其年干已退一，補回後與寅月的起點對齊
    let tiger_stem = ((year_stem + u32::from(index < 0)) % 5 + 1) * 2 % 10;
    let stem = (index.rem_euclid(10) as u32 + tiger_stem) % 10;
    let branch = (index.rem_euclid(12) as u32 + 2) % 12;
    Pillar::combine(stem, branch)
}

/// 所在月位：表首大雪之前為 −3，此後每過一節加一，立春至驚蟄之間為 0。
fn month_position(date: &LunarDate, precision: TermPrecision) -> i32 {
    let solar = date.solar();
    let mut index = -3;
    let mut start: Option<&SolarTermInstant> = None;
    for end in date.solar_terms().jie() {
        let after_start = start.is_none_or(|s| s.cmp_at(&solar, precision).is_le());
        if after_start && end.cmp_at(&solar, precision).is_gt() {
            break;
        }
        start = Some(end);
        index += 1;
    }
    index
}

/// 日柱，取當地民用日，晚子時依 `sect` 決定是否進一日。
pub fn day_pillar(date: &LunarDate, sect: SectMode) -> Pillar {
    let solar = date.solar();
    let base = Pillar::from_index(i64::from(solar.date().sexagenary()));
    match sect.day_boundary {
        DayBoundary::LateRatNextDay if solar.hour() == 23 => base.next(1),
        _ => base,
    }
}

/// 時柱。時支為 `((時 + 1) / 2) mod 12`；時干按「甲己還加甲」由日干推得，所用日干恆以晚子時算次日，
/// 故與所選日柱流派無關。
pub fn hour_pillar(date: &LunarDate) -> Pillar {
    let branch = (date.solar().hour() + 1) / 2 % 12;
    let day_stem = day_pillar(date, SectMode::EXACT).stem();
    let stem = (day_stem % 5 * 2 + branch) % 10;
    Pillar::combine(stem, branch)
}

/// 四柱
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl FourPillars {
    /// 依流派一次算出四柱。
    pub fn of(date: &LunarDate, sect: SectMode) -> Self {
        Self {
            year: year_pillar(date, sect),
            month: month_pillar(date, sect),
            day: day_pillar(date, sect),
            hour: hour_pillar(date),
        }
    }
}

impl fmt::Display for FourPillars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}
