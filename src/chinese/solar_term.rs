//! 節氣表
//!
//! 每一公元年 Y 編一份節氣表，共 31 個時刻：自 Y−1 年大雪、冬至起，經 Y 年全部節氣至 Y 年大雪、冬至，
//! 再延至 Y+1 年小寒、大寒、立春、雨水、驚蟄。第 `i` 項的太陽黃經為 `(17 + i)·15°`，偶數項為節，奇數項為氣。
//!
//! 前 25 項覆蓋編排該年各月所需的區間，末尾數項供月柱推算在年末向後查找下一個節。

use std::cmp::Ordering;
use std::fmt;

use crate::chinese::ephemeris::Ephemeris;
use crate::date::{Date, SolarDate};
use crate::error::Result;
use crate::julian::JulianDay;
use crate::time_scales::Ut;

/// 節氣表長度
pub const TABLE_LEN: usize = 31;
/// 表首（前一年大雪）對應的 15° 倍數
const FIRST_MULTIPLE: i32 = 17;
/// 立春在表中的位置
pub const SPRING_BEGINS: usize = 4;

/// 二十四節氣，序號 `1..=24` 依次為立春到大寒。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SolarTerm {
    LiChun = 1,
    YuShui,
    JingZhe,
    ChunFen,
    QingMing,
    GuYu,
    LiXia,
    XiaoMan,
    MangZhong,
    XiaZhi,
    XiaoShu,
    DaShu,
    LiQiu,
    ChuShu,
    BaiLu,
    QiuFen,
    HanLu,
    ShuangJiang,
    LiDong,
    XiaoXue,
    DaXue,
    DongZhi,
    XiaoHan,
    DaHan,
}

impl SolarTerm {
    /// 依序號排列的全部節氣
    pub const ALL: [SolarTerm; 24] = {
        use SolarTerm::*;
        [
            LiChun, YuShui, JingZhe, ChunFen, QingMing, GuYu, LiXia, XiaoMan, MangZhong, XiaZhi,
            XiaoShu, DaShu, LiQiu, ChuShu, BaiLu, QiuFen, HanLu, ShuangJiang, LiDong, XiaoXue,
            DaXue, DongZhi, XiaoHan, DaHan,
        ]
    };

    /// 由序號 `1..=24` 取得節氣。
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get((number as usize).checked_sub(1)?).copied()
    }
    /// 由太陽黃經（15° 的倍數）取得節氣，黃經不必先取模。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::SolarTerm;
    ///
    /// assert_eq!(SolarTerm::DongZhi, SolarTerm::from_multiple(18));
    /// assert_eq!(SolarTerm::LiChun, SolarTerm::from_multiple(21));
    /// assert_eq!(SolarTerm::ChunFen, SolarTerm::from_multiple(0));
    /// ```
    pub fn from_multiple(multiple: i32) -> Self {
        Self::ALL[(multiple - 21).rem_euclid(24) as usize]
    }
    /// 序號，立春為 1，大寒為 24。
    pub fn number(self) -> u32 {
        self as u32
    }
    /// 是否為「節」（立春、驚蟄等月首之節）
    pub fn is_jie(self) -> bool {
        self.number() % 2 == 1
    }
    /// 是否為「氣」（中氣）
    pub fn is_qi(self) -> bool {
        !self.is_jie()
    }
    /// 太陽視黃經，單位為度，`0..360`。
    pub fn longitude(self) -> f64 {
        f64::from((315 + (self.number() - 1) * 15) % 360)
    }
    /// 節氣名稱
    pub fn name(self) -> &'static str {
        super::fmt::solar_term(self.number())
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 交節時刻
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarTermInstant {
    term: SolarTerm,
    julian_day: JulianDay,
    solar: SolarDate,
}

impl SolarTermInstant {
    /// 節氣
    pub fn term(&self) -> SolarTerm {
        self.term
    }
    /// 交節時刻，為民用時（依所設時區）的儒略日
    pub fn julian_day(&self) -> JulianDay {
        self.julian_day
    }
    /// 交節時刻，精確到秒
    pub fn solar(&self) -> SolarDate {
        self.solar
    }
    /// 交節當日
    pub fn date(&self) -> Date {
        self.solar.date()
    }
    pub fn is_jie(&self) -> bool {
        self.term.is_jie()
    }
    pub fn is_qi(&self) -> bool {
        self.term.is_qi()
    }
    /// 交節時刻與 `at` 比較，`Day` 精度只比日期。
    pub(crate) fn cmp_at(&self, at: &SolarDate, precision: TermPrecision) -> Ordering {
        match precision {
            TermPrecision::Day => self.date().cmp(&at.date()),
            TermPrecision::Instant => self.solar.cmp(at),
        }
    }
}

/// 篩選節、氣或不限。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TermFilter {
    #[default]
    Any,
    Jie,
    Qi,
}

impl TermFilter {
    fn accepts(self, term: SolarTerm) -> bool {
        match self {
            TermFilter::Any => true,
            TermFilter::Jie => term.is_jie(),
            TermFilter::Qi => term.is_qi(),
        }
    }
}

/// 比較時刻的精度：只比日期，或比到秒。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TermPrecision {
    Day,
    #[default]
    Instant,
}

/// 一公元年的節氣表，見模塊說明。
#[derive(Debug, Clone)]
pub struct SolarTermTable {
    year: i32,
    entries: Vec<SolarTermInstant>,
}

impl SolarTermTable {
    /// 以 `ephemeris` 編算公元 `year` 年的節氣表，交節時刻轉為東 `utc_offset_minutes` 分鐘時區的民用時。
    #[tracing::instrument(level = "debug", skip(ephemeris))]
    pub fn build<E>(year: i32, ephemeris: &E, utc_offset_minutes: i32) -> Result<Self>
    where
        E: Ephemeris + ?Sized,
    {
        let mut entries = Vec::with_capacity(TABLE_LEN);
        for i in 0..TABLE_LEN as i32 {
            let multiple = FIRST_MULTIPLE + i;
            let tt = ephemeris.solar_longitude_crossing(multiple, f64::from(year))?;
            let julian_day = Ut::from(tt).to_local(utc_offset_minutes);
            entries.push(SolarTermInstant {
                term: SolarTerm::from_multiple(multiple),
                julian_day,
                solar: SolarDate::from_julian_day(julian_day)?,
            });
        }
        Ok(Self { year, entries })
    }

    /// 所屬公元年
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 全部 31 項，按時間排列
    pub fn entries(&self) -> &[SolarTermInstant] {
        &self.entries
    }
    /// 第 `i` 項
    pub fn get(&self, i: usize) -> Option<&SolarTermInstant> {
        self.entries.get(i)
    }
    /// 本年立春
    pub fn spring_begins(&self) -> &SolarTermInstant {
        &self.entries[SPRING_BEGINS]
    }
    /// 本年的某一節氣。
    ///
    /// 「本年」指表中第 1 至 24 項，即前一年冬至至本年大雪；冬至取前一年者，與習慣上按年序列出節氣的做法一致。
    pub fn term(&self, term: SolarTerm) -> &SolarTermInstant {
        let offset = (term.number() as usize + 24 - 22) % 24;
        &self.entries[1 + offset]
    }
    /// 表中全部的節（偶數項）
    pub fn jie(&self) -> impl Iterator<Item = &SolarTermInstant> {
        self.entries.iter().step_by(2)
    }
    /// 落在 `date` 當天的節氣。
    pub fn term_on(&self, date: Date, filter: TermFilter) -> Option<&SolarTermInstant> {
        self.entries
            .iter()
            .find(|e| filter.accepts(e.term) && e.date() == date)
    }
    /// `at` 之後（含同刻）最近的節氣，表內無則返回 `None`。
    pub fn next_term(
        &self,
        at: &SolarDate,
        filter: TermFilter,
        precision: TermPrecision,
    ) -> Option<&SolarTermInstant> {
        self.entries
            .iter()
            .filter(|e| filter.accepts(e.term))
            .find(|e| e.cmp_at(at, precision).is_ge())
    }
    /// `at` 之前（含同刻）最近的節氣，表內無則返回 `None`。
    pub fn prev_term(
        &self,
        at: &SolarDate,
        filter: TermFilter,
        precision: TermPrecision,
    ) -> Option<&SolarTermInstant> {
        self.entries
            .iter()
            .rev()
            .filter(|e| filter.accepts(e.term))
            .find(|e| e.cmp_at(at, precision).is_le())
    }
    /// 給定日期在其前一個節氣後第幾日，交節當日為 0。
    pub fn days_since_term(&self, date: Date, filter: TermFilter) -> Option<(&SolarTermInstant, i32)> {
        self.entries
            .iter()
            .rev()
            .filter(|e| filter.accepts(e.term))
            .find(|e| e.date() <= date)
            .map(|e| (e, date - e.date()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::ephemeris::Meeus;

    fn table(year: i32) -> SolarTermTable {
        SolarTermTable::build(year, &Meeus, 480).unwrap()
    }

    #[test]
    fn term_numbers() {
        for term in SolarTerm::ALL {
            assert_eq!(Some(term), SolarTerm::from_number(term.number()));
        }
        assert_eq!(None, SolarTerm::from_number(0));
        assert_eq!(None, SolarTerm::from_number(25));
        assert!(SolarTerm::LiChun.is_jie());
        assert!(SolarTerm::DongZhi.is_qi());
        assert_eq!(315.0, SolarTerm::LiChun.longitude());
        assert_eq!(270.0, SolarTerm::DongZhi.longitude());
        assert_eq!("穀雨", SolarTerm::GuYu.name());
    }

    #[test]
    fn layout() {
        let t = table(2017);
        assert_eq!(TABLE_LEN, t.entries().len());
        assert_eq!(SolarTerm::DaXue, t.entries()[0].term());
        assert_eq!(SolarTerm::DongZhi, t.entries()[1].term());
        assert_eq!(SolarTerm::LiChun, t.spring_begins().term());
        assert_eq!(SolarTerm::JingZhe, t.entries()[30].term());
        for (i, e) in t.entries().iter().enumerate() {
            assert_eq!(i % 2 == 0, e.is_jie());
        }
        assert!(t.entries().windows(2).all(|w| w[0].julian_day() < w[1].julian_day()));
        assert_eq!(16, t.jie().count());
    }

    #[test]
    fn dates_2017() {
        let t = table(2017);
        for (std, idx) in [
            ("2016-12-07", 0),
            ("2016-12-21", 1),
            ("2017-01-20", 3),
            ("2017-02-03", 4),
            ("2017-12-07", 24),
            ("2017-12-22", 25),
        ] {
            assert_eq!(std, t.entries()[idx].date().iso());
        }
        assert_eq!("2017-02-03", t.term(SolarTerm::LiChun).date().iso());
        assert_eq!("2016-12-21", t.term(SolarTerm::DongZhi).date().iso());
        assert_eq!("2017-12-07", t.term(SolarTerm::DaXue).date().iso());
    }

    #[test]
    fn queries() {
        let t = table(2017);
        let date = Date::from_ymd(2017, 2, 3).unwrap();
        assert_eq!(
            Some(SolarTerm::LiChun),
            t.term_on(date, TermFilter::Any).map(|e| e.term())
        );
        assert_eq!(None, t.term_on(date, TermFilter::Qi));

        let noon = SolarDate::new(2017, 2, 10, 12, 0, 0).unwrap();
        let prev = t.prev_term(&noon, TermFilter::Any, TermPrecision::Instant).unwrap();
        assert_eq!(SolarTerm::LiChun, prev.term());
        let next = t.next_term(&noon, TermFilter::Any, TermPrecision::Instant).unwrap();
        assert_eq!(SolarTerm::YuShui, next.term());
        let next_jie = t.next_term(&noon, TermFilter::Jie, TermPrecision::Day).unwrap();
        assert_eq!(SolarTerm::JingZhe, next_jie.term());

        let (e, days) = t
            .days_since_term(Date::from_ymd(2017, 2, 10).unwrap(), TermFilter::Any)
            .unwrap();
        assert_eq!((SolarTerm::LiChun, 7), (e.term(), days));
    }

    #[test]
    fn day_precision_includes_same_day() {
        let t = table(2017);
        let lichun = t.spring_begins().solar();
        let midnight = SolarDate::from_date(lichun.date(), 0, 0, 0).unwrap();
        let by_day = t.next_term(&midnight, TermFilter::Jie, TermPrecision::Day).unwrap();
        assert_eq!(SolarTerm::LiChun, by_day.term());
        let by_instant = t.prev_term(&midnight, TermFilter::Jie, TermPrecision::Instant).unwrap();
        assert_eq!(SolarTerm::XiaoHan, by_instant.term());
    }
}
