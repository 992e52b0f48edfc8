//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序以天文算法即時編算夏曆：節氣與朔日由 [`Ephemeris`] 求得（內置 [`Meeus`]），
//! 經 [`SolarTermTable`]、[`LunarYear`] 編排為月表，再由 [`Calendar`] 完成公曆與農曆的互換，
//! 並依 [`SectMode`] 所選流派推算年、月、日、時四柱。
//!
//! 置閏在公元 37 至 10000 年間以例外表校正（見 [`leap`]），範圍外純按規則推算，與史曆或有出入。
//!
//! # 用例
//!
//! ```
//! use nongli::chinese::{Calendar, SectMode};
//!
//! let calendar = Calendar::new();
//! let date = calendar.solar_to_lunar(2000, 1, 1, 12, 0, 0).unwrap();
//!
//! assert_eq!((1999, 11, 25), (date.year(), date.month(), date.day()));
//! assert_eq!("己卯 丙子 戊午 戊午", date.pillars(SectMode::default()).to_string());
//! ```

pub mod cache;
pub mod calendar;
pub mod ephemeris;
pub mod fmt;
pub mod leap;
pub mod lunar;
pub mod search;
pub mod sexagenary;
pub mod solar_term;
pub mod year;

pub use cache::YearCache;
pub use calendar::Calendar;
pub use ephemeris::{Ephemeris, Meeus};
pub use lunar::LunarDate;
pub use sexagenary::{DayBoundary, FourPillars, MonthAnchor, Pillar, SectMode, YearStart};
pub use solar_term::{SolarTerm, SolarTermInstant, SolarTermTable, TermFilter, TermPrecision};
pub use year::{LunarMonth, LunarYear};
