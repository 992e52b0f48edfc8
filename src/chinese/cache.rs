//! 農曆年緩存
//!
//! 每個年份一格 [`OnceCell`]：首次取用時編排，同一年份在並發下只編排一次，其餘線程等待結果。
//! 編排失敗不入緩存，下次取用時重試。緩存不淘汰，年份數目有限（至多約一萬），佔用可接受。

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::OnceCell;
use tracing::trace;

use super::year::LunarYear;
use crate::error::Result;

type Slot = Arc<OnceCell<Arc<LunarYear>>>;

/// 以年份為鍵的農曆年緩存，可在線程間共享。
#[derive(Debug, Default)]
pub struct YearCache {
    years: RwLock<HashMap<i32, Slot>>,
}

impl YearCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得 `year` 年；未緩存則以 `build` 編排並存入。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::cache::YearCache;
    /// use nongli::chinese::ephemeris::Meeus;
    /// use nongli::chinese::LunarYear;
    ///
    /// let cache = YearCache::new();
    /// let a = cache.get_or_build(2023, || LunarYear::build(2023, &Meeus, 480)).unwrap();
    /// let b = cache.get_or_build(2023, || unreachable!()).unwrap();
    /// assert!(std::sync::Arc::ptr_eq(&a, &b));
    /// ```
    pub fn get_or_build<F>(&self, year: i32, build: F) -> Result<Arc<LunarYear>>
    where
        F: FnOnce() -> Result<LunarYear>,
    {
        let slot = self.slot(year);
        if let Some(built) = slot.get() {
            trace!(year, "lunar year cache hit");
            return Ok(Arc::clone(built));
        }
        slot.get_or_try_init(|| build().map(Arc::new)).cloned()
    }

    fn slot(&self, year: i32) -> Slot {
        let read = self.years.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = read.get(&year) {
            return Arc::clone(slot);
        }
        drop(read);
        let mut write = self.years.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(write.entry(year).or_default())
    }

    /// 已編排完成的年份數
    pub fn len(&self) -> usize {
        let read = self.years.read().unwrap_or_else(PoisonError::into_inner);
        read.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 是否已緩存 `year` 年
    pub fn contains(&self, year: i32) -> bool {
        let read = self.years.read().unwrap_or_else(PoisonError::into_inner);
        read.get(&year).is_some_and(|slot| slot.get().is_some())
    }

    /// 清空緩存；已取出的 `Arc<LunarYear>` 不受影響。
    pub fn clear(&self) {
        self.years
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
