//! Statistics
//!
//! Pure derivations over the item and box lists, recomputed on demand.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::models::{Item, ItemStatus, StorageBox};

/// Number of days shown in the sorting trend
pub const TREND_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub kept: usize,
    pub trash: usize,
    pub donate: usize,
    pub sell: usize,
    pub unsorted: usize,
}

impl CategoryStats {
    pub fn discarded(&self) -> usize {
        self.trash + self.donate + self.sell
    }

    pub fn sorted(&self) -> usize {
        self.kept + self.discarded()
    }

    pub fn total(&self) -> usize {
        self.sorted() + self.unsorted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxStats {
    pub id: String,
    pub name: String,
    pub gradient: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingTrend {
    /// `Oct 17`
    pub date: String,
    pub count: usize,
}

pub fn category_stats(items: &[Item]) -> CategoryStats {
    let mut stats = CategoryStats::default();
    for item in items {
        match item.status {
            ItemStatus::Kept => stats.kept += 1,
            ItemStatus::Trash => stats.trash += 1,
            ItemStatus::Donate => stats.donate += 1,
            ItemStatus::Sell => stats.sell += 1,
            ItemStatus::Unsorted => stats.unsorted += 1,
        }
    }
    stats
}

/// Boxes with their item counts, fullest first
pub fn box_stats(boxes: &[StorageBox]) -> Vec<BoxStats> {
    let mut stats: Vec<BoxStats> = boxes
        .iter()
        .map(|b| BoxStats {
            id: b.id.clone(),
            name: b.name.clone(),
            gradient: b.gradient,
            count: b.item_count(),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Sorted items per calendar day in `tz`, the most recent `TREND_DAYS` days
/// that have any sorting, oldest first.
pub fn sorting_trends<Tz: TimeZone>(items: &[Item], tz: &Tz) -> Vec<SortingTrend> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for item in items.iter().filter(|i| i.status.is_sorted()) {
        let Some(sorted_at) = item.sorted_at else {
            continue;
        };
        let Some(utc) = DateTime::from_timestamp_millis(sorted_at) else {
            continue;
        };
        let day = utc.with_timezone(tz).date_naive();
        *by_day.entry(day).or_default() += 1;
    }

    let skip = by_day.len().saturating_sub(TREND_DAYS);
    by_day
        .into_iter()
        .skip(skip)
        .map(|(day, count)| SortingTrend {
            date: day.format("%b %-d").to_string(),
            count,
        })
        .collect()
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Share of all items that are sorted
pub fn sorting_rate(stats: &CategoryStats) -> u32 {
    percent(stats.sorted(), stats.total())
}

/// Share of sorted items that were kept
pub fn keep_rate(stats: &CategoryStats) -> u32 {
    percent(stats.kept, stats.sorted())
}

pub fn discard_rate(stats: &CategoryStats) -> u32 {
    percent(stats.discarded(), stats.sorted())
}
