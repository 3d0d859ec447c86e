use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::content::ContentKind;

/// Session-scoped render counters. Only successful renders are recorded and
/// nothing is ever decremented; [`UsageStats::reset`] is the sole way back
/// to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UsageStats {
    total: u64,
    by_kind: BTreeMap<ContentKind, u64>,
    by_date: BTreeMap<NaiveDate, u64>,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            total: 0,
            by_kind: ContentKind::ALL.iter().map(|k| (*k, 0)).collect(),
            by_date: BTreeMap::new(),
        }
    }
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ContentKind, date: NaiveDate) {
        self.total += 1;
        *self.by_kind.entry(kind).or_insert(0) += 1;
        *self.by_date.entry(date).or_insert(0) += 1;
    }

    /// Records against the system-local calendar date.
    pub fn record_today(&mut self, kind: ContentKind) {
        self.record(kind, Local::now().date_naive());
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, kind: ContentKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn on(&self, date: NaiveDate) -> u64 {
        self.by_date.get(&date).copied().unwrap_or(0)
    }

    pub fn by_kind(&self) -> impl Iterator<Item = (ContentKind, u64)> + '_ {
        self.by_kind.iter().map(|(k, v)| (*k, *v))
    }

    pub fn by_date(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.by_date.iter().map(|(d, v)| (*d, *v))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
