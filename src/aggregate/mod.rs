//! Pure computations over a snapshot of records. Nothing in here reads the clock or touches the
//! store, `now` is always passed in. Every function accepts an empty slice and returns zeros or
//! empty collections for it.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Display,
    sync::Arc,
};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{storage::entities::WordRecord, utils::time::day_start};

/// Relative range of time words are summed over.
///
/// [TimeWindow::Today] compares calendar days, while the rolling windows compare the start of the
/// record's day against an instant `N * 24h` before `now`. A record from 7 days ago therefore
/// belongs to the weekly window only if `now` is exactly at the start of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Today,
    Last7Days,
    Last30Days,
}

impl TimeWindow {
    pub fn contains(&self, record: &WordRecord, now: DateTime<Utc>) -> bool {
        match self {
            TimeWindow::Today => record.date() == now.date_naive(),
            TimeWindow::Last7Days => record.start() >= now - Duration::days(7),
            TimeWindow::Last30Days => record.start() >= now - Duration::days(30),
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeWindow::Today => write!(f, "today"),
            TimeWindow::Last7Days => write!(f, "last 7 days"),
            TimeWindow::Last30Days => write!(f, "last 30 days"),
        }
    }
}

/// Words written on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub words: u64,
}

/// The headline numbers of the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSummary {
    pub total: u64,
    pub today: u64,
    pub weekly: u64,
    pub monthly: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStats {
    pub project: Arc<str>,
    pub total: u64,
    pub first_date: NaiveDate,
    /// Whole days since the first entry, never less than 1.
    pub days_elapsed: i64,
    /// Words per elapsed day. Unrounded.
    pub average: f64,
    pub weekly: u64,
    pub monthly: u64,
}

pub fn total_words(records: &[WordRecord]) -> u64 {
    records.iter().map(WordRecord::words).fold(0, u64::saturating_add)
}

pub fn window_total(records: &[WordRecord], now: DateTime<Utc>, window: TimeWindow) -> u64 {
    records
        .iter()
        .filter(|record| window.contains(record, now))
        .map(WordRecord::words)
        .fold(0, u64::saturating_add)
}

pub fn window_summary(records: &[WordRecord], now: DateTime<Utc>) -> WindowSummary {
    WindowSummary {
        total: total_words(records),
        today: window_total(records, now, TimeWindow::Today),
        weekly: window_total(records, now, TimeWindow::Last7Days),
        monthly: window_total(records, now, TimeWindow::Last30Days),
    }
}

/// Sums words per day, ascending by day.
pub fn date_buckets(records: &[WordRecord]) -> Vec<DateBucket> {
    let mut buckets = BTreeMap::<NaiveDate, u64>::new();
    for record in records {
        let bucket = buckets.entry(record.date()).or_default();
        *bucket = bucket.saturating_add(record.words());
    }
    buckets
        .into_iter()
        .map(|(date, words)| DateBucket { date, words })
        .collect()
}

/// Unique project names in order of their first appearance.
pub fn distinct_projects(records: &[WordRecord]) -> Vec<String> {
    let mut seen = HashSet::<&str>::new();
    records
        .iter()
        .filter(|record| seen.insert(&**record.project()))
        .map(|record| record.project().to_string())
        .collect()
}

struct ProjectAccumulator {
    project: Arc<str>,
    total: u64,
    first_date: NaiveDate,
    weekly: u64,
    monthly: u64,
}

impl ProjectAccumulator {
    fn new(record: &WordRecord) -> Self {
        Self {
            project: record.project().clone(),
            total: 0,
            first_date: record.date(),
            weekly: 0,
            monthly: 0,
        }
    }

    fn add(&mut self, record: &WordRecord, now: DateTime<Utc>) {
        self.total = self.total.saturating_add(record.words());
        self.first_date = self.first_date.min(record.date());
        if TimeWindow::Last7Days.contains(record, now) {
            self.weekly = self.weekly.saturating_add(record.words());
        }
        if TimeWindow::Last30Days.contains(record, now) {
            self.monthly = self.monthly.saturating_add(record.words());
        }
    }

    fn finish(self, now: DateTime<Utc>) -> ProjectStats {
        let first_start = day_start(self.first_date);
        let days_elapsed = (now - first_start).num_days().max(1);
        ProjectStats {
            project: self.project,
            total: self.total,
            first_date: self.first_date,
            days_elapsed,
            average: self.total as f64 / days_elapsed as f64,
            weekly: self.weekly,
            monthly: self.monthly,
        }
    }
}

/// Per project totals and daily averages, ordered by first appearance of each project.
pub fn project_stats(records: &[WordRecord], now: DateTime<Utc>) -> Vec<ProjectStats> {
    let mut positions = HashMap::<&str, usize>::new();
    let mut groups = Vec::<ProjectAccumulator>::new();

    for record in records {
        let position = *positions.entry(&**record.project()).or_insert_with(|| {
            groups.push(ProjectAccumulator::new(record));
            groups.len() - 1
        });
        groups[position].add(record, now);
    }

    groups.into_iter().map(|group| group.finish(now)).collect()
}
