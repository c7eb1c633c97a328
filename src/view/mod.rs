//! Derives everything that gets displayed from a snapshot of records and the selected filter.
//! [build_dashboard] is the entry point, the other functions are its pieces.

use std::{fmt::Display, str::FromStr, sync::Arc};

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument};

use crate::{
    aggregate::{
        date_buckets, distinct_projects, project_stats, window_summary, ProjectStats,
        WindowSummary,
    },
    storage::entities::WordRecord,
};

/// Option standing for "every project" in the filter list.
pub const ALL_PROJECTS: &str = "all";

pub const CHART_TITLE: &str = "Words written per day";

/// Project scope applied to the table and the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Project(Arc<str>),
}

impl Filter {
    pub fn matches(&self, record: &WordRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Project(project) => record.project() == project,
        }
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(anyhow!("Filter needs a project name or \"{ALL_PROJECTS}\""))
        } else if s == ALL_PROJECTS {
            Ok(Filter::All)
        } else {
            Ok(Filter::Project(s.into()))
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "{ALL_PROJECTS}"),
            Filter::Project(project) => write!(f, "{project}"),
        }
    }
}

/// Chart-ready series. `labels` and `values` are aligned by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<NaiveDate>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Every derived artifact for one state of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub filter: Filter,
    pub filter_options: Vec<String>,
    pub table: Vec<WordRecord>,
    /// `None` when nothing has been logged yet. Zeros aren't worth showing.
    pub summary: Option<WindowSummary>,
    pub projects: Vec<ProjectStats>,
    pub chart: ChartSeries,
}

/// Records matching `filter`, most recent day first. Records of the same day keep their
/// relative order.
pub fn visible_records(records: &[WordRecord], filter: &Filter) -> Vec<WordRecord> {
    let mut visible = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect::<Vec<_>>();
    visible.sort_by(|a, b| b.date().cmp(&a.date()));
    visible
}

pub fn chart_series(records: &[WordRecord], filter: &Filter) -> ChartSeries {
    let matching = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect::<Vec<_>>();
    let (labels, values): (Vec<_>, Vec<_>) = date_buckets(&matching)
        .into_iter()
        .map(|bucket| (bucket.date, bucket.words))
        .unzip();

    let title = match filter {
        Filter::All => CHART_TITLE.to_string(),
        Filter::Project(project) => format!("{CHART_TITLE} ({project})"),
    };

    ChartSeries {
        title,
        labels,
        values,
    }
}

/// Choices offered for filtering: the [ALL_PROJECTS] sentinel followed by every known project.
pub fn filter_options(records: &[WordRecord]) -> Vec<String> {
    let mut options = vec![ALL_PROJECTS.to_string()];
    options.extend(distinct_projects(records));
    options
}

/// Recomputes every view from scratch. Filter options are derived first so a project introduced
/// by the latest record is already selectable when the table and chart are filtered.
#[instrument(skip(records), fields(records = records.len()))]
pub fn build_dashboard(records: &[WordRecord], filter: Filter, now: DateTime<Utc>) -> Dashboard {
    let filter_options = filter_options(records);
    let table = visible_records(records, &filter);
    let summary = (!records.is_empty()).then(|| window_summary(records, now));
    let projects = project_stats(records, now);
    let chart = chart_series(records, &filter);

    debug!(
        "Built dashboard with {} rows, {} projects and {} chart points",
        table.len(),
        projects.len(),
        chart.labels.len()
    );

    Dashboard {
        filter,
        filter_options,
        table,
        summary,
        projects,
        chart,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use crate::{aggregate::WindowSummary, storage::entities::WordRecord};

    use super::{
        build_dashboard, chart_series, filter_options, visible_records, ChartSeries, Filter,
        CHART_TITLE,
    };

    fn record(project: &str, date: &str, words: u64) -> WordRecord {
        WordRecord::new(
            project,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            words,
        )
        .unwrap()
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    fn scenario() -> Vec<WordRecord> {
        vec![
            record("A", "2024-01-01", 100),
            record("B", "2024-01-02", 50),
            record("A", "2024-01-02", 30),
        ]
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(" all ".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(
            " Novel ".parse::<Filter>().unwrap(),
            Filter::Project("Novel".into())
        );
        assert!("  ".parse::<Filter>().is_err());
        assert_eq!(Filter::Project("Novel".into()).to_string(), "Novel");
        assert_eq!(Filter::All.to_string(), "all");
    }

    #[test]
    fn test_visible_records_filtered() {
        assert_eq!(
            visible_records(&scenario(), &Filter::Project("A".into())),
            vec![record("A", "2024-01-02", 30), record("A", "2024-01-01", 100)]
        );
    }

    #[test]
    fn test_visible_records_all_sorted_and_stable() {
        let records = [
            record("C", "2024-01-01", 1),
            record("A", "2024-01-03", 2),
            record("B", "2024-01-01", 3),
            record("D", "2024-01-03", 4),
        ];

        assert_eq!(
            visible_records(&records, &Filter::All),
            vec![
                record("A", "2024-01-03", 2),
                record("D", "2024-01-03", 4),
                record("C", "2024-01-01", 1),
                record("B", "2024-01-01", 3),
            ]
        );
    }

    #[test]
    fn test_unknown_project_filter() {
        let filter = Filter::Project("Missing".into());

        assert!(visible_records(&scenario(), &filter).is_empty());
        let chart = chart_series(&scenario(), &filter);
        assert!(chart.labels.is_empty());
        assert!(chart.values.is_empty());
    }

    #[test]
    fn test_chart_series() {
        assert_eq!(
            chart_series(&scenario(), &Filter::All),
            ChartSeries {
                title: CHART_TITLE.into(),
                labels: vec![day("2024-01-01"), day("2024-01-02")],
                values: vec![100, 80],
            }
        );
        assert_eq!(
            chart_series(&scenario(), &Filter::Project("B".into())),
            ChartSeries {
                title: format!("{CHART_TITLE} (B)"),
                labels: vec![day("2024-01-02")],
                values: vec![50],
            }
        );
    }

    #[test]
    fn test_filter_options() {
        assert_eq!(filter_options(&[]), vec!["all"]);
        assert_eq!(filter_options(&scenario()), vec!["all", "A", "B"]);
    }

    #[test]
    fn test_dashboard_scenario() {
        let dashboard = build_dashboard(&scenario(), Filter::Project("A".into()), now());

        assert_eq!(dashboard.filter_options, vec!["all", "A", "B"]);
        assert_eq!(dashboard.table.len(), 2);
        assert_eq!(
            dashboard.summary,
            Some(WindowSummary {
                total: 180,
                today: 80,
                weekly: 180,
                monthly: 180,
            })
        );
        assert_eq!(dashboard.projects.len(), 2);
        assert_eq!(dashboard.projects[0].weekly, 130);
        assert_eq!(dashboard.projects[0].average, 130.);
        assert_eq!(dashboard.chart.values, vec![100, 30]);
    }

    #[test]
    fn test_dashboard_empty() {
        let dashboard = build_dashboard(&[], Filter::All, now());

        assert_eq!(dashboard.filter_options, vec!["all"]);
        assert!(dashboard.table.is_empty());
        assert_eq!(dashboard.summary, None);
        assert!(dashboard.projects.is_empty());
        assert!(dashboard.chart.is_empty());
    }

    #[test]
    fn test_dashboard_idempotent() {
        let records = scenario();
        let first = build_dashboard(&records, Filter::All, now());
        let second = build_dashboard(&records, Filter::All, now());

        assert_eq!(first, second);
        assert_eq!(
            first.projects[0].average.to_bits(),
            second.projects[0].average.to_bits()
        );
    }
}
