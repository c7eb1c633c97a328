//! Turns view models into terminal text. Formatting is kept separate from printing so the text
//! can be checked in tests.

pub mod chart;

use crate::{
    aggregate::{ProjectStats, TimeWindow, WindowSummary},
    storage::entities::WordRecord,
    utils::time::format_day,
    view::{Dashboard, Filter},
};

pub fn table_lines(rows: &[WordRecord]) -> Vec<String> {
    let mut lines = vec!["Project\tDate\tWords".to_string()];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{}\t{}\t{}",
            row.project(),
            format_day(row.date()),
            row.words()
        )
    }));
    lines
}

pub fn summary_lines(summary: &WindowSummary) -> Vec<String> {
    vec![
        format!("Total words: {}", summary.total),
        format!("Today: {} words", summary.today),
        format!("{}: {} words", capitalize(TimeWindow::Last7Days), summary.weekly),
        format!("{}: {} words", capitalize(TimeWindow::Last30Days), summary.monthly),
    ]
}

pub fn project_lines(projects: &[ProjectStats]) -> Vec<String> {
    projects
        .iter()
        .map(|stats| {
            format!(
                "{}\t{} words/day\t{} this week\t{} this month",
                stats.project,
                format_average(stats.average),
                stats.weekly,
                stats.monthly
            )
        })
        .collect()
}

/// One line per option, the `selected` one marked with `*`.
pub fn filter_option_lines(options: &[String], selected: &Filter) -> Vec<String> {
    let selected = selected.to_string();
    options
        .iter()
        .map(|option| {
            let marker = if *option == selected { "*" } else { " " };
            format!("{marker} {option}")
        })
        .collect()
}

/// Averages are shown rounded to the nearest word.
pub fn format_average(average: f64) -> String {
    format!("{}", average.round() as u64)
}

fn capitalize(window: TimeWindow) -> String {
    let text = window.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn print_table(rows: &[WordRecord]) {
    for line in table_lines(rows) {
        println!("{line}");
    }
}

pub fn print_summary(summary: Option<&WindowSummary>) {
    match summary {
        Some(summary) => {
            for line in summary_lines(summary) {
                println!("{line}");
            }
        }
        None => println!("Nothing logged yet."),
    }
}

pub fn print_projects(projects: &[ProjectStats]) {
    for line in project_lines(projects) {
        println!("{line}");
    }
}

pub fn print_filter_options(options: &[String], selected: &Filter) {
    for line in filter_option_lines(options, selected) {
        println!("{line}");
    }
}

/// Prints everything except the chart, which goes through a [chart::ChartRenderer].
pub fn print_dashboard(dashboard: &Dashboard) {
    print_summary(dashboard.summary.as_ref());
    if !dashboard.projects.is_empty() {
        println!();
        print_projects(&dashboard.projects);
    }
    println!();
    println!("Projects:");
    print_filter_options(&dashboard.filter_options, &dashboard.filter);
    println!();
    print_table(&dashboard.table);
    println!();
}
