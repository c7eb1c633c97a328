pub mod dates;
pub mod output;

use std::{io::IsTerminal, path::PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use dates::{parse_calendar_day, parse_moment, DateStyle};
use output::{
    chart::{ChartRenderer, TerminalChart},
    print_dashboard, print_filter_options, print_projects, print_summary, print_table,
};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    aggregate::{project_stats, window_summary},
    intake::RecordCandidate,
    storage::record_store::{JsonRecordStore, RecordStore},
    utils::{
        clock::{Clock, DefaultClock, FixedClock},
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
        time::format_day,
    },
    view::{
        build_dashboard, chart_series, filter_options, visible_records, ChartSeries, Dashboard,
        Filter,
    },
};

#[derive(Parser, Debug)]
#[command(name = "wordtally", version, long_about = None)]
#[command(about = "Track how many words you write per project", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Pretend the current moment is this date. Examples are \"2024-01-02\", \"yesterday\", \"12:00 16/03/2025\""
    )]
    now: Option<String>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Log words written for a project")]
    Add {
        project: String,
        #[arg(allow_hyphen_values = true)]
        words: String,
        #[arg(
            long,
            short,
            help = "Day the words were written. Defaults to today. Examples are \"2024-01-02\", \"yesterday\", \"15/03/2025\""
        )]
        date: Option<String>,
    },
    #[command(about = "Show totals for today, the last 7 days, the last 30 days and per project")]
    Stats,
    #[command(about = "List logged records, most recent first")]
    Table {
        #[command(flatten)]
        filter: FilterArg,
    },
    #[command(about = "Draw words written per day")]
    Chart {
        #[command(flatten)]
        filter: FilterArg,
    },
    #[command(about = "List projects that can be used as a filter")]
    Projects {
        #[command(flatten)]
        filter: FilterArg,
    },
    #[command(about = "Show stats, records and the chart at once")]
    Dashboard {
        #[command(flatten)]
        filter: FilterArg,
    },
}

#[derive(Debug, Clone, clap::Args)]
struct FilterArg {
    #[arg(
        short = 'p',
        long = "project",
        default_value_t = Filter::All,
        help = "Only include this project. \"all\" includes every project"
    )]
    filter: Filter,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let clock: Box<dyn Clock> = match &args.now {
        Some(now) => Box::new(FixedClock(
            parse_moment(now, Utc::now(), args.date_style).map_err(validation_error)?,
        )),
        None => Box::new(DefaultClock),
    };

    let store = JsonRecordStore::in_dir(&app_dir)?;
    execute(args.commands, &store, clock.time(), args.date_style).await
}

/// Runs a single command against `store`. Every command works on a fresh snapshot of the
/// stored records.
async fn execute(
    command: Commands,
    store: &impl RecordStore,
    now: DateTime<Utc>,
    date_style: DateStyle,
) -> Result<()> {
    match command {
        Commands::Add {
            project,
            words,
            date,
        } => {
            let date = match date {
                Some(date) => {
                    parse_calendar_day(&date, now, date_style).map_err(validation_error)?
                }
                None => now.date_naive(),
            };
            let record = RecordCandidate::new(project, format_day(date), words)
                .validate()
                .map_err(|e| validation_error(e.into()))?;

            info!("Adding {record:?}");
            let records = store.append(record).await?;
            println!("Logged.");
            println!();
            show_dashboard(build_dashboard(&records, Filter::All, now))
        }
        Commands::Stats => {
            let records = store.load().await;
            let summary = (!records.is_empty()).then(|| window_summary(&records, now));
            print_summary(summary.as_ref());
            print_projects(&project_stats(&records, now));
            Ok(())
        }
        Commands::Table {
            filter: FilterArg { filter },
        } => {
            let records = store.load().await;
            print_table(&visible_records(&records, &filter));
            Ok(())
        }
        Commands::Chart {
            filter: FilterArg { filter },
        } => {
            let records = store.load().await;
            render_chart(&chart_series(&records, &filter))
        }
        Commands::Projects {
            filter: FilterArg { filter },
        } => {
            let records = store.load().await;
            print_filter_options(&filter_options(&records), &filter);
            Ok(())
        }
        Commands::Dashboard {
            filter: FilterArg { filter },
        } => {
            let records = store.load().await;
            show_dashboard(build_dashboard(&records, filter, now))
        }
    }
}

fn show_dashboard(dashboard: Dashboard) -> Result<()> {
    print_dashboard(&dashboard);
    render_chart(&dashboard.chart)
}

fn render_chart(series: &ChartSeries) -> Result<()> {
    let stdout = std::io::stdout();
    let colored = stdout.is_terminal();
    let mut renderer = ChartRenderer::new(TerminalChart::new(stdout, colored));
    renderer.render(series)
}

fn validation_error(e: anyhow::Error) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, e.to_string())
        .into()
}
