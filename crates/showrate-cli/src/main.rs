//! showrate: popular IMDb titles and per-season rating averages
//!
//! Scans the IMDb ratings dump for titles with more than 100,000 votes, then
//! walks one series' episodes pages season by season and prints its
//! season-based and episode-based rating averages.

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use directories::UserDirs;
use showrate_core::{
    join_shows, load_popular_titles, load_series_basics, summarize, ClientConfig, ImdbClient,
    RatingsScraper, BASICS_FILE, DEFAULT_TITLE_ID, RATINGS_FILE, VOTE_THRESHOLD,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::report::Report;

const DEFAULT_LOG_FILTER: &str = "showrate=info,showrate_core=info";

#[derive(Debug, Parser)]
#[command(name = "showrate", version, about = "Popular IMDb titles and per-season rating averages")]
struct Args {
    /// Directory holding title.ratings.tsv and title.basics.tsv [default: downloads folder]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// IMDb id of the series whose seasons are walked
    #[arg(long, default_value = DEFAULT_TITLE_ID)]
    title: String,

    /// Also scan title.basics.tsv and list the popular TV series
    #[arg(long)]
    join_basics: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();
    match run(args, ClientConfig::default()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Run aborted");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the whole workflow and print the report.
async fn run(args: Args, client_config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = build_report(&args, client_config).await?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        for line in report.text_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Scan the tables and walk the seasons of `args.title`.
///
/// File, table and page-structure errors abort the run. Network failures
/// while fetching seasons and empty aggregates are recorded in the report
/// instead.
async fn build_report(
    args: &Args,
    client_config: ClientConfig,
) -> Result<Report, Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(args.data_dir.clone())?;
    info!(path = %data_dir.display(), "Using data directory");

    let popular = load_popular_titles(data_dir.join(RATINGS_FILE))?;
    info!(count = popular.len(), threshold = VOTE_THRESHOLD, "Loaded popular titles");

    let mut report = Report::new(&args.title, popular.len());

    if args.join_basics {
        let basics = load_series_basics(data_dir.join(BASICS_FILE))?;
        report.shows = Some(join_shows(&popular, &basics));
    }

    let scraper = RatingsScraper::with_client(ImdbClient::with_config(client_config)?);
    let outcome = scraper
        .get_show_ratings(&args.title)
        .await
        .and_then(|seasons| summarize(&seasons).map(|summary| (seasons, summary)));

    match outcome {
        Ok((seasons, summary)) => {
            report.seasons = Some(seasons);
            report.summary = Some(summary);
        }
        Err(e) if !e.is_fatal() => {
            warn!(title_id = %args.title, error = %e, "Season ratings unavailable");
            report.error = Some(e);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(report)
}

/// Use the given directory, falling back to the user's downloads folder.
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, String> {
    explicit
        .or_else(|| UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf)))
        .ok_or_else(|| "Couldn't get downloads directory".to_string())
}
