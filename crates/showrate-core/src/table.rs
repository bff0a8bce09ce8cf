//! Tab-separated table scans
//!
//! Builds in-memory indexes from the IMDb dataset dumps
//! (`title.ratings.tsv`, `title.basics.tsv`) by streaming them through a
//! `LineReader`. Rows are parsed strictly: a malformed row stops the scan.

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ShowrateError};
use crate::reader::LineReader;
use crate::types::{RatedTitle, Show, TitleBasics};

/// Titles need strictly more votes than this to be kept
pub const VOTE_THRESHOLD: u64 = 100_000;

/// File name of the ratings dump
pub const RATINGS_FILE: &str = "title.ratings.tsv";

/// File name of the basics dump
pub const BASICS_FILE: &str = "title.basics.tsv";

/// Title type marking TV series in the basics table
const TV_SERIES: &str = "tvSeries";

/// Keep ratings rows with more than `threshold` votes, keyed by title id.
///
/// The first line is treated as the header and skipped. If an id appears
/// twice, the later row wins.
///
/// # Errors
/// - `ShowrateError::MalformedRow` if a row has fewer than 3 fields or a
///   non-numeric rating or vote count
/// - any reader error
pub fn scan_popular_titles<R: Read + Seek>(
    reader: &mut LineReader<R>,
    threshold: u64,
) -> Result<HashMap<String, RatedTitle>> {
    skip_header(reader)?;

    let mut titles = HashMap::new();
    while let Some(line) = reader.next_line()? {
        let line_number = reader.line_number();
        let fields = split_row(&line, line_number)?;

        let rating: f64 = fields[1].parse().map_err(|_| ShowrateError::MalformedRow {
            line_number,
            reason: format!("rating {:?} is not a number", fields[1]),
        })?;
        let num_votes: u64 = fields[2].parse().map_err(|_| ShowrateError::MalformedRow {
            line_number,
            reason: format!("vote count {:?} is not an integer", fields[2]),
        })?;
        if num_votes <= threshold {
            continue;
        }

        let id = fields[0].to_string();
        titles.insert(id.clone(), RatedTitle { id, rating });
    }

    debug!(kept = titles.len(), rows = reader.line_number(), "Scanned ratings table");
    Ok(titles)
}

/// Open the ratings dump at `path` and keep titles above `VOTE_THRESHOLD`.
pub fn load_popular_titles(path: impl AsRef<Path>) -> Result<HashMap<String, RatedTitle>> {
    let mut reader = LineReader::open(path)?;
    scan_popular_titles(&mut reader, VOTE_THRESHOLD)
}

/// Keep basics rows whose title type is `tvSeries`, keyed by title id.
///
/// # Errors
/// - `ShowrateError::MalformedRow` if a row has fewer than 3 fields
/// - any reader error
pub fn scan_series_basics<R: Read + Seek>(
    reader: &mut LineReader<R>,
) -> Result<HashMap<String, TitleBasics>> {
    skip_header(reader)?;

    let mut series = HashMap::new();
    while let Some(line) = reader.next_line()? {
        let fields = split_row(&line, reader.line_number())?;
        if fields[1] != TV_SERIES {
            continue;
        }

        let id = fields[0].to_string();
        let title = fields[2].to_string();
        series.insert(id.clone(), TitleBasics { id, title });
    }

    debug!(kept = series.len(), rows = reader.line_number(), "Scanned basics table");
    Ok(series)
}

/// Open the basics dump at `path` and keep TV series rows.
pub fn load_series_basics(path: impl AsRef<Path>) -> Result<HashMap<String, TitleBasics>> {
    let mut reader = LineReader::open(path)?;
    scan_series_basics(&mut reader)
}

/// Pair popular titles with their series basics, ordered by id.
///
/// Titles missing from `basics` (films, episodes, ...) are dropped.
pub fn join_shows(
    ratings: &HashMap<String, RatedTitle>,
    basics: &HashMap<String, TitleBasics>,
) -> Vec<Show> {
    let mut shows: Vec<Show> = ratings
        .values()
        .filter_map(|rated| {
            basics.get(&rated.id).map(|b| Show {
                id: rated.id.clone(),
                rating: rated.rating,
                title: b.title.clone(),
            })
        })
        .collect();
    shows.sort_by(|a, b| a.id.cmp(&b.id));
    shows
}

fn skip_header<R: Read + Seek>(reader: &mut LineReader<R>) -> Result<()> {
    if let Some(header) = reader.next_line()? {
        debug!(header = %header, "Skipped table header");
    }
    Ok(())
}

fn split_row(line: &str, line_number: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(ShowrateError::MalformedRow {
            line_number,
            reason: format!("expected at least 3 fields, found {}", fields.len()),
        });
    }
    Ok(fields)
}
