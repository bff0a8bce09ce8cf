//! Showrate Core Library
//!
//! Finds popular titles in the IMDb dataset dumps and measures how a series'
//! episode ratings hold up season by season.
//!
//! # Features
//! - Stream multi-gigabyte TSV dumps line by line in bounded memory
//! - Filter titles by vote count and join them with series basics
//! - Walk a series' episodes pages season by season
//! - Season-based and episode-based rating averages

pub mod client;
pub mod error;
pub mod parser;
pub mod reader;
pub mod scraper;
pub mod summary;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, ImdbClient};
pub use error::{Result, ShowrateError};
pub use reader::{Encoding, LineReader, ReaderOptions};
pub use scraper::{collect_season_ratings, RatingsScraper, SeasonSource, DEFAULT_TITLE_ID};
pub use summary::{summarize, RatingSummary};
pub use table::{
    join_shows, load_popular_titles, load_series_basics, scan_popular_titles, scan_series_basics,
    BASICS_FILE, RATINGS_FILE, VOTE_THRESHOLD,
};
pub use types::{RatedTitle, SeasonRatings, SeasonRatingsMap, Show, TitleBasics};
