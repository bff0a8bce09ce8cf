//! HTML parsers for IMDb pages
//!
//! - `episodes`: Parse a season's episodes page into ratings and a
//!   next-season flag

pub mod episodes;

pub use episodes::{parse_rating, parse_season_ratings};
