//! Data types for showrate
//!
//! All types implement Serialize and Deserialize so results can be reported
//! as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A title from the ratings table that passed the vote threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedTitle {
    /// IMDb identifier (e.g. "tt0411008")
    pub id: String,
    /// Average user rating (0.0 - 10.0)
    pub rating: f64,
}

/// A TV series row from the basics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleBasics {
    pub id: String,
    pub title: String,
}

/// A popular series with both its rating and its title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub rating: f64,
    pub title: String,
}

/// Ratings scraped from one season's episodes page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonRatings {
    /// One rating per episode, in page order
    pub ratings: Vec<f64>,
    /// Whether the page links to a following season
    pub has_next_season: bool,
}

impl SeasonRatings {
    pub fn new(ratings: Vec<f64>, has_next_season: bool) -> Self {
        Self {
            ratings,
            has_next_season,
        }
    }
}

/// Episode ratings keyed by 1-based season number
pub type SeasonRatingsMap = BTreeMap<u32, Vec<f64>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rated_title_serialization() {
        let title = RatedTitle {
            id: "tt0411008".to_string(),
            rating: 8.3,
        };
        let json = serde_json::to_string(&title).unwrap();
        assert_eq!(json, r#"{"id":"tt0411008","rating":8.3}"#);
    }

    #[test]
    fn test_season_ratings_default_is_final() {
        let season = SeasonRatings::default();
        assert!(season.ratings.is_empty());
        assert!(!season.has_next_season);
    }

    #[test]
    fn test_season_map_orders_by_season_number() {
        let mut map = SeasonRatingsMap::new();
        map.insert(10, vec![7.0]);
        map.insert(2, vec![8.0]);
        map.insert(1, vec![9.0]);
        let seasons: Vec<u32> = map.keys().copied().collect();
        assert_eq!(seasons, vec![1, 2, 10]);
    }

    #[test]
    fn test_season_map_json_uses_string_keys() {
        let mut map = SeasonRatingsMap::new();
        map.insert(1, vec![8.0, 9.0]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1":[8.0,9.0]}"#);
    }
}
