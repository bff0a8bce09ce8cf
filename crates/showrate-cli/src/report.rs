//! Output of a showrate run, as plain text or JSON

use serde::Serialize;
use showrate_core::{RatingSummary, SeasonRatingsMap, ShowrateError, Show};

/// Everything a run produced
#[derive(Debug, Serialize)]
pub struct Report {
    pub title_id: String,
    pub popular_titles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shows: Option<Vec<Show>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<SeasonRatingsMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RatingSummary>,
    /// Failure of the season fetch chain, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ShowrateError>,
}

impl Report {
    pub fn new(title_id: impl Into<String>, popular_titles: usize) -> Self {
        Self {
            title_id: title_id.into(),
            popular_titles,
            shows: None,
            seasons: None,
            summary: None,
            error: None,
        }
    }

    /// Human-readable lines, in the order they should be printed
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Popular titles: {}", self.popular_titles)];

        if let Some(shows) = &self.shows {
            lines.push(format!("Popular TV series: {}", shows.len()));
            lines.extend(
                shows
                    .iter()
                    .map(|show| format!("  {} {} ({:.1})", show.id, show.title, show.rating)),
            );
        }

        if let Some(seasons) = &self.seasons {
            for (season, ratings) in seasons {
                let ratings: Vec<String> = ratings.iter().map(|r| r.to_string()).collect();
                lines.push(format!("Season {}: [{}]", season, ratings.join(", ")));
            }
        }

        if let Some(summary) = &self.summary {
            lines.push(format!("Season-based average: {}", summary.season_based_average));
            lines.push(format!("Episodic average: {}", summary.episode_based_average));
        }

        if let Some(error) = &self.error {
            lines.push(format!("Error getting season ratings for show: {}", error));
        }

        lines
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
