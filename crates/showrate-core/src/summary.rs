//! Rating statistics over collected seasons

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowrateError};
use crate::types::SeasonRatingsMap;

/// Averages computed from a show's season ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean of the per-season means; every season weighs the same
    pub season_based_average: f64,
    /// Mean over all episodes; long seasons weigh more
    pub episode_based_average: f64,
    pub season_count: usize,
    pub episode_count: usize,
}

/// Compute season-based and episode-based averages.
///
/// # Errors
/// - `ShowrateError::EmptyAggregate` if there are no seasons, or if any
///   season has no ratings (its own mean would be undefined)
pub fn summarize(seasons: &SeasonRatingsMap) -> Result<RatingSummary> {
    if seasons.is_empty() {
        return Err(ShowrateError::EmptyAggregate("no seasons collected".to_string()));
    }

    let mut season_means = Vec::with_capacity(seasons.len());
    for (season, ratings) in seasons {
        let season_mean = mean(ratings)
            .ok_or_else(|| ShowrateError::EmptyAggregate(format!("season {} has no ratings", season)))?;
        season_means.push(season_mean);
    }

    let episodes: Vec<f64> = seasons.values().flatten().copied().collect();
    let episode_based_average = mean(&episodes)
        .ok_or_else(|| ShowrateError::EmptyAggregate("no episodes collected".to_string()))?;
    let season_based_average = mean(&season_means)
        .ok_or_else(|| ShowrateError::EmptyAggregate("no seasons collected".to_string()))?;

    Ok(RatingSummary {
        season_based_average,
        episode_based_average,
        season_count: seasons.len(),
        episode_count: episodes.len(),
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
