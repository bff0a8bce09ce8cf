//! Season ratings scraper
//!
//! Fetches a title's episodes pages one season at a time. Each page says
//! whether a next season exists, so the number of seasons is only known once
//! the last page has been fetched.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use crate::client::ImdbClient;
use crate::error::Result;
use crate::parser::parse_season_ratings;
use crate::types::{SeasonRatings, SeasonRatingsMap};

/// Title used when none is given (Lost, 2004)
pub const DEFAULT_TITLE_ID: &str = "tt0411008";

/// Anything that can produce one season's ratings for a title.
pub trait SeasonSource: Sync {
    /// Fetch ratings for `season` (1-based) of `title_id`.
    fn fetch_season(
        &self,
        title_id: &str,
        season: u32,
    ) -> impl Future<Output = Result<SeasonRatings>> + Send;
}

/// Path of a season's episodes page
pub fn episodes_path(title_id: &str, season: u32) -> String {
    format!("/title/{}/episodes?season={}", title_id, season)
}

/// Collect ratings for every season of `title_id`, starting at season 1.
///
/// Seasons are fetched strictly in order and the walk stops at the first page
/// without a next-season link. The first failed fetch aborts the walk and no
/// partial map is returned.
pub async fn collect_season_ratings<S: SeasonSource>(
    source: &S,
    title_id: &str,
) -> Result<SeasonRatingsMap> {
    info!(title_id = %title_id, "Collecting season ratings");
    let collected = collect_from(source, title_id, 1, SeasonRatingsMap::new()).await?;
    info!(title_id = %title_id, seasons = collected.len(), "Collected season ratings");
    Ok(collected)
}

/// One step of the walk: fetch `season`, add it to `collected`, then continue
/// with the next season or finish.
fn collect_from<'a, S: SeasonSource>(
    source: &'a S,
    title_id: &'a str,
    season: u32,
    mut collected: SeasonRatingsMap,
) -> Pin<Box<dyn Future<Output = Result<SeasonRatingsMap>> + Send + 'a>> {
    Box::pin(async move {
        let page = source.fetch_season(title_id, season).await?;
        debug!(
            season,
            episodes = page.ratings.len(),
            has_next_season = page.has_next_season,
            "Fetched season"
        );

        collected.insert(season, page.ratings);
        if page.has_next_season {
            collect_from(source, title_id, season + 1, collected).await
        } else {
            Ok(collected)
        }
    })
}

/// Main scraper API for IMDb season ratings
///
/// # Example
/// ```no_run
/// use showrate_core::RatingsScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = RatingsScraper::new()?;
///     let seasons = scraper.get_show_ratings("tt0411008").await?;
///     println!("Found {} seasons", seasons.len());
///     Ok(())
/// }
/// ```
pub struct RatingsScraper {
    client: ImdbClient,
}

impl RatingsScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = ImdbClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with a custom client.
    pub fn with_client(client: ImdbClient) -> Self {
        Self { client }
    }

    /// Get the episode ratings of one season.
    ///
    /// # Returns
    /// * `Ok(SeasonRatings)` with ratings and the next-season flag
    /// * `Err(ShowrateError::Fetch)` if the request fails or is not 2xx
    /// * `Err(ShowrateError::RatingParse)` if the page structure is unexpected
    pub async fn get_season_ratings(&self, title_id: &str, season: u32) -> Result<SeasonRatings> {
        let html = self.client.fetch(&episodes_path(title_id, season)).await?;
        parse_season_ratings(&html)
    }

    /// Get the episode ratings of every season, keyed by season number.
    pub async fn get_show_ratings(&self, title_id: &str) -> Result<SeasonRatingsMap> {
        collect_season_ratings(self, title_id).await
    }
}

impl SeasonSource for RatingsScraper {
    async fn fetch_season(&self, title_id: &str, season: u32) -> Result<SeasonRatings> {
        self.get_season_ratings(title_id, season).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShowrateError;
    use std::sync::Mutex;

    enum FakePage {
        Page(SeasonRatings),
        Fail,
    }

    /// Serves canned pages by season and records every request.
    struct FakeSource {
        pages: Vec<FakePage>,
        requested: Mutex<Vec<u32>>,
    }

    impl FakeSource {
        fn new(pages: Vec<FakePage>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl SeasonSource for FakeSource {
        async fn fetch_season(&self, _title_id: &str, season: u32) -> Result<SeasonRatings> {
            self.requested.lock().unwrap().push(season);
            match self.pages.get(season as usize - 1) {
                Some(FakePage::Page(page)) => Ok(page.clone()),
                Some(FakePage::Fail) => {
                    let url = format!("not a url/season={}", season);
                    let source = reqwest::Client::new().get(url.as_str()).build().unwrap_err();
                    Err(ShowrateError::Fetch { url, source })
                }
                None => panic!("season {} requested past the last page", season),
            }
        }
    }

    fn page(ratings: &[f64], has_next_season: bool) -> FakePage {
        FakePage::Page(SeasonRatings::new(ratings.to_vec(), has_next_season))
    }

    #[test]
    fn test_episodes_path() {
        assert_eq!(episodes_path("tt0411008", 3), "/title/tt0411008/episodes?season=3");
    }

    #[tokio::test]
    async fn test_stops_when_continuation_is_false() {
        let source = FakeSource::new(vec![
            page(&[8.0, 9.0], true),
            page(&[6.0], true),
            page(&[7.5, 7.0, 8.5], false),
        ]);

        let seasons = collect_season_ratings(&source, "tt1").await.unwrap();

        assert_eq!(seasons.len(), 3);
        assert_eq!(seasons[&1], vec![8.0, 9.0]);
        assert_eq!(seasons[&2], vec![6.0]);
        assert_eq!(seasons[&3], vec![7.5, 7.0, 8.5]);
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_single_season_show() {
        let source = FakeSource::new(vec![page(&[9.2], false)]);
        let seasons = collect_season_ratings(&source, "tt1").await.unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_seasons() {
        let source = FakeSource::new(vec![
            page(&[8.0], true),
            FakePage::Fail,
            page(&[7.0], false),
        ]);

        let result = collect_season_ratings(&source, "tt1").await;

        match result {
            Err(ShowrateError::Fetch { url, .. }) => assert!(url.ends_with("season=2")),
            _ => panic!("Expected Fetch error"),
        }
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_season_page_is_kept() {
        let source = FakeSource::new(vec![page(&[8.0], true), page(&[], false)]);
        let seasons = collect_season_ratings(&source, "tt1").await.unwrap();
        assert_eq!(seasons[&2], Vec::<f64>::new());
    }
}
