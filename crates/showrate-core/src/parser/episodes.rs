//! Episodes page parser for IMDb
//!
//! Parses `/title/{id}/episodes?season={n}` pages. Each episode carries a
//! rating widget where the vote total follows the rating span:
//!
//! ```html
//! <div class="ipl-rating-star small">
//!   <span class="ipl-rating-star__star"></span>
//!   <span class="ipl-rating-star__rating">8.4</span>
//!   <span class="ipl-rating-star__total-votes">(3,215)</span>
//! </div>
//! ```
//!
//! The page structure is treated as fixed; anything unexpected is an error.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ShowrateError};
use crate::types::SeasonRatings;

/// Vote total element, one per rated episode
const VOTE_TOTAL_SELECTOR: &str = ".ipl-rating-star__total-votes";

/// "Next season" control; it only has an href when another season exists
const NEXT_SEASON_SELECTOR: &str = "#load_next_episodes";

/// Parse a season's episodes page.
///
/// # Arguments
/// * `html` - Raw HTML content of the episodes page
///
/// # Returns
/// * `Ok(SeasonRatings)` with ratings in page order
/// * `Err(ShowrateError::RatingParse)` if a vote total has no preceding
///   sibling element or that sibling's text is not a rating
pub fn parse_season_ratings(html: &str) -> Result<SeasonRatings> {
    let document = Html::parse_document(html);
    let vote_totals = selector(VOTE_TOTAL_SELECTOR)?;

    let mut ratings = Vec::new();
    for (index, vote_total) in document.select(&vote_totals).enumerate() {
        let rating_element = vote_total
            .prev_siblings()
            .find_map(ElementRef::wrap)
            .ok_or_else(|| {
                ShowrateError::RatingParse(format!(
                    "vote total #{} has no preceding sibling element",
                    index + 1
                ))
            })?;

        let text = rating_element.text().collect::<String>();
        let rating = parse_rating(&text).ok_or_else(|| {
            ShowrateError::RatingParse(format!(
                "episode #{} rating {:?} is not a number",
                index + 1,
                text.trim()
            ))
        })?;
        ratings.push(rating);
    }

    let next_season = selector(NEXT_SEASON_SELECTOR)?;
    let has_next_season = document
        .select(&next_season)
        .next()
        .and_then(|el| el.value().attr("href"))
        .is_some();

    Ok(SeasonRatings::new(ratings, has_next_season))
}

/// Parse rating text such as "8.4" (surrounding whitespace allowed).
///
/// # Returns
/// * `Some(rating)` if the text is a number between 0.0 and 10.0
/// * `None` otherwise
///
/// # Examples
/// ```
/// use showrate_core::parser::parse_rating;
///
/// assert_eq!(parse_rating(" 8.4 "), Some(8.4));
/// assert_eq!(parse_rating("10"), Some(10.0));
/// assert_eq!(parse_rating("N/A"), None);
/// ```
pub fn parse_rating(text: &str) -> Option<f64> {
    let rating: f64 = text.trim().parse().ok()?;
    (0.0..=10.0).contains(&rating).then_some(rating)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ShowrateError::RatingParse(format!("invalid selector {}: {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(rating: &str) -> String {
        format!(
            r#"<div class="list_item"><div class="ipl-rating-star small">
                <span class="ipl-rating-star__star"></span>
                <span class="ipl-rating-star__rating">{}</span>
                <span class="ipl-rating-star__total-votes">(1,024)</span>
            </div></div>"#,
            rating
        )
    }

    fn page(episodes: &[String], next_link: &str) -> String {
        format!(
            "<html><body><div class=\"list detail eplist\">{}</div>{}</body></html>",
            episodes.join(""),
            next_link
        )
    }

    #[test]
    fn test_parse_ratings_in_page_order() {
        let html = page(&[episode("8.4"), episode("9.1"), episode("7.0")], "");
        let season = parse_season_ratings(&html).unwrap();
        assert_eq!(season.ratings, vec![8.4, 9.1, 7.0]);
    }

    #[test]
    fn test_next_season_link_sets_continuation() {
        let html = page(
            &[episode("8.0")],
            r#"<a href="/title/tt0411008/episodes?season=2" id="load_next_episodes">Season 2</a>"#,
        );
        assert!(parse_season_ratings(&html).unwrap().has_next_season);
    }

    #[test]
    fn test_next_season_without_href_is_final() {
        let html = page(&[episode("8.0")], r#"<a id="load_next_episodes">Season 2</a>"#);
        assert!(!parse_season_ratings(&html).unwrap().has_next_season);
    }

    #[test]
    fn test_missing_next_season_control_is_final() {
        let html = page(&[episode("8.0")], "");
        assert!(!parse_season_ratings(&html).unwrap().has_next_season);
    }

    #[test]
    fn test_page_without_episodes_is_empty() {
        let season = parse_season_ratings("<html><body></body></html>").unwrap();
        assert!(season.ratings.is_empty());
        assert!(!season.has_next_season);
    }

    #[test]
    fn test_vote_total_without_sibling_is_error() {
        let html = r#"<div><span class="ipl-rating-star__total-votes">(10)</span></div>"#;
        match parse_season_ratings(html) {
            Err(ShowrateError::RatingParse(msg)) => assert!(msg.contains("no preceding sibling")),
            _ => panic!("Expected RatingParse error"),
        }
    }

    #[test]
    fn test_non_numeric_rating_is_error() {
        let html = page(&[episode("8.2"), episode("soon")], "");
        match parse_season_ratings(&html) {
            Err(ShowrateError::RatingParse(msg)) => {
                assert!(msg.contains("episode #2"));
                assert!(msg.contains("soon"));
            }
            _ => panic!("Expected RatingParse error"),
        }
    }

    #[test]
    fn test_parse_rating_values() {
        assert_eq!(parse_rating("8.4"), Some(8.4));
        assert_eq!(parse_rating("\n  7.25\t"), Some(7.25));
        assert_eq!(parse_rating("0"), Some(0.0));
        assert_eq!(parse_rating("10.0"), Some(10.0));
    }

    #[test]
    fn test_parse_rating_invalid() {
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("8,4"), None);
        assert_eq!(parse_rating("11.5"), None);
        assert_eq!(parse_rating("NaN"), None);
    }
}
