//! Reviews and the running rating aggregate kept on every listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{MarketplaceError, MarketplaceResult};
use crate::ownership::Actor;

/// A single buyer review. Never edited or removed once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    /// Reviewer display name
    pub name: String,
    /// Reviewer id (JWT subject)
    pub user: String,
    /// 1 to 5
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(reviewer: &Actor, input: ReviewInput) -> Self {
        Self {
            name: reviewer.name.clone(),
            user: reviewer.id.clone(),
            rating: input.rating,
            comment: input.comment,
            created_at: Utc::now(),
        }
    }
}

/// Body of `POST /{category}/{id}/reviews`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReviewInput {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub rating: i32,
    #[serde(default)]
    #[schema(example = "Germinated well")]
    pub comment: String,
}

/// Review list plus its aggregate, flattened into each listing document.
///
/// `num_reviews == reviews.len()` and `rating == rating_sum / num_reviews`
/// (0.0 with no reviews) hold after every [`ReviewLog::append`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewLog {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_sum: i64,
}

impl Default for ReviewLog {
    fn default() -> Self {
        Self {
            reviews: Vec::new(),
            num_reviews: 0,
            rating: 0.0,
            rating_sum: 0,
        }
    }
}

impl ReviewLog {
    pub fn has_reviewer(&self, user: &str) -> bool {
        self.reviews.iter().any(|r| r.user == user)
    }

    /// Appends `review` and folds it into the aggregate.
    ///
    /// Leaves the log untouched and returns [`MarketplaceError::DuplicateReview`]
    /// if the reviewer already has a review here.
    pub fn append(&mut self, review: Review) -> MarketplaceResult<()> {
        if self.has_reviewer(&review.user) {
            return Err(MarketplaceError::DuplicateReview);
        }

        self.rating_sum += i64::from(review.rating);
        self.reviews.push(review);
        self.num_reviews = self.reviews.len() as u32;
        self.rating = self.rating_sum as f64 / f64::from(self.num_reviews);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str) -> Actor {
        Actor {
            id: id.to_string(),
            name: format!("User {id}"),
        }
    }

    fn review(id: &str, rating: i32) -> Review {
        Review::new(
            &actor(id),
            ReviewInput {
                rating,
                comment: String::new(),
            },
        )
    }

    #[test]
    fn test_empty_log_has_zero_rating() {
        let log = ReviewLog::default();
        assert_eq!(log.num_reviews, 0);
        assert_eq!(log.rating, 0.0);
        assert!(!log.has_reviewer("a"));
    }

    #[test]
    fn test_running_average_and_duplicate_rejection() {
        let mut log = ReviewLog::default();

        log.append(review("a", 4)).unwrap();
        assert_eq!(log.num_reviews, 1);
        assert!((log.rating - 4.0).abs() < f64::EPSILON);

        log.append(review("b", 2)).unwrap();
        assert_eq!(log.num_reviews, 2);
        assert!((log.rating - 3.0).abs() < f64::EPSILON);

        let before = log.clone();
        let err = log.append(review("a", 5)).unwrap_err();
        assert!(matches!(err, MarketplaceError::DuplicateReview));
        assert_eq!(log, before);
    }

    #[test]
    fn test_aggregate_matches_mean_of_ratings() {
        let mut log = ReviewLog::default();
        for (i, rating) in [5, 1, 3, 4, 4, 2].into_iter().enumerate() {
            log.append(review(&format!("u{i}"), rating)).unwrap();
        }

        let mean = log.reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>()
            / log.reviews.len() as f64;
        assert_eq!(log.num_reviews as usize, log.reviews.len());
        assert!((log.rating - mean).abs() < 1e-9);
        assert_eq!(log.rating_sum, 19);
    }

    #[test]
    fn test_review_records_reviewer_identity() {
        let r = review("farmer-7", 5);
        assert_eq!(r.user, "farmer-7");
        assert_eq!(r.name, "User farmer-7");
    }

    #[test]
    fn test_review_input_range() {
        let input = |rating| ReviewInput {
            rating,
            comment: String::new(),
        };
        assert!(input(1).validate().is_ok());
        assert!(input(5).validate().is_ok());
        assert!(input(0).validate().is_err());
        assert!(input(6).validate().is_err());
    }

    #[test]
    fn test_missing_aggregate_fields_deserialize_to_defaults() {
        let log: ReviewLog = serde_json::from_str("{}").unwrap();
        assert_eq!(log, ReviewLog::default());
    }
}
