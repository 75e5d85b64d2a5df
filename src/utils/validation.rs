use crate::error::{RecommendError, Result};
use crate::models::*;

pub const MAX_REVIEW_LENGTH: usize = 5000;

pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(RecommendError::Validation("User ID cannot be empty".to_string()));
    }

    if user_id.chars().count() > 100 {
        return Err(RecommendError::Validation(
            "User ID too long (max 100 characters)".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_top_n(n: usize, max_top_n: usize) -> Result<()> {
    if n == 0 {
        return Err(RecommendError::Validation(
            "Number of recommendations must be greater than 0".to_string(),
        ));
    }

    if n > max_top_n {
        return Err(RecommendError::Validation(format!(
            "Number of recommendations too large: {} (max {})",
            n, max_top_n
        )));
    }

    Ok(())
}

pub fn validate_rating(rating: i64) -> Result<u8> {
    if !(1..=5).contains(&rating) {
        return Err(RecommendError::InvalidRating(rating));
    }
    Ok(rating as u8)
}

pub fn validate_review(review: &Review) -> Result<()> {
    validate_user_id(&review.user_id)?;
    validate_rating(i64::from(review.rating))?;

    if review.restaurant_name.is_empty() {
        return Err(RecommendError::Validation(
            "Restaurant name cannot be empty".to_string(),
        ));
    }

    if review.review_text.chars().count() > MAX_REVIEW_LENGTH {
        return Err(RecommendError::Validation(format!(
            "Review too long (max {} characters)",
            MAX_REVIEW_LENGTH
        )));
    }

    Ok(())
}

pub fn validate_model_parameters(params: &ModelParameters) -> Result<()> {
    if !params.global_mean.is_finite() {
        return Err(RecommendError::InvalidArtifact(
            "Global mean must be finite".to_string(),
        ));
    }

    let (low, high) = params.rating_scale;
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(RecommendError::InvalidArtifact(format!(
            "Invalid rating scale ({}, {})",
            low, high
        )));
    }

    for (kind, rows) in [("user", &params.users), ("item", &params.items)] {
        for (id, row) in rows {
            if !row.bias.is_finite() || row.factors.iter().any(|w| !w.is_finite()) {
                return Err(RecommendError::InvalidArtifact(format!(
                    "{} factors for {} contain invalid values",
                    kind, id
                )));
            }
        }
    }

    Ok(())
}
