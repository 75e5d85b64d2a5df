use thiserror::Error;

/// Errors raised by the recommendation core and its collaborators.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Restaurant not found: {key}")]
    RestaurantNotFound { key: String },

    #[error("Duplicate restaurant id in catalog: {id}")]
    DuplicateRestaurant { id: String },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Prediction failed for user {user_id} and restaurant {restaurant_id}: {reason}")]
    Prediction {
        user_id: String,
        restaurant_id: String,
        reason: String,
    },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl RecommendError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::RestaurantNotFound { key: key.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RestaurantNotFound { .. })
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRating(_) | Self::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
