use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A restaurant record as stored in the catalog artifact, before facet
/// normalization. Facet fields may be scalars or lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRestaurant {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub cuisine_type: serde_json::Value,
    pub location: serde_json::Value,
    pub price_range: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub cuisine_type: String,
    pub location: String,
    pub price_range: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    CuisineType,
    Location,
    PriceRange,
}

impl Restaurant {
    pub fn new(
        restaurant_id: impl Into<String>,
        restaurant_name: impl Into<String>,
        cuisine_type: impl Into<String>,
        location: impl Into<String>,
        price_range: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            restaurant_name: restaurant_name.into(),
            cuisine_type: cuisine_type.into(),
            location: location.into(),
            price_range: price_range.into(),
        }
    }

    pub fn facet(&self, facet: Facet) -> &str {
        match facet {
            Facet::CuisineType => &self.cuisine_type,
            Facet::Location => &self.location,
            Facet::PriceRange => &self.price_range,
        }
    }
}

/// Optional exact-match constraints over the normalized facet fields.
/// Absent predicates impose no constraint; present ones compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilter {
    pub cuisine_type: Option<String>,
    pub location: Option<String>,
    pub price_range: Option<String>,
}

impl FacetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from picker selections, treating `all_sentinel`
    /// (and blank input) as "no constraint".
    pub fn from_selection(
        cuisine_type: Option<String>,
        location: Option<String>,
        price_range: Option<String>,
        all_sentinel: &str,
    ) -> Self {
        let pick = |value: Option<String>| value.filter(|v| !v.is_empty() && v != all_sentinel);
        Self {
            cuisine_type: pick(cuisine_type),
            location: pick(location),
            price_range: pick(price_range),
        }
    }

    pub fn with_cuisine_type(mut self, cuisine_type: impl Into<String>) -> Self {
        self.cuisine_type = Some(cuisine_type.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.price_range = Some(price_range.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cuisine_type.is_none() && self.location.is_none() && self.price_range.is_none()
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        fn check(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().map_or(true, |w| w == actual)
        }

        check(&self.cuisine_type, &restaurant.cuisine_type)
            && check(&self.location, &restaurant.location)
            && check(&self.price_range, &restaurant.price_range)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub user_id: String,
    pub restaurant_id: String,
    pub estimated_rating: f32,
}

impl PredictionResult {
    pub fn new(user_id: impl Into<String>, restaurant_id: impl Into<String>, estimated_rating: f32) -> Self {
        Self {
            user_id: user_id.into(),
            restaurant_id: restaurant_id.into(),
            estimated_rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub restaurant_id: String,
    pub estimated_rating: f32,
    pub restaurant_name: String,
    pub cuisine_type: String,
    pub location: String,
    pub price_range: String,
}

impl RankedRecommendation {
    pub fn from_prediction(prediction: &PredictionResult, restaurant: &Restaurant) -> Self {
        Self {
            restaurant_id: prediction.restaurant_id.clone(),
            estimated_rating: prediction.estimated_rating,
            restaurant_name: restaurant.restaurant_name.clone(),
            cuisine_type: restaurant.cuisine_type.clone(),
            location: restaurant.location.clone(),
            price_range: restaurant.price_range.clone(),
        }
    }
}

/// Collaborative results keyed by the requesting user.
pub type RecommendationMap = HashMap<String, Vec<RankedRecommendation>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poster {
    pub restaurant_id: String,
    pub content_type: String,
    pub data: Arc<Vec<u8>>,
}

/// Parallel sequences: `posters[i]` belongs to `names[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecommendations {
    pub restaurant_ids: Vec<String>,
    pub names: Vec<String>,
    pub scores: Vec<f32>,
    pub posters: Vec<Option<Poster>>,
}

impl ContentRecommendations {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: String,
    pub restaurant_name: String,
    pub review_text: String,
    pub rating: u8,
}

impl Review {
    pub fn new(
        user_id: impl Into<String>,
        restaurant_name: impl Into<String>,
        review_text: impl Into<String>,
        rating: u8,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            restaurant_name: restaurant_name.into(),
            review_text: review_text.into(),
            rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatentFactors {
    #[serde(default)]
    pub bias: f32,
    pub factors: Vec<f32>,
}

/// Serialized parameters of a pretrained latent-factor model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    pub global_mean: f32,
    #[serde(default = "default_rating_scale")]
    pub rating_scale: (f32, f32),
    #[serde(default)]
    pub users: HashMap<String, LatentFactors>,
    #[serde(default)]
    pub items: HashMap<String, LatentFactors>,
}

fn default_rating_scale() -> (f32, f32) {
    (1.0, 5.0)
}
