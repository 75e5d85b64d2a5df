pub mod collaborative;
pub mod content;

pub use collaborative::CollaborativeRecommender;
pub use content::ContentRecommender;

use crate::algorithms::{RatingPredictor, SimilarityMatrix};
use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::models::*;
use crate::services::catalog::Catalog;
use crate::services::posters::PosterStore;
use std::sync::Arc;
use tracing::info;

/// Entry points for both recommendation techniques over shared, read-only
/// artifacts.
pub struct RecommendationService {
    collaborative: CollaborativeRecommender,
    content: ContentRecommender,
    default_top_n: usize,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityMatrix>,
        predictor: Arc<dyn RatingPredictor>,
        posters: Arc<dyn PosterStore>,
        config: &RecommendationConfig,
    ) -> Result<Self> {
        let content = ContentRecommender::new(
            catalog.clone(),
            similarity,
            posters,
            config.content_neighbors,
        )?;
        let collaborative = CollaborativeRecommender::new(catalog.clone(), predictor);

        info!(
            "Recommendation service ready over {} restaurants (top-n {}, {} neighbours)",
            catalog.len(),
            config.default_top_n,
            config.content_neighbors
        );

        Ok(Self {
            collaborative,
            content,
            default_top_n: config.default_top_n,
        })
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Collaborative-filtering recommendations; `n` falls back to the
    /// configured default.
    pub fn recommend_collaborative<I, S>(
        &self,
        user_id: &str,
        candidate_ids: I,
        filter: &FacetFilter,
        n: Option<usize>,
    ) -> RecommendationMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.collaborative
            .recommend(user_id, candidate_ids, filter, n.unwrap_or(self.default_top_n))
    }

    pub fn recommend_content_based(&self, restaurant_name: &str) -> Result<ContentRecommendations> {
        self.content.similar_to(restaurant_name)
    }
}
