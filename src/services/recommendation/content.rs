use crate::algorithms::SimilarityMatrix;
use crate::error::{RecommendError, Result};
use crate::models::ContentRecommendations;
use crate::services::catalog::Catalog;
use crate::services::posters::PosterStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Nearest neighbours of a restaurant in the precomputed similarity matrix.
pub struct ContentRecommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityMatrix>,
    posters: Arc<dyn PosterStore>,
    neighbors: usize,
}

impl ContentRecommender {
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityMatrix>,
        posters: Arc<dyn PosterStore>,
        neighbors: usize,
    ) -> Result<Self> {
        if similarity.len() != catalog.len() {
            return Err(RecommendError::DimensionMismatch {
                expected: catalog.len(),
                actual: similarity.len(),
            });
        }

        Ok(Self {
            catalog,
            similarity,
            posters,
            neighbors,
        })
    }

    pub fn similar_to(&self, restaurant_name: &str) -> Result<ContentRecommendations> {
        let index = self
            .catalog
            .position_of_name(restaurant_name)
            .ok_or_else(|| RecommendError::not_found(restaurant_name))?;

        let mut recommendations = ContentRecommendations {
            restaurant_ids: Vec::with_capacity(self.neighbors),
            names: Vec::with_capacity(self.neighbors),
            scores: Vec::with_capacity(self.neighbors),
            posters: Vec::with_capacity(self.neighbors),
        };

        for (position, score) in self.similarity.nearest_neighbors(index, self.neighbors)? {
            let Some(restaurant) = self.catalog.get(position) else {
                warn!("Similarity row {} has no catalog entry", position);
                continue;
            };

            let poster = match self.posters.get_poster(&restaurant.restaurant_id) {
                Ok(poster) => poster,
                Err(e) => {
                    warn!("Poster lookup failed for {}: {}", restaurant.restaurant_id, e);
                    None
                }
            };

            recommendations.restaurant_ids.push(restaurant.restaurant_id.clone());
            recommendations.names.push(restaurant.restaurant_name.clone());
            recommendations.scores.push(score);
            recommendations.posters.push(poster);
        }

        debug!(
            "Found {} restaurants similar to {}",
            recommendations.len(),
            restaurant_name
        );
        Ok(recommendations)
    }
}
