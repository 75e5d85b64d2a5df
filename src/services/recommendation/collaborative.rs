use crate::algorithms::{rank_top_n, RatingPredictor};
use crate::models::*;
use crate::services::catalog::Catalog;
use std::sync::Arc;
use tracing::{debug, warn};

/// Scores facet-filtered candidates for a user with a rating predictor and
/// returns the enriched top-N.
pub struct CollaborativeRecommender {
    catalog: Arc<Catalog>,
    predictor: Arc<dyn RatingPredictor>,
}

impl CollaborativeRecommender {
    pub fn new(catalog: Arc<Catalog>, predictor: Arc<dyn RatingPredictor>) -> Self {
        Self { catalog, predictor }
    }

    /// Unknown candidate ids, facet mismatches and failed predictions are
    /// skipped. The result always contains `user_id`, possibly with an
    /// empty list.
    pub fn recommend<I, S>(
        &self,
        user_id: &str,
        candidate_ids: I,
        filter: &FacetFilter,
        n: usize,
    ) -> RecommendationMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut predictions = Vec::new();

        for candidate in candidate_ids {
            let restaurant_id = candidate.as_ref();
            let Some(restaurant) = self.catalog.find_by_id(restaurant_id) else {
                debug!("Skipping unknown candidate {}", restaurant_id);
                continue;
            };

            if !filter.matches(restaurant) {
                continue;
            }

            match self.predictor.predict(user_id, restaurant_id) {
                Ok(estimate) if estimate.is_finite() => {
                    predictions.push(PredictionResult::new(user_id, restaurant_id, estimate));
                }
                Ok(estimate) => {
                    warn!(
                        "Excluding {} for user {}: non-finite estimate {}",
                        restaurant_id, user_id, estimate
                    );
                }
                Err(e) => {
                    warn!("Excluding {} for user {}: {}", restaurant_id, user_id, e);
                }
            }
        }

        let mut recommendations = RecommendationMap::new();
        recommendations.insert(user_id.to_string(), Vec::new());

        if predictions.is_empty() {
            debug!("No candidates survived filtering for user {}", user_id);
            return recommendations;
        }

        for (uid, ranked) in rank_top_n(predictions, n) {
            let enriched = ranked
                .iter()
                .filter_map(|prediction| {
                    self.catalog
                        .find_by_id(&prediction.restaurant_id)
                        .map(|restaurant| RankedRecommendation::from_prediction(prediction, restaurant))
                })
                .collect();
            recommendations.insert(uid, enriched);
        }

        recommendations
    }
}
