use crate::config::Config;
use crate::error::{RecommendError, Result};
use crate::models::*;
use crate::services::catalog::Catalog;
use crate::services::posters::PosterStore;
use crate::services::recommendation::RecommendationService;
use crate::services::reviews::ReviewLog;
use crate::utils::validation::{validate_rating, validate_top_n, validate_user_id};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    pub cuisine_types: Vec<String>,
    pub locations: Vec<String>,
    pub price_ranges: Vec<String>,
}

/// Request-level facade used by the HTTP and CLI front ends: validates
/// input, reproduces the dashboard's candidate pre-filtering and keeps
/// per-operation counters.
pub struct ServingService {
    catalog: Arc<Catalog>,
    recommendation_service: Arc<RecommendationService>,
    review_log: Arc<dyn ReviewLog>,
    posters: Arc<dyn PosterStore>,
    config: Arc<Config>,
    serving_stats: DashMap<String, u64>,
}

impl ServingService {
    pub fn new(
        catalog: Arc<Catalog>,
        recommendation_service: Arc<RecommendationService>,
        review_log: Arc<dyn ReviewLog>,
        posters: Arc<dyn PosterStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            catalog,
            recommendation_service,
            review_log,
            posters,
            config,
            serving_stats: DashMap::new(),
        }
    }

    pub fn serve_collaborative(
        &self,
        user_id: &str,
        filter: &FacetFilter,
        n: Option<usize>,
    ) -> Result<RecommendationMap> {
        let result = self.collaborative_inner(user_id, filter, n);
        self.record_outcome("collaborative_requests", &result);
        result
    }

    fn collaborative_inner(
        &self,
        user_id: &str,
        filter: &FacetFilter,
        n: Option<usize>,
    ) -> Result<RecommendationMap> {
        validate_user_id(user_id)?;
        let n = n.unwrap_or(self.recommendation_service.default_top_n());
        validate_top_n(n, self.config.recommendation.max_top_n)?;

        let start_time = Instant::now();
        let candidates = self
            .catalog
            .filter_by(filter)
            .into_iter()
            .map(|r| r.restaurant_id.as_str());
        let recommendations =
            self.recommendation_service
                .recommend_collaborative(user_id, candidates, filter, Some(n));

        info!(
            "Served {} collaborative recommendations for user {} in {}ms",
            recommendations.get(user_id).map_or(0, Vec::len),
            user_id,
            start_time.elapsed().as_millis()
        );
        Ok(recommendations)
    }

    pub fn serve_similar(&self, restaurant_name: &str) -> Result<ContentRecommendations> {
        let start_time = Instant::now();
        let result = self.recommendation_service.recommend_content_based(restaurant_name);
        self.record_outcome("content_requests", &result);

        if let Ok(recommendations) = &result {
            info!(
                "Served {} similar restaurants for {:?} in {}ms",
                recommendations.len(),
                restaurant_name,
                start_time.elapsed().as_millis()
            );
        }
        result
    }

    pub fn facets(&self) -> FacetOptions {
        FacetOptions {
            cuisine_types: self.catalog.facet_values(Facet::CuisineType),
            locations: self.catalog.facet_values(Facet::Location),
            price_ranges: self.catalog.facet_values(Facet::PriceRange),
        }
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.catalog.iter().cloned().collect()
    }

    pub fn submit_review(
        &self,
        user_id: &str,
        restaurant_name: &str,
        review_text: &str,
        rating: i64,
    ) -> Result<Review> {
        let result = self.submit_review_inner(user_id, restaurant_name, review_text, rating);
        self.record_outcome("reviews_submitted", &result);
        result
    }

    fn submit_review_inner(
        &self,
        user_id: &str,
        restaurant_name: &str,
        review_text: &str,
        rating: i64,
    ) -> Result<Review> {
        let rating = validate_rating(rating)?;
        if self.catalog.find_by_name(restaurant_name).is_none() {
            return Err(RecommendError::not_found(restaurant_name));
        }

        let review = Review::new(user_id, restaurant_name, review_text, rating);
        self.review_log.append(&review)?;
        Ok(review)
    }

    pub fn reviews(&self) -> Result<Vec<Review>> {
        self.review_log.read_all()
    }

    pub fn poster(&self, restaurant_id: &str) -> Result<Option<Poster>> {
        self.posters.get_poster(restaurant_id)
    }

    pub fn stats(&self) -> HashMap<String, u64> {
        self.serving_stats
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn increment_stat(&self, key: &str) {
        *self.serving_stats.entry(key.to_string()).or_insert(0) += 1;
    }

    fn record_outcome<T>(&self, key: &str, result: &Result<T>) {
        self.increment_stat(key);
        if let Err(e) = result {
            self.increment_stat("failed_requests");
            if e.is_not_found() || e.is_client_error() {
                info!("Rejected {} request: {}", key, e);
            } else {
                error!("Failed {} request: {}", key, e);
            }
        }
    }
}
