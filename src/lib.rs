pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::config::Config;
pub use error::{RecommendError, Result};
pub use models::*;

use algorithms::{LatentFactorModel, RatingPredictor, SimilarityMatrix};
use services::catalog::Catalog;
use services::posters::{FsPosterStore, PosterStore};
use services::recommendation::RecommendationService;
use services::reviews::{CsvReviewLog, ReviewLog};
use services::serving::ServingService;
use std::sync::Arc;

/// Artifacts and services built once at process start and shared
/// read-only between request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub recommendation_service: Arc<RecommendationService>,
    pub serving_service: Arc<ServingService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let artifacts = &config.artifacts;

        let catalog = Arc::new(Catalog::load(&artifacts.catalog_path)?);
        let similarity = Arc::new(SimilarityMatrix::load(&artifacts.similarity_path)?);
        let predictor: Arc<dyn RatingPredictor> =
            Arc::new(LatentFactorModel::load(&artifacts.model_path)?);
        let posters: Arc<dyn PosterStore> = Arc::new(FsPosterStore::new(&artifacts.poster_dir));
        let review_log: Arc<dyn ReviewLog> = Arc::new(CsvReviewLog::new(&config.reviews.path));

        Self::from_parts(config, catalog, similarity, predictor, posters, review_log)
    }

    /// Wires already-loaded artifacts and collaborators together.
    pub fn from_parts(
        config: Arc<Config>,
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityMatrix>,
        predictor: Arc<dyn RatingPredictor>,
        posters: Arc<dyn PosterStore>,
        review_log: Arc<dyn ReviewLog>,
    ) -> anyhow::Result<Self> {
        let recommendation_service = Arc::new(RecommendationService::new(
            catalog.clone(),
            similarity,
            predictor,
            posters.clone(),
            &config.recommendation,
        )?);

        let serving_service = Arc::new(ServingService::new(
            catalog.clone(),
            recommendation_service.clone(),
            review_log,
            posters,
            config.clone(),
        ));

        Ok(Self {
            config,
            catalog,
            recommendation_service,
            serving_service,
        })
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
