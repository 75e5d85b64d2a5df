pub mod ranker;
pub mod similarity;

pub use ranker::rank_top_n;
pub use similarity::SimilarityMatrix;

use crate::error::{RecommendError, Result};
use crate::models::{LatentFactors, ModelParameters};
use nalgebra::DVector;
use std::collections::HashMap;
use std::path::Path;

/// Estimates how a user would rate a restaurant.
pub trait RatingPredictor: Send + Sync {
    fn predict(&self, user_id: &str, restaurant_id: &str) -> Result<f32>;
}

impl<F> RatingPredictor for F
where
    F: Fn(&str, &str) -> Result<f32> + Send + Sync,
{
    fn predict(&self, user_id: &str, restaurant_id: &str) -> Result<f32> {
        self(user_id, restaurant_id)
    }
}

#[derive(Debug, Clone)]
struct FactorRow {
    bias: f32,
    factors: DVector<f32>,
}

/// Biased matrix-factorization predictor loaded from pretrained parameters.
///
/// `r̂(u, i) = μ + b_u + b_i + p_u · q_i`, where an unknown user or item
/// contributes neither a bias nor the interaction term. Estimates are
/// clipped to the model's rating scale.
#[derive(Debug, Clone)]
pub struct LatentFactorModel {
    global_mean: f32,
    rating_scale: (f32, f32),
    user_factors: HashMap<String, FactorRow>,
    item_factors: HashMap<String, FactorRow>,
    embedding_dim: usize,
}

impl LatentFactorModel {
    pub fn from_parameters(parameters: ModelParameters) -> Result<Self> {
        crate::utils::validation::validate_model_parameters(&parameters)?;

        let embedding_dim = parameters
            .users
            .values()
            .chain(parameters.items.values())
            .map(|row| row.factors.len())
            .next()
            .unwrap_or(0);

        let to_rows = |rows: HashMap<String, LatentFactors>| -> Result<HashMap<String, FactorRow>> {
            rows.into_iter()
                .map(|(id, row)| {
                    if row.factors.len() != embedding_dim {
                        return Err(RecommendError::DimensionMismatch {
                            expected: embedding_dim,
                            actual: row.factors.len(),
                        });
                    }
                    Ok((
                        id,
                        FactorRow {
                            bias: row.bias,
                            factors: DVector::from_vec(row.factors),
                        },
                    ))
                })
                .collect()
        };

        let user_factors = to_rows(parameters.users)?;
        let item_factors = to_rows(parameters.items)?;

        Ok(Self {
            global_mean: parameters.global_mean,
            rating_scale: parameters.rating_scale,
            user_factors,
            item_factors,
            embedding_dim,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let parameters: ModelParameters = serde_json::from_reader(std::io::BufReader::new(file))?;
        let model = Self::from_parameters(parameters)?;
        tracing::info!(
            "Loaded latent-factor model from {} ({} users, {} items, dim {})",
            path.as_ref().display(),
            model.user_factors.len(),
            model.item_factors.len(),
            model.embedding_dim()
        );
        Ok(model)
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    pub fn knows_user(&self, user_id: &str) -> bool {
        self.user_factors.contains_key(user_id)
    }

    pub fn knows_item(&self, restaurant_id: &str) -> bool {
        self.item_factors.contains_key(restaurant_id)
    }
}

impl RatingPredictor for LatentFactorModel {
    fn predict(&self, user_id: &str, restaurant_id: &str) -> Result<f32> {
        let user = self.user_factors.get(user_id);
        let item = self.item_factors.get(restaurant_id);

        let mut estimate = self.global_mean;
        if let Some(user) = user {
            estimate += user.bias;
        }
        if let Some(item) = item {
            estimate += item.bias;
        }
        if let (Some(user), Some(item)) = (user, item) {
            estimate += user.factors.dot(&item.factors);
        }

        if !estimate.is_finite() {
            return Err(RecommendError::Prediction {
                user_id: user_id.to_string(),
                restaurant_id: restaurant_id.to_string(),
                reason: "non-finite estimate".to_string(),
            });
        }

        let (low, high) = self.rating_scale;
        Ok(estimate.clamp(low, high))
    }
}
