use crate::error::RecommendError;
use crate::models::{FacetFilter, RecommendationMap, Restaurant, Review};
use crate::services::serving::FacetOptions;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub cuisine_type: Option<String>,
    pub location: Option<String>,
    pub price_range: Option<String>,
    pub n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub user_id: String,
    pub restaurant_name: String,
    #[serde(default)]
    pub review_text: String,
    pub rating: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarRestaurant {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub score: f32,
    pub poster_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

/// NotFound maps to 404, bad input to 400, everything else to 500.
fn error_response(e: RecommendError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("Request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ApiResponse::error(e.to_string())))
}

async fn health_check() -> Json<ApiResponse<HashMap<String, String>>> {
    let mut status = HashMap::new();
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("service".to_string(), "restrec-recommendation".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());

    Json(ApiResponse::success(status))
}

async fn new_session() -> Json<ApiResponse<String>> {
    let user_id = crate::utils::random_guest_id(&mut rand::thread_rng());
    Json(ApiResponse::success(user_id))
}

async fn get_facets(State(state): State<AppState>) -> Json<ApiResponse<FacetOptions>> {
    Json(ApiResponse::success(state.serving_service.facets()))
}

async fn list_restaurants(State(state): State<AppState>) -> Json<ApiResponse<Vec<Restaurant>>> {
    Json(ApiResponse::success(state.serving_service.restaurants()))
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationQuery>,
) -> ApiResult<RecommendationMap> {
    let filter = FacetFilter::from_selection(
        params.cuisine_type,
        params.location,
        params.price_range,
        &state.config.recommendation.all_facets_sentinel,
    );

    state
        .serving_service
        .serve_collaborative(&user_id, &filter, params.n)
        .map(|recommendations| Json(ApiResponse::success(recommendations)))
        .map_err(error_response)
}

async fn get_similar(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<SimilarRestaurant>> {
    let recommendations = state.serving_service.serve_similar(&name).map_err(error_response)?;

    let similar = recommendations
        .restaurant_ids
        .into_iter()
        .zip(recommendations.names)
        .zip(recommendations.scores)
        .zip(recommendations.posters)
        .map(|(((restaurant_id, restaurant_name), score), poster)| SimilarRestaurant {
            poster_url: poster.map(|p| format!("/posters/{}", p.restaurant_id)),
            restaurant_id,
            restaurant_name,
            score,
        })
        .collect();

    Ok(Json(ApiResponse::success(similar)))
}

async fn get_poster(State(state): State<AppState>, Path(restaurant_id): Path<String>) -> Response {
    match state.serving_service.poster(&restaurant_id) {
        Ok(Some(poster)) => (
            [(header::CONTENT_TYPE, poster.content_type.clone())],
            poster.data.to_vec(),
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn submit_review(
    State(state): State<AppState>,
    Json(review): Json<ReviewRequest>,
) -> ApiResult<Review> {
    state
        .serving_service
        .submit_review(
            &review.user_id,
            &review.restaurant_name,
            &review.review_text,
            review.rating,
        )
        .map(|review| Json(ApiResponse::success(review)))
        .map_err(error_response)
}

async fn list_reviews(State(state): State<AppState>) -> ApiResult<Vec<Review>> {
    state
        .serving_service
        .reviews()
        .map(|reviews| Json(ApiResponse::success(reviews)))
        .map_err(error_response)
}

async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<HashMap<String, u64>>> {
    Json(ApiResponse::success(state.serving_service.stats()))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/session", get(new_session))
        .route("/facets", get(get_facets))
        .route("/restaurants", get(list_restaurants))
        .route("/recommendations/:user_id", get(get_recommendations))
        .route("/similar/:name", get(get_similar))
        .route("/posters/:restaurant_id", get(get_poster))
        .route("/reviews", get(list_reviews).post(submit_review))
        .route("/stats", get(get_stats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
