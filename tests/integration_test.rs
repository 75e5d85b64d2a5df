use restrec::algorithms::{LatentFactorModel, RatingPredictor, SimilarityMatrix};
use restrec::services::catalog::Catalog;
use restrec::services::posters::{FsPosterStore, PosterStore};
use restrec::services::recommendation::RecommendationService;
use restrec::*;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

fn write_artifacts(dir: &Path) -> Config {
    let catalog = json!([
        {"restaurant_id": "R1", "restaurant_name": "Luigi's", "cuisine_type": ["Italian"], "location": ["Downtown"], "price_range": [10, 20]},
        {"restaurant_id": "R2", "restaurant_name": "Trattoria", "cuisine_type": "Italian", "location": "Harbor", "price_range": ["20", "30"]},
        {"restaurant_id": "R3", "restaurant_name": "Sakura", "cuisine_type": ["Japanese", "Sushi"], "location": "Downtown", "price_range": "10-20"},
        {"restaurant_id": "R4", "restaurant_name": "Taqueria", "cuisine_type": "Mexican", "location": ["Harbor"], "price_range": [5, 10]},
        {"restaurant_id": "R5", "restaurant_name": "Bistro", "cuisine_type": "French", "location": "Uptown", "price_range": [30, 60]},
        {"restaurant_id": "R6", "restaurant_name": "Curry House", "cuisine_type": "Indian", "location": "Uptown", "price_range": [10, 20]},
        {"restaurant_id": "R7", "restaurant_name": "Noodle Bar", "cuisine_type": "Japanese", "location": "Harbor", "price_range": [5, 10]}
    ]);
    let similarity = json!([
        [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.1],
        [0.9, 1.0, 0.3, 0.2, 0.4, 0.1, 0.0],
        [0.8, 0.3, 1.0, 0.1, 0.2, 0.3, 0.9],
        [0.7, 0.2, 0.1, 1.0, 0.0, 0.4, 0.3],
        [0.6, 0.4, 0.2, 0.0, 1.0, 0.5, 0.1],
        [0.5, 0.1, 0.3, 0.4, 0.5, 1.0, 0.2],
        [0.1, 0.0, 0.9, 0.3, 0.1, 0.2, 1.0]
    ]);
    let model = json!({
        "global_mean": 3.5,
        "rating_scale": [1.0, 5.0],
        "users": {"U001": {"bias": 0.1, "factors": [0.5, -0.2]}},
        "items": {
            "R1": {"bias": 0.4, "factors": [1.0, 0.0]},
            "R2": {"bias": -0.3, "factors": [0.2, 0.2]},
            "R3": {"bias": 0.2, "factors": [0.6, 0.1]},
            "R4": {"bias": -0.5, "factors": [0.0, 1.0]}
        }
    });

    std::fs::write(dir.join("catalog.json"), catalog.to_string()).unwrap();
    std::fs::write(dir.join("similarity.json"), similarity.to_string()).unwrap();
    std::fs::write(dir.join("model.json"), model.to_string()).unwrap();
    std::fs::create_dir_all(dir.join("images")).unwrap();
    std::fs::write(dir.join("images").join("R2.png"), b"png").unwrap();

    let mut config = Config::default();
    config.artifacts.catalog_path = dir.join("catalog.json");
    config.artifacts.similarity_path = dir.join("similarity.json");
    config.artifacts.model_path = dir.join("model.json");
    config.artifacts.poster_dir = dir.join("images");
    config.reviews.path = dir.join("reviews.csv");
    config
}

fn fixed_scores(scores: &[(&str, f32)]) -> Arc<dyn RatingPredictor> {
    let table: HashMap<String, f32> = scores.iter().map(|(id, s)| (id.to_string(), *s)).collect();
    Arc::new(move |user: &str, item: &str| -> Result<f32> {
        table.get(item).copied().ok_or_else(|| RecommendError::Prediction {
            user_id: user.to_string(),
            restaurant_id: item.to_string(),
            reason: "no score".to_string(),
        })
    })
}

fn service_with(predictor: Arc<dyn RatingPredictor>, dir: &Path) -> RecommendationService {
    let config = write_artifacts(dir);
    let catalog = Arc::new(Catalog::load(&config.artifacts.catalog_path).unwrap());
    let similarity = Arc::new(SimilarityMatrix::load(&config.artifacts.similarity_path).unwrap());
    let posters: Arc<dyn PosterStore> = Arc::new(FsPosterStore::new(&config.artifacts.poster_dir));
    RecommendationService::new(catalog, similarity, predictor, posters, &config.recommendation).unwrap()
}

fn ids(map: &RecommendationMap, user: &str) -> Vec<String> {
    map[user].iter().map(|r| r.restaurant_id.clone()).collect()
}

#[test]
fn test_app_state_from_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let state = AppState::new(config).unwrap();

    assert_eq!(state.catalog.len(), 7);
    let luigis = state.catalog.find_by_id("R1").unwrap();
    assert_eq!(luigis.price_range, "10-20");
    assert_eq!(state.catalog.find_by_id("R3").unwrap().cuisine_type, "Japanese");

    let result = state
        .serving_service
        .serve_collaborative("U001", &FacetFilter::new(), None)
        .unwrap();
    assert_eq!(result["U001"].len(), 5);
}

#[test]
fn test_tied_scores_keep_candidate_order() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with(fixed_scores(&[("R1", 4.5), ("R2", 4.5), ("R3", 3.0)]), dir.path());

    let result = service.recommend_collaborative("U001", ["R1", "R2", "R3"], &FacetFilter::new(), Some(2));
    assert_eq!(ids(&result, "U001"), vec!["R1", "R2"]);
    assert_eq!(result["U001"][0].estimated_rating, 4.5);
    assert_eq!(result["U001"][0].restaurant_name, "Luigi's");

    let reversed = service.recommend_collaborative("U001", ["R2", "R1", "R3"], &FacetFilter::new(), Some(2));
    assert_eq!(ids(&reversed, "U001"), vec!["R2", "R1"]);
}

#[test]
fn test_output_sorted_and_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let scores = [
        ("R1", 2.0),
        ("R2", 4.9),
        ("R3", 3.3),
        ("R4", 1.2),
        ("R5", 4.1),
        ("R6", 3.9),
        ("R7", 2.7),
    ];
    let service = service_with(fixed_scores(&scores), dir.path());
    let all: Vec<&str> = scores.iter().map(|(id, _)| *id).collect();

    for n in 0..=9 {
        let result = service.recommend_collaborative("U001", &all, &FacetFilter::new(), Some(n));
        let list = &result["U001"];
        assert!(list.len() <= n);
        assert!(list
            .windows(2)
            .all(|w| w[0].estimated_rating >= w[1].estimated_rating));
    }

    let default_n = service.recommend_collaborative("U001", &all, &FacetFilter::new(), None);
    assert_eq!(ids(&default_n, "U001"), vec!["R2", "R5", "R6", "R3", "R7"]);
}

#[test]
fn test_absent_cuisine_yields_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with(fixed_scores(&[("R1", 4.0)]), dir.path());

    let filter = FacetFilter::new().with_cuisine_type("Ethiopian");
    let result = service.recommend_collaborative("U042", ["R1", "R2"], &filter, None);
    assert_eq!(result.len(), 1);
    assert!(result["U042"].is_empty());
}

#[test]
fn test_unknown_candidates_silently_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with(fixed_scores(&[("R1", 4.0), ("R3", 4.2)]), dir.path());

    let result = service.recommend_collaborative("U001", ["R99", "R1", "", "R3"], &FacetFilter::new(), None);
    assert_eq!(ids(&result, "U001"), vec!["R3", "R1"]);
}

#[test]
fn test_prefiltered_and_unfiltered_candidates_agree() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let catalog = Catalog::load(&config.artifacts.catalog_path).unwrap();
    let model: Arc<dyn RatingPredictor> =
        Arc::new(LatentFactorModel::load(&config.artifacts.model_path).unwrap());
    let service = service_with(model, dir.path());

    let filter = FacetFilter::new().with_price_range("10-20");
    let prefiltered: Vec<String> = catalog
        .filter_by(&filter)
        .into_iter()
        .map(|r| r.restaurant_id.clone())
        .collect();

    let a = service.recommend_collaborative("U001", &prefiltered, &filter, None);
    let b = service.recommend_collaborative("U001", catalog.ids(), &filter, None);
    assert_eq!(a, b);
    assert!(a["U001"].iter().all(|r| r.price_range == "10-20"));
}

#[test]
fn test_content_based_top_five() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with(fixed_scores(&[]), dir.path());

    let result = service.recommend_content_based("Luigi's").unwrap();
    assert_eq!(
        result.names,
        vec!["Trattoria", "Sakura", "Taqueria", "Bistro", "Curry House"]
    );
    assert!(!result.names.contains(&"Luigi's".to_string()));
    assert_eq!(result.posters.len(), 5);
    assert!(result.posters[0].is_some());
    assert!(result.posters[1].is_none());
}

#[test]
fn test_content_based_unknown_name() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with(fixed_scores(&[]), dir.path());

    let err = service.recommend_content_based("Nowhere").unwrap_err();
    assert!(matches!(err, RecommendError::RestaurantNotFound { .. }));
}

#[test]
fn test_content_based_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_with(fixed_scores(&[]), dir.path());

    let first = service.recommend_content_based("Sakura").unwrap();
    let second = service.recommend_content_based("Sakura").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.names[0], "Noodle Bar");
}

#[test]
fn test_reviews_through_serving_layer() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_artifacts(dir.path());
    let state = AppState::new(config).unwrap();

    state
        .serving_service
        .submit_review("U003", "Bistro", "Lovely terrace", 4)
        .unwrap();
    state
        .serving_service
        .submit_review("U004", "Bistro", "", 1)
        .unwrap();

    let reviews = state.serving_service.reviews().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].review_text, "Lovely terrace");
    assert_eq!(reviews[1].rating, 1);
}

#[test]
fn test_bad_similarity_artifact_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_artifacts(dir.path());
    let path = dir.path().join("small.json");
    std::fs::write(&path, "[[1.0, 0.5], [0.5, 1.0]]").unwrap();
    config.artifacts.similarity_path = path;

    assert!(AppState::new(config).is_err());
}
