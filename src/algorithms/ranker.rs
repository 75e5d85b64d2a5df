use crate::models::PredictionResult;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Groups predictions by user, orders each group by estimated rating
/// (highest first) and keeps the first `n`.
///
/// The sort is stable: predictions with equal scores keep their input order.
pub fn rank_top_n(
    predictions: impl IntoIterator<Item = PredictionResult>,
    n: usize,
) -> HashMap<String, Vec<PredictionResult>> {
    let mut top_n: HashMap<String, Vec<PredictionResult>> = HashMap::new();
    for prediction in predictions {
        top_n
            .entry(prediction.user_id.clone())
            .or_default()
            .push(prediction);
    }

    for user_ratings in top_n.values_mut() {
        user_ratings.sort_by(|a, b| descending(a.estimated_rating, b.estimated_rating));
        user_ratings.truncate(n);
    }

    top_n
}

/// Descending order on scores; incomparable values are treated as equal so
/// the stable sort leaves them in place.
pub(crate) fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(results: &[PredictionResult]) -> Vec<&str> {
        results.iter().map(|p| p.restaurant_id.as_str()).collect()
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let predictions = vec![
            PredictionResult::new("U1", "R1", 2.0),
            PredictionResult::new("U1", "R2", 4.0),
            PredictionResult::new("U1", "R3", 3.0),
        ];
        let ranked = rank_top_n(predictions, 2);
        assert_eq!(ids(&ranked["U1"]), vec!["R2", "R3"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let predictions = vec![
            PredictionResult::new("U1", "R1", 4.5),
            PredictionResult::new("U1", "R2", 4.5),
            PredictionResult::new("U1", "R3", 3.0),
        ];
        let ranked = rank_top_n(predictions, 2);
        assert_eq!(ids(&ranked["U1"]), vec!["R1", "R2"]);
    }

    #[test]
    fn test_groups_by_user() {
        let predictions = vec![
            PredictionResult::new("U1", "R1", 1.0),
            PredictionResult::new("U2", "R1", 5.0),
            PredictionResult::new("U1", "R2", 3.0),
        ];
        let ranked = rank_top_n(predictions, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ids(&ranked["U1"]), vec!["R2", "R1"]);
        assert_eq!(ids(&ranked["U2"]), vec!["R1"]);
    }

    #[test]
    fn test_zero_n_keeps_users_with_empty_lists() {
        let ranked = rank_top_n(vec![PredictionResult::new("U1", "R1", 1.0)], 0);
        assert_eq!(ranked.get("U1").map(Vec::len), Some(0));
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_top_n(Vec::new(), 5).is_empty());
    }
}
