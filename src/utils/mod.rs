use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

pub mod validation;

pub const GUEST_POOL_SIZE: usize = 100;

/// Renders a scalar facet value: strings verbatim, null as absent, anything
/// else as compact JSON.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Normalizes a cuisine or location field: a non-empty list collapses to its
/// first element, every other shape passes through. `None` when the value
/// that would be kept is null.
pub fn normalize_facet(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) if !items.is_empty() => render_scalar(&items[0]),
        other => render_scalar(other),
    }
}

/// Normalizes a price field: a two-element list renders as `"low-high"`,
/// every other shape passes through. `None` when a bound or the value is null.
pub fn normalize_price_range(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            let low = render_scalar(&items[0])?;
            let high = render_scalar(&items[1])?;
            Some(format!("{}-{}", low, high))
        }
        other => render_scalar(other),
    }
}

pub fn guest_user_ids() -> Vec<String> {
    (0..GUEST_POOL_SIZE).map(|i| format!("U{:03}", i)).collect()
}

pub fn random_guest_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    guest_user_ids()
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "U000".to_string())
}
