use crate::error::{RecommendError, Result};
use crate::models::*;
use crate::utils::{normalize_facet, normalize_price_range};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Immutable, ordered restaurant dataset with id and name indexes.
///
/// Names are not required to be unique; name lookups resolve to the first
/// restaurant carrying that name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(restaurants: Vec<Restaurant>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(restaurants.len());
        let mut by_name = HashMap::with_capacity(restaurants.len());

        for (position, restaurant) in restaurants.iter().enumerate() {
            if by_id.insert(restaurant.restaurant_id.clone(), position).is_some() {
                return Err(RecommendError::DuplicateRestaurant {
                    id: restaurant.restaurant_id.clone(),
                });
            }

            if by_name.contains_key(&restaurant.restaurant_name) {
                warn!(
                    "Duplicate restaurant name {:?} at row {}; name lookups resolve to the first",
                    restaurant.restaurant_name, position
                );
            } else {
                by_name.insert(restaurant.restaurant_name.clone(), position);
            }
        }

        Ok(Self {
            restaurants,
            by_id,
            by_name,
        })
    }

    /// Normalizes raw facet shapes and builds the catalog.
    pub fn from_raw(raw: Vec<RawRestaurant>) -> Result<Self> {
        let restaurants = raw
            .into_iter()
            .map(|r| {
                let missing = |facet: &str| {
                    RecommendError::InvalidArtifact(format!(
                        "restaurant {} has no {}",
                        r.restaurant_id, facet
                    ))
                };
                Ok(Restaurant {
                    cuisine_type: normalize_facet(&r.cuisine_type)
                        .ok_or_else(|| missing("cuisine_type"))?,
                    location: normalize_facet(&r.location).ok_or_else(|| missing("location"))?,
                    price_range: normalize_price_range(&r.price_range)
                        .ok_or_else(|| missing("price_range"))?,
                    restaurant_id: r.restaurant_id.clone(),
                    restaurant_name: r.restaurant_name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(restaurants)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let raw: Vec<RawRestaurant> = serde_json::from_reader(std::io::BufReader::new(file))?;
        let catalog = Self::from_raw(raw)?;
        info!(
            "Loaded {} restaurants from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Restaurant> {
        self.restaurants.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Restaurant> {
        self.restaurants.iter()
    }

    pub fn find_by_id(&self, restaurant_id: &str) -> Option<&Restaurant> {
        self.by_id.get(restaurant_id).map(|&i| &self.restaurants[i])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Restaurant> {
        self.position_of_name(name).map(|i| &self.restaurants[i])
    }

    pub fn position_of_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn filter_by(&self, filter: &FacetFilter) -> Vec<&Restaurant> {
        self.restaurants.iter().filter(|r| filter.matches(r)).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.restaurants.iter().map(|r| r.restaurant_id.clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.restaurants.iter().map(|r| r.restaurant_name.clone()).collect()
    }

    /// Distinct values of `facet`, in catalog order.
    pub fn facet_values(&self, facet: Facet) -> Vec<String> {
        let mut seen = HashSet::new();
        self.restaurants
            .iter()
            .map(|r| r.facet(facet))
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect()
    }
}
