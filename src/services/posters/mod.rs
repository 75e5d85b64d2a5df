use crate::error::Result;
use crate::models::Poster;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Keyed image lookup. `Ok(None)` means no image exists for the id.
pub trait PosterStore: Send + Sync {
    fn get_poster(&self, restaurant_id: &str) -> Result<Option<Poster>>;
}

/// Serves `<dir>/<restaurant_id>.png`, caching successful reads.
pub struct FsPosterStore {
    dir: PathBuf,
    cache: DashMap<String, Poster>,
}

impl FsPosterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: DashMap::new(),
        }
    }

    pub fn poster_path(&self, restaurant_id: &str) -> PathBuf {
        self.dir.join(format!("{}.png", restaurant_id))
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl PosterStore for FsPosterStore {
    fn get_poster(&self, restaurant_id: &str) -> Result<Option<Poster>> {
        if let Some(poster) = self.cache.get(restaurant_id) {
            return Ok(Some(poster.clone()));
        }

        // Ids are used as file names; anything that could escape the directory has no poster.
        if restaurant_id.is_empty()
            || restaurant_id.contains(|c: char| c == '/' || c == '\\')
            || restaurant_id.starts_with('.')
        {
            return Ok(None);
        }

        let path = self.poster_path(restaurant_id);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No poster at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let poster = Poster {
            restaurant_id: restaurant_id.to_string(),
            content_type: "image/png".to_string(),
            data: Arc::new(data),
        };
        self.cache.insert(restaurant_id.to_string(), poster.clone());
        Ok(Some(poster))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_and_caches_posters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("R1.png"), b"\x89PNG").unwrap();

        let store = FsPosterStore::new(dir.path());
        let poster = store.get_poster("R1").unwrap().unwrap();
        assert_eq!(poster.data.as_slice(), b"\x89PNG");
        assert_eq!(poster.content_type, "image/png");
        assert_eq!(store.cached(), 1);

        std::fs::remove_file(dir.path().join("R1.png")).unwrap();
        assert!(store.get_poster("R1").unwrap().is_some());
    }

    #[test]
    fn test_missing_poster_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsPosterStore::new(dir.path());
        assert!(store.get_poster("R404").unwrap().is_none());
        assert!(store.get_poster("../secret").unwrap().is_none());
    }
}
