use crate::error::Result;
use crate::models::Review;
use crate::utils::validation::validate_review;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

/// Append-only store of user reviews.
pub trait ReviewLog: Send + Sync {
    fn append(&self, review: &Review) -> Result<()>;
    fn read_all(&self) -> Result<Vec<Review>>;
}

/// Review log backed by a CSV file with columns
/// `user_id,restaurant_name,review_text,rating`.
pub struct CsvReviewLog {
    path: PathBuf,
    writer_lock: Mutex<()>,
}

impl CsvReviewLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewLog for CsvReviewLog {
    fn append(&self, review: &Review) -> Result<()> {
        validate_review(review)?;

        let _guard = self.writer_lock.lock();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(review)?;
        writer.flush()?;

        info!(
            "Recorded review from {} for {} (rating {})",
            review.user_id, review.restaurant_name, review.rating
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Review>> {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                let missing = matches!(
                    e.kind(),
                    csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound
                );
                if missing {
                    return Ok(Vec::new());
                }
                return Err(e.into());
            }
        };

        let mut reviews = Vec::new();
        for record in reader.deserialize() {
            reviews.push(record?);
        }
        Ok(reviews)
    }
}
