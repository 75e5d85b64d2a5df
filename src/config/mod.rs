use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub recommendation: RecommendationConfig,
    pub reviews: ReviewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid server address {}:{}: {}", self.host, self.port, e))
    }

    /// Multi-threaded runtime sized to `workers`.
    pub fn build_runtime(&self) -> anyhow::Result<tokio::runtime::Runtime> {
        if self.workers == 0 {
            anyhow::bail!("server.workers must be at least 1");
        }
        Ok(tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers)
            .enable_all()
            .build()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    pub catalog_path: PathBuf,
    pub similarity_path: PathBuf,
    pub model_path: PathBuf,
    pub poster_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub default_top_n: usize,
    pub content_neighbors: usize,
    pub max_top_n: usize,
    pub all_facets_sentinel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsConfig {
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: num_cpus::get(),
            },
            artifacts: ArtifactsConfig {
                catalog_path: PathBuf::from("artifacts/restaurants_list.json"),
                similarity_path: PathBuf::from("artifacts/restaurants_similarity.json"),
                model_path: PathBuf::from("models/cf_model.json"),
                poster_dir: PathBuf::from("images"),
            },
            recommendation: RecommendationConfig {
                default_top_n: 5,
                content_neighbors: 5,
                max_top_n: 100,
                all_facets_sentinel: "All".to_string(),
            },
            reviews: ReviewsConfig {
                path: PathBuf::from("reviews.csv"),
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("RESTREC").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Loads `path` when it exists, falling back to the defaults otherwise.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::info!("Config file {} not found, using default configuration", path);
            Ok(Self::default())
        }
    }
}
