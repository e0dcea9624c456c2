//! Configuration of the [`AnnotationStore`](crate::AnnotationStore)
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::source::{CachedCopy, DatasetSource, EnvPath, ExplicitPath, RemoteRelease};

/// Environment variable pointing to a local `phenotype.hpoa`
pub const DEFAULT_ENV_VAR: &str = "HPOA_PATH";

/// Environment variable overriding the working directory
pub const WORKDIR_ENV_VAR: &str = "HPOA_WORKDIR";

/// Latest release of the Human Phenotype Ontology on GitHub
pub const DEFAULT_RELEASE_URL: &str =
    "https://api.github.com/repos/obophenotype/human-phenotype-ontology/releases/latest";

const DATABASE_FILENAME: &str = "hpoa.db";

/// Where the [`AnnotationStore`](crate::AnnotationStore) keeps its data
/// and where it looks for the dataset
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hpoa::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_workdir("/tmp/hpoa")
///     .with_timeout(Duration::from_secs(5));
///
/// assert!(config.db_path.is_none());
/// assert_eq!(config.env_var, "HPOA_PATH");
/// assert_eq!(config.cached_dataset().to_str(), Some("/tmp/hpoa/phenotype.hpoa"));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database file. `None` keeps the table in a private in-memory database
    pub db_path: Option<PathBuf>,
    /// Directory of the cached `phenotype.hpoa`
    pub workdir: PathBuf,
    /// Environment variable that may point to a local dataset
    pub env_var: String,
    /// Release API endpoint returning the asset manifest
    pub release_url: String,
    /// Timeout of the whole download request
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            workdir: PathBuf::from("."),
            env_var: DEFAULT_ENV_VAR.to_string(),
            release_url: DEFAULT_RELEASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    /// Builds the configuration from the environment
    ///
    /// The working directory is taken from `HPOA_WORKDIR`, then the
    /// user's cache directory (`~/.cache/hpoa` on Linux), then the current directory.
    /// The database is persisted at `<workdir>/hpoa.db`.
    pub fn from_env() -> Self {
        let workdir = env::var_os(WORKDIR_ENV_VAR)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("hpoa")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            db_path: Some(workdir.join(DATABASE_FILENAME)),
            workdir,
            ..Default::default()
        }
    }

    /// Sets the working directory
    pub fn with_workdir<P: AsRef<Path>>(mut self, workdir: P) -> Self {
        self.workdir = workdir.as_ref().to_path_buf();
        self
    }

    /// Persists the table in the given SQLite file
    pub fn with_db_path<P: AsRef<Path>>(mut self, db_path: P) -> Self {
        self.db_path = Some(db_path.as_ref().to_path_buf());
        self
    }

    /// Sets the environment variable that may point to a local dataset
    pub fn with_env_var(mut self, env_var: &str) -> Self {
        self.env_var = env_var.to_string();
        self
    }

    /// Sets the release API endpoint
    pub fn with_release_url(mut self, url: &str) -> Self {
        self.release_url = url.to_string();
        self
    }

    /// Sets the download timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the cached `phenotype.hpoa`
    pub fn cached_dataset(&self) -> PathBuf {
        self.workdir.join(crate::DATASET_FILENAME)
    }

    /// The ordered list of dataset sources
    ///
    /// 1. the explicit path, if given
    /// 2. the path in the environment variable
    /// 3. the cached copy in the working directory
    /// 4. the latest remote release, cached afterwards
    pub fn source_chain(&self, explicit: Option<&Path>) -> Vec<Box<dyn DatasetSource>> {
        let mut sources: Vec<Box<dyn DatasetSource>> = Vec::with_capacity(4);
        if let Some(path) = explicit {
            sources.push(Box::new(ExplicitPath::new(path)));
        }
        sources.push(Box::new(EnvPath::new(&self.env_var)));
        sources.push(Box::new(CachedCopy::new(self.cached_dataset())));
        sources.push(Box::new(RemoteRelease::new(
            &self.release_url,
            self.cached_dataset(),
            self.timeout,
        )));
        sources
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert!(config.db_path.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.release_url.contains("human-phenotype-ontology"));
    }

    #[test]
    fn source_chain_order() {
        let config = StoreConfig::default();
        let names: Vec<&str> = config
            .source_chain(Some(Path::new("tests/phenotype.hpoa")))
            .iter()
            .map(|source| source.name())
            .collect();
        assert_eq!(names, ["explicit path", "environment", "cached copy", "remote release"]);

        assert_eq!(config.source_chain(None).len(), 3);
    }

    #[test]
    fn database_next_to_cache() {
        let config = StoreConfig::from_env();
        assert_eq!(
            config.db_path.as_deref().and_then(Path::parent),
            Some(config.workdir.as_path())
        );
    }
}
