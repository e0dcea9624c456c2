//! Providers of the raw `phenotype.hpoa` text
//!
//! The [`AnnotationStore`](crate::AnnotationStore) tries an ordered list of
//! [`DatasetSource`]s and uses the first one that returns the dataset.
//! [`StoreConfig::source_chain`](crate::StoreConfig::source_chain) builds the default list.
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, info, trace, warn};

use crate::store::release;
use crate::{HpoaError, HpoaResult};

/// One place the dataset can come from
pub trait DatasetSource {
    /// Short name, used in logs and in the [`LoadSummary`](crate::store::LoadSummary)
    fn name(&self) -> &'static str;

    /// Returns the dataset text, or `None` if this source does not have it
    ///
    /// # Errors
    ///
    /// The source has the dataset but failed to provide it
    fn fetch(&self) -> HpoaResult<Option<String>>;

    /// Called once `text` from [`DatasetSource::fetch`] was parsed and stored
    ///
    /// # Errors
    ///
    /// The source could not record the accepted dataset
    fn commit(&self, _text: &str) -> HpoaResult<()> {
        Ok(())
    }
}

/// The dataset text and the source that provided it
pub struct Resolved<'a> {
    pub source: &'static str,
    pub text: String,
    provider: &'a dyn DatasetSource,
}

impl Resolved<'_> {
    /// Tells the providing source that the text was accepted
    ///
    /// # Errors
    ///
    /// See [`DatasetSource::commit`]
    pub fn commit(&self) -> HpoaResult<()> {
        self.provider.commit(&self.text)
    }
}

/// Tries every source in order and returns the first dataset found
///
/// A source that fails is logged and skipped.
///
/// # Errors
///
/// - [`HpoaError::DataUnavailable`]: no source provided the dataset
pub fn resolve(sources: &[Box<dyn DatasetSource>]) -> HpoaResult<Resolved<'_>> {
    for source in sources {
        match source.fetch() {
            Ok(Some(text)) => {
                info!("Using annotation dataset from {}", source.name());
                return Ok(Resolved {
                    source: source.name(),
                    text,
                    provider: source.as_ref(),
                });
            }
            Ok(None) => trace!("No dataset from {}", source.name()),
            Err(err) => warn!("Dataset source {} failed: {}", source.name(), err),
        }
    }
    Err(HpoaError::DataUnavailable)
}

fn read_if_exists(path: &Path) -> HpoaResult<Option<String>> {
    if !path.is_file() {
        debug!("{} does not exist", path.display());
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|_| HpoaError::CannotOpenFile(path.display().to_string()))
}

/// A path given by the caller
#[derive(Debug)]
pub struct ExplicitPath {
    path: PathBuf,
}

impl ExplicitPath {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetSource for ExplicitPath {
    fn name(&self) -> &'static str {
        "explicit path"
    }

    fn fetch(&self) -> HpoaResult<Option<String>> {
        read_if_exists(&self.path)
    }
}

/// A path read from an environment variable at fetch time
#[derive(Debug)]
pub struct EnvPath {
    var: String,
}

impl EnvPath {
    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

impl DatasetSource for EnvPath {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn fetch(&self) -> HpoaResult<Option<String>> {
        match env::var_os(&self.var) {
            Some(path) if !path.is_empty() => read_if_exists(Path::new(&path)),
            _ => Ok(None),
        }
    }
}

/// A previously downloaded copy in the working directory
#[derive(Debug)]
pub struct CachedCopy {
    path: PathBuf,
}

impl CachedCopy {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetSource for CachedCopy {
    fn name(&self) -> &'static str {
        "cached copy"
    }

    fn fetch(&self) -> HpoaResult<Option<String>> {
        read_if_exists(&self.path)
    }
}

/// The latest remote release
///
/// The download is written to the cache only once it was accepted, see [`DatasetSource::commit`].
#[derive(Debug)]
pub struct RemoteRelease {
    url: String,
    cache: PathBuf,
    timeout: Duration,
}

impl RemoteRelease {
    pub fn new<P: AsRef<Path>>(url: &str, cache: P, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            cache: cache.as_ref().to_path_buf(),
            timeout,
        }
    }
}

impl DatasetSource for RemoteRelease {
    fn name(&self) -> &'static str {
        "remote release"
    }

    fn fetch(&self) -> HpoaResult<Option<String>> {
        release::download_latest(&self.url, self.timeout).map(Some)
    }

    fn commit(&self, text: &str) -> HpoaResult<()> {
        write_atomic(&self.cache, text)
    }
}

/// Writes `text` to a temporary file next to `path` and moves it into place
///
/// Readers of `path` see either the old or the new content, never a partial file.
pub(crate) fn write_atomic(path: &Path, text: &str) -> HpoaResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;
    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| HpoaError::Io(err.error))?;
    debug!("Cached dataset at {}", path.display());
    Ok(())
}
