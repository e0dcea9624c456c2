//! Download of `phenotype.hpoa` from a GitHub release
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{HpoaError, HpoaResult, DATASET_FILENAME};

const USER_AGENT: &str = concat!("hpoa/", env!("CARGO_PKG_VERSION"));

/// The subset of the GitHub release API response that is needed
#[derive(Debug, Deserialize)]
pub struct ReleaseManifest {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// One downloadable file of a release
#[derive(Debug, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

impl ReleaseManifest {
    /// Returns the asset of the annotation dataset
    ///
    /// An asset matches if its name or its download URL contains `phenotype.hpoa`.
    pub fn select_asset(&self) -> Option<&Asset> {
        self.assets.iter().find(|asset| {
            asset.name.contains(DATASET_FILENAME)
                || asset.browser_download_url.contains(DATASET_FILENAME)
        })
    }
}

/// Fetches the release manifest and downloads the dataset asset
///
/// The HTTP client only lives for the duration of this call.
///
/// # Errors
///
/// - [`HpoaError::Download`]: the request failed, timed out or returned a non-success status
/// - [`HpoaError::DataUnavailable`]: the release does not contain the dataset
pub(crate) fn download_latest(release_url: &str, timeout: Duration) -> HpoaResult<String> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;

    let manifest: ReleaseManifest = client
        .get(release_url)
        .header("Accept", "application/vnd.github+json")
        .send()?
        .error_for_status()?
        .json()?;
    debug!(
        "Release {} has {} assets",
        manifest.tag_name,
        manifest.assets.len()
    );

    let asset = manifest.select_asset().ok_or(HpoaError::DataUnavailable)?;
    info!("Downloading {}", asset.browser_download_url);
    let text = client
        .get(&asset.browser_download_url)
        .send()?
        .error_for_status()?
        .text()?;
    Ok(text)
}
