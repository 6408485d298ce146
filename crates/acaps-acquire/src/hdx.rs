//! HDX (Humanitarian Data Exchange) catalog client.
//!
//! HDX runs CKAN, so a dataset's files are listed by the `package_show`
//! action and each resource carries a direct download URL.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{AcquireError, Result};
use crate::fs::ensure_dir;
use crate::source::{DatasetSource, FetchedFiles};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent string for catalog requests.
const USER_AGENT_VALUE: &str = concat!("acaps-measures/", env!("CARGO_PKG_VERSION"));

/// `package_show` response envelope.
#[derive(Debug, Deserialize)]
struct PackageShow {
    success: bool,
    #[serde(default)]
    result: Option<Package>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Package {
    #[serde(default)]
    resources: Vec<Resource>,
}

/// One downloadable file of a catalog dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub format: String,
}

impl Resource {
    /// Whether the resource's declared format, name, or URL has `extension`.
    pub fn has_extension(&self, extension: &str) -> bool {
        let suffix = format!(".{}", extension.to_ascii_lowercase());
        self.format.eq_ignore_ascii_case(extension)
            || self.name.to_ascii_lowercase().ends_with(&suffix)
            || self.url.to_ascii_lowercase().ends_with(&suffix)
    }

    /// Local file name for the download. Path separators are replaced so a
    /// resource name can never escape the scratch directory.
    pub fn file_name(&self) -> String {
        self.name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect()
    }
}

/// Parse a `package_show` body into its resource list.
pub fn parse_package_show(dataset: &str, body: &str) -> Result<Vec<Resource>> {
    let response: PackageShow = serde_json::from_str(body)?;
    if !response.success {
        let message = response
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "request was not successful".to_string());
        return Err(AcquireError::Catalog {
            dataset: dataset.to_string(),
            message,
        });
    }
    let package = response.result.ok_or_else(|| AcquireError::Catalog {
        dataset: dataset.to_string(),
        message: "response has no result".to_string(),
    })?;
    Ok(package.resources)
}

/// Client for a CKAN catalog such as HDX.
pub struct HdxClient {
    /// HTTP client.
    client: Client,
    /// Catalog base URL, without trailing slash.
    base_url: String,
    /// Resource extension to download.
    extension: String,
}

impl HdxClient {
    /// Create a new catalog client.
    pub fn new(base_url: &str, extension: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            extension: extension.to_string(),
        })
    }

    /// Get the `package_show` URL for a dataset.
    fn package_url(&self, dataset: &str) -> String {
        format!("{}/api/3/action/package_show?id={dataset}", self.base_url)
    }

    /// List the dataset's resources.
    pub fn resources(&self, dataset: &str) -> Result<Vec<Resource>> {
        let url = self.package_url(dataset);
        debug!(%url, "querying catalog");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()?;

        if !response.status().is_success() {
            return Err(AcquireError::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text()?;
        parse_package_show(dataset, &body)
    }

    /// Download one resource into `dir`.
    fn download(&self, resource: &Resource, dir: &Path) -> Result<std::path::PathBuf> {
        let target = dir.join(resource.file_name());
        debug!(url = %resource.url, target = %target.display(), "downloading resource");

        let mut response = self
            .client
            .get(&resource.url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()?;
        if !response.status().is_success() {
            return Err(AcquireError::HttpStatus {
                url: resource.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let file = File::create(&target).map_err(|e| AcquireError::io(&target, e))?;
        let mut writer = BufWriter::new(file);
        let bytes = response.copy_to(&mut writer)?;
        debug!(bytes, target = %target.display(), "download complete");
        Ok(target)
    }
}

impl DatasetSource for HdxClient {
    fn fetch(&self, dataset: &str, scratch_dir: &Path) -> Result<FetchedFiles> {
        ensure_dir(scratch_dir)?;
        let resources = self.resources(dataset)?;
        let total = resources.len();

        let mut fetched = FetchedFiles::new();
        for resource in resources {
            if !resource.has_extension(&self.extension) {
                debug!(name = %resource.name, "skipping resource");
                continue;
            }
            let path = self.download(&resource, scratch_dir)?;
            if fetched.insert(resource.file_name(), path).is_some() {
                warn!(name = %resource.name, "duplicate resource name, keeping last download");
            }
        }

        if fetched.is_empty() {
            return Err(AcquireError::NoResource {
                dataset: dataset.to_string(),
                extension: self.extension.clone(),
            });
        }
        info!(
            dataset,
            resources = total,
            downloaded = fetched.len(),
            "catalog fetch complete"
        );
        Ok(fetched)
    }
}
