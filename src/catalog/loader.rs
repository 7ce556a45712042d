use std::path::PathBuf;

use thiserror::Error;

use super::CameraRecord;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            CatalogSource::Url(source.to_string())
        } else {
            CatalogSource::File(PathBuf::from(source))
        }
    }

    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            CatalogSource::File(path) => Some(path),
            CatalogSource::Url(_) => None,
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => f.write_str(url),
        }
    }
}

/// Loads the camera catalog once. There is no retry; callers surface the error.
pub async fn load_catalog(source: &CatalogSource) -> Result<Vec<CameraRecord>, LoadError> {
    let bytes = match source {
        CatalogSource::File(path) => tokio::fs::read(path).await?,
        CatalogSource::Url(url) => reqwest::Client::new()
            .get(url)
            .header("User-Agent", format!("camterm/{}", env!("CARGO_PKG_VERSION")))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec(),
    };

    let records: Vec<CameraRecord> = serde_json::from_slice(&bytes)?;
    tracing::debug!(source = %source, count = records.len(), "catalog decoded");
    Ok(records)
}
