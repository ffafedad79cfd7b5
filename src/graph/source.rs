use crate::model::{DocumentError, GraphDocument};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const FETCH_TIMEOUT_SECS: u64 = 10;

/// Where a graph document comes from: a local artifact or a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphSource {
    File(PathBuf),
    Url(String),
}

impl GraphSource {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            GraphSource::Url(location.to_string())
        } else {
            GraphSource::File(PathBuf::from(location))
        }
    }

    /// Load and validate the document. A non-success HTTP status, a network
    /// failure, or an invalid document is an error; there is no retry.
    pub async fn fetch(&self) -> Result<GraphDocument, DocumentError> {
        let body = match self {
            GraphSource::File(path) => tokio::fs::read_to_string(path).await?,
            GraphSource::Url(url) => fetch_url(url).await?,
        };
        let document = GraphDocument::from_json(&body)?;
        debug!(
            source = %self,
            nodes = document.nodes.len(),
            links = document.links.len(),
            "Loaded graph document"
        );
        Ok(document)
    }
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSource::File(path) => write!(f, "{}", path.display()),
            GraphSource::Url(url) => write!(f, "{}", url),
        }
    }
}

async fn fetch_url(url: &str) -> Result<String, DocumentError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("sitegraph/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DocumentError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}
