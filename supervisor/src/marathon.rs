use std::time::Duration;

use reqwest::{Client, Url};
use resources::objects::app::{App, AppResponse, AppsResponse};
use thiserror::Error;

/// Failure to obtain cluster state from Marathon.
///
/// Every variant is fatal: reconciling against partial or unknown cluster
/// state could delete live routes, so the caller aborts the process instead
/// of continuing the cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL {url}: {message}")]
    Url { url: String, message: String },
    #[error("request to {url} failed: {source}")]
    Request { url: Url, source: reqwest::Error },
    #[error("malformed response from {url}: {source}")]
    Malformed { url: Url, source: reqwest::Error },
}

pub struct MarathonClient {
    base_url: Url,
    client: Client,
}

impl MarathonClient {
    /// The client is built without proxy support so inherited proxy
    /// environment variables never divert API calls.
    pub fn new(base_url: &str) -> anyhow::Result<MarathonClient> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()?;
        Ok(MarathonClient { base_url, client })
    }

    /// Lists the ids of all running applications, path separators stripped,
    /// in the order Marathon returns them.
    pub async fn list_apps(&self) -> Result<Vec<String>, FetchError> {
        let res: AppsResponse = self.get("v2/apps").await?;
        Ok(res
            .apps
            .into_iter()
            .map(|app| app.id.replace('/', ""))
            .collect())
    }

    /// Fetches the full descriptor of one application.
    pub async fn get_app(&self, id: &str) -> Result<App, FetchError> {
        let res: AppResponse = self.get(&format!("v2/apps/{}", id)).await?;
        Ok(res.app)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.base_url.join(path).map_err(|e| FetchError::Url {
            url: format!("{}{}", self.base_url, path),
            message: e.to_string(),
        })?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;
        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Malformed { url, source })
    }
}
