//! Native HTTP client using reqwest

use async_trait::async_trait;
use reqwest::Client;

use super::{HttpError, HttpResponse, Transport};
use crate::config::LookupConfig;

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Build a client with the configured user agent and timeout.
    ///
    /// When a contact address is configured it is appended to the user
    /// agent, which is what admits requests to Crossref's polite pool.
    pub fn new(config: &LookupConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HttpError::RequestFailed {
                message: e.to_string(),
            })?;

        let user_agent = match &config.mailto {
            Some(mailto) => format!("{} (mailto:{})", config.user_agent, mailto),
            None => config.user_agent.clone(),
        };

        Ok(Self { client, user_agent })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let url = reqwest::Url::parse(url).map_err(|_| HttpError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::RequestFailed {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(HttpError::RateLimited);
        }

        let body = response.text().await.map_err(|e| HttpError::RequestFailed {
            message: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}
