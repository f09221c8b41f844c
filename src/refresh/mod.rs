//! Exchange a refresh token for a new access token.

use reqwest::{Client, Url, header::USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::Error;

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub token: &'a str,
}

/// Success body of the refresh endpoint; extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Clone, Debug)]
pub struct RefreshClient {
    http: Client,
    url: Url,
    user_agent: String,
}

impl RefreshClient {
    /// Builds a client that keeps a cookie jar, so credentials set by the
    /// endpoint ride along on later exchanges.
    pub fn new(config: &Config) -> Result<Self, Error> {
        config.validate()?;
        let url = parse_url(&config.refresh_url)?;

        #[cfg(not(target_arch = "wasm32"))]
        let http = {
            let mut builder = Client::builder().cookie_store(true);
            if let Some(timeout) = config.timeout() {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };
        #[cfg(target_arch = "wasm32")]
        let http = Client::new();

        Ok(Self {
            http,
            url,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Uses a caller-supplied `reqwest::Client` as is.
    pub fn with_client(
        http: Client,
        refresh_url: &str,
        user_agent: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            url: parse_url(refresh_url)?,
            user_agent: user_agent.into(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POSTs `{"token": refresh_token}` and returns the new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, Error> {
        let request = self
            .http
            .post(self.url.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .json(&RefreshRequest {
                token: refresh_token,
            });
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            debug!(status = %status, "refresh endpoint rejected exchange");
            return Err(Error::Refresh(status, body));
        }

        let parsed: RefreshResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(body.clone(), e.to_string()))?;
        if parsed.access_token.is_empty() {
            return Err(Error::InvalidResponse(body, "accessToken is empty".into()));
        }
        info!("access token refreshed (len={})", parsed.access_token.len());
        Ok(parsed.access_token)
    }
}

fn parse_url(raw: &str) -> Result<Url, Error> {
    Url::parse(raw).map_err(|e| Error::Config(format!("Invalid refresh URL '{raw}': {e}")))
}
