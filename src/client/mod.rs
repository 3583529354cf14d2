pub mod credential;
pub mod factory;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use crate::types::token::TokenResponse;
use crate::types::MIME_JSON;

use self::credential::CredentialProvider;

/// Anything able to hand out the session identity token. The dashboard only
/// depends on this, the HTTP [`Client`] is the real implementation.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<TokenResponse, TokenFetchError>;
}

/// The single failure of a token fetch. Callers handle every reason the same
/// way; the reason is kept for diagnostics.
#[derive(Error, Debug)]
#[error("failed to fetch token: {reason}")]
pub struct TokenFetchError {
    pub reason: FetchFailure,
}

#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("server returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid token response: {0}")]
    Parse(#[source] serde_json::Error),
}

impl From<FetchFailure> for TokenFetchError {
    fn from(reason: FetchFailure) -> Self {
        Self { reason }
    }
}

impl TokenFetchError {
    pub fn status(&self) -> Option<u16> {
        match self.reason {
            FetchFailure::Status(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Client {
    url: Url,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl Client {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let url = match Url::parse(endpoint) {
            Ok(url) => url,
            Err(_) => bail!("invalid endpoint url '{endpoint}'"),
        };
        match url.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                url.scheme()
            ),
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;

        Ok(Self {
            url,
            client,
            credentials,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.url
    }

    async fn do_fetch_token(&self) -> Result<TokenResponse, TokenFetchError> {
        let mut req = self.client.get(self.url.clone()).header(ACCEPT, MIME_JSON);
        if let Some(cookie) = self.credentials.cookie_header() {
            req = req.header(COOKIE, cookie);
        }

        debug!("Requesting token from '{}'", self.url);
        let resp = req.send().await.map_err(FetchFailure::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()).into());
        }

        let body = resp.bytes().await.map_err(FetchFailure::Transport)?;
        let value: Value = serde_json::from_slice(&body).map_err(FetchFailure::Parse)?;
        let data = TokenResponse::from_value(value).map_err(FetchFailure::Parse)?;

        Ok(data)
    }
}

#[async_trait]
impl TokenSource for Client {
    async fn fetch_token(&self) -> Result<TokenResponse, TokenFetchError> {
        self.do_fetch_token().await
    }
}
