//! Reqwest-backed identity provider adapter.
//!
//! Owns transport details only: the verify endpoint, auth headers, timeout,
//! status mapping and JSON decoding into a [`VerifiedIdentity`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;

use super::dto::VerifiedSessionDto;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{SessionToken, VerifiedIdentity};
use crate::settings::AppSettings;

const VERIFY_PATH: &str = "v1/sessions/verify";
const API_KEY_HEADER: &str = "x-api-key";

/// Invalid identity provider settings.
#[derive(Debug, thiserror::Error)]
pub enum IdentityProviderConfigError {
    #[error("invalid identity provider URL '{value}': {source}")]
    Url {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build identity provider client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where and how to reach the identity provider.
pub struct IdentityProviderConfig {
    pub base_url: Url,
    pub api_key: Option<Zeroizing<String>>,
    pub timeout: Duration,
}

impl IdentityProviderConfig {
    /// Read the provider settings; `None` when no URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderConfigError::Url`] when the URL does not
    /// parse.
    pub fn from_settings(
        settings: &AppSettings,
    ) -> Result<Option<Self>, IdentityProviderConfigError> {
        let Some(raw) = settings.identity_provider_url.as_deref() else {
            return Ok(None);
        };
        let base_url = Url::parse(raw).map_err(|source| IdentityProviderConfigError::Url {
            value: raw.to_owned(),
            source,
        })?;
        Ok(Some(Self {
            base_url,
            api_key: settings
                .identity_provider_api_key
                .clone()
                .map(Zeroizing::new),
            timeout: settings.identity_provider_timeout(),
        }))
    }
}

/// Identity provider adapter calling `GET {base}/v1/sessions/verify`.
pub struct HttpIdentityProvider {
    client: Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
}

impl HttpIdentityProvider {
    /// Build the adapter with a client bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be derived from the base
    /// URL or the reqwest client cannot be constructed.
    pub fn new(config: IdentityProviderConfig) -> Result<Self, IdentityProviderConfigError> {
        let endpoint = verify_endpoint(&config.base_url).map_err(|source| {
            IdentityProviderConfigError::Url {
                value: config.base_url.to_string(),
                source,
            }
        })?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
        })
    }
}

/// Join the verify path onto `base`, keeping any path prefix.
fn verify_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(VERIFY_PATH)
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_session(
        &self,
        token: &SessionToken,
    ) -> Result<VerifiedIdentity, IdentityProviderError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        parse_identity(body.as_ref())
    }
}

fn parse_identity(body: &[u8]) -> Result<VerifiedIdentity, IdentityProviderError> {
    let decoded: VerifiedSessionDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::invalid_response(format!("invalid verify payload: {error}"))
    })?;
    decoded
        .into_identity()
        .map_err(IdentityProviderError::invalid_response)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    warn!(timeout = error.is_timeout(), "identity provider request failed");
    IdentityProviderError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode) -> IdentityProviderError {
    debug!(status = status.as_u16(), "identity provider refused verification");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityProviderError::rejected(format!("status {}", status.as_u16()))
        }
        _ => IdentityProviderError::unavailable(format!("status {}", status.as_u16())),
    }
}
