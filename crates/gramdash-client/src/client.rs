//! HTTP client for the sanitation dashboard REST backend.
//!
//! Wraps `reqwest` with bearer-token auth, base-URL joining and typed
//! response deserialization. Endpoint families live in sibling modules
//! (`geography`, `complaints`, `vehicles`, `surveys`) as further `impl`
//! blocks on [`GramdashClient`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use gramdash_core::AppConfig;

use crate::error::ApiError;

/// Client for the dashboard backend.
///
/// Use [`GramdashClient::from_config`] in the binary or
/// [`GramdashClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct GramdashClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GramdashClient {
    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`ApiError::InvalidBaseUrl`] if the configured base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.api_base_url,
            config.api_token.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so relative endpoint paths are joined
        // under the base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            token: token.map(str::to_owned),
        })
    }

    /// Joins `path` (relative, no leading slash) onto the base URL and
    /// appends percent-encoded query parameters.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a GET and deserializes the JSON body into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::GET, url).send().await?;
        let body = Self::check_status(response).await?;
        Self::decode(&body, context)
    }

    /// Sends a JSON POST and deserializes the JSON response into `T`.
    pub(crate) async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        payload: &B,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .request(Method::POST, url)
            .json(payload)
            .send()
            .await?;
        let body = Self::check_status(response).await?;
        Self::decode(&body, context)
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Maps non-2xx statuses to typed errors and returns the body text.
    async fn check_status(response: Response) -> Result<String, ApiError> {
        let status = response.status();
        let url = response.url().to_string();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized { url });
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "backend returned error status");
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }

    fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GramdashClient {
        GramdashClient::with_base_url(base_url, None, 30, "gramdash-test")
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_joins_under_base_path() {
        let client = test_client("https://sbm.example.gov.in/api/v1");
        let url = client
            .build_url("geography/districts", &[("skip", "0".into()), ("limit", "100".into())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sbm.example.gov.in/api/v1/geography/districts?skip=0&limit=100"
        );
    }

    #[test]
    fn build_url_tolerates_slashes_on_both_sides() {
        let client = test_client("https://sbm.example.gov.in/api/v1/");
        let url = client.build_url("/annual-surveys/fy/active", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sbm.example.gov.in/api/v1/annual-surveys/fy/active"
        );
    }

    #[test]
    fn build_url_keeps_trailing_slash_of_path() {
        let client = test_client("https://sbm.example.gov.in");
        let url = client
            .build_url("annual-surveys/", &[("limit", "10".into())])
            .unwrap();
        assert_eq!(url.as_str(), "https://sbm.example.gov.in/annual-surveys/?limit=10");
    }

    #[test]
    fn build_url_encodes_query_values() {
        let client = test_client("https://sbm.example.gov.in");
        let url = client
            .build_url("complaints", &[("order_by", "newest first".into())])
            .unwrap();
        assert!(
            url.as_str().contains("newest+first") || url.as_str().contains("newest%20first"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = GramdashClient::with_base_url("not a url", None, 30, "ua");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
    }
}
