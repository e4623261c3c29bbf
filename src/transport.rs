//! Sending built requests over HTTP

use crate::request::ApiRequest;
use crate::{PaygreenError, Result};
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{debug, warn};

/// Redirects followed before giving up
pub const MAX_REDIRECTS: usize = 10;

/// Sends an [`ApiRequest`] and hands back the raw response body.
///
/// Implementations must not inspect the status code: any response that
/// arrives is returned as-is, and only a call that could not complete is an
/// error (always [`PaygreenError::Transport`]).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<String>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport that keeps connections alive between calls
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Self::client_builder(timeout)
            .build()
            .map_err(|e| PaygreenError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Transport that opens a fresh connection for every call
    pub fn one_shot(timeout: Duration) -> Result<Self> {
        let client = Self::client_builder(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| PaygreenError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<String> {
        let mut builder = self
            .client
            .request(request.verb().into(), request.url());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if !request.body().is_empty() {
            builder = builder.body(request.body().to_string());
        }

        debug!(verb = %request.verb(), url = request.url(), "sending PayGreen request");

        let response = builder.send().await.map_err(|e| {
            warn!(url = request.url(), error = %e, "PayGreen request failed");
            PaygreenError::transport(e.to_string())
        })?;

        debug!(status = response.status().as_u16(), url = request.url(), "PayGreen response received");

        response.text().await.map_err(|e| {
            warn!(url = request.url(), error = %e, "failed to read PayGreen response body");
            PaygreenError::transport(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfiguration, DEFAULT_TIMEOUT};
    use crate::endpoint::Endpoint;
    use crate::request::ApiRequestFactory;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn factory(host: &str) -> ApiRequestFactory {
        let config = ApiConfiguration::new("PP42", "pk_test")
            .unwrap()
            .with_host(host)
            .unwrap();
        ApiRequestFactory::new(config)
    }

    #[tokio::test]
    async fn test_send_sets_method_headers_and_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PATCH", "/api/42/shop")
            .match_header("Authorization", "Bearer pk_test")
            .match_header("Accept", "application/json")
            .match_header("Cache-Control", "no-cache")
            .match_header("Content-Type", "application/json")
            .match_body(Matcher::Json(json!({ "activate": 0 })))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let request = factory(&server.url())
            .create_with_content(Endpoint::ShopValidate, "", &json!({ "activate": 0 }))
            .unwrap();
        let body = ReqwestTransport::new(DEFAULT_TIMEOUT)
            .unwrap()
            .send(&request).await.unwrap();

        assert_eq!(body, r#"{"success":true}"#);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_still_returns_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/42/payins/transaction/missing")
            .with_status(404)
            .with_body(r#"{"error":"not_found"}"#)
            .create_async()
            .await;

        let request = factory(&server.url()).create(Endpoint::PayinDetails, "missing");
        let body = ReqwestTransport::one_shot(DEFAULT_TIMEOUT)
            .unwrap()
            .send(&request)
            .await
            .unwrap();

        assert_eq!(body, r#"{"error":"not_found"}"#);
    }

    #[tokio::test]
    async fn test_redirect_chain_past_limit_is_transport_error() {
        let mut server = Server::new_async().await;
        let hops = MAX_REDIRECTS + 2;
        let mut mocks = Vec::with_capacity(hops + 1);
        for hop in 0..hops {
            let next = format!("{}/api/42/payins/transaction/hop{}", server.url(), hop + 1);
            mocks.push(
                server
                    .mock("GET", format!("/api/42/payins/transaction/hop{}", hop).as_str())
                    .with_status(302)
                    .with_header("Location", &next)
                    .create_async()
                    .await,
            );
        }
        mocks.push(
            server
                .mock("GET", format!("/api/42/payins/transaction/hop{}", hops).as_str())
                .with_status(200)
                .with_body(r#"{"success":true}"#)
                .create_async()
                .await,
        );

        let request = factory(&server.url()).create(Endpoint::PayinDetails, "hop0");
        let err = ReqwestTransport::new(DEFAULT_TIMEOUT)
            .unwrap()
            .send(&request)
            .await
            .unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_short_redirect_chain_is_followed() {
        let mut server = Server::new_async().await;
        let _hop = server
            .mock("GET", "/api/42/shop")
            .with_status(302)
            .with_header("Location", &format!("{}/api/42/shop/moved", server.url()))
            .create_async()
            .await;
        let _target = server
            .mock("GET", "/api/42/shop/moved")
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let request = factory(&server.url()).create(Endpoint::GetObject, "shop");
        let body = ReqwestTransport::new(DEFAULT_TIMEOUT)
            .unwrap()
            .send(&request)
            .await
            .unwrap();

        assert_eq!(body, r#"{"success":true}"#);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let request = factory("http://127.0.0.1:1").create(Endpoint::GetObject, "shop");
        let transport = ReqwestTransport::new(Duration::from_millis(500)).unwrap();

        let err = transport.send(&request).await.unwrap_err();
        assert!(err.is_transport());
    }
}
