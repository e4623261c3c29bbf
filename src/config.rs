//! API credentials and connection settings

use crate::{PaygreenError, Result};
use std::net::IpAddr;
use std::time::Duration;

/// Default PayGreen host
pub const DEFAULT_API_HOST: &str = "https://paygreen.fr";

/// Path segment every API URL lives under
pub const API_PATH: &str = "/api";

/// Prefix some dashboards show in front of the tenant identifier
pub const IDENTIFIER_PREFIX: &str = "PP";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and host for one PayGreen shop
#[derive(Clone)]
pub struct ApiConfiguration {
    unique_identifier: String,
    private_key: String,
    api_server_url: String,
    timeout: Duration,
    source_address: Option<IpAddr>,
}

impl std::fmt::Debug for ApiConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfiguration")
            .field("unique_identifier", &self.unique_identifier)
            .field("private_key", &"<redacted>")
            .field("api_server_url", &self.api_server_url)
            .field("timeout", &self.timeout)
            .field("source_address", &self.source_address)
            .finish()
    }
}

impl ApiConfiguration {
    /// Create a configuration pointing at the default host
    pub fn new(unique_identifier: impl Into<String>, private_key: impl Into<String>) -> Result<Self> {
        let unique_identifier = unique_identifier.into();
        let private_key = private_key.into();

        if unique_identifier.is_empty() {
            return Err(PaygreenError::invalid_argument("Missing unique identifier"));
        }
        if private_key.is_empty() {
            return Err(PaygreenError::invalid_argument("Missing private key"));
        }

        Ok(Self {
            unique_identifier,
            private_key,
            api_server_url: format!("{}{}", DEFAULT_API_HOST, API_PATH),
            timeout: DEFAULT_TIMEOUT,
            source_address: None,
        })
    }

    /// Point the configuration at another host, e.g. `https://preprod.paygreen.fr`.
    ///
    /// An empty host keeps the default.
    pub fn with_host(mut self, host: &str) -> Result<Self> {
        if host.is_empty() {
            return Ok(self);
        }

        validate_host(host)?;
        self.api_server_url = format!("{}{}", host.trim_end_matches('/'), API_PATH);
        Ok(self)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Address sent by the OAuth access call when the caller gives none
    pub fn with_source_address(mut self, address: IpAddr) -> Self {
        self.source_address = Some(address);
        self
    }

    /// Tenant identifier as used in URLs, with any leading "PP" removed
    pub fn unique_identifier(&self) -> &str {
        self.unique_identifier
            .strip_prefix(IDENTIFIER_PREFIX)
            .unwrap_or(&self.unique_identifier)
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Host plus the `/api` segment, without a trailing slash
    pub fn api_server_url(&self) -> &str {
        &self.api_server_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source_address(&self) -> Option<IpAddr> {
        self.source_address
    }
}

fn validate_host(host: &str) -> Result<()> {
    let parsed = url::Url::parse(host)
        .map_err(|e| PaygreenError::invalid_argument(format!("Invalid API host {host}: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PaygreenError::invalid_argument(
            "API host must start with http:// or https://",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_host() {
        let config = ApiConfiguration::new("uniqueIdentifier", "privateKey").unwrap();
        assert_eq!(config.unique_identifier(), "uniqueIdentifier");
        assert_eq!(config.private_key(), "privateKey");
        assert_eq!(config.api_server_url(), "https://paygreen.fr/api");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_custom_host() {
        let config = ApiConfiguration::new("uniqueIdentifier", "privateKey")
            .unwrap()
            .with_host("https://preprod.paygreen.fr")
            .unwrap();
        assert_eq!(config.api_server_url(), "https://preprod.paygreen.fr/api");
    }

    #[test]
    fn test_trailing_slash_host() {
        let config = ApiConfiguration::new("id", "pk")
            .unwrap()
            .with_host("https://preprod.paygreen.fr/")
            .unwrap();
        assert_eq!(config.api_server_url(), "https://preprod.paygreen.fr/api");
    }

    #[test]
    fn test_empty_host_keeps_default() {
        let config = ApiConfiguration::new("id", "pk").unwrap().with_host("").unwrap();
        assert_eq!(config.api_server_url(), "https://paygreen.fr/api");
    }

    #[test]
    fn test_invalid_host() {
        let result = ApiConfiguration::new("id", "pk").unwrap().with_host("paygreen.fr");
        assert!(matches!(result, Err(PaygreenError::InvalidArgument { .. })));

        let result = ApiConfiguration::new("id", "pk").unwrap().with_host("ftp://paygreen.fr");
        assert!(matches!(result, Err(PaygreenError::InvalidArgument { .. })));
    }

    #[test]
    fn test_empty_credentials() {
        assert!(matches!(
            ApiConfiguration::new("uniqueIdentifier", ""),
            Err(PaygreenError::InvalidArgument { .. })
        ));
        assert!(matches!(
            ApiConfiguration::new("", "privateKey"),
            Err(PaygreenError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_identifier_prefix_stripped() {
        let config = ApiConfiguration::new("PP1234abcd", "pk").unwrap();
        assert_eq!(config.unique_identifier(), "1234abcd");

        let config = ApiConfiguration::new("PPPP", "pk").unwrap();
        assert_eq!(config.unique_identifier(), "PP");

        let config = ApiConfiguration::new("pp1234", "pk").unwrap();
        assert_eq!(config.unique_identifier(), "pp1234");
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = ApiConfiguration::new("id", "super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
