//! # paygreen - PayGreen payment gateway client
//!
//! A Rust client for the PayGreen REST API: shop status, payin creation,
//! confirmation and refund, rounding donations and OAuth helpers.
//!
//! Requests are described by a static [`Endpoint`] table, built by an
//! [`ApiRequestFactory`] and sent by an [`HttpTransport`]. [`ApiClient`]
//! puts the three together.
//!
//! ```rust,no_run
//! # async fn run() -> paygreen::Result<()> {
//! use paygreen::{ApiClient, ApiConfiguration};
//!
//! let config = ApiConfiguration::new("PP1234", "private-key")?
//!     .with_host("https://preprod.paygreen.fr")?;
//! let client = ApiClient::new(config)?;
//!
//! let status = client.get_status_shop().await?;
//! println!("{}", status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{ApiClient, ApiClientBuilder};
pub use config::ApiConfiguration;
pub use endpoint::{Endpoint, EndpointDescriptor, HttpVerb};
pub use error::{PaygreenError, Result};
pub use request::{ApiRequest, ApiRequestFactory};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_client_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiClient>();
        assert_send_sync::<ApiRequest>();
        assert_send_sync::<ApiConfiguration>();
    }

    #[test]
    fn test_every_endpoint_resolves() {
        for endpoint in Endpoint::ALL {
            let descriptor = endpoint::lookup(endpoint.key()).unwrap();
            assert_eq!(descriptor, endpoint.descriptor());
        }
    }
}
