//! Print the shop status and account data for the configured shop.
//!
//! ```sh
//! PAYGREEN_ID=PP1234 PAYGREEN_PRIVATE_KEY=... \
//! PAYGREEN_HOST=https://preprod.paygreen.fr cargo run --example status_shop
//! ```

use paygreen::{ApiClient, ApiConfiguration, PaygreenError};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paygreen=debug")))
        .init();

    let unique_identifier = env::var("PAYGREEN_ID").unwrap_or_default();
    let private_key = env::var("PAYGREEN_PRIVATE_KEY").unwrap_or_default();
    let host = env::var("PAYGREEN_HOST").unwrap_or_default();

    let config = ApiConfiguration::new(unique_identifier, private_key)?.with_host(&host)?;
    let client = ApiClient::new(config)?;

    println!("OAuth authorize: {}", client.get_oauth_authorize_endpoint());

    match client.check_configuration().await {
        Ok(true) => println!("Credentials accepted"),
        Ok(false) => println!("Credentials rejected"),
        Err(e) => println!("Check failed: {} ({:?})", e, e.to_marker()),
    }

    match client.get_status_shop().await {
        Ok(status) => println!("Shop status: {}", serde_json::to_string_pretty(&status)?),
        Err(PaygreenError::Api { code }) => println!("Gateway error: {}", code),
        Err(e) => return Err(e.into()),
    }

    let account = client.get_account_data().await?;
    println!("Account: {}", serde_json::to_string_pretty(&account)?);

    Ok(())
}
