//! PayGreen API client

use crate::config::ApiConfiguration;
use crate::endpoint::Endpoint;
use crate::request::{ApiRequest, ApiRequestFactory};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    is_truthy, AccountData, OAuthAccessRequest, RefundRequest, RoundingRefundRequest,
    ValidateShopRequest,
};
use crate::{PaygreenError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Object kinds readable through the generic `get-data` endpoint
pub mod objects {
    pub const ACCOUNT: &str = "account";
    pub const BANK: &str = "bank";
    pub const SHOP: &str = "shop";
}

/// Client for one PayGreen shop.
///
/// Every operation is a single request/response round trip (except
/// [`get_account_data`](Self::get_account_data), which chains three) and
/// returns a [`Result`]. A response carrying an `error` field comes back as
/// [`PaygreenError::Api`]; a call that never got a response comes back as
/// [`PaygreenError::Transport`].
#[derive(Clone)]
pub struct ApiClient {
    factory: ApiRequestFactory,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("configuration", self.factory.configuration())
            .field("transport", &"<transport>")
            .finish()
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    configuration: Option<ApiConfiguration>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ApiClientBuilder {
    pub fn with_configuration(mut self, configuration: ApiConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Use a specific transport instead of the pooled reqwest one
    pub fn with_transport<T>(mut self, transport: T) -> Self
    where
        T: HttpTransport + 'static,
    {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Share one transport between several clients
    pub fn with_shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let configuration = self
            .configuration
            .ok_or(PaygreenError::MissingConfiguration)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(configuration.timeout())?),
        };

        Ok(ApiClient {
            factory: ApiRequestFactory::new(configuration),
            transport,
        })
    }
}

impl ApiClient {
    /// Client with the default pooled transport
    pub fn new(configuration: ApiConfiguration) -> Result<Self> {
        Self::builder().with_configuration(configuration).build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn configuration(&self) -> &ApiConfiguration {
        self.factory.configuration()
    }

    pub fn request_factory(&self) -> &ApiRequestFactory {
        &self.factory
    }

    /// Status of the shop
    pub async fn get_status_shop(&self) -> Result<Value> {
        self.get_object(objects::SHOP).await
    }

    /// Read one of the tenant's sub-resources, e.g. `account` or `bank`
    pub async fn get_object(&self, kind: &str) -> Result<Value> {
        require_non_empty(kind, "object kind")?;
        self.execute(self.factory.create(Endpoint::GetObject, kind)).await
    }

    pub async fn create_cash_payin<T: Serialize + ?Sized>(&self, content: &T) -> Result<Value> {
        self.post(Endpoint::PayinCash, content).await
    }

    pub async fn create_xtime_payin<T: Serialize + ?Sized>(&self, content: &T) -> Result<Value> {
        self.post(Endpoint::PayinXTime, content).await
    }

    pub async fn create_subscription_payin<T: Serialize + ?Sized>(&self, content: &T) -> Result<Value> {
        self.post(Endpoint::PayinSubscription, content).await
    }

    pub async fn create_tokenize_payin<T: Serialize + ?Sized>(&self, content: &T) -> Result<Value> {
        self.post(Endpoint::PayinTokenize, content).await
    }

    /// Send carbon footprint data for an order
    pub async fn create_carbon_payin<T: Serialize + ?Sized>(&self, content: &T) -> Result<Value> {
        self.post(Endpoint::PayinCarbon, content).await
    }

    pub async fn get_payin_details(&self, id: &str) -> Result<Value> {
        require_non_empty(id, "payin id")?;
        self.execute(self.factory.create(Endpoint::PayinDetails, id)).await
    }

    /// Confirm delivery so a deferred payin gets captured
    pub async fn confirm_payin(&self, id: &str) -> Result<Value> {
        require_non_empty(id, "payin id")?;
        self.execute(self.factory.create(Endpoint::PayinConfirm, id)).await
    }

    /// Refund a payin, fully when `amount` is `None` or zero.
    ///
    /// `amount` is in major units and is sent as minor units.
    pub async fn refund_payin(&self, id: &str, amount: Option<Decimal>) -> Result<Value> {
        require_non_empty(id, "payin id")?;

        let request = match amount.filter(|amount| !amount.is_zero()) {
            Some(amount) => {
                let body = RefundRequest::from_major_units(amount).ok_or_else(|| {
                    PaygreenError::invalid_argument(format!("Refund amount {} is out of range", amount))
                })?;
                self.factory.create_with_content(Endpoint::PayinRefund, id, &body)?
            }
            None => self.factory.create(Endpoint::PayinRefund, id),
        };

        self.execute(request).await
    }

    /// Rounding donation attached to a payment
    pub async fn get_rounding_info(&self, payment_token: &str) -> Result<Value> {
        require_non_empty(payment_token, "payment token")?;
        self.execute(self.factory.create(Endpoint::SolidarityGet, payment_token))
            .await
    }

    pub async fn validate_rounding(&self, payment_token: &str) -> Result<Value> {
        require_non_empty(payment_token, "payment token")?;
        self.execute(self.factory.create(Endpoint::SolidarityValidate, payment_token))
            .await
    }

    pub async fn refund_rounding(&self, payment_token: &str) -> Result<Value> {
        require_non_empty(payment_token, "payment token")?;
        let body = RoundingRefundRequest {
            payment_token: payment_token.to_string(),
        };
        let request = self
            .factory
            .create_with_content(Endpoint::SolidarityRefund, payment_token, &body)?;
        self.execute(request).await
    }

    /// Activate (`1`) or deactivate (`0`) the shop
    pub async fn validate_shop(&self, activate: u8) -> Result<Value> {
        if activate > 1 {
            return Err(PaygreenError::invalid_argument(format!(
                "activate must be 0 or 1, got {}",
                activate
            )));
        }

        let request = self.factory.create_with_content(
            Endpoint::ShopValidate,
            "",
            &ValidateShopRequest { activate },
        )?;
        self.execute(request).await
    }

    /// Whether the identifier and private key are accepted by the gateway
    pub async fn check_configuration(&self) -> Result<bool> {
        let response = self.execute(self.factory.create(Endpoint::CheckIds, "")).await?;
        Ok(is_truthy(&response["success"]))
    }

    /// Siret, default IBAN and shop details in one record
    pub async fn get_account_data(&self) -> Result<AccountData> {
        let account = self.get_object(objects::ACCOUNT).await?;
        let bank = self.get_object(objects::BANK).await?;
        let shop = self.get_object(objects::SHOP).await?;

        Ok(AccountData::merge(&account, &bank, &shop))
    }

    /// URL the merchant is sent to for OAuth authorization
    pub fn get_oauth_authorize_endpoint(&self) -> String {
        self.factory.server_url(Endpoint::OAuthAuthorize)
    }

    /// URL the OAuth code is exchanged at
    pub fn get_oauth_token_endpoint(&self) -> String {
        self.factory.server_url(Endpoint::OAuthToken)
    }

    /// Declare an OAuth access for a merchant.
    ///
    /// Without `ip_address`, the configuration's source address is used.
    pub async fn get_oauth_server_access(
        &self,
        email: &str,
        name: &str,
        ip_address: Option<IpAddr>,
    ) -> Result<Value> {
        let ip_address = ip_address
            .or_else(|| self.configuration().source_address())
            .ok_or_else(|| {
                PaygreenError::invalid_argument("No IP address given and no source address configured")
            })?;

        let body = OAuthAccessRequest {
            ip_address,
            email: email.to_string(),
            name: name.to_string(),
        };
        let request = self
            .factory
            .create_at_server_with_content(Endpoint::OAuthAccess, &body)?;
        self.execute(request).await
    }

    async fn post<T: Serialize + ?Sized>(&self, endpoint: Endpoint, content: &T) -> Result<Value> {
        let request = self.factory.create_with_content(endpoint, "", content)?;
        self.execute(request).await
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let body = self.transport.send(&request).await?;
        let response: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(url = request.url(), error = %e, "PayGreen response is not JSON");
            PaygreenError::Decode(e)
        })?;

        if let Some(code) = response.get("error").filter(|code| !code.is_null()) {
            debug!(url = request.url(), code = %code, "PayGreen returned an error");
            return Err(PaygreenError::Api { code: code.clone() });
        }

        Ok(response)
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PaygreenError::invalid_argument(format!("Missing {}", what)));
    }
    Ok(())
}
