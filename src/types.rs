//! Request bodies and merged responses for the PayGreen API

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::net::IpAddr;

/// Body of the payin creation calls (cash, x-time, subscription, tokenize)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayinRequest {
    /// Merchant-side order reference
    pub order_id: String,
    /// Amount in minor units (cents)
    pub amount: i64,
    /// ISO 4217 code, e.g. "EUR"
    pub currency: String,
    /// Payment method, e.g. "CB"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    /// Server-to-server notification URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified_url: Option<String>,
    /// Where the buyer lands after paying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    /// Schedule for x-time and subscription payins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_details: Option<OrderDetails>,
    /// Carbon footprint record attached to the order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, String>,
}

impl PayinRequest {
    pub fn new(order_id: impl Into<String>, amount: i64, currency: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency: currency.into(),
            payment_type: None,
            notified_url: None,
            returned_url: None,
            buyer: None,
            shipping_address: None,
            billing_address: None,
            order_details: None,
            id_fingerprint: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = Some(payment_type.into());
        self
    }

    pub fn with_urls(mut self, notified_url: impl Into<String>, returned_url: impl Into<String>) -> Self {
        self.notified_url = Some(notified_url.into());
        self.returned_url = Some(returned_url.into());
        self
    }

    pub fn with_buyer(mut self, buyer: Buyer) -> Self {
        self.buyer = Some(buyer);
        self
    }

    pub fn with_shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    pub fn with_order_details(mut self, details: OrderDetails) -> Self {
        self.order_details = Some(details);
        self
    }

    pub fn with_fingerprint(mut self, id_fingerprint: impl Into<String>) -> Self {
        self.id_fingerprint = Some(id_fingerprint.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Buyer identity sent with a payin
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub last_name: String,
    pub first_name: String,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
}

/// Installment or recurrence schedule
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    /// Days between payments (x-time) or recurrence code (subscription)
    pub cycle: u32,
    /// Number of payments
    pub count: u32,
    /// Day of month for subscriptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// First debit date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    /// First installment in minor units when it differs from the others
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_amount: Option<i64>,
}

/// Body of a payin refund
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefundRequest {
    /// Amount in minor units
    pub amount: i64,
}

impl RefundRequest {
    /// Convert a major-unit amount (e.g. `12.5` euros) to a refund of `1250`.
    ///
    /// Fractions of a minor unit are rounded half away from zero. Amounts
    /// that overflow on conversion yield `None`.
    pub fn from_major_units(amount: Decimal) -> Option<Self> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(|amount| Self { amount })
    }
}

/// Body of the shop activation call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateShopRequest {
    pub activate: u8,
}

/// Body of a rounding refund
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundingRefundRequest {
    pub payment_token: String,
}

/// Body of the OAuth access declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OAuthAccessRequest {
    pub ip_address: IpAddr,
    pub email: String,
    pub name: String,
}

/// Account, bank and shop information merged into one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub siret: Option<String>,
    #[serde(rename = "IBAN")]
    pub iban: Option<String>,
    pub url: Option<String>,
    pub modules: Value,
    pub solidarity_type: Option<String>,
    /// False only when url, siret and IBAN are all empty
    pub valid: bool,
}

impl AccountData {
    /// Merge the `data` payloads of the account, bank and shop objects
    pub fn merge(account: &Value, bank: &Value, shop: &Value) -> Self {
        let account_data = &account["data"];
        let shop_data = &shop["data"];

        // A set business identifier overrides the account siret, even when empty
        let siret = match &shop_data["businessIdentifier"] {
            Value::Null => non_empty_string(&account_data["siret"]),
            identifier => non_empty_string(identifier),
        };

        // Last default entry wins when several are flagged
        let iban = bank["data"]
            .as_array()
            .into_iter()
            .flatten()
            .filter(|rib| is_default_flag(&rib["isDefault"]))
            .filter_map(|rib| non_empty_string(&rib["iban"]))
            .last();

        let url = non_empty_string(&shop_data["url"]);
        let solidarity_type = non_empty_string(&shop_data["extra"]["solidarityType"]);

        let valid = url.is_some() || siret.is_some() || iban.is_some();

        Self {
            siret,
            iban,
            url,
            modules: shop_data["modules"].clone(),
            solidarity_type,
            valid,
        }
    }
}

/// Loose truthiness the gateway relies on: `true`, non-zero numbers, and
/// strings other than `""` and `"0"`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Bank entries are flagged default with `"1"`, `1` or `true` and nothing else
fn is_default_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => s == "1",
        _ => false,
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
