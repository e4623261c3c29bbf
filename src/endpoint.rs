//! Static table of PayGreen operations

use crate::{PaygreenError, Result};
use std::fmt;
use std::str::FromStr;

/// Placeholder a path template may contain once
pub const PATH_PLACEHOLDER: &str = "%s";

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }
}

impl From<HttpVerb> for http::Method {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => http::Method::GET,
            HttpVerb::Post => http::Method::POST,
            HttpVerb::Put => http::Method::PUT,
            HttpVerb::Patch => http::Method::PATCH,
            HttpVerb::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verb and path template of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub verb: HttpVerb,
    pub path_template: &'static str,
}

impl EndpointDescriptor {
    const fn new(verb: HttpVerb, path_template: &'static str) -> Self {
        Self {
            verb,
            path_template,
        }
    }

    /// Whether the template expects a path parameter
    pub fn has_placeholder(&self) -> bool {
        self.path_template.contains(PATH_PLACEHOLDER)
    }

    /// Substitute `value` into the placeholder, or return the template verbatim
    pub fn format_path(&self, value: &str) -> String {
        if self.has_placeholder() {
            self.path_template.replacen(PATH_PLACEHOLDER, value, 1)
        } else {
            self.path_template.to_string()
        }
    }
}

/// Every operation the client knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CheckIds,
    OAuthAuthorize,
    OAuthToken,
    OAuthAccess,
    GetObject,
    ShopValidate,
    PayinCarbon,
    PayinCash,
    PayinSubscription,
    PayinTokenize,
    PayinXTime,
    PayinDetails,
    PayinConfirm,
    PayinRefund,
    SolidarityGet,
    SolidarityValidate,
    SolidarityRefund,
}

impl Endpoint {
    pub const ALL: [Endpoint; 17] = [
        Endpoint::CheckIds,
        Endpoint::OAuthAuthorize,
        Endpoint::OAuthToken,
        Endpoint::OAuthAccess,
        Endpoint::GetObject,
        Endpoint::ShopValidate,
        Endpoint::PayinCarbon,
        Endpoint::PayinCash,
        Endpoint::PayinSubscription,
        Endpoint::PayinTokenize,
        Endpoint::PayinXTime,
        Endpoint::PayinDetails,
        Endpoint::PayinConfirm,
        Endpoint::PayinRefund,
        Endpoint::SolidarityGet,
        Endpoint::SolidarityValidate,
        Endpoint::SolidarityRefund,
    ];

    pub const fn descriptor(&self) -> EndpointDescriptor {
        use HttpVerb::*;

        match self {
            Endpoint::CheckIds => EndpointDescriptor::new(Get, ""),
            Endpoint::OAuthAuthorize => EndpointDescriptor::new(Get, "/auth/authorize"),
            Endpoint::OAuthToken => EndpointDescriptor::new(Post, "/auth/access_token"),
            Endpoint::OAuthAccess => EndpointDescriptor::new(Post, "/auth"),
            Endpoint::GetObject => EndpointDescriptor::new(Get, "/%s"),
            Endpoint::ShopValidate => EndpointDescriptor::new(Patch, "/shop"),
            Endpoint::PayinCarbon => EndpointDescriptor::new(Post, "/payins/ccarbone"),
            Endpoint::PayinCash => EndpointDescriptor::new(Post, "/payins/transaction/cash"),
            Endpoint::PayinSubscription => {
                EndpointDescriptor::new(Post, "/payins/transaction/subscription")
            }
            Endpoint::PayinTokenize => EndpointDescriptor::new(Post, "/payins/transaction/tokenize"),
            Endpoint::PayinXTime => EndpointDescriptor::new(Post, "/payins/transaction/xTime"),
            Endpoint::PayinDetails => EndpointDescriptor::new(Get, "/payins/transaction/%s"),
            Endpoint::PayinConfirm => EndpointDescriptor::new(Put, "/payins/transaction/%s"),
            Endpoint::PayinRefund => EndpointDescriptor::new(Delete, "/payins/transaction/%s"),
            Endpoint::SolidarityGet => EndpointDescriptor::new(Get, "/solidarity/%s"),
            Endpoint::SolidarityValidate => EndpointDescriptor::new(Patch, "/solidarity/%s"),
            Endpoint::SolidarityRefund => EndpointDescriptor::new(Delete, "/solidarity/%s"),
        }
    }

    /// Wire key of the operation, e.g. `create-cash`
    pub const fn key(&self) -> &'static str {
        match self {
            Endpoint::CheckIds => "are-valid-ids",
            Endpoint::OAuthAuthorize => "oauth",
            Endpoint::OAuthToken => "oauth-token",
            Endpoint::OAuthAccess => "oauth-access",
            Endpoint::GetObject => "get-data",
            Endpoint::ShopValidate => "validate-shop",
            Endpoint::PayinCarbon => "payin-ccarbone",
            Endpoint::PayinCash => "create-cash",
            Endpoint::PayinSubscription => "create-subscription",
            Endpoint::PayinTokenize => "create-tokenize",
            Endpoint::PayinXTime => "create-xtime",
            Endpoint::PayinDetails => "payin-details",
            Endpoint::PayinConfirm => "delivery",
            Endpoint::PayinRefund => "refund",
            Endpoint::SolidarityGet => "get-rounding",
            Endpoint::SolidarityValidate => "validate-rounding",
            Endpoint::SolidarityRefund => "refund-rounding",
        }
    }

    pub fn verb(&self) -> HttpVerb {
        self.descriptor().verb
    }

    pub fn path_template(&self) -> &'static str {
        self.descriptor().path_template
    }
}

impl FromStr for Endpoint {
    type Err = PaygreenError;

    fn from_str(key: &str) -> Result<Self> {
        Endpoint::ALL
            .iter()
            .copied()
            .find(|endpoint| endpoint.key() == key)
            .ok_or_else(|| PaygreenError::unknown_operation(key))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolve a wire key to its descriptor
pub fn lookup(operation: &str) -> Result<EndpointDescriptor> {
    operation.parse::<Endpoint>().map(|endpoint| endpoint.descriptor())
}
