//! Building authenticated requests from the endpoint table

use crate::config::ApiConfiguration;
use crate::endpoint::{Endpoint, HttpVerb};
use crate::{PaygreenError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

/// Characters escaped when a value is substituted into a path template
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A fully described HTTP call: the transport needs nothing else to send it
#[derive(Clone)]
pub struct ApiRequest {
    url: String,
    verb: HttpVerb,
    body: String,
    headers: Vec<(String, String)>,
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "Bearer <redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("ApiRequest")
            .field("verb", &self.verb)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

impl ApiRequest {
    fn new(private_key: &str, verb: HttpVerb, url: String) -> Self {
        Self {
            url,
            verb,
            body: String::new(),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", private_key)),
                ("Accept".to_string(), "application/json".to_string()),
                ("Cache-Control".to_string(), "no-cache".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    /// JSON body, empty when the operation sends none
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Headers in the order they are sent
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Headers rendered as `Name: value` lines
    pub fn header_lines(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect()
    }
}

/// Turns an operation, a path value and an optional body into an [`ApiRequest`]
#[derive(Debug, Clone)]
pub struct ApiRequestFactory {
    configuration: ApiConfiguration,
}

impl ApiRequestFactory {
    pub fn new(configuration: ApiConfiguration) -> Self {
        Self { configuration }
    }

    pub fn configuration(&self) -> &ApiConfiguration {
        &self.configuration
    }

    /// Build a request without a body
    pub fn create(&self, endpoint: Endpoint, value: &str) -> ApiRequest {
        let descriptor = endpoint.descriptor();
        ApiRequest::new(
            self.configuration.private_key(),
            descriptor.verb,
            self.build_url(endpoint, value),
        )
    }

    /// Build a request carrying `content` as its JSON body
    pub fn create_with_content<T>(&self, endpoint: Endpoint, value: &str, content: &T) -> Result<ApiRequest>
    where
        T: Serialize + ?Sized,
    {
        attach_content(self.create(endpoint, value), endpoint, content)
    }

    /// Build a request against [`server_url`](Self::server_url), outside any tenant
    pub fn create_at_server(&self, endpoint: Endpoint) -> ApiRequest {
        ApiRequest::new(
            self.configuration.private_key(),
            endpoint.verb(),
            self.server_url(endpoint),
        )
    }

    /// Server-level request carrying `content` as its JSON body
    pub fn create_at_server_with_content<T>(&self, endpoint: Endpoint, content: &T) -> Result<ApiRequest>
    where
        T: Serialize + ?Sized,
    {
        attach_content(self.create_at_server(endpoint), endpoint, content)
    }

    /// Same as [`create`](Self::create) for callers holding a wire key such as `"create-cash"`
    pub fn create_from_key(&self, key: &str, value: &str) -> Result<ApiRequest> {
        let endpoint = key.parse::<Endpoint>()?;
        Ok(self.create(endpoint, value))
    }

    /// URL of an endpoint directly under the API root, outside any tenant
    pub fn server_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.configuration.api_server_url(), endpoint.path_template())
    }

    fn build_url(&self, endpoint: Endpoint, value: &str) -> String {
        let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
        format!(
            "{}/{}{}",
            self.configuration.api_server_url(),
            self.configuration.unique_identifier(),
            endpoint.descriptor().format_path(&encoded)
        )
    }
}

fn attach_content<T>(mut request: ApiRequest, endpoint: Endpoint, content: &T) -> Result<ApiRequest>
where
    T: Serialize + ?Sized,
{
    request.body = serde_json::to_string(content).map_err(|e| {
        PaygreenError::invalid_argument(format!("Request body for {} is not serializable: {}", endpoint, e))
    })?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn factory() -> ApiRequestFactory {
        ApiRequestFactory::new(ApiConfiguration::new("PP42", "pk_test").unwrap())
    }

    #[test]
    fn test_url_with_placeholder() {
        let request = factory().create(Endpoint::PayinDetails, "tr_1");
        assert_eq!(request.url(), "https://paygreen.fr/api/42/payins/transaction/tr_1");
        assert_eq!(request.verb(), HttpVerb::Get);
        assert_eq!(request.body(), "");
    }

    #[test]
    fn test_url_without_placeholder() {
        let request = factory().create(Endpoint::PayinCash, "");
        assert_eq!(request.url(), "https://paygreen.fr/api/42/payins/transaction/cash");

        let request = factory().create(Endpoint::CheckIds, "");
        assert_eq!(request.url(), "https://paygreen.fr/api/42");
    }

    #[test]
    fn test_path_value_is_escaped() {
        let request = factory().create(Endpoint::SolidarityGet, "a/b c");
        assert_eq!(request.url(), "https://paygreen.fr/api/42/solidarity/a%2Fb%20c");
    }

    #[test]
    fn test_headers_in_order() {
        let request = factory().create(Endpoint::GetObject, "shop");
        assert_eq!(
            request.header_lines(),
            vec![
                "Authorization: Bearer pk_test",
                "Accept: application/json",
                "Cache-Control: no-cache",
                "Content-Type: application/json",
            ]
        );
        assert_eq!(request.header("authorization"), Some("Bearer pk_test"));
    }

    #[test]
    fn test_body_is_json() {
        let request = factory()
            .create_with_content(Endpoint::ShopValidate, "", &json!({ "activate": 1 }))
            .unwrap();
        assert_eq!(request.verb(), HttpVerb::Patch);
        assert_eq!(request.body(), r#"{"activate":1}"#);
    }

    #[test]
    fn test_create_from_unknown_key() {
        let result = factory().create_from_key("get-datas", "");
        assert!(matches!(result, Err(PaygreenError::UnknownOperation { .. })));

        let request = factory().create_from_key("delivery", "tr_9").unwrap();
        assert_eq!(request.verb(), HttpVerb::Put);
    }

    #[test]
    fn test_server_url() {
        assert_eq!(
            factory().server_url(Endpoint::OAuthAuthorize),
            "https://paygreen.fr/api/auth/authorize"
        );
    }

    #[test]
    fn test_server_request_skips_tenant() {
        let request = factory()
            .create_at_server_with_content(Endpoint::OAuthAccess, &json!({ "name": "Shop" }))
            .unwrap();
        assert_eq!(request.url(), "https://paygreen.fr/api/auth");
        assert_eq!(request.verb(), HttpVerb::Post);
        assert_eq!(request.body(), r#"{"name":"Shop"}"#);
        assert_eq!(request.header("Authorization"), Some("Bearer pk_test"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let request = factory().create(Endpoint::GetObject, "shop");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("pk_test"));
    }
}
