use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::http::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::json;

/// The four success shapes the API returns, each bound to a fixed message
/// and status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Fetch,
    Save,
    Edit,
    Delete,
}

impl ResponseKind {
    pub fn message(&self) -> &'static str {
        match self {
            ResponseKind::Fetch => "Fetch Success",
            ResponseKind::Save => "Data successfully saved.",
            ResponseKind::Edit => "Data successfully edited.",
            ResponseKind::Delete => "Data successfully deleted.",
        }
    }

    pub fn status_code(&self) -> i64 {
        match self {
            ResponseKind::Fetch => 200,
            ResponseKind::Save | ResponseKind::Edit | ResponseKind::Delete => 201,
        }
    }
}

/// Optional deviations from the default HTTP-level wrapper.
#[derive(Debug, Default)]
pub struct Overrides {
    pub status_code: Option<i64>,
    pub headers: Option<HeaderMap>,
    pub is_base64_encoded: Option<bool>,
}

/// Headers sent with every response: JSON content type plus permissive CORS.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    headers
}

/// Merges override headers over the defaults into a fresh map.
pub fn merge_headers(overrides: Option<HeaderMap>) -> HeaderMap {
    let mut headers = default_headers();
    if let Some(extra) = overrides {
        for (name, value) in extra.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    headers
}

/// Wraps a successful payload in the `{success, message, data}` envelope.
/// The payload is passed through untouched.
pub fn gateway_response<T: Serialize>(kind: ResponseKind, data: &T) -> ApiGatewayProxyResponse {
    let envelope = json!({
        "success": true,
        "message": kind.message(),
        "data": serde_json::to_value(data).unwrap_or_default(),
    });

    ApiGatewayProxyResponse {
        status_code: kind.status_code(),
        headers: merge_headers(None),
        multi_value_headers: HeaderMap::new(),
        body: Some(Body::Text(envelope.to_string())),
        is_base64_encoded: false,
    }
}

/// Empty CORS preflight reply.
pub fn preflight_response() -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: 204,
        headers: merge_headers(None),
        multi_value_headers: HeaderMap::new(),
        body: None,
        is_base64_encoded: false,
    }
}
