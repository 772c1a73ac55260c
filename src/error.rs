use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::http::HeaderMap;
use serde_json::{json, Value};
use thiserror::Error;

use crate::response::{merge_headers, Overrides};
use crate::store::StoreError;

/// Closed catalog of failure conditions, each keyed by a fixed name and
/// bound to a fixed message. Kinds below the todo group come from the
/// shared catalog and are not raised by this handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnknownError,
    RouteNotFound,

    TodoNotFound,
    TodoIdMissing,
    TodoTitleMissing,

    MissingToken,
    UnauthorizedAction,
    UserNotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "UnknownError",
            ErrorCode::RouteNotFound => "RouteNotFound",
            ErrorCode::TodoNotFound => "TodoNotFound",
            ErrorCode::TodoIdMissing => "TodoIdMissing",
            ErrorCode::TodoTitleMissing => "TodoTitleMissing",
            ErrorCode::MissingToken => "MissingToken",
            ErrorCode::UnauthorizedAction => "UnauthorizedAction",
            ErrorCode::UserNotFound => "UserNotFound",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "An unknown error has occurred",
            ErrorCode::RouteNotFound => "Route not found",
            ErrorCode::TodoNotFound => "Todo not found",
            ErrorCode::TodoIdMissing => "Todo ID is missing",
            ErrorCode::TodoTitleMissing => "Todo title is missing",
            ErrorCode::MissingToken => "There is no token sent",
            ErrorCode::UnauthorizedAction => "You are not authorized to do this action",
            ErrorCode::UserNotFound => "User not found",
        }
    }
}

/// A typed failure raised by an operation, optionally carrying structured
/// context that is merged into the envelope as `meta`.
#[derive(Debug, Error)]
#[error("{}", .code.message())]
pub struct ApiError {
    pub code: ErrorCode,
    pub meta: Option<Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode) -> Self {
        Self { code, meta: None }
    }

    pub fn with_meta(code: ErrorCode, meta: Value) -> Self {
        Self {
            code,
            meta: Some(meta),
        }
    }

    /// Renders the error into the response envelope with the default
    /// wrapper: status 400, JSON content type, permissive CORS.
    pub fn into_response(self) -> ApiGatewayProxyResponse {
        self.into_response_with(Overrides::default())
    }

    /// Same as [`into_response`](Self::into_response) but honoring wrapper
    /// overrides. The error is logged before formatting.
    pub fn into_response_with(self, overrides: Overrides) -> ApiGatewayProxyResponse {
        tracing::error!(
            error_code = self.code.as_str(),
            message = self.code.message(),
            "Request failed"
        );

        let mut envelope = json!({
            "success": false,
            "errorCode": self.code.as_str(),
            "message": self.code.message(),
        });
        if let Some(meta) = self.meta {
            // Empty meta objects are dropped from the envelope.
            if meta.as_object().map_or(true, |m| !m.is_empty()) {
                envelope["meta"] = meta;
            }
        }

        ApiGatewayProxyResponse {
            status_code: overrides.status_code.unwrap_or(400),
            headers: merge_headers(overrides.headers),
            multi_value_headers: HeaderMap::new(),
            body: Some(Body::Text(envelope.to_string())),
            is_base64_encoded: overrides.is_base64_encoded.unwrap_or(false),
        }
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self {
        ApiError::new(code)
    }
}

// Store-level failures are not distinguished from application errors; they
// collapse to UnknownError with status 400 like everything else.
impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Store operation failed");
        ApiError::new(ErrorCode::UnknownError)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        tracing::error!(error = %e, "Failed to parse request body");
        ApiError::new(ErrorCode::UnknownError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(resp: &ApiGatewayProxyResponse) -> Value {
        match resp.body.as_ref() {
            Some(Body::Text(text)) => serde_json::from_str(text).expect("body should be JSON"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn error_envelope_carries_code_and_fixed_message() {
        let resp = ApiError::new(ErrorCode::TodoNotFound).into_response();
        assert_eq!(resp.status_code, 400);
        assert!(!resp.is_base64_encoded);
        let body = body_json(&resp);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorCode"], "TodoNotFound");
        assert_eq!(body["message"], "Todo not found");
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn meta_is_merged_when_present() {
        let err = ApiError::with_meta(ErrorCode::TodoIdMissing, json!({"field": "id"}));
        let body = body_json(&err.into_response());
        assert_eq!(body["meta"]["field"], "id");
    }

    #[test]
    fn empty_meta_object_is_dropped() {
        let err = ApiError::with_meta(ErrorCode::TodoIdMissing, json!({}));
        let body = body_json(&err.into_response());
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn status_override_wins_over_default_400() {
        let resp = ApiError::new(ErrorCode::RouteNotFound).into_response_with(Overrides {
            status_code: Some(404),
            ..Overrides::default()
        });
        assert_eq!(resp.status_code, 404);
    }

    #[test]
    fn store_errors_collapse_to_unknown() {
        let err: ApiError = StoreError::Request("connection reset".to_string()).into();
        assert_eq!(err.code, ErrorCode::UnknownError);
        let body = body_json(&err.into_response());
        assert_eq!(body["errorCode"], "UnknownError");
        assert_eq!(body["message"], "An unknown error has occurred");
    }

    #[test]
    fn response_headers_include_json_and_cors() {
        let resp = ApiError::new(ErrorCode::UnknownError).into_response();
        assert_eq!(resp.headers["Content-Type"], "application/json");
        assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
    }
}
