use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::http::Method;

use crate::error::{ApiError, ErrorCode};
use crate::handlers;
use crate::models::TodoPayload;
use crate::response::{preflight_response, Overrides};
use crate::store::TodoStore;

/// Dispatches one API Gateway invocation and always returns a formatted
/// envelope; no error escapes unformatted.
pub async fn dispatch<S: TodoStore>(
    request: ApiGatewayProxyRequest,
    store: &S,
) -> ApiGatewayProxyResponse {
    let resource = request.resource.clone().unwrap_or_default();
    let method = request.http_method.clone();

    tracing::info!(resource = %resource, method = %method, "Incoming request");

    match route(request, store).await {
        Ok(resp) => resp,
        Err(err) => {
            let overrides = match err.code {
                // Chosen policy for unmatched routes: an explicit 404
                // instead of the validation-failure default.
                ErrorCode::RouteNotFound => Overrides {
                    status_code: Some(404),
                    ..Overrides::default()
                },
                _ => Overrides::default(),
            };
            err.into_response_with(overrides)
        }
    }
}

async fn route<S: TodoStore>(
    request: ApiGatewayProxyRequest,
    store: &S,
) -> Result<ApiGatewayProxyResponse, ApiError> {
    if request.http_method == Method::OPTIONS {
        return Ok(preflight_response());
    }

    // The body is parsed up front; a malformed body fails the whole
    // request as UnknownError regardless of the route.
    let payload: TodoPayload = match request.body.as_deref() {
        Some(raw) => serde_json::from_str(raw)?,
        None => TodoPayload::default(),
    };
    let id = request
        .path_parameters
        .get("id")
        .cloned()
        .unwrap_or_default();
    let resource = request.resource.as_deref().unwrap_or_default();

    match (resource, request.http_method.as_str()) {
        ("/todo", "GET") => handlers::list_todos(store).await,
        ("/todo", "POST") => handlers::create_todo(store, payload).await,
        ("/todo/{id}", "PUT") => handlers::update_todo(store, &id, payload).await,
        ("/todo/{id}", "DELETE") => handlers::delete_todo(store, &id).await,
        ("/todo/complete/{id}", _) => handlers::complete_todo(store, &id).await,
        _ => Err(ApiError::new(ErrorCode::RouteNotFound)),
    }
}
