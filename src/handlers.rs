use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use chrono::Utc;

use crate::error::{ApiError, ErrorCode};
use crate::models::TodoPayload;
use crate::response::{gateway_response, ResponseKind};
use crate::store::TodoStore;

type HandlerResult = Result<ApiGatewayProxyResponse, ApiError>;

pub async fn list_todos<S: TodoStore>(store: &S) -> HandlerResult {
    let todos = store.find_all().await?;
    Ok(gateway_response(ResponseKind::Fetch, &todos))
}

pub async fn create_todo<S: TodoStore>(store: &S, payload: TodoPayload) -> HandlerResult {
    let title = match payload.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(ApiError::new(ErrorCode::TodoTitleMissing)),
    };

    let todo = store.insert(&title).await?;
    Ok(gateway_response(ResponseKind::Save, &todo))
}

pub async fn update_todo<S: TodoStore>(store: &S, id: &str, payload: TodoPayload) -> HandlerResult {
    if id.is_empty() {
        return Err(ApiError::new(ErrorCode::TodoIdMissing));
    }

    let title = match payload.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(ApiError::new(ErrorCode::TodoTitleMissing)),
    };

    if !store.is_valid_id(id) {
        return Err(ApiError::new(ErrorCode::TodoNotFound));
    }

    let mut todo = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCode::TodoNotFound))?;

    todo.title = title;
    todo.updated_at = Some(Utc::now().to_rfc3339());

    let saved = store.save(&todo).await?;
    Ok(gateway_response(ResponseKind::Edit, &saved))
}

// An empty id fails the format check and maps to TodoNotFound here, not
// TodoIdMissing as in update.
pub async fn delete_todo<S: TodoStore>(store: &S, id: &str) -> HandlerResult {
    if !store.is_valid_id(id) {
        return Err(ApiError::new(ErrorCode::TodoNotFound));
    }

    let todo = store
        .delete_by_id(id)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCode::TodoNotFound))?;

    Ok(gateway_response(ResponseKind::Delete, &todo))
}

pub async fn complete_todo<S: TodoStore>(store: &S, id: &str) -> HandlerResult {
    if !store.is_valid_id(id) {
        return Err(ApiError::new(ErrorCode::TodoNotFound));
    }

    let mut todo = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCode::TodoNotFound))?;

    todo.completed = !todo.completed;
    todo.updated_at = Some(Utc::now().to_rfc3339());

    let saved = store.save(&todo).await?;
    Ok(gateway_response(ResponseKind::Edit, &saved))
}
