use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing_subscriber::EnvFilter;

use todo_service::config::Config;
use todo_service::router;
use todo_service::store::DynamoStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();
    // One connection, established before the first dispatch and reused
    // across invocations.
    let store = DynamoStore::new(&config.table_name).await;

    run(service_fn(
        move |event: LambdaEvent<ApiGatewayProxyRequest>| {
            let store = store.clone();
            async move {
                let (request, context) = event.into_parts();
                tracing::info!(request_id = %context.request_id, "Handling invocation");
                Ok::<ApiGatewayProxyResponse, Error>(router::dispatch(request, &store).await)
            }
        },
    ))
    .await
}
