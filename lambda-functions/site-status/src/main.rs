use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use site_status::SiteStatusService;

/// The request body carries no parameters; only configuration drives the check.
///
/// `lambda_runtime` serializes the returned `String` as JSON, so on the wire
/// the report arrives as a quoted string literal with escaped newlines.
async fn function_handler(_event: LambdaEvent<Value>) -> Result<String, Error> {
    let service = SiteStatusService::new();
    Ok(service.run_site_check().await.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    run(service_fn(function_handler)).await
}
