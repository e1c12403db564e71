use event_forwarder::{EventForwarderService, ForwarderConfig, Response};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::error;

async fn function_handler(
    service: &EventForwarderService,
    event: LambdaEvent<Value>,
) -> Result<Response, Error> {
    Ok(service.forward(event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    // A bad endpoint fails init; the handler is never registered
    let config = ForwarderConfig::from_env().inspect_err(|e| error!("{}", e))?;
    let service = EventForwarderService::new(config);
    let service = &service;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(service, event).await
    }))
    .await
}
