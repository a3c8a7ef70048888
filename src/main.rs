use github2rundeck::handler::{Adapter, function_handler};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    let adapter = Adapter::from_env()?;
    let adapter = &adapter;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(adapter, event).await
    }))
    .await
}
