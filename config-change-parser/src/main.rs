mod classifier;
mod config;
mod dispatch;
mod error;
mod event;
mod handler;
mod rules;

use lambda_runtime::{service_fn, Error, LambdaEvent};

use classifier::DiffClassifier;
use config::Config;
use dispatch::{LambdaInvoker, TriggerDispatcher};
use event::ChangeEvent;
use handler::EventHandler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .without_time()
        .with_max_level(config::log_level_from_env())
        .init();

    let config = Config::from_env().map_err(|err| {
        tracing::error!("Invalid configuration: {}", err);
        err
    })?;

    tracing::info!(
        "Starting with target {} and ignored resource types {:?}",
        config.inventory_function_name,
        config.ignore_list.as_slice()
    );

    let client = aws_sdk_lambda::Client::new(&aws_config::load_from_env().await);
    let handler = EventHandler::new(
        DiffClassifier::new(config.ignore_list),
        TriggerDispatcher::new(LambdaInvoker::new(client), config.inventory_function_name),
    );
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ChangeEvent>| async move {
        let caller = event.context.env_config.function_name.clone();
        handler.handle(event.payload, &caller).await.map_err(|err| {
            tracing::error!("Failed to handle config change event: {}", err);
            Error::from(err)
        })
    }))
    .await
}
