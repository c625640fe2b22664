use crate::classifier::DiffClassifier;
use crate::dispatch::{ActionInvoker, TriggerDispatcher};
use crate::error::HandlerError;
use crate::event::{ChangeEvent, HandlerResponse, InvokingEvent};

pub struct EventHandler<I> {
    classifier: DiffClassifier,
    dispatcher: TriggerDispatcher<I>,
}

impl<I: ActionInvoker> EventHandler<I> {
    pub fn new(classifier: DiffClassifier, dispatcher: TriggerDispatcher<I>) -> Self {
        Self { classifier, dispatcher }
    }

    /// Handles one AWS Config rule invocation. `caller` is the name of the
    /// running function, passed on to the triggered action for traceability.
    pub async fn handle(&self, event: ChangeEvent, caller: &str) -> Result<HandlerResponse, HandlerError> {
        tracing::info!(
            "Received {} event for account {}",
            event.config_rule_name.as_deref().unwrap_or("unnamed rule"),
            event.account_id.as_deref().unwrap_or("unknown")
        );
        tracing::debug!("{:?}", event);

        let invoking_event = match event.invoking_event.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                tracing::info!("No \"invokingEvent\". Skip execution.");
                return Ok(HandlerResponse::done(None));
            }
        };

        let invoking_event: InvokingEvent =
            serde_json::from_str(invoking_event).map_err(HandlerError::MalformedEvent)?;

        let Some(diff) = invoking_event.configuration_item_diff.as_ref() else {
            tracing::info!(
                "No \"configurationItemDiff\" in {} message. Skip execution.",
                invoking_event.message_type.as_deref().unwrap_or("unknown")
            );
            return Ok(HandlerResponse::done(None));
        };

        if let Some(item) = &invoking_event.configuration_item {
            tracing::info!(
                "Classifying {} changed properties of {} {}",
                diff.changed_properties.len(),
                item.resource_type.as_deref().unwrap_or("unknown"),
                item.resource_id.as_deref().unwrap_or("unknown")
            );
        }

        let decision = self.classifier.classify(Some(diff));
        if !decision {
            tracing::info!("No significant changes, {} is not triggered.", self.dispatcher.target_action());
        }

        let result = self.dispatcher.dispatch(decision, caller).await?;
        Ok(HandlerResponse::done(result.status_code))
    }
}
