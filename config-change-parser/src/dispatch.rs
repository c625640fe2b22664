use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde::Serialize;

use crate::error::DispatchError;

#[derive(Debug, Serialize)]
struct TriggerPayload<'a> {
    #[serde(rename = "TriggeredBy")]
    triggered_by: &'a str,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub status_code: Option<i32>,
}

/// Starts a downstream action without waiting for it to finish.
#[async_trait]
pub trait ActionInvoker: Send + Sync {
    /// Returns the status code of the acceptance acknowledgment. A successful
    /// return only means the action was queued, not that it completed.
    async fn invoke_async(&self, action_name: &str, payload: Vec<u8>) -> Result<i32, DispatchError>;
}

pub struct LambdaInvoker {
    client: Client,
}

impl LambdaInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionInvoker for LambdaInvoker {
    async fn invoke_async(&self, action_name: &str, payload: Vec<u8>) -> Result<i32, DispatchError> {
        let output = self
            .client
            .invoke()
            .function_name(action_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|err| DispatchError::Invoke {
                action: action_name.to_string(),
                source: Box::new(aws_sdk_lambda::Error::from(err)),
            })?;

        Ok(output.status_code())
    }
}

pub struct TriggerDispatcher<I> {
    invoker: I,
    target_action: String,
}

impl<I: ActionInvoker> TriggerDispatcher<I> {
    pub fn new(invoker: I, target_action: impl Into<String>) -> Self {
        Self {
            invoker,
            target_action: target_action.into(),
        }
    }

    pub fn target_action(&self) -> &str {
        &self.target_action
    }

    /// Invokes the target action once when `decision` is true.
    pub async fn dispatch(&self, decision: bool, caller: &str) -> Result<DispatchResult, DispatchError> {
        if !decision {
            return Ok(DispatchResult::default());
        }

        let payload = serde_json::to_vec(&TriggerPayload { triggered_by: caller })?;

        tracing::info!("Triggering {} lambda", self.target_action);
        let status_code = self.invoker.invoke_async(&self.target_action, payload).await?;
        tracing::info!("Invocation of {} accepted with status {}", self.target_action, status_code);

        Ok(DispatchResult {
            status_code: Some(status_code),
        })
    }
}
