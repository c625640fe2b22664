use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to encode trigger payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("failed to invoke {action}: {source}")]
    Invoke {
        action: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The upstream producer sent an invokingEvent that is not JSON.
    #[error("invokingEvent is not valid JSON: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
