use owlset_graph::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Missing API key. Set the {0} environment variable.")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited. Try again later.")]
    RateLimited,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
