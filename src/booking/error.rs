use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no Hostex API key configured (set {0} or `api_key` in the config file)")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reservation source answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no reservation list: {0}")]
    UnexpectedShape(String),

    #[error("the Hostex API key is empty")]
    EmptyApiKey,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Server errors and transport failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
