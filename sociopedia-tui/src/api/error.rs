use thiserror::Error;

fn details(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details")
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error ({status}): {}", details(.message))]
    Api { status: u16, message: Option<String> },

    #[error("Not found: {}", details(.0))]
    NotFound(Option<String>),

    #[error("Unauthorized: {}", details(.0))]
    Unauthorized(Option<String>),

    #[error("Bad request: {}", details(.0))]
    BadRequest(Option<String>),

    /// 2xx response whose envelope says `success: false`
    #[error("Request rejected: {}", details(.0))]
    Rejected(Option<String>),

    /// Successful envelope missing a field the caller depends on
    #[error("Malformed response: missing `{0}`")]
    MalformedResponse(&'static str),
}

impl ApiError {
    /// Message the server attached to the failure, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ApiError::Api { message, .. } => message,
            ApiError::NotFound(message)
            | ApiError::Unauthorized(message)
            | ApiError::BadRequest(message)
            | ApiError::Rejected(message) => message,
            _ => return None,
        };
        message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// Text for a user-facing notification, falling back when the server said nothing
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
