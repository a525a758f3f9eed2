use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} ({response_code}): {message}")]
    Api {
        status: u16,
        response_code: String,
        message: String,
    },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ComputeError {
    /// The API's response code, if the server answered with one.
    pub fn response_code(&self) -> Option<&str> {
        match self {
            Self::Api { response_code, .. } => Some(response_code),
            _ => None,
        }
    }
}

/// Walk the full error chain and join all causes into one string.
///
/// `reqwest` errors often have terse `Display` impls (e.g. "error sending
/// request") but useful detail in the source chain.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
