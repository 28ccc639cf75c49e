use reqwest::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    /// Rejected before any request was sent.
    Validation(String),
    /// The request never produced a response.
    Transport(String),
    /// Non-2xx response, with the server's `message` when it sent one.
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    /// A 2xx response whose body did not have the expected shape.
    Decode(String),
    Io(std::io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(err: impl std::error::Error) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn server(status: StatusCode, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    pub fn decode(err: impl std::error::Error) -> Self {
        Self::Decode(err.to_string())
    }

    /// Text to show the user: validation and server messages verbatim,
    /// `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Server {
                status,
                message: Some(message),
            } => write!(f, "server returned {status}: {message}"),
            Self::Server {
                status,
                message: None,
            } => write!(f, "server returned {status}"),
            Self::Decode(message) => write!(f, "unexpected response body: {message}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err)
        } else {
            Self::transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ClientError::server(
            StatusCode::BAD_REQUEST,
            Some("Exercise already in routine".into()),
        );
        assert_eq!(err.user_message("Failed"), "Exercise already in routine");
    }

    #[test]
    fn missing_or_blank_message_uses_fallback() {
        let err = ClientError::server(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(err.user_message("Failed to add exercise."), "Failed to add exercise.");

        let err = ClientError::server(StatusCode::BAD_GATEWAY, Some("  ".into()));
        assert_eq!(err.user_message("Failed"), "Failed");

        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.user_message("Failed"), "Failed");
    }
}
