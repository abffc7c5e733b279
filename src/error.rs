/// Errors raised while talking to the gallery server or the geocoder.
///
/// Every variant carries plain strings so the error can travel inside
/// `Message` values, which iced requires to be `Clone`.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, connection, TLS, body read)
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status and no usable error text
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// The server reported a logical failure; the text is shown verbatim
    #[error("{0}")]
    Server(String),

    /// The response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status(status.as_u16())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_verbatim() {
        let err = GatewayError::Server("File type not allowed".to_string());
        assert_eq!(err.to_string(), "File type not allowed");
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err: GatewayError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, GatewayError::Decode(_)));
    }
}
