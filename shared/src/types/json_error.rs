use serde::{Deserialize, Serialize};

/// JSON body for every failed API call:
/// `{"status":"error","code":"...","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn from_error<E: ApiError + ?Sized>(error: &E) -> Self {
        Self::new(error.to_code(), &error.to_message())
    }
}

/// A per-operation failure that can be reported to the client.
///
/// `to_code` is the stable machine-readable identifier, `to_message` the text
/// shown to users.
pub trait ApiError {
    fn to_code(&self) -> &'static str;

    fn to_message(&self) -> String;

    fn to_response(&self) -> ErrorResponse {
        ErrorResponse::from_error(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Teapot;

    impl ApiError for Teapot {
        fn to_code(&self) -> &'static str {
            "TEAPOT"
        }

        fn to_message(&self) -> String {
            "Short and stout".to_string()
        }
    }

    #[test]
    fn response_carries_code_and_message() {
        assert_eq!(
            Teapot.to_response(),
            ErrorResponse::new("TEAPOT", "Short and stout")
        );
    }

    #[test]
    fn status_is_always_error() {
        let json = serde_json::to_value(Teapot.to_response()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "TEAPOT");
    }
}
