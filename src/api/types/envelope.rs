//! Uniform `{Success, data, message}` response body

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Body returned by every endpoint
///
/// Serialized as `{"Success": true, "data": ..., "message": ...}` on success
/// (either field may be absent) and `{"Success": false, "message": ...}` on
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success {
        data: Option<T>,
        message: Option<String>,
    },
    Failure {
        message: String,
    },
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self::Success {
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Attach a message to a success body; failures are left untouched
    pub fn with_message(self, message: impl Into<String>) -> Self {
        match self {
            Self::Success { data, .. } => Self::Success {
                data,
                message: Some(message.into()),
            },
            failure => failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl Envelope<()> {
    /// A success carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self::Success {
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        match self {
            Self::Success { data, message } => {
                map.serialize_entry("Success", &true)?;
                if let Some(data) = data {
                    map.serialize_entry("data", data)?;
                }
                if let Some(message) = message {
                    map.serialize_entry("message", message)?;
                }
            }
            Self::Failure { message } => {
                map.serialize_entry("Success", &false)?;
                map.serialize_entry("message", message)?;
            }
        }

        map.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_data() {
        let body = serde_json::to_value(Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(body, json!({"Success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_message_only() {
        let body = serde_json::to_value(Envelope::message("User deleted Successfully!")).unwrap();
        assert_eq!(body, json!({"Success": true, "message": "User deleted Successfully!"}));
    }

    #[test]
    fn test_data_with_message() {
        let body = serde_json::to_value(Envelope::data("x").with_message("done")).unwrap();
        assert_eq!(body, json!({"Success": true, "data": "x", "message": "done"}));
    }

    #[test]
    fn test_failure() {
        let envelope = Envelope::<()>::failure("User already exists").with_message("ignored");

        assert!(!envelope.is_success());
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({"Success": false, "message": "User already exists"})
        );
    }
}
