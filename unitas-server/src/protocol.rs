//! Wire types: one JSON object per line in each direction

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use unitas_core::UnitError;

/// Protocol-level error codes; engine errors use `UnitError::code()`
pub mod codes {
    pub const PARSE_REQUEST: &str = "PARSE_REQUEST";
    pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
    pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
    pub const INTERNAL: &str = "INTERNAL";
}

#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

impl Request {
    /// Requests without an id are notifications and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    pub fn ok(id: Option<JsonValue>, result: JsonValue) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<JsonValue>, error: RpcError) -> Self {
        Response {
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

impl RpcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        RpcError {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }
}

impl From<UnitError> for RpcError {
    fn from(err: UnitError) -> Self {
        RpcError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_id() {
        let request: Request = serde_json::from_str(r#"{"method": "ping"}"#).unwrap();
        assert!(request.is_notification());
        assert!(request.params.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let err = UnitError::unit_not_found("fl.oz(US)", "Volume");
        let response = Response::err(Some(json!(7)), err.into());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "error": {
                    "code": "UNIT_NOT_FOUND",
                    "message": "unknown unit 'fl.oz(US)' for quantity Volume"
                }
            })
        );
    }
}
