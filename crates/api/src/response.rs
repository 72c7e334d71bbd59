//! Success response envelope shared by all JSON endpoints.

use serde::Serialize;

/// Envelope wrapping every successful JSON payload.
///
/// Collections also carry a `count` so clients can render totals without
/// measuring the array themselves.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a single resource.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Wraps a collection, recording its length as `count`.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            success: true,
            data: Some(items),
            count: Some(count),
        }
    }
}

/// Envelope for endpoints that report success with no payload.
#[derive(Debug, Serialize)]
pub struct EmptyResponse {
    pub success: bool,
    pub message: String,
}

impl EmptyResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_wraps_data() {
        let response = ApiResponse::ok("hello");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "hello");
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_list_records_count() {
        let response = ApiResponse::list(vec![1, 2, 3]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_list_empty() {
        let response = ApiResponse::list(Vec::<i32>::new());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_empty_response_message() {
        let response = EmptyResponse::new("Invitation declined");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Invitation declined");
    }
}
