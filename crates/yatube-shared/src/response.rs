//! Response envelopes: `ApiResponse` for admin endpoints and RFC 7807
//! problem details for every error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Envelope for admin console results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }
}

/// Problem details (RFC 7807). `type` is always `about:blank`, so `title`
/// is the standard reason phrase of `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The request path that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Form field name to its messages, for rejected submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            instance: None,
            request_id: None,
            errors: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden").with_detail("Staff access only.")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    /// 422 listing every rejected field. `detail` joins all messages.
    pub fn unprocessable(errors: BTreeMap<String, Vec<String>>) -> Self {
        let detail = errors.values().flatten().cloned().collect::<Vec<_>>().join(" ");
        let mut problem = Self::new(422, "Unprocessable Entity").with_detail(detail);
        problem.errors = Some(errors);
        problem
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_shape() {
        let body = serde_json::to_value(
            ErrorResponse::not_found("post 7 not found").with_instance("/posts/7/"),
        )
        .unwrap();

        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "post 7 not found");
        assert_eq!(body["instance"], "/posts/7/");
        assert!(body.get("request_id").is_none());
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_field_errors_are_listed() {
        let errors = BTreeMap::from([
            ("slug".to_string(), vec!["Enter a valid slug.".to_string()]),
            ("title".to_string(), vec!["This field is required.".to_string()]),
        ]);
        let body = serde_json::to_value(ErrorResponse::unprocessable(errors)).unwrap();
        assert_eq!(body["status"], 422);
        assert_eq!(body["errors"]["slug"][0], "Enter a valid slug.");
        assert_eq!(body["detail"], "Enter a valid slug. This field is required.");
    }

    #[test]
    fn test_envelope_omits_missing_message() {
        let body = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 3);
        assert!(body.get("message").is_none());

        let body = serde_json::to_value(ApiResponse::ok_with_message((), "Cache cleared")).unwrap();
        assert_eq!(body["message"], "Cache cleared");
    }
}
