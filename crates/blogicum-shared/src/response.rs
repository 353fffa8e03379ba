//! Problem-details error payload (RFC 7807).

use serde::{Deserialize, Serialize};

/// Body of every failing response.
///
/// `type` stays `about:blank`: the status code and title carry all the
/// information this API distinguishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            problem_type: "about:blank".into(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::unauthorized()).unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["type"], "about:blank");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_detail_is_carried_when_set() {
        let json = serde_json::to_value(ErrorResponse::not_found("post not found")).unwrap();
        assert_eq!(json["detail"], "post not found");
    }
}
