use std::collections::HashMap;

use gatehouse_yard::{Appointment, ConditionCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Request bodies. Every field defaults so that a sparse body surfaces as
// "Missing data" from the handler instead of a 422 from the extractor.

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub org: String,
}

/// The `org` + `token` pair every authenticated route carries.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchApiRequest {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub token: String,
    /// Single-id mode when set.
    #[serde(default)]
    pub appointment_id: Option<String>,
    /// Multi-criteria mode when set; wins over `appointment_id`.
    #[serde(default)]
    pub criteria: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInApiRequest {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub token: String,
    pub appt: Option<Appointment>,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct UploadApiRequest {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub token: String,
    #[serde(rename = "objectTypeId", default)]
    pub object_type_id: String,
    #[serde(rename = "objectId", default)]
    pub object_id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "fileData", default)]
    pub file_data: String,
    #[serde(default)]
    pub notes: String,
}

// Response envelopes: always HTTP 200, success flag in the body.

#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgement {
    pub success: bool,
}

impl Acknowledgement {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

impl Failure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ScheduledResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
pub struct SearchApiResponse {
    pub success: bool,
    pub results: Vec<Appointment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_criteria: Option<HashMap<String, usize>>,
}

#[derive(Debug, Serialize)]
pub struct CodesResponse {
    pub success: bool,
    pub codes: Vec<ConditionCode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_accepts_either_mode() {
        let multi: SearchApiRequest = serde_json::from_value(json!({
            "org": "ACME", "token": "t", "criteria": "A B C"
        }))
        .unwrap();
        assert_eq!(multi.criteria.as_deref(), Some("A B C"));
        assert!(multi.appointment_id.is_none());

        let single: SearchApiRequest = serde_json::from_value(json!({
            "org": "ACME", "token": "t", "appointment_id": "APT-1"
        }))
        .unwrap();
        assert_eq!(single.appointment_id.as_deref(), Some("APT-1"));
    }

    #[test]
    fn test_sparse_bodies_default_to_empty() {
        let request: SessionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.org.is_empty());
        assert!(request.token.is_empty());

        let upload: UploadApiRequest = serde_json::from_value(json!({"org": "ACME"})).unwrap();
        assert!(upload.object_type_id.is_empty());
        assert!(upload.notes.is_empty());
    }

    #[test]
    fn test_upload_request_camel_case_fields() {
        let upload: UploadApiRequest = serde_json::from_value(json!({
            "org": "acme",
            "token": "t",
            "objectTypeId": "PurchaseOrder",
            "objectId": "PO-5",
            "filename": "sig.png",
            "fileData": "AAAA"
        }))
        .unwrap();
        assert_eq!(upload.object_type_id, "PurchaseOrder");
        assert_eq!(upload.file_data, "AAAA");
    }

    #[test]
    fn test_failure_envelope_shape() {
        let body = serde_json::to_value(Failure::new("Missing data")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "Missing data"}));
    }

    #[test]
    fn test_search_response_omits_counts_in_single_mode() {
        let body = serde_json::to_value(SearchApiResponse {
            success: true,
            results: vec![],
            per_criteria: None,
        })
        .unwrap();
        assert!(body.get("per_criteria").is_none());

        let mut counts = HashMap::new();
        counts.insert("A".to_string(), 2usize);
        let body = serde_json::to_value(SearchApiResponse {
            success: true,
            results: vec![],
            per_criteria: Some(counts),
        })
        .unwrap();
        assert_eq!(body["per_criteria"]["A"], 2);
    }
}
