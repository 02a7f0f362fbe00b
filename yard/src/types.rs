use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An appointment record as returned by the upstream search API.
///
/// Only the fields the gateway inspects are named; everything else the
/// upstream sends rides along untouched in `extra` and is returned to the
/// client verbatim. Id-like fields are kept as raw JSON values because the
/// upstream is inconsistent about sending strings vs. numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "AppointmentId", skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<Value>,
    #[serde(rename = "CarrierId", skip_serializing_if = "Option::is_none")]
    pub carrier_id: Option<Value>,
    #[serde(rename = "TrailerId", skip_serializing_if = "Option::is_none")]
    pub trailer_id: Option<Value>,
    #[serde(rename = "AppointmentTypeId", skip_serializing_if = "Option::is_none")]
    pub appointment_type_id: Option<Value>,
    #[serde(rename = "EquipmentTypeId", skip_serializing_if = "Option::is_none")]
    pub equipment_type_id: Option<Value>,
    #[serde(rename = "AppointmentStatusId", skip_serializing_if = "Option::is_none")]
    pub appointment_status_id: Option<Value>,
    #[serde(rename = "PreferredDateTime", skip_serializing_if = "Option::is_none")]
    pub preferred_date_time: Option<String>,
    #[serde(rename = "ConditionCodeId", skip_serializing_if = "Option::is_none")]
    pub condition_code_id: Option<Value>,

    /// Display date derived from `PreferredDateTime`; set by the query engine.
    #[serde(rename = "ScheduledDate", skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    /// Display status derived from `AppointmentStatusId`; set by the query engine.
    #[serde(rename = "StatusText", skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    #[serde(flatten, skip_serializing_if = "Map::is_empty", default)]
    pub extra: Map<String, Value>,
}

/// A trailer condition code from the reference lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionCode {
    #[serde(rename = "ConditionCodeId", skip_serializing_if = "Option::is_none")]
    pub condition_code_id: Option<Value>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "RemoveCurrentLocation", skip_serializing_if = "Option::is_none")]
    pub remove_current_location: Option<Value>,
    #[serde(flatten, skip_serializing_if = "Map::is_empty", default)]
    pub extra: Map<String, Value>,
}

/// Body for the upstream search endpoints. `Page` is absent for calls that
/// do not paginate (the condition-code lookup).
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Template", skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
    #[serde(rename = "Size")]
    pub size: u32,
    #[serde(rename = "Page", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "needTotalCount", skip_serializing_if = "Option::is_none")]
    pub need_total_count: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<Appointment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionCodeResponse {
    #[serde(default)]
    pub data: Option<ConditionCodeData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionCodeData {
    #[serde(rename = "TrailerConditionCode", default)]
    pub trailer_condition_code: Vec<ConditionCode>,
}

/// Check-in transaction payload, built deterministically from an
/// [`Appointment`].
#[derive(Debug, Clone, Serialize)]
pub struct CheckInRequest {
    #[serde(rename = "AppointmentInfo")]
    pub appointment_info: AppointmentInfo,
    #[serde(rename = "VisitType")]
    pub visit_type: Value,
    #[serde(rename = "TrailerInfo")]
    pub trailer_info: TrailerInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentInfo {
    #[serde(rename = "AppointmentId")]
    pub appointment_id: Value,
    #[serde(rename = "AppointmentTypeId")]
    pub appointment_type_id: Value,
}

/// Trailer details for a check-in. The first three fields are sent as null
/// when the appointment lacks them; `ConditionCodeId` is omitted entirely
/// unless present and non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct TrailerInfo {
    #[serde(rename = "CarrierId")]
    pub carrier_id: Value,
    #[serde(rename = "TrailerId")]
    pub trailer_id: Value,
    #[serde(rename = "EquipmentTypeId")]
    pub equipment_type_id: Value,
    #[serde(rename = "ConditionCodeId", skip_serializing_if = "Option::is_none")]
    pub condition_code_id: Option<Value>,
}

/// Normalized result of a check-in or upload: exactly one of `message`
/// (success) or `error` (failure) is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckInOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Token endpoint response; only `access_token` is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_appointment_passthrough_extras() {
        let raw = json!({
            "AppointmentId": "APT-1001",
            "CarrierId": "CARR9",
            "AppointmentStatusId": 3000,
            "PreferredDateTime": "2024-03-05T14:30:00Z",
            "PurchaseOrderNumber": "PO-77",
            "BillOfLadingNumber": "BOL-42"
        });

        let appointment: Appointment = serde_json::from_value(raw).unwrap();
        assert_eq!(appointment.appointment_id, Some(json!("APT-1001")));
        assert_eq!(appointment.appointment_status_id, Some(json!(3000)));
        assert_eq!(appointment.extra["PurchaseOrderNumber"], json!("PO-77"));
        assert_eq!(appointment.extra["BillOfLadingNumber"], json!("BOL-42"));

        let back = serde_json::to_value(&appointment).unwrap();
        assert_eq!(back["BillOfLadingNumber"], json!("BOL-42"));
        assert_eq!(back["AppointmentStatusId"], json!(3000));
    }

    #[test]
    fn test_appointment_skips_absent_fields() {
        let appointment: Appointment = serde_json::from_value(json!({})).unwrap();
        let back = serde_json::to_string(&appointment).unwrap();
        assert_eq!(back, "{}");
    }

    #[test]
    fn test_search_request_wire_shape() {
        let request = SearchRequest {
            query: "AppointmentId = 'A1'".to_string(),
            template: None,
            size: 1000,
            page: Some(0),
            need_total_count: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["Query"], "AppointmentId = 'A1'");
        assert_eq!(json["Size"], 1000);
        assert_eq!(json["Page"], 0);
        assert!(json.get("Template").is_none());
        assert!(json.get("needTotalCount").is_none());
    }

    #[test]
    fn test_search_request_without_page() {
        let request = SearchRequest {
            query: String::new(),
            template: Some(json!({"ConditionCodeId": null})),
            size: 9999,
            page: None,
            need_total_count: Some(true),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("Page").is_none());
        assert_eq!(json["needTotalCount"], true);
        assert_eq!(json["Template"]["ConditionCodeId"], Value::Null);
    }

    #[test]
    fn test_checkin_outcome_shapes() {
        let ok = serde_json::to_value(CheckInOutcome::ok("Done")).unwrap();
        assert_eq!(ok, json!({"success": true, "message": "Done"}));

        let failed = serde_json::to_value(CheckInOutcome::failed("No")).unwrap();
        assert_eq!(failed, json!({"success": false, "error": "No"}));
    }

    #[test]
    fn test_condition_code_response_unwrap() {
        let body: ConditionCodeResponse = serde_json::from_value(json!({
            "data": {"TrailerConditionCode": [{"ConditionCodeId": "DMG", "Description": "Damaged"}]}
        }))
        .unwrap();
        let codes = body.data.unwrap().trailer_condition_code;
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].description.as_deref(), Some("Damaged"));

        let empty: ConditionCodeResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.data.is_none());
    }
}
