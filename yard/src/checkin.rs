use serde_json::{Map, Value};

use crate::client::YardClient;
use crate::types::{Appointment, AppointmentInfo, CheckInOutcome, CheckInRequest, TrailerInfo};

const CHECKIN_PATH: &str = "yard-management/api/yard-management/transaction/trailer/checkIn";

const SUCCESS_FALLBACK: &str = "Check-in successful";
const ERROR_FALLBACK: &str = "Unknown error";

/// Bytes of response body worth keeping in the audit log.
const BODY_LOG_LIMIT: usize = 5000;

/// JSON truthiness as the upstream applies it to its own flags: null,
/// false, zero, and empty containers all count as absent.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Build the check-in transaction payload from an appointment record.
///
/// `VisitType` always equals the appointment type. Carrier, trailer, and
/// equipment ids are sent as null when absent; `ConditionCodeId` is the
/// exception: omitted unless present and non-empty, never sent as null.
pub fn build_request(appointment: &Appointment) -> CheckInRequest {
    let appointment_type = appointment
        .appointment_type_id
        .clone()
        .unwrap_or_else(|| Value::String(String::new()));

    CheckInRequest {
        appointment_info: AppointmentInfo {
            appointment_id: appointment.appointment_id.clone().unwrap_or(Value::Null),
            appointment_type_id: appointment_type.clone(),
        },
        visit_type: appointment_type,
        trailer_info: TrailerInfo {
            carrier_id: appointment.carrier_id.clone().unwrap_or(Value::Null),
            trailer_id: appointment.trailer_id.clone().unwrap_or(Value::Null),
            equipment_type_id: appointment.equipment_type_id.clone().unwrap_or(Value::Null),
            condition_code_id: appointment
                .condition_code_id
                .clone()
                .filter(truthy),
        },
    }
}

/// First `message` out of `errors[]`, falling back to `exceptions[]` when
/// `errors` is absent or empty.
pub(crate) fn first_error_message(body: &Value) -> Option<String> {
    let errors = body
        .get("errors")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty());
    let list = errors.or_else(|| {
        body.get("exceptions")
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
    })?;

    list.first()?
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Collapse the upstream's inconsistent response shapes into one result.
///
/// Success requires both a 2xx status and a truthy `success` field; the
/// message is the first non-empty `Description` under `messages.Message[]`.
/// Everything else is a failure described by the first `errors[]` (or
/// `exceptions[]`) entry.
pub fn interpret_response(http_ok: bool, body: &Value) -> CheckInOutcome {
    if http_ok && body.get("success").map(truthy).unwrap_or(false) {
        let message = body
            .pointer("/messages/Message")
            .and_then(Value::as_array)
            .and_then(|messages| {
                messages.iter().find_map(|entry| {
                    entry
                        .get("Description")
                        .and_then(Value::as_str)
                        .filter(|description| !description.is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| SUCCESS_FALLBACK.to_string());
        return CheckInOutcome::ok(message);
    }

    let error = first_error_message(body).unwrap_or_else(|| ERROR_FALLBACK.to_string());
    CheckInOutcome::failed(error)
}

impl YardClient {
    /// Record a trailer's arrival against its appointment.
    ///
    /// Never returns an error: every failure mode is already encoded in
    /// the normalized outcome. The full request and response are written
    /// to the operational log for audit.
    pub async fn check_in(
        &self,
        org: &str,
        token: &str,
        appointment: &Appointment,
    ) -> CheckInOutcome {
        let url = self.api_url(CHECKIN_PATH);
        let payload = build_request(appointment);

        tracing::info!(
            %url,
            org,
            appointment_id = ?appointment.appointment_id,
            "submitting trailer check-in"
        );
        if let Ok(raw) = serde_json::to_string_pretty(&payload) {
            tracing::debug!("check-in payload: {raw}");
        }

        let response = match self
            .org_headers(self.post(&url), token, org)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("check-in request failed: {e}");
                return CheckInOutcome::failed(format!("Request failed: {e}"));
            }
        };

        let status = response.status();
        let http_ok = status.is_success();
        tracing::debug!(%status, headers = ?response.headers(), "check-in response received");

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("check-in response body unreadable: {e}");
                return CheckInOutcome::failed(format!("Request failed: {e}"));
            }
        };

        let preview: String = text.chars().take(BODY_LOG_LIMIT).collect();
        tracing::debug!("check-in response body: {preview}");

        let body: Value = serde_json::from_str(&text).unwrap_or_else(|e| {
            // Non-JSON bodies fall through to the failure branch below.
            tracing::debug!("check-in response was not JSON: {e}");
            Value::Object(Map::new())
        });

        let outcome = interpret_response(http_ok, &body);
        if outcome.success {
            tracing::info!(
                message = outcome.message.as_deref().unwrap_or_default(),
                "check-in accepted"
            );
        } else {
            tracing::warn!(
                %status,
                error = outcome.error.as_deref().unwrap_or_default(),
                "check-in rejected"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appointment_with_condition(condition: Option<Value>) -> Appointment {
        serde_json::from_value(json!({
            "AppointmentId": "APT-1",
            "CarrierId": "CARR",
            "TrailerId": "TRL",
            "AppointmentTypeId": "LiveUnload",
            "EquipmentTypeId": "53FT"
        }))
        .map(|mut appt: Appointment| {
            appt.condition_code_id = condition;
            appt
        })
        .unwrap()
    }

    #[test]
    fn test_build_request_omits_absent_condition_code() {
        for missing in [None, Some(Value::Null), Some(json!(""))] {
            let request = build_request(&appointment_with_condition(missing));
            let wire = serde_json::to_value(&request).unwrap();
            assert!(
                wire["TrailerInfo"].get("ConditionCodeId").is_none(),
                "ConditionCodeId must be omitted, got {wire}"
            );
        }
    }

    #[test]
    fn test_build_request_includes_condition_code_verbatim() {
        let request = build_request(&appointment_with_condition(Some(json!("DMG"))));
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["TrailerInfo"]["ConditionCodeId"], json!("DMG"));
    }

    #[test]
    fn test_build_request_shape() {
        let request = build_request(&appointment_with_condition(None));
        let wire = serde_json::to_value(&request).unwrap();

        assert_eq!(wire["AppointmentInfo"]["AppointmentId"], json!("APT-1"));
        assert_eq!(
            wire["AppointmentInfo"]["AppointmentTypeId"],
            json!("LiveUnload")
        );
        assert_eq!(wire["VisitType"], json!("LiveUnload"));
        assert_eq!(wire["TrailerInfo"]["CarrierId"], json!("CARR"));
        assert_eq!(wire["TrailerInfo"]["TrailerId"], json!("TRL"));
        assert_eq!(wire["TrailerInfo"]["EquipmentTypeId"], json!("53FT"));
    }

    #[test]
    fn test_build_request_nulls_absent_trailer_fields() {
        let bare: Appointment = serde_json::from_value(json!({"AppointmentId": "A"})).unwrap();
        let wire = serde_json::to_value(build_request(&bare)).unwrap();

        assert_eq!(wire["TrailerInfo"]["CarrierId"], Value::Null);
        assert_eq!(wire["TrailerInfo"]["TrailerId"], Value::Null);
        assert_eq!(wire["VisitType"], json!(""));
    }

    #[test]
    fn test_interpret_success_with_description() {
        let body = json!({
            "success": true,
            "messages": {"Message": [{"Description": "OK"}]}
        });
        assert_eq!(interpret_response(true, &body), CheckInOutcome::ok("OK"));
    }

    #[test]
    fn test_interpret_success_skips_empty_descriptions() {
        let body = json!({
            "success": true,
            "messages": {"Message": [{"Description": ""}, {"Description": "Gate 12"}]}
        });
        assert_eq!(
            interpret_response(true, &body),
            CheckInOutcome::ok("Gate 12")
        );
    }

    #[test]
    fn test_interpret_success_without_messages_uses_fallback() {
        let body = json!({"success": true, "messages": {"Message": []}});
        assert_eq!(
            interpret_response(true, &body),
            CheckInOutcome::ok(SUCCESS_FALLBACK)
        );
    }

    #[test]
    fn test_interpret_failure_takes_first_error() {
        let body = json!({
            "success": false,
            "errors": [{"message": "Carrier not found"}, {"message": "second"}]
        });
        assert_eq!(
            interpret_response(true, &body),
            CheckInOutcome::failed("Carrier not found")
        );
    }

    #[test]
    fn test_interpret_failure_falls_back_to_exceptions() {
        let body = json!({
            "success": false,
            "errors": [],
            "exceptions": [{"message": "boom"}]
        });
        assert_eq!(
            interpret_response(true, &body),
            CheckInOutcome::failed("boom")
        );
    }

    #[test]
    fn test_interpret_failure_without_detail_uses_fallback() {
        let body = json!({"success": false});
        assert_eq!(
            interpret_response(true, &body),
            CheckInOutcome::failed(ERROR_FALLBACK)
        );
    }

    #[test]
    fn test_interpret_http_failure_ignores_success_flag() {
        // Upstream occasionally pairs an error status with a success body.
        let body = json!({"success": true});
        assert_eq!(
            interpret_response(false, &body),
            CheckInOutcome::failed(ERROR_FALLBACK)
        );
    }

    #[test]
    fn test_interpret_unparseable_body_fires_fallback_branch() {
        // An unparseable body is treated as {} by the caller.
        let body = Value::Object(Map::new());
        assert_eq!(
            interpret_response(true, &body),
            CheckInOutcome::failed(ERROR_FALLBACK)
        );
    }

    #[test]
    fn test_truthy_matrix() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("0")));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("DMG")));
    }
}
