use serde_json::{json, Value};

use crate::checkin::first_error_message;
use crate::client::YardClient;
use crate::types::CheckInOutcome;

const UPLOAD_PATH: &str = "document-manager/api/document-manager/uploadDocuments";

/// A driver signature captured at the kiosk, destined for the upstream
/// document manager. `file_data` is the base64 image exactly as the client
/// sent it; the gateway never decodes it.
#[derive(Debug, Clone)]
pub struct SignatureUpload {
    /// "ASN" or "PurchaseOrder".
    pub object_type_id: String,
    pub object_id: String,
    pub filename: String,
    pub file_data: String,
    pub notes: String,
}

fn build_payload(upload: &SignatureUpload) -> Value {
    json!({
        "ObjectTypeId": upload.object_type_id,
        "ObjectId": upload.object_id,
        "DocumentCategoryId": "DriverSignature",
        "Action": "overWrite",
        "Description": "Uploaded via Check-In Kiosk",
        "DocumentManagerFiles": [{
            "FileName": upload.filename,
            "DocumentName": "Driver Signature",
            "Description": "Driver signature captured during check-in",
            "Notes": upload.notes,
            "FileData": upload.file_data
        }]
    })
}

impl YardClient {
    /// Attach a driver signature to an ASN or purchase order.
    ///
    /// The document manager wants the upper-cased organization in its
    /// tenant headers, unlike the appointment endpoints.
    pub async fn upload_signature(
        &self,
        org: &str,
        token: &str,
        upload: &SignatureUpload,
    ) -> CheckInOutcome {
        let org = org.to_uppercase();
        let payload = build_payload(upload);

        tracing::info!(
            object_type = %upload.object_type_id,
            object_id = %upload.object_id,
            file = %upload.filename,
            "uploading driver signature"
        );

        let response = match self
            .org_headers(self.post(&self.api_url(UPLOAD_PATH)), token, &org)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("signature upload failed: {e}");
                return CheckInOutcome::failed(e.to_string());
            }
        };

        let status = response.status();
        tracing::debug!(%status, "signature upload response");

        if !status.is_success() {
            return CheckInOutcome::failed(format!("Upload failed (HTTP {})", status.as_u16()));
        }

        // A 2xx can still carry an explicit rejection in the body.
        if let Ok(body) = response.json::<Value>().await {
            if body.get("success") == Some(&Value::Bool(false)) {
                let error =
                    first_error_message(&body).unwrap_or_else(|| "Upload failed".to_string());
                return CheckInOutcome::failed(error);
            }
        }

        CheckInOutcome::ok(format!(
            "Signature uploaded for {} {}",
            upload.object_type_id, upload.object_id
        ))
    }
}
