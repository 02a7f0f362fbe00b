use std::sync::Arc;

use axum::{extract::State, Json};
use gatehouse_yard::{tokenize_criteria, CheckInOutcome, SearchMode, SignatureUpload};

use crate::models::{
    Acknowledgement, AuthRequest, AuthResponse, CheckInApiRequest, CodesResponse, Failure,
    ScheduledResponse, SearchApiRequest, SearchApiResponse, SessionRequest, TrackRequest,
    UploadApiRequest,
};
use crate::AppState;

const MISSING_DATA: &str = "Missing data";

/// POST /api/app_opened
/// Bare acknowledgement; the client attaches its own metadata via ha-track.
pub async fn app_opened() -> Json<Acknowledgement> {
    Json(Acknowledgement::ok())
}

/// POST /api/ha-track
/// Always acknowledges, even for malformed bodies; a kiosk session must
/// never stall on telemetry.
pub async fn track_event(
    State(state): State<Arc<AppState>>,
    body: Option<Json<TrackRequest>>,
) -> Json<Acknowledgement> {
    if let Some(Json(body)) = body {
        state.telemetry.track(body.event_name, body.metadata);
    }
    Json(Acknowledgement::ok())
}

/// POST /api/auth
pub async fn auth(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, Json<Failure>> {
    let org = body.org.trim();
    if org.is_empty() {
        return Err(Json(Failure::new("ORG required")));
    }

    match state.yard.authenticate(org).await {
        Ok(token) => Ok(Json(AuthResponse {
            success: true,
            token,
        })),
        Err(e) => Err(Json(Failure::new(e.to_string()))),
    }
}

/// POST /api/scheduled
/// Every appointment still in Scheduled status.
pub async fn scheduled(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SessionRequest>,
) -> Result<Json<ScheduledResponse>, Json<Failure>> {
    if body.org.is_empty() || body.token.is_empty() {
        return Err(Json(Failure::new(MISSING_DATA)));
    }

    match state.yard.scheduled(&body.org, &body.token).await {
        Ok(appointments) => Ok(Json(ScheduledResponse {
            success: true,
            appointments,
        })),
        Err(e) => Err(Json(Failure::new(e.to_string()))),
    }
}

/// POST /api/search
/// Mode is chosen from the body: `criteria` runs the multi-criteria OR
/// search, otherwise `appointment_id` runs the paginated single-id search.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchApiRequest>,
) -> Result<Json<SearchApiResponse>, Json<Failure>> {
    if body.org.is_empty() || body.token.is_empty() {
        return Err(Json(Failure::new(MISSING_DATA)));
    }

    let mode = if let Some(criteria) = body
        .criteria
        .as_deref()
        .filter(|criteria| !criteria.trim().is_empty())
    {
        SearchMode::MultiCriteria(tokenize_criteria(criteria))
    } else if let Some(id) = body
        .appointment_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        SearchMode::SingleId(id.to_string())
    } else {
        return Err(Json(Failure::new(MISSING_DATA)));
    };

    match state.yard.search(&body.org, &body.token, mode).await {
        Ok(outcome) => Ok(Json(SearchApiResponse {
            success: true,
            results: outcome.results,
            per_criteria: outcome.per_criteria,
        })),
        Err(e) => Err(Json(Failure::new(e.to_string()))),
    }
}

/// POST /api/condition_codes
pub async fn condition_codes(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SessionRequest>,
) -> Result<Json<CodesResponse>, Json<Failure>> {
    if body.org.is_empty() || body.token.is_empty() {
        return Err(Json(Failure::new(MISSING_DATA)));
    }

    match state.yard.condition_codes(&body.org, &body.token).await {
        Ok(codes) => Ok(Json(CodesResponse {
            success: true,
            codes,
        })),
        Err(e) => Err(Json(Failure::new(e.to_string()))),
    }
}

/// POST /api/checkin
/// The outcome is already normalized by the client library; it passes
/// straight through as the response body.
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckInApiRequest>,
) -> Json<CheckInOutcome> {
    let Some(appt) = body.appt else {
        return Json(CheckInOutcome::failed(MISSING_DATA));
    };
    if body.org.is_empty() || body.token.is_empty() {
        return Json(CheckInOutcome::failed(MISSING_DATA));
    }

    Json(state.yard.check_in(&body.org, &body.token, &appt).await)
}

/// POST /api/upload_signature
pub async fn upload_signature(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadApiRequest>,
) -> Json<CheckInOutcome> {
    if body.org.is_empty()
        || body.token.is_empty()
        || body.object_type_id.is_empty()
        || body.object_id.is_empty()
        || body.filename.is_empty()
        || body.file_data.is_empty()
    {
        return Json(CheckInOutcome::failed("Missing required fields"));
    }

    let upload = SignatureUpload {
        object_type_id: body.object_type_id,
        object_id: body.object_id,
        filename: body.filename,
        file_data: body.file_data,
        notes: body.notes,
    };

    Json(
        state
            .yard
            .upload_signature(&body.org, &body.token, &upload)
            .await,
    )
}
