use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::care::NearbyCareResolver;
use crate::config::CareCompassConfig;
use crate::responder::ResponseGenerator;
use crate::telephony::{CallReceipt, EmergencyDialer};

/// The three tools, shared across requests
#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<ResponseGenerator>,
    pub dialer: Arc<EmergencyDialer>,
    pub resolver: Arc<NearbyCareResolver>,
}

impl AppState {
    pub fn new(
        responder: ResponseGenerator,
        dialer: EmergencyDialer,
        resolver: NearbyCareResolver,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            dialer: Arc::new(dialer),
            resolver: Arc::new(resolver),
        }
    }

    /// Build production backends; fails on the first missing credential
    pub fn from_config(config: &CareCompassConfig) -> Result<Self> {
        Ok(Self::new(
            ResponseGenerator::from_config(&config.llm)?,
            EmergencyDialer::from_config(&config.telephony)?,
            NearbyCareResolver::from_config(&config.maps)?,
        ))
    }
}

#[derive(Serialize, Deserialize)]
pub struct RespondRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct RespondResponse {
    pub reply: String,
}

#[derive(Serialize, Deserialize)]
pub struct EmergencyCallResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_sid: Option<String>,
    /// Provider-side call state, e.g. `queued`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmergencyCallResponse {
    fn requested(receipt: CallReceipt) -> Self {
        Self {
            status: "requested".to_string(),
            call_sid: Some(receipt.call_sid),
            call_status: receipt.status,
            error: None,
        }
    }
}

#[derive(Deserialize)]
pub struct TherapistQuery {
    #[serde(default)]
    pub location: String,
}

#[derive(Serialize, Deserialize)]
pub struct TherapistResponse {
    pub outcome: String,
    pub text: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/respond", post(respond))
        .route("/emergency-call", post(emergency_call))
        .route("/therapists", get(find_therapists))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn respond(
    State(state): State<AppState>,
    Json(payload): Json<RespondRequest>,
) -> Json<RespondResponse> {
    let reply = state.responder.generate(&payload.message).await;
    Json(RespondResponse { reply })
}

async fn emergency_call(State(state): State<AppState>) -> (StatusCode, Json<EmergencyCallResponse>) {
    match state.dialer.trigger_emergency_call().await {
        Ok(receipt) => (
            StatusCode::ACCEPTED,
            Json(EmergencyCallResponse::requested(receipt)),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(EmergencyCallResponse {
                status: "failed".to_string(),
                call_sid: None,
                call_status: None,
                error: Some(e.to_string()),
            }),
        ),
    }
}

async fn find_therapists(
    State(state): State<AppState>,
    Query(query): Query<TherapistQuery>,
) -> Json<TherapistResponse> {
    let outcome = state.resolver.find_nearby(&query.location).await;
    Json(TherapistResponse {
        outcome: outcome.kind().to_string(),
        text: outcome.to_string(),
    })
}
