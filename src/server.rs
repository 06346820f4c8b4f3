use crate::config::MailConfig;
use crate::form::{self, RawSubmission};
use crate::i18n::Localizer;
use crate::mailer::{build_auto_reply, build_staff_notification, relay_submission, TransportFactory};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Defensive cap on the request body, independent of any reverse-proxy limit.
const MAX_BODY_BYTES: usize = 25 * 1024;

/// Generic messages returned for server-side failures. Internal detail goes
/// to the log only.
const CONFIG_ERROR_MESSAGE: &str = "Server configuration error";
const SEND_ERROR_MESSAGE: &str = "Failed to send email. Please try again later.";

#[derive(Clone)]
pub struct AppState {
    pub site_name: String,
    pub factory: Arc<dyn TransportFactory>,
    pub localizer: Arc<Localizer>,
}

/// Wire envelope: `{ok: true}` or `{ok: false, error}`.
#[derive(Debug, Serialize)]
struct ApiResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn ok() -> Self {
        Self { ok: true, error: None }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

fn reply(status: StatusCode, body: ApiResponse) -> Response {
    (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(contact).fallback(method_not_allowed))
        .route("/api/languages", get(languages))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn method_not_allowed() -> Response {
    reply(
        StatusCode::METHOD_NOT_ALLOWED,
        ApiResponse::error("Method not allowed"),
    )
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// The static supported-language list, for the frontend's language picker.
async fn languages(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-store")],
        Json(state.localizer.available_languages()),
    )
        .into_response()
}

/// Contact form relay.
///
/// Guards run in a fixed order: body size, JSON shape, field validation,
/// mail configuration. Validation failures echo their specific reason; any
/// server-side failure is logged with detail and answered with a generic
/// message so configuration state never leaks to the caller.
async fn contact(State(state): State<AppState>, body: Bytes) -> Response {
    if body.len() > MAX_BODY_BYTES {
        return reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            ApiResponse::error("Request body too large"),
        );
    }

    let raw: RawSubmission = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Rejected malformed contact body: {}", e);
            return reply(StatusCode::BAD_REQUEST, ApiResponse::error("Invalid data"));
        }
    };

    // Re-validate server-side even though the form already validated: this is
    // a network boundary and the caller is untrusted.
    let submission = match form::validate(&raw) {
        Ok(submission) => submission,
        Err(e) => {
            return reply(StatusCode::BAD_REQUEST, ApiResponse::error(e.to_string()));
        }
    };

    let mail_config = match MailConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Missing mail transport configuration: {:#}", e);
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error(CONFIG_ERROR_MESSAGE),
            );
        }
    };

    let transport = match state.factory.create(&mail_config) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to set up mail transport: {:#}", e);
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error(SEND_ERROR_MESSAGE),
            );
        }
    };

    let notification = build_staff_notification(&mail_config, &state.site_name, &submission);
    let auto_reply = build_auto_reply(&mail_config, &state.site_name, &submission);

    match relay_submission(transport.as_ref(), &notification, &auto_reply).await {
        Ok(()) => {
            info!(
                "Relayed contact inquiry from {} ({})",
                submission.company_name, submission.email
            );
            reply(StatusCode::OK, ApiResponse::ok())
        }
        Err(e) => {
            error!("Failed to send contact emails: {:#}", e);
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::error(SEND_ERROR_MESSAGE),
            )
        }
    }
}
