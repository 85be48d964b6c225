//! HTTP API over one [`Mixer`].
//!
//! Every handler reads or writes the card live through `amixer`; the process
//! call blocks, so it runs on tokio's blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use webmixer_lib::WebmixerError;
use webmixer_lib::amixer::MixerSource;
use webmixer_lib::control::Control;
use webmixer_lib::mixer::Mixer;
use webmixer_lib::update::{UpdateError, UpdateRequest};

pub type DynSource = Box<dyn MixerSource + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    mixer: Arc<Mixer<DynSource>>,
    strict: bool,
}

impl AppState {
    pub fn new(source: DynSource, strict: bool) -> Self {
        AppState {
            mixer: Arc::new(Mixer::new(source)),
            strict,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

impl From<WebmixerError> for ErrorResponse {
    fn from(e: WebmixerError) -> Self {
        ErrorResponse {
            error: e.to_string(),
        }
    }
}

fn status_for(e: &WebmixerError) -> StatusCode {
    match e {
        WebmixerError::Update(UpdateError::UnknownControl(_)) => StatusCode::NOT_FOUND,
        WebmixerError::Update(_) => StatusCode::BAD_REQUEST,
        WebmixerError::Mixer(_) | WebmixerError::Io(_) | WebmixerError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn into_api_error(e: WebmixerError) -> ApiError {
    let status = status_for(&e);
    if status.is_server_error() {
        log::error!("{e}");
    } else {
        log::warn!("{e}");
    }
    (status, Json(ErrorResponse::from(e)))
}

/// Run a blocking mixer call off the async workers.
async fn with_mixer<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Mixer<DynSource>) -> webmixer_lib::error::Result<T> + Send + 'static,
{
    let mixer = Arc::clone(&state.mixer);
    tokio::task::spawn_blocking(move || f(&mixer))
        .await
        .map_err(|e| {
            log::error!("mixer task failed: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "mixer task failed")
        })?
        .map_err(into_api_error)
}

pub fn router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/controls", get(list_controls))
        .route("/api/controls/{name}", post(update_control))
        .layer({
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

            // No origins configured: any origin may call the API
            if cors_allowed_origins.is_empty() {
                cors.allow_origin(Any)
            } else {
                let origins: Vec<HeaderValue> = cors_allowed_origins
                    .iter()
                    .filter_map(|o| o.trim().parse::<HeaderValue>().ok())
                    .collect();
                cors.allow_origin(origins).allow_credentials(true)
            }
        })
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn list_controls(State(state): State<AppState>) -> Result<Json<Vec<Control>>, ApiError> {
    let controls = with_mixer(&state, |mixer| mixer.controls()).await?;
    log::debug!("listed {} controls", controls.len());
    Ok(Json(controls))
}

async fn update_control(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        log::warn!("rejected update for '{name}': {}", rejection.body_text());
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let strict = state.strict;
    with_mixer(&state, move |mixer| {
        if strict {
            mixer.apply_checked(&name, &request)
        } else {
            mixer.apply(&name, &request)
        }
    })
    .await?;

    Ok(Json(StatusResponse { status: "success" }))
}
