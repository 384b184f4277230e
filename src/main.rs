//! OCR demo - upload an image, forward it to a remote OCR API, show the text.

mod config;
mod ocr;
mod recognition;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use config::OcrConfig;
use ocr::clova::ClovaOcrProvider;
use ocr::OcrProvider;
use recognition::Recognition;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upload types offered by the page.
const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    provider: Arc<dyn OcrProvider>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ocr_demo=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(OcrConfig::from_env()?);
    info!("Loaded config: {:?}", config);

    let provider = ClovaOcrProvider::new(config.clone(), reqwest::Client::new());
    info!("OCR provider initialized: {}", provider.name());

    let state = AppState {
        provider: Arc::new(provider),
    };

    let app = build_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ocr", post(run_ocr))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Upload page.
async fn index() -> Html<&'static str> {
    Html(include_str!("static/index.html"))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// What the page renders for one OCR run.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum OcrReply {
    Text { text: String, fields: Vec<String> },
    Empty { message: &'static str },
    Error { error: String, details: String },
    Unexpected { message: &'static str },
}

impl From<Recognition> for OcrReply {
    fn from(recognition: Recognition) -> Self {
        let text = recognition.text().unwrap_or_default();
        match recognition {
            Recognition::Text { fields } => OcrReply::Text { text, fields },
            Recognition::Empty => OcrReply::Empty {
                message: "No text recognized",
            },
            Recognition::RemoteError { error, details, .. } => OcrReply::Error { error, details },
            Recognition::Unexpected => OcrReply::Unexpected {
                message: "Unexpected OCR result",
            },
        }
    }
}

/// Upload an image and run OCR on it.
async fn run_ocr(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrReply>, (StatusCode, Json<serde_json::Value>)> {
    let mut filename = String::new();
    let mut file_data = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_reply(StatusCode::BAD_REQUEST, format!("Multipart error: {}", e))
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or_default().to_string();
            file_data = field.bytes().await.map_err(|e| {
                error_reply(StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e))
            })?.to_vec();
            break;
        }
    }

    if file_data.is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "No file uploaded"));
    }

    let extension = file_extension(&filename);
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported file type: {:?}. Accepted: {:?}", extension, ACCEPTED_EXTENSIONS),
        ));
    }

    info!("Received image: {} ({} bytes)", filename, file_data.len());

    let response = state
        .provider
        .recognize(&file_data, &extension)
        .await
        .map_err(|e| {
            error!("OCR call failed: {}", e);
            error_reply(StatusCode::BAD_GATEWAY, "OCR request failed, please try again")
        })?;

    let recognition = Recognition::from_response(&response);
    match &recognition {
        Recognition::Text { fields } => info!("Recognized {} text fields", fields.len()),
        Recognition::Empty => info!("No text recognized"),
        Recognition::RemoteError { status, error, .. } => {
            warn!("OCR service returned an error (status {:?}): {}", status, error)
        }
        Recognition::Unexpected => warn!("OCR service returned an unexpected response shape"),
    }

    Ok(Json(recognition.into()))
}

// ============================================================================
// Helper functions
// ============================================================================

fn error_reply(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

/// Lowercased suffix after the last `.`; the whole name when there is no dot.
fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
