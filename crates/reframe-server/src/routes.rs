use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reframe_core::{TransformPipeline, TransformSettings, IMAGE_PART, SETTINGS_PART};
use serde_json::json;
use tracing::info;

use crate::{ServerError, ServerResult};

/// File extensions accepted for the `image` part (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// File name suggested to the browser for the processed image.
pub const OUTPUT_FILE_NAME: &str = "processed.png";

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub pipeline: TransformPipeline,
}

impl AppState {
    pub fn new(pipeline: TransformPipeline) -> Self {
        Self { pipeline }
    }
}

/// Routes without middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/process-image", post(process_image))
        .route("/health", get(health))
        .with_state(state)
}

/// True if `file_name` has an allowed image extension.
pub fn allowed_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// The parts of a `/process-image` upload that matter.
struct Upload {
    image: Option<(String, Vec<u8>)>,
    settings: Option<String>,
}

async fn read_upload(multipart: &mut Multipart) -> ServerResult<Upload> {
    let mut upload = Upload {
        image: None,
        settings: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_PART) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload.image = Some((file_name, bytes.to_vec()));
            }
            Some(SETTINGS_PART) => {
                upload.settings = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(upload)
}

async fn process_image(State(state): State<AppState>, mut multipart: Multipart) -> ServerResult<Response> {
    let upload = read_upload(&mut multipart).await?;

    let (file_name, bytes) = upload.image.ok_or(ServerError::MissingImage)?;
    if file_name.is_empty() || !allowed_file(&file_name) {
        return Err(ServerError::InvalidFileType);
    }
    let settings_json = upload.settings.ok_or(ServerError::MissingSettings)?;
    let settings = TransformSettings::from_json(&settings_json)
        .map_err(|e| ServerError::InvalidSettings(e.to_string()))?;

    info!(
        file = %file_name,
        bytes = bytes.len(),
        width = settings.width,
        height = settings.height,
        rotation = settings.rotation,
        flip = %settings.flip,
        crop_enabled = settings.crop_enabled,
        "processing image"
    );

    let pipeline = state.pipeline;
    let encoded = tokio::task::spawn_blocking(move || pipeline.process(&bytes, &settings))
        .await
        .map_err(|e| ServerError::Internal(format!("processing task failed: {}", e)))??;

    info!(
        width = encoded.width,
        height = encoded.height,
        bytes = encoded.bytes.len(),
        "image processed"
    );

    Ok((
        [
            (header::CONTENT_TYPE, encoded.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", OUTPUT_FILE_NAME),
            ),
        ],
        encoded.bytes,
    )
        .into_response())
}
