use std::io::Cursor;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use serde::Serialize;
use crate::detection_processing::{detect_and_annotate, detect_and_annotate_bytes, into_presentation, ERROR_PREFIX};
use crate::server::page::{render_form, render_result};
use crate::server::AppState;

/// Form field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    /// Annotated image as base64 PNG, `null` when detection failed.
    pub image: Option<String>,
    pub details: String,
}

pub async fn index_handler() -> Html<String> {
    Html(render_form())
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn detect_form_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, MultipartError> {
    let upload = read_image_field(multipart).await?;
    let (image, details) = run_detection(state, upload).await;
    Ok(Html(render_result(image.as_deref(), &details)))
}

pub async fn detect_api_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetectResponse>, MultipartError> {
    let upload = read_image_field(multipart).await?;
    let (image, details) = run_detection(state, upload).await;
    Ok(Json(DetectResponse { image, details }))
}

async fn read_image_field(mut multipart: Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            return Ok(Some(field.bytes().await?));
        }
    }
    Ok(None)
}

/// Runs the pipeline off the async workers and returns `(base64 PNG, details text)`.
async fn run_detection(state: AppState, upload: Option<Bytes>) -> (Option<String>, String) {
    let joined = tokio::task::spawn_blocking(move || {
        let result = match upload {
            Some(bytes) => detect_and_annotate_bytes(state.model.as_ref(), &state.annotator, &bytes),
            None => detect_and_annotate(state.model.as_ref(), &state.annotator, None),
        };
        let (image, details) = into_presentation(result);
        match image.as_ref().map(encode_png).transpose() {
            Ok(encoded) => (encoded, details),
            Err(err) => (None, format!("{ERROR_PREFIX}{err}")),
        }
    })
    .await;

    match joined {
        Ok(presented) => presented,
        Err(err) => {
            log::error!("Detection worker failed: {err}");
            (None, format!("{ERROR_PREFIX}{err}"))
        }
    }
}

fn encode_png(image: &RgbImage) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(STANDARD.encode(buf))
}
