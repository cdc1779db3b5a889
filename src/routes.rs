use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::capture::{CaptureFrame, FacingMode, SurfaceStatus};
use crate::error::ApiError;
use crate::gateway::{TranslationResult, TravelSuggestions, WaterSafetyInfo};
use crate::geocode::Coordinates;
use crate::itinerary::{self, ItineraryFormat};
use crate::llm::InlineImage;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // Capture surface
        .route("/api/camera", get(camera_status))
        .route("/api/camera/open", post(open_camera))
        .route("/api/camera/switch", post(switch_camera))
        .route("/api/camera/close", post(close_camera))
        .route("/api/camera/capture", post(capture_frame))
        .route("/api/camera/scan", post(scan_and_translate))

        // Inference gateway
        .route("/api/translate", post(translate_text))
        .route("/api/translate/image", post(translate_image))
        .route("/api/water-safety", post(water_safety))
        .route("/api/travel-plan", post(travel_plan))
        .route("/api/itinerary/analyze", post(analyze_itinerary))
        .route("/api/itinerary/import", post(import_itinerary))

        // Location
        .route("/api/location", post(resolve_location))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenCameraRequest {
    facing_mode: Option<FacingMode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanRequest {
    target_language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest {
    text: String,
    target_language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageTranslateRequest {
    /// Base64 payload or a `data:<mime>;base64,` URL
    image: String,
    mime_type: Option<String>,
    target_language: String,
}

#[derive(Debug, Deserialize)]
struct WaterSafetyRequest {
    country: String,
}

#[derive(Debug, Deserialize)]
struct TravelPlanRequest {
    location: String,
    duration: String,
    #[serde(default)]
    interests: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    itinerary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CapturedFrame {
    id: Uuid,
    facing_mode: FacingMode,
    width: u32,
    height: u32,
    mime_type: String,
    image: String,
    captured_at: DateTime<Utc>,
}

impl From<CaptureFrame> for CapturedFrame {
    fn from(frame: CaptureFrame) -> Self {
        Self {
            id: frame.id,
            facing_mode: frame.facing_mode,
            width: frame.width,
            height: frame.height,
            image: STANDARD.encode(&frame.data),
            mime_type: frame.mime_type,
            captured_at: frame.captured_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanResponse {
    frame_id: Uuid,
    #[serde(flatten)]
    result: TranslationResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    file_name: String,
    format: ItineraryFormat,
    analysis: String,
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "credentialConfigured": state.gateway.has_credential(),
        "cameraStreaming": state.camera.status().await.streaming,
    }))
}

async fn camera_status(State(state): State<AppState>) -> Json<SurfaceStatus> {
    Json(state.camera.status().await)
}

async fn open_camera(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SurfaceStatus>, ApiError> {
    // Only an empty body means "use the configured default".
    let requested = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<OpenCameraRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid camera request: {}", e)))?
            .facing_mode
    };
    let facing = requested.unwrap_or(state.config.camera_config.default_facing_mode);
    state.camera.open(facing).await?;
    Ok(Json(state.camera.status().await))
}

async fn switch_camera(State(state): State<AppState>) -> Result<Json<SurfaceStatus>, ApiError> {
    state.camera.switch_facing().await?;
    Ok(Json(state.camera.status().await))
}

async fn close_camera(State(state): State<AppState>) -> Json<SurfaceStatus> {
    state.camera.close().await;
    Json(state.camera.status().await)
}

async fn capture_frame(State(state): State<AppState>) -> Result<Json<CapturedFrame>, ApiError> {
    let frame = state.camera.capture().await?;
    Ok(Json(frame.into()))
}

async fn scan_and_translate(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let frame = state.camera.capture().await?;
    let frame_id = frame.id;
    let result = state
        .gateway
        .extract_and_translate(frame, &req.target_language)
        .await?;
    info!(%frame_id, "Scan translated");
    Ok(Json(ScanResponse { frame_id, result }))
}

async fn translate_text(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<Value>, ApiError> {
    let translation = state.gateway.translate(&req.text, &req.target_language).await?;
    Ok(Json(json!({ "translation": translation })))
}

fn decode_image(image: &str, mime_type: Option<String>) -> Result<InlineImage, ApiError> {
    let (url_mime, payload) = match image.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| ApiError::BadRequest("malformed data URL".to_string()))?;
            let mime = meta
                .strip_suffix(";base64")
                .ok_or_else(|| ApiError::BadRequest("data URL must be base64 encoded".to_string()))?;
            (Some(mime.to_string()), payload)
        }
        None => (None, image),
    };
    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| ApiError::BadRequest(format!("image is not valid base64: {}", e)))?;
    Ok(InlineImage {
        mime_type: url_mime
            .or(mime_type)
            .unwrap_or_else(|| "image/jpeg".to_string()),
        data,
    })
}

async fn translate_image(
    State(state): State<AppState>,
    Json(req): Json<ImageTranslateRequest>,
) -> Result<Json<TranslationResult>, ApiError> {
    let image = decode_image(&req.image, req.mime_type)?;
    let result = state
        .gateway
        .extract_and_translate(image, &req.target_language)
        .await?;
    Ok(Json(result))
}

async fn water_safety(
    State(state): State<AppState>,
    Json(req): Json<WaterSafetyRequest>,
) -> Result<Json<WaterSafetyInfo>, ApiError> {
    Ok(Json(state.gateway.water_safety(&req.country).await?))
}

async fn travel_plan(
    State(state): State<AppState>,
    Json(req): Json<TravelPlanRequest>,
) -> Result<Json<TravelSuggestions>, ApiError> {
    let plan = state
        .gateway
        .plan_trip(&req.location, &req.duration, &req.interests)
        .await?;
    Ok(Json(plan))
}

async fn analyze_itinerary(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>, ApiError> {
    let analysis = state.gateway.analyze_itinerary(&req.itinerary).await?;
    Ok(Json(json!({ "analysis": analysis })))
}

async fn import_itinerary(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let imported = itinerary::import_bytes(&file_name, &bytes)?;
        let analysis = state.gateway.analyze_itinerary(&imported.text).await?;
        info!(file_name = %imported.file_name, "Itinerary analyzed");
        return Ok(Json(ImportResponse {
            file_name: imported.file_name,
            format: imported.format,
            analysis,
        }));
    }
    Err(ApiError::BadRequest("no itinerary file in upload".to_string()))
}

async fn resolve_location(
    State(state): State<AppState>,
    Json(coordinates): Json<Coordinates>,
) -> Result<Json<Value>, ApiError> {
    let country = state.geocoder.country_for(coordinates).await?;
    Ok(Json(json!({ "country": country })))
}
