use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Html,
    Extension, Json,
};
use reqwest::Url;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{AnalysisResult, AnalyzeResponse, ClothingType, ResultQuery},
    services::{
        analysis,
        uploads::{allowed_extension, UploadStore},
    },
    views,
};

use super::AppState;

pub const MISSING_FIELDS: &str = "No file or clothing type selected";
pub const INVALID_FILE_TYPE: &str = "Invalid file type";

const FILE_FIELD: &str = "file";
const CLOTHING_TYPE_FIELD: &str = "clothing-type";

/// An uploaded file as received from the form
struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

/// Fields of the analyze form we care about; anything else is ignored
#[derive(Default)]
struct AnalyzeForm {
    file: Option<UploadedFile>,
    clothing_type: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Landing page with the upload form
pub async fn index() -> Html<&'static str> {
    Html(views::landing_page())
}

pub async fn result_top(Query(query): Query<ResultQuery>) -> Html<String> {
    Html(views::result_page(ClothingType::Top, &query))
}

pub async fn result_bottom(Query(query): Query<ResultQuery>) -> Html<String> {
    Html(views::result_page(ClothingType::Bottom, &query))
}

/// Classifies an uploaded garment and returns recommendations for it
pub async fn analyze(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let form = match multipart {
        Ok(multipart) => read_form(multipart).await?,
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, error = %rejection, "Not a multipart upload");
            AnalyzeForm::default()
        }
    };

    let (Some(file), Some(clothing_type)) = (form.file, form.clothing_type) else {
        return Err(AppError::InvalidInput(MISSING_FIELDS.to_string()));
    };

    let clothing_type: ClothingType = clothing_type
        .parse()
        .map_err(|e: crate::models::UnknownClothingType| AppError::InvalidInput(e.to_string()))?;

    let extension = allowed_extension(&file.filename)
        .ok_or_else(|| AppError::InvalidInput(INVALID_FILE_TYPE.to_string()))?;

    let base_url = base_url(&state, &headers)?;

    let stored_name = UploadStore::storage_name(&file.filename, &extension);
    let stored_path = state.uploads.save(&stored_name, &file.bytes).await?;
    let image_url = public_path(&base_url, &stored_path)?;

    tracing::info!(
        request_id = %request_id,
        clothing_type = %clothing_type,
        file = %stored_name,
        size = file.bytes.len(),
        "Processing analysis request"
    );

    let result = analysis::analyze_image(&state, clothing_type, &file.bytes, image_url).await?;

    let redirect_url = redirect_url(&base_url, &result)?;

    tracing::info!(request_id = %request_id, "Analysis request completed");

    Ok(Json(AnalyzeResponse::new(result, redirect_url)))
}

async fn read_form(mut multipart: Multipart) -> AppResult<AnalyzeForm> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed_upload)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(malformed_upload)?;
                form.file = Some(UploadedFile { filename, bytes });
            }
            Some(CLOTHING_TYPE_FIELD) => {
                form.clothing_type = Some(field.text().await.map_err(malformed_upload)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn malformed_upload(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(err.body_text());
    }
    AppError::InvalidInput(format!("Malformed upload: {}", err.body_text()))
}

/// Base for absolute links: configured public URL, else the request's Host,
/// else localhost. The returned URL always ends with `/` so relative joins
/// keep any path prefix.
fn base_url(state: &AppState, headers: &HeaderMap) -> AppResult<Url> {
    if let Some(public_url) = &state.public_url {
        return parse_base(public_url);
    }

    let from_host = headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{}", host))
        .and_then(|candidate| parse_base(&candidate).ok())
        .filter(|url| url.path() == "/");

    match from_host {
        Some(url) => Ok(url),
        None => parse_base("http://localhost"),
    }
}

fn parse_base(raw: &str) -> AppResult<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| AppError::Internal(format!("Invalid base URL {}: {}", raw, e)))?;

    if url.cannot_be_a_base() {
        return Err(AppError::Internal(format!("Invalid base URL {}", raw)));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Path of a site-relative route (e.g. `/uploads/coat.png`) under the base's prefix
fn public_path(base_url: &Url, route: &str) -> AppResult<String> {
    base_url
        .join(route.trim_start_matches('/'))
        .map(|url| url.path().to_string())
        .map_err(|e| AppError::Internal(format!("Invalid route {}: {}", route, e)))
}

/// Absolute link to the category's result view with the analysis in its query
fn redirect_url(base_url: &Url, result: &AnalysisResult) -> AppResult<String> {
    let route = result.clothing_type.result_path().trim_start_matches('/');
    let mut url = base_url
        .join(route)
        .map_err(|e| AppError::Internal(format!("Invalid result route {}: {}", route, e)))?;

    url.query_pairs_mut()
        .append_pair("label", &result.garment_label)
        .append_pair("color", &result.color_label)
        .append_pair("image_url", &result.image_url)
        .append_pair(
            "clothing_recommendations",
            &result.garment_recommendations.join(","),
        )
        .append_pair(
            "color_recommendations",
            &result.color_recommendations.join(","),
        );

    Ok(url.into())
}
