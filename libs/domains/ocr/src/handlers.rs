use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::MultipartRejection,
    },
    routing::post,
};
use axum_helpers::errors::responses::{BadGatewayResponse, UnsupportedMediaResponse};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::detector::TextDetector;
use crate::error::{OcrError, OcrResult};
use crate::service::{ExtractedText, OcrService};

pub const TAG: &str = "ocr";

/// Largest accepted upload, form overhead included.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Name of the multipart field carrying the label image.
pub const IMAGE_FIELD: &str = "image";

/// OpenAPI documentation for label text extraction
#[derive(OpenApi)]
#[openapi(
    paths(extract_text),
    components(
        schemas(ExtractedText, ImageUpload),
        responses(UnsupportedMediaResponse, BadGatewayResponse)
    ),
    tags(
        (name = TAG, description = "Wine label text extraction")
    )
)]
pub struct ApiDoc;

/// Multipart form accepted by `POST /ocr`.
#[derive(ToSchema)]
pub struct ImageUpload {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Create the OCR router
pub fn router<D: TextDetector + 'static>(service: OcrService<D>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/ocr", post(extract_text::<D>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(shared_service)
}

/// Extract the text printed on a wine label
#[utoipa::path(
    post,
    path = "/ocr",
    tag = TAG,
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extracted text, empty when none was found", body = ExtractedText),
        (status = 400, response = UnsupportedMediaResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn extract_text<D: TextDetector>(
    State(service): State<Arc<OcrService<D>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> OcrResult<Json<ExtractedText>> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = match upload {
        Some((Some(file_name), bytes)) => (file_name, bytes),
        // A plain form value is not a file upload.
        _ => {
            tracing::warn!(component = "label_reader", "OCR request missing image file");
            return Err(OcrError::MissingImage("No image file provided".to_string()));
        }
    };

    if file_name.is_empty() {
        tracing::warn!(component = "label_reader", "OCR request with empty filename");
        return Err(OcrError::MissingImage("No image file selected".to_string()));
    }

    let extracted = service.extract(&bytes).await?;
    Ok(Json(extracted))
}
