use axum::Router;
use domain_ocr::{OcrService, VisionClient, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let detector = VisionClient::new(
        state.http.clone(),
        state.config.vision.clone(),
        state.tokens.clone(),
    );

    let service = OcrService::new(detector).with_retry(state.config.upstream.retry_config());
    handlers::router(service)
}
