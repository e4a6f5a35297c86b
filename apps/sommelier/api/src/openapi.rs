use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::liveness),
    components(
        schemas(axum_helpers::ErrorResponse, crate::api::health::LivenessResponse)
    ),
    info(
        title = "Wine Recommender API",
        version = "0.1.0",
        description = "Wine recommendations from taste profiles and text extraction from label photos"
    ),
    tags((name = "health", description = "Liveness"))
)]
struct BaseDoc;

/// Full API documentation: the base document plus every domain's paths.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        BaseDoc::openapi()
            .merge_from(domain_wines::ApiDoc::openapi())
            .merge_from(domain_ocr::ApiDoc::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/wines", "/wines/recommend", "/wines/legacy", "/ocr"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
