use core_config::{ConfigError, env_optional, env_parse, env_required};

use crate::features::{COMPREHENSIVE_DIMENSIONS, LEGACY_DIMENSIONS};
use crate::models::ProfileShape;
use crate::scoring::DistanceMeasure;

/// Location and layout of one deployed Vertex AI Vector Search index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Public endpoint domain, e.g. `1234.us-central1-567.vdb.vertexai.goog`.
    /// A full `http(s)://` URL is used as-is.
    pub api_endpoint: String,
    /// `projects/{p}/locations/{l}/indexEndpoints/{id}`
    pub index_endpoint: String,
    pub deployed_index_id: String,
    /// Vector length the deployed index was built with
    pub dimensions: usize,
    pub distance_measure: DistanceMeasure,
}

impl IndexConfig {
    pub fn new(
        api_endpoint: impl Into<String>,
        index_endpoint: impl Into<String>,
        deployed_index_id: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            index_endpoint: index_endpoint.into(),
            deployed_index_id: deployed_index_id.into(),
            dimensions,
            distance_measure: DistanceMeasure::DotProduct,
        }
    }

    pub fn with_distance_measure(mut self, measure: DistanceMeasure) -> Self {
        self.distance_measure = measure;
        self
    }

    /// Load the index serving `shape` from the environment.
    ///
    /// Shared:
    /// - API_ENDPOINT (required)
    /// - INDEX_ENDPOINT (required)
    /// - INDEX_DISTANCE_MEASURE (default `dot_product`)
    ///
    /// Comprehensive: DEPLOYED_INDEX_ID (required), 55 dimensions.
    /// Legacy: LEGACY_DEPLOYED_INDEX_ID (required) and optional
    /// LEGACY_INDEX_ENDPOINT, 6 dimensions.
    pub fn from_env(shape: ProfileShape) -> Result<Self, ConfigError> {
        let api_endpoint = env_required("API_ENDPOINT")?;
        let index_endpoint = env_required("INDEX_ENDPOINT")?;
        let distance_measure = match env_optional("INDEX_DISTANCE_MEASURE") {
            Some(raw) => raw.parse().map_err(|details| ConfigError::ParseError {
                key: "INDEX_DISTANCE_MEASURE".to_string(),
                details,
            })?,
            None => DistanceMeasure::DotProduct,
        };

        let config = match shape {
            ProfileShape::Comprehensive => Self::new(
                api_endpoint,
                index_endpoint,
                env_required("DEPLOYED_INDEX_ID")?,
                env_parse("INDEX_DIMENSIONS", COMPREHENSIVE_DIMENSIONS)?,
            ),
            ProfileShape::Legacy => Self::new(
                api_endpoint,
                env_optional("LEGACY_INDEX_ENDPOINT").unwrap_or(index_endpoint),
                env_required("LEGACY_DEPLOYED_INDEX_ID")?,
                LEGACY_DIMENSIONS,
            ),
        };

        Ok(config.with_distance_measure(distance_measure))
    }

    /// `https://{api_endpoint}/v1/{index_endpoint}:findNeighbors`
    pub fn find_neighbors_url(&self) -> String {
        let base = self.api_endpoint.trim_end_matches('/');
        let base = if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            format!("https://{}", base)
        };
        format!(
            "{}/v1/{}:findNeighbors",
            base,
            self.index_endpoint.trim_start_matches('/')
        )
    }
}
