//! Vertex AI Vector Search `findNeighbors` client.

use async_trait::async_trait;
use core_upstream::{TokenProvider, UpstreamError};
use observability::UpstreamMetrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::{IndexConfig, SERVICE, SimilarityIndex, check_query, to_similarity_result};
use crate::error::WineResult;
use crate::features::FeatureVector;
use crate::models::{Neighbor, SimilarityResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindNeighborsRequest<'a> {
    deployed_index_id: &'a str,
    queries: [Query<'a>; 1],
    return_full_datapoint: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Query<'a> {
    datapoint: QueryDatapoint<'a>,
    neighbor_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryDatapoint<'a> {
    datapoint_id: &'a str,
    feature_vector: &'a [f64],
}

// Proto3 JSON omits empty repeated fields and zero numbers, hence the defaults.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindNeighborsResponse {
    #[serde(default)]
    nearest_neighbors: Vec<QueryNeighbors>,
}

#[derive(Deserialize)]
struct QueryNeighbors {
    #[serde(default)]
    neighbors: Vec<RawNeighbor>,
}

#[derive(Deserialize)]
struct RawNeighbor {
    datapoint: RawDatapoint,
    #[serde(default)]
    distance: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDatapoint {
    #[serde(default)]
    datapoint_id: String,
}

/// [`SimilarityIndex`] backed by a deployed Vertex AI index.
pub struct VertexIndexClient {
    client: reqwest::Client,
    config: IndexConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl VertexIndexClient {
    pub fn new(client: reqwest::Client, config: IndexConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            client,
            config,
            tokens,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    async fn find_neighbors(&self, vector: &[f64], top_k: usize) -> Result<Vec<Neighbor>, UpstreamError> {
        let token = self.tokens.access_token().await?;

        let body = FindNeighborsRequest {
            deployed_index_id: &self.config.deployed_index_id,
            queries: [Query {
                datapoint: QueryDatapoint {
                    datapoint_id: "query",
                    feature_vector: vector,
                },
                neighbor_count: top_k,
            }],
            return_full_datapoint: false,
        };

        let response = self
            .client
            .post(self.config.find_neighbors_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::status(SERVICE, status.as_u16(), &text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;
        let parsed: FindNeighborsResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))?;

        Ok(parsed
            .nearest_neighbors
            .into_iter()
            .next()
            .map(|q| q.neighbors)
            .unwrap_or_default()
            .into_iter()
            .map(|n| Neighbor {
                id: n.datapoint.datapoint_id,
                distance: n.distance,
            })
            .collect())
    }
}

#[async_trait]
impl SimilarityIndex for VertexIndexClient {
    async fn query(&self, vector: FeatureVector, top_k: usize) -> WineResult<SimilarityResult> {
        check_query(&vector, self.config.dimensions, top_k)?;

        let started = Instant::now();
        let outcome = self.find_neighbors(vector.as_slice(), top_k).await;

        match &outcome {
            Ok(neighbors) => {
                UpstreamMetrics::record_call(SERVICE, "success", started.elapsed());
                tracing::debug!(
                    component = SERVICE,
                    shape = %vector.shape(),
                    deployed_index_id = %self.config.deployed_index_id,
                    count = neighbors.len(),
                    "findNeighbors succeeded"
                );
            }
            Err(e) => {
                UpstreamMetrics::record_call(SERVICE, e.kind(), started.elapsed());
                tracing::warn!(
                    component = SERVICE,
                    shape = %vector.shape(),
                    deployed_index_id = %self.config.deployed_index_id,
                    error = %e,
                    "findNeighbors failed"
                );
            }
        }

        to_similarity_result(outcome?, self.config.distance_measure)
    }
}
