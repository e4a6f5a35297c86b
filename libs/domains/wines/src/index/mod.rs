//! Similarity index adapter.
//!
//! [`SimilarityIndex`] is the seam between the orchestrator and the hosted
//! nearest-neighbor service. Implementations make exactly one network call per
//! [`SimilarityIndex::query`] and never retry; retrying is the caller's call.

mod config;
mod vertex;

pub use config::IndexConfig;
pub use vertex::VertexIndexClient;

use async_trait::async_trait;
use core_upstream::UpstreamError;

use crate::error::{WineError, WineResult};
use crate::features::FeatureVector;
use crate::models::{Neighbor, SimilarityResult, WineMatch};
use crate::scoring::DistanceMeasure;

/// Service label used in errors and metrics.
pub const SERVICE: &str = "similarity_index";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Return up to `top_k` matches for `vector`, closest first.
    ///
    /// Fails with [`WineError::InvalidVector`] on a dimension mismatch and
    /// [`WineError::Upstream`] when the service is unreachable, times out or
    /// answers with something unusable.
    async fn query(&self, vector: FeatureVector, top_k: usize) -> WineResult<SimilarityResult>;
}

/// Reject vectors the index cannot hold, before any network traffic.
pub fn check_query(vector: &FeatureVector, expected: usize, top_k: usize) -> WineResult<()> {
    if vector.dimension() != expected {
        return Err(WineError::InvalidVector {
            expected,
            actual: vector.dimension(),
        });
    }
    if top_k == 0 {
        return Err(WineError::InvalidQuery(
            "neighbor count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Turn raw (id, distance) pairs into scored matches, keeping their order.
pub fn to_similarity_result(
    neighbors: Vec<Neighbor>,
    measure: DistanceMeasure,
) -> WineResult<SimilarityResult> {
    let matches = neighbors
        .into_iter()
        .map(|n| {
            if n.id.is_empty() {
                return Err(UpstreamError::malformed(SERVICE, "neighbor without datapoint id"));
            }
            let score = measure.score(n.distance).ok_or_else(|| {
                UpstreamError::malformed(
                    SERVICE,
                    format!(
                        "distance {} for '{}' is not valid for {}",
                        n.distance,
                        n.id,
                        measure.as_str()
                    ),
                )
            })?;
            Ok(WineMatch { id: n.id, score })
        })
        .collect::<Result<Vec<_>, UpstreamError>>()?;

    Ok(SimilarityResult { matches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileShape;

    fn neighbor(id: &str, distance: f64) -> Neighbor {
        Neighbor {
            id: id.to_string(),
            distance,
        }
    }

    #[test]
    fn dimension_mismatch_is_invalid_vector() {
        let vector = FeatureVector::new(ProfileShape::Legacy, vec![0.0; 6]);
        let err = check_query(&vector, 55, 10).unwrap_err();
        assert!(matches!(err, WineError::InvalidVector { expected: 55, actual: 6 }));
    }

    #[test]
    fn zero_neighbors_is_rejected() {
        let vector = FeatureVector::new(ProfileShape::Legacy, vec![0.0; 6]);
        assert!(matches!(
            check_query(&vector, 6, 0),
            Err(WineError::InvalidQuery(_))
        ));
        assert!(check_query(&vector, 6, 1).is_ok());
    }

    #[test]
    fn keeps_upstream_order() {
        let result = to_similarity_result(
            vec![neighbor("w2", 0.9), neighbor("w1", 0.4)],
            DistanceMeasure::DotProduct,
        )
        .unwrap();
        let ids: Vec<_> = result.ids().collect();
        assert_eq!(ids, vec!["w2", "w1"]);
        assert!(result.matches[0].score > result.matches[1].score);
    }

    #[test]
    fn scores_round_trip_through_inverse() {
        let measure = DistanceMeasure::SquaredL2;
        let result =
            to_similarity_result(vec![neighbor("w1", 0.25), neighbor("w2", 3.0)], measure).unwrap();
        let recovered: Vec<f64> = result
            .matches
            .iter()
            .map(|m| measure.distance(m.score).unwrap())
            .collect();
        assert!((recovered[0] - 0.25).abs() < 1e-9);
        assert!((recovered[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_distance_is_malformed_upstream() {
        let err =
            to_similarity_result(vec![neighbor("w1", -1.0)], DistanceMeasure::Cosine).unwrap_err();
        assert!(matches!(
            err,
            WineError::Upstream(UpstreamError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_neighbors_is_empty_result() {
        let result = to_similarity_result(Vec::new(), DistanceMeasure::DotProduct).unwrap();
        assert!(result.is_empty());
    }
}
