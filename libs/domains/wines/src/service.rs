use core_upstream::{RetryConfig, retry_with_backoff};
use observability::{RecommendationMetrics, UpstreamMetrics};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{WineError, WineResult};
use crate::features::{self, FeatureVector};
use crate::index::{SERVICE, SimilarityIndex};
use crate::models::{ProfileShape, SimilarityResult};
use crate::validation;

/// Default number of neighbors requested per recommendation
pub const DEFAULT_TOP_K: usize = 10;

/// Recommendation pipeline: validate, build the vector, query the index.
///
/// Holds one index per profile shape since the deployed indexes differ in
/// dimension.
pub struct WineService<I: SimilarityIndex> {
    index: Arc<I>,
    legacy_index: Arc<I>,
    top_k: usize,
    retry: RetryConfig,
}

impl<I: SimilarityIndex> WineService<I> {
    pub fn new(index: I, legacy_index: I) -> Self {
        Self {
            index: Arc::new(index),
            legacy_index: Arc::new(legacy_index),
            top_k: DEFAULT_TOP_K,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Recommend wines for a profile of either shape.
    pub async fn recommend(&self, payload: &Value) -> WineResult<SimilarityResult> {
        self.run(payload, validation::detect_shape(payload)).await
    }

    /// Recommend wines for a profile that must use the legacy shape.
    pub async fn recommend_legacy(&self, payload: &Value) -> WineResult<SimilarityResult> {
        self.run(payload, ProfileShape::Legacy).await
    }

    async fn run(&self, payload: &Value, shape: ProfileShape) -> WineResult<SimilarityResult> {
        let started = Instant::now();

        let profile = match validation::validate_as(payload, shape) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::info!(
                    component = "recommender",
                    shape = %shape,
                    error = %e,
                    "profile rejected"
                );
                RecommendationMetrics::record(shape.as_str(), e.outcome(), started.elapsed());
                return Err(e);
            }
        };

        let user_id = profile.user_id().unwrap_or("-").to_string();
        let vector = features::build(&profile);

        let outcome = self.query(vector).await;

        match &outcome {
            Ok(result) => {
                tracing::info!(
                    component = "recommender",
                    shape = %shape,
                    user_id = %user_id,
                    count = result.len(),
                    "recommendation served"
                );
                RecommendationMetrics::record(shape.as_str(), "success", started.elapsed());
                RecommendationMetrics::record_results(shape.as_str(), result.len());
            }
            Err(e) => {
                tracing::warn!(
                    component = "recommender",
                    shape = %shape,
                    user_id = %user_id,
                    error = %e,
                    "recommendation failed"
                );
                RecommendationMetrics::record(shape.as_str(), e.outcome(), started.elapsed());
            }
        }

        outcome
    }

    async fn query(&self, vector: FeatureVector) -> WineResult<SimilarityResult> {
        let index = match vector.shape() {
            ProfileShape::Comprehensive => &self.index,
            ProfileShape::Legacy => &self.legacy_index,
        };
        let top_k = self.top_k;

        retry_with_backoff(
            || index.query(vector.clone(), top_k),
            self.retry.clone(),
            |e: &WineError| {
                let retry = e.is_retryable();
                if retry {
                    UpstreamMetrics::record_retry(SERVICE);
                }
                retry
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{COMPREHENSIVE_DIMENSIONS, FEATURES, LEGACY_DIMENSIONS};
    use crate::index::MockSimilarityIndex;
    use crate::models::WineMatch;
    use core_upstream::UpstreamError;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use mockall::predicate::{always, eq, function};
    use serde_json::{Map, json};

    fn fast_retry() -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(2)
            .with_initial_delay(1)
            .without_jitter()
    }

    fn result(ids: &[&str]) -> SimilarityResult {
        SimilarityResult {
            matches: ids
                .iter()
                .enumerate()
                .map(|(i, id)| WineMatch {
                    id: id.to_string(),
                    score: 1.0 / (2.0 + i as f64),
                })
                .collect(),
        }
    }

    fn comprehensive_payload() -> Map<String, Value> {
        FEATURES
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.to_string(), json!((i % 5) as f64 * 0.25)))
            .collect()
    }

    fn unused() -> MockSimilarityIndex {
        let mut mock = MockSimilarityIndex::new();
        mock.expect_query().never();
        mock
    }

    #[tokio::test]
    async fn comprehensive_profile_queries_main_index() {
        let mut index = MockSimilarityIndex::new();
        index
            .expect_query()
            .with(
                function(|v: &FeatureVector| v.dimension() == COMPREHENSIVE_DIMENSIONS),
                eq(10),
            )
            .times(1)
            .returning(|_, _| Ok(result(&["wine_1", "wine_2"])));

        let service = WineService::new(index, unused()).with_retry(fast_retry());
        let found = service
            .recommend(&Value::Object(comprehensive_payload()))
            .await
            .unwrap();

        assert_eq!(found.ids().collect::<Vec<_>>(), vec!["wine_1", "wine_2"]);
    }

    #[tokio::test]
    async fn legacy_profile_queries_legacy_index() {
        let mut legacy = MockSimilarityIndex::new();
        legacy
            .expect_query()
            .with(
                function(|v: &FeatureVector| {
                    v.as_slice() == [4.0, 13.5, 0.0, 0.0, 0.0, 3.0]
                        && v.dimension() == LEGACY_DIMENSIONS
                }),
                eq(5),
            )
            .times(1)
            .returning(|_, _| Ok(result(&["wine_9"])));

        let service = WineService::new(unused(), legacy).with_top_k(5);
        let payload = json!({"type": "Red", "body": 4, "dryness": 3, "abv": 13.5});

        let found = service.recommend(&payload).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn legacy_endpoint_accepts_legacy_only() {
        let service = WineService::new(unused(), unused());
        let err = service
            .recommend_legacy(&Value::Object(comprehensive_payload()))
            .await
            .unwrap_err();
        assert!(matches!(err, WineError::Validation { .. }));
    }

    #[tokio::test]
    async fn key_order_does_not_change_query() {
        let forward = comprehensive_payload();
        let mut reversed_pairs: Vec<(String, Value)> = forward.clone().into_iter().collect();
        reversed_pairs.reverse();
        let reversed: Map<String, Value> = reversed_pairs.into_iter().collect();

        let expected = features::build(&validation::validate(&Value::Object(forward.clone())).unwrap());

        let mut index = MockSimilarityIndex::new();
        index
            .expect_query()
            .with(eq(expected), always())
            .times(2)
            .returning(|_, _| Ok(SimilarityResult::default()));

        let service = WineService::new(index, unused());
        service.recommend(&Value::Object(forward)).await.unwrap();
        service.recommend(&Value::Object(reversed)).await.unwrap();
    }

    #[tokio::test]
    async fn validation_failure_makes_no_query() {
        let mut payload = comprehensive_payload();
        payload.remove("rating_frequency");

        let service = WineService::new(unused(), unused());
        let err = service.recommend(&Value::Object(payload)).await.unwrap_err();

        match err {
            WineError::Validation { fields, .. } => assert_eq!(fields, vec!["rating_frequency"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    fn rejected_counts(payload: Value, legacy_route: bool) -> Vec<String> {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let service = WineService::new(unused(), unused());

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let outcome = if legacy_route {
                runtime.block_on(service.recommend_legacy(&payload))
            } else {
                runtime.block_on(service.recommend(&payload))
            };
            assert!(matches!(outcome, Err(WineError::Validation { .. })));
        });

        handle
            .render()
            .lines()
            .filter(|l| l.starts_with("wine_recommendations_total{"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn rejected_profiles_are_counted_under_the_attempted_shape() {
        let mut payload = comprehensive_payload();
        payload.insert("rating_std".into(), json!(-3.0));
        let lines = rejected_counts(Value::Object(payload), false);
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains(r#"shape="comprehensive""#), "{lines:?}");
        assert!(lines[0].contains(r#"outcome="invalid""#), "{lines:?}");

        let lines = rejected_counts(json!({"type": "Red", "body": 9}), false);
        assert!(lines[0].contains(r#"shape="legacy""#), "{lines:?}");

        let lines = rejected_counts(Value::Object(comprehensive_payload()), true);
        assert!(lines[0].contains(r#"shape="legacy""#), "{lines:?}");
        assert!(!lines[0].contains("unknown"));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let mut index = MockSimilarityIndex::new();
        let mut seq = mockall::Sequence::new();
        index
            .expect_query()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(UpstreamError::Timeout { service: SERVICE }.into()));
        index
            .expect_query()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(result(&["wine_1"])));

        let service = WineService::new(index, unused()).with_retry(fast_retry());
        let found = service
            .recommend(&Value::Object(comprehensive_payload()))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let mut index = MockSimilarityIndex::new();
        index.expect_query().times(3).returning(|_, _| {
            Err(UpstreamError::Unavailable {
                service: SERVICE,
                message: "connection refused".into(),
            }
            .into())
        });

        let service = WineService::new(index, unused()).with_retry(fast_retry());
        let err = service
            .recommend(&Value::Object(comprehensive_payload()))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn malformed_and_invalid_vector_are_not_retried() {
        let mut index = MockSimilarityIndex::new();
        index
            .expect_query()
            .times(1)
            .returning(|_, _| Err(UpstreamError::malformed(SERVICE, "no neighbors").into()));
        let service = WineService::new(index, unused()).with_retry(fast_retry());
        let err = service
            .recommend(&Value::Object(comprehensive_payload()))
            .await
            .unwrap_err();
        assert!(matches!(err, WineError::Upstream(UpstreamError::Malformed { .. })));

        let mut index = MockSimilarityIndex::new();
        index.expect_query().times(1).returning(|_, _| {
            Err(WineError::InvalidVector {
                expected: 6,
                actual: 55,
            })
        });
        let service = WineService::new(index, unused()).with_retry(fast_retry());
        let err = service
            .recommend(&Value::Object(comprehensive_payload()))
            .await
            .unwrap_err();
        assert!(matches!(err, WineError::InvalidVector { .. }));
    }
}
