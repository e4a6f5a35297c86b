//! Distance to similarity score conversion.
//!
//! Scores are always in (0, 1], higher meaning closer, and each transform has
//! an exact inverse so callers can recover the raw distance:
//!
//! | Measure | Distance range | Score | Inverse |
//! |---|---|---|---|
//! | `SquaredL2`, `Cosine` | `d >= 0`, lower is closer | `1 / (1 + d)` | `1/s - 1` |
//! | `DotProduct` | any real, higher is closer | `1 - 1/(2(1 + d))` for `d >= 0`, `1/(2(1 - d))` below | `1/(2(1 - s)) - 1` for `s >= 0.5`, `1 - 1/(2s)` below |
//!
//! The dot-product transform is a rational sigmoid rather than a logistic so
//! that it keeps separating large products: `1 - s` shrinks like `1/d` instead
//! of `e^-d`. Scores stay strictly increasing and invert to within `1e-9`
//! relative error for `|d|` up to `1e6`, and stay below `1.0` until `d`
//! approaches `2^52`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Distance measure the deployed index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMeasure {
    SquaredL2,
    Cosine,
    DotProduct,
}

impl DistanceMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMeasure::SquaredL2 => "squared_l2",
            DistanceMeasure::Cosine => "cosine",
            DistanceMeasure::DotProduct => "dot_product",
        }
    }

    /// Map a raw distance to a score, or `None` if the distance cannot come
    /// from this measure.
    pub fn score(&self, distance: f64) -> Option<f64> {
        if !distance.is_finite() {
            return None;
        }
        match self {
            DistanceMeasure::SquaredL2 | DistanceMeasure::Cosine => {
                (distance >= 0.0).then(|| 1.0 / (1.0 + distance))
            }
            DistanceMeasure::DotProduct => {
                let score = if distance >= 0.0 {
                    1.0 - 0.5 / (1.0 + distance)
                } else {
                    0.5 / (1.0 - distance)
                };
                Some(score.max(f64::MIN_POSITIVE))
            }
        }
    }

    /// Inverse of [`DistanceMeasure::score`].
    pub fn distance(&self, score: f64) -> Option<f64> {
        if !score.is_finite() {
            return None;
        }
        match self {
            DistanceMeasure::SquaredL2 | DistanceMeasure::Cosine => {
                (score > 0.0 && score <= 1.0).then(|| 1.0 / score - 1.0)
            }
            DistanceMeasure::DotProduct => (score > 0.0 && score < 1.0).then(|| {
                if score >= 0.5 {
                    0.5 / (1.0 - score) - 1.0
                } else {
                    1.0 - 0.5 / score
                }
            }),
        }
    }
}

impl FromStr for DistanceMeasure {
    type Err = String;

    /// Accepts the snake_case names and Vertex AI's enum spelling
    /// (`DOT_PRODUCT_DISTANCE`, `SQUARED_L2_DISTANCE`, `COSINE_DISTANCE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.trim_end_matches("_distance") {
            "squared_l2" => Ok(DistanceMeasure::SquaredL2),
            "cosine" => Ok(DistanceMeasure::Cosine),
            "dot_product" => Ok(DistanceMeasure::DotProduct),
            _ => Err(format!(
                "unknown distance measure '{}', expected squared_l2, cosine or dot_product",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn lower_is_closer_measures() {
        let m = DistanceMeasure::SquaredL2;
        assert_eq!(m.score(0.0), Some(1.0));
        assert!(m.score(0.5).unwrap() > m.score(2.0).unwrap());
        assert_eq!(m.score(-0.1), None);
        assert_eq!(DistanceMeasure::Cosine.score(f64::NAN), None);
    }

    #[test]
    fn dot_product_is_bounded_and_increasing() {
        let m = DistanceMeasure::DotProduct;
        let low = m.score(-50.0).unwrap();
        let mid = m.score(0.0).unwrap();
        let high = m.score(3.0).unwrap();
        assert!(low > 0.0 && low < mid && mid < high && high <= 1.0);
        assert!((mid - 0.5).abs() < TOLERANCE);
        assert!(m.score(-1000.0).unwrap() > 0.0);
        assert_eq!(m.score(f64::INFINITY), None);
    }

    #[test]
    fn inverse_recovers_distance() {
        let cases = [
            (DistanceMeasure::SquaredL2, vec![0.0, 0.01, 1.5, 42.0]),
            (DistanceMeasure::Cosine, vec![0.0, 0.3, 1.9]),
            (DistanceMeasure::DotProduct, vec![-4.0, -0.2, 0.0, 0.93, 7.5]),
        ];
        for (measure, distances) in cases {
            for d in distances {
                let s = measure.score(d).unwrap();
                let back = measure.distance(s).unwrap();
                assert!(
                    (back - d).abs() < 1e-6,
                    "{measure:?}: {d} -> {s} -> {back}"
                );
            }
        }
    }

    #[test]
    fn dot_product_keeps_large_products_apart() {
        let m = DistanceMeasure::DotProduct;
        let distances = [-800.0, -37.0, 0.0, 30.0, 37.0, 40.0, 120.0, 310.0, 1e4, 1e6];
        let scores: Vec<f64> = distances.iter().map(|d| m.score(*d).unwrap()).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] < pair[1], "scores not increasing: {scores:?}");
        }
        assert!(scores.iter().all(|s| *s > 0.0 && *s < 1.0));
        for (d, s) in distances.iter().zip(&scores) {
            let back = m.distance(*s).unwrap();
            let err = (back - d).abs() / d.abs().max(1.0);
            assert!(err < TOLERANCE, "{d} -> {s} -> {back}");
        }
    }

    #[test]
    fn inverse_rejects_out_of_range_scores() {
        assert_eq!(DistanceMeasure::SquaredL2.distance(0.0), None);
        assert_eq!(DistanceMeasure::SquaredL2.distance(1.2), None);
        assert_eq!(DistanceMeasure::DotProduct.distance(1.0), None);
        assert_eq!(DistanceMeasure::DotProduct.distance(0.0), None);
        assert_eq!(DistanceMeasure::DotProduct.distance(f64::NAN), None);
    }

    #[test]
    fn parses_config_spellings() {
        assert_eq!("dot_product".parse(), Ok(DistanceMeasure::DotProduct));
        assert_eq!("DOT_PRODUCT_DISTANCE".parse(), Ok(DistanceMeasure::DotProduct));
        assert_eq!("SQUARED_L2_DISTANCE".parse(), Ok(DistanceMeasure::SquaredL2));
        assert_eq!(" cosine ".parse(), Ok(DistanceMeasure::Cosine));
        assert!("manhattan".parse::<DistanceMeasure>().is_err());
    }
}
