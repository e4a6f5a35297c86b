//! Canonical feature layout and the vector builder.
//!
//! [`FEATURES`] is the single source of truth for the comprehensive vector:
//! slot `i` of every vector built from a comprehensive profile holds
//! `FEATURES[i].name`. Validation reads its bounds from the same table.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{ComprehensiveProfile, LegacyProfile, ProfileShape, ValidatedProfile, WineType};

/// Semantic group a feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    BasicStatistics,
    WineType,
    Abv,
    Body,
    Acidity,
    Country,
    Grape,
    Complexity,
    Quality,
    RatingPatterns,
    Diversity,
    Temporal,
}

/// One slot of the comprehensive vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub category: FeatureCategory,
    /// Inclusive lower bound, if any
    pub min: Option<f64>,
    /// Inclusive upper bound, if any
    pub max: Option<f64>,
}

impl FeatureSpec {
    const fn free(name: &'static str, category: FeatureCategory) -> Self {
        Self {
            name,
            category,
            min: None,
            max: None,
        }
    }

    const fn non_negative(name: &'static str, category: FeatureCategory) -> Self {
        Self {
            name,
            category,
            min: Some(0.0),
            max: None,
        }
    }

    const fn bounded(name: &'static str, category: FeatureCategory, min: f64, max: f64) -> Self {
        Self {
            name,
            category,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether `value` lies inside this feature's bounds.
    pub fn accepts(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

pub const COMPREHENSIVE_DIMENSIONS: usize = 55;
pub const LEGACY_DIMENSIONS: usize = 6;

use FeatureCategory as C;

/// Canonical order of the comprehensive profile.
pub static FEATURES: [FeatureSpec; COMPREHENSIVE_DIMENSIONS] = [
    // Basic statistics
    FeatureSpec::free("rating_mean", C::BasicStatistics),
    FeatureSpec::non_negative("rating_std", C::BasicStatistics),
    FeatureSpec::non_negative("rating_count", C::BasicStatistics),
    FeatureSpec::bounded("rating_min", C::BasicStatistics, 0.0, 5.0),
    FeatureSpec::bounded("rating_max", C::BasicStatistics, 0.0, 5.0),
    FeatureSpec::non_negative("wines_tried", C::BasicStatistics),
    FeatureSpec::non_negative("avg_ratings_per_wine", C::BasicStatistics),
    FeatureSpec::free("coefficient_of_variation", C::BasicStatistics),
    // Wine type preferences
    FeatureSpec::free("red_wine_preference", C::WineType),
    FeatureSpec::free("white_wine_preference", C::WineType),
    FeatureSpec::free("sparkling_wine_preference", C::WineType),
    FeatureSpec::free("rose_wine_preference", C::WineType),
    FeatureSpec::free("dessert_wine_preference", C::WineType),
    FeatureSpec::free("dessert_port_wine_preference", C::WineType),
    // ABV
    FeatureSpec::free("weighted_abv_preference", C::Abv),
    FeatureSpec::free("avg_abv_tried", C::Abv),
    FeatureSpec::free("high_vs_low_abv_preference", C::Abv),
    // Body
    FeatureSpec::free("very_light_bodied_preference", C::Body),
    FeatureSpec::free("light_bodied_preference", C::Body),
    FeatureSpec::free("medium_bodied_preference", C::Body),
    FeatureSpec::free("full_bodied_preference", C::Body),
    FeatureSpec::free("very_full_bodied_preference", C::Body),
    // Acidity
    FeatureSpec::free("low_acidity_preference", C::Acidity),
    FeatureSpec::free("medium_acidity_preference", C::Acidity),
    FeatureSpec::free("high_acidity_preference", C::Acidity),
    // Top countries
    FeatureSpec::free("country_1_preference", C::Country),
    FeatureSpec::free("country_2_preference", C::Country),
    FeatureSpec::free("country_3_preference", C::Country),
    FeatureSpec::free("country_4_preference", C::Country),
    FeatureSpec::free("country_5_preference", C::Country),
    // Top grapes
    FeatureSpec::free("grape_1_preference", C::Grape),
    FeatureSpec::free("grape_2_preference", C::Grape),
    FeatureSpec::free("grape_3_preference", C::Grape),
    FeatureSpec::free("grape_4_preference", C::Grape),
    FeatureSpec::free("grape_5_preference", C::Grape),
    // Complexity
    FeatureSpec::free("complexity_preference", C::Complexity),
    FeatureSpec::free("avg_complexity_tried", C::Complexity),
    // Quality indicators
    FeatureSpec::free("reserve_preference", C::Quality),
    FeatureSpec::free("grand_preference", C::Quality),
    // Rating patterns
    FeatureSpec::bounded("high_rating_proportion", C::RatingPatterns, 0.0, 1.0),
    FeatureSpec::bounded("low_rating_proportion", C::RatingPatterns, 0.0, 1.0),
    FeatureSpec::non_negative("rating_entropy", C::RatingPatterns),
    FeatureSpec::bounded("rating_1_proportion", C::RatingPatterns, 0.0, 1.0),
    FeatureSpec::bounded("rating_2_proportion", C::RatingPatterns, 0.0, 1.0),
    FeatureSpec::bounded("rating_3_proportion", C::RatingPatterns, 0.0, 1.0),
    FeatureSpec::bounded("rating_4_proportion", C::RatingPatterns, 0.0, 1.0),
    FeatureSpec::bounded("rating_5_proportion", C::RatingPatterns, 0.0, 1.0),
    // Diversity
    FeatureSpec::non_negative("rating_range", C::Diversity),
    FeatureSpec::non_negative("rating_variance", C::Diversity),
    FeatureSpec::non_negative("unique_ratings_count", C::Diversity),
    FeatureSpec::free("rating_skewness", C::Diversity),
    // Temporal
    FeatureSpec::non_negative("date_range_days", C::Temporal),
    FeatureSpec::non_negative("avg_days_between_ratings", C::Temporal),
    FeatureSpec::free("rating_trend", C::Temporal),
    FeatureSpec::non_negative("rating_frequency", C::Temporal),
];

/// Slot names of the legacy vector, in order.
pub const LEGACY_FEATURE_NAMES: [&str; LEGACY_DIMENSIONS] =
    ["body", "abv", "is_rose", "is_sparkling", "is_white", "dryness"];

/// Position of `name` in the canonical order.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURES.iter().position(|f| f.name == name)
}

/// Ordered numeric vector ready for a similarity query.
///
/// Built fresh per request and handed to the index by value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    shape: ProfileShape,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(shape: ProfileShape, values: Vec<f64>) -> Self {
        Self { shape, values }
    }

    pub fn shape(&self) -> ProfileShape {
        self.shape
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Flatten a validated profile into its vector. Pure and deterministic.
pub fn build(profile: &ValidatedProfile) -> FeatureVector {
    match profile {
        ValidatedProfile::Comprehensive(p) => build_comprehensive(p),
        ValidatedProfile::Legacy(p) => build_legacy(p),
    }
}

fn build_comprehensive(profile: &ComprehensiveProfile) -> FeatureVector {
    FeatureVector::new(ProfileShape::Comprehensive, profile.values().to_vec())
}

/// `[body, abv, is_rose, is_sparkling, is_white, dryness]`; Red sets no flag.
fn build_legacy(profile: &LegacyProfile) -> FeatureVector {
    let flag = |t: WineType| if profile.wine_type == t { 1.0 } else { 0.0 };

    FeatureVector::new(
        ProfileShape::Legacy,
        vec![
            f64::from(profile.body),
            profile.abv,
            flag(WineType::Rose),
            flag(WineType::Sparkling),
            flag(WineType::White),
            f64::from(profile.dryness),
        ],
    )
}
