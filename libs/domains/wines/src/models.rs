use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::{COMPREHENSIVE_DIMENSIONS, FEATURES, feature_index};

/// Which of the two accepted payload shapes a request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileShape {
    Comprehensive,
    Legacy,
}

impl ProfileShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileShape::Comprehensive => "comprehensive",
            ProfileShape::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ProfileShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wine style of the legacy shorthand profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum WineType {
    Red,
    White,
    Rose,
    Sparkling,
}

impl WineType {
    pub const ALL: [WineType; 4] = [
        WineType::Red,
        WineType::White,
        WineType::Rose,
        WineType::Sparkling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WineType::Red => "Red",
            WineType::White => "White",
            WineType::Rose => "Rose",
            WineType::Sparkling => "Sparkling",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

/// The four-field legacy profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LegacyProfile {
    #[serde(rename = "type")]
    pub wine_type: WineType,
    #[validate(range(min = 1, max = 5))]
    #[schema(minimum = 1, maximum = 5)]
    pub body: u8,
    #[validate(range(min = 1, max = 5))]
    #[schema(minimum = 1, maximum = 5)]
    pub dryness: u8,
    /// Alcohol by volume, in percent
    #[validate(range(exclusive_min = 0.0, max = 25.0))]
    #[schema(exclusive_minimum = 0.0, maximum = 25.0)]
    pub abv: f64,
}

/// A fully validated 55-field profile, stored in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensiveProfile {
    values: [f64; COMPREHENSIVE_DIMENSIONS],
    user_id: Option<String>,
}

impl ComprehensiveProfile {
    /// Values must already be in canonical order and within bounds.
    pub(crate) fn from_values(values: [f64; COMPREHENSIVE_DIMENSIONS], user_id: Option<String>) -> Self {
        Self { values, user_id }
    }

    pub fn values(&self) -> &[f64; COMPREHENSIVE_DIMENSIONS] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    /// Optional caller-supplied identifier, used for logging only.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURES.iter().map(|f| f.name).zip(self.values.iter().copied())
    }
}

/// Result of validation: one of the two shapes, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedProfile {
    Comprehensive(ComprehensiveProfile),
    Legacy(LegacyProfile),
}

impl ValidatedProfile {
    pub fn shape(&self) -> ProfileShape {
        match self {
            ValidatedProfile::Comprehensive(_) => ProfileShape::Comprehensive,
            ValidatedProfile::Legacy(_) => ProfileShape::Legacy,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            ValidatedProfile::Comprehensive(p) => p.user_id(),
            ValidatedProfile::Legacy(_) => None,
        }
    }
}

/// Raw match from the similarity index.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub distance: f64,
}

/// One scored wine.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WineMatch {
    pub id: String,
    /// Similarity in (0, 1]; higher is closer
    pub score: f64,
}

/// Scored matches in the order the index returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityResult {
    pub matches: Vec<WineMatch>,
}

impl SimilarityResult {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.id.as_str())
    }
}

/// Response body of the recommendation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WinesResponse {
    /// Wine identifiers, closest first
    #[schema(example = json!(["wine_123", "wine_456"]))]
    pub wines: Vec<String>,
    /// Similarity score per wine identifier
    #[schema(example = json!({"wine_123": 0.91, "wine_456": 0.87}))]
    pub scores: BTreeMap<String, f64>,
}

impl From<SimilarityResult> for WinesResponse {
    /// Keeps the first occurrence when the index repeats an identifier, so
    /// every listed wine has exactly one score.
    fn from(result: SimilarityResult) -> Self {
        let mut wines = Vec::with_capacity(result.matches.len());
        let mut scores = BTreeMap::new();

        for m in result.matches {
            if scores.contains_key(&m.id) {
                continue;
            }
            scores.insert(m.id.clone(), m.score);
            wines.push(m.id);
        }

        Self { wines, scores }
    }
}
