//! Wine recommendation domain.
//!
//! ```text
//! ┌─────────────────┐
//! │   handlers      │  ← POST /wines, /wines/recommend, /wines/legacy
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │   WineService   │  ← validate → build vector → query (bounded retry)
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ SimilarityIndex │  ← trait, one call per query
//! │   (trait)       │
//! └────────┬────────┘
//!          │
//! ┌────────▼──────────┐
//! │ VertexIndexClient │  ← Vertex AI Vector Search findNeighbors
//! └───────────────────┘
//! ```
//!
//! Two payload shapes are accepted: the 55-field comprehensive profile and the
//! 4-field legacy profile. Validation resolves the shape once into a
//! [`ValidatedProfile`]; everything downstream matches on that.

pub mod error;
pub mod features;
pub mod handlers;
pub mod index;
pub mod models;
pub mod scoring;
pub mod service;
pub mod validation;

pub use error::{WineError, WineResult};
pub use features::{COMPREHENSIVE_DIMENSIONS, FEATURES, FeatureVector, LEGACY_DIMENSIONS};
pub use handlers::ApiDoc;
pub use index::{IndexConfig, SimilarityIndex, VertexIndexClient};
pub use models::{
    ComprehensiveProfile, LegacyProfile, ProfileShape, SimilarityResult, ValidatedProfile,
    WineMatch, WineType, WinesResponse,
};
pub use scoring::DistanceMeasure;
pub use service::{DEFAULT_TOP_K, WineService};
