//! Schema validation for the two accepted profile shapes.
//!
//! A payload is treated as comprehensive when it carries `rating_mean` or any
//! other canonical feature name; everything else is checked against the legacy
//! shape. Validation never partially accepts: either a complete
//! [`ValidatedProfile`] comes out or a [`WineError::Validation`] listing every
//! offending field.

use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{WineError, WineResult};
use crate::features::{COMPREHENSIVE_DIMENSIONS, FEATURES, feature_index};
use crate::models::{ComprehensiveProfile, LegacyProfile, ProfileShape, ValidatedProfile, WineType};

/// Optional tracking key allowed next to the 55 features.
pub const USER_ID_KEY: &str = "user_id";

const LEGACY_FIELDS: [&str; 4] = ["type", "body", "dryness", "abv"];

/// Collects problems per category so the final message lists all of them.
#[derive(Default)]
struct Problems {
    missing: Vec<String>,
    invalid: Vec<String>,
    out_of_range: Vec<String>,
    unknown: Vec<String>,
}

impl Problems {
    fn is_empty(&self) -> bool {
        self.missing.is_empty()
            && self.invalid.is_empty()
            && self.out_of_range.is_empty()
            && self.unknown.is_empty()
    }

    fn into_error(self) -> WineError {
        let mut parts = Vec::new();
        let mut push = |label: &str, names: &[String]| {
            if !names.is_empty() {
                parts.push(format!("{}: {}", label, names.join(", ")));
            }
        };
        push("Missing required field(s)", &self.missing);
        push("Invalid value for field(s)", &self.invalid);
        push("Out-of-range value for field(s)", &self.out_of_range);
        push("Unknown field(s)", &self.unknown);
        let message = parts.join("; ");

        let mut fields: Vec<String> = self
            .missing
            .into_iter()
            .chain(self.invalid)
            .chain(self.out_of_range)
            .chain(self.unknown)
            .collect();
        fields.sort_by(|a, b| canonical_rank(a).cmp(&canonical_rank(b)).then_with(|| a.cmp(b)));

        WineError::validation(fields, message)
    }
}

/// Sort key for reported fields: vector slot or legacy position first, then
/// `user_id`, then unrecognised keys.
fn canonical_rank(name: &str) -> (u8, usize) {
    if let Some(slot) = feature_index(name) {
        (0, slot)
    } else if let Some(pos) = LEGACY_FIELDS.iter().position(|f| *f == name) {
        (0, pos)
    } else if name == USER_ID_KEY {
        (1, 0)
    } else {
        (2, 0)
    }
}

/// Shape a payload will be validated as. Non-objects count as legacy.
pub fn detect_shape(payload: &Value) -> ProfileShape {
    match payload.as_object() {
        Some(map) if is_comprehensive(map) => ProfileShape::Comprehensive,
        _ => ProfileShape::Legacy,
    }
}

/// Validate a payload of either shape.
pub fn validate(payload: &Value) -> WineResult<ValidatedProfile> {
    validate_as(payload, detect_shape(payload))
}

/// Validate a payload that must use the legacy shape.
pub fn validate_legacy(payload: &Value) -> WineResult<ValidatedProfile> {
    validate_as(payload, ProfileShape::Legacy)
}

/// Validate a payload against one specific shape.
pub fn validate_as(payload: &Value, shape: ProfileShape) -> WineResult<ValidatedProfile> {
    let map = as_object(payload)?;
    match shape {
        ProfileShape::Comprehensive => {
            validate_comprehensive(map).map(ValidatedProfile::Comprehensive)
        }
        ProfileShape::Legacy => validate_legacy_map(map).map(ValidatedProfile::Legacy),
    }
}

fn as_object(payload: &Value) -> WineResult<&Map<String, Value>> {
    payload.as_object().ok_or_else(|| {
        WineError::validation(Vec::new(), "Request body must be a JSON object")
    })
}

fn is_comprehensive(map: &Map<String, Value>) -> bool {
    map.contains_key("rating_mean") || map.keys().any(|k| feature_index(k).is_some())
}

/// Accept JSON numbers and numeric strings; reject anything non-finite.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn validate_comprehensive(map: &Map<String, Value>) -> WineResult<ComprehensiveProfile> {
    let mut problems = Problems::default();
    let mut values = [0.0; COMPREHENSIVE_DIMENSIONS];

    for (slot, spec) in values.iter_mut().zip(FEATURES.iter()) {
        match map.get(spec.name) {
            None | Some(Value::Null) => problems.missing.push(spec.name.to_string()),
            Some(raw) => match coerce_number(raw) {
                None => problems.invalid.push(spec.name.to_string()),
                Some(v) if !spec.accepts(v) => problems.out_of_range.push(spec.name.to_string()),
                Some(v) => *slot = v,
            },
        }
    }

    let user_id = match map.get(USER_ID_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            problems.invalid.push(USER_ID_KEY.to_string());
            None
        }
    };

    let mut unknown: Vec<String> = map
        .keys()
        .filter(|k| k.as_str() != USER_ID_KEY && feature_index(k).is_none())
        .cloned()
        .collect();
    unknown.sort();
    problems.unknown = unknown;

    if !problems.is_empty() {
        return Err(problems.into_error());
    }

    Ok(ComprehensiveProfile::from_values(values, user_id))
}

/// Integer-valued JSON number in 0..=255; range is checked afterwards.
fn coerce_level(value: &Value) -> Option<Result<u8, ()>> {
    let n = value.as_f64()?;
    if !n.is_finite() || n.fract() != 0.0 {
        return None;
    }
    Some(if (0.0..=255.0).contains(&n) { Ok(n as u8) } else { Err(()) })
}

fn validate_legacy_map(map: &Map<String, Value>) -> WineResult<LegacyProfile> {
    let mut problems = Problems::default();

    for field in LEGACY_FIELDS {
        if matches!(map.get(field), None | Some(Value::Null)) {
            problems.missing.push(field.to_string());
        }
    }

    let wine_type = match map.get("type") {
        Some(Value::String(s)) => {
            let parsed = WineType::parse(s);
            if parsed.is_none() {
                problems.invalid.push("type".to_string());
            }
            parsed
        }
        None | Some(Value::Null) => None,
        Some(_) => {
            problems.invalid.push("type".to_string());
            None
        }
    };

    let mut level = |field: &str| -> Option<u8> {
        let raw = map.get(field).filter(|v| !v.is_null())?;
        match coerce_level(raw) {
            Some(Ok(v)) => Some(v),
            Some(Err(())) => {
                problems.out_of_range.push(field.to_string());
                None
            }
            None => {
                problems.invalid.push(field.to_string());
                None
            }
        }
    };
    let body = level("body");
    let dryness = level("dryness");

    let abv = match map.get("abv") {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let parsed = raw.as_f64().filter(|v| v.is_finite());
            if parsed.is_none() {
                problems.invalid.push("abv".to_string());
            }
            parsed
        }
    };

    // Fields that already failed get in-range placeholders so the range
    // rules only report on values the caller actually sent.
    let candidate = LegacyProfile {
        wine_type: wine_type.unwrap_or(WineType::Red),
        body: body.unwrap_or(1),
        dryness: dryness.unwrap_or(1),
        abv: abv.unwrap_or(1.0),
    };
    if let Err(errors) = candidate.validate() {
        let failing = errors.field_errors();
        problems.out_of_range.extend(
            LEGACY_FIELDS
                .iter()
                .filter(|f| failing.contains_key(**f))
                .map(|f| f.to_string()),
        );
    }

    if problems.is_empty() {
        return Ok(candidate);
    }

    Err(problems.into_error())
}
