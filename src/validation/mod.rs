//! JSON Schema validation for emitted profession documents.
//!
//! Documents are checked against a Draft 7 schema embedded at compile time
//! from `schemas/profession-trades.json`, plus a registry-identifier shape
//! check on every item id the trades reference (the game silently drops
//! trades whose item ids are malformed, so catching them here is cheaper
//! than in-game debugging).
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use tradegen::validate_profession_document;
//!
//! let doc = json!({
//!     "profession": "createengineers:Blacksmith",
//!     "trades": {
//!         "novice": [], "apprentice": [], "journeyman": [],
//!         "expert": [], "master": []
//!     }
//! });
//! assert!(validate_profession_document(&doc).is_ok());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Registry identifier shape: `namespace:path` with a lowercase namespace,
/// or a bare path (implied `minecraft:` namespace).
static ITEM_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z0-9_.\-]+:)?[a-z0-9_.\-/]+$").expect("invalid item id regex"));

/// Validate a JSON object against a JSON schema.
///
/// # Returns
/// * `Ok(())` when valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True/false variant of [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

fn embedded_schema() -> Value {
    serde_json::from_str(include_str!("../../schemas/profession-trades.json"))
        .expect("Invalid embedded schema")
}

/// Validate a profession document against the embedded schema and check
/// every referenced item identifier.
pub fn validate_profession_document(data: &Value) -> Result<(), Vec<String>> {
    let mut errors = match validate(&embedded_schema(), data) {
        Ok(()) => Vec::new(),
        Err(errs) => errs,
    };

    errors.extend(item_id_errors(data));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check against the embedded schema only.
pub fn is_valid_profession_document(data: &Value) -> bool {
    is_valid(&embedded_schema(), data)
}

/// True if `id` looks like a registry identifier.
pub fn is_valid_item_id(id: &str) -> bool {
    ITEM_ID_RE.is_match(id)
}

/// Collect malformed item ids from every trade in the document.
fn item_id_errors(data: &Value) -> Vec<String> {
    const STACK_FIELDS: [&str; 5] = ["buy", "sell", "reward", "priceIn", "convertible"];

    let Some(tiers) = data.get("trades").and_then(|t| t.as_object()) else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (tier, trades) in tiers {
        let Some(trades) = trades.as_array() else {
            continue;
        };
        for trade in trades {
            for field in STACK_FIELDS {
                if let Some(id) = trade
                    .get(field)
                    .and_then(|s| s.get("item"))
                    .and_then(|i| i.as_str())
                {
                    if !is_valid_item_id(id) {
                        errors.push(format!(
                            "{}: '{}' in '{}' is not a valid item identifier",
                            tier, id, field
                        ));
                    }
                }
            }
        }
    }
    errors
}
