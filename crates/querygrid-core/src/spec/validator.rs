//! Declaration and compatibility validation

use super::SpecUnit;
use crate::aggregator::DynAggregator;
use crate::error::{QueryGridError, Result};
use serde_json::Value;

const DECLARATION_SECTIONS: [&str; 3] = ["indexs", "aggregator", "ai_client"];

/// Validate the top-level structure of a declarative spec.
///
/// The declaration must be a mapping with exactly the three sections
/// `indexs`, `aggregator` and `ai_client`; anything else fails with a
/// schema error naming the missing or unexpected section.
pub fn validate_declaration(declaration: &Value) -> Result<()> {
    let mapping = declaration
        .as_object()
        .ok_or_else(|| QueryGridError::Schema("spec declaration must be a mapping".to_string()))?;

    if mapping.is_empty() {
        return Err(QueryGridError::Schema(
            "no schemas available to build".to_string(),
        ));
    }

    for section in DECLARATION_SECTIONS {
        if !mapping.contains_key(section) {
            return Err(QueryGridError::Schema(format!(
                "spec is missing required section '{section}'"
            )));
        }
    }
    for key in mapping.keys() {
        if !DECLARATION_SECTIONS.contains(&key.as_str()) {
            return Err(QueryGridError::Schema(format!(
                "spec has unexpected section '{key}'"
            )));
        }
    }

    if !mapping["indexs"].is_array() {
        return Err(QueryGridError::Schema(
            "'indexs' section must be a list".to_string(),
        ));
    }
    if !mapping["aggregator"].is_object() {
        return Err(QueryGridError::Schema(
            "'aggregator' section must be a mapping".to_string(),
        ));
    }
    if !mapping["ai_client"].is_object() {
        return Err(QueryGridError::Schema(
            "'ai_client' section must be a mapping".to_string(),
        ));
    }

    Ok(())
}

/// Cross-check result type compatibility across units and the aggregator.
///
/// Every engine's declared result type must equal the first unit's
/// exactly, and the aggregator's input element type must equal it too.
/// Exact equality is deliberate: the aggregator receives one homogeneous
/// collection, so mixed result types are rejected even when one would be
/// convertible into another.
pub fn validate_compatibility(units: &[SpecUnit], aggregator: &dyn DynAggregator) -> Result<()> {
    let first = match units.first() {
        Some(unit) => unit,
        None => return Ok(()),
    };
    let expected = first.search_engine.result_type();
    let expected_name = first.search_engine.result_type_name();

    for unit in &units[1..] {
        if unit.search_engine.result_type() != expected {
            return Err(QueryGridError::TypeMismatch(format!(
                "index '{}' search engine returns '{}' but index '{}' returns '{}'; all \
                 engines in one spec must share a result type",
                first.name,
                expected_name,
                unit.name,
                unit.search_engine.result_type_name()
            )));
        }
    }

    if aggregator.input_type() != expected {
        return Err(QueryGridError::TypeMismatch(format!(
            "aggregator expects input type '{}' but search engines return '{}'",
            aggregator.input_type_name(),
            expected_name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declaration_missing_section() {
        let declaration = json!({
            "indexs": [],
            "ai_client": {"type": "stub_ai"}
        });
        let err = validate_declaration(&declaration).unwrap_err();
        assert!(err.to_string().contains("aggregator"));
    }

    #[test]
    fn test_declaration_unexpected_section() {
        let declaration = json!({
            "indexs": [],
            "aggregator": {"type": "a"},
            "ai_client": {"type": "b"},
            "extra": {}
        });
        let err = validate_declaration(&declaration).unwrap_err();
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn test_declaration_wrong_section_shape() {
        let declaration = json!({
            "indexs": {"not": "a list"},
            "aggregator": {"type": "a"},
            "ai_client": {"type": "b"}
        });
        let err = validate_declaration(&declaration).unwrap_err();
        assert!(err.to_string().contains("indexs"));
    }
}
