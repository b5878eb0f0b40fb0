//! Lenient parsing of model output
//!
//! Discovery and price lookups deliberately treat malformed output
//! differently: discovery surfaces a parse failure to its caller, while a
//! price cell degrades to a "no price" record and never fails.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use shared::{Component, DiscoveryCandidate, scout_debug, scout_warn};
use crate::error::{ScoutError, ScoutResult};
use crate::types::{DEFAULT_CURRENCY, DiscoveryParse, PriceCell};

static OPENING_FENCE: OnceLock<Regex> = OnceLock::new();
static CLOSING_FENCE: OnceLock<Regex> = OnceLock::new();

fn opening_fence() -> &'static Regex {
    // A "json" tag may touch the body; any other tag needs trailing whitespace, so "```null```" keeps its body
    OPENING_FENCE.get_or_init(|| Regex::new(r"^```(?:[A-Za-z]+\s|(?i:json))?\s*").unwrap())
}

fn closing_fence() -> &'static Regex {
    CLOSING_FENCE.get_or_init(|| Regex::new(r"\s*```$").unwrap())
}

/// Trim the output and remove a surrounding markdown code fence, if any
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = opening_fence().find(trimmed) else {
        return trimmed;
    };

    let body = &trimmed[open.end()..];
    match closing_fence().find(body) {
        Some(close) => &body[..close.start()],
        None => body,
    }
}

/// Parse discovery output into a candidate list
///
/// Accepts a bare array, or an object carrying a `competitors` or `data`
/// array. Any other JSON shape yields [`DiscoveryParse::Empty`]; output that
/// is not JSON at all is an error.
pub fn parse_discovery(raw: &str) -> ScoutResult<DiscoveryParse> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(body).map_err(|e| ScoutError::ParseError {
        message: format!("discovery output is not valid JSON: {e}"),
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match take_array(&mut map, "competitors").or_else(|| take_array(&mut map, "data")) {
            Some(items) => items,
            None => {
                scout_warn!(Component::Discovery, "⚠️ Unexpected discovery object without a candidate list: {}", body);
                return Ok(DiscoveryParse::Empty);
            }
        },
        other => {
            scout_warn!(Component::Discovery, "⚠️ Unexpected discovery output shape: {}", other);
            return Ok(DiscoveryParse::Empty);
        }
    };

    let candidates = items.iter().filter_map(candidate_from_value).collect();

    Ok(DiscoveryParse::List(candidates))
}

/// Build a candidate field by field
///
/// Only a missing or non-string `name` drops the item. Other fields that
/// have the wrong type are dropped on their own.
fn candidate_from_value(item: &Value) -> Option<DiscoveryCandidate> {
    let Some(name) = string_field(item, "name") else {
        scout_warn!(Component::Discovery, "⚠️ Skipping candidate without a usable name: {}", item);
        return None;
    };

    let optional = |key: &str| {
        let field = string_field(item, key);
        if field.is_none() && item.get(key).is_some_and(|v| !v.is_null() && !v.is_string()) {
            scout_warn!(Component::Discovery, "⚠️ Ignoring non-text {} on candidate {}", key, name);
        }
        field
    };

    let confidence = match item.get("confidence") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = confidence_from_value(value);
            if parsed.is_none() {
                scout_warn!(Component::Discovery, "⚠️ Ignoring unusable confidence {} on candidate {}", value, name);
            }
            parsed
        }
    };

    Some(DiscoveryCandidate {
        search_name: optional("searchName"),
        booking_com_url: optional("bookingComUrl"),
        hostelworld_url: optional("hostelworldUrl"),
        reasoning: optional("reasoning"),
        confidence,
        name,
    })
}

fn confidence_from_value(value: &Value) -> Option<f64> {
    let confidence = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    confidence.is_finite().then_some(confidence)
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    match map.remove(key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Parse a single price lookup; never fails
pub fn parse_price_cell(raw: &str) -> PriceCell {
    let body = strip_code_fences(raw);
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            scout_warn!(Component::PriceSearch, "⚠️ Price output is not valid JSON ({}): {}", e, raw);
            return PriceCell::parse_failure();
        }
    };

    let cell = PriceCell {
        price: value.get("price").and_then(price_from_value),
        currency: string_field(&value, "currency").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        platform: string_field(&value, "platform"),
        url: string_field(&value, "url"),
        available: !matches!(value.get("available"), Some(Value::Bool(false))),
        room_name: string_field(&value, "roomName"),
        error: string_field(&value, "error"),
    };
    scout_debug!(Component::PriceSearch, "Parsed price cell: {:?}", cell);
    cell
}

/// Positive finite price from a number or numeric string
fn price_from_value(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (price.is_finite() && price > 0.0).then_some(price)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PARSE_ERROR_MARKER;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("\n```JSON\n[]\n```\n"), "[]");
        assert_eq!(strip_code_fences("```null```"), "null");
        assert_eq!(strip_code_fences("```json[1]```"), "[1]");
        assert_eq!(strip_code_fences("```JSON{\"a\":1}```"), "{\"a\":1}");
        // Truncated output keeps what follows the opening fence
        assert_eq!(strip_code_fences("```json\n[1"), "[1");
    }

    #[test]
    fn test_discovery_is_fence_insensitive() {
        let plain = r#"[{"name":"X"}]"#;
        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(parse_discovery(plain).unwrap(), parse_discovery(&fenced).unwrap());
    }

    #[test]
    fn test_discovery_scenario_selina() {
        let raw = "```json\n[{\"name\":\"Selina Medellín\",\"confidence\":0.8}]\n```";
        let candidates = parse_discovery(raw).unwrap().into_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Selina Medellín");
        assert_eq!(candidates[0].confidence, Some(0.8));
        assert_eq!(candidates[0].search_name, None);
    }

    #[test]
    fn test_discovery_accepts_wrapped_lists() {
        let wrapped = r#"{"competitors":[{"name":"A"},{"name":"B"}]}"#;
        assert_eq!(parse_discovery(wrapped).unwrap().into_candidates().len(), 2);

        let data = r#"{"data":[{"name":"C"}]}"#;
        let parsed = parse_discovery(data).unwrap();
        assert!(matches!(parsed, DiscoveryParse::List(ref c) if c[0].name == "C"));
    }

    #[test]
    fn test_discovery_unexpected_shape_is_empty() {
        assert_eq!(parse_discovery(r#"{"result":"none"}"#).unwrap(), DiscoveryParse::Empty);
        assert_eq!(parse_discovery(r#"{"competitors":"none"}"#).unwrap(), DiscoveryParse::Empty);
        assert_eq!(parse_discovery("42").unwrap(), DiscoveryParse::Empty);
        assert_eq!(parse_discovery("[]").unwrap(), DiscoveryParse::List(Vec::new()));
    }

    #[test]
    fn test_discovery_invalid_json_is_an_error() {
        let result = parse_discovery("Here are some hostels: Selina, Los Patios");
        assert!(matches!(result, Err(ScoutError::ParseError { .. })));
    }

    #[test]
    fn test_discovery_skips_items_without_name() {
        let raw = r#"[{"name":"Keep"},{"reasoning":"no name"},"bare string"]"#;
        let candidates = parse_discovery(raw).unwrap().into_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Keep");
    }

    #[test]
    fn test_discovery_accepts_json_tag_without_newline() {
        let candidates = parse_discovery(r#"```json[{"name":"X"}]```"#).unwrap().into_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "X");
    }

    #[test]
    fn test_discovery_keeps_candidates_with_mistyped_optional_fields() {
        let raw = r#"[
            {"name":"Selina Medellín","confidence":"0.8"},
            {"name":"Los Patios","confidence":0.9,"searchName":42,"reasoning":["close","cheap"]},
            {"name":"Black Sheep","confidence":"high","bookingComUrl":null}
        ]"#;
        let candidates = parse_discovery(raw).unwrap().into_candidates();
        assert_eq!(candidates.len(), 3);

        assert_eq!(candidates[0].name, "Selina Medellín");
        assert_eq!(candidates[0].confidence, Some(0.8));

        assert_eq!(candidates[1].name, "Los Patios");
        assert_eq!(candidates[1].confidence, Some(0.9));
        assert_eq!(candidates[1].search_name, None);
        assert_eq!(candidates[1].reasoning, None);

        assert_eq!(candidates[2].confidence, None);
        assert_eq!(candidates[2].booking_com_url, None);
    }

    #[test]
    fn test_discovery_skips_non_text_names() {
        let raw = r#"[{"name":42},{"name":"   "},{"name":" Happy Buddha "}]"#;
        let candidates = parse_discovery(raw).unwrap().into_candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Happy Buddha");
    }

    #[test]
    fn test_price_cell_accepts_json_tag_without_newline() {
        let cell = parse_price_cell(r#"```json{"price":35000,"currency":"COP"}```"#);
        assert_eq!(cell.price, Some(35000.0));
        assert_eq!(cell.error, None);
    }

    #[test]
    fn test_price_cell_full_record() {
        let raw = "```json\n{\"price\":35000,\"currency\":\"COP\",\"platform\":\"booking.com\",\"url\":\"https://b.example\",\"available\":true,\"roomName\":\"Private Room\"}\n```";
        let cell = parse_price_cell(raw);
        assert_eq!(cell.price, Some(35000.0));
        assert_eq!(cell.currency, "COP");
        assert_eq!(cell.platform.as_deref(), Some("booking.com"));
        assert_eq!(cell.url.as_deref(), Some("https://b.example"));
        assert!(cell.available);
        assert_eq!(cell.room_name.as_deref(), Some("Private Room"));
        assert_eq!(cell.error, None);
    }

    #[test]
    fn test_price_cell_not_found() {
        let cell = parse_price_cell(r#"{"price": null, "error": "not found"}"#);
        assert_eq!(cell.price, None);
        assert_eq!(cell.currency, "COP");
        assert!(cell.available);
        assert_eq!(cell.error.as_deref(), Some("not found"));
    }

    #[test]
    fn test_price_cell_coerces_price_values() {
        assert_eq!(parse_price_cell(r#"{"price":"42000"}"#).price, Some(42000.0));
        assert_eq!(parse_price_cell(r#"{"price":0}"#).price, None);
        assert_eq!(parse_price_cell(r#"{"price":-5}"#).price, None);
        assert_eq!(parse_price_cell(r#"{"price":"about 40k"}"#).price, None);
        assert!(!parse_price_cell(r#"{"price":1,"available":false}"#).available);
        assert_eq!(parse_price_cell(r#"{"price":1,"currency":"USD"}"#).currency, "USD");
    }

    #[test]
    fn test_price_cell_never_fails_on_garbage() {
        let cell = parse_price_cell("I could not find that hostel, sorry.");
        assert_eq!(cell, PriceCell::parse_failure());
        assert_eq!(cell.error.as_deref(), Some(PARSE_ERROR_MARKER));
        assert!(!cell.available);
        assert_eq!(cell.currency, "COP");
    }
}
