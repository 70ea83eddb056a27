//! The update protocol embedded in model replies.
//!
//! A reply may carry at most one fenced ```json block whose content is a
//! single object with a top-level `updates` mapping. The block is machine
//! data for the plan; everything around it is prose for the traveler.
//! Model output is not under our control, so every parse failure degrades
//! to "no update" and the prose is still shown.

use crate::plan::{PlanState, SectionRecord, StructuredUpdate};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// A reply split into prose and an optional validated patch.
#[derive(Debug)]
pub struct Extraction {
    pub display_text: String,
    pub patch: Option<StructuredUpdate>,
}

/// Split `raw_reply` into display text and an optional structured update.
///
/// `base_state` is read only to drop patch fields whose JSON type
/// disagrees with the field already present in the plan; it is never
/// mutated. The returned display text is stable under re-extraction.
pub fn extract(raw_reply: &str, base_state: &PlanState) -> Extraction {
    let fence = Regex::new(r"(?s)```json\s*(.*?)```").unwrap();

    let Some(caps) = fence.captures(raw_reply) else {
        return Extraction {
            display_text: raw_reply.trim().to_string(),
            patch: None,
        };
    };

    let block = caps.get(0).unwrap();
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let display_text = strip_block(raw_reply, block.start(), block.end());
    let patch = parse_updates(body).map(|updates| filter_mismatched_fields(updates, base_state));

    Extraction {
        display_text,
        patch,
    }
}

/// Remove the fenced block and collapse the whitespace it leaves behind.
fn strip_block(raw: &str, start: usize, end: usize) -> String {
    let prefix = raw[..start].trim_end();
    let suffix = raw[end..].trim_start();

    if prefix.is_empty() {
        suffix.to_string()
    } else if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{}\n\n{}", prefix, suffix)
    }
}

/// Parse the fence body into per-section field maps. Any shape violation
/// is logged and treated as "no update".
fn parse_updates(body: &str) -> Option<StructuredUpdate> {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!("discarding unparseable update block: {}", e);
            return None;
        }
    };

    let Some(updates) = value.get("updates").and_then(Value::as_object) else {
        warn!("discarding update block without an `updates` mapping");
        return None;
    };

    let mut sections: BTreeMap<String, SectionRecord> = BTreeMap::new();
    for (name, fields) in updates {
        match fields {
            Value::Object(map) => {
                sections.insert(name.clone(), map.clone());
            }
            _ => {
                warn!("discarding non-record update for section `{}`", name);
            }
        }
    }

    Some(StructuredUpdate { updates: sections })
}

/// Drop patch fields whose JSON type disagrees with the existing field in
/// the same section. Fields new to a section are always accepted.
fn filter_mismatched_fields(mut patch: StructuredUpdate, base: &PlanState) -> StructuredUpdate {
    for (name, fields) in &mut patch.updates {
        let Some(existing) = base.section(name) else {
            continue;
        };
        fields.retain(|field, value| {
            match existing.get(field) {
                Some(current) if json_kind(current) != json_kind(value) => {
                    warn!(
                        "dropping `{}.{}`: patch has {} where plan has {}",
                        name,
                        field,
                        json_kind(value),
                        json_kind(current)
                    );
                    false
                }
                _ => true,
            }
        });
    }
    patch
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> PlanState {
        serde_json::from_value(json!({
            "hotel": {"budget": 800, "rating": 4, "name": "Kyoto Grand"}
        }))
        .unwrap()
    }

    #[test]
    fn reply_without_fence_passes_through() {
        let result = extract("  Sounds like a great trip!  ", &state());
        assert_eq!(result.display_text, "Sounds like a great trip!");
        assert!(result.patch.is_none());
    }

    #[test]
    fn fenced_update_is_split_from_prose() {
        let raw = "Plan updated.\n```json\n{\"updates\":{\"hotel\":{\"budget\":900}}}\n```";
        let result = extract(raw, &state());
        assert_eq!(result.display_text, "Plan updated.");
        let patch = result.patch.unwrap();
        assert_eq!(patch.updates["hotel"]["budget"], json!(900));
    }

    #[test]
    fn extraction_is_idempotent_on_display_text() {
        let raw = "Before.\n\n```json\n{\"updates\":{\"hotel\":{\"budget\":900}}}\n```\n\nAfter.";
        let first = extract(raw, &state());
        assert_eq!(first.display_text, "Before.\n\nAfter.");

        let second = extract(&first.display_text, &state());
        assert_eq!(second.display_text, first.display_text);
        assert!(second.patch.is_none());
    }

    #[test]
    fn unparseable_block_is_stripped_but_ignored() {
        let raw = "Here you go.\n```json\n{not json at all\n```";
        let result = extract(raw, &state());
        assert_eq!(result.display_text, "Here you go.");
        assert!(result.patch.is_none());
    }

    #[test]
    fn block_without_updates_mapping_is_ignored() {
        let raw = "Done.\n```json\n{\"hotel\":{\"budget\":900}}\n```";
        let result = extract(raw, &state());
        assert_eq!(result.display_text, "Done.");
        assert!(result.patch.is_none());

        let raw = "Done.\n```json\n{\"updates\": [1, 2]}\n```";
        assert!(extract(raw, &state()).patch.is_none());
    }

    #[test]
    fn non_record_section_is_dropped() {
        let raw = "Ok.\n```json\n{\"updates\":{\"hotel\":\"cheap\",\"log\":{\"note\":\"x\"}}}\n```";
        let patch = extract(raw, &state()).patch.unwrap();
        assert!(!patch.updates.contains_key("hotel"));
        assert_eq!(patch.updates["log"]["note"], json!("x"));
    }

    #[test]
    fn type_mismatch_against_plan_is_dropped() {
        let raw = "Ok.\n```json\n{\"updates\":{\"hotel\":{\"budget\":\"lots\",\"rating\":5,\"pool\":true}}}\n```";
        let patch = extract(raw, &state()).patch.unwrap();
        let hotel = &patch.updates["hotel"];
        // string where the plan has a number: dropped
        assert!(!hotel.contains_key("budget"));
        // same type: kept
        assert_eq!(hotel["rating"], json!(5));
        // new field: kept
        assert_eq!(hotel["pool"], json!(true));
    }

    #[test]
    fn fence_only_reply_yields_empty_prose() {
        let raw = "```json\n{\"updates\":{\"creation\":{\"prompt\":\"x\"}}}\n```";
        let result = extract(raw, &state());
        assert_eq!(result.display_text, "");
        assert_eq!(result.patch.unwrap().updates["creation"]["prompt"], json!("x"));
    }
}
