use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// One plan section: field name to scalar or sequence-of-string values.
pub type SectionRecord = serde_json::Map<String, Value>;

/// Snapshot of all plan sections (itinerary, hotel, log, creation, ...).
///
/// Owned by the shell; the dispatch core only reads snapshots and returns
/// new ones. Section names outside the known set are carried as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanState {
    pub sections: BTreeMap<String, SectionRecord>,
}

/// Partial state change extracted from a model reply. One top-level
/// `updates` mapping from section name to the changed fields only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredUpdate {
    pub updates: BTreeMap<String, SectionRecord>,
}

/// A single field-level difference between two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub section: String,
    pub field: String,
    pub old: Option<Value>,
    pub new: Value,
}

impl PlanState {
    /// Starting plan used when no saved plan exists.
    pub fn seed() -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(
            "itinerary".to_string(),
            record(json!({
                "destination": "Kyoto, Japan",
                "days": 5,
                "waypoints": ["Kiyomizu-dera", "Arashiyama Bamboo Grove", "Fushimi Inari"],
            })),
        );
        sections.insert(
            "hotel".to_string(),
            record(json!({
                "tier": "boutique",
            })),
        );
        PlanState { sections }
    }

    pub fn section(&self, name: &str) -> Option<&SectionRecord> {
        self.sections.get(name)
    }

    /// Overlay a patch onto this snapshot, returning the merged snapshot.
    ///
    /// Shallow per-section merge: patch fields win, absent fields are
    /// preserved, sections not named in the patch are carried over
    /// unchanged. Sections new to the plan are added verbatim.
    pub fn merge(&self, patch: &StructuredUpdate) -> PlanState {
        let mut merged = self.clone();
        for (name, fields) in &patch.updates {
            let section = merged.sections.entry(name.clone()).or_default();
            for (field, value) in fields {
                section.insert(field.clone(), value.clone());
            }
        }
        merged
    }

    /// Field-level differences introduced by `next` relative to `self`.
    pub fn changes_to(&self, next: &PlanState) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        for (name, fields) in &next.sections {
            let base = self.sections.get(name);
            for (field, value) in fields {
                let old = base.and_then(|s| s.get(field));
                if old != Some(value) {
                    changes.push(FieldChange {
                        section: name.clone(),
                        field: field.clone(),
                        old: old.cloned(),
                        new: value.clone(),
                    });
                }
            }
        }
        changes
    }
}

fn record(value: Value) -> SectionRecord {
    match value {
        Value::Object(map) => map,
        _ => SectionRecord::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_state() -> PlanState {
        serde_json::from_value(json!({
            "hotel": {"budget": 800, "rating": 4}
        }))
        .unwrap()
    }

    #[test]
    fn merge_overwrites_named_fields_only() {
        let patch: StructuredUpdate =
            serde_json::from_value(json!({"updates": {"hotel": {"budget": 900}}})).unwrap();

        let merged = base_state().merge(&patch);
        let hotel = merged.section("hotel").unwrap();
        assert_eq!(hotel["budget"], json!(900));
        assert_eq!(hotel["rating"], json!(4));
    }

    #[test]
    fn merge_preserves_untouched_sections() {
        let mut base = base_state();
        base.sections
            .insert("log".to_string(), record(json!({"entries": ["day one"]})));
        let patch: StructuredUpdate =
            serde_json::from_value(json!({"updates": {"hotel": {"budget": 900}}})).unwrap();

        let merged = base.merge(&patch);
        assert_eq!(merged.section("log"), base.section("log"));
    }

    #[test]
    fn merge_adds_unknown_section_verbatim() {
        let patch: StructuredUpdate =
            serde_json::from_value(json!({"updates": {"creation": {"prompt": "x"}}})).unwrap();

        let merged = base_state().merge(&patch);
        assert_eq!(merged.section("creation").unwrap()["prompt"], json!("x"));
        // the base snapshot is untouched
        assert!(base_state().section("creation").is_none());
    }

    #[test]
    fn changes_report_old_and_new_values() {
        let patch: StructuredUpdate = serde_json::from_value(
            json!({"updates": {"hotel": {"budget": 900}, "creation": {"prompt": "x"}}}),
        )
        .unwrap();
        let base = base_state();
        let merged = base.merge(&patch);

        let mut changes = base.changes_to(&merged);
        changes.sort_by(|a, b| a.section.cmp(&b.section));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].section, "creation");
        assert_eq!(changes[0].old, None);
        assert_eq!(changes[1].field, "budget");
        assert_eq!(changes[1].old, Some(json!(800)));
        assert_eq!(changes[1].new, json!(900));
    }

    #[test]
    fn seed_plan_has_itinerary_and_hotel() {
        let seed = PlanState::seed();
        assert_eq!(
            seed.section("itinerary").unwrap()["destination"],
            json!("Kyoto, Japan")
        );
        assert!(seed.section("hotel").is_some());
    }
}
