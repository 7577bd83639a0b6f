// src/records/reference.rs
//! Small lookup tables: weapon properties, schools, damage types, rules and the like.

use super::{ApiReference, Text};
use serde::Deserialize;

/// Any entry that is just a name and a description.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceEntry {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alignment {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub desc: Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub index: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub typical_speakers: Vec<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Skill {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Text,
    pub ability_score: ApiReference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilityScore {
    pub index: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub desc: Text,
    #[serde(default)]
    pub skills: Vec<ApiReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Proficiency {
    pub index: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub classes: Vec<ApiReference>,
    #[serde(default)]
    pub races: Vec<ApiReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatPrerequisite {
    pub ability_score: ApiReference,
    pub minimum_score: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feat {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub prerequisites: Vec<FeatPrerequisite>,
    #[serde(default)]
    pub desc: Text,
}

impl Feat {
    /// `"STR 13"`, joined with `", "` when there are several.
    pub fn requirements(&self) -> Option<String> {
        if self.prerequisites.is_empty() {
            return None;
        }
        Some(
            self.prerequisites
                .iter()
                .map(|p| format!("{} {}", p.ability_score.name, p.minimum_score))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::adapt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_feat_requirements() {
        let grappler: Feat = adapt(&json!({
            "index": "grappler",
            "name": "Grappler",
            "prerequisites": [{"ability_score": {"index": "str", "name": "STR"}, "minimum_score": 13}],
            "desc": ["You've developed the skills necessary to hold your own in close-quarters grappling."]
        }))
        .unwrap();
        assert_eq!(grappler.requirements().as_deref(), Some("STR 13"));
    }

    #[test]
    fn test_reference_entry_with_string_desc() {
        let school: ReferenceEntry = adapt(&json!({
            "index": "evocation",
            "name": "Evocation",
            "desc": "Evocation spells manipulate magical energy."
        }))
        .unwrap();
        assert_eq!(
            school.desc.paragraphs(),
            vec!["Evocation spells manipulate magical energy."]
        );
    }
}
