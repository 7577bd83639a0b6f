// src/records/mod.rs
//! Typed views over raw SRD records.
//!
//! Each dataset deserializes its raw JSON objects into one of these structs.
//! A record missing a required key is rejected with
//! [`ValidationError::MissingField`] instead of failing later in a builder.

mod ability;
mod character;
mod creature;
mod equipment;
mod magic_item;
mod reference;
mod spell;

pub use ability::{ability_modifier, modifier_label, ABILITY_SCORE_MAX, ABILITY_SCORE_MIN};
pub use character::{
    level_value, Background, CharacterClass, ClassFeature, ClassLevel, Race, RacialTrait,
    Subclass, Subrace,
};
pub use creature::{Creature, CreatureAction};
pub use equipment::{Equipment, EquipmentKind};
pub use magic_item::MagicItem;
pub use reference::{AbilityScore, Alignment, Feat, Language, Proficiency, ReferenceEntry, Skill};
pub use spell::Spell;

use crate::types::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

static MISSING_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"missing field `([^`]+)`").expect("missing field pattern is valid"));

/// A link to another SRD entry, as it appears inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiReference {
    pub index: String,
    pub name: String,
}

/// Description text. The corpus stores it either as one string or as a list of paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Text {
    One(String),
    Many(Vec<String>),
}

impl Default for Text {
    fn default() -> Self {
        Text::Many(Vec::new())
    }
}

impl Text {
    pub fn paragraphs(&self) -> Vec<&str> {
        match self {
            Text::One(text) => vec![text.as_str()],
            Text::Many(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    pub fn joined(&self, separator: &str) -> String {
        self.paragraphs().join(separator)
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs().iter().all(|p| p.trim().is_empty())
    }
}

/// The label used for a raw record in errors and logs.
pub fn record_label(raw: &Value) -> String {
    ["name", "full_name", "index"]
        .iter()
        .find_map(|key| raw.get(key).and_then(Value::as_str))
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Deserializes one raw record into its typed view.
pub fn adapt<T: DeserializeOwned>(raw: &Value) -> Result<T, ValidationError> {
    T::deserialize(raw).map_err(|err| {
        let record = record_label(raw);
        let message = err.to_string();
        match MISSING_FIELD.captures(&message) {
            Some(caps) => ValidationError::MissingField {
                record,
                field: caps[1].to_string(),
            },
            None => ValidationError::MalformedRecord {
                record,
                reason: message,
            },
        }
    })
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `"rage_count"` becomes `"Rage Count"`.
pub fn title_case(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1` becomes `"1st"`, `12` becomes `"12th"`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Formats a number without a trailing `.0` when it is whole.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Formats a JSON scalar the way it reads in the source data.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
