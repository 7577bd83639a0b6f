// src/records/creature.rs
use super::{capitalize, format_number, format_scalar, ApiReference};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ArmorClassEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i64,
    #[serde(default)]
    pub armor: Vec<ApiReference>,
    #[serde(default)]
    pub spell: Option<ApiReference>,
    #[serde(default)]
    pub condition: Option<ApiReference>,
}

/// Older corpus releases store armor class as a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreatureArmorClass {
    Entries(Vec<ArmorClassEntry>),
    Flat(i64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatureProficiency {
    pub value: i64,
    pub proficiency: ApiReference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatureAction {
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creature {
    pub index: String,
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub creature_type: String,
    #[serde(default)]
    pub alignment: String,
    pub armor_class: CreatureArmorClass,
    pub hit_points: i64,
    #[serde(default)]
    pub hit_points_roll: String,
    #[serde(default)]
    pub speed: IndexMap<String, Value>,
    pub strength: i64,
    pub dexterity: i64,
    pub constitution: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub charisma: i64,
    #[serde(default)]
    pub proficiency_bonus: i64,
    #[serde(default)]
    pub proficiencies: Vec<CreatureProficiency>,
    #[serde(default)]
    pub damage_vulnerabilities: Vec<String>,
    #[serde(default)]
    pub damage_resistances: Vec<String>,
    #[serde(default)]
    pub damage_immunities: Vec<String>,
    #[serde(default)]
    pub condition_immunities: Vec<ApiReference>,
    #[serde(default)]
    pub senses: IndexMap<String, Value>,
    #[serde(default)]
    pub languages: String,
    pub challenge_rating: f64,
    #[serde(default)]
    pub xp: i64,
    #[serde(default)]
    pub special_abilities: Vec<CreatureAction>,
    #[serde(default)]
    pub actions: Vec<CreatureAction>,
    #[serde(default)]
    pub legendary_actions: Vec<CreatureAction>,
    #[serde(default)]
    pub reactions: Vec<CreatureAction>,
    #[serde(default)]
    pub desc: Option<String>,
}

fn join_capitalized(values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|v| capitalize(v))
            .collect::<Vec<_>>()
            .join(" , "),
    )
}

impl Creature {
    /// The six scores in STR, DEX, CON, INT, WIS, CHA order.
    pub fn ability_scores(&self) -> [i64; 6] {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
    }

    pub fn challenge_rating_text(&self) -> String {
        format_number(self.challenge_rating)
    }

    /// `"Natural 17 - Armor 18 : Plate"`.
    pub fn armor_class_text(&self) -> String {
        let entries = match &self.armor_class {
            CreatureArmorClass::Flat(value) => return value.to_string(),
            CreatureArmorClass::Entries(entries) => entries,
        };
        let mut parts = Vec::new();
        for entry in entries {
            let head = format!("{} {}", capitalize(&entry.kind), entry.value);
            if let Some(spell) = &entry.spell {
                parts.push(format!("{} : {}", head, spell.name));
            } else if let Some(condition) = &entry.condition {
                parts.push(format!("{} : {}", head, condition.name));
            } else if !entry.armor.is_empty() {
                parts.extend(entry.armor.iter().map(|a| format!("{} : {}", head, a.name)));
            } else {
                parts.push(head);
            }
        }
        parts.join(" - ")
    }

    /// `"Walk: 30 ft., Fly: 60 ft., Hover"`.
    pub fn speed_text(&self) -> String {
        self.speed
            .iter()
            .filter_map(|(movement, distance)| match distance {
                Value::Bool(true) => Some(capitalize(movement)),
                Value::Bool(false) => None,
                other => Some(format!("{}: {}", capitalize(movement), format_scalar(other))),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Movement keys, e.g. `["Walk", "Fly"]`.
    pub fn movement_types(&self) -> Vec<String> {
        self.speed.keys().map(|k| capitalize(k)).collect()
    }

    fn proficiency_line(&self, prefix: &str) -> Option<String> {
        let entries: Vec<String> = self
            .proficiencies
            .iter()
            .filter_map(|p| {
                p.proficiency
                    .name
                    .strip_prefix(prefix)
                    .map(|name| format!("{} +{}", name, p.value))
            })
            .collect();
        (!entries.is_empty()).then(|| entries.join(" , "))
    }

    pub fn saving_throws(&self) -> Option<String> {
        self.proficiency_line("Saving Throw: ")
    }

    pub fn skills(&self) -> Option<String> {
        self.proficiency_line("Skill: ")
    }

    pub fn damage_resistances_text(&self) -> Option<String> {
        join_capitalized(&self.damage_resistances)
    }

    pub fn damage_vulnerabilities_text(&self) -> Option<String> {
        join_capitalized(&self.damage_vulnerabilities)
    }

    pub fn damage_immunities_text(&self) -> Option<String> {
        join_capitalized(&self.damage_immunities)
    }

    pub fn condition_immunities_text(&self) -> Option<String> {
        if self.condition_immunities.is_empty() {
            return None;
        }
        Some(
            self.condition_immunities
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(" , "),
        )
    }

    /// `"Darkvision: 60 ft., Passive perception: 10"`.
    pub fn senses_text(&self) -> Option<String> {
        if self.senses.is_empty() {
            return None;
        }
        Some(
            self.senses
                .iter()
                .map(|(sense, value)| {
                    format!("{}: {}", capitalize(&sense.replace('_', " ")), format_scalar(value))
                })
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Special abilities other than spellcasting.
    pub fn abilities(&self) -> impl Iterator<Item = &CreatureAction> {
        self.special_abilities
            .iter()
            .filter(|a| !a.name.starts_with("Spellcasting"))
    }

    pub fn spellcasting(&self) -> Option<&CreatureAction> {
        self.special_abilities
            .iter()
            .find(|a| a.name.starts_with("Spellcasting"))
    }
}
