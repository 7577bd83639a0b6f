// src/records/character.rs
//! Character-building records: classes, races, backgrounds and their companions.

use super::{capitalize, format_scalar, ApiReference, Text};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentGrant {
    pub equipment: ApiReference,
    #[serde(default)]
    pub quantity: u32,
}

impl EquipmentGrant {
    pub fn label(&self) -> String {
        format!("{} (Quantity: {})", self.equipment.name, self.quantity)
    }
}

/// A "choose one of" equipment entry. Only its description is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentOption {
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub from: Option<Value>,
}

impl EquipmentOption {
    pub fn label(&self) -> Option<String> {
        self.desc.clone().or_else(|| {
            self.from
                .as_ref()
                .and_then(|from| from.pointer("/equipment_category/name"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    }
}

// ---------------------------------------------------------------------------
// Backgrounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CharacteristicOption {
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub alignments: Vec<ApiReference>,
}

impl CharacteristicOption {
    /// The option text; ideals carry their alignment as `"{desc} - {alignment}"`.
    pub fn label(&self) -> Option<String> {
        if let Some(text) = &self.string {
            return Some(text.clone());
        }
        let desc = self.desc.as_ref()?;
        Some(match self.alignments.first() {
            Some(alignment) => format!("{} - {}", desc, alignment.name),
            None => desc.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacteristicOptions {
    #[serde(default)]
    pub options: Vec<CharacteristicOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Characteristic {
    pub choose: u32,
    pub from: CharacteristicOptions,
}

impl Characteristic {
    pub fn labels(&self) -> Vec<String> {
        self.from
            .options
            .iter()
            .filter_map(CharacteristicOption::label)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundFeature {
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Background {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub starting_proficiencies: Vec<ApiReference>,
    #[serde(default)]
    pub starting_equipment: Vec<EquipmentGrant>,
    #[serde(default)]
    pub starting_equipment_options: Vec<EquipmentOption>,
    #[serde(default)]
    pub feature: Option<BackgroundFeature>,
    #[serde(default)]
    pub personality_traits: Option<Characteristic>,
    #[serde(default)]
    pub ideals: Option<Characteristic>,
    #[serde(default)]
    pub bonds: Option<Characteristic>,
    #[serde(default)]
    pub flaws: Option<Characteristic>,
}

impl Background {
    pub fn equipment_labels(&self) -> Vec<String> {
        self.starting_equipment
            .iter()
            .map(|grant| grant.equipment.name.clone())
            .chain(
                self.starting_equipment_options
                    .iter()
                    .filter_map(EquipmentOption::label),
            )
            .collect()
    }

    /// The four suggested characteristic tables that are present, in book order.
    pub fn characteristics(&self) -> Vec<(&'static str, &Characteristic)> {
        [
            ("Personality Traits", &self.personality_traits),
            ("Ideals", &self.ideals),
            ("Bonds", &self.bonds),
            ("Flaws", &self.flaws),
        ]
        .into_iter()
        .filter_map(|(label, table)| table.as_ref().map(|t| (label, t)))
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProficiencyOption {
    #[serde(default)]
    pub item: Option<ApiReference>,
    #[serde(default)]
    pub choice: Option<Box<ProficiencyChoice>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProficiencyOptions {
    #[serde(default)]
    pub options: Vec<ProficiencyOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProficiencyChoice {
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub choose: u32,
    pub from: ProficiencyOptions,
}

impl ProficiencyChoice {
    pub fn item_names(&self) -> Vec<&str> {
        self.from
            .options
            .iter()
            .filter_map(|o| o.item.as_ref())
            .map(|item| item.name.as_str())
            .collect()
    }

    pub fn nested_choices(&self) -> impl Iterator<Item = &ProficiencyChoice> {
        self.from.options.iter().filter_map(|o| o.choice.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpellcastingInfo {
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassSpellcasting {
    #[serde(default)]
    pub info: Vec<SpellcastingInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterClass {
    pub index: String,
    pub name: String,
    pub hit_die: u32,
    #[serde(default)]
    pub proficiency_choices: Vec<ProficiencyChoice>,
    #[serde(default)]
    pub proficiencies: Vec<ApiReference>,
    #[serde(default)]
    pub saving_throws: Vec<ApiReference>,
    #[serde(default)]
    pub starting_equipment: Vec<EquipmentGrant>,
    #[serde(default)]
    pub starting_equipment_options: Vec<EquipmentOption>,
    #[serde(default)]
    pub subclasses: Vec<ApiReference>,
    #[serde(default)]
    pub spellcasting: Option<ClassSpellcasting>,
}

impl CharacterClass {
    /// One bullet for the fixed kit, then one per equipment choice.
    pub fn equipment_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.starting_equipment.is_empty() {
            lines.push(
                self.starting_equipment
                    .iter()
                    .map(EquipmentGrant::label)
                    .collect::<Vec<_>>()
                    .join(" - "),
            );
        }
        lines.extend(
            self.starting_equipment_options
                .iter()
                .filter_map(EquipmentOption::label),
        );
        lines
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassFeature {
    pub index: String,
    pub name: String,
    pub level: u32,
    pub class: ApiReference,
    #[serde(default)]
    pub subclass: Option<ApiReference>,
    #[serde(default)]
    pub desc: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassLevel {
    pub level: u32,
    #[serde(default)]
    pub prof_bonus: Option<i64>,
    pub class: ApiReference,
    #[serde(default)]
    pub subclass: Option<ApiReference>,
    #[serde(default)]
    pub spellcasting: IndexMap<String, Value>,
    #[serde(default)]
    pub class_specific: IndexMap<String, Value>,
}

/// Renders a class-specific level value: numbers as-is, dice as `"1d6"`.
pub fn level_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(_) | Value::String(_) => Some(format_scalar(value)),
        Value::Object(map) => {
            let count = map.get("dice_count")?;
            let sides = map.get("dice_value")?;
            Some(format!("{}d{}", format_scalar(count), format_scalar(sides)))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subclass {
    pub index: String,
    pub name: String,
    pub class: ApiReference,
    #[serde(default)]
    pub subclass_flavor: Option<String>,
    #[serde(default)]
    pub desc: Vec<String>,
}

// ---------------------------------------------------------------------------
// Races
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AbilityBonus {
    pub ability_score: ApiReference,
    pub bonus: i64,
}

impl AbilityBonus {
    /// `"+2 CON"`.
    pub fn label(&self) -> String {
        format!("+{} {}", self.bonus, self.ability_score.name)
    }
}

fn bonus_line(bonuses: &[AbilityBonus]) -> String {
    bonuses
        .iter()
        .map(AbilityBonus::label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Deserialize)]
pub struct Race {
    pub index: String,
    pub name: String,
    pub speed: i64,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub age: String,
    pub size: String,
    #[serde(default)]
    pub size_description: String,
    #[serde(default)]
    pub languages: Vec<ApiReference>,
    #[serde(default)]
    pub language_desc: String,
    #[serde(default)]
    pub traits: Vec<ApiReference>,
    #[serde(default)]
    pub subraces: Vec<ApiReference>,
}

impl Race {
    pub fn ability_bonus_labels(&self) -> Vec<String> {
        self.ability_bonuses.iter().map(AbilityBonus::label).collect()
    }

    pub fn ability_bonus_line(&self) -> String {
        bonus_line(&self.ability_bonuses)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RacialTrait {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Text,
    #[serde(default)]
    pub parent: Option<ApiReference>,
    #[serde(default)]
    pub trait_specific: Option<Value>,
}

impl RacialTrait {
    /// `"**Darkvision.** You can see in dim light..."`.
    pub fn paragraph(&self) -> String {
        format!("**{}.** {}", self.name, self.desc.joined(" "))
    }

    /// `[dragon, damage type, breath weapon]` for a draconic ancestry choice.
    pub fn ancestry_row(&self) -> Option<[String; 3]> {
        let specific = self.trait_specific.as_ref()?;
        let damage = specific.pointer("/damage_type/name")?.as_str()?;
        let breath = specific.get("breath_weapon")?;
        let size = breath.pointer("/area_of_effect/size").map(format_scalar)?;
        let shape = breath.pointer("/area_of_effect/type")?.as_str()?;
        let save = breath.pointer("/dc/dc_type/name")?.as_str()?;
        Some([
            self.name.clone(),
            damage.to_string(),
            format!("{} ft. {} ({}. save)", size, shape, capitalize(save)),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subrace {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub racial_traits: Vec<ApiReference>,
}

impl Subrace {
    pub fn ability_bonus_line(&self) -> Option<String> {
        (!self.ability_bonuses.is_empty()).then(|| bonus_line(&self.ability_bonuses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::adapt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_ideals_carry_alignment() {
        let option: CharacteristicOption = serde_json::from_value(json!({
            "option_type": "ideal",
            "desc": "Tradition. The ancient traditions must be preserved.",
            "alignments": [{"index": "lawful-good", "name": "Lawful Good"}]
        }))
        .unwrap();
        assert_eq!(
            option.label().as_deref(),
            Some("Tradition. The ancient traditions must be preserved. - Lawful Good")
        );
    }

    #[test]
    fn test_nested_proficiency_choices() {
        let choice: ProficiencyChoice = serde_json::from_value(json!({
            "desc": "Choose three musical instruments",
            "choose": 1,
            "type": "proficiencies",
            "from": {"option_set_type": "options_array", "options": [
                {"option_type": "reference", "item": {"index": "skill-acrobatics", "name": "Skill: Acrobatics"}},
                {"option_type": "choice", "choice": {
                    "desc": "musical instrument",
                    "choose": 3,
                    "from": {"options": [
                        {"option_type": "reference", "item": {"index": "lute", "name": "Lute"}}
                    ]}
                }}
            ]}
        }))
        .unwrap();
        assert_eq!(choice.item_names(), vec!["Skill: Acrobatics"]);
        let nested: Vec<_> = choice.nested_choices().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].item_names(), vec!["Lute"]);
    }

    #[test]
    fn test_level_values() {
        assert_eq!(level_value(&json!(3)).as_deref(), Some("3"));
        assert_eq!(
            level_value(&json!({"dice_count": 2, "dice_value": 6})).as_deref(),
            Some("2d6")
        );
        assert_eq!(level_value(&json!([1, 2])), None);
    }

    #[test]
    fn test_draconic_ancestry_row() {
        let ancestry: RacialTrait = adapt(&json!({
            "index": "draconic-ancestry-red",
            "name": "Draconic Ancestry (Red)",
            "desc": ["You have red dragon ancestry."],
            "parent": {"index": "draconic-ancestry", "name": "Draconic Ancestry"},
            "trait_specific": {
                "damage_type": {"index": "fire", "name": "Fire"},
                "breath_weapon": {
                    "area_of_effect": {"size": 15, "type": "cone"},
                    "dc": {"dc_type": {"index": "dex", "name": "DEX"}}
                }
            }
        }))
        .unwrap();
        assert_eq!(
            ancestry.ancestry_row(),
            Some([
                "Draconic Ancestry (Red)".to_string(),
                "Fire".to_string(),
                "15 ft. cone (Dex. save)".to_string(),
            ])
        );
    }
}
