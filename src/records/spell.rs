// src/records/spell.rs
use super::{capitalize, ApiReference};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SpellDamage {
    #[serde(default)]
    pub damage_type: Option<ApiReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpellDc {
    pub dc_type: ApiReference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaOfEffect {
    #[serde(rename = "type")]
    pub shape: String,
    pub size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Spell {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
    #[serde(default)]
    pub higher_level: Vec<String>,
    pub range: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub ritual: bool,
    pub duration: String,
    #[serde(default)]
    pub concentration: bool,
    pub casting_time: String,
    pub level: u8,
    #[serde(default)]
    pub attack_type: Option<String>,
    #[serde(default)]
    pub damage: Option<SpellDamage>,
    #[serde(default)]
    pub dc: Option<SpellDc>,
    #[serde(default)]
    pub area_of_effect: Option<AreaOfEffect>,
    pub school: ApiReference,
    #[serde(default)]
    pub classes: Vec<ApiReference>,
    #[serde(default)]
    pub subclasses: Vec<ApiReference>,
}

impl Spell {
    /// `"Cantrip"` for level 0, otherwise the digit.
    pub fn level_label(&self) -> String {
        match self.level {
            0 => "Cantrip".to_string(),
            n => n.to_string(),
        }
    }

    /// `"Self (15 ft. Cone)"` when the spell has an area, otherwise the plain range.
    pub fn range_area(&self) -> String {
        match &self.area_of_effect {
            Some(area) => format!("{} ({} ft. {})", self.range, area.size, capitalize(&area.shape)),
            None => self.range.clone(),
        }
    }

    /// `"V, S, M *"`; the asterisk points at the material note.
    pub fn components_text(&self) -> String {
        let joined = self.components.join(", ");
        if self.material.is_some() {
            format!("{} *", joined)
        } else {
            joined
        }
    }

    /// `"Ranged"`, `"Dexterity Save"`, or `"None"`.
    pub fn attack_or_save(&self) -> String {
        if let Some(attack) = &self.attack_type {
            return capitalize(attack);
        }
        match &self.dc {
            Some(dc) => format!("{} Save", dc.dc_type.name),
            None => "None".to_string(),
        }
    }

    pub fn damage_type(&self) -> Option<String> {
        self.damage
            .as_ref()
            .and_then(|d| d.damage_type.as_ref())
            .map(|t| capitalize(&t.name))
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn subclass_names(&self) -> Vec<&str> {
        self.subclasses.iter().map(|c| c.name.as_str()).collect()
    }
}
