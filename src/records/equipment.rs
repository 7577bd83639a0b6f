// src/records/equipment.rs
//! Weapons, armor and adventuring gear share one record shape.

use super::{capitalize, format_number, ApiReference};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentKind {
    Weapon,
    Armor,
    Gear,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cost {
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Damage {
    #[serde(default)]
    pub damage_dice: Option<String>,
    #[serde(default)]
    pub damage_type: Option<ApiReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reach {
    pub normal: i64,
    #[serde(default)]
    pub long: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArmorClass {
    pub base: i64,
    #[serde(default)]
    pub dex_bonus: bool,
    #[serde(default)]
    pub max_bonus: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quantity {
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub item: ApiReference,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Equipment {
    pub index: String,
    pub name: String,
    pub equipment_category: ApiReference,
    #[serde(default)]
    pub weapon_category: Option<String>,
    #[serde(default)]
    pub category_range: Option<String>,
    #[serde(default)]
    pub cost: Option<Cost>,
    #[serde(default)]
    pub damage: Option<Damage>,
    #[serde(default)]
    pub two_handed_damage: Option<Damage>,
    #[serde(default)]
    pub range: Option<Reach>,
    #[serde(default)]
    pub throw_range: Option<Reach>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub properties: Vec<ApiReference>,
    #[serde(default)]
    pub special: Vec<String>,
    #[serde(default)]
    pub desc: Vec<String>,
    #[serde(default)]
    pub armor_category: Option<String>,
    #[serde(default)]
    pub armor_class: Option<ArmorClass>,
    #[serde(default)]
    pub str_minimum: Option<i64>,
    #[serde(default)]
    pub stealth_disadvantage: bool,
    #[serde(default)]
    pub gear_category: Option<ApiReference>,
    #[serde(default)]
    pub tool_category: Option<String>,
    #[serde(default)]
    pub vehicle_category: Option<String>,
    #[serde(default)]
    pub speed: Option<Quantity>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub contents: Vec<ContentEntry>,
}

impl Equipment {
    pub fn kind(&self) -> EquipmentKind {
        match self.equipment_category.index.as_str() {
            "weapon" => EquipmentKind::Weapon,
            "armor" => EquipmentKind::Armor,
            _ => EquipmentKind::Gear,
        }
    }

    /// `"{quantity} {unit}"`, with `Unknown` standing in for either half.
    pub fn cost_text(&self) -> String {
        let quantity = self
            .cost
            .as_ref()
            .and_then(|c| c.quantity)
            .map(format_number)
            .unwrap_or_else(|| "Unknown".to_string());
        let unit = self
            .cost
            .as_ref()
            .and_then(|c| c.unit.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        format!("{} {}", quantity, unit)
    }

    /// The one-handed damage dice, or `"0"` when the item deals no damage.
    pub fn damage_dice(&self) -> String {
        self.damage
            .as_ref()
            .and_then(|d| d.damage_dice.clone())
            .unwrap_or_else(|| "0".to_string())
    }

    pub fn two_handed_damage_dice(&self) -> Option<&str> {
        self.two_handed_damage
            .as_ref()
            .and_then(|d| d.damage_dice.as_deref())
    }

    /// Damage type display name, e.g. `"Slashing"`.
    pub fn damage_type(&self) -> Option<String> {
        self.damage
            .as_ref()
            .and_then(|d| d.damage_type.as_ref())
            .map(|t| capitalize(&t.index))
    }

    /// `"Normal - 20\nLong - 60"`; the long line is dropped for melee reach.
    pub fn range_text(&self) -> Option<String> {
        self.range.as_ref().map(|range| match range.long {
            Some(long) => format!("Normal - {}\nLong - {}", range.normal, long),
            None => format!("Normal - {}", range.normal),
        })
    }

    /// `"20 - 60"` for thrown weapons.
    pub fn thrown_range_text(&self) -> Option<String> {
        self.throw_range.as_ref().map(|range| match range.long {
            Some(long) => format!("{} - {}", range.normal, long),
            None => range.normal.to_string(),
        })
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// `"11"`, `"12 + Dex Modifier"` or `"14 + Dex Modifier (Max 2)"`.
    pub fn armor_class_text(&self) -> String {
        match &self.armor_class {
            Some(ArmorClass {
                base,
                dex_bonus: true,
                max_bonus: Some(max),
            }) => format!("{} + Dex Modifier (Max {})", base, max),
            Some(ArmorClass {
                base,
                dex_bonus: true,
                max_bonus: None,
            }) => format!("{} + Dex Modifier", base),
            Some(ArmorClass { base, .. }) => base.to_string(),
            None => "0".to_string(),
        }
    }

    /// `"Light Armor"`, `"Heavy Armor"`, or `"Shield"`.
    pub fn armor_type(&self) -> Option<String> {
        self.armor_category.as_deref().map(|category| {
            if category.eq_ignore_ascii_case("shield") {
                "Shield".to_string()
            } else {
                format!("{} Armor", capitalize(category))
            }
        })
    }

    pub fn strength_requirement(&self) -> i64 {
        self.str_minimum.unwrap_or(0)
    }

    /// `"3 lbs"`, or `None` when the record carries no weight.
    pub fn weight_text(&self) -> Option<String> {
        self.weight.map(|w| format!("{} lbs", format_number(w)))
    }

    /// The sub-category shown for gear: tool kind, vehicle kind or gear group.
    pub fn gear_category_name(&self) -> Option<String> {
        match self.equipment_category.name.as_str() {
            "Tools" => self.tool_category.clone(),
            "Mounts and Vehicles" => self.vehicle_category.as_ref().map(|v| v.replace(',', " -")),
            "Adventuring Gear" => self.gear_category.as_ref().map(|g| g.name.clone()),
            _ => None,
        }
    }

    /// `"60 ft./round"` for mounts and vehicles.
    pub fn speed_text(&self) -> Option<String> {
        self.speed
            .as_ref()
            .map(|s| format!("{} {}", format_number(s.quantity), s.unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::adapt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn longsword() -> Equipment {
        adapt(&json!({
            "index": "longsword",
            "name": "Longsword",
            "equipment_category": {"index": "weapon", "name": "Weapon"},
            "weapon_category": "Martial",
            "category_range": "Martial Melee",
            "cost": {"quantity": 15, "unit": "gp"},
            "damage": {"damage_dice": "1d8", "damage_type": {"index": "slashing", "name": "Slashing"}},
            "two_handed_damage": {"damage_dice": "1d10", "damage_type": {"index": "slashing", "name": "Slashing"}},
            "range": {"normal": 5},
            "weight": 3,
            "properties": [{"index": "versatile", "name": "Versatile"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_weapon_fields() {
        let sword = longsword();
        assert_eq!(sword.kind(), EquipmentKind::Weapon);
        assert_eq!(sword.cost_text(), "15 gp");
        assert_eq!(sword.damage_dice(), "1d8");
        assert_eq!(sword.two_handed_damage_dice(), Some("1d10"));
        assert_eq!(sword.damage_type().as_deref(), Some("Slashing"));
        assert_eq!(sword.range_text().as_deref(), Some("Normal - 5"));
        assert_eq!(sword.weight_text().as_deref(), Some("3 lbs"));
        assert_eq!(sword.property_names(), vec!["Versatile"]);
    }

    #[test]
    fn test_missing_cost_and_damage_use_sentinels() {
        let rope: Equipment = adapt(&json!({
            "index": "rope",
            "name": "Rope",
            "equipment_category": {"index": "adventuring-gear", "name": "Adventuring Gear"},
            "gear_category": {"index": "standard-gear", "name": "Standard Gear"}
        }))
        .unwrap();
        assert_eq!(rope.kind(), EquipmentKind::Gear);
        assert_eq!(rope.cost_text(), "Unknown Unknown");
        assert_eq!(rope.damage_dice(), "0");
        assert_eq!(rope.gear_category_name().as_deref(), Some("Standard Gear"));
        assert_eq!(rope.weight_text(), None);
    }

    #[test]
    fn test_armor_class_text() {
        let armor = |ac: serde_json::Value| -> Equipment {
            adapt(&json!({
                "index": "test",
                "name": "Test",
                "equipment_category": {"index": "armor", "name": "Armor"},
                "armor_category": "Medium",
                "armor_class": ac
            }))
            .unwrap()
        };
        assert_eq!(
            armor(json!({"base": 14, "dex_bonus": true, "max_bonus": 2})).armor_class_text(),
            "14 + Dex Modifier (Max 2)"
        );
        assert_eq!(
            armor(json!({"base": 11, "dex_bonus": true})).armor_class_text(),
            "11 + Dex Modifier"
        );
        assert_eq!(
            armor(json!({"base": 18, "dex_bonus": false})).armor_class_text(),
            "18"
        );
        assert_eq!(
            armor(json!({"base": 2})).armor_type().as_deref(),
            Some("Medium Armor")
        );
    }

    #[test]
    fn test_vehicle_category_drops_commas() {
        let cart: Equipment = adapt(&json!({
            "index": "cart",
            "name": "Cart",
            "equipment_category": {"index": "mounts-and-vehicles", "name": "Mounts and Vehicles"},
            "vehicle_category": "Tack, Harness, and Drawn Vehicles"
        }))
        .unwrap();
        assert_eq!(
            cart.gear_category_name().as_deref(),
            Some("Tack - Harness - and Drawn Vehicles")
        );
    }
}
