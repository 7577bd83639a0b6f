// src/builders/equipment.rs
//! Weapons, armor and adventuring gear. All three read the shared equipment
//! file and keep only their own category.

use super::mentions::split_mentions;
use super::options::DAMAGE_TYPES;
use super::{reference_url, titled, RecordBuilder};
use crate::model::{
    OptionSet, PageBody, PendingRelation, PropertyKind, PropertySet, PropertyValue, RichText,
    SchemaDefinition, TableBlock,
};
use crate::records::Equipment;
use crate::types::{PropertyName, ValidationError};
use serde_json::Value;

const CONTAINS: &str = "Contains";
const CONTAINED_IN: &str = "Contained In";
const MISSING: &str = " -- ";

fn category_index(raw: &Value) -> Option<&str> {
    raw.get("equipment_category")
        .and_then(|c| c.get("index"))
        .and_then(Value::as_str)
}

/// A headers-only table summarising the item at a glance.
fn header_table(first: String, record: &Equipment) -> TableBlock {
    TableBlock::new(&[
        first,
        format!("Cost: {}", record.cost_text()),
        format!(
            "Weight: {}",
            record.weight_text().unwrap_or_else(|| MISSING.to_string())
        ),
    ])
}

#[derive(Debug, Clone, Default)]
pub struct WeaponBuilder;

impl RecordBuilder for WeaponBuilder {
    type Record = Equipment;

    fn label(&self) -> &'static str {
        "Weapons"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Weapons")
            .property("URL", PropertyKind::Url)
            .property("Category", PropertyKind::Select(OptionSet::of(&["Weapon"])))
            .property("Cost", PropertyKind::RichText)
            .property("Range", PropertyKind::RichText)
            .property("Range - Thrown", PropertyKind::RichText)
            .property(
                "Type",
                PropertyKind::MultiSelect(OptionSet::of(&[
                    "Simple Melee",
                    "Simple Ranged",
                    "Martial Melee",
                    "Martial Ranged",
                ])),
            )
            .property("Damage", PropertyKind::RichText)
            .property(
                "Damage Type",
                PropertyKind::MultiSelect(OptionSet::of(&DAMAGE_TYPES)),
            )
            .property("Damage - Two Handed", PropertyKind::RichText)
            .property(
                "Properties",
                PropertyKind::MultiSelect(OptionSet::of(&[
                    "Ammunition",
                    "Finesse",
                    "Heavy",
                    "Light",
                    "Loading",
                    "Monk",
                    "Reach",
                    "Special",
                    "Thrown",
                    "Two-Handed",
                    "Versatile",
                ])),
            )
            .property("Weight", PropertyKind::RichText)
    }

    fn includes(&self, raw: &Value) -> bool {
        category_index(raw) == Some("weapon")
    }

    fn name(&self, record: &Equipment) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Equipment) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("URL", reference_url("equipment", &record.index)?)
            .with("Category", PropertyValue::select(&record.equipment_category.name))
            .with("Cost", PropertyValue::text(record.cost_text()))
            .with_opt("Range", record.range_text().map(PropertyValue::text))
            .with_opt(
                "Range - Thrown",
                record.thrown_range_text().map(PropertyValue::text),
            )
            .with_opt(
                "Type",
                record
                    .category_range
                    .as_deref()
                    .map(|range| PropertyValue::multi_select([range])),
            )
            .with("Damage", PropertyValue::text(record.damage_dice()))
            .with_opt(
                "Damage Type",
                record
                    .damage_type()
                    .map(|kind| PropertyValue::multi_select([kind])),
            )
            .with_opt(
                "Damage - Two Handed",
                record.two_handed_damage_dice().map(PropertyValue::text),
            )
            .with(
                "Properties",
                PropertyValue::multi_select(record.property_names()),
            )
            .with_opt("Weight", record.weight_text().map(PropertyValue::text)))
    }

    fn body(&self, record: &Equipment) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        let kind = record.category_range.as_deref().unwrap_or(MISSING);
        body.table(header_table(format!("Type: {}", kind), record))
            .divider();

        if !record.special.is_empty() {
            body.paragraphs(&record.special).divider();
        }

        let names = record.property_names();
        let mut stats = TableBlock::new(&["Name", "Cost", "Damage", "Weight", "Properties", "Range"]);
        stats.push_row(vec![
            vec![RichText::plain(&record.name)],
            vec![RichText::plain(record.cost_text())],
            vec![RichText::plain(record.damage_dice())],
            vec![RichText::plain(
                record.weight_text().unwrap_or_else(|| MISSING.to_string()),
            )],
            split_mentions(&names.join(" - "), &names, Some("Weapon Properties")),
            vec![RichText::plain(
                record.range_text().unwrap_or_else(|| MISSING.to_string()),
            )],
        ])?;
        body.table(stats);
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArmorBuilder;

impl RecordBuilder for ArmorBuilder {
    type Record = Equipment;

    fn label(&self) -> &'static str {
        "Armors"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Armors")
            .property("URL", PropertyKind::Url)
            .property("Category", PropertyKind::Select(OptionSet::of(&["Armor"])))
            .property("Cost", PropertyKind::RichText)
            .property("Weight", PropertyKind::RichText)
            .property(
                "Type",
                PropertyKind::MultiSelect(OptionSet::of(&[
                    "Light Armor",
                    "Medium Armor",
                    "Heavy Armor",
                    "Shield",
                ])),
            )
            .property("Armor Class", PropertyKind::RichText)
            .property("Strength Requirement", PropertyKind::Number)
            .property("Stealth Disadvantage", PropertyKind::Checkbox)
    }

    fn includes(&self, raw: &Value) -> bool {
        category_index(raw) == Some("armor")
    }

    fn name(&self, record: &Equipment) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Equipment) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("URL", reference_url("equipment", &record.index)?)
            .with("Category", PropertyValue::select(&record.equipment_category.name))
            .with("Cost", PropertyValue::text(record.cost_text()))
            .with_opt("Weight", record.weight_text().map(PropertyValue::text))
            .with_opt(
                "Type",
                record
                    .armor_type()
                    .map(|kind| PropertyValue::multi_select([kind])),
            )
            .with("Armor Class", PropertyValue::text(record.armor_class_text()))
            .with(
                "Strength Requirement",
                PropertyValue::Number(Some(record.strength_requirement() as f64)),
            )
            .with(
                "Stealth Disadvantage",
                PropertyValue::Checkbox(record.stealth_disadvantage),
            ))
    }

    fn body(&self, record: &Equipment) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        let kind = record.armor_type().unwrap_or_else(|| MISSING.to_string());
        body.table(header_table(format!("Type: {}", kind), record))
            .divider();

        let strength = match record.strength_requirement() {
            0 => MISSING.to_string(),
            minimum => minimum.to_string(),
        };
        let stealth = if record.stealth_disadvantage {
            "Disadvantage"
        } else {
            MISSING
        };
        let mut stats = TableBlock::new(&[
            "Name",
            "Cost",
            "Armor Class",
            "Strength",
            "Stealth",
            "Weight",
        ]);
        stats.push_text_row(&[
            record.name.clone(),
            record.cost_text(),
            record.armor_class_text(),
            strength,
            stealth.to_string(),
            record.weight_text().unwrap_or_else(|| MISSING.to_string()),
        ])?;
        body.table(stats);
        Ok(body)
    }
}

/// Adventuring gear, tools, mounts and vehicles. Packs list their contents
/// and ask for `Contains`/`Contained In` relations to the contained items.
#[derive(Debug, Clone, Default)]
pub struct ItemBuilder;

impl RecordBuilder for ItemBuilder {
    type Record = Equipment;

    fn label(&self) -> &'static str {
        "Items"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Items")
            .property("URL", PropertyKind::Url)
            .property(
                "Category",
                PropertyKind::Select(OptionSet::of(&[
                    "Adventuring Gear",
                    "Tools",
                    "Mounts and Vehicles",
                ])),
            )
            .property(
                "Gear Category",
                PropertyKind::Select(OptionSet::of(&[
                    "Standard Gear",
                    "Ammunition",
                    "Arcane Foci",
                    "Druidic Foci",
                    "Holy Symbols",
                    "Equipment Packs",
                    "Kits",
                    "Artisan's Tools",
                    "Gaming Sets",
                    "Musical Instrument",
                    "Other Tools",
                    "Mounts and Other Animals",
                    "Tack, Harness, and Drawn Vehicles",
                    "Waterborne Vehicles",
                ])),
            )
            .property("Cost", PropertyKind::RichText)
            .property("Weight", PropertyKind::Number)
            .property(CONTAINS, PropertyKind::Relation)
            .property(CONTAINED_IN, PropertyKind::Relation)
    }

    fn includes(&self, raw: &Value) -> bool {
        !matches!(category_index(raw), Some("weapon") | Some("armor"))
    }

    fn name(&self, record: &Equipment) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Equipment) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("URL", reference_url("equipment", &record.index)?)
            .with("Category", PropertyValue::select(&record.equipment_category.name))
            .with_opt(
                "Gear Category",
                record.gear_category_name().map(PropertyValue::select),
            )
            .with("Cost", PropertyValue::text(record.cost_text()))
            .with("Weight", PropertyValue::Number(record.weight)))
    }

    fn body(&self, record: &Equipment) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);

        let mut header = vec![
            format!("Type: {}", record.equipment_category.name),
            format!("Cost: {}", record.cost_text()),
            format!(
                "Weight: {}",
                record.weight_text().unwrap_or_else(|| MISSING.to_string())
            ),
        ];
        if let Some(speed) = record.speed_text() {
            header.push(format!("Speed: {}", speed));
        }
        if let Some(capacity) = &record.capacity {
            header.push(format!("Carry Weight: {}", capacity));
        }
        body.table(TableBlock::new(&header));

        if !record.desc.is_empty() {
            body.divider().paragraphs(&record.desc);
        }

        if !record.contents.is_empty() {
            body.divider();
            for content in &record.contents {
                body.rich_paragraph(vec![
                    RichText::plain(format!("{} x ", content.quantity)),
                    RichText::pending(&content.item.name, Some("Items")),
                ])
                .relate(PendingRelation {
                    target_name: content.item.name.clone(),
                    forward: PropertyName::new(CONTAINS),
                    back: PropertyName::new(CONTAINED_IN),
                });
            }
        }
        Ok(body)
    }
}
