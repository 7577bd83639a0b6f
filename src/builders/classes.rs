// src/builders/classes.rs
//! Class pages: proficiencies, equipment, the level table, spellcasting,
//! features and subclasses. Features, levels and subclasses come from
//! companion files loaded when the builder is made.

use super::options::SUBCLASSES;
use super::{adapt_all, RecordBuilder};
use crate::model::{
    Block, HeadingLevel, OptionSet, PageBody, PropertyKind, PropertySet, PropertyValue,
    RichText, SchemaDefinition, TableBlock,
};
use crate::records::{
    capitalize, level_value, ordinal, title_case, CharacterClass, ClassFeature, ClassLevel,
    Subclass,
};
use crate::types::ValidationError;
use indexmap::IndexMap;
use serde_json::Value;

const EXPAND: &str = "Click to Expand...";
const EMPTY_CELL: &str = " - ";
const SPELLCASTING_FEATURE_PREFIX: &str = "spellcasting-";

/// Spellcasting level keys that become table columns, with their headers.
const SPELLCASTING_COLUMNS: [(&str, &str); 11] = [
    ("cantrips_known", "Cantrips Known"),
    ("spells_known", "Spells Known"),
    ("spell_slots_level_1", "1st"),
    ("spell_slots_level_2", "2nd"),
    ("spell_slots_level_3", "3rd"),
    ("spell_slots_level_4", "4th"),
    ("spell_slots_level_5", "5th"),
    ("spell_slots_level_6", "6th"),
    ("spell_slots_level_7", "7th"),
    ("spell_slots_level_8", "8th"),
    ("spell_slots_level_9", "9th"),
];

fn mention_paragraph(name: &str, category: &str) -> Block {
    Block::Paragraph(vec![RichText::pending(name, Some(category))])
}

fn is_nonzero(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n != 0.0)
}

#[derive(Debug, Clone, Default)]
pub struct ClassBuilder {
    features: Vec<ClassFeature>,
    levels: Vec<ClassLevel>,
    subclasses: Vec<Subclass>,
}

impl ClassBuilder {
    pub fn new(
        features: Vec<ClassFeature>,
        levels: Vec<ClassLevel>,
        subclasses: Vec<Subclass>,
    ) -> Self {
        Self {
            features,
            levels,
            subclasses,
        }
    }

    /// Builds from the raw feature, level and subclass files.
    pub fn from_companions(features: &[Value], levels: &[Value], subclasses: &[Value]) -> Self {
        Self::new(
            adapt_all(features, "class feature"),
            adapt_all(levels, "class level"),
            adapt_all(subclasses, "subclass"),
        )
    }

    fn features_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a ClassFeature> {
        self.features
            .iter()
            .filter(move |f| f.class.name.eq_ignore_ascii_case(class))
    }

    fn base_levels(&self, class: &str) -> Vec<&ClassLevel> {
        let mut levels: Vec<&ClassLevel> = self
            .levels
            .iter()
            .filter(|l| l.class.name.eq_ignore_ascii_case(class) && l.subclass.is_none())
            .collect();
        levels.sort_by_key(|l| l.level);
        levels
    }

    fn proficiencies(&self, record: &CharacterClass, body: &mut PageBody) {
        body.heading(HeadingLevel::Three, "Proficiencies");
        let mentions: Vec<Block> = record
            .proficiencies
            .iter()
            .map(|p| mention_paragraph(&p.name, "Proficiencies"))
            .collect();
        if !mentions.is_empty() {
            body.push(Block::toggle(EXPAND, mentions));
        }

        for choice in &record.proficiency_choices {
            body.heading(
                HeadingLevel::Three,
                choice.desc.clone().unwrap_or_default(),
            );
            for nested in choice.nested_choices() {
                body.heading(
                    HeadingLevel::Three,
                    capitalize(nested.desc.as_deref().unwrap_or_default()),
                );
                let items: Vec<Block> = nested
                    .item_names()
                    .into_iter()
                    .map(|name| mention_paragraph(name, "Items"))
                    .collect();
                if !items.is_empty() {
                    body.push(Block::toggle(EXPAND, items));
                }
            }
            let items: Vec<Block> = choice
                .item_names()
                .into_iter()
                .map(|name| {
                    let category = if name.starts_with("Skill: ") {
                        "Proficiencies"
                    } else {
                        "Items"
                    };
                    mention_paragraph(name, category)
                })
                .collect();
            if !items.is_empty() {
                body.push(Block::toggle(EXPAND, items));
            }
        }
    }

    /// Level, proficiency bonus, features, then whatever per-level counters
    /// the class tracks.
    fn level_table(&self, record: &CharacterClass) -> Result<Option<TableBlock>, ValidationError> {
        let levels = self.base_levels(&record.name);
        if levels.is_empty() {
            return Ok(None);
        }

        let mut specific: IndexMap<&str, String> = IndexMap::new();
        for level in &levels {
            for (key, value) in &level.class_specific {
                if level_value(value).is_some() && !specific.contains_key(key.as_str()) {
                    specific.insert(key.as_str(), title_case(key));
                }
            }
        }
        let casting: Vec<(&str, &str)> = SPELLCASTING_COLUMNS
            .iter()
            .copied()
            .filter(|(key, _)| {
                levels
                    .iter()
                    .any(|l| l.spellcasting.get(*key).is_some_and(is_nonzero))
            })
            .collect();

        let mut header = vec![
            "Level".to_string(),
            "Proficiency Bonus".to_string(),
            "Features".to_string(),
        ];
        header.extend(specific.values().cloned());
        header.extend(casting.iter().map(|(_, title)| title.to_string()));
        let mut table = TableBlock::new(&header);

        for level in levels {
            let features: Vec<&str> = self
                .features_of(&record.name)
                .filter(|f| f.subclass.is_none() && f.level == level.level)
                .map(|f| f.name.as_str())
                .collect();
            let mut row = vec![
                ordinal(level.level),
                level
                    .prof_bonus
                    .map(|bonus| format!("+{}", bonus))
                    .unwrap_or_else(|| EMPTY_CELL.to_string()),
                if features.is_empty() {
                    EMPTY_CELL.to_string()
                } else {
                    features.join(", ")
                },
            ];
            for key in specific.keys() {
                row.push(
                    level
                        .class_specific
                        .get(*key)
                        .and_then(level_value)
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                );
            }
            for (key, _) in &casting {
                row.push(match level.spellcasting.get(*key) {
                    Some(value) if is_nonzero(value) => level_value(value)
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                    _ => EMPTY_CELL.to_string(),
                });
            }
            table.push_text_row(&row)?;
        }
        Ok(Some(table))
    }

    fn spellcasting(&self, record: &CharacterClass, body: &mut PageBody) {
        let Some(spellcasting) = &record.spellcasting else {
            return;
        };
        body.heading(HeadingLevel::One, "Spellcasting");
        for feature in self
            .features_of(&record.name)
            .filter(|f| f.index.starts_with(SPELLCASTING_FEATURE_PREFIX))
        {
            body.paragraphs(&feature.desc);
        }
        body.divider();
        for info in &spellcasting.info {
            body.heading(HeadingLevel::Three, &info.name)
                .paragraphs(&info.desc);
        }
    }

    fn features_and_subclasses(&self, record: &CharacterClass, body: &mut PageBody) {
        for feature in self.features_of(&record.name).filter(|f| {
            f.subclass.is_none() && !f.index.starts_with(SPELLCASTING_FEATURE_PREFIX)
        }) {
            body.heading(HeadingLevel::Two, &feature.name)
                .paragraph(format!("Level: {}", feature.level))
                .divider()
                .paragraphs(&feature.desc);
        }

        for subclass in self
            .subclasses
            .iter()
            .filter(|s| s.class.name.eq_ignore_ascii_case(&record.name))
        {
            body.heading(HeadingLevel::One, &subclass.name)
                .divider()
                .paragraphs(&subclass.desc);
            for feature in self.features_of(&record.name).filter(|f| {
                f.subclass
                    .as_ref()
                    .is_some_and(|s| s.name.eq_ignore_ascii_case(&subclass.name))
            }) {
                body.heading(HeadingLevel::Two, &feature.name)
                    .paragraph(format!("Level: {}", feature.level))
                    .paragraphs(&feature.desc);
            }
        }
    }
}

impl RecordBuilder for ClassBuilder {
    type Record = CharacterClass;

    fn label(&self) -> &'static str {
        "Classes"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::with_title_property("Classes", "Class")
            .property("Hit Die", PropertyKind::RichText)
            .property(
                "Subclass",
                PropertyKind::MultiSelect(OptionSet::of(&SUBCLASSES)),
            )
    }

    fn name(&self, record: &CharacterClass) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &CharacterClass) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("Hit Die", PropertyValue::text(format!("d {}", record.hit_die)))
            .with(
                "Subclass",
                PropertyValue::multi_select(record.subclasses.iter().map(|s| s.name.as_str())),
            ))
    }

    fn body(&self, record: &CharacterClass) -> Result<PageBody, ValidationError> {
        let mut body = PageBody::new();
        body.heading(HeadingLevel::One, &record.name)
            .push(Block::toggle(
                "Table of Contents...",
                vec![Block::TableOfContents],
            ))
            .divider()
            .heading(HeadingLevel::Two, "Class Features")
            .paragraph(format!(
                "As a {}, you gain the following class features.",
                record.name
            ))
            .paragraph(format!("Hit Die - d{}", record.hit_die));

        self.proficiencies(record, &mut body);

        body.heading(HeadingLevel::Three, "Equipment").paragraph(
            "You start with the following equipment, in addition to the equipment granted by your background:",
        );
        body.bullets(record.equipment_lines());

        if let Some(table) = self.level_table(record)? {
            body.heading(HeadingLevel::Three, format!("The {}", record.name))
                .divider()
                .table(table);
        }

        self.spellcasting(record, &mut body);
        self.features_and_subclasses(record, &mut body);
        Ok(body)
    }
}
