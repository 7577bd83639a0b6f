// src/builders/spells.rs
use super::options::{CLASSES, DAMAGE_TYPES, MAGIC_SCHOOLS, SUBCLASSES};
use super::{reference_url, titled, RecordBuilder};
use crate::model::{
    HeadingLevel, OptionSet, PageBody, PropertyKind, PropertySet, PropertyValue,
    SchemaDefinition, TableBlock,
};
use crate::records::{capitalize, Spell};
use crate::types::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct SpellBuilder;

impl RecordBuilder for SpellBuilder {
    type Record = Spell;

    fn label(&self) -> &'static str {
        "Spells"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Spells")
            .property("URL", PropertyKind::Url)
            .property(
                "Level",
                PropertyKind::Select(OptionSet::of(&[
                    "Cantrip", "1", "2", "3", "4", "5", "6", "7", "8", "9",
                ])),
            )
            .property("School", PropertyKind::Select(OptionSet::of(&MAGIC_SCHOOLS)))
            .property(
                "Casting Time",
                PropertyKind::MultiSelect(OptionSet::of(&[
                    "1 action",
                    "1 bonus action",
                    "1 reaction",
                    "1 minute",
                    "10 minutes",
                    "1 hour",
                    "8 hours",
                    "12 hours",
                    "24 hours",
                ])),
            )
            .property("Range", PropertyKind::RichText)
            .property(
                "Components",
                PropertyKind::MultiSelect(OptionSet::of(&["V", "S", "M"])),
            )
            .property("Materials", PropertyKind::RichText)
            .property("Duration", PropertyKind::RichText)
            .property("Concentration", PropertyKind::Checkbox)
            .property("Ritual", PropertyKind::Checkbox)
            .property("Classes", PropertyKind::MultiSelect(OptionSet::of(&CLASSES)))
            .property(
                "Subclasses",
                PropertyKind::MultiSelect(OptionSet::of(&SUBCLASSES)),
            )
            .property(
                "Attack Type",
                PropertyKind::Select(OptionSet::of(&["Melee", "Ranged"])),
            )
            .property(
                "Damage Type",
                PropertyKind::Select(OptionSet::of(&DAMAGE_TYPES)),
            )
    }

    fn name(&self, record: &Spell) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Spell) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("URL", reference_url("spells", &record.index)?)
            .with("Level", PropertyValue::select(record.level_label()))
            .with("School", PropertyValue::select(capitalize(&record.school.name)))
            .with(
                "Casting Time",
                PropertyValue::multi_select([record.casting_time.as_str()]),
            )
            .with("Range", PropertyValue::text(&record.range))
            .with(
                "Components",
                PropertyValue::multi_select(record.components.iter().map(|c| capitalize(c))),
            )
            .with_opt(
                "Materials",
                record.material.as_deref().map(PropertyValue::text),
            )
            .with("Duration", PropertyValue::text(&record.duration))
            .with("Concentration", PropertyValue::Checkbox(record.concentration))
            .with("Ritual", PropertyValue::Checkbox(record.ritual))
            .with("Classes", PropertyValue::multi_select(record.class_names()))
            .with(
                "Subclasses",
                PropertyValue::multi_select(record.subclass_names()),
            )
            .with_opt(
                "Attack Type",
                record
                    .attack_type
                    .as_deref()
                    .map(|attack| PropertyValue::select(capitalize(attack))),
            )
            .with_opt(
                "Damage Type",
                record.damage_type().map(PropertyValue::select),
            ))
    }

    fn body(&self, record: &Spell) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);

        let mut casting = TableBlock::new(&["Level", "Casting Time", "Range/Area", "Components"]);
        casting.push_text_row(&[
            record.level_label(),
            record.casting_time.clone(),
            record.range_area(),
            record.components_text(),
        ])?;
        let mut effect = TableBlock::new(&["Duration", "School", "Attack/Save", "Damage/Effect"]);
        effect.push_text_row(&[
            record.duration.clone(),
            record.school.name.clone(),
            record.attack_or_save(),
            record.damage_type().unwrap_or_else(|| "None".to_string()),
        ])?;
        body.table(casting).table(effect);

        if !record.desc.is_empty() {
            body.heading(HeadingLevel::Three, "Description")
                .divider()
                .paragraphs(&record.desc);
        }
        if !record.higher_level.is_empty() {
            body.heading(HeadingLevel::Three, "At Higher Levels")
                .divider()
                .paragraphs(&record.higher_level);
        }
        if let Some(material) = &record.material {
            body.divider().paragraph(format!(" * ({})", material));
        }
        Ok(body)
    }
}
