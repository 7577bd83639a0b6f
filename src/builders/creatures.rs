// src/builders/creatures.rs
//! Monster stat blocks.

use super::{reference_url, titled, RecordBuilder};
use crate::model::{
    HeadingLevel, OptionSet, PageBody, PropertyKind, PropertySet, PropertyValue,
    SchemaDefinition, TableBlock,
};
use crate::records::{capitalize, modifier_label, Creature, CreatureAction};
use crate::types::ValidationError;

const ABILITY_NAMES: [&str; 6] = [
    "Strength",
    "Dexterity",
    "Constitution",
    "Intelligence",
    "Wisdom",
    "Charisma",
];

#[derive(Debug, Clone, Default)]
pub struct CreatureBuilder;

/// Adds an `h3` section with one `"{name} : {desc}"` paragraph per entry.
fn action_section<'a>(
    body: &mut PageBody,
    title: &str,
    entries: impl IntoIterator<Item = &'a CreatureAction>,
) {
    let lines: Vec<String> = entries
        .into_iter()
        .map(|entry| format!("{} : {}", entry.name, entry.desc))
        .collect();
    if lines.is_empty() {
        return;
    }
    body.heading(HeadingLevel::Three, title)
        .divider()
        .paragraphs(lines);
}

impl RecordBuilder for CreatureBuilder {
    type Record = Creature;

    fn label(&self) -> &'static str {
        "Creatures"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Creatures")
            .property("URL", PropertyKind::Url)
            .property(
                "Size",
                PropertyKind::Select(OptionSet::of(&[
                    "Tiny",
                    "Small",
                    "Medium",
                    "Large",
                    "Huge",
                    "Gargantuan",
                ])),
            )
            .property(
                "Type",
                PropertyKind::Select(OptionSet::of(&[
                    "Aberration",
                    "Beast",
                    "Celestial",
                    "Construct",
                    "Dragon",
                    "Elemental",
                    "Fey",
                    "Fiend",
                    "Giant",
                    "Humanoid",
                    "Monstrosity",
                    "Ooze",
                    "Plant",
                    "Undead",
                    "Swarm of tiny beasts",
                ])),
            )
            .property("CR", PropertyKind::Number)
            .property("Hit Points", PropertyKind::Number)
            .property(
                "Movement Type",
                PropertyKind::MultiSelect(OptionSet::of(&[
                    "Walk", "Fly", "Swim", "Climb", "Burrow", "Hover",
                ])),
            )
    }

    fn name(&self, record: &Creature) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Creature) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("URL", reference_url("monsters", &record.index)?)
            .with("Size", PropertyValue::select(capitalize(&record.size)))
            .with("Type", PropertyValue::select(capitalize(&record.creature_type)))
            .with("CR", PropertyValue::number(record.challenge_rating))
            .with("Hit Points", PropertyValue::Number(Some(record.hit_points as f64)))
            .with(
                "Movement Type",
                PropertyValue::multi_select(record.movement_types()),
            ))
    }

    fn body(&self, record: &Creature) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.divider()
            .paragraph(format!(
                "{} {} , {}",
                capitalize(&record.size),
                capitalize(&record.creature_type),
                record.alignment
            ))
            .divider()
            .paragraph(format!(
                "Hit Points : {} ( {} )",
                record.hit_points, record.hit_points_roll
            ))
            .paragraph(format!("Armor Class : {}", record.armor_class_text()))
            .paragraph(format!("Speed : {}", record.speed_text()));

        let mut scores = TableBlock::new(&ABILITY_NAMES);
        let row: Vec<String> = record
            .ability_scores()
            .iter()
            .map(|score| format!("{} ({})", score, modifier_label(*score)))
            .collect();
        scores.push_text_row(&row)?;
        body.table(scores);

        let lines = [
            ("Saving proficiencies", record.saving_throws()),
            ("Skill proficiencies", record.skills()),
            ("Damage Resistances", record.damage_resistances_text()),
            ("Damage Vulnerabilities", record.damage_vulnerabilities_text()),
            ("Damage Immunity", record.damage_immunities_text()),
            ("Condition Immunity", record.condition_immunities_text()),
            ("Senses", record.senses_text()),
        ];
        for (label, value) in lines {
            if let Some(value) = value {
                body.paragraph(format!("{}: {}", label, value));
            }
        }

        body.paragraph(format!("Language(s) : {}", record.languages))
            .paragraph(format!(
                "Challenge Rating: {} ({})    Proficiency Bonus: +{}",
                record.challenge_rating_text(),
                record.xp,
                record.proficiency_bonus
            ));

        action_section(&mut body, "Abilities", record.abilities());
        if let Some(spellcasting) = record.spellcasting() {
            body.heading(HeadingLevel::Three, "Spellcasting")
                .divider()
                .paragraph(&spellcasting.desc);
        }
        action_section(&mut body, "Actions", &record.actions);
        action_section(&mut body, "Legendary Actions", &record.legendary_actions);
        action_section(&mut body, "Reactions", &record.reactions);

        if let Some(desc) = record.desc.as_deref().filter(|d| !d.trim().is_empty()) {
            body.heading(HeadingLevel::Three, "Description")
                .divider()
                .paragraph(desc);
        }
        Ok(body)
    }
}
