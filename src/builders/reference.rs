// src/builders/reference.rs
//! Builders for the small lookup datasets.

use super::mentions::mention_list;
use super::options::{ABILITY_ABBREVIATIONS, CLASSES, RACES, SKILLS, SUBRACES};
use super::{titled, RecordBuilder};
use crate::model::{
    HeadingLevel, OptionSet, PageBody, PropertyKind, PropertySet, PropertyValue,
    SchemaDefinition,
};
use crate::records::{
    AbilityScore, Alignment, Feat, Language, Proficiency, ReferenceEntry, Skill,
};
use crate::types::ValidationError;

const DESCRIPTION: &str = "Description";

/// How a reference entry's description is laid out on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStyle {
    /// Title heading, divider, one paragraph per description entry.
    Paragraphs,
    /// Title heading, divider, one bullet per description entry.
    Bullets,
    /// One paragraph per line of the description and nothing else.
    /// Used for long documents; there is no description property.
    Lines,
}

/// Name-and-description datasets: weapon properties, magic schools,
/// damage types, conditions and rules.
#[derive(Debug, Clone)]
pub struct ReferenceBuilder {
    label: &'static str,
    style: DescriptionStyle,
}

impl ReferenceBuilder {
    pub fn new(label: &'static str, style: DescriptionStyle) -> Self {
        Self { label, style }
    }
}

impl RecordBuilder for ReferenceBuilder {
    type Record = ReferenceEntry;

    fn label(&self) -> &'static str {
        self.label
    }

    fn schema(&self) -> SchemaDefinition {
        let schema = SchemaDefinition::new(self.label);
        match self.style {
            DescriptionStyle::Lines => schema,
            _ => schema.property(DESCRIPTION, PropertyKind::RichText),
        }
    }

    fn name(&self, record: &ReferenceEntry) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &ReferenceEntry) -> Result<PropertySet, ValidationError> {
        Ok(match self.style {
            DescriptionStyle::Lines => PropertySet::new(),
            _ => PropertySet::new().with(DESCRIPTION, PropertyValue::text(record.desc.joined(" "))),
        })
    }

    fn body(&self, record: &ReferenceEntry) -> Result<PageBody, ValidationError> {
        let body = match self.style {
            DescriptionStyle::Paragraphs => {
                let mut body = titled(&record.name);
                body.divider().paragraphs(record.desc.paragraphs());
                body
            }
            DescriptionStyle::Bullets => {
                let mut body = titled(&record.name);
                body.divider().bullets(record.desc.paragraphs());
                body
            }
            DescriptionStyle::Lines => {
                let mut body = PageBody::new();
                for paragraph in record.desc.paragraphs() {
                    body.paragraphs(paragraph.lines().filter(|line| !line.trim().is_empty()));
                }
                body
            }
        };
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlignmentBuilder;

impl RecordBuilder for AlignmentBuilder {
    type Record = Alignment;

    fn label(&self) -> &'static str {
        "Alignments"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Alignments")
            .property("Abbreviation", PropertyKind::RichText)
            .property(DESCRIPTION, PropertyKind::RichText)
    }

    fn name(&self, record: &Alignment) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Alignment) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with_opt(
                "Abbreviation",
                record.abbreviation.as_deref().map(PropertyValue::text),
            )
            .with(DESCRIPTION, PropertyValue::text(record.desc.joined(" "))))
    }

    fn body(&self, record: &Alignment) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.divider().paragraphs(record.desc.paragraphs());
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LanguageBuilder;

impl RecordBuilder for LanguageBuilder {
    type Record = Language;

    fn label(&self) -> &'static str {
        "Languages"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Languages")
            .property(
                "Type",
                PropertyKind::Select(OptionSet::of(&["Standard", "Exotic"])),
            )
            .property("Typical Speakers", PropertyKind::MultiSelect(OptionSet::Open))
            .property(
                "Script",
                PropertyKind::Select(OptionSet::of(&[
                    "Common",
                    "Dwarvish",
                    "Elvish",
                    "Infernal",
                    "Celestial",
                    "Draconic",
                ])),
            )
    }

    fn name(&self, record: &Language) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Language) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("Type", PropertyValue::select(&record.kind))
            .with(
                "Typical Speakers",
                PropertyValue::multi_select(
                    record
                        .typical_speakers
                        .iter()
                        .map(|s| crate::records::capitalize(s)),
                ),
            )
            .with_opt("Script", record.script.as_deref().map(PropertyValue::select)))
    }

    fn body(&self, record: &Language) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.divider();
        match record.desc.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(desc) => body.paragraph(desc),
            None => body.paragraph("No description available"),
        };
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillBuilder;

impl RecordBuilder for SkillBuilder {
    type Record = Skill;

    fn label(&self) -> &'static str {
        "Skills"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Skills")
            .property(
                "Ability Score",
                PropertyKind::Select(OptionSet::of(&ABILITY_ABBREVIATIONS)),
            )
            .property(DESCRIPTION, PropertyKind::RichText)
    }

    fn name(&self, record: &Skill) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Skill) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with(
                "Ability Score",
                PropertyValue::select(&record.ability_score.name),
            )
            .with(DESCRIPTION, PropertyValue::text(record.desc.joined(""))))
    }

    fn body(&self, record: &Skill) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.divider()
            .paragraph(record.desc.joined(""))
            .paragraph(format!("**Ability Score:** {}", record.ability_score.name));
        Ok(body)
    }
}

/// Ability scores are titled by their full name; `STR` becomes `Strength`.
#[derive(Debug, Clone, Default)]
pub struct AbilityScoreBuilder;

impl RecordBuilder for AbilityScoreBuilder {
    type Record = AbilityScore;

    fn label(&self) -> &'static str {
        "Ability Scores"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Ability Scores")
            .property("Skills", PropertyKind::MultiSelect(OptionSet::of(&SKILLS)))
            .property(DESCRIPTION, PropertyKind::RichText)
    }

    fn name(&self, record: &AbilityScore) -> String {
        record.full_name.clone()
    }

    fn properties(&self, record: &AbilityScore) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with(
                "Skills",
                PropertyValue::multi_select(record.skills.iter().map(|s| s.name.as_str())),
            )
            .with(DESCRIPTION, PropertyValue::text(record.desc.joined(""))))
    }

    fn body(&self, record: &AbilityScore) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.full_name);
        body.divider().paragraphs(record.desc.paragraphs());

        if !record.skills.is_empty() {
            body.heading(HeadingLevel::Two, "Skills").divider();
            for skill in &record.skills {
                body.rich_paragraph(mention_list(&[skill.name.as_str()], "", Some("Skills")));
            }
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProficiencyBuilder;

impl RecordBuilder for ProficiencyBuilder {
    type Record = Proficiency;

    fn label(&self) -> &'static str {
        "Proficiencies"
    }

    fn schema(&self) -> SchemaDefinition {
        let races: Vec<&str> = RACES.iter().chain(SUBRACES.iter()).copied().collect();
        SchemaDefinition::new("Proficiencies")
            .property(
                "Type",
                PropertyKind::Select(OptionSet::of(&[
                    "Armor",
                    "Weapons",
                    "Artisan's Tools",
                    "Skills",
                    "Saving Throws",
                    "Other Tools",
                    "Gaming Sets",
                    "Musical Instruments",
                    "Vehicles",
                ])),
            )
            .property("Classes", PropertyKind::MultiSelect(OptionSet::of(&CLASSES)))
            .property("Races", PropertyKind::MultiSelect(OptionSet::of(&races)))
    }

    fn name(&self, record: &Proficiency) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Proficiency) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("Type", PropertyValue::select(&record.kind))
            .with(
                "Classes",
                PropertyValue::multi_select(record.classes.iter().map(|c| c.name.as_str())),
            )
            .with(
                "Races",
                PropertyValue::multi_select(record.races.iter().map(|r| r.name.as_str())),
            ))
    }

    fn body(&self, record: &Proficiency) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.divider()
            .paragraph(format!("**Type:** {}", record.kind));
        if !record.classes.is_empty() {
            body.heading(HeadingLevel::Three, "Classes")
                .bullets(record.classes.iter().map(|c| c.name.clone()));
        }
        if !record.races.is_empty() {
            body.heading(HeadingLevel::Three, "Races")
                .bullets(record.races.iter().map(|r| r.name.clone()));
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatBuilder;

impl RecordBuilder for FeatBuilder {
    type Record = Feat;

    fn label(&self) -> &'static str {
        "Feats"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Feats").property("Requirements", PropertyKind::RichText)
    }

    fn name(&self, record: &Feat) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Feat) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new().with_opt(
            "Requirements",
            record.requirements().map(PropertyValue::text),
        ))
    }

    fn body(&self, record: &Feat) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.paragraph(format!(
            "Minimum Requirements - {}",
            record.requirements().unwrap_or_default()
        ))
        .divider()
        .paragraphs(record.desc.paragraphs());
        Ok(body)
    }
}
