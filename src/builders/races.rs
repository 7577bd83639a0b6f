// src/builders/races.rs
//! Race pages. Trait and subrace text lives in companion files loaded up front.

use super::options::{ABILITY_ABBREVIATIONS, LANGUAGES, SUBRACES};
use super::{adapt_all, titled, RecordBuilder};
use crate::model::{
    HeadingLevel, OptionSet, PageBody, PropertyKind, PropertySet, PropertyValue,
    SchemaDefinition, TableBlock,
};
use crate::records::{Race, RacialTrait, Subrace};
use crate::types::ValidationError;
use serde_json::Value;

const DRACONIC_ANCESTRY: &str = "Draconic Ancestry";

const TRAITS: [&str; 21] = [
    "Brave",
    "Breath Weapon",
    "Damage Resistance",
    "Darkvision",
    "Draconic Ancestry",
    "Dwarven Combat Training",
    "Dwarven Resilience",
    "Fey Ancestry",
    "Gnome Cunning",
    "Halfling Nimbleness",
    "Hellish Resistance",
    "Infernal Legacy",
    "Keen Senses",
    "Lucky",
    "Menacing",
    "Relentless Endurance",
    "Savage Attacks",
    "Skill Versatility",
    "Stonecunning",
    "Tool Proficiency",
    "Trance",
];

#[derive(Debug, Clone, Default)]
pub struct RaceBuilder {
    traits: Vec<RacialTrait>,
    subraces: Vec<Subrace>,
}

impl RaceBuilder {
    pub fn new(traits: Vec<RacialTrait>, subraces: Vec<Subrace>) -> Self {
        Self { traits, subraces }
    }

    /// Builds from the raw trait and subrace files.
    pub fn from_companions(traits: &[Value], subraces: &[Value]) -> Self {
        Self::new(
            adapt_all(traits, "racial trait"),
            adapt_all(subraces, "subrace"),
        )
    }

    fn find_trait(&self, name: &str) -> Option<&RacialTrait> {
        self.traits.iter().find(|t| t.name == name)
    }

    fn ancestry_table(&self) -> Result<Option<TableBlock>, ValidationError> {
        let rows: Vec<[String; 3]> = self
            .traits
            .iter()
            .filter(|t| {
                t.parent
                    .as_ref()
                    .is_some_and(|parent| parent.name == DRACONIC_ANCESTRY)
            })
            .filter_map(RacialTrait::ancestry_row)
            .collect();
        if rows.is_empty() {
            return Ok(None);
        }
        let mut table = TableBlock::new(&["Dragon", "Damage Type", "Breath Weapon"]);
        for row in &rows {
            table.push_text_row(row)?;
        }
        Ok(Some(table))
    }
}

impl RecordBuilder for RaceBuilder {
    type Record = Race;

    fn label(&self) -> &'static str {
        "Races"
    }

    fn schema(&self) -> SchemaDefinition {
        let bonuses: Vec<String> = ["+1", "+2"]
            .iter()
            .flat_map(|bonus| {
                ABILITY_ABBREVIATIONS
                    .iter()
                    .map(move |ability| format!("{} {}", bonus, ability))
            })
            .collect();
        SchemaDefinition::new("Races")
            .property("Speed", PropertyKind::RichText)
            .property(
                "Ability Bonus",
                PropertyKind::MultiSelect(OptionSet::of(&bonuses)),
            )
            .property("Subrace", PropertyKind::MultiSelect(OptionSet::of(&SUBRACES)))
            .property(
                "Size",
                PropertyKind::Select(OptionSet::of(&["Small", "Medium"])),
            )
            .property(
                "Languages",
                PropertyKind::MultiSelect(OptionSet::of(&LANGUAGES)),
            )
            .property("Traits", PropertyKind::MultiSelect(OptionSet::of(&TRAITS)))
    }

    fn name(&self, record: &Race) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &Race) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("Speed", PropertyValue::text(record.speed.to_string()))
            .with(
                "Ability Bonus",
                PropertyValue::multi_select(record.ability_bonus_labels()),
            )
            .with(
                "Subrace",
                PropertyValue::multi_select(record.subraces.iter().map(|s| s.name.as_str())),
            )
            .with("Size", PropertyValue::select(&record.size))
            .with(
                "Languages",
                PropertyValue::multi_select(record.languages.iter().map(|l| l.name.as_str())),
            )
            .with(
                "Traits",
                PropertyValue::multi_select(record.traits.iter().map(|t| t.name.as_str())),
            ))
    }

    fn body(&self, record: &Race) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        body.heading(HeadingLevel::Two, format!("{} Traits", record.name))
            .divider()
            .paragraph(format!(
                "**Ability Score Increase.** {}",
                record.ability_bonus_line()
            ))
            .paragraph(format!("**Age.** {}", record.age))
            .paragraph(format!("**Alignment.** {}", record.alignment))
            .paragraph(format!("**Size.** {}", record.size_description))
            .paragraph(format!(
                "**Speed.** Your base walking speed is {} feet.",
                record.speed
            ));

        for reference in &record.traits {
            let Some(found) = self.find_trait(&reference.name) else {
                continue;
            };
            if found.name == DRACONIC_ANCESTRY {
                if let Some(table) = self.ancestry_table()? {
                    body.table(table);
                }
            }
            body.paragraph(found.paragraph());
        }

        body.paragraph(format!("**Languages.** {}", record.language_desc));

        for reference in &record.subraces {
            let Some(subrace) = self.subraces.iter().find(|s| s.name == reference.name) else {
                continue;
            };
            body.heading(HeadingLevel::Three, &subrace.name)
                .paragraph(&subrace.desc)
                .divider();
            if let Some(line) = subrace.ability_bonus_line() {
                body.paragraph(format!("**Ability Score Increase.** {}", line));
            }
            for sub_trait in &subrace.racial_traits {
                if let Some(found) = self.find_trait(&sub_trait.name) {
                    body.paragraph(found.paragraph());
                }
            }
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::PageBuilder;
    use crate::model::{plain_text, Block};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dwarf() -> Value {
        json!({
            "index": "dwarf",
            "name": "Dwarf",
            "speed": 25,
            "ability_bonuses": [{"ability_score": {"index": "con", "name": "CON"}, "bonus": 2}],
            "alignment": "Most dwarves are lawful.",
            "age": "Dwarves mature at the same rate as humans.",
            "size": "Medium",
            "size_description": "Dwarves stand between 4 and 5 feet tall.",
            "languages": [
                {"index": "common", "name": "Common"},
                {"index": "dwarvish", "name": "Dwarvish"}
            ],
            "language_desc": "You can speak, read, and write Common and Dwarvish.",
            "traits": [{"index": "darkvision", "name": "Darkvision"}],
            "subraces": [{"index": "hill-dwarf", "name": "Hill Dwarf"}]
        })
    }

    fn companions() -> RaceBuilder {
        RaceBuilder::from_companions(
            &[
                json!({"index": "darkvision", "name": "Darkvision", "desc": ["You can see in dim light."]}),
                json!({"index": "dwarven-toughness", "name": "Dwarven Toughness", "desc": ["Your hit point maximum increases by 1."]}),
                json!({"broken": true}),
            ],
            &[json!({
                "index": "hill-dwarf",
                "name": "Hill Dwarf",
                "desc": "As a hill dwarf, you have keen senses.",
                "ability_bonuses": [{"ability_score": {"index": "wis", "name": "WIS"}, "bonus": 1}],
                "racial_traits": [{"index": "dwarven-toughness", "name": "Dwarven Toughness"}]
            })],
        )
    }

    fn paragraphs(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(run) => Some(plain_text(run)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_race_properties_fit_schema() {
        let builder = companions();
        let draft = builder.draft(&dwarf()).unwrap();
        assert_eq!(PageBuilder::schema(&builder).validate(&draft.properties), Ok(()));
        assert_eq!(
            draft.properties.get("Ability Bonus"),
            Some(&PropertyValue::multi_select(["+2 CON"]))
        );
    }

    #[test]
    fn test_traits_and_subraces_come_from_companions() {
        let draft = companions().draft(&dwarf()).unwrap();
        let lines = paragraphs(&draft.body.blocks);
        assert_eq!(lines[0], "Ability Score Increase. +2 CON");
        assert!(lines.contains(&"Darkvision. You can see in dim light.".to_string()));
        assert!(lines.contains(&"Ability Score Increase. +1 WIS".to_string()));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Dwarven Toughness. Your hit point maximum increases by 1.")
        );
    }

    #[test]
    fn test_missing_companions_leave_core_sections() {
        let draft = RaceBuilder::default().draft(&dwarf()).unwrap();
        let lines = paragraphs(&draft.body.blocks);
        assert_eq!(lines.len(), 6);
        assert!(!draft
            .body
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Heading { level: HeadingLevel::Three, .. })));
    }

    #[test]
    fn test_ancestry_table_precedes_the_ancestry_trait() {
        let builder = RaceBuilder::from_companions(
            &[
                json!({"index": "draconic-ancestry", "name": "Draconic Ancestry", "desc": ["You have draconic ancestry."]}),
                json!({
                    "index": "draconic-ancestry-black",
                    "name": "Draconic Ancestry (Black)",
                    "parent": {"index": "draconic-ancestry", "name": "Draconic Ancestry"},
                    "trait_specific": {
                        "damage_type": {"index": "acid", "name": "Acid"},
                        "breath_weapon": {
                            "area_of_effect": {"size": 30, "type": "line"},
                            "dc": {"dc_type": {"index": "dex", "name": "DEX"}}
                        }
                    }
                }),
            ],
            &[],
        );
        let mut dragonborn = dwarf();
        dragonborn["name"] = json!("Dragonborn");
        dragonborn["traits"] = json!([{"index": "draconic-ancestry", "name": "Draconic Ancestry"}]);
        dragonborn["subraces"] = json!([]);

        let draft = builder.draft(&dragonborn).unwrap();
        let position = draft
            .body
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Table(_)))
            .unwrap();
        let Block::Table(table) = &draft.body.blocks[position] else {
            unreachable!()
        };
        let row: Vec<String> = table.rows()[1].iter().map(|c| plain_text(c)).collect();
        assert_eq!(
            row,
            vec!["Draconic Ancestry (Black)", "Acid", "30 ft. line (Dex. save)"]
        );
        let Block::Paragraph(next) = &draft.body.blocks[position + 1] else {
            panic!("expected trait paragraph")
        };
        assert_eq!(plain_text(next), "Draconic Ancestry. You have draconic ancestry.");
    }
}
