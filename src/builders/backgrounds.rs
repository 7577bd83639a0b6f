// src/builders/backgrounds.rs
use super::{titled, RecordBuilder};
use crate::model::{HeadingLevel, PageBody, PropertySet, SchemaDefinition};
use crate::records::Background;
use crate::types::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct BackgroundBuilder;

impl RecordBuilder for BackgroundBuilder {
    type Record = Background;

    fn label(&self) -> &'static str {
        "Backgrounds"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Backgrounds")
    }

    fn name(&self, record: &Background) -> String {
        record.name.clone()
    }

    fn properties(&self, _record: &Background) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new())
    }

    fn body(&self, record: &Background) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        let proficiencies: Vec<&str> = record
            .starting_proficiencies
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        body.divider()
            .paragraph(format!(
                "**Skill Proficiencies:** {}",
                proficiencies.join(", ")
            ))
            .paragraph(format!(
                "**Equipment:** {}",
                record.equipment_labels().join(", ")
            ));

        if let Some(feature) = &record.feature {
            body.heading(HeadingLevel::Two, &feature.name)
                .paragraph(feature.desc.join(". "));
        }

        let characteristics = record.characteristics();
        if !characteristics.is_empty() {
            body.heading(HeadingLevel::Two, "Suggested Characteristics");
            for (label, table) in characteristics {
                body.heading(HeadingLevel::Three, label)
                    .paragraph(format!(" Select {}", table.choose))
                    .bullets(table.labels());
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

    #[test]
    fn test_acolyte_page() {
        let draft = BackgroundBuilder
            .draft(&json!({
                "index": "acolyte",
                "name": "Acolyte",
                "starting_proficiencies": [
                    {"index": "skill-insight", "name": "Skill: Insight"},
                    {"index": "skill-religion", "name": "Skill: Religion"}
                ],
                "starting_equipment": [
                    {"equipment": {"index": "clothes-common", "name": "Clothes, common"}, "quantity": 1}
                ],
                "starting_equipment_options": [
                    {"choose": 1, "type": "equipment", "from": {"equipment_category": {"index": "holy-symbols", "name": "Holy Symbols"}}}
                ],
                "feature": {"name": "Shelter of the Faithful", "desc": ["You command respect", "You can perform ceremonies"]},
                "ideals": {
                    "choose": 1,
                    "from": {"options": [
                        {"option_type": "ideal", "desc": "Tradition", "alignments": [{"index": "lawful-good", "name": "Lawful Good"}]}
                    ]}
                },
                "bonds": {
                    "choose": 1,
                    "from": {"options": [{"option_type": "string", "string": "I would die to recover an ancient relic."}]}
                }
            }))
            .unwrap();

        assert_eq!(draft.properties.len(), 2);
        assert_eq!(
            PageBuilder::schema(&BackgroundBuilder).validate(&draft.properties),
            Ok(())
        );

        let texts: Vec<String> = draft
            .body
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(run) | Block::BulletedListItem(run) => Some(plain_text(run)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "Skill Proficiencies: Skill: Insight, Skill: Religion",
                "Equipment: Clothes, common, Holy Symbols",
                "You command respect. You can perform ceremonies",
                " Select 1",
                "Tradition - Lawful Good",
                " Select 1",
                "I would die to recover an ancient relic.",
            ]
        );
    }

    #[test]
    fn test_background_without_feature_or_characteristics() {
        let draft = BackgroundBuilder
            .draft(&json!({"index": "plain", "name": "Plain"}))
            .unwrap();
        let kinds: Vec<&str> = draft.body.blocks.iter().map(Block::block_type).collect();
        assert_eq!(kinds, vec!["heading_1", "divider", "paragraph", "paragraph"]);
    }
}
