// src/builders/magic_items.rs
use super::{reference_url, titled, RecordBuilder};
use crate::model::{
    OptionSet, PageBody, PropertyKind, PropertySet, PropertyValue, SchemaDefinition,
};
use crate::records::MagicItem;
use crate::types::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct MagicItemBuilder;

impl RecordBuilder for MagicItemBuilder {
    type Record = MagicItem;

    fn label(&self) -> &'static str {
        "Magic Items"
    }

    fn schema(&self) -> SchemaDefinition {
        SchemaDefinition::new("Magic Items")
            .property("URL", PropertyKind::Url)
            .property(
                "Rarity",
                PropertyKind::Select(OptionSet::of(&[
                    "Common",
                    "Uncommon",
                    "Rare",
                    "Very Rare",
                    "Legendary",
                    "Artifact",
                    "Varies",
                ])),
            )
            .property(
                "Category",
                PropertyKind::Select(OptionSet::of(&[
                    "Wondrous items",
                    "Armor",
                    "Weapon",
                    "Potion",
                    "Ring",
                    "Rod",
                    "Scroll",
                    "Staff",
                    "Wand",
                ])),
            )
            .property("Variants", PropertyKind::MultiSelect(OptionSet::Open))
            .property("Variant", PropertyKind::Checkbox)
    }

    fn name(&self, record: &MagicItem) -> String {
        record.name.clone()
    }

    fn properties(&self, record: &MagicItem) -> Result<PropertySet, ValidationError> {
        Ok(PropertySet::new()
            .with("URL", reference_url("magic-items", &record.index)?)
            .with("Rarity", PropertyValue::select(&record.rarity.name))
            .with("Category", PropertyValue::select(record.category()))
            .with(
                "Variants",
                PropertyValue::multi_select(record.variant_names()),
            )
            .with("Variant", PropertyValue::Checkbox(record.variant)))
    }

    fn body(&self, record: &MagicItem) -> Result<PageBody, ValidationError> {
        let mut body = titled(&record.name);
        let (summary, rest) = record.summary_and_body();
        if let Some(summary) = summary {
            body.paragraph(summary).divider();
        }
        body.paragraphs(rest);
        Ok(body)
    }
}
