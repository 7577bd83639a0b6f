// src/builders/mod.rs
//! Property mapping and page body construction, one builder per dataset.
//!
//! A [`RecordBuilder`] knows one dataset: the typed record it reads, the
//! database schema it publishes into, the properties it sets on each page and
//! the body blocks it renders. [`PageBuilder`] erases the record type so the
//! orchestrator can drive every dataset the same way.

mod backgrounds;
mod classes;
mod creatures;
mod equipment;
mod magic_items;
pub mod mentions;
mod options;
mod races;
mod reference;
mod spells;

pub use backgrounds::BackgroundBuilder;
pub use classes::ClassBuilder;
pub use creatures::CreatureBuilder;
pub use equipment::{ArmorBuilder, ItemBuilder, WeaponBuilder};
pub use magic_items::MagicItemBuilder;
pub use races::RaceBuilder;
pub use reference::{
    AbilityScoreBuilder, AlignmentBuilder, DescriptionStyle, FeatBuilder, LanguageBuilder,
    ProficiencyBuilder, ReferenceBuilder, SkillBuilder,
};
pub use spells::SpellBuilder;

use crate::constants::CATEGORY_PROPERTY;
use crate::model::{
    category_value, HeadingLevel, PageBody, PageDraft, PropertySet, PropertyValue,
    SchemaDefinition,
};
use crate::records::adapt;
use crate::types::ValidationError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maps one dataset's typed records onto pages.
pub trait RecordBuilder: Send + Sync {
    type Record: DeserializeOwned;

    /// Database title and category tag of every page.
    fn label(&self) -> &'static str;

    fn schema(&self) -> SchemaDefinition;

    /// Whether a raw record of a shared source file belongs to this dataset.
    fn includes(&self, _raw: &Value) -> bool {
        true
    }

    fn name(&self, record: &Self::Record) -> String;

    /// Dataset-specific properties. Title and category are added by the caller.
    fn properties(&self, record: &Self::Record) -> Result<PropertySet, ValidationError>;

    fn body(&self, record: &Self::Record) -> Result<PageBody, ValidationError>;
}

/// A dataset builder with its record type erased.
pub trait PageBuilder: Send + Sync {
    fn label(&self) -> &'static str;
    fn schema(&self) -> SchemaDefinition;
    fn includes(&self, raw: &Value) -> bool;
    fn draft(&self, raw: &Value) -> Result<PageDraft, ValidationError>;
}

impl<B: RecordBuilder> PageBuilder for B {
    fn label(&self) -> &'static str {
        RecordBuilder::label(self)
    }

    fn schema(&self) -> SchemaDefinition {
        RecordBuilder::schema(self)
    }

    fn includes(&self, raw: &Value) -> bool {
        RecordBuilder::includes(self, raw)
    }

    fn draft(&self, raw: &Value) -> Result<PageDraft, ValidationError> {
        let record: B::Record = adapt(raw)?;
        let name = self.name(&record);
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }

        let schema = RecordBuilder::schema(self);
        let mut properties = PropertySet::new()
            .with(
                schema.title_property().clone(),
                PropertyValue::Title(name.clone()),
            )
            .with(CATEGORY_PROPERTY, category_value(&schema));
        for (key, value) in self.properties(&record)?.iter() {
            properties.insert(key.clone(), value.clone());
        }

        Ok(PageDraft {
            name,
            properties,
            body: self.body(&record)?,
        })
    }
}

/// Adapts companion records, dropping the ones that do not fit.
pub(crate) fn adapt_all<T: DeserializeOwned>(raw: &[Value], what: &str) -> Vec<T> {
    raw.iter()
        .filter_map(|value| match adapt(value) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Skipping {} record: {}", what, err);
                None
            }
        })
        .collect()
}

/// A body that opens with the page name as a level-one heading.
pub(crate) fn titled(name: &str) -> PageBody {
    let mut body = PageBody::new();
    body.heading(HeadingLevel::One, name);
    body
}

/// `https://www.dndbeyond.com/{section}/{index}`.
pub(crate) fn reference_url(section: &str, index: &str) -> Result<PropertyValue, ValidationError> {
    let url = crate::types::ValidatedUrl::parse(&format!(
        "https://www.dndbeyond.com/{}/{}",
        section, index
    ))?;
    Ok(PropertyValue::Url(Some(url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Minimal;

    #[derive(serde::Deserialize)]
    struct Entry {
        name: String,
    }

    impl RecordBuilder for Minimal {
        type Record = Entry;

        fn label(&self) -> &'static str {
            "Minimal"
        }

        fn schema(&self) -> SchemaDefinition {
            SchemaDefinition::new("Minimal").property("Note", PropertyKind::RichText)
        }

        fn name(&self, record: &Entry) -> String {
            record.name.clone()
        }

        fn properties(&self, _record: &Entry) -> Result<PropertySet, ValidationError> {
            Ok(PropertySet::new().with("Note", PropertyValue::text("hi")))
        }

        fn body(&self, record: &Entry) -> Result<PageBody, ValidationError> {
            Ok(titled(&record.name))
        }
    }

    #[test]
    fn test_draft_puts_title_and_category_first() {
        let draft = Minimal.draft(&json!({"name": "Alpha"})).unwrap();
        let names: Vec<&str> = draft.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Name", CATEGORY_PROPERTY, "Note"]);
        assert_eq!(draft.body.len(), 1);
        assert_eq!(
            RecordBuilder::schema(&Minimal).validate(&draft.properties),
            Ok(())
        );
    }

    #[test]
    fn test_draft_rejects_missing_and_empty_names() {
        assert!(matches!(
            Minimal.draft(&json!({"index": "alpha"})),
            Err(ValidationError::MissingField { .. })
        ));
        assert_eq!(
            Minimal.draft(&json!({"name": "  "})),
            Err(ValidationError::EmptyField("name"))
        );
    }
}
