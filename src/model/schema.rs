// src/model/schema.rs
//! Database schemas and the local check pages must pass before upload.

use super::properties::{PropertySet, PropertyValue};
use crate::constants::{CATEGORY_PROPERTY, NAME_PROPERTY};
use crate::error::SchemaViolation;
use crate::types::{Color, PropertyName};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub name: String,
    pub color: Color,
}

/// Allowed values of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSet {
    /// Only these options may be used.
    Declared(Vec<SelectOption>),
    /// Any option may be used; Notion creates new ones on demand.
    Open,
}

impl OptionSet {
    /// Declares `names` with a rotating palette.
    pub fn of<S: AsRef<str>>(names: &[S]) -> Self {
        const PALETTE: [Color; 9] = [
            Color::Gray,
            Color::Brown,
            Color::Orange,
            Color::Yellow,
            Color::Green,
            Color::Blue,
            Color::Purple,
            Color::Pink,
            Color::Red,
        ];
        OptionSet::Declared(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| SelectOption {
                    name: super::properties::option_name(name.as_ref()),
                    color: PALETTE[i % PALETTE.len()],
                })
                .collect(),
        )
    }

    fn allows(&self, option: &str) -> bool {
        match self {
            OptionSet::Open => true,
            OptionSet::Declared(options) => options.iter().any(|o| o.name == option),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Checkbox,
    Url,
    Select(OptionSet),
    MultiSelect(OptionSet),
    /// A relation to pages of the same database. Added after the database exists.
    Relation,
}

impl PropertyKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Number => "number",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Url => "url",
            PropertyKind::Select(_) => "select",
            PropertyKind::MultiSelect(_) => "multi_select",
            PropertyKind::Relation => "relation",
        }
    }
}

/// The declared shape of one dataset's database.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub title: String,
    title_property: PropertyName,
    properties: IndexMap<PropertyName, PropertyKind>,
}

impl SchemaDefinition {
    /// A schema with the `Name` title and the category tag every database carries.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_title_property(title, NAME_PROPERTY)
    }

    pub fn with_title_property(title: impl Into<String>, title_property: &str) -> Self {
        let title = title.into();
        let title_property = PropertyName::new(title_property);
        let mut properties = IndexMap::new();
        properties.insert(title_property.clone(), PropertyKind::Title);
        properties.insert(
            PropertyName::new(CATEGORY_PROPERTY),
            PropertyKind::Select(OptionSet::of(&[title.as_str()])),
        );
        Self {
            title,
            title_property,
            properties,
        }
    }

    pub fn property(mut self, name: &str, kind: PropertyKind) -> Self {
        self.properties.insert(PropertyName::new(name), kind);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyKind> {
        self.properties.get(name)
    }

    /// The title property's name.
    pub fn title_property(&self) -> &PropertyName {
        &self.title_property
    }

    /// Properties sent when the database is created.
    pub fn creatable_properties(&self) -> impl Iterator<Item = (&PropertyName, &PropertyKind)> {
        self.properties
            .iter()
            .filter(|(_, kind)| **kind != PropertyKind::Relation)
    }

    /// Relation properties, added once the database id is known.
    pub fn relation_properties(&self) -> impl Iterator<Item = &PropertyName> {
        self.properties
            .iter()
            .filter(|(_, kind)| **kind == PropertyKind::Relation)
            .map(|(name, _)| name)
    }

    /// Checks that every value names a declared property of the matching kind
    /// and only uses declared options.
    pub fn validate(&self, values: &PropertySet) -> Result<(), SchemaViolation> {
        for (name, value) in values.iter() {
            let Some(kind) = self.properties.get(name.as_str()) else {
                return Err(SchemaViolation::UnknownProperty {
                    schema: self.title.clone(),
                    property: name.to_string(),
                });
            };
            if kind.type_name() != value.type_name() {
                return Err(SchemaViolation::KindMismatch {
                    property: name.to_string(),
                    expected: kind.type_name(),
                    actual: value.type_name(),
                });
            }
            if let PropertyKind::Select(options) | PropertyKind::MultiSelect(options) = kind {
                if let Some(option) = value
                    .selected_options()
                    .iter()
                    .find(|option| !options.allows(option))
                {
                    return Err(SchemaViolation::UndeclaredOption {
                        property: name.to_string(),
                        option: option.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The category tag value for a page of `schema`.
pub fn category_value(schema: &SchemaDefinition) -> PropertyValue {
    PropertyValue::select(&schema.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn weapons() -> SchemaDefinition {
        SchemaDefinition::new("Weapons")
            .property("Cost", PropertyKind::RichText)
            .property(
                "Properties",
                PropertyKind::MultiSelect(OptionSet::of(&["Light", "Finesse"])),
            )
            .property("Variants", PropertyKind::MultiSelect(OptionSet::Open))
            .property("Contains", PropertyKind::Relation)
    }

    #[test]
    fn test_valid_page_passes() {
        let set = PropertySet::new()
            .with("Name", PropertyValue::Title("Dagger".to_string()))
            .with(CATEGORY_PROPERTY, category_value(&weapons()))
            .with("Properties", PropertyValue::multi_select(["Light", "Finesse"]))
            .with("Variants", PropertyValue::multi_select(["Anything Goes"]));
        assert_eq!(weapons().validate(&set), Ok(()));
    }

    #[test]
    fn test_undeclared_option_is_reported() {
        let set = PropertySet::new()
            .with("Properties", PropertyValue::multi_select(["Light", "Siege"]));
        assert_eq!(
            weapons().validate(&set),
            Err(SchemaViolation::UndeclaredOption {
                property: "Properties".to_string(),
                option: "Siege".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_property_and_kind_mismatch() {
        let unknown = PropertySet::new().with("Weight", PropertyValue::number(3.0));
        assert!(matches!(
            weapons().validate(&unknown),
            Err(SchemaViolation::UnknownProperty { .. })
        ));

        let mismatch = PropertySet::new().with("Cost", PropertyValue::number(2.0));
        assert_eq!(
            weapons().validate(&mismatch),
            Err(SchemaViolation::KindMismatch {
                property: "Cost".to_string(),
                expected: "rich_text",
                actual: "number",
            })
        );
    }

    #[test]
    fn test_relations_are_deferred() {
        let schema = weapons();
        assert!(schema.creatable_properties().all(|(_, k)| *k != PropertyKind::Relation));
        let relations: Vec<&str> = schema.relation_properties().map(|n| n.as_str()).collect();
        assert_eq!(relations, vec!["Contains"]);
        assert_eq!(schema.title_property().as_str(), "Name");
    }
}
