// src/model/properties.rs
//! Typed page property values, keyed by property name.

use crate::types::{PageId, PropertyName, ValidatedUrl};
use indexmap::IndexMap;

/// Notion rejects commas inside select option names.
pub fn option_name(raw: &str) -> String {
    raw.replace(',', " -")
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Number(Option<f64>),
    Checkbox(bool),
    Url(Option<ValidatedUrl>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Relation(Vec<PageId>),
}

impl PropertyValue {
    pub fn select(option: impl AsRef<str>) -> Self {
        PropertyValue::Select(Some(option_name(option.as_ref())))
    }

    /// Multi-select with sanitized, de-duplicated option names in input order.
    pub fn multi_select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for option in options {
            let name = option_name(option.as_ref());
            if !names.contains(&name) {
                names.push(name);
            }
        }
        PropertyValue::MultiSelect(names)
    }

    pub fn text(content: impl Into<String>) -> Self {
        PropertyValue::RichText(content.into())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        PropertyValue::Number(Some(value.into()))
    }

    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Number(_) => "number",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Relation(_) => "relation",
        }
    }

    /// Option names this value selects, if it is a select kind.
    pub fn selected_options(&self) -> &[String] {
        match self {
            PropertyValue::Select(Some(option)) => std::slice::from_ref(option),
            PropertyValue::MultiSelect(options) => options,
            _ => &[],
        }
    }
}

/// The properties of one page, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    values: IndexMap<PropertyName, PropertyValue>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<PropertyName>, value: PropertyValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts only when `value` is present.
    pub fn with_opt(self, name: impl Into<PropertyName>, value: Option<PropertyValue>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<PropertyName>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &PropertyValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The page title, taken from the first title-kind value.
    pub fn title(&self) -> Option<&str> {
        self.values.values().find_map(|value| match value {
            PropertyValue::Title(title) => Some(title.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_option_names_drop_commas() {
        assert_eq!(
            PropertyValue::select("Mounts and Vehicles, Tack"),
            PropertyValue::Select(Some("Mounts and Vehicles - Tack".to_string()))
        );
    }

    #[test]
    fn test_multi_select_deduplicates_in_order() {
        assert_eq!(
            PropertyValue::multi_select(["Walk", "Fly", "Walk"]),
            PropertyValue::MultiSelect(vec!["Walk".to_string(), "Fly".to_string()])
        );
    }

    #[test]
    fn test_property_set_keeps_insertion_order() {
        let set = PropertySet::new()
            .with("Name", PropertyValue::Title("Club".to_string()))
            .with("Cost", PropertyValue::text("1 sp"))
            .with_opt("Damage", None);
        let names: Vec<&str> = set.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Cost"]);
        assert_eq!(set.title(), Some("Club"));
    }
}
