// src/records/magic_item.rs
use super::{capitalize, ApiReference};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Rarity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MagicItem {
    pub index: String,
    pub name: String,
    pub equipment_category: ApiReference,
    pub rarity: Rarity,
    #[serde(default)]
    pub variants: Vec<ApiReference>,
    #[serde(default)]
    pub variant: bool,
    #[serde(default)]
    pub desc: Vec<String>,
}

impl MagicItem {
    /// Category display name, e.g. `"Wondrous items"`.
    pub fn category(&self) -> String {
        capitalize(&self.equipment_category.name.replace(',', " -"))
    }

    pub fn variant_names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }

    /// The first description line is the item's type line; the rest is the body.
    pub fn summary_and_body(&self) -> (Option<&str>, &[String]) {
        match self.desc.split_first() {
            Some((first, rest)) => (Some(first.as_str()), rest),
            None => (None, &[]),
        }
    }
}
