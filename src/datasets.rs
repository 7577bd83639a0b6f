// src/datasets.rs
//! The datasets this tool can build: CLI selectors, source files, builders
//! and the order they must be published in.
//!
//! Some pages mention or relate to pages of other datasets, which must
//! already exist when the referencing dataset is built. Each dataset
//! declares what it depends on and [`build_order`] sorts a selection
//! accordingly.

use crate::builders::{
    AbilityScoreBuilder, AlignmentBuilder, ArmorBuilder, BackgroundBuilder, ClassBuilder,
    CreatureBuilder, DescriptionStyle, FeatBuilder, ItemBuilder, LanguageBuilder,
    MagicItemBuilder, PageBuilder, ProficiencyBuilder, RaceBuilder, ReferenceBuilder,
    SkillBuilder, SpellBuilder, WeaponBuilder,
};
use crate::loader;
use crate::types::ValidationError;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Selector that builds every dataset.
pub const ALL_SELECTOR: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    WeaponProperties,
    Backgrounds,
    Feats,
    MagicSchools,
    Rules,
    Languages,
    DamageTypes,
    Conditions,
    Alignments,
    Proficiencies,
    Skills,
    AbilityScores,
    Creatures,
    Races,
    Classes,
    Weapons,
    Armors,
    Items,
    MagicItems,
    Spells,
}

impl Dataset {
    /// Every dataset, in the base order used to break ties.
    pub const ALL: [Dataset; 20] = [
        Dataset::WeaponProperties,
        Dataset::Backgrounds,
        Dataset::Feats,
        Dataset::MagicSchools,
        Dataset::Rules,
        Dataset::Languages,
        Dataset::DamageTypes,
        Dataset::Conditions,
        Dataset::Alignments,
        Dataset::Proficiencies,
        Dataset::Skills,
        Dataset::AbilityScores,
        Dataset::Creatures,
        Dataset::Races,
        Dataset::Classes,
        Dataset::Weapons,
        Dataset::Armors,
        Dataset::Items,
        Dataset::MagicItems,
        Dataset::Spells,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Dataset::WeaponProperties => "weapon-properties",
            Dataset::Backgrounds => "backgrounds",
            Dataset::Feats => "feats",
            Dataset::MagicSchools => "magic-schools",
            Dataset::Rules => "rules",
            Dataset::Languages => "languages",
            Dataset::DamageTypes => "damage-types",
            Dataset::Conditions => "conditions",
            Dataset::Alignments => "alignments",
            Dataset::Proficiencies => "proficiencies",
            Dataset::Skills => "skills",
            Dataset::AbilityScores => "ability-scores",
            Dataset::Creatures => "creatures",
            Dataset::Races => "races",
            Dataset::Classes => "classes",
            Dataset::Weapons => "weapons",
            Dataset::Armors => "armors",
            Dataset::Items => "items",
            Dataset::MagicItems => "magic-items",
            Dataset::Spells => "spells",
        }
    }

    pub fn source_file(self) -> &'static str {
        match self {
            Dataset::WeaponProperties => "5e-SRD-Weapon-Properties.json",
            Dataset::Backgrounds => "5e-SRD-Backgrounds.json",
            Dataset::Feats => "5e-SRD-Feats.json",
            Dataset::MagicSchools => "5e-SRD-Magic-Schools.json",
            Dataset::Rules => "5e-SRD-Rule-Sections.json",
            Dataset::Languages => "5e-SRD-Languages.json",
            Dataset::DamageTypes => "5e-SRD-Damage-Types.json",
            Dataset::Conditions => "5e-SRD-Conditions.json",
            Dataset::Alignments => "5e-SRD-Alignments.json",
            Dataset::Proficiencies => "5e-SRD-Proficiencies.json",
            Dataset::Skills => "5e-SRD-Skills.json",
            Dataset::AbilityScores => "5e-SRD-Ability-Scores.json",
            Dataset::Creatures => "5e-SRD-Monsters.json",
            Dataset::Races => "5e-SRD-Races.json",
            Dataset::Classes => "5e-SRD-Classes.json",
            Dataset::Weapons | Dataset::Armors | Dataset::Items => "5e-SRD-Equipment.json",
            Dataset::MagicItems => "5e-SRD-Magic-Items.json",
            Dataset::Spells => "5e-SRD-Spells.json",
        }
    }

    /// Extra files whose records feed this dataset's page bodies.
    pub fn companion_files(self) -> &'static [&'static str] {
        match self {
            Dataset::Races => &[TRAITS_FILE, SUBRACES_FILE],
            Dataset::Classes => &[FEATURES_FILE, LEVELS_FILE, SUBCLASSES_FILE],
            _ => &[],
        }
    }

    /// Datasets whose pages this one mentions or relates to.
    pub fn depends_on(self) -> &'static [Dataset] {
        match self {
            Dataset::Weapons => &[Dataset::WeaponProperties],
            Dataset::AbilityScores => &[Dataset::Skills],
            Dataset::Classes => &[Dataset::Proficiencies, Dataset::Items],
            _ => &[],
        }
    }

    /// The builder for this dataset. Companion files are read from
    /// `data_dir`; a missing or unreadable one leaves its sections out.
    pub fn builder(self, data_dir: &Path) -> Box<dyn PageBuilder> {
        match self {
            Dataset::WeaponProperties => Box::new(ReferenceBuilder::new(
                "Weapon Properties",
                DescriptionStyle::Paragraphs,
            )),
            Dataset::MagicSchools => Box::new(ReferenceBuilder::new(
                "Magic Schools",
                DescriptionStyle::Paragraphs,
            )),
            Dataset::DamageTypes => Box::new(ReferenceBuilder::new(
                "Damage Types",
                DescriptionStyle::Paragraphs,
            )),
            Dataset::Conditions => Box::new(ReferenceBuilder::new(
                "Conditions",
                DescriptionStyle::Bullets,
            )),
            Dataset::Rules => Box::new(ReferenceBuilder::new("Rules", DescriptionStyle::Lines)),
            Dataset::Backgrounds => Box::new(BackgroundBuilder),
            Dataset::Feats => Box::new(FeatBuilder),
            Dataset::Languages => Box::new(LanguageBuilder),
            Dataset::Alignments => Box::new(AlignmentBuilder),
            Dataset::Proficiencies => Box::new(ProficiencyBuilder),
            Dataset::Skills => Box::new(SkillBuilder),
            Dataset::AbilityScores => Box::new(AbilityScoreBuilder),
            Dataset::Creatures => Box::new(CreatureBuilder),
            Dataset::Races => Box::new(RaceBuilder::from_companions(
                &companion(data_dir, TRAITS_FILE),
                &companion(data_dir, SUBRACES_FILE),
            )),
            Dataset::Classes => Box::new(ClassBuilder::from_companions(
                &companion(data_dir, FEATURES_FILE),
                &companion(data_dir, LEVELS_FILE),
                &companion(data_dir, SUBCLASSES_FILE),
            )),
            Dataset::Weapons => Box::new(WeaponBuilder),
            Dataset::Armors => Box::new(ArmorBuilder),
            Dataset::Items => Box::new(ItemBuilder),
            Dataset::MagicItems => Box::new(MagicItemBuilder),
            Dataset::Spells => Box::new(SpellBuilder),
        }
    }
}

const TRAITS_FILE: &str = "5e-SRD-Traits.json";
const SUBRACES_FILE: &str = "5e-SRD-Subraces.json";
const FEATURES_FILE: &str = "5e-SRD-Features.json";
const LEVELS_FILE: &str = "5e-SRD-Levels.json";
const SUBCLASSES_FILE: &str = "5e-SRD-Subclasses.json";

fn companion(data_dir: &Path, file: &str) -> Vec<Value> {
    loader::load(data_dir, file).unwrap_or_else(|e| {
        log::warn!("{}; the sections it feeds are left out", e);
        Vec::new()
    })
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for Dataset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Dataset::ALL
            .into_iter()
            .find(|d| d.selector() == wanted)
            .ok_or_else(|| ValidationError::UnknownDataset(s.to_string()))
    }
}

/// Parses `--build` selectors: either the single selector `all` or one or
/// more dataset names. Duplicates collapse.
pub fn parse_selection<S: AsRef<str>>(selectors: &[S]) -> Result<Vec<Dataset>, ValidationError> {
    if selectors.is_empty() {
        return Err(ValidationError::InvalidSelection(
            "at least one dataset must be selected".to_string(),
        ));
    }
    let wants_all = selectors
        .iter()
        .any(|s| s.as_ref().trim().eq_ignore_ascii_case(ALL_SELECTOR));
    if wants_all {
        if selectors.len() > 1 {
            return Err(ValidationError::InvalidSelection(
                "'all' cannot be combined with other datasets".to_string(),
            ));
        }
        return Ok(Dataset::ALL.to_vec());
    }

    let mut selected = Vec::new();
    for selector in selectors {
        let dataset: Dataset = selector.as_ref().parse()?;
        if !selected.contains(&dataset) {
            selected.push(dataset);
        }
    }
    Ok(selected)
}

/// Orders `selection` so every dataset comes after the selected datasets it
/// depends on. Ties keep the base order of [`Dataset::ALL`].
pub fn build_order(selection: &[Dataset]) -> Vec<Dataset> {
    let mut pending: Vec<Dataset> = Dataset::ALL
        .into_iter()
        .filter(|d| selection.contains(d))
        .collect();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|d| d.depends_on().iter().all(|dep| !pending.contains(dep)));
        // The declaration table has no cycles; fall back to base order if one appears.
        let next = pending.remove(ready.unwrap_or(0));
        ordered.push(next);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn position(order: &[Dataset], dataset: Dataset) -> usize {
        order.iter().position(|d| *d == dataset).unwrap()
    }

    #[test]
    fn test_selectors_round_trip() {
        for dataset in Dataset::ALL {
            assert_eq!(dataset.selector().parse::<Dataset>(), Ok(dataset));
        }
        assert_eq!("Weapons".parse::<Dataset>(), Ok(Dataset::Weapons));
        assert_eq!(
            "dragons".parse::<Dataset>(),
            Err(ValidationError::UnknownDataset("dragons".to_string()))
        );
    }

    #[test]
    fn test_all_must_stand_alone() {
        assert_eq!(parse_selection(&["all"]).unwrap().len(), 20);
        assert!(matches!(
            parse_selection(&["all", "weapons"]),
            Err(ValidationError::InvalidSelection(_))
        ));
        assert!(parse_selection::<&str>(&[]).is_err());
        assert_eq!(
            parse_selection(&["spells", "spells", "feats"]).unwrap(),
            vec![Dataset::Spells, Dataset::Feats]
        );
    }

    #[test]
    fn test_dependencies_come_first() {
        let order = build_order(&Dataset::ALL);
        assert_eq!(order.len(), 20);
        for dataset in Dataset::ALL {
            for dependency in dataset.depends_on() {
                assert!(position(&order, *dependency) < position(&order, dataset));
            }
        }
        // Items is pulled ahead of classes; skills already precede ability scores.
        assert!(position(&order, Dataset::Items) < position(&order, Dataset::Classes));
        assert_eq!(order[0], Dataset::WeaponProperties);
    }

    #[test]
    fn test_subset_keeps_relative_order() {
        assert_eq!(
            build_order(&[Dataset::Spells, Dataset::Weapons, Dataset::WeaponProperties]),
            vec![Dataset::WeaponProperties, Dataset::Weapons, Dataset::Spells]
        );
        assert_eq!(
            build_order(&[Dataset::Classes, Dataset::Items]),
            vec![Dataset::Items, Dataset::Classes]
        );
    }

    #[test]
    fn test_shared_equipment_file_is_split_by_builder() {
        let dir = tempfile::tempdir().unwrap();
        let dagger = serde_json::json!({"index": "dagger", "equipment_category": {"index": "weapon", "name": "Weapon"}});
        let torch = serde_json::json!({"index": "torch", "equipment_category": {"index": "adventuring-gear", "name": "Adventuring Gear"}});
        let weapons = Dataset::Weapons.builder(dir.path());
        let items = Dataset::Items.builder(dir.path());
        assert!(weapons.includes(&dagger) && !weapons.includes(&torch));
        assert!(items.includes(&torch) && !items.includes(&dagger));
        assert_eq!(Dataset::Classes.builder(dir.path()).label(), "Classes");
    }
}
