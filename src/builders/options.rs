// src/builders/options.rs
//! Option names shared by several schemas.

pub(crate) const ABILITY_ABBREVIATIONS: [&str; 6] = ["STR", "DEX", "CON", "INT", "WIS", "CHA"];

pub(crate) const SKILLS: [&str; 18] = [
    "Acrobatics",
    "Animal Handling",
    "Arcana",
    "Athletics",
    "Deception",
    "History",
    "Insight",
    "Intimidation",
    "Investigation",
    "Medicine",
    "Nature",
    "Perception",
    "Performance",
    "Persuasion",
    "Religion",
    "Sleight of Hand",
    "Stealth",
    "Survival",
];

pub(crate) const DAMAGE_TYPES: [&str; 13] = [
    "Acid",
    "Bludgeoning",
    "Cold",
    "Fire",
    "Force",
    "Lightning",
    "Necrotic",
    "Piercing",
    "Poison",
    "Psychic",
    "Radiant",
    "Slashing",
    "Thunder",
];

pub(crate) const MAGIC_SCHOOLS: [&str; 8] = [
    "Abjuration",
    "Conjuration",
    "Divination",
    "Enchantment",
    "Evocation",
    "Illusion",
    "Necromancy",
    "Transmutation",
];

pub(crate) const CLASSES: [&str; 12] = [
    "Barbarian",
    "Bard",
    "Cleric",
    "Druid",
    "Fighter",
    "Monk",
    "Paladin",
    "Ranger",
    "Rogue",
    "Sorcerer",
    "Warlock",
    "Wizard",
];

pub(crate) const SUBCLASSES: [&str; 12] = [
    "Berserker",
    "Champion",
    "Devotion",
    "Draconic",
    "Evocation",
    "Fiend",
    "Hunter",
    "Land",
    "Life",
    "Lore",
    "Open Hand",
    "Thief",
];

pub(crate) const RACES: [&str; 9] = [
    "Dragonborn",
    "Dwarf",
    "Elf",
    "Gnome",
    "Half-Elf",
    "Half-Orc",
    "Halfling",
    "Human",
    "Tiefling",
];

pub(crate) const SUBRACES: [&str; 4] = ["Hill Dwarf", "High Elf", "Lightfoot Halfling", "Rock Gnome"];

pub(crate) const LANGUAGES: [&str; 8] = [
    "Common",
    "Draconic",
    "Dwarvish",
    "Elvish",
    "Gnomish",
    "Halfling",
    "Infernal",
    "Orc",
];
