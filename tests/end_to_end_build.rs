// tests/end_to_end_build.rs
//! Full builds against the in-memory workspace, driven through the public API.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use srd2notion::constants::CATEGORY_PROPERTY;
use srd2notion::model::RichTextKind;
use srd2notion::{
    Block, BuildConfig, CommandLineInput, Dataset, DatasetStatus, InMemoryWorkspace, Pipeline,
    PropertyValue,
};
use std::path::Path;
use std::sync::Arc;

fn write(dir: &Path, file: &str, records: Value) {
    std::fs::write(dir.join(file), records.to_string()).unwrap();
}

fn weapon(index: &str, name: &str, dice: &str, cost: u32, properties: &[&str]) -> Value {
    let properties: Vec<Value> = properties
        .iter()
        .map(|p| json!({"index": p.to_lowercase(), "name": p}))
        .collect();
    json!({
        "index": index,
        "name": name,
        "equipment_category": {"index": "weapon", "name": "Weapon"},
        "weapon_category": "Simple",
        "category_range": "Simple Melee",
        "cost": {"quantity": cost, "unit": "gp"},
        "damage": {"damage_dice": dice, "damage_type": {"index": "piercing", "name": "Piercing"}},
        "range": {"normal": 5},
        "weight": 1,
        "properties": properties
    })
}

fn config_from_args(dir: &Path, args: &[&str]) -> BuildConfig {
    let data_dir = dir.to_string_lossy().to_string();
    let mut argv = vec![
        "srd2notion",
        "--database_id",
        "550e8400e29b41d4a716446655440000",
        "--dry-run",
        "--pace-ms",
        "0",
        "--data-dir",
        &data_dir,
    ];
    argv.extend_from_slice(args);
    let cli = <CommandLineInput as clap::Parser>::try_parse_from(argv).unwrap();
    BuildConfig::resolve_with(cli, None).unwrap()
}

#[tokio::test]
async fn index_window_publishes_only_the_first_weapon() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "5e-SRD-Equipment.json",
        json!([
            weapon("dagger", "Dagger", "1d4", 2, &["Finesse", "Light"]),
            weapon("spear", "Spear", "1d6", 1, &["Thrown"]),
        ]),
    );
    let config = config_from_args(
        dir.path(),
        &["--build", "weapons", "--start_range", "0", "--end_range", "1"],
    );
    let workspace = Arc::new(InMemoryWorkspace::new());
    let report = Pipeline::new(&config, workspace.clone()).run().await;

    assert!(report.is_success());
    assert_eq!(report.published(), 1);

    let pages = workspace.pages();
    assert_eq!(pages.len(), 1);
    let dagger = &pages[0];
    assert_eq!(dagger.title(), "Dagger");
    assert_eq!(
        dagger.properties.get("Damage"),
        Some(&PropertyValue::text("1d4"))
    );
    assert_eq!(
        dagger.properties.get("Cost"),
        Some(&PropertyValue::text("2 gp"))
    );
    assert_eq!(
        dagger.properties.get("Properties"),
        Some(&PropertyValue::multi_select(["Finesse", "Light"]))
    );
    assert_eq!(
        dagger.properties.get(CATEGORY_PROPERTY),
        Some(&PropertyValue::select("Weapons"))
    );
}

#[tokio::test]
async fn weapon_properties_are_mentioned_once_published() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "5e-SRD-Weapon-Properties.json",
        json!([
            {"index": "finesse", "name": "Finesse", "desc": ["Use Strength or Dexterity."]},
            {"index": "light", "name": "Light", "desc": ["Ideal for two-weapon fighting."]}
        ]),
    );
    write(
        dir.path(),
        "5e-SRD-Equipment.json",
        json!([weapon("dagger", "Dagger", "1d4", 2, &["Finesse", "Light"])]),
    );
    // Selected in the wrong order on purpose.
    let config = config_from_args(dir.path(), &["--build", "weapons", "weapon-properties"]);
    assert_eq!(
        config.datasets,
        vec![Dataset::WeaponProperties, Dataset::Weapons]
    );

    let workspace = Arc::new(InMemoryWorkspace::new());
    let report = Pipeline::new(&config, workspace.clone()).run().await;
    assert_eq!(report.published(), 3);
    assert_eq!(report.dataset(Dataset::Weapons).unwrap().mentions, 2);

    let finesse = workspace.page_titled("Finesse").unwrap();
    let dagger = workspace.page_titled("Dagger").unwrap();
    let mentioned: Vec<_> = dagger
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
        .flat_map(|table| table.rows().iter().flatten().flatten())
        .filter_map(|run| match &run.kind {
            RichTextKind::Mention(page) => Some(page.clone()),
            _ => None,
        })
        .collect();
    assert!(mentioned.contains(&finesse.id));
}

#[tokio::test]
async fn missing_files_skip_without_failing_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_from_args(dir.path(), &["--build", "spells", "conditions"]);
    let workspace = Arc::new(InMemoryWorkspace::new());
    let report = Pipeline::new(&config, workspace.clone()).run().await;

    assert!(report.is_success());
    assert_eq!(report.published(), 0);
    assert!(report
        .datasets
        .iter()
        .all(|d| matches!(d.status, DatasetStatus::Skipped(_))));
    assert!(workspace.calls().is_empty());
}
