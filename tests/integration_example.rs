// tests/integration_example.rs

use std::path::PathBuf;
use tmx_pipeline::Map;

fn asset(name: &str) -> PathBuf {
    let mut assets = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    assets.push("tests");
    assets.push("assets");
    assets.push(name);
    assets
}

#[test]
fn example_load_assets() {
    let map = Map::load(asset("level_csv.tmx")).expect("Example assets should load");
    assert_eq!(map.layers.len(), 2);
    assert_eq!(map.atlases.len(), 2);
}

#[test]
fn csv_and_base64_levels_are_identical() {
    let csv = Map::load(asset("level_csv.tmx")).expect("csv level");
    let b64 = Map::load(asset("level_base64.tmx")).expect("base64 level");
    assert_eq!(csv, b64);
}
