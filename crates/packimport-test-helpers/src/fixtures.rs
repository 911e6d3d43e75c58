//! Test fixtures - module sources and packaged resource sets

use packimport_core::{MemoryStore, PackageBuilder};
use std::path::Path;

/// The module the resource scenarios import as `tools.util`
pub fn tools_util_source() -> &'static str {
    "VALUE = 1\n"
}

pub fn settings_source() -> &'static str {
    r#"# game settings
TITLE = "Space Miners"
MAX_PLAYERS = 4
GRAVITY = 9.81
DEBUG = False
"#
}

/// Source that fails on its third line
pub fn broken_source() -> &'static str {
    "A = 1\nB = 2\nC = not a literal\n"
}

/// Same module name, different origins; `SOURCE` tells them apart
pub fn shadowed_source(origin: &str) -> String {
    format!("SOURCE = '{origin}'\n")
}

/// Resources keyed the way the resource finder looks them up
pub fn game_resources() -> Vec<(&'static str, String)> {
    vec![
        ("tools.util.py", tools_util_source().to_string()),
        ("settings.py", settings_source().to_string()),
        ("broken.py", broken_source().to_string()),
    ]
}

pub fn game_store() -> MemoryStore {
    MemoryStore::from_entries(game_resources())
}

pub fn game_package() -> Vec<u8> {
    let mut builder = PackageBuilder::new();
    for (name, source) in game_resources() {
        builder
            .add(name, source)
            .expect("fixture resource names are unique");
    }
    builder.build()
}

/// Write every fixture resource as a file under `dir`
pub fn write_resource_dir(dir: &Path) -> std::io::Result<()> {
    for (name, source) in game_resources() {
        std::fs::write(dir.join(name), source)?;
    }
    Ok(())
}
