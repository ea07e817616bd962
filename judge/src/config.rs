use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use sls::GameConfig;

/// Reads a [`GameConfig`] from a JSON file. Missing fields get their default values.
pub fn load_game_config(path: &Path) -> anyhow::Result<GameConfig> {
    let file = File::open(path)
        .with_context(|| format!("Could not open config file '{}'", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Could not parse config file '{}'", path.display()))?;
    Ok(config)
}
