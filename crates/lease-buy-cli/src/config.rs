use std::fs;

use lease_buy_core::SimpleDefaults;

use crate::input::file::resolve_path;

/// Load simple-mode defaults, overriding the built-in values with any keys
/// present in the TOML file at `path`.
pub fn load_defaults(path: Option<&str>) -> Result<SimpleDefaults, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(SimpleDefaults::default());
    };

    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let defaults: SimpleDefaults = toml::from_str(&contents)
        .map_err(|e| format!("Failed to parse defaults '{}': {}", canonical.display(), e))?;

    tracing::debug!(path = %canonical.display(), ?defaults, "loaded defaults file");
    Ok(defaults)
}
