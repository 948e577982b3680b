//! Settings file loading.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Settings;

/// Load settings from `settings_path`, or from a discovered file in
/// `search_dir` when no explicit path was given.
///
/// An explicitly provided file that fails to parse is a hard error; an
/// auto-discovered one warns and falls back to defaults, so a stray broken
/// file never bricks the CLI.
pub fn load_settings(search_dir: &Path, settings_path: Option<&Path>) -> Result<Settings> {
    let path_provided = settings_path.is_some();

    let discovered = match settings_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_settings(search_dir),
    };

    let Some(settings_file) = discovered else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(&settings_file)
        .with_context(|| format!("Failed reading settings file: {}", settings_file.display()))?;

    let ext =
        settings_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_settings(&content, &settings_file),
        "yaml" | "yml" => parse_yaml_settings(&content, &settings_file),
        other => Err(anyhow::anyhow!(
            "Unsupported settings extension '.{}' for file {}",
            other,
            settings_file.display()
        )),
    };

    match parsed {
        Ok(settings) => Ok(settings),
        Err(e) if path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Failed to parse auto-discovered settings {}: {}",
                settings_file.display(),
                e
            );
            Ok(Settings::default())
        }
    }
}

/// Parse TOML settings, supporting a nested [repolens] section so the file
/// can live inside a larger project config.
fn parse_toml_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", settings_file.display()))?;

    let value = match raw.get("repolens") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    value
        .try_into()
        .with_context(|| format!("Invalid settings: {}", settings_file.display()))
}

fn parse_yaml_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", settings_file.display()))?;

    let value = match raw.get("repolens") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(value)
        .with_context(|| format!("Invalid settings: {}", settings_file.display()))
}

fn discover_settings(search_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "repolens.toml",
        ".repolens.toml",
        "repolens.yml",
        ".repolens.yml",
        "repolens.yaml",
        ".repolens.yaml",
    ];

    for candidate in candidates {
        let path = search_dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}
