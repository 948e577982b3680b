//! User settings.
//!
//! Precedence is CLI > environment > settings file > defaults; the CLI layer
//! applies its own overrides on top of what the loader returns.

pub mod loader;

pub use loader::load_settings;

use serde::Deserialize;

use crate::remote::DEFAULT_MODEL;

pub const DEFAULT_SERVER_URL: &str = "https://api.repolens.dev";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the digest service.
    pub server_url: String,
    /// Bearer token for the digest service. Usually supplied via the
    /// REPOLENS_TOKEN environment variable instead of the file.
    pub api_token: Option<String>,
    /// Model used for `ask` when none is given on the command line.
    pub model: String,
    /// Default glob filters applied to new generation requests.
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
        }
    }
}
