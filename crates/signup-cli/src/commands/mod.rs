pub mod check;
pub mod rules;

use anyhow::Result;
use signup_validation_core::Config;
use std::path::Path;

/// Explicit path must exist; otherwise fall back to ./signup.toml or defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            anyhow::ensure!(path.exists(), "Config file not found: {:?}", path);
            Config::load(path)
        }
        None => Config::load_default(),
    }
}
