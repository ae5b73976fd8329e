//! Config Command
//!
//! Inspect articleweave configuration.
//!
//! Usage:
//!   articleweave config show [-f toml|json|yaml]
//!   articleweave config path

use std::path::Path;

use crate::config::{ConfigLoader, OPENAI_KEY_VAR, TAVILY_KEY_VAR};
use crate::types::Result;

/// Show the effective configuration (defaults, files and environment merged)
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_with_project(path)?,
        None => ConfigLoader::load()?,
    };
    ConfigLoader::show_config(&config, format)
}

/// Show configuration paths and whether the API keys are present
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    println!();
    for var in [OPENAI_KEY_VAR, TAVILY_KEY_VAR] {
        let state = if ConfigLoader::require_secret(var).is_ok() {
            "set"
        } else {
            "missing"
        };
        println!("  {:<15} {}", var, state);
    }
    Ok(())
}
