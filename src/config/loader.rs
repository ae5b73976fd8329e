//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/articleweave/config.toml)
//! 3. Project config (./articleweave.toml)
//! 4. Environment variables (ARTICLEWEAVE_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{Result, WeaveError};

/// Environment variable holding the text-generation / embedding key
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the research provider key
pub const TAVILY_KEY_VAR: &str = "TAVILY_API_KEY";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_with_project(&Self::project_config_path())
    }

    /// Same as [`ConfigLoader::load`] with an explicit project config file
    pub fn load_with_project(project_path: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        // ARTICLEWEAVE_LLM__MODEL -> llm.model
        figment = figment.merge(Env::prefixed("ARTICLEWEAVE_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| WeaveError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/articleweave/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("articleweave"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("articleweave.toml")
    }

    // =========================================================================
    // Secrets
    // =========================================================================

    /// Read a required secret from the environment (after `.env` loading)
    pub fn require_secret(name: &str) -> Result<SecretString> {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
            _ => Err(WeaveError::Config(format!(
                "Missing environment variable {}. Set it in .env or shell.",
                name
            ))),
        }
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(config: &Config, format: &str) -> Result<()> {
        match format {
            "json" => println!("{}", serde_json::to_string_pretty(config)?),
            "yaml" => println!("{}", serde_yaml::to_string(config)?),
            _ => println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| WeaveError::Config(e.to_string()))?
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_project_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[llm]
model = "gpt-4o"

[generation]
similarity_threshold = 0.85
polish = true
"#
        )
        .unwrap();

        let config = ConfigLoader::load_with_project(file.path()).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert!(config.generation.polish);
        assert!((config.generation.similarity_threshold - 0.85).abs() < 1e-6);
        // Untouched sections keep their defaults
        assert_eq!(config.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn test_project_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[generation]\nsimilarity_threshold = 1.5").unwrap();
        assert!(ConfigLoader::load_with_project(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\nprovider = \"x\"").unwrap();
        assert!(ConfigLoader::load_with_project(file.path()).is_err());
    }

    #[test]
    fn test_env_override() {
        // SAFETY: this is the only test touching this variable
        unsafe {
            env::set_var("ARTICLEWEAVE_EMBEDDING__MODEL", "test-embed-model");
        }
        let config = ConfigLoader::load_with_project(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.embedding.model, "test-embed-model");
        unsafe {
            env::remove_var("ARTICLEWEAVE_EMBEDDING__MODEL");
        }
    }

    #[test]
    fn test_require_secret_missing() {
        let err = ConfigLoader::require_secret("ARTICLEWEAVE_TEST_SURELY_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("ARTICLEWEAVE_TEST_SURELY_UNSET_KEY"));
    }
}
