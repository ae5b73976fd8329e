//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/articleweave/config.toml)
//! 3. Project config (./articleweave.toml)
//! 4. Environment variables (ARTICLEWEAVE_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::{ConfigLoader, OPENAI_KEY_VAR, TAVILY_KEY_VAR};
pub use types::*;
