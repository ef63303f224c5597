//! Lint configuration
//!
//! Three layers, later wins:
//! 1. Built-in defaults
//! 2. Config file (`.cheddar/lint.toml`, or `--config`)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::LintConfig;
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, DEFAULT_CONFIG_PATH};
pub use merge::{deep_merge, merge_layers};
