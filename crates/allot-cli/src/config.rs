//! Run configuration file.
//!
//! ```toml
//! [model]
//! exceed_cost = 250.0
//! group_cap_policy = "allocated_only"
//!
//! [solver]
//! time_limit = 30.0
//! mip_gap = 0.01
//! ```

use std::fmt;
use std::path::Path;

use allot_core::ModelOptions;
use allot_lp::SolverConfig;
use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse { path: String, message: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO",
            ConfigError::Parse { .. } => "CONFIG_PARSE",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "[{}] cannot read {path}: {message}", self.code())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "[{}] invalid config {path}: {message}", self.code())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// `[model]` and `[solver]` tables; both optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub model: ModelOptions,
    pub solver: SolverConfig,
}

impl RunConfig {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: origin.to_string(),
            message: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: origin.clone(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&text, &origin)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use allot_core::GroupCapPolicy;
    use tempfile::tempdir;

    #[test]
    fn empty_file_gives_defaults() {
        let config = RunConfig::from_toml_str("", "inline").unwrap();
        assert_eq!(config, RunConfig::default());
        assert!(config.solver.is_empty());
    }

    #[test]
    fn reads_model_and_solver_tables() {
        let config = RunConfig::from_toml_str(
            r#"
            [model]
            exceed_cost = 250.0
            group_cap_policy = "allocated_only"
            integral = false

            [solver]
            time_limit = 30.0
            threads = 2
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.model.exceed_cost, 250.0);
        assert_eq!(config.model.group_cap_policy, GroupCapPolicy::AllocatedOnly);
        assert!(!config.model.integral);
        assert!(config.model.include_exceed_penalty);
        assert_eq!(config.solver.time_limit, Some(30.0));
        assert_eq!(config.solver.threads, Some(2));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RunConfig::from_toml_str("[model]\nexceed = 1.0\n", "inline").unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE");
        let err = RunConfig::from_toml_str("[output]\n", "inline").unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allot.toml");
        let err = RunConfig::load(&path).unwrap_err();
        assert_eq!(err.code(), "CONFIG_IO");

        std::fs::write(&path, "[solver]\nmip_gap = 0.05\n").unwrap();
        let config = RunConfig::load_optional(Some(&path)).unwrap();
        assert_eq!(config.solver.mip_gap, Some(0.05));
        assert_eq!(RunConfig::load_optional(None).unwrap(), RunConfig::default());
    }
}
