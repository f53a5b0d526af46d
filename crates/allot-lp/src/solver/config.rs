use serde::Deserialize;

use super::SolverError;

/// Backend options. `None` keeps the backend's own default.
///
/// Deserialises from the `[solver]` table of a run configuration:
///
/// ```toml
/// [solver]
/// time_limit = 30.0
/// mip_gap = 0.01
/// threads = 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Seconds.
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which branch and bound stops.
    pub mip_gap: Option<f64>,
    pub presolve: Option<bool>,
    pub threads: Option<u32>,
    /// Primal and dual feasibility tolerance.
    pub tolerance: Option<f64>,
    /// Let the backend print its own log to stdout.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Fields set in `other` win.
    pub fn merged_with(mut self, other: &SolverConfig) -> Self {
        self.time_limit = other.time_limit.or(self.time_limit);
        self.mip_gap = other.mip_gap.or(self.mip_gap);
        self.presolve = other.presolve.or(self.presolve);
        self.threads = other.threads.or(self.threads);
        self.tolerance = other.tolerance.or(self.tolerance);
        self.log_to_console = other.log_to_console.or(self.log_to_console);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject values no backend accepts.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SolverError> {
        let invalid = |field: &'static str, message: &str| SolverError::InvalidConfig {
            field,
            message: message.to_string(),
        };
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if self.time_limit.is_some_and(|limit| !positive(limit)) {
            return Err(invalid("time_limit", "must be a positive number of seconds"));
        }
        if self
            .mip_gap
            .is_some_and(|gap| !(gap.is_finite() && gap >= 0.0))
        {
            return Err(invalid("mip_gap", "must be a non-negative number"));
        }
        if self.threads == Some(0) {
            return Err(invalid("threads", "must be at least 1"));
        }
        if self.tolerance.is_some_and(|tol| !positive(tol)) {
            return Err(invalid("tolerance", "must be a positive number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_is_empty_and_valid() {
        let config = SolverConfig::new();
        assert!(config.is_empty());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_sets_fields() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_mip_gap(0.01)
            .with_presolve(true)
            .with_threads(4)
            .with_tolerance(1e-6)
            .with_log_to_console(false);

        assert!(!config.is_empty());
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.log_to_console, Some(false));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn overlay_wins_where_set() {
        let base = SolverConfig::new().with_time_limit(30.0).with_threads(2);
        let overlay = SolverConfig::new().with_time_limit(5.0);

        let merged = base.merged_with(&overlay);
        assert_eq!(merged.time_limit, Some(5.0));
        assert_eq!(merged.threads, Some(2));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            (SolverConfig::new().with_time_limit(0.0), "time_limit"),
            (SolverConfig::new().with_time_limit(f64::NAN), "time_limit"),
            (SolverConfig::new().with_mip_gap(-0.5), "mip_gap"),
            (SolverConfig::new().with_threads(0), "threads"),
            (SolverConfig::new().with_tolerance(0.0), "tolerance"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(SolverError::InvalidConfig { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }
}
