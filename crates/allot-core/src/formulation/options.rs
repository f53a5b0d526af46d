//! Feature flags for the allocation model.

use serde::{Deserialize, Serialize};

/// Penalty per unit of overflow volume.
pub const DEFAULT_EXCEED_COST: f64 = 100.0;

/// Which volume the per-group maximum share caps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupCapPolicy {
    /// Allocated and overflow volume, mirroring the minimum-share row.
    #[default]
    AllocatedAndOverflow,
    /// Only delivered volume; overflow is not capped.
    AllocatedOnly,
}

impl GroupCapPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupCapPolicy::AllocatedAndOverflow => "allocated_and_overflow",
            GroupCapPolicy::AllocatedOnly => "allocated_only",
        }
    }

    pub(crate) fn caps_overflow(self) -> bool {
        matches!(self, GroupCapPolicy::AllocatedAndOverflow)
    }
}

/// Options controlling which variables, rows and objective terms are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelOptions {
    /// Objective weight of each overflow unit.
    pub exceed_cost: f64,
    /// Create overflow variables. Without them a tight capacity makes the model infeasible.
    pub include_exceed_penalty: bool,
    /// Create carry-over variables where towns carry delivery-mode data.
    pub include_carry_over: bool,
    pub group_cap_policy: GroupCapPolicy,
    /// Declare volume variables integer.
    pub integral: bool,
    /// Re-solve once without global minimum shares after an infeasible solve.
    pub relax_on_infeasible: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            exceed_cost: DEFAULT_EXCEED_COST,
            include_exceed_penalty: true,
            include_carry_over: false,
            group_cap_policy: GroupCapPolicy::default(),
            integral: true,
            relax_on_infeasible: false,
        }
    }
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exceed_cost(mut self, cost: f64) -> Self {
        self.exceed_cost = cost;
        self
    }

    pub fn with_exceed_penalty(mut self, enabled: bool) -> Self {
        self.include_exceed_penalty = enabled;
        self
    }

    pub fn with_carry_over(mut self, enabled: bool) -> Self {
        self.include_carry_over = enabled;
        self
    }

    pub fn with_group_cap_policy(mut self, policy: GroupCapPolicy) -> Self {
        self.group_cap_policy = policy;
        self
    }

    pub fn with_integral(mut self, integral: bool) -> Self {
        self.integral = integral;
        self
    }

    pub fn with_relax_on_infeasible(mut self, enabled: bool) -> Self {
        self.relax_on_infeasible = enabled;
        self
    }
}
