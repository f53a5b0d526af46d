use crate::ids::VariableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Closed interval `[lower, upper]`; either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// `[0, upper]`.
    pub fn up_to(upper: f64) -> Self {
        Self::new(0.0, upper)
    }

    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub(crate) fn is_valid(&self) -> bool {
        !(self.lower.is_nan() || self.upper.is_nan()) && self.lower <= self.upper
    }
}

/// A column: bounds plus integrality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub bounds: Bounds,
    pub is_integer: bool,
}

impl Variable {
    pub fn continuous(bounds: Bounds) -> Self {
        Self::with_integrality(bounds, false)
    }

    pub fn integer(bounds: Bounds) -> Self {
        Self::with_integrality(bounds, true)
    }

    pub fn with_integrality(bounds: Bounds, is_integer: bool) -> Self {
        Self { bounds, is_integer }
    }
}

/// A row: `lower <= a.x <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub bounds: Bounds,
}

/// Linear objective. `sense` is `None` until one is set.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub sense: Option<Sense>,
    pub terms: Vec<(VariableId, f64)>,
}
