//! Linear expressions and comparison constraints.
//!
//! Expressions keep their terms unmerged; the model merges duplicates when an
//! expression is lowered into a row or the objective.

use crate::ids::VariableId;
use crate::types::Bounds;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    /// Row bounds for `expr <sense> rhs`.
    pub fn bounds(self, rhs: f64) -> Bounds {
        match self {
            ComparisonSense::LessEqual => Bounds::new(f64::NEG_INFINITY, rhs),
            ComparisonSense::GreaterEqual => Bounds::new(rhs, f64::INFINITY),
            ComparisonSense::Equal => Bounds::fixed(rhs),
        }
    }
}

/// A linear expression `Σ coeff·var + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    constant: f64,
    linear: Vec<(VariableId, f64)>,
}

impl Expr {
    /// Empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            constant: 0.0,
            linear: vec![(var_id, coeff)],
        }
    }

    /// Sum of variables, each with coefficient 1.0.
    pub fn sum<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = VariableId>,
    {
        Self {
            constant: 0.0,
            linear: vars.into_iter().map(|var| (var, 1.0)).collect(),
        }
    }

    /// Append `coeff * var` in place.
    pub fn push(&mut self, var_id: VariableId, coeff: f64) {
        if coeff != 0.0 {
            self.linear.push((var_id, coeff));
        }
    }

    /// Append every term of `other`, scaled by `by`.
    pub fn extend_scaled(&mut self, other: &Expr, by: f64) {
        self.constant += other.constant * by;
        for (var_id, coeff) in &other.linear {
            self.push(*var_id, coeff * by);
        }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.linear
    }

    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    /// Consume and return (linear_terms, constant).
    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.linear, self.constant)
    }

    /// Merged linear terms with duplicates combined and zeros dropped.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in &self.linear {
            *merged.entry(*var_id).or_insert(0.0) += *coeff;
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    /// Evaluate the expression against a dense vector of primal values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.linear.iter().fold(self.constant, |acc, (var_id, coeff)| {
            acc + coeff * values.get(var_id.index()).copied().unwrap_or(0.0)
        })
    }

    pub fn leq(self, rhs: f64) -> ConstraintExpr {
        self.compare(ComparisonSense::LessEqual, rhs)
    }

    pub fn geq(self, rhs: f64) -> ConstraintExpr {
        self.compare(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn equals(self, rhs: f64) -> ConstraintExpr {
        self.compare(ComparisonSense::Equal, rhs)
    }

    fn compare(self, sense: ComparisonSense, rhs: f64) -> ConstraintExpr {
        let constant = self.constant;
        ConstraintExpr::new(
            Expr {
                constant: 0.0,
                linear: self.linear,
            },
            sense,
            rhs - constant,
        )
    }
}

/// A linear expression compared against a right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    expr: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn zero_coefficients_are_skipped() {
        let mut expr = Expr::term(VariableId::new(0), 0.0);
        assert!(expr.is_empty());
        expr.push(VariableId::new(1), 0.0);
        assert!(expr.is_empty());
    }

    #[test]
    fn normalized_terms_merge_duplicates() {
        let mut expr = Expr::sum([VariableId::new(2), VariableId::new(0)]);
        expr.push(VariableId::new(2), 1.5);
        expr.push(VariableId::new(0), -1.0);
        assert_eq!(expr.normalized_terms(), vec![(VariableId::new(2), 2.5)]);
    }

    #[test]
    fn comparison_moves_constant_to_rhs() {
        let mut expr = Expr::term(VariableId::new(0), 2.0);
        expr.extend_scaled(&Expr::term(VariableId::new(1), 1.0), -3.0);
        let mut shifted = expr.clone();
        shifted.constant = 4.0;

        let constraint = shifted.leq(10.0);
        assert_eq!(constraint.sense(), ComparisonSense::LessEqual);
        assert_eq!(constraint.rhs(), 6.0);
        assert_eq!(constraint.expr().constant(), 0.0);
        assert_eq!(constraint.expr().linear_terms(), expr.linear_terms());
    }

    #[test]
    fn evaluate_uses_dense_values() {
        let mut expr = Expr::term(VariableId::new(0), 2.0);
        expr.push(VariableId::new(2), -1.0);
        assert_eq!(expr.evaluate(&[3.0, 100.0, 1.0]), 5.0);
        // Missing values count as zero.
        assert_eq!(expr.evaluate(&[3.0]), 6.0);
    }
}
