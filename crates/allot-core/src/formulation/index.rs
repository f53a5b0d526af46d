//! Position-to-column lookup for the allocation variables.

use allot_lp::VariableId;

/// Depot, cargo and town counts of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub depots: usize,
    pub cargos: usize,
    pub towns: usize,
}

impl Dimensions {
    /// Number of (depot, cargo, town) triples.
    pub fn triples(&self) -> usize {
        self.depots * self.cargos * self.towns
    }

    pub(crate) fn slot(&self, d: usize, i: usize, k: usize) -> usize {
        debug_assert!(d < self.depots && i < self.cargos && k < self.towns);
        (d * self.cargos + i) * self.towns + k
    }
}

/// Column handles of `a[i]`, `x[d][i][k]`, `z[d][i][k]` and `c[d][i][k]`.
///
/// Triples are stored flat with the town index varying fastest.
#[derive(Debug, Clone)]
pub struct VariableIndex {
    dims: Dimensions,
    pub(crate) aggregate: Vec<VariableId>,
    pub(crate) allocated: Vec<VariableId>,
    pub(crate) overflow: Option<Vec<VariableId>>,
    pub(crate) carry_over: Option<Vec<Option<VariableId>>>,
}

impl VariableIndex {
    pub(crate) fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            aggregate: Vec::with_capacity(dims.cargos),
            allocated: Vec::with_capacity(dims.triples()),
            overflow: None,
            carry_over: None,
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// `a[i]`.
    pub fn aggregate(&self, i: usize) -> VariableId {
        self.aggregate[i]
    }

    /// `x[d][i][k]`.
    pub fn allocated(&self, d: usize, i: usize, k: usize) -> VariableId {
        self.allocated[self.dims.slot(d, i, k)]
    }

    /// `z[d][i][k]`, absent when the exceed penalty is disabled.
    pub fn overflow(&self, d: usize, i: usize, k: usize) -> Option<VariableId> {
        let slot = self.dims.slot(d, i, k);
        self.overflow.as_ref().map(|vars| vars[slot])
    }

    /// `c[d][i][k]`, present only where carry-over data exists.
    pub fn carry_over(&self, d: usize, i: usize, k: usize) -> Option<VariableId> {
        let slot = self.dims.slot(d, i, k);
        self.carry_over.as_ref().and_then(|vars| vars[slot])
    }

    /// Every column carrying volume for a triple: `x`, then `z` and `c` when present.
    pub fn volume(&self, d: usize, i: usize, k: usize) -> impl Iterator<Item = VariableId> {
        [
            Some(self.allocated(d, i, k)),
            self.overflow(d, i, k),
            self.carry_over(d, i, k),
        ]
        .into_iter()
        .flatten()
    }

    /// Delivered columns for a triple: `x` and `c`, never `z`.
    pub fn delivered(&self, d: usize, i: usize, k: usize) -> impl Iterator<Item = VariableId> {
        [Some(self.allocated(d, i, k)), self.carry_over(d, i, k)]
            .into_iter()
            .flatten()
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow.is_some()
    }

    pub fn has_carry_over(&self) -> bool {
        self.carry_over
            .as_ref()
            .is_some_and(|vars| vars.iter().any(Option::is_some))
    }
}
