//! Translation of a [`Partition`] into a linear program.
//!
//! Variables, in column order:
//!
//! - `a[i]`: total volume of cargo `i`, bounded by the order amount
//! - `x[d][i][k]`: volume delivered to town `k` by cargo `i` from depot `d`
//! - `z[d][i][k]`: overflow volume, penalised by the exceed cost
//! - `c[d][i][k]`: carry-over volume, only where delivery-mode data exists
//!
//! Rows: global balance, town balance, cargo linkage, global share window,
//! per-group share window and depot capacity. The objective minimises NPS
//! weighted delivery plus overflow penalty.

mod error;
mod index;
mod options;

use std::time::Instant;

use allot_lp::{Bounds, Expr, Model, Variable, VariableId};
use tracing::{debug, trace};

use crate::entity::{CargoId, DeliveryModes};
use crate::partition::Partition;

pub use error::FormulationError;
pub use index::{Dimensions, VariableIndex};
pub use options::{DEFAULT_EXCEED_COST, GroupCapPolicy, ModelOptions};

/// Size of a built model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ModelSize {
    pub variables: usize,
    pub integer_variables: usize,
    pub constraints: usize,
    pub nonzeros: usize,
}

/// A built allocation model and the handles needed to read its solution.
#[derive(Debug, Clone)]
pub struct AllocationModel {
    model: Model,
    index: VariableIndex,
    order_amount: f64,
    relaxed: bool,
}

impl AllocationModel {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn index(&self) -> &VariableIndex {
        &self.index
    }

    pub fn dims(&self) -> Dimensions {
        self.index.dims()
    }

    pub fn order_amount(&self) -> f64 {
        self.order_amount
    }

    /// Whether the global minimum-share rows were left out.
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    pub fn size(&self) -> ModelSize {
        ModelSize {
            variables: self.model.num_variables(),
            integer_variables: self
                .model
                .variables()
                .filter(|(_, var)| var.is_integer)
                .count(),
            constraints: self.model.num_constraints(),
            nonzeros: self.model.num_coefficients(),
        }
    }
}

/// Builds an [`AllocationModel`] from a partition and options.
#[derive(Debug, Clone, Copy)]
pub struct ModelBuilder<'a> {
    partition: &'a Partition,
    options: &'a ModelOptions,
    relaxed: bool,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(partition: &'a Partition, options: &'a ModelOptions) -> Self {
        Self {
            partition,
            options,
            relaxed: false,
        }
    }

    /// Leave out the global minimum-share rows.
    pub fn relaxed(mut self, relaxed: bool) -> Self {
        self.relaxed = relaxed;
        self
    }

    /// Build variables, objective and rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the exceed cost is not a finite non-negative
    /// number or if the model rejects a bound or coefficient.
    pub fn build(self) -> Result<AllocationModel, FormulationError> {
        let started = Instant::now();
        let exceed_cost = self.options.exceed_cost;
        if self.options.include_exceed_penalty && (!exceed_cost.is_finite() || exceed_cost < 0.0)
        {
            return Err(FormulationError::InvalidExceedCost(exceed_cost));
        }

        let p = self.partition;
        let dims = Dimensions {
            depots: p.num_depots(),
            cargos: p.num_cargos(),
            towns: p.num_towns(),
        };
        let per_triple = 1
            + usize::from(self.options.include_exceed_penalty)
            + usize::from(self.options.include_carry_over);
        let rows = 1 + dims.depots * dims.towns + 3 * dims.cargos
            + 2 * dims.cargos * dims.towns
            + dims.depots * dims.cargos;
        let mut model = Model::with_capacities(dims.cargos + per_triple * dims.triples(), rows);
        let mut index = VariableIndex::new(dims);

        self.add_variables(&mut model, &mut index)?;
        self.set_objective(&mut model, &index)?;
        self.add_balance_rows(&mut model, &index)?;
        self.add_share_rows(&mut model, &index)?;
        self.add_capacity_rows(&mut model, &index)?;

        debug!(
            component = "formulation",
            operation = "build",
            status = "success",
            depots = dims.depots,
            cargos = dims.cargos,
            towns = dims.towns,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            nnz = model.num_coefficients(),
            relaxed = self.relaxed,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built allocation model"
        );

        Ok(AllocationModel {
            model,
            index,
            order_amount: p.order_amount(),
            relaxed: self.relaxed,
        })
    }

    fn carry_over_modes(&self, d: usize, i: usize, k: usize) -> Option<DeliveryModes> {
        if !self.options.include_carry_over {
            return None;
        }
        let cargo = self.partition.cargo(d, i).id();
        self.partition.town(d, k).delivery_modes(cargo)
    }

    fn triple_name(&self, var: &str, d: usize, i: usize, k: usize) -> String {
        let p = self.partition;
        format!(
            "{var}[{},{},{}]",
            p.depot(d).id(),
            p.cargo(d, i).id(),
            p.town(d, k).id()
        )
    }

    fn cargo_id(&self, i: usize) -> &CargoId {
        self.partition.cargo(0, i).id()
    }

    fn add_variables(
        &self,
        model: &mut Model,
        index: &mut VariableIndex,
    ) -> Result<(), FormulationError> {
        let dims = index.dims();
        let integral = self.options.integral;
        let order_amount = self.partition.order_amount();

        for i in 0..dims.cargos {
            let var = Variable::with_integrality(Bounds::up_to(order_amount), integral);
            let id = model.add_named_variable(var, format!("a[{}]", self.cargo_id(i)))?;
            index.aggregate.push(id);
        }

        for d in 0..dims.depots {
            for i in 0..dims.cargos {
                for k in 0..dims.towns {
                    let upper = self
                        .carry_over_modes(d, i, k)
                        .map_or(f64::INFINITY, |modes| modes.same_day_capacity);
                    let var = Variable::with_integrality(Bounds::up_to(upper), integral);
                    let id = model.add_named_variable(var, self.triple_name("x", d, i, k))?;
                    index.allocated.push(id);
                }
            }
        }

        if self.options.include_exceed_penalty {
            let mut overflow = Vec::with_capacity(dims.triples());
            for d in 0..dims.depots {
                for i in 0..dims.cargos {
                    for k in 0..dims.towns {
                        let var = Variable::with_integrality(Bounds::non_negative(), integral);
                        overflow.push(model.add_named_variable(var, self.triple_name("z", d, i, k))?);
                    }
                }
            }
            index.overflow = Some(overflow);
        }

        if self.options.include_carry_over {
            let mut carry_over = Vec::with_capacity(dims.triples());
            for d in 0..dims.depots {
                for i in 0..dims.cargos {
                    for k in 0..dims.towns {
                        let id = match self.carry_over_modes(d, i, k) {
                            Some(modes) => {
                                let bounds = Bounds::up_to(modes.carry_over_capacity);
                                let var = Variable::with_integrality(bounds, integral);
                                Some(model.add_named_variable(var, self.triple_name("c", d, i, k))?)
                            }
                            None => None,
                        };
                        carry_over.push(id);
                    }
                }
            }
            index.carry_over = Some(carry_over);
        }

        trace!(
            component = "formulation",
            operation = "add_variables",
            status = "success",
            variables = model.num_variables(),
            overflow = index.has_overflow(),
            carry_over = index.has_carry_over(),
            "Declared allocation variables"
        );
        Ok(())
    }

    fn set_objective(&self, model: &mut Model, index: &VariableIndex) -> Result<(), FormulationError> {
        let p = self.partition;
        let dims = index.dims();
        let mut objective = Expr::new();
        for d in 0..dims.depots {
            for i in 0..dims.cargos {
                let cargo = p.cargo(d, i).id();
                for k in 0..dims.towns {
                    // Partition validation guarantees a score for every cargo.
                    let score = p.town(d, k).score(cargo).unwrap_or_default();
                    let modes = self.carry_over_modes(d, i, k);
                    let same_day_cost = modes.map_or(0.0, |m| m.same_day_cost);
                    objective.push(index.allocated(d, i, k), score + same_day_cost);
                    if let Some(z) = index.overflow(d, i, k) {
                        objective.push(z, self.options.exceed_cost);
                    }
                    if let (Some(c), Some(modes)) = (index.carry_over(d, i, k), modes) {
                        objective.push(c, score + modes.carry_over_cost);
                    }
                }
            }
        }
        model.minimize(objective)?;
        Ok(())
    }

    fn add_balance_rows(
        &self,
        model: &mut Model,
        index: &VariableIndex,
    ) -> Result<(), FormulationError> {
        let p = self.partition;
        let dims = index.dims();
        let order_amount = p.order_amount();

        let total = Expr::sum(index.aggregate.iter().copied());
        model.add_named_constraint(total.equals(order_amount), "global_balance")?;

        for d in 0..dims.depots {
            for k in 0..dims.towns {
                let expr = Expr::sum((0..dims.cargos).flat_map(|i| index.volume(d, i, k)));
                model.add_named_constraint(
                    expr.equals(p.demand(d, k)),
                    format!("town_balance[{},{}]", p.depot(d).id(), p.town(d, k).id()),
                )?;
            }
        }

        for i in 0..dims.cargos {
            let mut expr = Expr::sum(
                (0..dims.depots)
                    .flat_map(|d| (0..dims.towns).map(move |k| (d, k)))
                    .flat_map(|(d, k)| index.volume(d, i, k)),
            );
            expr.push(index.aggregate(i), -1.0);
            model.add_named_constraint(
                expr.equals(0.0),
                format!("cargo_link[{}]", self.cargo_id(i)),
            )?;
        }
        Ok(())
    }

    fn add_share_rows(
        &self,
        model: &mut Model,
        index: &VariableIndex,
    ) -> Result<(), FormulationError> {
        let p = self.partition;
        let dims = index.dims();
        let order_amount = p.order_amount();

        for i in 0..dims.cargos {
            let cargo = p.cargo(0, i);
            let window = cargo.global_ratio();
            let a = index.aggregate(i);
            if !self.relaxed {
                model.add_named_constraint(
                    Expr::term(a, 1.0).geq(window.min * order_amount),
                    format!("global_min[{}]", cargo.id()),
                )?;
            }
            model.add_named_constraint(
                Expr::term(a, 1.0).leq(window.max * order_amount),
                format!("global_max[{}]", cargo.id()),
            )?;
        }

        let caps_overflow = self.options.group_cap_policy.caps_overflow();
        for i in 0..dims.cargos {
            let cargo = p.cargo(0, i);
            for k in 0..dims.towns {
                let town = p.town(0, k);
                // Partition validation guarantees a window for every group in use.
                let Some(window) = cargo.group_ratio(town.group()) else {
                    continue;
                };
                let demand = p.town_demand_total(k);

                let lower = Expr::sum((0..dims.depots).flat_map(|d| index.volume(d, i, k)));
                model.add_named_constraint(
                    lower.geq(window.min * demand),
                    format!("group_min[{},{}]", cargo.id(), town.id()),
                )?;

                let capped: Vec<VariableId> = if caps_overflow {
                    (0..dims.depots).flat_map(|d| index.volume(d, i, k)).collect()
                } else {
                    (0..dims.depots).flat_map(|d| index.delivered(d, i, k)).collect()
                };
                model.add_named_constraint(
                    Expr::sum(capped).leq(window.max * demand),
                    format!("group_max[{},{}]", cargo.id(), town.id()),
                )?;
            }
        }
        Ok(())
    }

    fn add_capacity_rows(
        &self,
        model: &mut Model,
        index: &VariableIndex,
    ) -> Result<(), FormulationError> {
        let p = self.partition;
        let dims = index.dims();
        for d in 0..dims.depots {
            for i in 0..dims.cargos {
                let expr = Expr::sum((0..dims.towns).flat_map(|k| index.delivered(d, i, k)));
                model.add_named_constraint(
                    expr.leq(p.capacity(d, i)),
                    format!("depot_capacity[{},{}]", p.depot(d).id(), p.cargo(d, i).id()),
                )?;
            }
        }
        Ok(())
    }
}
