//! Conversion of solved values into per-(town, depot) allocation ratios.

use allot_lp::Solution;
use serde::Serialize;

use crate::entity::{CargoId, DepotId, TownId};
use crate::formulation::AllocationModel;
use crate::partition::Partition;

/// Cargo shares of one town's demand as served by one depot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub town: TownId,
    pub depot: DepotId,
    /// One `(cargo, ratio)` pair per cargo, in partition order.
    pub allocations: Vec<(CargoId, f64)>,
}

/// Depot and cargo order of the records, for sinks that lay out columns.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub depots: Vec<DepotId>,
    pub cargos: Vec<CargoId>,
    pub towns: Vec<TownId>,
}

impl OutputLayout {
    pub fn from_partition(partition: &Partition) -> Self {
        let inventories = partition.inventories();
        Self {
            depots: inventories.iter().map(|inv| inv.depot().id().clone()).collect(),
            cargos: inventories
                .first()
                .map(|inv| inv.cargos().iter().map(|c| c.id().clone()).collect())
                .unwrap_or_default(),
            towns: inventories
                .first()
                .map(|inv| inv.towns().iter().map(|t| t.id().clone()).collect())
                .unwrap_or_default(),
        }
    }
}

/// Build one record per (depot, town), depot-major.
///
/// Each ratio is `(x + z + c) / demand`, with a demand below one treated as one.
pub fn extract_records(
    built: &AllocationModel,
    partition: &Partition,
    solution: &Solution,
) -> Vec<OutputRecord> {
    let dims = built.dims();
    let index = built.index();
    let mut records = Vec::with_capacity(dims.depots * dims.towns);
    for d in 0..dims.depots {
        for k in 0..dims.towns {
            let demand = partition.demand(d, k).max(1.0);
            let allocations = (0..dims.cargos)
                .map(|i| {
                    let volume = solution.sum(index.volume(d, i, k));
                    (partition.cargo(d, i).id().clone(), volume / demand)
                })
                .collect();
            records.push(OutputRecord {
                town: partition.town(d, k).id().clone(),
                depot: partition.depot(d).id().clone(),
                allocations,
            });
        }
    }
    records
}

/// Share of the order amount taken by each cargo, read from `a[i]`.
pub fn cargo_shares(
    built: &AllocationModel,
    partition: &Partition,
    solution: &Solution,
) -> Vec<(CargoId, f64)> {
    let order_amount = built.order_amount().max(1.0);
    (0..built.dims().cargos)
        .map(|i| {
            let volume = solution.value(built.index().aggregate(i));
            (partition.cargo(0, i).id().clone(), volume / order_amount)
        })
        .collect()
}
