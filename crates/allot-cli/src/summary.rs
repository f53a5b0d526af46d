use allot_core::{AllocationOutcome, AllocationStatus, ModelSize, Partition};
use allot_lp::SolverStatus;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ShareRow {
    pub cargo: String,
    pub share: f64,
}

/// What `allot solve` reports on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: AllocationStatus,
    pub solver_status: SolverStatus,
    pub objective: Option<f64>,
    pub relaxed: bool,
    pub order_amount: f64,
    pub records: usize,
    pub output: Option<String>,
    pub shares: Vec<ShareRow>,
}

impl RunSummary {
    pub fn from_outcome(
        outcome: &AllocationOutcome,
        partition: &Partition,
        records: usize,
        output: Option<String>,
    ) -> Self {
        let shares = outcome
            .cargo_shares(partition)
            .map(|shares| {
                shares
                    .into_iter()
                    .map(|(cargo, share)| ShareRow {
                        cargo: cargo.to_string(),
                        share,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            status: outcome.status(),
            solver_status: outcome.solver_status(),
            objective: outcome.objective_value(),
            relaxed: outcome.relaxed(),
            order_amount: partition.order_amount(),
            records,
            output,
            shares,
        }
    }
}

/// What `allot check` reports on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub depots: usize,
    pub cargos: usize,
    pub towns: usize,
    pub order_amount: f64,
    pub model: ModelSize,
}

impl CheckSummary {
    pub fn new(partition: &Partition, model: ModelSize) -> Self {
        Self {
            depots: partition.num_depots(),
            cargos: partition.num_cargos(),
            towns: partition.num_towns(),
            order_amount: partition.order_amount(),
            model,
        }
    }
}

fn format_objective(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

pub fn print_run_table(summary: &RunSummary) {
    println!("{:<14} {}", "status", summary.status);
    println!("{:<14} {}", "solver_status", summary.solver_status.as_str());
    println!("{:<14} {}", "objective", format_objective(summary.objective));
    println!("{:<14} {}", "relaxed", summary.relaxed);
    println!("{:<14} {:.0}", "order_amount", summary.order_amount);
    println!("{:<14} {}", "records", summary.records);
    if let Some(output) = &summary.output {
        println!("{:<14} {output}", "output");
    }
    if summary.shares.is_empty() {
        return;
    }
    println!();
    println!("{:<16} {:>10}", "cargo", "share");
    for row in &summary.shares {
        println!("{:<16} {:>10.4}", row.cargo, row.share);
    }
}

pub fn print_check_table(summary: &CheckSummary) {
    println!(
        "{:>7} {:>7} {:>7} {:>12} {:>10} {:>10} {:>12} {:>10}",
        "depots", "cargos", "towns", "order", "vars", "int_vars", "constraints", "nonzeros"
    );
    println!(
        "{:>7} {:>7} {:>7} {:>12.0} {:>10} {:>10} {:>12} {:>10}",
        summary.depots,
        summary.cargos,
        summary.towns,
        summary.order_amount,
        summary.model.variables,
        summary.model.integer_variables,
        summary.model.constraints,
        summary.model.nonzeros,
    );
}
