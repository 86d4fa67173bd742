// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use highs::{HighsModelStatus, RowProblem, Sense};
use tracing::debug;

use super::{LinearProgram, LpBackend, LpOutcome, LpSolution, SolveOptions, VarKind};
use crate::error::SolverError;

const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// solves programs with HiGHS. Every call builds and solves an independent HiGHS model.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsBackend;

impl LpBackend for HighsBackend {
    fn solve(
        &self,
        program: &LinearProgram,
        options: &SolveOptions,
    ) -> Result<LpOutcome, SolverError> {
        if program.number_of_variables() == 0 {
            return Ok(solve_empty(program));
        }

        let mut pb = RowProblem::default();
        let columns: Vec<_> = program
            .variables()
            .iter()
            .map(|v| match v.kind() {
                VarKind::Continuous => pb.add_column(v.cost(), v.lower()..=v.upper()),
                VarKind::Integer | VarKind::Binary => {
                    pb.add_integer_column(v.cost(), v.lower()..=v.upper())
                }
            })
            .collect();
        for constraint in program.constraints() {
            pb.add_row(
                constraint.lower()..=constraint.upper(),
                constraint
                    .coefficients()
                    .iter()
                    .map(|&(var, coefficient)| (columns[var.idx()], coefficient)),
            );
        }

        let mut model = pb.optimise(Sense::Minimise);
        model.set_option("output_flag", false);
        if let Some(time_limit) = options.time_limit {
            model.set_option("time_limit", time_limit.as_secs_f64());
        }
        if let Some(mip_gap) = options.mip_gap {
            model.set_option("mip_rel_gap", mip_gap);
        }

        let solved = model
            .try_solve()
            .map_err(|status| SolverError::Backend(format!("{:?}", status)))?;
        let status = solved.status();
        debug!("highs finished {} with status {:?}", program.name(), status);

        let extract = || {
            let solution = solved.get_solution();
            let values = solution.columns().to_vec();
            let duals = if program.is_integer() {
                Vec::new()
            } else {
                solution.dual_rows().to_vec()
            };
            let objective = program.objective_value(&values);
            LpSolution::new(values, duals, objective)
        };

        match status {
            HighsModelStatus::Optimal => Ok(LpOutcome::Optimal(extract())),
            // all programs built here are bounded below, so an undecided status means
            // infeasible
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(LpOutcome::Infeasible)
            }
            HighsModelStatus::Unbounded => Ok(LpOutcome::Unbounded),
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
                let incumbent = extract();
                let feasible =
                    program.max_violation(incumbent.values()) <= FEASIBILITY_TOLERANCE;
                Ok(LpOutcome::LimitReached(feasible.then_some(incumbent)))
            }
            other => Err(SolverError::Backend(format!(
                "unexpected model status {:?} for {}",
                other,
                program.name()
            ))),
        }
    }
}

/// a program without variables is feasible iff every row admits zero.
fn solve_empty(program: &LinearProgram) -> LpOutcome {
    let feasible = program
        .constraints()
        .iter()
        .all(|c| c.lower() <= FEASIBILITY_TOLERANCE && c.upper() >= -FEASIBILITY_TOLERANCE);
    if feasible {
        LpOutcome::Optimal(LpSolution::new(
            Vec::new(),
            vec![0.0; program.number_of_constraints()],
            0.0,
        ))
    } else {
        LpOutcome::Infeasible
    }
}
