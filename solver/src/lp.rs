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

//! Solver independent description of linear and mixed-integer programs.
//!
//! A `LinearProgram` is plain data: it is assembled once by a `LinearProgramBuilder`, can be
//! inspected or written as a CPLEX lp-file and is handed to an `LpBackend` to be solved. The
//! programs are always minimised.

pub mod highs_backend;
mod writer;

#[cfg(test)]
mod tests;

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use derive_more::Display;

use crate::error::SolverError;

/// handle of a variable (column) of a `LinearProgram`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(fmt = "v{}", _0)]
pub struct Var(usize);

impl Var {
    pub fn idx(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Integer,
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    kind: VarKind,
    lower: f64,
    upper: f64,
    cost: f64,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// lower <= sum(coefficient * variable) <= upper. One-sided rows use an infinite bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    lower: f64,
    upper: f64,
    coefficients: Vec<(Var, f64)>,
}

impl Constraint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn coefficients(&self) -> &[(Var, f64)] {
        &self.coefficients
    }

    pub fn activity(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .map(|&(var, coefficient)| coefficient * values.get(var.idx()).copied().unwrap_or(0.0))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

pub struct LinearProgramBuilder {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

// static functions
impl LinearProgramBuilder {
    pub fn new(name: &str) -> LinearProgramBuilder {
        LinearProgramBuilder {
            name: String::from(name),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }
}

// methods
impl LinearProgramBuilder {
    /// binary variables always get the bounds [0, 1].
    pub fn add_variable(
        &mut self,
        name: String,
        kind: VarKind,
        lower: f64,
        upper: f64,
        cost: f64,
    ) -> Var {
        let (lower, upper) = match kind {
            VarKind::Binary => (0.0, 1.0),
            _ => (lower, upper),
        };
        self.variables.push(Variable {
            name,
            kind,
            lower,
            upper,
            cost,
        });
        Var(self.variables.len() - 1)
    }

    /// adds the row and returns its index (the index of its dual value in a solution).
    pub fn add_constraint(
        &mut self,
        name: String,
        lower: f64,
        upper: f64,
        coefficients: Vec<(Var, f64)>,
    ) -> Result<usize, SolverError> {
        if let Some(&(var, _)) = coefficients
            .iter()
            .find(|(var, _)| var.idx() >= self.variables.len())
        {
            return Err(SolverError::UnknownVariable(var.idx()));
        }
        self.constraints.push(Constraint {
            name,
            lower,
            upper,
            coefficients,
        });
        Ok(self.constraints.len() - 1)
    }

    pub fn build(self) -> LinearProgram {
        LinearProgram {
            name: self.name,
            variables: self.variables,
            constraints: self.constraints,
        }
    }
}

// methods
impl LinearProgram {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: Var) -> Option<&Variable> {
        self.variables.get(var.idx())
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_integer(&self) -> bool {
        self.variables
            .iter()
            .any(|v| v.kind != VarKind::Continuous)
    }

    /// the same program with every integrality requirement dropped (bounds are kept).
    pub fn relaxed(&self) -> LinearProgram {
        LinearProgram {
            name: format!("{}_relaxed", self.name),
            variables: self
                .variables
                .iter()
                .map(|v| Variable {
                    kind: VarKind::Continuous,
                    ..v.clone()
                })
                .collect(),
            constraints: self.constraints.clone(),
        }
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values.iter())
            .map(|(v, value)| v.cost * value)
            .sum()
    }

    /// largest violation of a bound, row or integrality requirement by the values.
    pub fn max_violation(&self, values: &[f64]) -> f64 {
        if values.len() != self.variables.len() {
            return f64::INFINITY;
        }
        let bounds = self.variables.iter().zip(values.iter()).map(|(v, &value)| {
            let integrality = match v.kind {
                VarKind::Continuous => 0.0,
                _ => (value - value.round()).abs(),
            };
            (v.lower - value)
                .max(value - v.upper)
                .max(integrality)
                .max(0.0)
        });
        let rows = self.constraints.iter().map(|c| {
            let activity = c.activity(values);
            (c.lower - activity).max(activity - c.upper).max(0.0)
        });
        bounds.chain(rows).fold(0.0, f64::max)
    }

    /// writes the program in CPLEX lp-format.
    pub fn write_lp(&self, out: &mut impl io::Write) -> io::Result<()> {
        writer::write_lp(self, out)
    }

    pub fn write_lp_file(&self, path: &Path) -> Result<(), SolverError> {
        let to_error = |e: io::Error| SolverError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        let mut file = io::BufWriter::new(fs::File::create(path).map_err(to_error)?);
        self.write_lp(&mut file).map_err(to_error)
    }
}

/// limits of a single solve. The thread count of the backend is never set per program:
/// HiGHS keeps one scheduler per OS thread and refuses a different count once it exists.
/// Parallelism comes from the rayon pool of the pricing step.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub time_limit: Option<Duration>,
    pub mip_gap: Option<f64>,
}

/// primal values per variable, dual values per row (empty for integer programs) and the
/// objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    values: Vec<f64>,
    duals: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    pub fn new(values: Vec<f64>, duals: Vec<f64>, objective: f64) -> LpSolution {
        LpSolution {
            values,
            duals,
            objective,
        }
    }

    pub fn value(&self, var: Var) -> f64 {
        self.values.get(var.idx()).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dual(&self, row: usize) -> f64 {
        self.duals.get(row).copied().unwrap_or(0.0)
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    Optimal(LpSolution),
    /// a time limit stopped the backend; carries the incumbent if it is feasible.
    LimitReached(Option<LpSolution>),
    Infeasible,
    Unbounded,
}

/// duals follow the minimisation convention: the reduced cost of a column is its cost minus
/// the sum of coefficient times dual over its rows.
pub trait LpBackend: Send + Sync {
    fn solve(
        &self,
        program: &LinearProgram,
        options: &SolveOptions,
    ) -> Result<LpOutcome, SolverError>;
}
