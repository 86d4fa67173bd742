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

use derive_more::{Display, From};
use solution::CatalogError;

/// failures of the linear-programming layer.
#[derive(Display, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[display(fmt = "lp backend failed: {}", _0)]
    Backend(String),

    #[display(fmt = "could not write lp file {}: {}", path, reason)]
    Write { path: String, reason: String },

    #[display(fmt = "variable {} does not belong to the program", _0)]
    UnknownVariable(usize),
}

impl std::error::Error for SolverError {}

/// failures that stop the column generation.
#[derive(Display, Debug, Clone, PartialEq, From)]
pub enum ColumnGenerationError {
    #[display(fmt = "{}", _0)]
    Solver(SolverError),

    #[display(fmt = "{}", _0)]
    Catalog(CatalogError),

    #[display(fmt = "the {} master problem is infeasible", _0)]
    #[from(ignore)]
    InfeasibleMaster(&'static str),

    #[display(fmt = "the {} master problem is unbounded", _0)]
    #[from(ignore)]
    UnboundedMaster(&'static str),

    #[display(fmt = "the integer master problem found no solution within its limits")]
    #[from(ignore)]
    NoIntegerSolution,

    #[display(fmt = "invalid schedule: {}", _0)]
    #[from(ignore)]
    Schedule(String),

    #[display(fmt = "could not build the pricing thread pool: {}", _0)]
    #[from(ignore)]
    ThreadPool(String),
}

impl std::error::Error for ColumnGenerationError {}
