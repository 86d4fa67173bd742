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


use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use model::base_types::{AircraftTypeIdx, ArcIdx, RequestId};
use model::network::Network;
use solution::path::PathId;
use solution::path_catalog::PathCatalog;
use solution::CargoSchedule;

use crate::error::{ColumnGenerationError, SolverError};
use crate::lp::{LinearProgram, LinearProgramBuilder, LpSolution, Var, VarKind};

/// dual prices of the relaxed master problem that enter the pricing objective.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Duals {
    requests: HashMap<RequestId, f64>,
    flights: HashMap<ArcIdx, f64>,
}

impl Duals {
    pub fn new(requests: HashMap<RequestId, f64>, flights: HashMap<ArcIdx, f64>) -> Duals {
        Duals { requests, flights }
    }

    /// dual of the one-path-per-request row.
    pub fn of_request(&self, request: RequestId) -> f64 {
        self.requests.get(&request).copied().unwrap_or(0.0)
    }

    /// dual of the weight capacity row of the flight arc (non-positive).
    pub fn of_flight(&self, flight: ArcIdx) -> f64 {
        self.flights.get(&flight).copied().unwrap_or(0.0)
    }
}

/// the restricted master problem over the paths of the catalog.
///
/// Variables:
/// - `x_f<arc>_k<type>`: the flight arc is flown by an aircraft of the type,
/// - `y_g<arc>_k<type>`: number of aircraft of the type waiting on the ground arc,
/// - `z_<path>`: the path is selected.
///
/// Rows: one aircraft per flight arc, aircraft flow conservation per node and type, one path
/// per request and the weight capacity of each flight arc.
pub struct MasterProblem {
    program: LinearProgram,
    flight_vars: BTreeMap<(ArcIdx, AircraftTypeIdx), Var>,
    ground_vars: BTreeMap<(ArcIdx, AircraftTypeIdx), Var>,
    path_vars: BTreeMap<PathId, Var>,
    request_rows: BTreeMap<RequestId, usize>,
    weight_rows: BTreeMap<ArcIdx, usize>,
    network: Arc<Network>,
}

// static functions
impl MasterProblem {
    /// `integer` decides between the mixed-integer program and its relaxation.
    pub fn build(catalog: &PathCatalog, integer: bool) -> Result<MasterProblem, SolverError> {
        let network = catalog.network();
        let aircraft_types = network.aircraft_types();
        let requests = network.requests();
        let (flight_kind, ground_kind) = if integer {
            (VarKind::Binary, VarKind::Integer)
        } else {
            (VarKind::Continuous, VarKind::Continuous)
        };
        let mut builder = LinearProgramBuilder::new(if integer {
            "master_problem"
        } else {
            "restricted_master_problem"
        });

        let mut flight_vars = BTreeMap::new();
        for flight in network.flight_arcs() {
            let km = network.distance_of(flight).in_km();
            for aircraft_type in aircraft_types.iter() {
                let operating_cost = aircraft_types
                    .get(aircraft_type)
                    .map(|t| t.operating_cost())
                    .unwrap_or(0.0);
                let var = builder.add_variable(
                    format!("x_f{}_k{}", flight, aircraft_type),
                    flight_kind,
                    0.0,
                    1.0,
                    operating_cost * km,
                );
                flight_vars.insert((flight, aircraft_type), var);
            }
        }

        let mut ground_vars = BTreeMap::new();
        for ground in network.ground_arcs() {
            for aircraft_type in aircraft_types.iter() {
                let var = builder.add_variable(
                    format!("y_g{}_k{}", ground, aircraft_type),
                    ground_kind,
                    0.0,
                    f64::INFINITY,
                    0.0,
                );
                ground_vars.insert((ground, aircraft_type), var);
            }
        }

        let mut path_vars = BTreeMap::new();
        for path in catalog.iter() {
            let var = builder.add_variable(
                format!("z_{}", path.id()),
                flight_kind,
                0.0,
                1.0,
                path.cost(),
            );
            path_vars.insert(path.id(), var);
        }

        for flight in network.flight_arcs() {
            let usage = aircraft_types
                .iter()
                .filter_map(|k| flight_vars.get(&(flight, k)).map(|&var| (var, 1.0)))
                .collect();
            builder.add_constraint(format!("usage_f{}", flight), f64::NEG_INFINITY, 1.0, usage)?;
        }

        for node in network.nodes() {
            let outgoing = network.node(node).outgoing();
            let incoming = network.node(node).incoming();
            for aircraft_type in aircraft_types.iter() {
                let var_of = |arc: &ArcIdx| {
                    flight_vars
                        .get(&(*arc, aircraft_type))
                        .or_else(|| ground_vars.get(&(*arc, aircraft_type)))
                        .copied()
                };
                let coefficients: Vec<(Var, f64)> = outgoing
                    .flight()
                    .iter()
                    .chain(outgoing.ground().iter())
                    .filter_map(|arc| var_of(arc).map(|var| (var, 1.0)))
                    .chain(
                        incoming
                            .flight()
                            .iter()
                            .chain(incoming.ground().iter())
                            .filter_map(|arc| var_of(arc).map(|var| (var, -1.0))),
                    )
                    .collect();
                let supply = network.aircraft_supply(node, aircraft_type) as f64;
                builder.add_constraint(
                    format!("flow_n{}_k{}", node, aircraft_type),
                    supply,
                    supply,
                    coefficients,
                )?;
            }
        }

        let mut request_rows = BTreeMap::new();
        for request in requests.ids() {
            let coefficients = catalog
                .paths_for_request(request)
                .filter_map(|path| path_vars.get(&path.id()).map(|&var| (var, 1.0)))
                .collect();
            let row =
                builder.add_constraint(format!("request_r{}", request), 1.0, 1.0, coefficients)?;
            request_rows.insert(request, row);
        }

        let mut weight_rows = BTreeMap::new();
        for flight in network.flight_arcs() {
            let mut coefficients: Vec<(Var, f64)> = Vec::new();
            for request in catalog.requests_using_flight_arc(flight) {
                let weight = requests.get(request).map(|r| r.weight()).unwrap_or(0.0);
                coefficients.extend(
                    catalog
                        .paths_containing_flight_arc(flight, request)
                        .iter()
                        .filter_map(|id| path_vars.get(id).map(|&var| (var, weight))),
                );
            }
            for aircraft_type in aircraft_types.iter() {
                let payload = aircraft_types
                    .get(aircraft_type)
                    .map(|t| t.payload())
                    .unwrap_or(0.0);
                if let Some(&var) = flight_vars.get(&(flight, aircraft_type)) {
                    coefficients.push((var, -payload));
                }
            }
            let row = builder.add_constraint(
                format!("weight_f{}", flight),
                f64::NEG_INFINITY,
                0.0,
                coefficients,
            )?;
            weight_rows.insert(flight, row);
        }

        Ok(MasterProblem {
            program: builder.build(),
            flight_vars,
            ground_vars,
            path_vars,
            request_rows,
            weight_rows,
            network,
        })
    }
}

// methods
impl MasterProblem {
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    pub fn path_var(&self, path: PathId) -> Option<Var> {
        self.path_vars.get(&path).copied()
    }

    pub fn flight_var(&self, flight: ArcIdx, aircraft_type: AircraftTypeIdx) -> Option<Var> {
        self.flight_vars.get(&(flight, aircraft_type)).copied()
    }

    pub fn ground_var(&self, ground: ArcIdx, aircraft_type: AircraftTypeIdx) -> Option<Var> {
        self.ground_vars.get(&(ground, aircraft_type)).copied()
    }

    pub fn duals(&self, solution: &LpSolution) -> Duals {
        Duals::new(
            self.request_rows
                .iter()
                .map(|(&request, &row)| (request, solution.dual(row)))
                .collect(),
            self.weight_rows
                .iter()
                .map(|(&flight, &row)| (flight, solution.dual(row)))
                .collect(),
        )
    }

    /// reads an integer solution: per request the path with the largest value, the flown
    /// flight arcs and the rounded ground aircraft counts.
    pub fn to_schedule(
        &self,
        solution: &LpSolution,
        catalog: &PathCatalog,
    ) -> Result<CargoSchedule, ColumnGenerationError> {
        let mut selected = Vec::new();
        for request in self.network.requests().ids() {
            let best = catalog
                .paths_for_request(request)
                .filter_map(|path| {
                    self.path_vars
                        .get(&path.id())
                        .map(|&var| (path, solution.value(var)))
                })
                .filter(|(_, value)| *value > 0.5)
                .max_by(|(_, a), (_, b)| a.total_cmp(b));
            match best {
                Some((path, _)) => selected.push(path.clone()),
                None => {
                    return Err(ColumnGenerationError::Schedule(format!(
                        "no path selected for request {}",
                        request
                    )))
                }
            }
        }

        let flight_assignments = self
            .flight_vars
            .iter()
            .filter(|(_, var)| solution.value(**var) > 0.5)
            .map(|(&(flight, aircraft_type), _)| (flight, aircraft_type))
            .collect();
        let ground_aircraft = self
            .ground_vars
            .iter()
            .map(|(&key, &var)| (key, solution.value(var).round().max(0.0) as u32))
            .filter(|(_, count)| *count > 0)
            .collect();

        CargoSchedule::new(
            self.network.clone(),
            selected,
            flight_assignments,
            ground_aircraft,
        )
        .map_err(ColumnGenerationError::Schedule)
    }
}
