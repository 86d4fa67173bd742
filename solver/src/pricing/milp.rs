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

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use model::network::Network;
use model::requests::Request;
use tracing::debug;

use super::{arc_cost, proposal, trace_path, window_arcs, window_nodes, PricingSolver, Proposal};
use crate::error::SolverError;
use crate::lp::{LinearProgramBuilder, LpBackend, LpOutcome, SolveOptions, VarKind};
use crate::master_problem::Duals;

/// one binary variable per arc of the time window and a flow conservation row per node of the
/// window, solved by the lp backend.
pub struct MilpPricing {
    backend: Arc<dyn LpBackend>,
    options: SolveOptions,
}

impl MilpPricing {
    pub fn new(backend: Arc<dyn LpBackend>, options: SolveOptions) -> MilpPricing {
        MilpPricing { backend, options }
    }
}

impl PricingSolver for MilpPricing {
    fn price(
        &self,
        network: &Network,
        request: &Request,
        duals: &Duals,
    ) -> Result<Option<Proposal>, SolverError> {
        let mut builder = LinearProgramBuilder::new(&format!("pricing_r{}", request.id()));
        let arcs = window_arcs(network, request);
        let vars: HashMap<_, _> = arcs
            .iter()
            .map(|&arc| {
                let var = builder.add_variable(
                    format!("a{}", arc),
                    VarKind::Binary,
                    0.0,
                    1.0,
                    arc_cost(network, request, duals, arc),
                );
                (arc, var)
            })
            .collect();

        for node in window_nodes(network, request) {
            let incoming = network.node(node).incoming().operational();
            let outgoing = network.node(node).outgoing().operational();
            let coefficients = incoming
                .filter_map(|arc| vars.get(&arc).map(|&var| (var, 1.0)))
                .chain(outgoing.filter_map(|arc| vars.get(&arc).map(|&var| (var, -1.0))))
                .collect();
            let supply = network.supply_of(request.id(), node) as f64;
            builder.add_constraint(format!("n{}", node), supply, supply, coefficients)?;
        }

        let program = builder.build();
        let solution = match self.backend.solve(&program, &self.options)? {
            LpOutcome::Optimal(solution) | LpOutcome::LimitReached(Some(solution)) => solution,
            outcome => {
                debug!("no path for request {}: {:?}", request.id(), outcome);
                return Ok(None);
            }
        };

        let selected: HashSet<_> = vars
            .iter()
            .filter(|(_, var)| solution.value(**var) > 0.5)
            .map(|(&arc, _)| arc)
            .collect();
        Ok(trace_path(network, request, &selected)
            .map(|arcs| proposal(network, request, duals, arcs)))
    }
}
