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

//! Pricing of one request: the path from its release node to its due node of least reduced
//! cost with respect to the duals of the relaxed master problem.
//!
//! Flight arcs cost `weight * (marginal cost per ton - flight dual)`, ground arcs are free and
//! the request dual is subtracted once. Only flight and ground arcs inside the time window of
//! the request are offered.

pub mod milp;
pub mod network_simplex;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::Arc;

use model::base_types::{ArcIdx, Cost, NodeIdx, RequestId};
use model::config::PricingEngine;
use model::network::Network;
use model::requests::Request;

use crate::error::SolverError;
use crate::lp::{LpBackend, SolveOptions};
use crate::master_problem::Duals;
use milp::MilpPricing;
use network_simplex::NetworkSimplexPricing;

/// the cheapest path found for a request together with its exact reduced cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    request: RequestId,
    arcs: Vec<ArcIdx>,
    reduced_cost: Cost,
}

impl Proposal {
    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn arcs(&self) -> &[ArcIdx] {
        &self.arcs
    }

    pub fn reduced_cost(&self) -> Cost {
        self.reduced_cost
    }

    pub fn into_arcs(self) -> Vec<ArcIdx> {
        self.arcs
    }
}

pub trait PricingSolver: Send + Sync {
    /// `None` if the time window of the request admits no path.
    fn price(
        &self,
        network: &Network,
        request: &Request,
        duals: &Duals,
    ) -> Result<Option<Proposal>, SolverError>;
}

pub fn pricing_solver(
    engine: PricingEngine,
    backend: Arc<dyn LpBackend>,
    options: SolveOptions,
) -> Box<dyn PricingSolver> {
    match engine {
        PricingEngine::Milp => Box::new(MilpPricing::new(backend, options)),
        PricingEngine::NetworkSimplex => Box::new(NetworkSimplexPricing),
    }
}

/// pricing cost of a single arc.
pub fn arc_cost(network: &Network, request: &Request, duals: &Duals, arc: ArcIdx) -> Cost {
    let network_arc = network.arc(arc);
    if network_arc.is_flight() {
        request.weight() * (network_arc.cost_per_ton() - duals.of_flight(arc))
    } else {
        0.0
    }
}

pub fn reduced_cost(network: &Network, request: &Request, duals: &Duals, arcs: &[ArcIdx]) -> Cost {
    arcs.iter()
        .map(|&arc| arc_cost(network, request, duals, arc))
        .sum::<Cost>()
        - duals.of_request(request.id())
}

fn window_arcs(network: &Network, request: &Request) -> Vec<ArcIdx> {
    network
        .operational_arcs_within(request.release_step(), request.due_step())
        .collect()
}

fn window_nodes(network: &Network, request: &Request) -> Vec<NodeIdx> {
    (request.release_step()..=request.due_step())
        .flat_map(|t| network.layer(t).iter().copied())
        .collect()
}

/// follows the selected arcs from the release node to the due node.
fn trace_path(
    network: &Network,
    request: &Request,
    selected: &HashSet<ArcIdx>,
) -> Option<Vec<ArcIdx>> {
    let release = network.release_node(request.id())?;
    let due = network.due_node(request.id())?;
    let mut path = Vec::new();
    let mut current = release;
    while current != due {
        if path.len() > selected.len() {
            return None;
        }
        let next = network
            .node(current)
            .outgoing()
            .operational()
            .find(|arc| selected.contains(arc))?;
        path.push(next);
        current = network.arc(next).destination();
    }
    Some(path)
}

fn proposal(
    network: &Network,
    request: &Request,
    duals: &Duals,
    arcs: Vec<ArcIdx>,
) -> Proposal {
    Proposal {
        request: request.id(),
        reduced_cost: reduced_cost(network, request, duals, &arcs),
        arcs,
    }
}
