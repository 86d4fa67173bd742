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

use model::base_types::{ArcIdx, NodeIdx};
use model::network::Network;
use model::requests::Request;
use rs_graph::linkedlistgraph::{Edge as RsEdge, Node as RsNode};
use rs_graph::mcf::{network_simplex, SolutionState};
use rs_graph::{Buildable, Builder, LinkedListGraph};
use tracing::debug;

use super::{arc_cost, proposal, trace_path, window_arcs, window_nodes, PricingSolver, Proposal};
use crate::error::SolverError;
use crate::master_problem::Duals;

type NetworkNumberType = i64;

type LowerBound = NetworkNumberType;
type UpperBound = NetworkNumberType;
type ScaledCost = NetworkNumberType;

/// costs are rounded to this many units per monetary unit.
const COST_SCALE: f64 = 1e6;

struct EdgeLabel {
    lower_bound: LowerBound,
    upper_bound: UpperBound,
    cost: ScaledCost,
}

/// the unit flow from the release node to the due node as a circulation: a return edge from
/// the due node to the release node carries exactly one unit. The network is acyclic, so the
/// only cycle of an optimal circulation is the path plus the return edge.
pub struct NetworkSimplexPricing;

impl PricingSolver for NetworkSimplexPricing {
    fn price(
        &self,
        network: &Network,
        request: &Request,
        duals: &Duals,
    ) -> Result<Option<Proposal>, SolverError> {
        let (release, due) = match (
            network.release_node(request.id()),
            network.due_node(request.id()),
        ) {
            (Some(release), Some(due)) => (release, due),
            _ => return Ok(None),
        };

        let mut builder = LinkedListGraph::<u32>::new_builder();
        let mut node_to_rsnode: HashMap<NodeIdx, RsNode> = HashMap::new();
        for node in window_nodes(network, request) {
            node_to_rsnode.insert(node, builder.add_node());
        }

        let mut edges: HashMap<RsEdge, EdgeLabel> = HashMap::new();
        let mut edge_to_arc: HashMap<RsEdge, ArcIdx> = HashMap::new();
        for arc in window_arcs(network, request) {
            let network_arc = network.arc(arc);
            let (Some(&origin), Some(&destination)) = (
                node_to_rsnode.get(&network_arc.origin()),
                node_to_rsnode.get(&network_arc.destination()),
            ) else {
                continue;
            };
            let edge = builder.add_edge(origin, destination);
            edges.insert(
                edge,
                EdgeLabel {
                    lower_bound: 0,
                    upper_bound: 1,
                    cost: (arc_cost(network, request, duals, arc) * COST_SCALE).round()
                        as ScaledCost,
                },
            );
            edge_to_arc.insert(edge, arc);
        }
        let (Some(&release_rsnode), Some(&due_rsnode)) =
            (node_to_rsnode.get(&release), node_to_rsnode.get(&due))
        else {
            return Ok(None);
        };
        edges.insert(
            builder.add_edge(due_rsnode, release_rsnode),
            EdgeLabel {
                lower_bound: 1,
                upper_bound: 1,
                cost: 0,
            },
        );
        let graph = builder.into_graph();

        let flow = match network_simplex(
            &graph,
            |_| 0,                     // balance is 0 everywhere -> circulation
            |e| edges[&e].lower_bound, // lower bounds
            |e| edges[&e].upper_bound, // upper bounds
            |e| edges[&e].cost,        // costs
        ) {
            Ok((_, flow)) => flow,
            Err(state @ (SolutionState::Infeasible | SolutionState::Unbounded)) => {
                debug!("no path for request {}: {:?}", request.id(), state);
                return Ok(None);
            }
            Err(state) => {
                return Err(SolverError::Backend(format!(
                    "network simplex ended in state {:?} for request {}",
                    state,
                    request.id()
                )))
            }
        };

        let selected: HashSet<ArcIdx> = flow
            .into_iter()
            .filter(|(_, value)| *value > 0)
            .filter_map(|(edge, _)| edge_to_arc.get(&edge).copied())
            .collect();
        Ok(trace_path(network, request, &selected)
            .map(|arcs| proposal(network, request, duals, arcs)))
    }
}
