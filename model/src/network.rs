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

pub mod arcs;
pub mod nodes;
#[cfg(test)]
mod tests;

use arcs::{ArcKind, NetworkArc};
use nodes::Node;

use crate::aircraft_types::AircraftTypes;
use crate::airports::Airports;
use crate::base_types::{
    AircraftTypeIdx, AirportIdx, ArcIdx, Distance, Idx, NodeIdx, RequestId, Timestep,
};
use crate::config::Config;
use crate::requests::Requests;
use crate::ModelError;

use itertools::Itertools;
use tracing::{debug, info, warn};

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// ordered airport pairs between which flights may be scheduled.
pub type ViablePairs = BTreeSet<(AirportIdx, AirportIdx)>;

/// the time-space network: one node per (timestep, airport), connected by flight, ground and
/// no-service arcs. Nodes and arcs live in arenas and are referenced by `NodeIdx` and `ArcIdx`.
/// Every arc points forward in time, so the network is a layered DAG.
pub struct Network {
    nodes: Vec<Node>,
    arcs: Vec<NetworkArc>,
    layers: Vec<Vec<NodeIdx>>, // layers[timestep][airport]

    flight_arcs: Vec<ArcIdx>,
    ground_arcs: Vec<ArcIdx>,
    no_service_arcs: Vec<ArcIdx>,
    no_service_arc_of: HashMap<RequestId, ArcIdx>,

    max_leg_duration: Timestep,
    skipped_pairs: Vec<(AirportIdx, AirportIdx)>,

    config: Arc<Config>,
    airports: Arc<Airports>,
    aircraft_types: Arc<AircraftTypes>,
    requests: Arc<Requests>,
}

// methods
impl Network {
    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn airports(&self) -> Arc<Airports> {
        self.airports.clone()
    }

    pub fn aircraft_types(&self) -> Arc<AircraftTypes> {
        self.aircraft_types.clone()
    }

    pub fn requests(&self) -> Arc<Requests> {
        self.requests.clone()
    }

    pub fn timestep_count(&self) -> Timestep {
        self.layers.len() as Timestep
    }

    pub fn last_timestep(&self) -> Timestep {
        self.timestep_count() - 1
    }

    /// longest leg (in timesteps) over all viable pairs with leg data.
    pub fn max_leg_duration(&self) -> Timestep {
        self.max_leg_duration
    }

    /// viable pairs that could not be turned into flight arcs.
    pub fn skipped_pairs(&self) -> &[(AirportIdx, AirportIdx)] {
        &self.skipped_pairs
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.idx()]
    }

    pub fn arc(&self, idx: ArcIdx) -> &NetworkArc {
        &self.arcs[idx.idx()]
    }

    pub fn node_at(&self, timestep: Timestep, airport: AirportIdx) -> Option<NodeIdx> {
        self.layers
            .get(timestep as usize)
            .and_then(|layer| layer.get(airport.idx()))
            .copied()
    }

    pub fn layer(&self, timestep: Timestep) -> &[NodeIdx] {
        self.layers
            .get(timestep as usize)
            .map(|layer| layer.as_slice())
            .unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.nodes.iter().map(|node| node.idx())
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.arcs.iter().map(|arc| arc.idx())
    }

    pub fn number_of_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn flight_arcs(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.flight_arcs.iter().copied()
    }

    pub fn ground_arcs(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.ground_arcs.iter().copied()
    }

    pub fn no_service_arcs(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.no_service_arcs.iter().copied()
    }

    pub fn no_service_arc(&self, request: RequestId) -> Option<ArcIdx> {
        self.no_service_arc_of.get(&request).copied()
    }

    pub fn release_node(&self, request: RequestId) -> Option<NodeIdx> {
        self.no_service_arc(request).map(|arc| self.arc(arc).origin())
    }

    pub fn due_node(&self, request: RequestId) -> Option<NodeIdx> {
        self.no_service_arc(request)
            .map(|arc| self.arc(arc).destination())
    }

    /// number of timesteps the arc spans.
    pub fn duration_of(&self, arc: ArcIdx) -> Timestep {
        let arc = self.arc(arc);
        self.node(arc.destination()).timestep() - self.node(arc.origin()).timestep()
    }

    pub fn distance_of(&self, arc: ArcIdx) -> Distance {
        self.arc(arc).distance()
    }

    /// cargo supply of a request at a node: -1 at its release node, +1 at its due node, 0
    /// elsewhere (incoming minus outgoing flow).
    pub fn supply_of(&self, request: RequestId, node: NodeIdx) -> i32 {
        if self.release_node(request) == Some(node) {
            -1
        } else if self.due_node(request) == Some(node) {
            1
        } else {
            0
        }
    }

    /// aircraft of the given type entering the network at the node minus the aircraft that
    /// have to leave it (outgoing minus incoming aircraft flow).
    pub fn aircraft_supply(&self, node: NodeIdx, aircraft_type: AircraftTypeIdx) -> i64 {
        let node = self.node(node);
        let airport = match self.airports.get(node.airport()) {
            Some(airport) => airport,
            None => return 0,
        };
        let mut supply = 0;
        if node.timestep() == 0 {
            supply += airport.initial_aircraft(aircraft_type) as i64;
        }
        if node.timestep() == self.last_timestep() {
            supply -= airport.final_aircraft(aircraft_type) as i64;
        }
        supply
    }

    /// flight and ground arcs lying entirely within [from, to].
    pub fn operational_arcs_within(
        &self,
        from: Timestep,
        to: Timestep,
    ) -> impl Iterator<Item = ArcIdx> + '_ {
        self.flight_arcs
            .iter()
            .chain(self.ground_arcs.iter())
            .copied()
            .filter(move |&arc| {
                let arc = self.arc(arc);
                self.node(arc.origin()).timestep() >= from
                    && self.node(arc.destination()).timestep() <= to
            })
    }
}

// static functions
impl Network {
    /// builds the network layer by layer. For every new node the builder looks back over the
    /// earlier layers within the longest leg duration and connects the node to
    /// - the node of the same airport one timestep earlier (ground arc),
    /// - every node of another airport whose leg duration matches exactly (flight arc), as long
    ///   as the pair is viable.
    ///
    /// Finally one no-service arc per request is added.
    pub fn build(
        config: Arc<Config>,
        airports: Arc<Airports>,
        aircraft_types: Arc<AircraftTypes>,
        viable_pairs: &ViablePairs,
        requests: Arc<Requests>,
    ) -> Result<Network, ModelError> {
        check_fleet_balance(&airports, &aircraft_types)?;

        let mut skipped_pairs = Vec::new();
        let mut max_leg_duration = 0;
        for &(origin, destination) in viable_pairs.iter() {
            match airports.leg(origin, destination) {
                Some(leg) => max_leg_duration = max_leg_duration.max(leg.duration()),
                None => skipped_pairs.push((origin, destination)),
            }
        }
        if !skipped_pairs.is_empty() {
            warn!(
                "{} viable pair(s) without leg data are skipped: {}",
                skipped_pairs.len(),
                skipped_pairs
                    .iter()
                    .map(|(o, d)| format!("{}->{}", airports.id_of(*o), airports.id_of(*d)))
                    .join(", ")
            );
        }

        let mut network = Network {
            nodes: Vec::new(),
            arcs: Vec::new(),
            layers: Vec::new(),
            flight_arcs: Vec::new(),
            ground_arcs: Vec::new(),
            no_service_arcs: Vec::new(),
            no_service_arc_of: HashMap::new(),
            max_leg_duration,
            skipped_pairs,
            config: config.clone(),
            airports: airports.clone(),
            aircraft_types,
            requests: requests.clone(),
        };

        // a ground arc always looks back exactly one step
        let look_back = max_leg_duration.max(1);

        for timestep in 0..config.timestep_count() {
            let layer: Vec<NodeIdx> = airports
                .iter()
                .map(|airport| network.add_node(timestep, airport))
                .collect();
            network.layers.push(layer);

            for destination in airports.iter() {
                let head = network.layers[timestep as usize][destination.idx()];
                for delta in 1..=look_back.min(timestep) {
                    for origin in airports.iter() {
                        let tail = network.layers[(timestep - delta) as usize][origin.idx()];
                        if origin == destination {
                            if delta == 1 {
                                network.add_arc(NetworkArc::ground(
                                    network.next_arc_idx(),
                                    tail,
                                    head,
                                ));
                            }
                            continue;
                        }
                        if !viable_pairs.contains(&(origin, destination)) {
                            continue;
                        }
                        if let Some(leg) = airports.leg(origin, destination) {
                            if leg.duration() == delta {
                                let marginal_cost = network.marginal_cost_between(
                                    origin,
                                    destination,
                                    timestep - delta,
                                )?;
                                network.add_arc(NetworkArc::flight(
                                    network.next_arc_idx(),
                                    tail,
                                    head,
                                    leg.distance(),
                                    marginal_cost,
                                ));
                            }
                        }
                    }
                }
            }
        }

        for request in requests.iter() {
            let release = network.node_at(request.release_step(), request.origin());
            let due = network.node_at(request.due_step(), request.destination());
            let (release, due) = match (release, due) {
                (Some(release), Some(due)) => (release, due),
                _ => {
                    return Err(ModelError::UnknownAirport {
                        row: format!("request {}", request.id()),
                        airport: format!("{} or {}", request.origin(), request.destination()),
                    })
                }
            };
            network.add_arc(NetworkArc::no_service(
                network.next_arc_idx(),
                release,
                due,
                request.id(),
                request.penalty_cost(),
            ));
        }

        info!(
            "time-space network built: {} nodes, {} flight arcs, {} ground arcs, {} no-service arcs ({} layers, longest leg {} steps)",
            network.nodes.len(),
            network.flight_arcs.len(),
            network.ground_arcs.len(),
            network.no_service_arcs.len(),
            network.layers.len(),
            network.max_leg_duration
        );

        Ok(network)
    }
}

// private methods
impl Network {
    fn add_node(&mut self, timestep: Timestep, airport: AirportIdx) -> NodeIdx {
        let idx = NodeIdx::from(self.nodes.len() as Idx);
        self.nodes.push(Node::new(idx, timestep, airport));
        idx
    }

    fn next_arc_idx(&self) -> ArcIdx {
        ArcIdx::from(self.arcs.len() as Idx)
    }

    fn add_arc(&mut self, arc: NetworkArc) {
        let idx = arc.idx();
        let kind = *arc.kind();
        self.nodes[arc.origin().idx()]
            .outgoing_mut()
            .push(idx, &kind);
        self.nodes[arc.destination().idx()]
            .incoming_mut()
            .push(idx, &kind);
        match kind {
            ArcKind::Flight => self.flight_arcs.push(idx),
            ArcKind::Ground => self.ground_arcs.push(idx),
            ArcKind::NoService { request, .. } => {
                self.no_service_arcs.push(idx);
                self.no_service_arc_of.insert(request, idx);
            }
        }
        debug!("added {}", arc);
        self.arcs.push(arc);
    }

    fn marginal_cost_between(
        &self,
        origin: AirportIdx,
        destination: AirportIdx,
        departure: Timestep,
    ) -> Result<f64, ModelError> {
        let index_of = |airport: AirportIdx| {
            self.airports
                .get(airport)
                .map(|airport| airport.index())
                .ok_or_else(|| ModelError::UnknownAirport {
                    row: format!("flight {}->{}", origin, destination),
                    airport: airport.to_string(),
                })
        };
        Ok(self.config.marginal_cost.per_ton_km(
            index_of(origin)?,
            index_of(destination)?,
            self.airports.len(),
            self.config.start_of(departure),
        ))
    }
}

/// every aircraft that enters the network must leave it again.
fn check_fleet_balance(
    airports: &Airports,
    aircraft_types: &AircraftTypes,
) -> Result<(), ModelError> {
    for aircraft_type in aircraft_types.iter() {
        let (initial, final_count) = airports
            .iter()
            .filter_map(|airport| airports.get(airport))
            .fold((0, 0), |(initial, final_count), airport| {
                (
                    initial + airport.initial_aircraft(aircraft_type),
                    final_count + airport.final_aircraft(aircraft_type),
                )
            });
        if initial != final_count {
            return Err(ModelError::FleetImbalance {
                aircraft_type: aircraft_types
                    .get(aircraft_type)
                    .map(|t| t.id().to_string())
                    .unwrap_or_else(|| aircraft_type.to_string()),
                initial,
                final_count,
            });
        }
    }
    Ok(())
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "** time-space network with {} layers, {} airports and {} arcs:",
            self.layers.len(),
            self.airports.len(),
            self.arcs.len()
        )?;
        for arc in self.arcs.iter() {
            let origin = self.node(arc.origin());
            let destination = self.node(arc.destination());
            writeln!(
                f,
                "\t{} [t{} {} -> t{} {}]",
                arc,
                origin.timestep(),
                self.airports.id_of(origin.airport()),
                destination.timestep(),
                self.airports.id_of(destination.airport())
            )?;
        }
        Ok(())
    }
}
