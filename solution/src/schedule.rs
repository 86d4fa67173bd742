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

#[cfg(test)]
mod tests;

use itertools::Itertools;
use model::base_types::{
    AircraftCount, AircraftTypeIdx, ArcIdx, Cost, NodeIdx, RequestId, Weight,
};
use model::network::Network;

use crate::path::Path;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// the final routing: one selected path per request, the aircraft type flying each operated
/// flight arc and the number of aircraft waiting on each ground arc.
pub struct CargoSchedule {
    selected_paths: BTreeMap<RequestId, Path>,
    flight_assignments: BTreeMap<ArcIdx, AircraftTypeIdx>,
    ground_aircraft: BTreeMap<(ArcIdx, AircraftTypeIdx), AircraftCount>,

    network: Arc<Network>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    pub operating: Cost, // aircraft operating cost of the flown legs
    pub transport: Cost, // marginal cargo cost of the service paths
    pub penalty: Cost,   // penalty of the unserved requests
}

impl CostBreakdown {
    pub fn total(&self) -> Cost {
        self.operating + self.transport + self.penalty
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "total: {:.2} (operating: {:.2}, transport: {:.2}, penalty: {:.2})",
            self.total(),
            self.operating,
            self.transport,
            self.penalty
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScheduleSummary {
    pub flight_arcs_used: usize,
    pub ground_arcs_used: usize,
    pub no_service_arcs_used: usize,
    pub served_requests: usize,
    pub unserved_requests: usize,
    pub served_weight: Weight,
    pub unserved_weight: Weight,
    pub total_penalty: Cost,
}

// static functions
impl CargoSchedule {
    /// checks that exactly one path is selected per request, that aircraft types are only
    /// assigned to flight arcs and that aircraft only wait on ground arcs.
    pub fn new(
        network: Arc<Network>,
        selected_paths: Vec<Path>,
        flight_assignments: BTreeMap<ArcIdx, AircraftTypeIdx>,
        ground_aircraft: BTreeMap<(ArcIdx, AircraftTypeIdx), AircraftCount>,
    ) -> Result<CargoSchedule, String> {
        let mut paths = BTreeMap::new();
        for path in selected_paths {
            let request = path.request();
            if network.requests().get(request).is_none() {
                return Err(format!("path {} belongs to unknown request {}", path.id(), request));
            }
            if let Some(previous) = paths.insert(request, path) {
                return Err(format!(
                    "request {} has more than one selected path ({} and another)",
                    request,
                    previous.id()
                ));
            }
        }
        if let Some(request) = network
            .requests()
            .ids()
            .find(|request| !paths.contains_key(request))
        {
            return Err(format!("request {} has no selected path", request));
        }
        if let Some(arc) = flight_assignments
            .keys()
            .find(|&&arc| arc.idx() >= network.number_of_arcs() || !network.arc(arc).is_flight())
        {
            return Err(format!("aircraft type assigned to non-flight arc {}", arc));
        }
        if let Some((arc, _)) = ground_aircraft
            .keys()
            .find(|(arc, _)| arc.idx() >= network.number_of_arcs() || !network.arc(*arc).is_ground())
        {
            return Err(format!("aircraft waiting on non-ground arc {}", arc));
        }
        Ok(CargoSchedule {
            selected_paths: paths,
            flight_assignments,
            ground_aircraft: ground_aircraft
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .collect(),
            network,
        })
    }
}

// methods
impl CargoSchedule {
    pub fn network(&self) -> Arc<Network> {
        self.network.clone()
    }

    pub fn path_of(&self, request: RequestId) -> Option<&Path> {
        self.selected_paths.get(&request)
    }

    /// selected paths ordered by request.
    pub fn selected_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.selected_paths.values()
    }

    pub fn flight_assignments(&self) -> impl Iterator<Item = (ArcIdx, AircraftTypeIdx)> + '_ {
        self.flight_assignments
            .iter()
            .map(|(&arc, &aircraft_type)| (arc, aircraft_type))
    }

    pub fn aircraft_type_of(&self, flight: ArcIdx) -> Option<AircraftTypeIdx> {
        self.flight_assignments.get(&flight).copied()
    }

    pub fn ground_aircraft(
        &self,
    ) -> impl Iterator<Item = (ArcIdx, AircraftTypeIdx, AircraftCount)> + '_ {
        self.ground_aircraft
            .iter()
            .map(|(&(arc, aircraft_type), &count)| (arc, aircraft_type, count))
    }

    /// total weight of the selected paths using the flight arc.
    pub fn cargo_on_flight(&self, flight: ArcIdx) -> Weight {
        let requests = self.network.requests();
        self.selected_paths
            .values()
            .filter(|path| path.contains_flight_arc(flight))
            .filter_map(|path| requests.get(path.request()))
            .map(|request| request.weight())
            .sum()
    }

    pub fn cost_breakdown(&self) -> CostBreakdown {
        let aircraft_types = self.network.aircraft_types();
        let operating: Cost = self
            .flight_assignments
            .iter()
            .map(|(&arc, &aircraft_type)| {
                aircraft_types
                    .get(aircraft_type)
                    .map(|t| t.operating_cost())
                    .unwrap_or(0.0)
                    * self.network.distance_of(arc).in_km()
            })
            .sum();
        let (no_service, service): (Vec<&Path>, Vec<&Path>) = self
            .selected_paths
            .values()
            .partition(|path| path.is_no_service());
        CostBreakdown {
            operating,
            transport: service.iter().map(|path| path.cost()).sum(),
            penalty: no_service.iter().map(|path| path.cost()).sum(),
        }
    }

    pub fn summary(&self) -> ScheduleSummary {
        let requests = self.network.requests();
        let mut summary = ScheduleSummary {
            flight_arcs_used: self.flight_assignments.len(),
            ground_arcs_used: self
                .ground_aircraft
                .keys()
                .map(|(arc, _)| *arc)
                .unique()
                .count(),
            ..Default::default()
        };
        for path in self.selected_paths.values() {
            let weight = requests
                .get(path.request())
                .map(|r| r.weight())
                .unwrap_or(0.0);
            if path.is_no_service() {
                summary.no_service_arcs_used += 1;
                summary.unserved_requests += 1;
                summary.unserved_weight += weight;
                summary.total_penalty += path.cost();
            } else {
                summary.served_requests += 1;
                summary.served_weight += weight;
            }
        }
        summary
    }

    /// (node, aircraft type, imbalance) for every node where outgoing minus incoming aircraft
    /// differs from the aircraft supply. Empty for a feasible schedule.
    pub fn aircraft_flow_violations(&self) -> Vec<(NodeIdx, AircraftTypeIdx, i64)> {
        let mut balance: HashMap<(NodeIdx, AircraftTypeIdx), i64> = HashMap::new();
        let moves = self
            .flight_assignments
            .iter()
            .map(|(&arc, &aircraft_type)| (arc, aircraft_type, 1))
            .chain(
                self.ground_aircraft
                    .iter()
                    .map(|(&(arc, aircraft_type), &count)| (arc, aircraft_type, count as i64)),
            );
        for (arc, aircraft_type, count) in moves {
            let arc = self.network.arc(arc);
            *balance.entry((arc.origin(), aircraft_type)).or_insert(0) += count;
            *balance.entry((arc.destination(), aircraft_type)).or_insert(0) -= count;
        }

        let aircraft_types = self.network.aircraft_types();
        let mut violations = Vec::new();
        for node in self.network.nodes() {
            for aircraft_type in aircraft_types.iter() {
                let flow = balance.get(&(node, aircraft_type)).copied().unwrap_or(0);
                let imbalance = flow - self.network.aircraft_supply(node, aircraft_type);
                if imbalance != 0 {
                    violations.push((node, aircraft_type, imbalance));
                }
            }
        }
        violations
    }

    /// flights whose cargo exceeds the payload of the assigned aircraft (or that carry cargo
    /// without an aircraft), with the excess weight.
    pub fn capacity_violations(&self) -> Vec<(ArcIdx, Weight)> {
        let aircraft_types = self.network.aircraft_types();
        self.network
            .flight_arcs()
            .filter_map(|flight| {
                let payload = self
                    .aircraft_type_of(flight)
                    .and_then(|t| aircraft_types.get(t))
                    .map(|t| t.payload())
                    .unwrap_or(0.0);
                let excess = self.cargo_on_flight(flight) - payload;
                (excess > 1e-9).then_some((flight, excess))
            })
            .collect()
    }

    pub fn print_summary(&self) {
        let summary = self.summary();
        println!("** schedule summary:");
        println!("  flight arcs used:     {}", summary.flight_arcs_used);
        println!("  ground arcs used:     {}", summary.ground_arcs_used);
        println!("  no-service arcs used: {}", summary.no_service_arcs_used);
        println!(
            "  packages handled:     {} ({:.1}t)",
            summary.served_requests, summary.served_weight
        );
        println!(
            "  packages not handled: {} ({:.1}t)",
            summary.unserved_requests, summary.unserved_weight
        );
        println!("  total penalty:        {:.2}", summary.total_penalty);
        println!("  cost: {}", self.cost_breakdown());
    }

    pub fn print_routing(&self) {
        let airports = self.network.airports();
        let aircraft_types = self.network.aircraft_types();
        for path in self.selected_paths.values() {
            let legs = path
                .flight_arcs()
                .iter()
                .map(|&flight| {
                    let arc = self.network.arc(flight);
                    let origin = self.network.node(arc.origin());
                    let destination = self.network.node(arc.destination());
                    format!(
                        "{}@t{}->{}@t{} [{}]",
                        airports.id_of(origin.airport()),
                        origin.timestep(),
                        airports.id_of(destination.airport()),
                        destination.timestep(),
                        self.aircraft_type_of(flight)
                            .and_then(|t| aircraft_types.get(t))
                            .map(|t| t.id().to_string())
                            .unwrap_or_else(|| String::from("-"))
                    )
                })
                .join(", ");
            if path.is_no_service() {
                println!("  request {}: not served", path.request());
            } else {
                println!("  request {}: {}", path.request(), legs);
            }
        }
    }
}
