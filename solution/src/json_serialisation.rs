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

use model::base_types::{ArcIdx, NodeIdx};
use model::network::Network;
use serde::{Deserialize, Serialize};

use crate::schedule::CargoSchedule;

/// a network node as (timestep, airport index), as used for plotting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct JsonNode {
    timestep: u32,
    airport: String,
    airport_index: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct JsonLeg {
    from: JsonNode,
    to: JsonNode,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRouting {
    request: u32,
    served: bool,
    cost: f64,
    flights: Vec<JsonLeg>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonFlight {
    from: JsonNode,
    to: JsonNode,
    aircraft_type: String,
    distance_in_km: f64,
    cargo_in_tons: f64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonGroundArc {
    from: JsonNode,
    to: JsonNode,
    aircraft_type: String,
    aircraft_count: u32,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonCosts {
    total: f64,
    operating: f64,
    transport: f64,
    penalty: f64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonSchedule {
    costs: JsonCosts,
    routing: Vec<JsonRouting>,
    flights: Vec<JsonFlight>,
    ground_arcs: Vec<JsonGroundArc>,
}

pub fn schedule_to_json(
    schedule: &CargoSchedule,
) -> Result<serde_json::Value, serde_json::Error> {
    let network = schedule.network();
    let aircraft_types = network.aircraft_types();
    let type_name = |t| {
        aircraft_types
            .get(t)
            .map(|t| t.id().to_string())
            .unwrap_or_default()
    };

    let costs = schedule.cost_breakdown();
    let routing = schedule
        .selected_paths()
        .map(|path| JsonRouting {
            request: path.request().value(),
            served: !path.is_no_service(),
            cost: path.cost(),
            flights: path
                .flight_arcs()
                .iter()
                .map(|&arc| json_leg(&network, arc))
                .collect(),
        })
        .collect();
    let flights = schedule
        .flight_assignments()
        .map(|(arc, aircraft_type)| {
            let leg = json_leg(&network, arc);
            JsonFlight {
                from: leg.from,
                to: leg.to,
                aircraft_type: type_name(aircraft_type),
                distance_in_km: network.distance_of(arc).in_km(),
                cargo_in_tons: schedule.cargo_on_flight(arc),
            }
        })
        .collect();
    let ground_arcs = schedule
        .ground_aircraft()
        .map(|(arc, aircraft_type, count)| {
            let leg = json_leg(&network, arc);
            JsonGroundArc {
                from: leg.from,
                to: leg.to,
                aircraft_type: type_name(aircraft_type),
                aircraft_count: count,
            }
        })
        .collect();

    let json_schedule = JsonSchedule {
        costs: JsonCosts {
            total: costs.total(),
            operating: costs.operating,
            transport: costs.transport,
            penalty: costs.penalty,
        },
        routing,
        flights,
        ground_arcs,
    };
    serde_json::to_value(json_schedule)
}

fn json_leg(network: &Network, arc: ArcIdx) -> JsonLeg {
    let arc = network.arc(arc);
    JsonLeg {
        from: json_node(network, arc.origin()),
        to: json_node(network, arc.destination()),
    }
}

fn json_node(network: &Network, node: NodeIdx) -> JsonNode {
    let node = network.node(node);
    let airports = network.airports();
    JsonNode {
        timestep: node.timestep(),
        airport: airports.id_of(node.airport()),
        airport_index: airports
            .get(node.airport())
            .map(|airport| airport.index())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use model::base_types::{AircraftTypeIdx, AirportIdx, RequestId};
    use model::test_utilities::two_airport_instance;

    use crate::path_catalog::PathCatalog;
    use crate::schedule::CargoSchedule;

    use super::schedule_to_json;

    #[test]
    fn schedule_is_written_with_plot_coordinates() {
        let network = two_airport_instance().build().unwrap();
        let a0 = network.node_at(0, AirportIdx::from(0)).unwrap();
        let b2 = network.node_at(2, AirportIdx::from(1)).unwrap();
        let flight = network.node(a0).outgoing().flight()[0];
        let ground = network.node(b2).outgoing().ground()[0];
        let mut catalog = PathCatalog::seeded(network.clone()).unwrap();
        let id = catalog
            .add(RequestId::from(1), vec![flight, ground])
            .unwrap();
        let ac = AircraftTypeIdx::from(0);
        let schedule = CargoSchedule::new(
            network.clone(),
            vec![catalog.path(id).unwrap().clone()],
            BTreeMap::from([(flight, ac)]),
            BTreeMap::from([((ground, ac), 1)]),
        )
        .unwrap();

        let json = schedule_to_json(&schedule).unwrap();

        assert_eq!(json["routing"][0]["request"], 1);
        assert_eq!(json["routing"][0]["served"], true);
        assert_eq!(json["routing"][0]["flights"][0]["from"]["timestep"], 0);
        assert_eq!(json["routing"][0]["flights"][0]["to"]["airportIndex"], 2);
        assert_eq!(json["flights"][0]["aircraftType"], "AC");
        assert_eq!(json["flights"][0]["cargoInTons"], 10.0);
        assert_eq!(json["groundArcs"][0]["aircraftCount"], 1);
        assert_eq!(json["costs"]["penalty"], 0.0);
    }
}
