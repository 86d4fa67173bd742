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

use std::{fs::File, io::Read, path::PathBuf, time::Duration};

use crate::{
    base_types::{AircraftTypeIdx, AirportIdx, RequestId},
    config::PricingEngine,
    json_serialisation::load_cargo_routing_instance_from_json,
    ModelError,
};

fn read_json(path: &str) -> serde_json::Value {
    let mut file = File::open(path).unwrap();
    let mut input_data = String::new();
    file.read_to_string(&mut input_data).unwrap();
    serde_json::from_str(&input_data).unwrap()
}

#[test]
fn test_load_from_json_with_great_circle_legs() {
    // ACT
    let network =
        load_cargo_routing_instance_from_json(read_json("resources/small_instance.json")).unwrap();
    let airports = network.airports();
    let aircraft_types = network.aircraft_types();
    let requests = network.requests();
    let config = network.config();

    // ASSERT
    let lux = airports.get_idx("LUX").unwrap();
    let ord = airports.get_idx("ORD").unwrap();
    let fra = airports.get_idx("FRA").unwrap();
    assert_eq!(lux, AirportIdx::from(0));
    assert_eq!(airports.get(fra).unwrap().index(), 3);

    let ac1 = aircraft_types.get_idx("AC_1").unwrap();
    let ac2 = aircraft_types.get_idx("AC_2").unwrap();
    assert_eq!(ac2, AircraftTypeIdx::from(1));
    assert_eq!(aircraft_types.get(ac2).unwrap().payload(), 40.0);
    assert_eq!(airports.get(lux).unwrap().initial_aircraft(ac1), 2);
    assert_eq!(airports.get(lux).unwrap().final_aircraft(ac1), 2);
    assert_eq!(airports.get(ord).unwrap().final_aircraft(ac2), 2);
    assert_eq!(airports.get(fra).unwrap().initial_aircraft(ac1), 0);

    assert_eq!(airports.leg(lux, ord).unwrap().duration(), 3);
    assert_eq!(airports.leg(lux, fra).unwrap().duration(), 1);

    assert_eq!(config.timestep_count(), 13);
    assert_eq!(config.column_generation.max_iterations, 100);
    assert_eq!(config.column_generation.pricing_engine, PricingEngine::Milp);

    let request = requests.get(RequestId::from(2)).unwrap();
    assert_eq!(request.release_step(), 2);
    assert_eq!(request.due_step(), 12);
    let request = requests.get(RequestId::from(3)).unwrap();
    assert_eq!(request.release_step(), 0);
    assert_eq!(request.due_step(), 8);

    assert_eq!(network.number_of_nodes(), 39);
    assert_eq!(network.ground_arcs().count(), 36);
    // LUX<->ORD: 10 departures each way, LUX<->FRA: 12 departures each way
    assert_eq!(network.flight_arcs().count(), 44);
    assert_eq!(network.no_service_arcs().count(), 3);
    assert_eq!(network.max_leg_duration(), 3);
}

#[test]
fn test_load_from_json_with_explicit_legs() {
    // ACT
    let network =
        load_cargo_routing_instance_from_json(read_json("resources/small_instance_with_legs.json"))
            .unwrap();
    let airports = network.airports();
    let config = network.config();

    // ASSERT
    let a = airports.get_idx("A").unwrap();
    let c = airports.get_idx("C").unwrap();
    assert_eq!(network.skipped_pairs(), &[(a, c)]);
    assert_eq!(network.flight_arcs().count(), 10);
    assert_eq!(network.ground_arcs().count(), 18);

    // 0.1 * (1 + 2) / 5 per ton and km
    let flight = network.flight_arcs().next().unwrap();
    assert!((network.arc(flight).cost_per_ton() - 30.0).abs() < 1e-9);

    let cg = &config.column_generation;
    assert_eq!(cg.max_iterations, 20);
    assert_eq!(cg.time_limit, Some(Duration::from_secs(30)));
    assert_eq!(cg.iteration_time_limit, None);
    assert_eq!(cg.reduced_cost_tolerance, 0.0001);
    assert!(!cg.parallel_pricing);
    assert_eq!(cg.pricing_engine, PricingEngine::NetworkSimplex);
    assert_eq!(cg.write_model_to, Some(PathBuf::from("output/model.lp")));
}

#[test]
fn test_unknown_airport_names_the_row() {
    let mut input = read_json("resources/small_instance.json");
    input["requests"][0]["origin"] = serde_json::json!("XXX");
    let result = load_cargo_routing_instance_from_json(input);
    assert_eq!(
        result.err(),
        Some(ModelError::UnknownAirport {
            row: String::from("request 1"),
            airport: String::from("XXX")
        })
    );
}

#[test]
fn test_negative_weight_is_rejected() {
    let mut input = read_json("resources/small_instance.json");
    input["requests"][1]["weightInTons"] = serde_json::json!(-1.0);
    let result = load_cargo_routing_instance_from_json(input);
    assert!(matches!(result, Err(ModelError::InvalidRequest { .. })));
}

#[test]
fn test_missing_field_is_a_json_error() {
    let mut input = read_json("resources/small_instance.json");
    input["parameters"] = serde_json::json!({});
    let result = load_cargo_routing_instance_from_json(input);
    assert!(matches!(result, Err(ModelError::Json(_))));
}

#[test]
fn test_out_of_range_time_limit_is_rejected() {
    for limit in [-1.0, 1e30] {
        let mut input = read_json("resources/small_instance.json");
        input["parameters"]["columnGeneration"]["timeLimitInSeconds"] = serde_json::json!(limit);
        let result = load_cargo_routing_instance_from_json(input);
        assert!(matches!(result, Err(ModelError::InvalidConfig(_))));
    }
}

#[test]
fn test_large_iteration_time_limit_is_rejected() {
    let mut input = read_json("resources/small_instance.json");
    input["parameters"]["columnGeneration"]["iterationTimeLimitInSeconds"] =
        serde_json::json!(1e300);
    let result = load_cargo_routing_instance_from_json(input);
    assert!(matches!(result, Err(ModelError::InvalidConfig(_))));
}

#[test]
fn test_duplicate_leg_is_rejected() {
    let mut input = read_json("resources/small_instance_with_legs.json");
    let legs = input["legs"].as_array_mut().unwrap();
    legs.push(serde_json::json!({
        "origin": "A", "destination": "B", "distanceInKm": 700, "durationInTimesteps": 3
    }));
    let result = load_cargo_routing_instance_from_json(input);
    assert_eq!(
        result.err(),
        Some(ModelError::InvalidLeg {
            origin: String::from("A"),
            destination: String::from("B"),
            reason: String::from("leg is given more than once"),
        })
    );
}
