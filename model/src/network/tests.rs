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

use proptest::prelude::*;

use super::arcs::ArcKind;
use crate::base_types::{AircraftTypeIdx, AirportIdx, RequestId};
use crate::test_utilities::{two_airport_instance, InstanceBuilder};
use crate::ModelError;

#[test]
fn two_airport_network_has_expected_arcs() {
    // ACT
    let network = two_airport_instance().build().unwrap();

    // ASSERT
    let a = AirportIdx::from(0);
    let b = AirportIdx::from(1);
    assert_eq!(network.timestep_count(), 4);
    assert_eq!(network.number_of_nodes(), 8);
    assert_eq!(network.ground_arcs().count(), 6);
    assert_eq!(network.flight_arcs().count(), 4);
    assert_eq!(network.no_service_arcs().count(), 1);
    assert_eq!(network.max_leg_duration(), 2);
    assert!(network.skipped_pairs().is_empty());

    let flight = network
        .flight_arcs()
        .find(|&f| network.arc(f).origin() == network.node_at(0, a).unwrap())
        .unwrap();
    assert_eq!(
        network.arc(flight).destination(),
        network.node_at(2, b).unwrap()
    );
    assert_eq!(network.duration_of(flight), 2);

    let request = RequestId::from(1);
    let no_service = network.no_service_arc(request).unwrap();
    assert_eq!(
        network.arc(no_service).kind(),
        &ArcKind::NoService {
            request,
            penalty: 50.0
        }
    );
    assert_eq!(network.release_node(request), network.node_at(0, a));
    assert_eq!(network.due_node(request), network.node_at(3, b));
}

#[test]
fn flight_cost_uses_departure_time() {
    let network = two_airport_instance().build().unwrap();
    let a = AirportIdx::from(0);
    let flight = network
        .flight_arcs()
        .find(|&f| network.arc(f).origin() == network.node_at(0, a).unwrap())
        .unwrap();
    // 0.05 * (1 + 2) / 3 + 0.15 * sin²(0) + 0.005 * 1
    assert!((network.arc(flight).marginal_cost() - 0.055).abs() < 1e-12);
    assert!((network.arc(flight).cost_per_ton() - 5.5).abs() < 1e-9);
}

#[test]
fn node_lists_are_partitioned_by_kind() {
    let network = two_airport_instance().build().unwrap();
    let a = AirportIdx::from(0);
    let release = network.node(network.node_at(0, a).unwrap());
    assert_eq!(release.outgoing().flight().len(), 1);
    assert_eq!(release.outgoing().ground().len(), 1);
    assert_eq!(release.outgoing().no_service().len(), 1);
    assert_eq!(release.incoming().all().count(), 0);
}

#[test]
fn supplies() {
    let network = two_airport_instance().build().unwrap();
    let a = AirportIdx::from(0);
    let b = AirportIdx::from(1);
    let ac = AircraftTypeIdx::from(0);
    let request = RequestId::from(1);

    assert_eq!(network.supply_of(request, network.node_at(0, a).unwrap()), -1);
    assert_eq!(network.supply_of(request, network.node_at(3, b).unwrap()), 1);
    assert_eq!(network.supply_of(request, network.node_at(1, a).unwrap()), 0);

    assert_eq!(network.aircraft_supply(network.node_at(0, a).unwrap(), ac), 1);
    assert_eq!(network.aircraft_supply(network.node_at(3, b).unwrap(), ac), -1);
    assert_eq!(network.aircraft_supply(network.node_at(3, a).unwrap(), ac), 0);
    assert_eq!(network.aircraft_supply(network.node_at(1, b).unwrap(), ac), 0);
}

#[test]
fn non_viable_pairs_get_no_flights() {
    let network = InstanceBuilder::new(60, 180)
        .aircraft_type("AC", 20.0, 1.0)
        .airport("A")
        .airport("B")
        .leg("A", "B", 100.0, 1)
        .leg_with_viability("B", "A", 100.0, 1, false)
        .build()
        .unwrap();
    assert_eq!(network.flight_arcs().count(), 3);
    for flight in network.flight_arcs() {
        let origin = network.node(network.arc(flight).origin());
        assert_eq!(origin.airport(), AirportIdx::from(0));
    }
}

#[test]
fn operational_arcs_within_window() {
    let network = two_airport_instance().build().unwrap();
    // flights t1->t3 and ground arcs t1->t2, t2->t3 for both airports
    assert_eq!(network.operational_arcs_within(1, 3).count(), 6);
    assert_eq!(network.operational_arcs_within(0, 0).count(), 0);
}

#[test]
fn imbalanced_fleet_is_rejected() {
    let result = InstanceBuilder::new(60, 180)
        .aircraft_type("AC", 20.0, 1.0)
        .airport("A")
        .airport("B")
        .aircraft("A", "AC", 2, 1)
        .leg("A", "B", 100.0, 1)
        .build();
    assert!(matches!(result, Err(ModelError::FleetImbalance { .. })));
}

#[test]
fn request_outside_the_horizon_is_rejected() {
    let result = two_airport_instance()
        .request(2, "A", "B", 1.0, 100, 110, 1.0)
        .build();
    assert!(matches!(result, Err(ModelError::InvalidRequest { .. })));
}

fn leg_durations() -> impl Strategy<Value = (u32, usize, Vec<(u32, bool)>)> {
    (1u32..8, 2usize..5).prop_flat_map(|(steps, airports)| {
        (
            Just(steps),
            Just(airports),
            proptest::collection::vec((1u32..5, proptest::bool::ANY), airports * airports),
        )
    })
}

#[test]
fn marginal_cost_of_unknown_airport_is_an_error() {
    let network = two_airport_instance().build().unwrap();
    let a = AirportIdx::from(0);
    let b = AirportIdx::from(1);

    let known = network.marginal_cost_between(a, b, 0).unwrap();
    let unknown = network.marginal_cost_between(a, AirportIdx::from(7), 0);

    assert!((known - 0.055).abs() < 1e-9);
    assert!(matches!(unknown, Err(ModelError::UnknownAirport { .. })));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn network_is_well_formed((steps, airport_count, legs) in leg_durations()) {
        let names: Vec<String> = (0..airport_count).map(|i| format!("P{}", i)).collect();
        let mut builder = InstanceBuilder::new(30, 30 * steps).aircraft_type("AC", 10.0, 1.0);
        for name in names.iter() {
            builder = builder.airport(name);
        }
        for (i, origin) in names.iter().enumerate() {
            for (j, destination) in names.iter().enumerate() {
                if i != j {
                    let (duration, viable) = legs[i * airport_count + j];
                    builder = builder.leg_with_viability(origin, destination, 10.0 * (duration as f64), duration, viable);
                }
            }
        }
        builder = builder.request(7, "P0", "P1", 1.0, 0, 30 * steps as i64, 1.0);
        let network = builder.build().unwrap();

        prop_assert_eq!(network.number_of_nodes(), (steps as usize + 1) * airport_count);
        prop_assert_eq!(network.ground_arcs().count(), steps as usize * airport_count);
        prop_assert_eq!(network.no_service_arcs().count(), 1);

        let airports = network.airports();
        for arc_idx in network.arcs() {
            let arc = network.arc(arc_idx);
            prop_assert!(arc.origin().idx() < network.number_of_nodes());
            prop_assert!(arc.destination().idx() < network.number_of_nodes());
            let origin = network.node(arc.origin());
            let destination = network.node(arc.destination());
            prop_assert!(destination.timestep() >= origin.timestep());
            match arc.kind() {
                ArcKind::Ground => {
                    prop_assert_eq!(origin.airport(), destination.airport());
                    prop_assert_eq!(destination.timestep() - origin.timestep(), 1);
                }
                ArcKind::Flight => {
                    prop_assert_ne!(origin.airport(), destination.airport());
                    let leg = airports.leg(origin.airport(), destination.airport()).unwrap();
                    prop_assert_eq!(destination.timestep() - origin.timestep(), leg.duration());
                    let (_, viable) = legs[origin.airport().idx() * airport_count + destination.airport().idx()];
                    prop_assert!(viable);
                }
                ArcKind::NoService { .. } => {
                    prop_assert_eq!(origin.timestep(), 0);
                    prop_assert_eq!(destination.timestep(), steps);
                }
            }
            prop_assert!(network.node(arc.origin()).outgoing().all().any(|a| a == arc_idx));
            prop_assert!(network.node(arc.destination()).incoming().all().any(|a| a == arc_idx));
        }

        // every viable leg that fits into the horizon is scheduled at every possible departure
        let mut expected_flights = 0;
        for i in 0..airport_count {
            for j in 0..airport_count {
                let (duration, viable) = legs[i * airport_count + j];
                if i != j && viable && duration <= steps {
                    expected_flights += (steps - duration + 1) as usize;
                }
            }
        }
        prop_assert_eq!(network.flight_arcs().count(), expected_flights);
    }
}
