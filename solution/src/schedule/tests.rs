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

use std::collections::BTreeMap;
use std::sync::Arc;

use model::base_types::{AircraftTypeIdx, AirportIdx, ArcIdx, RequestId};
use model::network::Network;
use model::test_utilities::two_airport_instance;

use crate::path::PathId;
use crate::path_catalog::PathCatalog;
use crate::schedule::CargoSchedule;

struct TestData {
    network: Arc<Network>,
    catalog: PathCatalog,
    flight: ArcIdx, // A@t0 -> B@t2
    ground_at_b: ArcIdx, // B@t2 -> B@t3
    service_path: PathId, // flight, then wait at B
    no_service_path: PathId,
}

fn init_test_data() -> TestData {
    let network = two_airport_instance().build().unwrap();
    let a = network.node_at(0, AirportIdx::from(0)).unwrap();
    let b = network.node_at(2, AirportIdx::from(1)).unwrap();
    let flight = network.node(a).outgoing().flight()[0];
    let ground_at_b = network.node(b).outgoing().ground()[0];
    let mut catalog = PathCatalog::seeded(network.clone()).unwrap();
    let request = RequestId::from(1);
    let service_path = catalog.add(request, vec![flight, ground_at_b]).unwrap();
    TestData {
        network,
        catalog,
        flight,
        ground_at_b,
        service_path,
        no_service_path: PathId::new(request, 0),
    }
}

#[test]
fn feasible_schedule_has_no_violations() {
    // ARRANGE
    let data = init_test_data();
    let ac = AircraftTypeIdx::from(0);
    let path = data.catalog.path(data.service_path).unwrap().clone();

    // ACT
    let schedule = CargoSchedule::new(
        data.network.clone(),
        vec![path],
        BTreeMap::from([(data.flight, ac)]),
        BTreeMap::from([((data.ground_at_b, ac), 1)]),
    )
    .unwrap();

    // ASSERT
    assert!(schedule.aircraft_flow_violations().is_empty());
    assert!(schedule.capacity_violations().is_empty());
    assert_eq!(schedule.cargo_on_flight(data.flight), 10.0);

    let costs = schedule.cost_breakdown();
    assert!((costs.operating - 100.0).abs() < 1e-9);
    assert!((costs.transport - 55.0).abs() < 1e-9);
    assert_eq!(costs.penalty, 0.0);
    assert!((costs.total() - 155.0).abs() < 1e-9);

    let summary = schedule.summary();
    assert_eq!(summary.flight_arcs_used, 1);
    assert_eq!(summary.ground_arcs_used, 1);
    assert_eq!(summary.no_service_arcs_used, 0);
    assert_eq!(summary.served_requests, 1);
    assert_eq!(summary.served_weight, 10.0);
    assert_eq!(summary.unserved_requests, 0);
}

#[test]
fn missing_ground_aircraft_breaks_conservation() {
    let data = init_test_data();
    let ac = AircraftTypeIdx::from(0);
    let path = data.catalog.path(data.service_path).unwrap().clone();
    let schedule = CargoSchedule::new(
        data.network.clone(),
        vec![path],
        BTreeMap::from([(data.flight, ac)]),
        BTreeMap::new(),
    )
    .unwrap();

    let b2 = data.network.node_at(2, AirportIdx::from(1)).unwrap();
    let b3 = data.network.node_at(3, AirportIdx::from(1)).unwrap();
    assert_eq!(
        schedule.aircraft_flow_violations(),
        vec![(b2, ac, -1), (b3, ac, 1)]
    );
}

#[test]
fn unserved_request_pays_penalty_and_overloaded_flight_is_reported() {
    let data = init_test_data();
    let path = data.catalog.path(data.no_service_path).unwrap().clone();
    let schedule =
        CargoSchedule::new(data.network.clone(), vec![path], BTreeMap::new(), BTreeMap::new())
            .unwrap();

    let summary = schedule.summary();
    assert_eq!(summary.unserved_requests, 1);
    assert_eq!(summary.no_service_arcs_used, 1);
    assert_eq!(summary.total_penalty, 50.0);
    assert_eq!(schedule.cost_breakdown().penalty, 50.0);
    assert!(schedule.capacity_violations().is_empty());
    // the aircraft never leaves A
    assert_eq!(schedule.aircraft_flow_violations().len(), 2);

    let path = data.catalog.path(data.service_path).unwrap().clone();
    let schedule =
        CargoSchedule::new(data.network.clone(), vec![path], BTreeMap::new(), BTreeMap::new())
            .unwrap();
    assert_eq!(schedule.capacity_violations(), vec![(data.flight, 10.0)]);
}

#[test]
fn every_request_needs_exactly_one_path() {
    let data = init_test_data();
    assert!(
        CargoSchedule::new(data.network.clone(), vec![], BTreeMap::new(), BTreeMap::new())
            .is_err()
    );
    let paths = vec![
        data.catalog.path(data.service_path).unwrap().clone(),
        data.catalog.path(data.no_service_path).unwrap().clone(),
    ];
    assert!(
        CargoSchedule::new(data.network.clone(), paths, BTreeMap::new(), BTreeMap::new())
            .is_err()
    );
}
