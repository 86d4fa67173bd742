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

use std::collections::HashMap;
use std::sync::Arc;

use model::base_types::{AirportIdx, ArcIdx, RequestId, Timestep};
use model::config::PricingEngine;
use model::network::Network;
use model::test_utilities::two_airport_instance;
use solution::path_catalog::PathCatalog;

use crate::lp::highs_backend::HighsBackend;
use crate::lp::{LpBackend, LpOutcome, SolveOptions};
use crate::master_problem::{Duals, MasterProblem};
use crate::pricing::{pricing_solver, reduced_cost, PricingSolver};

const ENGINES: [PricingEngine; 2] = [PricingEngine::Milp, PricingEngine::NetworkSimplex];

fn flight_from(network: &Network, timestep: Timestep, airport: u32) -> ArcIdx {
    let node = network.node_at(timestep, AirportIdx::from(airport)).unwrap();
    network.node(node).outgoing().flight()[0]
}

fn ground_from(network: &Network, timestep: Timestep, airport: u32) -> ArcIdx {
    let node = network.node_at(timestep, AirportIdx::from(airport)).unwrap();
    network.node(node).outgoing().ground()[0]
}

fn solver(engine: PricingEngine) -> Box<dyn PricingSolver> {
    pricing_solver(engine, Arc::new(HighsBackend), SolveOptions::default())
}

#[test]
fn cheapest_flight_is_found_by_both_engines() {
    // ARRANGE
    let network = two_airport_instance().build().unwrap();
    let requests = network.requests();
    let request = requests.get(RequestId::from(1)).unwrap();
    let duals = Duals::new(HashMap::from([(RequestId::from(1), 100.0)]), HashMap::new());

    for engine in ENGINES {
        // ACT
        let proposal = solver(engine)
            .price(&network, request, &duals)
            .unwrap()
            .unwrap();

        // ASSERT
        // departing at midnight is cheapest: 10t * 0.055 * 100km
        assert_eq!(
            proposal.arcs(),
            &[flight_from(&network, 0, 0), ground_from(&network, 2, 1)],
            "engine {:?}",
            engine
        );
        assert!((proposal.reduced_cost() - (55.0 - 100.0)).abs() < 1e-6);
        assert_eq!(proposal.request(), RequestId::from(1));
    }
}

#[test]
fn flight_dual_shifts_the_path_to_a_later_departure() {
    let network = two_airport_instance().build().unwrap();
    let requests = network.requests();
    let request = requests.get(RequestId::from(1)).unwrap();
    let early = flight_from(&network, 0, 0);
    let late = flight_from(&network, 1, 0);
    let duals = Duals::new(
        HashMap::from([(RequestId::from(1), 100.0)]),
        HashMap::from([(early, -2.0)]),
    );

    for engine in ENGINES {
        let proposal = solver(engine)
            .price(&network, request, &duals)
            .unwrap()
            .unwrap();

        assert_eq!(
            proposal.arcs(),
            &[ground_from(&network, 0, 0), late],
            "engine {:?}",
            engine
        );
        let expected = 10.0 * network.arc(late).cost_per_ton() - 100.0;
        assert!((proposal.reduced_cost() - expected).abs() < 1e-6);
        assert!(
            (reduced_cost(&network, request, &duals, proposal.arcs()) - expected).abs() < 1e-9
        );
    }
}

#[test]
fn too_narrow_window_yields_no_path() {
    // the leg takes two timesteps but the request is due after one
    let network = two_airport_instance()
        .request(2, "A", "B", 5.0, 0, 60, 1.0)
        .build()
        .unwrap();
    let requests = network.requests();
    let request = requests.get(RequestId::from(2)).unwrap();
    let duals = Duals::new(HashMap::from([(RequestId::from(2), 100.0)]), HashMap::new());

    for engine in ENGINES {
        let proposal = solver(engine).price(&network, request, &duals).unwrap();
        assert_eq!(proposal, None, "engine {:?}", engine);
    }
}

#[test]
fn reduced_cost_counts_flights_only() {
    let network = two_airport_instance().build().unwrap();
    let requests = network.requests();
    let request = requests.get(RequestId::from(1)).unwrap();
    let flight = flight_from(&network, 0, 0);
    let duals = Duals::new(
        HashMap::from([(RequestId::from(1), 20.0)]),
        HashMap::from([(flight, -1.5)]),
    );

    let arcs = [flight, ground_from(&network, 2, 1)];

    assert!((reduced_cost(&network, request, &duals, &arcs) - (70.0 - 20.0)).abs() < 1e-9);
}

#[test]
fn zero_duals_price_the_true_transport_cost() {
    // ARRANGE
    let network = two_airport_instance().build().unwrap();
    let requests = network.requests();
    let request = requests.get(RequestId::from(1)).unwrap();
    let penalty = request.penalty_cost();
    let zero = Duals::default();

    for engine in ENGINES {
        // ACT
        let proposal = solver(engine).price(&network, request, &zero).unwrap().unwrap();

        // ASSERT
        // with all duals zero the reduced cost is the marginal cost of the cheapest path
        let transport: f64 = proposal
            .arcs()
            .iter()
            .filter(|&&arc| network.arc(arc).is_flight())
            .map(|&arc| network.arc(arc).cost_per_ton() * request.weight())
            .sum();
        assert!((transport - 55.0).abs() < 1e-6, "engine {:?}", engine);
        assert!((proposal.reduced_cost() - transport).abs() < 1e-6);

        // no-service is not worse: the request dual of the seeded master problem is the
        // penalty and the cheapest path does not beat it
        let seeded = Duals::new(HashMap::from([(RequestId::from(1), penalty)]), HashMap::new());
        let proposal = solver(engine).price(&network, request, &seeded).unwrap().unwrap();
        assert!(proposal.reduced_cost() >= 0.0, "engine {:?}", engine);

        // a tie is not an improvement either
        let tie = Duals::new(HashMap::from([(RequestId::from(1), transport)]), HashMap::new());
        let proposal = solver(engine).price(&network, request, &tie).unwrap().unwrap();
        assert!(proposal.reduced_cost() > -1e-6, "engine {:?}", engine);
    }
}

#[test]
fn milp_pricing_runs_on_the_thread_of_the_master_problem() {
    // ARRANGE
    let network = two_airport_instance().build().unwrap();
    let catalog = PathCatalog::seeded(network.clone()).unwrap();
    let master = MasterProblem::build(&catalog, false).unwrap();
    let solution = match HighsBackend
        .solve(master.program(), &SolveOptions::default())
        .unwrap()
    {
        LpOutcome::Optimal(solution) => solution,
        other => panic!("unexpected outcome {:?}", other),
    };
    let duals = master.duals(&solution);
    let requests = network.requests();
    let request = requests.get(RequestId::from(1)).unwrap();

    // ACT
    let proposal = solver(PricingEngine::Milp).price(&network, request, &duals);

    // ASSERT
    let proposal = proposal.unwrap().unwrap();
    assert!((proposal.reduced_cost() - (55.0 - duals.of_request(request.id()))).abs() < 1e-6);
}
