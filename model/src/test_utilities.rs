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

//! Small hand-made instances for tests. Airports are placed on top of each other and legs are
//! given explicitly, so distances and durations can be chosen freely.

use std::collections::HashMap;
use std::sync::Arc;

use crate::aircraft_types::{AircraftType, AircraftTypes};
use crate::airports::{Airport, Airports, Leg};
use crate::base_types::{
    AircraftCount, AircraftTypeIdx, AirportIdx, Coordinates, Cost, Distance, Idx, RequestId,
    Timestep, Weight,
};
use crate::config::{Config, ConfigColumnGeneration};
use crate::marginal_cost::MarginalCost;
use crate::network::{Network, ViablePairs};
use crate::requests::{RelativeMinutes, Request, Requests};
use crate::ModelError;

struct TestRequest {
    id: Idx,
    origin: String,
    destination: String,
    weight: Weight,
    release: RelativeMinutes,
    due: RelativeMinutes,
    penalty: Cost,
}

pub struct InstanceBuilder {
    timestep_duration: u32,
    planning_horizon: u32,
    column_generation: ConfigColumnGeneration,
    aircraft_types: Vec<(String, Weight, Cost)>,
    airports: Vec<String>,
    aircraft: Vec<(String, String, AircraftCount, AircraftCount)>,
    legs: Vec<(String, String, f64, Timestep, bool)>,
    requests: Vec<TestRequest>,
}

impl InstanceBuilder {
    /// timestep_duration and planning_horizon in minutes.
    pub fn new(timestep_duration: u32, planning_horizon: u32) -> InstanceBuilder {
        InstanceBuilder {
            timestep_duration,
            planning_horizon,
            column_generation: ConfigColumnGeneration::default(),
            aircraft_types: Vec::new(),
            airports: Vec::new(),
            aircraft: Vec::new(),
            legs: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn column_generation(mut self, column_generation: ConfigColumnGeneration) -> Self {
        self.column_generation = column_generation;
        self
    }

    pub fn aircraft_type(mut self, id: &str, payload: Weight, operating_cost: Cost) -> Self {
        self.aircraft_types
            .push((String::from(id), payload, operating_cost));
        self
    }

    pub fn airport(mut self, id: &str) -> Self {
        self.airports.push(String::from(id));
        self
    }

    /// aircraft of a type parked at the airport at the start and the end of the horizon.
    pub fn aircraft(
        mut self,
        airport: &str,
        aircraft_type: &str,
        initial: AircraftCount,
        final_count: AircraftCount,
    ) -> Self {
        self.aircraft.push((
            String::from(airport),
            String::from(aircraft_type),
            initial,
            final_count,
        ));
        self
    }

    /// a viable leg.
    pub fn leg(self, origin: &str, destination: &str, km: f64, duration: Timestep) -> Self {
        self.leg_with_viability(origin, destination, km, duration, true)
    }

    pub fn leg_with_viability(
        mut self,
        origin: &str,
        destination: &str,
        km: f64,
        duration: Timestep,
        viable: bool,
    ) -> Self {
        self.legs.push((
            String::from(origin),
            String::from(destination),
            km,
            duration,
            viable,
        ));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn request(
        mut self,
        id: Idx,
        origin: &str,
        destination: &str,
        weight: Weight,
        release: RelativeMinutes,
        due: RelativeMinutes,
        penalty: Cost,
    ) -> Self {
        self.requests.push(TestRequest {
            id,
            origin: String::from(origin),
            destination: String::from(destination),
            weight,
            release,
            due,
            penalty,
        });
        self
    }

    pub fn build(self) -> Result<Arc<Network>, ModelError> {
        let config = Arc::new(Config::new(
            self.timestep_duration,
            self.planning_horizon,
            MarginalCost::default(),
            self.column_generation,
        )?);

        let aircraft_types = self
            .aircraft_types
            .iter()
            .enumerate()
            .map(|(i, (id, payload, cost))| {
                AircraftType::new(
                    AircraftTypeIdx::from(i as Idx),
                    id.clone(),
                    800.0,
                    *payload,
                    0.0,
                    0.0,
                    *cost,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let aircraft_types = Arc::new(AircraftTypes::new(aircraft_types)?);

        let mut airports = Vec::new();
        for (i, id) in self.airports.iter().enumerate() {
            let mut initial = HashMap::new();
            let mut final_aircraft = HashMap::new();
            for (airport, aircraft_type, initial_count, final_count) in self.aircraft.iter() {
                if airport != id {
                    continue;
                }
                let aircraft_type = aircraft_types.get_idx(aircraft_type).ok_or_else(|| {
                    ModelError::UnknownAircraftType {
                        row: format!("aircraft at {}", airport),
                        aircraft_type: aircraft_type.clone(),
                    }
                })?;
                initial.insert(aircraft_type, *initial_count);
                final_aircraft.insert(aircraft_type, *final_count);
            }
            airports.push(Airport::new(
                AirportIdx::from(i as Idx),
                id.clone(),
                Coordinates::new(0.0, 0.0),
                i as u32 + 1,
                initial,
                final_aircraft,
            ));
        }

        let position = |id: &str| -> Result<AirportIdx, ModelError> {
            self.airports
                .iter()
                .position(|a| a == id)
                .map(|i| AirportIdx::from(i as Idx))
                .ok_or_else(|| ModelError::UnknownAirport {
                    row: String::from("test instance"),
                    airport: String::from(id),
                })
        };

        let mut legs = HashMap::new();
        let mut viable_pairs = ViablePairs::new();
        for (origin, destination, km, duration, viable) in self.legs.iter() {
            let pair = (position(origin)?, position(destination)?);
            legs.insert(pair, Leg::new(Distance::from_km(*km), *duration));
            if *viable {
                viable_pairs.insert(pair);
            }
        }
        let airports = Arc::new(Airports::new(airports, legs)?);

        let requests = self
            .requests
            .iter()
            .map(|r| {
                Request::new(
                    RequestId::from(r.id),
                    position(&r.origin)?,
                    position(&r.destination)?,
                    r.weight,
                    r.release,
                    r.due,
                    r.penalty,
                    &config,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let requests = Arc::new(Requests::new(requests, &airports)?);

        Ok(Arc::new(Network::build(
            config,
            airports,
            aircraft_types,
            &viable_pairs,
            requests,
        )?))
    }
}

/// two airports A and B, 60 minute timesteps over 3 hours (4 layers) and a 100km leg of two
/// timesteps in both directions. One aircraft of type "AC" (payload 20, operating cost 1)
/// starts at A and has to end at B. Request 1 ships 10 tons from A to B within the horizon
/// with penalty 5 per ton.
pub fn two_airport_instance() -> InstanceBuilder {
    InstanceBuilder::new(60, 180)
        .aircraft_type("AC", 20.0, 1.0)
        .airport("A")
        .airport("B")
        .aircraft("A", "AC", 1, 0)
        .aircraft("B", "AC", 0, 1)
        .leg("A", "B", 100.0, 2)
        .leg("B", "A", 100.0, 2)
        .request(1, "A", "B", 10.0, 0, 180, 5.0)
}
