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

use crate::aircraft_types::AircraftTypes;
use crate::base_types::{AircraftCount, AircraftTypeIdx, AirportIdx, Coordinates, Distance, Timestep};
use crate::config::Config;
use crate::ModelError;

/// a type for storing all airports and the legs between them.
///
/// A leg is stored for an ordered pair of distinct airports. It knows the great-circle
/// distance and the number of timesteps a flight between the two airports occupies.
/// Pairs without a leg cannot be flown; whether a pair is offered to the network at all
/// is decided by the origin-destination viability, not by this type.
///
/// The idx of an airport equals its position in the airport vector.
pub struct Airports {
    airports: Vec<Airport>,
    ids: HashMap<String, AirportIdx>,
    legs: HashMap<(AirportIdx, AirportIdx), Leg>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    distance: Distance,
    duration: Timestep, // number of timesteps, at least 1
}

impl Leg {
    pub fn new(distance: Distance, duration: Timestep) -> Leg {
        Leg { distance, duration }
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn duration(&self) -> Timestep {
        self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    idx: AirportIdx,
    id: String,
    coordinates: Coordinates,
    index: u32, // index used by the marginal cost function
    initial_aircraft: HashMap<AircraftTypeIdx, AircraftCount>,
    final_aircraft: HashMap<AircraftTypeIdx, AircraftCount>,
}

impl Airport {
    pub fn new(
        idx: AirportIdx,
        id: String,
        coordinates: Coordinates,
        index: u32,
        initial_aircraft: HashMap<AircraftTypeIdx, AircraftCount>,
        final_aircraft: HashMap<AircraftTypeIdx, AircraftCount>,
    ) -> Airport {
        Airport {
            idx,
            id,
            coordinates,
            index,
            initial_aircraft,
            final_aircraft,
        }
    }

    pub fn idx(&self) -> AirportIdx {
        self.idx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// number of aircraft of the given type parked at this airport at the start of the horizon.
    pub fn initial_aircraft(&self, aircraft_type: AircraftTypeIdx) -> AircraftCount {
        self.initial_aircraft
            .get(&aircraft_type)
            .copied()
            .unwrap_or(0)
    }

    /// number of aircraft of the given type that must be parked here at the end of the horizon.
    pub fn final_aircraft(&self, aircraft_type: AircraftTypeIdx) -> AircraftCount {
        self.final_aircraft.get(&aircraft_type).copied().unwrap_or(0)
    }
}

/////////////////////////////////////////////////////////////////////
////////////////////////////// Airports /////////////////////////////
/////////////////////////////////////////////////////////////////////

// static functions
impl Airports {
    pub fn new(
        airports: Vec<Airport>,
        legs: HashMap<(AirportIdx, AirportIdx), Leg>,
    ) -> Result<Airports, ModelError> {
        let mut ids = HashMap::new();
        for (position, airport) in airports.iter().enumerate() {
            if airport.idx.idx() != position {
                return Err(ModelError::InvalidAirport {
                    airport: airport.id.clone(),
                    reason: format!("idx {} does not match position {}", airport.idx, position),
                });
            }
            if ids.insert(airport.id.clone(), airport.idx).is_some() {
                return Err(ModelError::DuplicateAirport(airport.id.clone()));
            }
        }

        for (&(origin, destination), leg) in legs.iter() {
            let name = |a: AirportIdx| {
                airports
                    .get(a.idx())
                    .map(|airport| airport.id.clone())
                    .unwrap_or_else(|| format!("#{}", a))
            };
            let invalid = |reason: &str| ModelError::InvalidLeg {
                origin: name(origin),
                destination: name(destination),
                reason: String::from(reason),
            };
            if origin.idx() >= airports.len() || destination.idx() >= airports.len() {
                return Err(invalid("unknown airport"));
            }
            if origin == destination {
                return Err(invalid("origin and destination are identical"));
            }
            if leg.duration == 0 {
                return Err(invalid("duration must be at least one timestep"));
            }
        }

        Ok(Airports {
            airports,
            ids,
            legs,
        })
    }

    /// computes a leg for every ordered pair of distinct airports from the great-circle
    /// distance. The duration is the block time of the slowest aircraft type rounded up to
    /// whole timesteps.
    pub fn with_great_circle_legs(
        airports: Vec<Airport>,
        aircraft_types: &AircraftTypes,
        config: &Config,
    ) -> Result<Airports, ModelError> {
        let timestep_in_hours = config.timestep_duration_in_hours();
        let mut legs = HashMap::new();
        for origin in airports.iter() {
            for destination in airports.iter() {
                if origin.idx == destination.idx {
                    continue;
                }
                let distance = origin.coordinates.distance_to(&destination.coordinates);
                let block_time = aircraft_types.max_block_time(distance);
                // a flight occupies at least one timestep; the epsilon absorbs rounding noise
                // for block times that are exact multiples of the timestep
                let duration = ((block_time / timestep_in_hours) - 1e-9).ceil().max(1.0);
                legs.insert(
                    (origin.idx, destination.idx),
                    Leg::new(distance, duration as Timestep),
                );
            }
        }
        Airports::new(airports, legs)
    }
}

// methods
impl Airports {
    pub fn iter(&self) -> impl Iterator<Item = AirportIdx> + '_ {
        self.airports.iter().map(|airport| airport.idx)
    }

    pub fn get(&self, idx: AirportIdx) -> Option<&Airport> {
        self.airports.get(idx.idx())
    }

    pub fn get_idx(&self, id: &str) -> Option<AirportIdx> {
        self.ids.get(id).copied()
    }

    /// the airport id, or the idx if the airport is unknown.
    pub fn id_of(&self, idx: AirportIdx) -> String {
        self.get(idx)
            .map(|airport| airport.id.clone())
            .unwrap_or_else(|| idx.to_string())
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn leg(&self, origin: AirportIdx, destination: AirportIdx) -> Option<&Leg> {
        self.legs.get(&(origin, destination))
    }

    pub fn distance(&self, origin: AirportIdx, destination: AirportIdx) -> Option<Distance> {
        self.leg(origin, destination).map(|leg| leg.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft_types::AircraftType;
    use crate::base_types::AircraftTypeIdx;
    use crate::config::ConfigColumnGeneration;
    use crate::marginal_cost::MarginalCost;

    fn airport(idx: u32, id: &str, latitude: f64, longitude: f64) -> Airport {
        Airport::new(
            AirportIdx::from(idx),
            String::from(id),
            Coordinates::new(latitude, longitude),
            idx + 1,
            HashMap::new(),
            HashMap::new(),
        )
    }

    #[test]
    fn great_circle_legs_are_rounded_up_to_timesteps() {
        let aircraft_types = AircraftTypes::new(vec![AircraftType::new(
            AircraftTypeIdx::from(0),
            String::from("AC_1"),
            800.0,
            50.0,
            2.0,
            0.5,
            8.0,
        )
        .unwrap()])
        .unwrap();
        let config = Config::new(
            240,
            5760,
            MarginalCost::default(),
            ConfigColumnGeneration::default(),
        )
        .unwrap();
        let airports = Airports::with_great_circle_legs(
            vec![
                airport(0, "LUX", 49.6233, 6.2044),
                airport(1, "ORD", 41.9786, -87.9048),
            ],
            &aircraft_types,
            &config,
        )
        .unwrap();

        let lux = airports.get_idx("LUX").unwrap();
        let ord = airports.get_idx("ORD").unwrap();
        // 6854km / 800km/h + 2.5h = 11.07h -> 3 timesteps of 4h
        assert_eq!(airports.leg(lux, ord).unwrap().duration(), 3);
        assert_eq!(airports.leg(ord, lux).unwrap().duration(), 3);
        assert!(airports.leg(lux, lux).is_none());
        assert_eq!(airports.distance(lux, ord), airports.distance(ord, lux));
    }

    #[test]
    fn zero_duration_legs_are_rejected() {
        let mut legs = HashMap::new();
        legs.insert(
            (AirportIdx::from(0), AirportIdx::from(1)),
            Leg::new(Distance::from_km(10.0), 0),
        );
        let result = Airports::new(
            vec![airport(0, "A", 0.0, 0.0), airport(1, "B", 0.0, 0.1)],
            legs,
        );
        assert!(matches!(result, Err(ModelError::InvalidLeg { .. })));
    }

    #[test]
    fn duplicate_airports_are_rejected() {
        let result = Airports::new(
            vec![airport(0, "A", 0.0, 0.0), airport(1, "A", 0.0, 0.1)],
            HashMap::new(),
        );
        assert_eq!(
            result.err(),
            Some(ModelError::DuplicateAirport(String::from("A")))
        );
    }
}
