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

use crate::base_types::{AircraftTypeIdx, Cost, Distance, Hours, Weight};
use crate::ModelError;

pub struct AircraftTypes {
    aircraft_types: Vec<AircraftType>, // position equals the idx
    ids: HashMap<String, AircraftTypeIdx>,
}

impl AircraftTypes {
    /// the idx of each aircraft type must equal its position in the vector.
    pub fn new(aircraft_types: Vec<AircraftType>) -> Result<AircraftTypes, ModelError> {
        let mut ids = HashMap::new();
        for (position, aircraft_type) in aircraft_types.iter().enumerate() {
            if aircraft_type.idx.idx() != position {
                return Err(ModelError::InvalidAircraftType {
                    aircraft_type: aircraft_type.id.clone(),
                    reason: format!("idx {} does not match position {}", aircraft_type.idx, position),
                });
            }
            if ids
                .insert(aircraft_type.id.clone(), aircraft_type.idx)
                .is_some()
            {
                return Err(ModelError::DuplicateAircraftType(aircraft_type.id.clone()));
            }
        }
        Ok(AircraftTypes {
            aircraft_types,
            ids,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = AircraftTypeIdx> + '_ {
        self.aircraft_types.iter().map(|aircraft_type| aircraft_type.idx)
    }

    pub fn get(&self, idx: AircraftTypeIdx) -> Option<&AircraftType> {
        self.aircraft_types.get(idx.idx())
    }

    pub fn get_idx(&self, id: &str) -> Option<AircraftTypeIdx> {
        self.ids.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.aircraft_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft_types.is_empty()
    }

    /// block time of the slowest aircraft type, so every type can fly an arc built from it.
    pub fn max_block_time(&self, distance: Distance) -> Hours {
        self.aircraft_types
            .iter()
            .map(|aircraft_type| aircraft_type.block_time(distance))
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct AircraftType {
    idx: AircraftTypeIdx,
    id: String,
    speed: f64, // km/h
    payload: Weight,
    turn_around_time: Hours,
    landing_take_off_time: Hours,
    operating_cost: Cost, // MU/km
}

impl AircraftType {
    pub fn new(
        idx: AircraftTypeIdx,
        id: String,
        speed: f64,
        payload: Weight,
        turn_around_time: Hours,
        landing_take_off_time: Hours,
        operating_cost: Cost,
    ) -> Result<AircraftType, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidAircraftType {
            aircraft_type: id.clone(),
            reason: String::from(reason),
        };
        if !(speed > 0.0) || !speed.is_finite() {
            return Err(invalid("speed must be positive"));
        }
        if !(payload > 0.0) || !payload.is_finite() {
            return Err(invalid("payload must be positive"));
        }
        if !(turn_around_time >= 0.0) || !(landing_take_off_time >= 0.0) {
            return Err(invalid("turn-around and landing/take-off times must be non-negative"));
        }
        if !(operating_cost >= 0.0) || !operating_cost.is_finite() {
            return Err(invalid("operating cost must be non-negative"));
        }
        Ok(AircraftType {
            idx,
            id,
            speed,
            payload,
            turn_around_time,
            landing_take_off_time,
            operating_cost,
        })
    }

    pub fn idx(&self) -> AircraftTypeIdx {
        self.idx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payload(&self) -> Weight {
        self.payload
    }

    pub fn operating_cost(&self) -> Cost {
        self.operating_cost
    }

    /// air time plus turn-around and landing/take-off time.
    pub fn block_time(&self, distance: Distance) -> Hours {
        distance.in_km() / self.speed + self.turn_around_time + self.landing_take_off_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aircraft(idx: u32, id: &str, speed: f64) -> AircraftType {
        AircraftType::new(
            AircraftTypeIdx::from(idx),
            String::from(id),
            speed,
            50.0,
            2.0,
            0.5,
            8.0,
        )
        .unwrap()
    }

    #[test]
    fn block_time_adds_ground_times() {
        let ac = aircraft(0, "AC_1", 800.0);
        assert_eq!(ac.block_time(Distance::from_km(1600.0)), 4.5);
    }

    #[test]
    fn slowest_type_determines_block_time() {
        let types =
            AircraftTypes::new(vec![aircraft(0, "AC_1", 800.0), aircraft(1, "AC_2", 400.0)])
                .unwrap();
        assert_eq!(types.max_block_time(Distance::from_km(800.0)), 4.5);
        assert_eq!(types.get_idx("AC_2"), Some(AircraftTypeIdx::from(1)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = AircraftTypes::new(vec![aircraft(0, "AC_1", 800.0), aircraft(1, "AC_1", 800.0)]);
        assert_eq!(
            result.err(),
            Some(ModelError::DuplicateAircraftType(String::from("AC_1")))
        );
    }

    #[test]
    fn non_positive_payload_is_rejected() {
        let result = AircraftType::new(
            AircraftTypeIdx::from(0),
            String::from("AC_X"),
            800.0,
            0.0,
            2.0,
            0.5,
            8.0,
        );
        assert!(matches!(result, Err(ModelError::InvalidAircraftType { .. })));
    }
}
