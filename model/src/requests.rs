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
use std::fmt;

use crate::airports::Airports;
use crate::base_types::{AirportIdx, Cost, RequestId, Timestep, Weight};
use crate::config::Config;
use crate::ModelError;

/// signed minutes relative to the start of the planning horizon (releases may lie before it).
pub type RelativeMinutes = i64;

/// a shipment request. Release and due time are discretised on construction:
/// the release is rounded up and the due time is rounded down to the next timestep,
/// both clamped to the planning horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    id: RequestId,
    origin: AirportIdx,
    destination: AirportIdx,
    weight: Weight,
    release_time: RelativeMinutes,
    due_time: RelativeMinutes,
    penalty: Cost, // per ton
    release_step: Timestep,
    due_step: Timestep,
}

// static functions
impl Request {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RequestId,
        origin: AirportIdx,
        destination: AirportIdx,
        weight: Weight,
        release_time: RelativeMinutes,
        due_time: RelativeMinutes,
        penalty: Cost,
        config: &Config,
    ) -> Result<Request, ModelError> {
        let invalid = |reason: String| ModelError::InvalidRequest {
            request: id,
            reason,
        };
        if origin == destination {
            return Err(invalid(String::from(
                "origin and destination are identical",
            )));
        }
        if !(weight >= 0.0) || !weight.is_finite() {
            return Err(invalid(format!("weight {} must be non-negative", weight)));
        }
        if !(penalty >= 0.0) || !penalty.is_finite() {
            return Err(invalid(format!("penalty {} must be non-negative", penalty)));
        }
        if due_time < 0 {
            return Err(invalid(format!(
                "due time {}min lies before the planning horizon",
                due_time
            )));
        }

        let step = config.timestep_duration as RelativeMinutes;
        let release_step = (-(-release_time).div_euclid(step)).max(0);
        let due_step = due_time
            .div_euclid(step)
            .min(config.last_timestep() as RelativeMinutes);
        if release_step > due_step {
            return Err(invalid(format!(
                "release step {} lies after due step {}",
                release_step, due_step
            )));
        }

        Ok(Request {
            id,
            origin,
            destination,
            weight,
            release_time,
            due_time,
            penalty,
            release_step: release_step as Timestep,
            due_step: due_step as Timestep,
        })
    }
}

// methods
impl Request {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn origin(&self) -> AirportIdx {
        self.origin
    }

    pub fn destination(&self) -> AirportIdx {
        self.destination
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn release_time(&self) -> RelativeMinutes {
        self.release_time
    }

    pub fn due_time(&self) -> RelativeMinutes {
        self.due_time
    }

    /// penalty per ton of unserved cargo.
    pub fn penalty(&self) -> Cost {
        self.penalty
    }

    /// cost of leaving the whole request unserved.
    pub fn penalty_cost(&self) -> Cost {
        self.penalty * self.weight
    }

    pub fn release_step(&self) -> Timestep {
        self.release_step
    }

    pub fn due_step(&self) -> Timestep {
        self.due_step
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "request {} ({} -> {}, {}t, steps {}..{})",
            self.id,
            self.origin,
            self.destination,
            self.weight,
            self.release_step,
            self.due_step
        )
    }
}

/// all requests, ordered by id.
pub struct Requests {
    requests: BTreeMap<RequestId, Request>,
}

impl Requests {
    pub fn new(requests: Vec<Request>, airports: &Airports) -> Result<Requests, ModelError> {
        let mut map = BTreeMap::new();
        for request in requests {
            for airport in [request.origin, request.destination] {
                if airports.get(airport).is_none() {
                    return Err(ModelError::UnknownAirport {
                        row: format!("request {}", request.id),
                        airport: airport.to_string(),
                    });
                }
            }
            let id = request.id;
            if map.insert(id, request).is_some() {
                return Err(ModelError::DuplicateRequest(id));
            }
        }
        Ok(Requests { requests: map })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> + '_ {
        self.requests.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = RequestId> + '_ {
        self.requests.keys().copied()
    }

    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(&id)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn total_weight(&self) -> Weight {
        self.requests.values().map(|r| r.weight).sum()
    }
}
