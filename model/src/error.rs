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

use derive_more::Display;

use crate::base_types::RequestId;

/// errors raised while loading instance data or building the network.
/// All of them are detected before any optimization starts.
#[derive(Display, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[display(fmt = "invalid json input: {}", _0)]
    Json(String),

    #[display(fmt = "invalid parameters: {}", _0)]
    InvalidConfig(String),

    #[display(fmt = "airport '{}' is defined twice", _0)]
    DuplicateAirport(String),

    #[display(fmt = "invalid airport '{}': {}", airport, reason)]
    InvalidAirport { airport: String, reason: String },

    #[display(fmt = "aircraft type '{}' is defined twice", _0)]
    DuplicateAircraftType(String),

    #[display(fmt = "invalid aircraft type '{}': {}", aircraft_type, reason)]
    InvalidAircraftType {
        aircraft_type: String,
        reason: String,
    },

    #[display(fmt = "{} references unknown airport '{}'", row, airport)]
    UnknownAirport { row: String, airport: String },

    #[display(fmt = "{} references unknown aircraft type '{}'", row, aircraft_type)]
    UnknownAircraftType { row: String, aircraft_type: String },

    #[display(fmt = "invalid leg {} -> {}: {}", origin, destination, reason)]
    InvalidLeg {
        origin: String,
        destination: String,
        reason: String,
    },

    #[display(fmt = "request {} is defined twice", _0)]
    DuplicateRequest(RequestId),

    #[display(fmt = "invalid request {}: {}", request, reason)]
    InvalidRequest { request: RequestId, reason: String },

    #[display(
        fmt = "aircraft type '{}' starts with {} aircraft but has to end with {}",
        aircraft_type,
        initial,
        final_count
    )]
    FleetImbalance {
        aircraft_type: String,
        initial: u32,
        final_count: u32,
    },
}

impl std::error::Error for ModelError {}

impl From<serde_json::Error> for ModelError {
    fn from(error: serde_json::Error) -> Self {
        ModelError::Json(error.to_string())
    }
}
