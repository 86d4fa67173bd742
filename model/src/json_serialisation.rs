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

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::aircraft_types::{AircraftType, AircraftTypes};
use crate::airports::{Airport, Airports, Leg};
use crate::base_types::{
    AircraftCount, AircraftTypeIdx, AirportIdx, Coordinates, Distance, Idx, RequestId,
};
use crate::config::{Config, ConfigColumnGeneration, PricingEngine};
use crate::marginal_cost::MarginalCost;
use crate::network::{Network, ViablePairs};
use crate::requests::{Request, Requests};
use crate::ModelError;

type Integer = u32;
type Number = f64;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonAircraftType {
    id: String,
    speed_in_km_per_hour: Number,
    payload_in_tons: Number,
    turn_around_time_in_hours: Number,
    landing_take_off_time_in_hours: Number,
    operating_cost_per_km: Number,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonAircraftCount {
    aircraft_type: String,
    initial: Integer,
    #[serde(rename = "final")]
    final_count: Option<Integer>, // defaults to initial
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonAirport {
    id: String,
    latitude: Number,
    longitude: Number,
    index: Option<Integer>, // defaults to the 1-based position in the list
    #[serde(default)]
    aircraft: Vec<JsonAircraftCount>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonOdPair {
    origin: String,
    destination: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonLeg {
    origin: String,
    destination: String,
    distance_in_km: Number,
    duration_in_timesteps: Integer,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRequest {
    id: Integer,
    origin: String,
    destination: String,
    weight_in_tons: Number,
    release_time_in_minutes: i64,
    due_time_in_minutes: i64,
    penalty_per_ton: Number,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonMarginalCost {
    airport_factor: Number,
    time_of_day_factor: Number,
    day_factor: Number,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
enum JsonPricingEngine {
    Milp,
    NetworkSimplex,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct JsonColumnGeneration {
    max_iterations: Option<usize>,
    time_limit_in_seconds: Option<Number>,
    iteration_time_limit_in_seconds: Option<Number>,
    reduced_cost_tolerance: Option<Number>,
    parallel_pricing: Option<bool>,
    threads: Option<usize>,
    pricing_engine: Option<JsonPricingEngine>,
    mip_gap: Option<Number>,
    write_model_to: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonParameters {
    timestep_duration_in_minutes: Integer,
    planning_horizon_in_minutes: Integer,
    marginal_cost: Option<JsonMarginalCost>,
    #[serde(default)]
    column_generation: JsonColumnGeneration,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    airports: Vec<JsonAirport>,
    aircraft_types: Vec<JsonAircraftType>,
    od_pairs: Vec<JsonOdPair>,
    legs: Option<Vec<JsonLeg>>, // computed from the coordinates if missing
    requests: Vec<JsonRequest>,
    parameters: JsonParameters,
}

/// builds the time-space network of an instance. Config, airports, aircraft types and requests
/// are reachable through the network.
pub fn load_cargo_routing_instance_from_json(
    input_data: serde_json::Value,
) -> Result<Arc<Network>, ModelError> {
    let json_input: JsonInput = serde_json::from_value(input_data)?;
    let config = Arc::new(create_config(&json_input)?);
    let aircraft_types = Arc::new(create_aircraft_types(&json_input)?);
    let airports = Arc::new(create_airports(&json_input, &aircraft_types, &config)?);
    let viable_pairs = create_viable_pairs(&json_input, &airports)?;
    let requests = Arc::new(create_requests(&json_input, &airports, &config)?);
    Ok(Arc::new(Network::build(
        config,
        airports,
        aircraft_types,
        &viable_pairs,
        requests,
    )?))
}

fn create_config(json_input: &JsonInput) -> Result<Config, ModelError> {
    let parameters = &json_input.parameters;
    let marginal_cost = parameters
        .marginal_cost
        .as_ref()
        .map(|mc| MarginalCost {
            airport_factor: mc.airport_factor,
            time_of_day_factor: mc.time_of_day_factor,
            day_factor: mc.day_factor,
        })
        .unwrap_or_default();

    let json_cg = &parameters.column_generation;
    let defaults = ConfigColumnGeneration::default();
    let seconds = |s: Option<Number>| -> Result<Option<Duration>, ModelError> {
        match s {
            Some(s) => Duration::try_from_secs_f64(s).map(Some).map_err(|_| {
                ModelError::InvalidConfig(format!(
                    "time limit {}s must be a non-negative number within range",
                    s
                ))
            }),
            None => Ok(None),
        }
    };
    let column_generation = ConfigColumnGeneration {
        max_iterations: json_cg.max_iterations.unwrap_or(defaults.max_iterations),
        time_limit: seconds(json_cg.time_limit_in_seconds)?,
        iteration_time_limit: seconds(json_cg.iteration_time_limit_in_seconds)?,
        reduced_cost_tolerance: json_cg
            .reduced_cost_tolerance
            .unwrap_or(defaults.reduced_cost_tolerance),
        parallel_pricing: json_cg.parallel_pricing.unwrap_or(defaults.parallel_pricing),
        threads: json_cg.threads,
        pricing_engine: match json_cg.pricing_engine {
            Some(JsonPricingEngine::Milp) => PricingEngine::Milp,
            Some(JsonPricingEngine::NetworkSimplex) => PricingEngine::NetworkSimplex,
            None => defaults.pricing_engine,
        },
        mip_gap: json_cg.mip_gap,
        write_model_to: json_cg.write_model_to.as_ref().map(PathBuf::from),
    };

    Config::new(
        parameters.timestep_duration_in_minutes,
        parameters.planning_horizon_in_minutes,
        marginal_cost,
        column_generation,
    )
}

fn create_aircraft_types(json_input: &JsonInput) -> Result<AircraftTypes, ModelError> {
    let aircraft_types = json_input
        .aircraft_types
        .iter()
        .enumerate()
        .map(|(i, aircraft_type)| {
            AircraftType::new(
                AircraftTypeIdx::from(i as Idx),
                aircraft_type.id.clone(),
                aircraft_type.speed_in_km_per_hour,
                aircraft_type.payload_in_tons,
                aircraft_type.turn_around_time_in_hours,
                aircraft_type.landing_take_off_time_in_hours,
                aircraft_type.operating_cost_per_km,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    AircraftTypes::new(aircraft_types)
}

fn create_airports(
    json_input: &JsonInput,
    aircraft_types: &AircraftTypes,
    config: &Config,
) -> Result<Airports, ModelError> {
    let mut airports = Vec::new();
    for (i, airport) in json_input.airports.iter().enumerate() {
        let mut initial: HashMap<AircraftTypeIdx, AircraftCount> = HashMap::new();
        let mut final_aircraft: HashMap<AircraftTypeIdx, AircraftCount> = HashMap::new();
        for count in airport.aircraft.iter() {
            let aircraft_type = aircraft_types
                .get_idx(&count.aircraft_type)
                .ok_or_else(|| ModelError::UnknownAircraftType {
                    row: format!("airport {}", airport.id),
                    aircraft_type: count.aircraft_type.clone(),
                })?;
            *initial.entry(aircraft_type).or_insert(0) += count.initial;
            *final_aircraft.entry(aircraft_type).or_insert(0) +=
                count.final_count.unwrap_or(count.initial);
        }
        if !(-90.0..=90.0).contains(&airport.latitude)
            || !(-180.0..=180.0).contains(&airport.longitude)
        {
            return Err(ModelError::InvalidAirport {
                airport: airport.id.clone(),
                reason: format!(
                    "coordinates ({}, {}) out of range",
                    airport.latitude, airport.longitude
                ),
            });
        }
        airports.push(Airport::new(
            AirportIdx::from(i as Idx),
            airport.id.clone(),
            Coordinates::new(airport.latitude, airport.longitude),
            airport.index.unwrap_or(i as Integer + 1),
            initial,
            final_aircraft,
        ));
    }

    let legs = match json_input.legs.as_ref() {
        None => return Airports::with_great_circle_legs(airports, aircraft_types, config),
        Some(legs) => legs,
    };
    let ids: HashMap<&str, AirportIdx> = airports
        .iter()
        .map(|airport| (airport.id(), airport.idx()))
        .collect();
    let mut leg_map = HashMap::new();
    for leg in legs.iter() {
        let row = format!("leg {}->{}", leg.origin, leg.destination);
        let origin = lookup(&ids, &leg.origin, &row)?;
        let destination = lookup(&ids, &leg.destination, &row)?;
        if !(leg.distance_in_km >= 0.0) || !leg.distance_in_km.is_finite() {
            return Err(ModelError::InvalidLeg {
                origin: leg.origin.clone(),
                destination: leg.destination.clone(),
                reason: format!("distance {} must be non-negative", leg.distance_in_km),
            });
        }
        let previous = leg_map.insert(
            (origin, destination),
            Leg::new(
                Distance::from_km(leg.distance_in_km),
                leg.duration_in_timesteps,
            ),
        );
        if previous.is_some() {
            return Err(ModelError::InvalidLeg {
                origin: leg.origin.clone(),
                destination: leg.destination.clone(),
                reason: String::from("leg is given more than once"),
            });
        }
    }
    Airports::new(airports, leg_map)
}

fn create_viable_pairs(
    json_input: &JsonInput,
    airports: &Airports,
) -> Result<ViablePairs, ModelError> {
    let mut viable_pairs = ViablePairs::new();
    for (i, pair) in json_input.od_pairs.iter().enumerate() {
        let row = format!("od pair {}", i + 1);
        let origin = airport_idx(airports, &pair.origin, &row)?;
        let destination = airport_idx(airports, &pair.destination, &row)?;
        viable_pairs.insert((origin, destination));
    }
    Ok(viable_pairs)
}

fn create_requests(
    json_input: &JsonInput,
    airports: &Airports,
    config: &Config,
) -> Result<Requests, ModelError> {
    let requests = json_input
        .requests
        .iter()
        .map(|request| {
            let row = format!("request {}", request.id);
            Request::new(
                RequestId::from(request.id),
                airport_idx(airports, &request.origin, &row)?,
                airport_idx(airports, &request.destination, &row)?,
                request.weight_in_tons,
                request.release_time_in_minutes,
                request.due_time_in_minutes,
                request.penalty_per_ton,
                config,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Requests::new(requests, airports)
}

fn airport_idx(airports: &Airports, id: &str, row: &str) -> Result<AirportIdx, ModelError> {
    airports
        .get_idx(id)
        .ok_or_else(|| ModelError::UnknownAirport {
            row: String::from(row),
            airport: String::from(id),
        })
}

fn lookup(ids: &HashMap<&str, AirportIdx>, id: &str, row: &str) -> Result<AirportIdx, ModelError> {
    ids.get(id)
        .copied()
        .ok_or_else(|| ModelError::UnknownAirport {
            row: String::from(row),
            airport: String::from(id),
        })
}
