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

use std::path::PathBuf;
use std::time::Duration;

use crate::base_types::{Minutes, Timestep};
use crate::marginal_cost::MarginalCost;
use crate::ModelError;

pub struct Config {
    pub timestep_duration: Minutes,
    pub planning_horizon: Minutes,
    pub marginal_cost: MarginalCost,
    pub column_generation: ConfigColumnGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingEngine {
    /// 0/1 arc-selection program handed to the LP backend.
    Milp,
    /// unit circulation solved by a network simplex on integer-scaled costs.
    NetworkSimplex,
}

#[derive(Debug, Clone)]
pub struct ConfigColumnGeneration {
    pub max_iterations: usize,
    pub time_limit: Option<Duration>,
    pub iteration_time_limit: Option<Duration>,
    pub reduced_cost_tolerance: f64,
    pub parallel_pricing: bool,
    pub threads: Option<usize>,
    pub pricing_engine: PricingEngine,
    pub mip_gap: Option<f64>,
    pub write_model_to: Option<PathBuf>,
}

impl Default for ConfigColumnGeneration {
    fn default() -> Self {
        ConfigColumnGeneration {
            max_iterations: 100,
            time_limit: None,
            iteration_time_limit: None,
            reduced_cost_tolerance: 1e-6,
            parallel_pricing: true,
            threads: None,
            pricing_engine: PricingEngine::Milp,
            mip_gap: None,
            write_model_to: None,
        }
    }
}

// static functions
impl Config {
    /// timestep_duration and planning_horizon are given in minutes. The horizon must be a
    /// multiple of the timestep duration such that the network gets an integral number of
    /// layers.
    pub fn new(
        timestep_duration: Minutes,
        planning_horizon: Minutes,
        marginal_cost: MarginalCost,
        column_generation: ConfigColumnGeneration,
    ) -> Result<Config, ModelError> {
        if timestep_duration == 0 {
            return Err(ModelError::InvalidConfig(String::from(
                "timestep duration must be positive",
            )));
        }
        if planning_horizon == 0 {
            return Err(ModelError::InvalidConfig(String::from(
                "planning horizon must be positive",
            )));
        }
        if planning_horizon % timestep_duration != 0 {
            return Err(ModelError::InvalidConfig(format!(
                "planning horizon ({}min) is not a multiple of the timestep duration ({}min)",
                planning_horizon, timestep_duration
            )));
        }
        if !(column_generation.reduced_cost_tolerance >= 0.0) {
            return Err(ModelError::InvalidConfig(String::from(
                "reduced cost tolerance must be non-negative",
            )));
        }
        if column_generation.max_iterations == 0 {
            return Err(ModelError::InvalidConfig(String::from(
                "at least one column generation iteration is required",
            )));
        }
        Ok(Config {
            timestep_duration,
            planning_horizon,
            marginal_cost,
            column_generation,
        })
    }
}

// methods
impl Config {
    /// number of layers of the time-space network (both ends of the horizon included).
    pub fn timestep_count(&self) -> Timestep {
        self.planning_horizon / self.timestep_duration + 1
    }

    pub fn last_timestep(&self) -> Timestep {
        self.timestep_count() - 1
    }

    /// minutes since the start of the planning horizon.
    pub fn start_of(&self, timestep: Timestep) -> Minutes {
        timestep * self.timestep_duration
    }

    pub fn timestep_duration_in_hours(&self) -> f64 {
        self.timestep_duration as f64 / 60.0
    }
}
