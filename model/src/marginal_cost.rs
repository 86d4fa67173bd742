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

use std::f64::consts::PI;

use crate::base_types::Minutes;

const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Marginal cost (MU per km and ton) of carrying cargo on a flight leg:
///
/// MCf = airport_factor * (i + j) / (2n - 1)
///     + time_of_day_factor * sin²(2π h / 24)
///     + day_factor * d
///
/// where i and j are the indices of origin and destination airport, n is the number of
/// airports, h is the departure hour of the day and d is the day of the departure
/// (the first day of the horizon is day 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginalCost {
    pub airport_factor: f64,
    pub time_of_day_factor: f64,
    pub day_factor: f64,
}

impl Default for MarginalCost {
    fn default() -> Self {
        MarginalCost {
            airport_factor: 0.05,
            time_of_day_factor: 0.15,
            day_factor: 0.005,
        }
    }
}

impl MarginalCost {
    pub fn per_ton_km(
        &self,
        origin_index: u32,
        destination_index: u32,
        airport_count: usize,
        departure: Minutes,
    ) -> f64 {
        let n = airport_count as f64;
        let hour = (departure % MINUTES_PER_DAY) as f64 / 60.0;
        let day = (departure / MINUTES_PER_DAY) as f64 + 1.0;

        self.airport_factor * (origin_index + destination_index) as f64 / (2.0 * n - 1.0)
            + self.time_of_day_factor * (2.0 * PI * hour / 24.0).sin().powi(2)
            + self.day_factor * day
    }
}
