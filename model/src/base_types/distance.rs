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

use std::fmt;
use std::ops::Add;

/// great-circle distance in kilometers.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct Distance(f64);

// methods:
impl Distance {
    pub fn in_km(&self) -> f64 {
        self.0
    }
}

// static functions:
impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    /// panics if km is negative or not finite.
    pub fn from_km(km: f64) -> Distance {
        assert!(
            km.is_finite() && km >= 0.0,
            "distance must be a non-negative number, got {}",
            km
        );
        Distance(km)
    }
}

impl Add for Distance {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Distance(self.0 + other.0)
    }
}

impl std::iter::Sum<Self> for Distance {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        iter.fold(Distance::ZERO, |a, b| a + b)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1}km", self.0)
    }
}
