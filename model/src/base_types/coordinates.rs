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

use super::Distance;
use std::fmt;

const EARTH_RADIUS_IN_KM: f64 = 6371.0;

/// position of an airport in degrees.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// haversine distance on a spherical earth.
    pub fn distance_to(&self, other: &Coordinates) -> Distance {
        let lat_i = self.latitude.to_radians();
        let lat_j = other.latitude.to_radians();
        let lon_i = self.longitude.to_radians();
        let lon_j = other.longitude.to_radians();

        let term_1 = ((lat_i - lat_j) / 2.0).sin().powi(2);
        let term_2 = lat_i.cos() * lat_j.cos() * ((lon_i - lon_j) / 2.0).sin().powi(2);

        // rounding can push the argument marginally above 1 for antipodal points
        let a = (term_1 + term_2).sqrt().min(1.0);
        Distance::from_km(2.0 * EARTH_RADIUS_IN_KM * a.asin())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}
