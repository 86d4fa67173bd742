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
use derive_more::From;

pub mod coordinates;
pub mod distance;

pub use coordinates::Coordinates;
pub use distance::Distance;

pub type Idx = u32;

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AirportIdx(Idx);

impl AirportIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AircraftTypeIdx(Idx);

impl AircraftTypeIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

/// identifier of a shipment request as given in the input data.
#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(Idx);

impl RequestId {
    pub fn value(&self) -> Idx {
        self.0
    }
}

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "n{}", _0)]
pub struct NodeIdx(Idx);

impl NodeIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "a{}", _0)]
pub struct ArcIdx(Idx);

impl ArcIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

/// index of a layer in the time-space network (0 is the start of the planning horizon).
pub type Timestep = u32;
pub type Minutes = u32;
pub type Hours = f64;
pub type Weight = f64; // ton
pub type Cost = f64; // monetary units
pub type AircraftCount = u32;
