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

use crate::base_types::{ArcIdx, Cost, Distance, NodeIdx, RequestId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcKind {
    Flight,
    Ground,
    /// artificial arc from the release node to the due node of a request. `penalty` is the
    /// cost of leaving the whole request unserved.
    NoService { request: RequestId, penalty: Cost },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkArc {
    idx: ArcIdx,
    origin: NodeIdx,
    destination: NodeIdx,
    kind: ArcKind,
    distance: Distance, // zero for ground and no-service arcs
    marginal_cost: Cost, // MU per ton and km, zero for ground and no-service arcs
}

impl NetworkArc {
    pub(super) fn flight(
        idx: ArcIdx,
        origin: NodeIdx,
        destination: NodeIdx,
        distance: Distance,
        marginal_cost: Cost,
    ) -> NetworkArc {
        NetworkArc {
            idx,
            origin,
            destination,
            kind: ArcKind::Flight,
            distance,
            marginal_cost,
        }
    }

    pub(super) fn ground(idx: ArcIdx, origin: NodeIdx, destination: NodeIdx) -> NetworkArc {
        NetworkArc {
            idx,
            origin,
            destination,
            kind: ArcKind::Ground,
            distance: Distance::ZERO,
            marginal_cost: 0.0,
        }
    }

    pub(super) fn no_service(
        idx: ArcIdx,
        origin: NodeIdx,
        destination: NodeIdx,
        request: RequestId,
        penalty: Cost,
    ) -> NetworkArc {
        NetworkArc {
            idx,
            origin,
            destination,
            kind: ArcKind::NoService { request, penalty },
            distance: Distance::ZERO,
            marginal_cost: 0.0,
        }
    }

    pub fn idx(&self) -> ArcIdx {
        self.idx
    }

    pub fn origin(&self) -> NodeIdx {
        self.origin
    }

    pub fn destination(&self) -> NodeIdx {
        self.destination
    }

    pub fn kind(&self) -> &ArcKind {
        &self.kind
    }

    pub fn is_flight(&self) -> bool {
        matches!(self.kind, ArcKind::Flight)
    }

    pub fn is_ground(&self) -> bool {
        matches!(self.kind, ArcKind::Ground)
    }

    pub fn is_no_service(&self) -> bool {
        matches!(self.kind, ArcKind::NoService { .. })
    }

    /// the request of a no-service arc.
    pub fn request(&self) -> Option<RequestId> {
        match self.kind {
            ArcKind::NoService { request, .. } => Some(request),
            _ => None,
        }
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// marginal cost per ton and km at the departure of this arc.
    pub fn marginal_cost(&self) -> Cost {
        self.marginal_cost
    }

    /// cost of carrying one ton along this arc.
    pub fn cost_per_ton(&self) -> Cost {
        self.marginal_cost * self.distance.in_km()
    }
}

impl fmt::Display for NetworkArc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ArcKind::Flight => write!(
                f,
                "flight {} {}->{} ({})",
                self.idx, self.origin, self.destination, self.distance
            ),
            ArcKind::Ground => write!(f, "ground {} {}->{}", self.idx, self.origin, self.destination),
            ArcKind::NoService { request, penalty } => write!(
                f,
                "no-service {} {}->{} (request {}, penalty {:.2})",
                self.idx, self.origin, self.destination, request, penalty
            ),
        }
    }
}
