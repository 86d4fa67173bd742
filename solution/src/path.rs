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
use itertools::Itertools;
use model::base_types::{ArcIdx, Cost, RequestId};
use model::network::arcs::ArcKind;
use model::network::Network;
use std::fmt;

/// a path is identified by its request and the position in which it was added to the catalog
/// for this request (the no-service path always has index 0).
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "p{}_{}", request, index)]
pub struct PathId {
    request: RequestId,
    index: u32,
}

impl PathId {
    pub fn new(request: RequestId, index: u32) -> PathId {
        PathId { request, index }
    }

    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Service,
    NoService,
}

/// an ordered sequence of arcs from the release node to the due node of a request.
///
/// Paths are immutable. They are only created by the `PathCatalog`, which checks that the arcs
/// form a chain in the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    id: PathId,
    kind: PathKind,
    arcs: Vec<ArcIdx>,
    flight_arcs: Vec<ArcIdx>,
    cost: Cost,
}

// static functions
impl Path {
    /// the cost of a service path is the marginal transport cost of its flights times the
    /// weight of the request; a no-service path costs the penalty of the request.
    pub(crate) fn new(id: PathId, arcs: Vec<ArcIdx>, weight: f64, network: &Network) -> Path {
        let mut kind = PathKind::Service;
        let mut cost = 0.0;
        for &arc in arcs.iter() {
            match network.arc(arc).kind() {
                ArcKind::Flight => cost += network.arc(arc).cost_per_ton() * weight,
                ArcKind::Ground => {}
                ArcKind::NoService { penalty, .. } => {
                    kind = PathKind::NoService;
                    cost += penalty;
                }
            }
        }
        let flight_arcs = arcs
            .iter()
            .copied()
            .filter(|&arc| network.arc(arc).is_flight())
            .collect();
        Path {
            id,
            kind,
            arcs,
            flight_arcs,
            cost,
        }
    }
}

// methods
impl Path {
    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn request(&self) -> RequestId {
        self.id.request
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn is_no_service(&self) -> bool {
        self.kind == PathKind::NoService
    }

    pub fn arcs(&self) -> &[ArcIdx] {
        &self.arcs
    }

    pub fn flight_arcs(&self) -> &[ArcIdx] {
        &self.flight_arcs
    }

    pub fn contains_flight_arc(&self, arc: ArcIdx) -> bool {
        self.flight_arcs.contains(&arc)
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, cost {:.2}): {}",
            self.id,
            self.kind,
            self.cost,
            self.arcs.iter().join(" - ")
        )
    }
}
