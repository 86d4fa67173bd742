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

use crate::base_types::{AirportIdx, ArcIdx, NodeIdx, Timestep};

use super::arcs::ArcKind;

/// arc handles of one direction of a node, partitioned by arc kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArcLists {
    flight: Vec<ArcIdx>,
    ground: Vec<ArcIdx>,
    no_service: Vec<ArcIdx>,
}

impl ArcLists {
    pub fn flight(&self) -> &[ArcIdx] {
        &self.flight
    }

    pub fn ground(&self) -> &[ArcIdx] {
        &self.ground
    }

    pub fn no_service(&self) -> &[ArcIdx] {
        &self.no_service
    }

    /// flight and ground arcs, i.e. the arcs aircraft and routed cargo can use.
    pub fn operational(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.flight.iter().chain(self.ground.iter()).copied()
    }

    pub fn all(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        self.operational().chain(self.no_service.iter().copied())
    }

    pub(super) fn push(&mut self, arc: ArcIdx, kind: &ArcKind) {
        match kind {
            ArcKind::Flight => self.flight.push(arc),
            ArcKind::Ground => self.ground.push(arc),
            ArcKind::NoService { .. } => self.no_service.push(arc),
        }
    }
}

/// a (timestep, airport) pair of the time-space network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    idx: NodeIdx,
    timestep: Timestep,
    airport: AirportIdx,
    incoming: ArcLists,
    outgoing: ArcLists,
}

impl Node {
    pub(super) fn new(idx: NodeIdx, timestep: Timestep, airport: AirportIdx) -> Node {
        Node {
            idx,
            timestep,
            airport,
            incoming: ArcLists::default(),
            outgoing: ArcLists::default(),
        }
    }

    pub fn idx(&self) -> NodeIdx {
        self.idx
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub fn airport(&self) -> AirportIdx {
        self.airport
    }

    pub fn incoming(&self) -> &ArcLists {
        &self.incoming
    }

    pub fn outgoing(&self) -> &ArcLists {
        &self.outgoing
    }

    pub(super) fn incoming_mut(&mut self) -> &mut ArcLists {
        &mut self.incoming
    }

    pub(super) fn outgoing_mut(&mut self) -> &mut ArcLists {
        &mut self.outgoing
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(t{}, {})", self.idx, self.timestep, self.airport)
    }
}
