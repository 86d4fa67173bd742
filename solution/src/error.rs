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

use model::base_types::{ArcIdx, RequestId};

/// a proposed path that cannot enter the catalog.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[display(fmt = "request {} is unknown", _0)]
    UnknownRequest(RequestId),

    #[display(fmt = "path for request {} has no arcs", _0)]
    EmptyPath(RequestId),

    #[display(fmt = "path for request {} uses unknown arc {}", request, arc)]
    UnknownArc { request: RequestId, arc: ArcIdx },

    #[display(
        fmt = "path for request {} is broken after the arc at position {}",
        request,
        position
    )]
    BrokenChain { request: RequestId, position: usize },

    #[display(fmt = "path for request {} does not start at its release node", _0)]
    WrongStart(RequestId),

    #[display(fmt = "path for request {} does not end at its due node", _0)]
    WrongEnd(RequestId),

    #[display(
        fmt = "path for request {} mixes the no-service arc {} with other arcs",
        request,
        arc
    )]
    MixedNoServiceArc { request: RequestId, arc: ArcIdx },

    #[display(
        fmt = "path for request {} uses the no-service arc {} of another request",
        request,
        arc
    )]
    ForeignNoServiceArc { request: RequestId, arc: ArcIdx },

    #[display(fmt = "path for request {} is already in the catalog", _0)]
    DuplicatePath(RequestId),
}

impl std::error::Error for CatalogError {}
