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


use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use itertools::Itertools;
use model::base_types::{ArcIdx, RequestId};
use model::network::Network;
use tracing::debug;

use crate::error::CatalogError;
use crate::path::{Path, PathId};

/// the append-only set of known paths.
///
/// Three views are kept consistent on every insertion:
/// - the paths of each request (in insertion order),
/// - the path of each `PathId`,
/// - the paths of a request that use a given flight arc.
pub struct PathCatalog {
    paths: Vec<Path>,
    positions: HashMap<PathId, usize>,
    paths_of_request: BTreeMap<RequestId, Vec<PathId>>,
    paths_of_flight_arc: HashMap<(ArcIdx, RequestId), Vec<PathId>>,
    known_sequences: HashSet<(RequestId, Vec<ArcIdx>)>,

    network: Arc<Network>,
}

// static functions
impl PathCatalog {
    /// a catalog with the no-service path of every request.
    pub fn seeded(network: Arc<Network>) -> Result<PathCatalog, CatalogError> {
        let mut catalog = PathCatalog {
            paths: Vec::new(),
            positions: HashMap::new(),
            paths_of_request: BTreeMap::new(),
            paths_of_flight_arc: HashMap::new(),
            known_sequences: HashSet::new(),
            network: network.clone(),
        };
        for request in network.requests().ids() {
            let arc = network
                .no_service_arc(request)
                .ok_or(CatalogError::UnknownRequest(request))?;
            catalog.add(request, vec![arc])?;
        }
        Ok(catalog)
    }
}

// methods
impl PathCatalog {
    /// validates the arc sequence, stores the path in all views and returns its id.
    pub fn add(&mut self, request: RequestId, arcs: Vec<ArcIdx>) -> Result<PathId, CatalogError> {
        self.validate(request, &arcs)?;
        if self.contains(request, &arcs) {
            return Err(CatalogError::DuplicatePath(request));
        }

        let weight = self
            .network
            .requests()
            .get(request)
            .map(|r| r.weight())
            .ok_or(CatalogError::UnknownRequest(request))?;
        let ids = self.paths_of_request.entry(request).or_default();
        let id = PathId::new(request, ids.len() as u32);
        ids.push(id);

        let path = Path::new(id, arcs.clone(), weight, &self.network);
        for &flight in path.flight_arcs() {
            self.paths_of_flight_arc
                .entry((flight, request))
                .or_default()
                .push(id);
        }
        debug!("new path {}", path);
        self.known_sequences.insert((request, arcs));
        self.positions.insert(id, self.paths.len());
        self.paths.push(path);
        Ok(id)
    }

    pub fn contains(&self, request: RequestId, arcs: &[ArcIdx]) -> bool {
        self.known_sequences.contains(&(request, arcs.to_vec()))
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.positions.get(&id).map(|&position| &self.paths[position])
    }

    pub fn paths_for_request(&self, request: RequestId) -> impl Iterator<Item = &Path> + '_ {
        self.paths_of_request
            .get(&request)
            .into_iter()
            .flatten()
            .filter_map(move |&id| self.path(id))
    }

    /// paths of the request that contain the flight arc.
    pub fn paths_containing_flight_arc(&self, arc: ArcIdx, request: RequestId) -> &[PathId] {
        self.paths_of_flight_arc
            .get(&(arc, request))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// requests that have at least one path through the flight arc.
    pub fn requests_using_flight_arc(&self, arc: ArcIdx) -> impl Iterator<Item = RequestId> + '_ {
        self.paths_of_request
            .keys()
            .copied()
            .filter(move |&request| self.paths_of_flight_arc.contains_key(&(arc, request)))
    }

    /// all paths in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> + '_ {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn network(&self) -> Arc<Network> {
        self.network.clone()
    }
}

// private methods
impl PathCatalog {
    fn validate(&self, request: RequestId, arcs: &[ArcIdx]) -> Result<(), CatalogError> {
        let network = &self.network;
        let (release, due) = match (network.release_node(request), network.due_node(request)) {
            (Some(release), Some(due)) => (release, due),
            _ => return Err(CatalogError::UnknownRequest(request)),
        };
        if arcs.is_empty() {
            return Err(CatalogError::EmptyPath(request));
        }
        for &arc in arcs.iter() {
            if arc.idx() >= network.number_of_arcs() {
                return Err(CatalogError::UnknownArc { request, arc });
            }
            if let Some(owner) = network.arc(arc).request() {
                if owner != request {
                    return Err(CatalogError::ForeignNoServiceArc { request, arc });
                }
                if arcs.len() > 1 {
                    return Err(CatalogError::MixedNoServiceArc { request, arc });
                }
            }
        }
        for (position, (&a, &b)) in arcs.iter().tuple_windows().enumerate() {
            if network.arc(a).destination() != network.arc(b).origin() {
                return Err(CatalogError::BrokenChain { request, position });
            }
        }
        if network.arc(arcs[0]).origin() != release {
            return Err(CatalogError::WrongStart(request));
        }
        if network.arc(arcs[arcs.len() - 1]).destination() != due {
            return Err(CatalogError::WrongEnd(request));
        }
        Ok(())
    }
}
