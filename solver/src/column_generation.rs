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
use std::path::{Path as FilePath, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use model::config::Config;
use model::network::Network;
use model::requests::Request;
use rayon::prelude::*;
use solution::path_catalog::PathCatalog;
use solution::CargoSchedule;
use tracing::{debug, info, info_span, warn};

use crate::error::{ColumnGenerationError, SolverError};
use crate::lp::highs_backend::HighsBackend;
use crate::lp::{LpBackend, LpOutcome, SolveOptions};
use crate::master_problem::{Duals, MasterProblem};
use crate::pricing::{pricing_solver, PricingSolver, Proposal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// no request has a path of negative reduced cost: the relaxation is solved to optimality.
    NoImprovingColumn,
    IterationLimit,
    TimeLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Termination::NoImprovingColumn => write!(f, "no improving column"),
            Termination::IterationLimit => write!(f, "iteration limit"),
            Termination::TimeLimit => write!(f, "time limit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub relaxed_objective: f64,
    pub new_columns: usize,
    pub catalog_size: usize,
    pub elapsed: Duration,
}

enum DriverState {
    Seeded,
    Relaxed { duals: Duals, deadline: Option<Instant> },
    Priced { new_columns: usize, complete: bool },
    Converged(Termination),
}

pub struct ColumnGenerationResult {
    schedule: CargoSchedule,
    objective: f64,
    termination: Termination,
    iterations: Vec<IterationRecord>,
    catalog_size: usize,
    runtime: Duration,
}

impl ColumnGenerationResult {
    pub fn schedule(&self) -> &CargoSchedule {
        &self.schedule
    }

    /// objective of the integer master problem.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// objective of the last relaxed master problem. It is a lower bound of the integer
    /// optimum if the termination is `NoImprovingColumn`.
    pub fn relaxed_objective(&self) -> Option<f64> {
        self.iterations.last().map(|record| record.relaxed_objective)
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn iterations(&self) -> &[IterationRecord] {
        &self.iterations
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    pub fn print_iterations(&self) {
        println!("** column generation ({}):", self.termination);
        for record in self.iterations.iter() {
            println!(
                "  iteration {:>3}: relaxed objective {:>14.4}, new columns {:>4}, paths {:>5} ({:0.2}sec)",
                record.iteration,
                record.relaxed_objective,
                record.new_columns,
                record.catalog_size,
                record.elapsed.as_secs_f32()
            );
        }
        println!(
            "  integer objective: {:.4} ({} paths, {:0.2}sec)",
            self.objective,
            self.catalog_size,
            self.runtime.as_secs_f32()
        );
    }
}

/// alternates between the relaxed master problem and the pricing of all requests until no
/// path of negative reduced cost is left or a limit is hit, then solves the integer master
/// problem over all generated paths.
pub struct ColumnGeneration {
    network: Arc<Network>,
    config: Arc<Config>,
    backend: Arc<dyn LpBackend>,
    pricing: Box<dyn PricingSolver>,
    thread_pool: Option<rayon::ThreadPool>,
}

// static functions
impl ColumnGeneration {
    pub fn initialize(network: Arc<Network>) -> Result<ColumnGeneration, ColumnGenerationError> {
        ColumnGeneration::with_backend(network, Arc::new(HighsBackend))
    }

    pub fn with_backend(
        network: Arc<Network>,
        backend: Arc<dyn LpBackend>,
    ) -> Result<ColumnGeneration, ColumnGenerationError> {
        let config = network.config();
        let settings = &config.column_generation;
        let pricing = pricing_solver(
            settings.pricing_engine,
            backend.clone(),
            SolveOptions::default(),
        );
        let thread_pool = if settings.parallel_pricing {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(settings.threads.unwrap_or(0))
                    .build()
                    .map_err(|e| ColumnGenerationError::ThreadPool(e.to_string()))?,
            )
        } else {
            None
        };
        Ok(ColumnGeneration {
            network,
            config,
            backend,
            pricing,
            thread_pool,
        })
    }
}

// methods
impl ColumnGeneration {
    pub fn solve(&self) -> Result<ColumnGenerationResult, ColumnGenerationError> {
        let _span = info_span!("column_generation").entered();
        let start = Instant::now();
        let settings = &self.config.column_generation;

        let mut catalog = PathCatalog::seeded(self.network.clone())?;
        let mut iterations: Vec<IterationRecord> = Vec::new();
        let mut state = DriverState::Seeded;

        let termination = loop {
            state = match state {
                DriverState::Converged(termination) => break termination,
                DriverState::Priced {
                    new_columns: 0,
                    complete: true,
                } => DriverState::Converged(Termination::NoImprovingColumn),
                DriverState::Priced {
                    new_columns: 0,
                    complete: false,
                } => {
                    warn!("pricing was cut off by the iteration time limit without new columns");
                    DriverState::Converged(Termination::TimeLimit)
                }
                DriverState::Seeded | DriverState::Priced { .. } => {
                    if let Some(termination) = self.limit_reached(iterations.len(), start) {
                        warn!(
                            "column generation stopped after {} iterations: {}",
                            iterations.len(),
                            termination
                        );
                        DriverState::Converged(termination)
                    } else {
                        let iteration_start = Instant::now();
                        let deadline = self.deadline(start, iteration_start);
                        match self.solve_relaxed(&catalog, deadline)? {
                            Some((relaxed_objective, duals)) => {
                                iterations.push(IterationRecord {
                                    iteration: iterations.len() + 1,
                                    relaxed_objective,
                                    new_columns: 0,
                                    catalog_size: catalog.len(),
                                    elapsed: Duration::ZERO,
                                });
                                DriverState::Relaxed { duals, deadline }
                            }
                            None => {
                                warn!("relaxed master problem hit the time limit");
                                DriverState::Converged(Termination::TimeLimit)
                            }
                        }
                    }
                }
                DriverState::Relaxed { duals, deadline } => {
                    let (proposals, complete) = self.price_all(&duals, deadline)?;
                    let new_columns = self.append(&mut catalog, proposals)?;
                    if let Some(record) = iterations.last_mut() {
                        record.new_columns = new_columns;
                        record.catalog_size = catalog.len();
                        record.elapsed = start.elapsed();
                        info!(
                            "iteration {}: relaxed objective {:.4}, {} new columns, {} paths ({:0.2}sec)",
                            record.iteration,
                            record.relaxed_objective,
                            new_columns,
                            catalog.len(),
                            record.elapsed.as_secs_f32()
                        );
                    }
                    DriverState::Priced {
                        new_columns,
                        complete,
                    }
                }
            };
        };

        let master = MasterProblem::build(&catalog, true)?;
        if let Some(path) = settings.write_model_to.as_ref() {
            master.program().write_lp_file(path)?;
            master
                .program()
                .relaxed()
                .write_lp_file(&relaxed_model_path(path))?;
            info!("master problem written to {}", path.display());
        }
        let options = SolveOptions {
            time_limit: None,
            mip_gap: settings.mip_gap,
        };
        let solution = match self.backend.solve(master.program(), &options)? {
            LpOutcome::Optimal(solution) => solution,
            LpOutcome::LimitReached(Some(solution)) => {
                warn!("integer master problem stopped early, using its incumbent");
                solution
            }
            LpOutcome::LimitReached(None) => return Err(ColumnGenerationError::NoIntegerSolution),
            LpOutcome::Infeasible => return Err(ColumnGenerationError::InfeasibleMaster("integer")),
            LpOutcome::Unbounded => return Err(ColumnGenerationError::UnboundedMaster("integer")),
        };
        let schedule = master.to_schedule(&solution, &catalog)?;
        info!(
            "integer objective {:.4} after {} iterations ({}, {:0.2}sec)",
            solution.objective(),
            iterations.len(),
            termination,
            start.elapsed().as_secs_f32()
        );

        Ok(ColumnGenerationResult {
            schedule,
            objective: solution.objective(),
            termination,
            iterations,
            catalog_size: catalog.len(),
            runtime: start.elapsed(),
        })
    }
}

// private methods
impl ColumnGeneration {
    fn limit_reached(&self, iterations: usize, start: Instant) -> Option<Termination> {
        let settings = &self.config.column_generation;
        if iterations >= settings.max_iterations {
            Some(Termination::IterationLimit)
        } else if settings
            .time_limit
            .map_or(false, |limit| start.elapsed() >= limit)
        {
            Some(Termination::TimeLimit)
        } else {
            None
        }
    }

    /// the earlier of the global and the per-iteration deadline.
    fn deadline(&self, start: Instant, iteration_start: Instant) -> Option<Instant> {
        let settings = &self.config.column_generation;
        // a limit beyond the range of `Instant` is no limit
        let global = settings
            .time_limit
            .and_then(|limit| start.checked_add(limit));
        let iteration = settings
            .iteration_time_limit
            .and_then(|limit| iteration_start.checked_add(limit));
        match (global, iteration) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// objective and duals of the relaxed master problem, `None` if it ran out of time.
    fn solve_relaxed(
        &self,
        catalog: &PathCatalog,
        deadline: Option<Instant>,
    ) -> Result<Option<(f64, Duals)>, ColumnGenerationError> {
        let master = MasterProblem::build(catalog, false)?;
        let options = SolveOptions {
            time_limit: deadline.map(|d| d.saturating_duration_since(Instant::now())),
            mip_gap: None,
        };
        match self.backend.solve(master.program(), &options)? {
            LpOutcome::Optimal(solution) => {
                Ok(Some((solution.objective(), master.duals(&solution))))
            }
            LpOutcome::LimitReached(_) => Ok(None),
            LpOutcome::Infeasible => Err(ColumnGenerationError::InfeasibleMaster("relaxed")),
            LpOutcome::Unbounded => Err(ColumnGenerationError::UnboundedMaster("relaxed")),
        }
    }

    /// prices every request (in parallel if configured). The flag tells whether all
    /// requests were priced before the deadline.
    fn price_all(
        &self,
        duals: &Duals,
        deadline: Option<Instant>,
    ) -> Result<(Vec<Option<Proposal>>, bool), SolverError> {
        let requests = self.network.requests();
        let requests: Vec<&Request> = requests.iter().collect();
        let complete = AtomicBool::new(true);

        let price_one = |request: &&Request| -> Result<Option<Proposal>, SolverError> {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                complete.store(false, Ordering::Relaxed);
                return Ok(None);
            }
            let proposal = self.pricing.price(&self.network, request, duals)?;
            match proposal.as_ref() {
                Some(p) => debug!(
                    "request {}: reduced cost {:.6} ({} arcs)",
                    request.id(),
                    p.reduced_cost(),
                    p.arcs().len()
                ),
                None => debug!("request {}: no path in its time window", request.id()),
            }
            Ok(proposal)
        };

        let proposals = match self.thread_pool.as_ref() {
            Some(pool) => pool.install(|| {
                requests
                    .par_iter()
                    .map(price_one)
                    .collect::<Result<Vec<_>, _>>()
            })?,
            None => requests
                .iter()
                .map(price_one)
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok((proposals, complete.load(Ordering::Relaxed)))
    }

    /// adds the proposals of negative reduced cost that are not yet known.
    fn append(
        &self,
        catalog: &mut PathCatalog,
        proposals: Vec<Option<Proposal>>,
    ) -> Result<usize, ColumnGenerationError> {
        let tolerance = self.config.column_generation.reduced_cost_tolerance;
        let mut added = 0;
        for proposal in proposals.into_iter().flatten() {
            if proposal.reduced_cost() >= -tolerance {
                continue;
            }
            if catalog.contains(proposal.request(), proposal.arcs()) {
                debug!(
                    "request {}: path with reduced cost {:.6} is already known",
                    proposal.request(),
                    proposal.reduced_cost()
                );
                continue;
            }
            catalog.add(proposal.request(), proposal.into_arcs())?;
            added += 1;
        }
        Ok(added)
    }
}

/// `model.lp` -> `model_relaxed.lp`
fn relaxed_model_path(path: &FilePath) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!("{}_relaxed.lp", stem))
}
