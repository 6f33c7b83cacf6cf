//! Exact k-center by branch and bound.
//!
//! Vertices are ordered by increasing sum of distances to others (most central first) and k-subsets
//! are enumerated in combination order over this ordering. The evaluation of a subset stops as soon
//! as one vertex is farther than the best radius known from its nearest candidate center.
//! The best radius is initialized by an upper bound, typically the radius found by [Farthest](super::farthest::Farthest).
//!
//! The search is single threaded but can be run on its own thread : it polls a [CancelToken]
//! every `check_period` descents, and its best solution and comparison count are published in a
//! [SearchProgress] that stays readable from other threads, even if the search thread never returns.

use parking_lot::RwLock;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cpu_time::ProcessTime;
use std::time::{Duration, Instant};

use crate::cancel::*;
use crate::distances::*;
use crate::graph::*;
use crate::result::*;

#[derive(Copy, Clone, Debug)]
pub struct BranchBoundArg {
    /// the cancellation flag is polled every check_period descents in the enumeration tree.
    check_period: u64,
}

impl BranchBoundArg {
    /// a check_period of 0 is replaced by 1
    pub fn new(check_period: u64) -> Self {
        BranchBoundArg {
            check_period: check_period.max(1),
        }
    }

    pub fn get_check_period(&self) -> u64 {
        self.check_period
    }
}

impl Default for BranchBoundArg {
    fn default() -> Self {
        BranchBoundArg { check_period: 100 }
    }
}

//==================================================================

// best solution found
#[derive(Clone, Debug)]
struct Incumbent {
    radius: f64,
    // None until the initial bound is beaten
    centers: Option<Vec<usize>>,
}

/// State of a running (or finished, or abandoned) search shared with observers.
/// Only the search writes into it.
#[derive(Debug)]
pub struct SearchProgress {
    comparisons: AtomicU64,
    best: RwLock<Incumbent>,
}

impl SearchProgress {
    fn new() -> Self {
        SearchProgress {
            comparisons: AtomicU64::new(0),
            best: RwLock::new(Incumbent {
                radius: f64::INFINITY,
                centers: None,
            }),
        }
    }

    fn reset(&self, upper_bound: f64) {
        self.comparisons.store(0, Ordering::Release);
        let mut best = self.best.write();
        best.radius = upper_bound;
        best.centers = None;
    }

    // comparisons are only published by the search thread and never decrease during a search
    fn publish_comparisons(&self, comparisons: u64) {
        self.comparisons.store(comparisons, Ordering::Release);
    }

    fn publish_best(&self, radius: f64, centers: &[usize]) {
        let mut best = self.best.write();
        best.radius = radius;
        best.centers = Some(centers.to_vec());
    }

    /// comparisons done so far (published at least every check period)
    pub fn get_comparisons(&self) -> u64 {
        self.comparisons.load(Ordering::Acquire)
    }

    /// best radius so far, the upper bound if not yet beaten
    pub fn get_best_radius(&self) -> f64 {
        self.best.read().radius
    }

    /// centers realizing best radius, None if upper bound not yet beaten
    pub fn get_best_centers(&self) -> Option<Vec<usize>> {
        self.best.read().centers.clone()
    }
} // end of impl SearchProgress

//==================================================================

// one run of the enumeration
struct Search<'a> {
    matrix: &'a DistanceMatrix,
    // vertices by increasing centrality
    order: Vec<usize>,
    nbcenter: usize,
    token: &'a CancelToken,
    progress: &'a SearchProgress,
    check_period: u64,
    nb_descent: u64,
    comparisons: u64,
    best_radius: f64,
    // candidate centers being built
    current: Vec<usize>,
}

impl<'a> Search<'a> {
    // choose centers at positions >= start in order. Break means cancelled.
    fn descend(&mut self, start: usize) -> ControlFlow<()> {
        self.nb_descent += 1;
        if self.nb_descent % self.check_period == 0 {
            self.progress.publish_comparisons(self.comparisons);
            if self.token.is_cancelled() {
                return ControlFlow::Break(());
            }
        }
        //
        if self.current.len() == self.nbcenter {
            if let Some(radius) = self.bounded_radius() {
                if radius < self.best_radius {
                    self.best_radius = radius;
                    self.progress.publish_best(radius, &self.current);
                    log::debug!(
                        "new best radius : {:.5e}, centers : {:?}",
                        radius,
                        self.current
                    );
                }
            }
            return ControlFlow::Continue(());
        }
        // leave room for the centers still to choose
        let last = self.order.len() + self.current.len() + 1 - self.nbcenter;
        for i in start..last {
            self.current.push(self.order[i]);
            let flow = self.descend(i + 1);
            self.current.pop();
            if flow.is_break() {
                return flow;
            }
        }
        ControlFlow::Continue(())
    } // end of descend

    // radius of current, None as soon as a vertex is farther than best radius from all centers
    fn bounded_radius(&mut self) -> Option<f64> {
        if self.current.is_empty() {
            return Some(0.);
        }
        let mut radius: f64 = 0.;
        for v in 0..self.matrix.get_nb_vertex() {
            let row_v = self.matrix.row(v);
            let mut min_dist = f64::INFINITY;
            for c in &self.current {
                min_dist = min_dist.min(row_v[*c]);
                self.comparisons += 1;
            }
            if min_dist > self.best_radius {
                return None;
            }
            radius = radius.max(min_dist);
        }
        Some(radius)
    } // end of bounded_radius
} // end of impl Search

//==================================================================

/// Exhaustive search of the optimal centers.
///
/// The structure owns the [SearchProgress] of its last (or current) run, accessors
/// [get_comparisons](Self::get_comparisons) and [get_best_radius](Self::get_best_radius) can be called from
/// another thread while [solve](Self::solve) runs. A single `solve` should run at a time on one instance.
pub struct BranchBound {
    arg: BranchBoundArg,
    progress: Arc<SearchProgress>,
}

impl BranchBound {
    pub fn new(arg: BranchBoundArg) -> Self {
        BranchBound {
            arg,
            progress: Arc::new(SearchProgress::new()),
        }
    }

    /// shared handle on the progress of the search
    pub fn get_progress(&self) -> Arc<SearchProgress> {
        self.progress.clone()
    }

    pub fn get_comparisons(&self) -> u64 {
        self.progress.get_comparisons()
    }

    pub fn get_best_radius(&self) -> f64 {
        self.progress.get_best_radius()
    }

    pub fn get_best_centers(&self) -> Option<Vec<usize>> {
        self.progress.get_best_centers()
    }

    /// Searches centers with radius strictly less than upper_bound.
    /// If token gets signaled the search stops and returns the best solution found, with kind [SolutionKind::Bounded].
    /// Otherwise the result is optimal and has kind [SolutionKind::Proven].
    /// If the bound is not beaten the result has the bound as radius and no centers.
    ///
    /// The token is not reset by this function.
    pub fn solve(&self, graph: &Graph, upper_bound: f64, token: &CancelToken) -> MethodResult {
        //
        let cpu_start = ProcessTime::now();
        let sys_start = Instant::now();
        self.progress.reset(upper_bound);
        //
        let matrix = DistanceMatrix::new(graph);
        let comparisons = matrix.get_build_comparisons();
        self.progress.publish_comparisons(comparisons);
        //
        let centrality = matrix.centrality();
        let mut order: Vec<usize> = (0..matrix.get_nb_vertex()).collect();
        order.sort_by(|a, b| centrality[*a].total_cmp(&centrality[*b]));
        //
        let nbcenter = graph.get_nb_center();
        let mut search = Search {
            matrix: &matrix,
            order,
            nbcenter,
            token,
            progress: self.progress.as_ref(),
            check_period: self.arg.check_period,
            nb_descent: 0,
            comparisons,
            best_radius: upper_bound,
            current: Vec::<usize>::with_capacity(nbcenter),
        };
        let flow = search.descend(0);
        self.progress.publish_comparisons(search.comparisons);
        let cancelled = flow.is_break();
        if cancelled {
            log::warn!(
                "BranchBound search interrupted after {} descents. Using best solution found so far",
                search.nb_descent
            );
        }
        let kind = if cancelled {
            SolutionKind::Bounded
        } else {
            SolutionKind::Proven
        };
        //
        let elapsed = sys_start.elapsed();
        let cpu_time: Duration = cpu_start.elapsed();
        let result = self.make_result(elapsed, kind);
        if result.is_improved() {
            log::info!("best solution found : {:.5e}", result.get_radius());
        } else {
            log::info!("no better solution than the upper bound {:.5e} was found", upper_bound);
        }
        log::info!(
            "BranchBound::solve comparisons : {}, sys time(ms) {:?} cpu time(ms) {:?}",
            result.get_comparisons(),
            elapsed.as_millis(),
            cpu_time.as_millis()
        );
        result
    } // end of solve

    /// Builds a result from the published progress.
    /// To be used by a caller who gave up waiting for [solve](Self::solve), with kind [SolutionKind::Bounded].
    pub fn make_result(&self, elapsed: Duration, kind: SolutionKind) -> MethodResult {
        let best = self.progress.best.read().clone();
        MethodResult::new(
            elapsed,
            self.progress.get_comparisons(),
            best.radius,
            kind,
            best.centers.is_some(),
            best.centers,
        )
    }
} // end of impl BranchBound

//=====================================================================================

// end of mod tests
