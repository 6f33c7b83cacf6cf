//! Result of a solver run.

use std::fmt;
use std::time::Duration;

/// How the radius of a [MethodResult] was obtained
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolutionKind {
    /// farthest first traversal and local search, an upper bound of the optimum
    Heuristic,
    /// exhaustive search completed, the radius is optimal
    Proven,
    /// exhaustive search cancelled, best radius found before interruption
    Bounded,
}

impl SolutionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolutionKind::Heuristic => "heuristic",
            SolutionKind::Proven => "proven",
            SolutionKind::Bounded => "bounded",
        }
    }
}

impl fmt::Display for SolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//===================================================================================

/// Elapsed time, comparisons (an hardware independent cost), radius and kind of solution.
#[derive(Clone, Debug)]
pub struct MethodResult {
    elapsed: Duration,
    comparisons: u64,
    radius: f64,
    kind: SolutionKind,
    // true if an exact search found better than the bound it was given
    improved: bool,
    // centers realizing radius if known
    centers: Option<Vec<usize>>,
} // end of struct MethodResult

impl MethodResult {
    pub fn new(
        elapsed: Duration,
        comparisons: u64,
        radius: f64,
        kind: SolutionKind,
        improved: bool,
        centers: Option<Vec<usize>>,
    ) -> Self {
        MethodResult {
            elapsed,
            comparisons,
            radius,
            kind,
            improved,
            centers,
        }
    }

    pub fn get_elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn get_comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn get_radius(&self) -> f64 {
        self.radius
    }

    pub fn get_kind(&self) -> SolutionKind {
        self.kind
    }

    /// for an exact search, true if the bound given was beaten. Always false for the heuristic.
    pub fn is_improved(&self) -> bool {
        self.improved
    }

    /// The exact search returns None if it did not beat its bound.
    pub fn get_centers(&self) -> Option<&Vec<usize>> {
        self.centers.as_ref()
    }

    pub fn log(&self) {
        log::info!(
            "{} result, radius : {:.5e}, comparisons : {}, sys time(ms) : {}, improved : {}",
            self.kind,
            self.radius,
            self.comparisons,
            self.elapsed.as_millis(),
            self.improved
        );
        log::debug!("centers : {:?}", self.centers);
    }
} // end of impl MethodResult
