//! Metric k-center on weighted graphs.
//!
//! Given a graph and a number of centers k, we look for k vertices minimizing the largest
//! distance from a vertex to its nearest center (the radius).
//! Two solvers share the all-pairs shortest path computation of [distances]:
//! - [farthest] : farthest first traversal seeded at the most central vertex, followed by a swap local search.
//!   It gives quickly an upper bound of the optimal radius.
//! - [branchbound] : enumeration of k-subsets pruned by the best radius known so far, cancellable by a
//!   [CancelToken](cancel::CancelToken) so that a time budget can be enforced from another thread.

use lazy_static::lazy_static;

pub mod prelude;

pub mod cancel;
pub mod distances;
pub mod graph;
pub mod result;

pub mod branchbound;
pub mod farthest;

lazy_static! {
    static ref LOG: u64 = init_log();
}

#[allow(unused)]
// install a logger facility
fn init_log() -> u64 {
    let _res = env_logger::try_init();
    log::info!("\n ************** initializing logger *****************\n");
    1
}

#[cfg(test)]
mod tests {
    #[test]
    // initialize once log system for tests.
    fn init_log() {
        let _res = env_logger::try_init();
    }
} // end of tests
