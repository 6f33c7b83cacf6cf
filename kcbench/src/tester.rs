//! Runs both solvers on instances.
//!
//! The approximate solver runs on the calling thread. The exact solver, seeded with the approximate
//! radius, runs on its own thread while the caller waits at most `timeout`. Then the search is asked
//! to stop and gets `grace` more time. If it still does not answer, the thread is abandoned and the
//! result is rebuilt from the progress the search published.

use crossbeam_channel::RecvTimeoutError;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpu_time::ProcessTime;

use kcenter::prelude::*;

use crate::io::*;
use crate::report::*;

#[derive(Copy, Clone, Debug)]
pub struct DeadlineArg {
    /// time given to the exact search
    timeout: Duration,
    /// time given to the exact search to stop once cancelled
    grace: Duration,
}

impl DeadlineArg {
    pub fn new(timeout: Duration, grace: Duration) -> Self {
        DeadlineArg { timeout, grace }
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_grace(&self) -> Duration {
        self.grace
    }
}

impl Default for DeadlineArg {
    fn default() -> Self {
        DeadlineArg {
            timeout: Duration::from_secs(30 * 60),
            grace: Duration::from_secs(5),
        }
    }
}

//==================================================================

/// results of both methods on an instance
pub struct InstanceResults {
    pub exact: MethodResult,
    pub approx: MethodResult,
}

pub struct ProblemTester {
    farthest: Farthest,
    bb_arg: BranchBoundArg,
    deadline: DeadlineArg,
}

impl ProblemTester {
    pub fn new(farthest_arg: FarthestArg, bb_arg: BranchBoundArg, deadline: DeadlineArg) -> Self {
        ProblemTester {
            farthest: Farthest::new(farthest_arg),
            bb_arg,
            deadline,
        }
    }

    /// approximate then exact solve of a graph
    pub fn run_instance(&self, graph: Arc<Graph>) -> anyhow::Result<InstanceResults> {
        if log::log_enabled!(log::Level::Debug) {
            DistanceMatrix::new(&graph).log_quantiles();
        }
        let approx = self.farthest.solve(&graph);
        approx.log();
        let exact = self.run_exact(graph, approx.get_radius())?;
        exact.log();
        Ok(InstanceResults { exact, approx })
    } // end of run_instance

    /// exact search on its own thread, bounded by the deadline
    pub fn run_exact(&self, graph: Arc<Graph>, upper_bound: f64) -> anyhow::Result<MethodResult> {
        // a fresh solver and token : an abandoned search may still hold the previous ones
        let solver = Arc::new(BranchBound::new(self.bb_arg));
        let token = CancelToken::new();
        let (tx, rx) = crossbeam_channel::bounded::<MethodResult>(1);
        let sys_start = Instant::now();
        //
        let handle = {
            let (solver, token) = (solver.clone(), token.clone());
            std::thread::Builder::new()
                .name("branchbound".into())
                .spawn(move || {
                    let result = solver.solve(&graph, upper_bound, &token);
                    // receiver may have given up
                    let _ = tx.send(result);
                })?
        };
        //
        match rx.recv_timeout(self.deadline.timeout) {
            Ok(result) => {
                let _ = handle.join();
                return Ok(result);
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                return Err(anyhow::anyhow!("branch and bound thread ended without result"));
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "timeout of {:?} reached, cancelling exact search (comparisons so far : {})",
                    self.deadline.timeout,
                    solver.get_comparisons()
                );
                token.signal();
            }
        }
        //
        match rx.recv_timeout(self.deadline.grace) {
            Ok(result) => {
                let _ = handle.join();
                Ok(result)
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                Err(anyhow::anyhow!("branch and bound thread ended without result"))
            }
            Err(RecvTimeoutError::Timeout) => {
                log::error!(
                    "exact search did not stop within {:?}, abandoning its thread. best radius : {:.5e}, comparisons : {}",
                    self.deadline.grace,
                    solver.get_best_radius(),
                    solver.get_comparisons()
                );
                // the thread is detached, it exits at its next check of the token
                drop(handle);
                Ok(abandoned_result(&solver, sys_start.elapsed(), upper_bound))
            }
        }
    } // end of run_exact

    /// Processes all instances of a directory and writes reports in out_dir.
    /// Instances that cannot be read are skipped. Returns the number of instances processed.
    pub fn run_directory(&self, dir: &Path, out_dir: &Path) -> anyhow::Result<usize> {
        let cpu_start = ProcessTime::now();
        let sys_start = Instant::now();
        //
        let instances = list_instances(dir)?;
        let mut reports = Reports::new(out_dir)?;
        let mut nb_done = 0;
        for path in &instances {
            let name = file_name(path);
            log::info!("\n processing file : {}", name);
            let graph = match read_instance(path) {
                Ok(graph) => Arc::new(graph),
                Err(e) => {
                    log::error!("skipping instance {} : {:#}", name, e);
                    continue;
                }
            };
            let results = match self.run_instance(graph) {
                Ok(results) => results,
                Err(e) => {
                    log::error!("instance {} failed : {:#}", name, e);
                    continue;
                }
            };
            reports.write(&name, &results.exact, &results.approx)?;
            nb_done += 1;
        }
        reports.log();
        log::info!(
            "tests done, {} instances out of {}, sys time(ms) {:?} cpu time(ms) {:?}",
            nb_done,
            instances.len(),
            sys_start.elapsed().as_millis(),
            cpu_start.elapsed().as_millis()
        );
        Ok(nb_done)
    } // end of run_directory
} // end of impl ProblemTester

// Result of a search we stopped waiting for. The search thread may not have started yet,
// in which case its progress does not know the bound.
fn abandoned_result(solver: &BranchBound, elapsed: Duration, upper_bound: f64) -> MethodResult {
    let result = solver.make_result(elapsed, SolutionKind::Bounded);
    if result.get_radius() <= upper_bound {
        return result;
    }
    MethodResult::new(
        elapsed,
        result.get_comparisons(),
        upper_bound,
        SolutionKind::Bounded,
        false,
        None,
    )
} // end of abandoned_result

//=====================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn directory_run() {
        log_init_test();
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_file(dir.path(), "pmed2.txt", "4 3 2\n1 2 1\n2 3 1\n3 4 1\n");
        write_file(dir.path(), "pmed10.txt", "5 4 1\n1 2 1\n2 3 1\n3 4 1\n4 5 1\n");
        write_file(dir.path(), "pmed3.txt", "2 1 3\n1 2 1\n");
        let tester = ProblemTester::new(
            FarthestArg::default(),
            BranchBoundArg::default(),
            DeadlineArg::new(Duration::from_secs(60), Duration::from_secs(5)),
        );
        let nb_done = tester.run_directory(dir.path(), out.path()).unwrap();
        assert_eq!(nb_done, 2);
        //
        let exact = std::fs::read_to_string(out.path().join(EXACT_REPORT)).unwrap();
        let lines: Vec<&str> = exact.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("pmed2.txt,"));
        assert!(lines[1].ends_with(",1.0,proven"));
        assert!(lines[2].starts_with("pmed10.txt,"));
        assert!(lines[2].ends_with(",2.0,proven"));
        let approx = std::fs::read_to_string(out.path().join(APPROX_REPORT)).unwrap();
        assert!(approx.lines().all(|l| !l.starts_with("pmed3")));
        assert!(approx.lines().nth(1).unwrap().ends_with(",heuristic"));
    }

    #[test]
    fn cooperative_timeout() {
        log_init_test();
        let graph = Arc::new(Graph::random(80, 400, 8, 777).unwrap());
        let tester = ProblemTester::new(
            FarthestArg::default(),
            BranchBoundArg::default(),
            DeadlineArg::new(Duration::from_millis(50), Duration::from_secs(10)),
        );
        let results = tester.run_instance(graph).unwrap();
        assert_eq!(results.exact.get_kind(), SolutionKind::Bounded);
        assert!(results.exact.get_radius() <= results.approx.get_radius());
    }

    #[test]
    fn abandoned_search() {
        log_init_test();
        let graph = Arc::new(Graph::random(60, 300, 6, 4242).unwrap());
        // the search never polls its token
        let tester = ProblemTester::new(
            FarthestArg::default(),
            BranchBoundArg::new(u64::MAX),
            DeadlineArg::new(Duration::from_millis(10), Duration::from_millis(10)),
        );
        let bound = Farthest::new(FarthestArg::default()).solve(&graph).get_radius();
        let result = tester.run_exact(graph, bound).unwrap();
        assert_eq!(result.get_kind(), SolutionKind::Bounded);
        assert!(result.get_elapsed() >= Duration::from_millis(20));
        assert!(result.get_radius() <= bound);
        assert_eq!(result.get_centers().is_some(), result.is_improved());
    }

    #[test]
    fn abandoned_before_start_keeps_bound() {
        log_init_test();
        // a solver whose search never ran still knows nothing of the bound
        let solver = BranchBound::new(BranchBoundArg::default());
        assert_eq!(solver.get_best_radius(), f64::INFINITY);
        let result = abandoned_result(&solver, Duration::from_millis(3), 5.);
        assert_eq!(result.get_radius(), 5.);
        assert_eq!(result.get_kind(), SolutionKind::Bounded);
        assert!(!result.is_improved());
        assert!(result.get_centers().is_none());
        assert_eq!(result.get_comparisons(), 0);
        // a finished search is left untouched
        let mut graph = Graph::new(3, 1).unwrap();
        graph.add_edge(Edge::new(0, 1, 1.)).unwrap();
        graph.add_edge(Edge::new(1, 2, 1.)).unwrap();
        let solved = solver.solve(&graph, 5., &CancelToken::new());
        let result = abandoned_result(&solver, Duration::from_millis(3), 5.);
        assert_eq!(result.get_radius(), 1.);
        assert_eq!(result.get_centers(), solved.get_centers());
        assert_eq!(result.get_comparisons(), solved.get_comparisons());
    }
} // end of mod tests
