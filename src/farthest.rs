//! Approximate k-center : farthest first traversal (Gonzalez) started at the most central vertex,
//! then a first improvement swap local search.
//!
//! The radius obtained is an upper bound of the optimal radius and serves as initial bound for
//! the [branch and bound](super::branchbound) search.

use cpu_time::ProcessTime;
use std::time::{Duration, Instant};

use crate::distances::*;
use crate::graph::*;
use crate::result::*;

/// Parameters of the local search
#[derive(Copy, Clone, Debug)]
pub struct FarthestArg {
    /// maximal number of local search passes. A pass ends at the first accepted swap.
    max_passes: usize,
}

impl FarthestArg {
    pub fn new(max_passes: usize) -> Self {
        FarthestArg { max_passes }
    }

    pub fn get_max_passes(&self) -> usize {
        self.max_passes
    }
}

impl Default for FarthestArg {
    fn default() -> Self {
        FarthestArg { max_passes: 100 }
    }
}

//==================================================================

pub struct Farthest {
    arg: FarthestArg,
}

impl Farthest {
    pub fn new(arg: FarthestArg) -> Self {
        Farthest { arg }
    }

    /// computes distances, seeds centers and refines them. Always runs to completion.
    pub fn solve(&self, graph: &Graph) -> MethodResult {
        //
        let cpu_start = ProcessTime::now();
        let sys_start = Instant::now();
        //
        let matrix = DistanceMatrix::new(graph);
        let mut comparisons = matrix.get_build_comparisons();
        let nbcenter = graph.get_nb_center();
        //
        let mut centers = self.seed_centers(&matrix, nbcenter, &mut comparisons);
        let (seed_radius, nb_comp) = matrix.radius(&centers);
        comparisons += nb_comp;
        log::debug!(
            "farthest first traversal radius : {:.5e}, centers : {:?}",
            seed_radius,
            centers
        );
        let radius = self.local_search(&matrix, &mut centers, seed_radius, &mut comparisons);
        //
        let cpu_time: Duration = cpu_start.elapsed();
        let elapsed = sys_start.elapsed();
        log::info!(
            "Farthest::solve radius : {:.5e} (seed radius {:.5e}), comparisons : {}, sys time(ms) {:?} cpu time(ms) {:?}",
            radius,
            seed_radius,
            comparisons,
            elapsed.as_millis(),
            cpu_time.as_millis()
        );
        MethodResult::new(
            elapsed,
            comparisons,
            radius,
            SolutionKind::Heuristic,
            false,
            Some(centers),
        )
    } // end of solve

    // Start at most central vertex then add nbcenter-1 times the vertex farthest from current centers.
    // Ties: the first vertex reaching a strictly greater distance wins.
    // Comparisons : one per (candidate, center) and one per incumbent replacement.
    pub(crate) fn seed_centers(
        &self,
        matrix: &DistanceMatrix,
        nbcenter: usize,
        comparisons: &mut u64,
    ) -> Vec<usize> {
        let nbvertex = matrix.get_nb_vertex();
        let mut centers = Vec::<usize>::with_capacity(nbcenter);
        if nbcenter == 0 {
            return centers;
        }
        let first = match matrix.most_central() {
            Some(v) => v,
            None => return centers,
        };
        let mut is_center = vec![false; nbvertex];
        centers.push(first);
        is_center[first] = true;
        //
        for _ in 1..nbcenter {
            let mut farthest: Option<usize> = None;
            let mut max_min_dist = -1.;
            for v in (0..nbvertex).filter(|v| !is_center[*v]) {
                let row_v = matrix.row(v);
                let mut min_dist = f64::INFINITY;
                for c in &centers {
                    min_dist = min_dist.min(row_v[*c]);
                    *comparisons += 1;
                }
                if min_dist > max_min_dist {
                    max_min_dist = min_dist;
                    farthest = Some(v);
                    *comparisons += 1;
                }
            }
            if let Some(v) = farthest {
                centers.push(v);
                is_center[v] = true;
            }
        }
        centers
    } // end of seed_centers

    // First improvement : in each pass, try center positions in order and for each one all
    // non center vertices in order. The first strictly better swap is kept and a new pass starts.
    // A pass without improvement or the pass limit stops the search.
    // Returns the final radius, centers are updated in place.
    pub(crate) fn local_search(
        &self,
        matrix: &DistanceMatrix,
        centers: &mut [usize],
        start_radius: f64,
        comparisons: &mut u64,
    ) -> f64 {
        let nbvertex = matrix.get_nb_vertex();
        let mut is_center = vec![false; nbvertex];
        for c in centers.iter() {
            is_center[*c] = true;
        }
        let mut radius = start_radius;
        let mut improved = true;
        let mut nb_pass = 0;
        //
        while improved && nb_pass < self.arg.max_passes {
            improved = false;
            nb_pass += 1;
            'pass: for i in 0..centers.len() {
                let current = centers[i];
                for v in 0..nbvertex {
                    if is_center[v] {
                        continue;
                    }
                    centers[i] = v;
                    let (new_radius, nb_comp) = matrix.radius(centers);
                    *comparisons += nb_comp;
                    if new_radius < radius {
                        log::trace!(
                            "pass {} swapping center {} for {}, radius {:.5e} -> {:.5e}",
                            nb_pass,
                            current,
                            v,
                            radius,
                            new_radius
                        );
                        radius = new_radius;
                        is_center[current] = false;
                        is_center[v] = true;
                        improved = true;
                        break 'pass;
                    }
                    centers[i] = current;
                }
            }
        }
        log::debug!("local search done after {} passes", nb_pass);
        radius
    } // end of local_search
} // end of impl Farthest

//=====================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn path(nbvertex: usize, nbcenter: usize) -> Graph {
        let mut graph = Graph::new(nbvertex, nbcenter).unwrap();
        for v in 1..nbvertex {
            graph.add_edge(Edge::new(v - 1, v, 1.)).unwrap();
        }
        graph
    }

    // exhaustive minimum radius
    fn brute_force(matrix: &DistanceMatrix, k: usize) -> f64 {
        fn recurse(matrix: &DistanceMatrix, start: usize, k: usize, chosen: &mut Vec<usize>, best: &mut f64) {
            if chosen.len() == k {
                *best = best.min(matrix.radius(chosen).0);
                return;
            }
            for v in start..matrix.get_nb_vertex() {
                chosen.push(v);
                recurse(matrix, v + 1, k, chosen, best);
                chosen.pop();
            }
        }
        let mut best = f64::INFINITY;
        recurse(matrix, 0, k, &mut Vec::new(), &mut best);
        best
    }

    #[test]
    fn path4_two_centers() {
        log_init_test();
        let graph = path(4, 2);
        let result = Farthest::new(FarthestArg::default()).solve(&graph);
        assert_eq!(result.get_radius(), 1.);
        assert_eq!(result.get_kind(), SolutionKind::Heuristic);
        assert!(!result.is_improved());
        // seeded at 1 (first most central), farthest is 3
        assert_eq!(result.get_centers().unwrap(), &vec![1, 3]);
    }

    #[test]
    fn seeding_comparisons() {
        log_init_test();
        let graph = path(4, 2);
        let matrix = DistanceMatrix::new(&graph);
        let algo = Farthest::new(FarthestArg::default());
        let mut comparisons = 0;
        let centers = algo.seed_centers(&matrix, 2, &mut comparisons);
        assert_eq!(centers, vec![1, 3]);
        // 3 candidates against 1 center, incumbent replaced for 0 (1.) and 3 (2.)
        assert_eq!(comparisons, 3 + 2);
    }

    #[test]
    fn degenerate_sizes() {
        log_init_test();
        let algo = Farthest::new(FarthestArg::default());
        let empty = Graph::new(0, 0).unwrap();
        let result = algo.solve(&empty);
        assert_eq!(result.get_radius(), 0.);
        assert_eq!(result.get_comparisons(), 0);
        //
        let no_center = path(5, 0);
        let result = algo.solve(&no_center);
        assert_eq!(result.get_radius(), 0.);
        assert!(result.get_centers().unwrap().is_empty());
        //
        let all_centers = Graph::random(8, 20, 8, 11).unwrap();
        let result = algo.solve(&all_centers);
        assert_eq!(result.get_radius(), 0.);
        let mut centers = result.get_centers().unwrap().clone();
        centers.sort_unstable();
        assert_eq!(centers, (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn never_beats_optimum() {
        log_init_test();
        let algo = Farthest::new(FarthestArg::default());
        for seed in 0..20u64 {
            let nbcenter = 1 + (seed as usize % 3);
            let graph = Graph::random(9, 25, nbcenter, 1000 + seed).unwrap();
            let matrix = DistanceMatrix::new(&graph);
            let optimum = brute_force(&matrix, nbcenter);
            let result = algo.solve(&graph);
            log::debug!("seed {} heuristic {} optimum {}", seed, result.get_radius(), optimum);
            assert!(result.get_radius() >= optimum);
            // reported radius is the radius of reported centers
            let centers = result.get_centers().unwrap();
            assert_eq!(centers.len(), nbcenter);
            assert_eq!(matrix.radius(centers).0, result.get_radius());
        }
    }

    #[test]
    fn local_search_never_worsens() {
        log_init_test();
        let algo = Farthest::new(FarthestArg::default());
        let no_search = Farthest::new(FarthestArg::new(0));
        for seed in 0..10u64 {
            let graph = Graph::random(12, 30, 3, 77 + seed).unwrap();
            let matrix = DistanceMatrix::new(&graph);
            let mut comparisons = 0;
            let centers = algo.seed_centers(&matrix, 3, &mut comparisons);
            let seed_radius = matrix.radius(&centers).0;
            let refined = algo.solve(&graph);
            assert!(refined.get_radius() <= seed_radius);
            // without passes we keep the seeded solution
            let unrefined = no_search.solve(&graph);
            assert_eq!(unrefined.get_radius(), seed_radius);
            assert_eq!(unrefined.get_centers().unwrap(), &centers);
        }
    }

    #[test]
    fn deterministic() {
        log_init_test();
        let graph = Graph::random(20, 60, 4, 3141).unwrap();
        let algo = Farthest::new(FarthestArg::default());
        let r1 = algo.solve(&graph);
        let r2 = algo.solve(&graph);
        assert_eq!(r1.get_radius(), r2.get_radius());
        assert_eq!(r1.get_comparisons(), r2.get_comparisons());
        assert_eq!(r1.get_centers(), r2.get_centers());
    }
} // end of mod tests
