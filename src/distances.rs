//! All pairs shortest path distances of a [Graph], computed by Floyd-Warshall.
//!
//! Each solver builds its own matrix. The matrix records the number of comparisons spent
//! during its construction so that solvers can account for it in their cost.

use ndarray::{Array2, ArrayView1};
use quantiles::ckms::CKMS; // we could use also greenwald_khanna

use rayon::prelude::*;

use crate::graph::*;

#[cfg_attr(doc, katexit::katexit)]
/// Shortest path distances between vertices.
///
/// Initialization puts 0 on the diagonal, the minimum weight of the edges joining i and j
/// (parallel edges) and $+\infty$ for pairs not directly connected.
/// Then for each intermediate vertex m in increasing order and each pair (i,j) we relax
/// $ d(i,j) \leftarrow \min(d(i,j), d(i,m) + d(m,j)) $.
///
/// The radius of a set of centers $C$ is $ r(C) = \max_{v} \min_{c \in C} d(v,c) $.
///
/// Comparisons are counted as : 2 per edge at initialization (one per direction) and one per visited triple (m,i,j).
pub struct DistanceMatrix {
    dist: Array2<f64>,
    // comparisons spent in initialization and relaxation
    build_comparisons: u64,
} // end of struct DistanceMatrix

impl DistanceMatrix {
    /// computes shortest path distances of graph. O(V^3)
    pub fn new(graph: &Graph) -> Self {
        let nbvertex = graph.get_nb_vertex();
        let mut comparisons: u64 = 0;
        let mut dist = Array2::<f64>::from_elem((nbvertex, nbvertex), f64::INFINITY);
        for i in 0..nbvertex {
            dist[[i, i]] = 0.;
        }
        //
        for e in graph.edges() {
            let v = e.either();
            // edges returned by graph are valid
            let w = e.other(v).unwrap_or(v);
            // a self loop does not change the diagonal, parallel edges keep their minimum
            if v != w && e.get_weight() < dist[[v, w]] {
                dist[[v, w]] = e.get_weight();
                dist[[w, v]] = e.get_weight();
            }
            comparisons += 2;
        }
        //
        let mut matrix = DistanceMatrix {
            dist,
            build_comparisons: comparisons,
        };
        matrix.floyd_warshall();
        log::debug!(
            "DistanceMatrix::new nbvertex : {}, comparisons : {}",
            nbvertex,
            matrix.build_comparisons
        );
        matrix
    } // end of new

    // Every triple is visited, no early exit, so that the comparison count depends only on V.
    // Infinite entries need no special case : inf + x = inf and inf < inf is false, weights are never NaN.
    fn floyd_warshall(&mut self) {
        let nbvertex = self.dist.nrows();
        for m in 0..nbvertex {
            // row m is not modified during step m as dist[m][m] = 0
            let row_m = self.dist.row(m).to_owned();
            for i in 0..nbvertex {
                let d_im = self.dist[[i, m]];
                let mut row_i = self.dist.row_mut(i);
                for j in 0..nbvertex {
                    let via_m = d_im + row_m[j];
                    if via_m < row_i[j] {
                        row_i[j] = via_m;
                    }
                }
                self.build_comparisons += nbvertex as u64;
            }
        }
    } // end of floyd_warshall

    pub fn get_nb_vertex(&self) -> usize {
        self.dist.nrows()
    }

    /// distance between i and j, +inf if not connected
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.dist.row(i)
    }

    /// returns comparisons done to build the matrix
    pub fn get_build_comparisons(&self) -> u64 {
        self.build_comparisons
    }

    /// For each vertex, sum of distances to all vertices. The smaller the more central.
    pub fn centrality(&self) -> Vec<f64> {
        (0..self.get_nb_vertex())
            .into_par_iter()
            .map(|i| self.dist.row(i).iter().sum::<f64>())
            .collect()
    }

    /// vertex with minimal sum of distances, first one in case of ties. None if graph is empty.
    pub fn most_central(&self) -> Option<usize> {
        if self.get_nb_vertex() == 0 {
            return None;
        }
        // with all sums infinite vertex 0 is kept
        let mut most_central = 0;
        let mut min_total = f64::INFINITY;
        for (v, total) in self.centrality().into_iter().enumerate() {
            if total < min_total {
                min_total = total;
                most_central = v;
            }
        }
        Some(most_central)
    } // end of most_central

    /// distance of v to nearest center, +inf if centers is empty
    #[inline]
    pub fn nearest_center_dist(&self, v: usize, centers: &[usize]) -> f64 {
        let row_v = self.dist.row(v);
        centers
            .iter()
            .fold(f64::INFINITY, |acc, c| acc.min(row_v[*c]))
    }

    /// returns radius of a center set and the number of comparisons done (one per vertex and center).
    /// An empty center set has radius 0 by convention.
    pub fn radius(&self, centers: &[usize]) -> (f64, u64) {
        if centers.is_empty() {
            return (0., 0);
        }
        let nbvertex = self.get_nb_vertex();
        let radius = (0..nbvertex)
            .map(|v| self.nearest_center_dist(v, centers))
            .fold(0., f64::max);
        (radius, (nbvertex * centers.len()) as u64)
    } // end of radius

    /// quantiles of finite distances between distinct vertices. None if there is none.
    pub fn get_quantiles(&self) -> Option<CKMS<f64>> {
        let mut q_dist = CKMS::<f64>::new(0.01);
        let mut nb_finite = 0usize;
        let nbvertex = self.get_nb_vertex();
        for i in 0..nbvertex {
            for j in (i + 1)..nbvertex {
                let d = self.dist[[i, j]];
                if d.is_finite() {
                    q_dist.insert(d);
                    nb_finite += 1;
                }
            }
        }
        if nb_finite == 0 {
            return None;
        }
        Some(q_dist)
    } // end of get_quantiles

    /// log distance quantiles (debug level)
    pub fn log_quantiles(&self) {
        if let Some(q_dist) = self.get_quantiles() {
            let q = |f: f64| q_dist.query(f).map(|(_, d)| d).unwrap_or(f64::NAN);
            log::debug!(
                "distance quantiles at 0.05 : {:.2e},   0.25 : {:.2e} , 0.5 : {:.2e}, 0.75 :  {:.2e} , 0.95 : {:.2e}, max : {:.2e}",
                q(0.05),
                q(0.25),
                q(0.5),
                q(0.75),
                q(0.95),
                q(1.)
            );
        } else {
            log::debug!("no finite distance between distinct vertices");
        }
    } // end of log_quantiles
} // end of impl DistanceMatrix

//=====================================================================================

// end of mod tests
