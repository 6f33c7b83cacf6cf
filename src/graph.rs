//! Undirected weighted (multi)graph with a required number of centers.
//!
//! Parallel edges and self loops are accepted. Each edge is stored in the adjacency list
//! of both its endpoints, so a self loop appears twice in the adjacency list of its vertex.

use anyhow::{Result, anyhow};

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

use std::fmt;

/// An undirected edge with a non negative weight
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    v: usize,
    w: usize,
    weight: f64,
}

impl Edge {
    pub fn new(v: usize, w: usize, weight: f64) -> Self {
        Edge { v, w, weight }
    }

    /// returns one of the endpoints
    pub fn either(&self) -> usize {
        self.v
    }

    /// given one endpoint, returns the other one. For a self loop returns vertex itself.
    pub fn other(&self, vertex: usize) -> Result<usize> {
        if vertex == self.v {
            Ok(self.w)
        } else if vertex == self.w {
            Ok(self.v)
        } else {
            Err(anyhow!("vertex {} is not an endpoint of edge {}", vertex, self))
        }
    }

    pub fn get_weight(&self) -> f64 {
        self.weight
    }
} // end of impl Edge

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {:.5}", self.v, self.w, self.weight)
    }
}

//===================================================================================

/// The graph on which we search centers.
/// The number of centers is fixed at construction and must not exceed the number of vertices.
pub struct Graph {
    nbvertex: usize,
    nbedge: usize,
    // number of centers required
    nbcenter: usize,
    // adjacency lists, an edge is stored at both ends
    adj: Vec<Vec<Edge>>,
} // end of struct Graph

impl Graph {
    /// allocates a graph without edges.
    /// Fails if nbcenter > nbvertex.
    pub fn new(nbvertex: usize, nbcenter: usize) -> Result<Self> {
        if nbcenter > nbvertex {
            log::error!(
                "Graph::new, nb centers asked {} greater than nb vertices {}",
                nbcenter,
                nbvertex
            );
            return Err(anyhow!(
                "number of centers {} must be between 0 and number of vertices {}",
                nbcenter,
                nbvertex
            ));
        }
        let adj = (0..nbvertex).map(|_| Vec::<Edge>::new()).collect();
        Ok(Graph {
            nbvertex,
            nbedge: 0,
            nbcenter,
            adj,
        })
    } // end of new

    /// generates a random multigraph with nbedge edges.
    /// Endpoints are uniform in [0, nbvertex), weights are multiple of 0.01 in [0, 0.99].
    /// Self loops and parallel edges can occur.
    pub fn random(nbvertex: usize, nbedge: usize, nbcenter: usize, seed: u64) -> Result<Self> {
        let mut graph = Graph::new(nbvertex, nbcenter)?;
        if nbvertex == 0 && nbedge > 0 {
            return Err(anyhow!("cannot generate edges in a graph without vertices"));
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        for _ in 0..nbedge {
            let v = rng.random_range(0..nbvertex);
            let w = rng.random_range(0..nbvertex);
            let weight = 0.01 * rng.random_range(0..100u32) as f64;
            graph.add_edge(Edge::new(v, w, weight))?;
        }
        log::debug!(
            "Graph::random nbvertex : {}, nbedge : {}, nbcenter : {}",
            nbvertex,
            nbedge,
            nbcenter
        );
        Ok(graph)
    } // end of random

    pub fn get_nb_vertex(&self) -> usize {
        self.nbvertex
    }

    /// number of edges inserted, parallel edges and self loops included
    pub fn get_nb_edge(&self) -> usize {
        self.nbedge
    }

    /// returns the number of centers to find
    pub fn get_nb_center(&self) -> usize {
        self.nbcenter
    }

    fn validate_vertex(&self, v: usize) -> Result<()> {
        if v >= self.nbvertex {
            return Err(anyhow!(
                "vertex {} is not between 0 and {}",
                v,
                self.nbvertex as i64 - 1
            ));
        }
        Ok(())
    }

    /// inserts an edge. Endpoints must be valid vertices and weight finite and non negative.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let v = edge.either();
        let w = edge.other(v)?;
        self.validate_vertex(v)?;
        self.validate_vertex(w)?;
        if !edge.get_weight().is_finite() || edge.get_weight() < 0. {
            return Err(anyhow!(
                "edge {} must have a finite non negative weight",
                edge
            ));
        }
        self.adj[v].push(edge);
        self.adj[w].push(edge);
        self.nbedge += 1;
        Ok(())
    } // end of add_edge

    /// edges incident to v. A self loop on v is listed twice.
    pub fn adj(&self, v: usize) -> Result<&[Edge]> {
        self.validate_vertex(v)?;
        Ok(&self.adj[v])
    }

    pub fn degree(&self, v: usize) -> Result<usize> {
        self.validate_vertex(v)?;
        Ok(self.adj[v].len())
    }

    /// returns each edge once, self loops included.
    pub fn edges(&self) -> Vec<Edge> {
        let mut list = Vec::<Edge>::with_capacity(self.nbedge);
        for (v, adj_v) in self.adj.iter().enumerate() {
            // the two copies of a self loop are consecutive in adj_v
            let mut nb_selfloop = 0usize;
            for e in adj_v {
                let other = if e.either() == v { e.w } else { e.v };
                if other > v {
                    list.push(*e);
                } else if other == v {
                    if nb_selfloop % 2 == 0 {
                        list.push(*e);
                    }
                    nb_selfloop += 1;
                }
            }
        }
        list
    } // end of edges

    /// Graphviz dump of the graph
    pub fn to_dot(&self) -> String {
        let mut s = String::from("graph {\n");
        s.push_str(
            "node[shape=circle, style=filled, fixedsize=true, width=0.3, fontsize=\"10pt\"]\n",
        );
        s.push_str("edge[arrowhead=normal, fontsize=\"9pt\"]\n");
        for e in self.edges() {
            let v = e.either();
            let w = if v == e.v { e.w } else { e.v };
            s.push_str(&format!("{} -- {} [label=\"{}\"]\n", v, w, e.get_weight()));
        }
        s.push_str("}\n");
        s
    } // end of to_dot
} // end of impl Graph

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.nbvertex, self.nbedge)?;
        for (v, adj_v) in self.adj.iter().enumerate() {
            write!(f, "{}: ", v)?;
            for e in adj_v {
                write!(f, "{}  ", e)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//=====================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn too_many_centers() {
        log_init_test();
        assert!(Graph::new(3, 4).is_err());
        assert!(Graph::new(3, 3).is_ok());
        assert!(Graph::new(0, 0).is_ok());
    }

    #[test]
    fn bad_edges_rejected() {
        log_init_test();
        let mut graph = Graph::new(3, 1).unwrap();
        assert!(graph.add_edge(Edge::new(0, 3, 1.)).is_err());
        assert!(graph.add_edge(Edge::new(0, 1, -1.)).is_err());
        assert!(graph.add_edge(Edge::new(0, 1, f64::NAN)).is_err());
        assert!(graph.add_edge(Edge::new(0, 1, f64::INFINITY)).is_err());
        assert_eq!(graph.get_nb_edge(), 0);
        assert!(graph.adj(3).is_err());
    }

    #[test]
    fn self_loop_listed_once() {
        log_init_test();
        let mut graph = Graph::new(3, 1).unwrap();
        graph.add_edge(Edge::new(0, 1, 1.)).unwrap();
        graph.add_edge(Edge::new(1, 1, 0.5)).unwrap();
        graph.add_edge(Edge::new(1, 2, 2.)).unwrap();
        graph.add_edge(Edge::new(2, 1, 3.)).unwrap();
        // self loop stored twice in adjacency
        assert_eq!(graph.degree(1).unwrap(), 5);
        let edges = graph.edges();
        assert_eq!(edges.len(), 4);
        let nb_loops = edges.iter().filter(|e| e.either() == e.other(e.either()).unwrap()).count();
        assert_eq!(nb_loops, 1);
        log::debug!("graph : \n{}", graph);
        log::debug!("dot : \n{}", graph.to_dot());
        assert!(graph.to_dot().contains("1 -- 1"));
    }

    #[test]
    fn random_graph_is_reproducible() {
        log_init_test();
        let g1 = Graph::random(10, 30, 3, 4517).unwrap();
        let g2 = Graph::random(10, 30, 3, 4517).unwrap();
        assert_eq!(g1.get_nb_edge(), 30);
        assert_eq!(g1.edges(), g2.edges());
        for e in g1.edges() {
            assert!(e.get_weight() >= 0. && e.get_weight() < 1.);
        }
        assert!(Graph::random(0, 1, 0, 1).is_err());
    }
} // end of mod tests
