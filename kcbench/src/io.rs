//! Instance files in OR-Library pmed format.
//!
//! The first line gives `nbvertex nbedge nbcenter`, then each line `u v weight` describes an edge
//! with vertices numbered from 1. Lines with less than 3 fields are ignored.

use anyhow::{Context, anyhow};
use std::cmp::Ordering;
use std::fs::OpenOptions;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use kcenter::prelude::*;

/// reads a graph from an instance file
pub fn read_instance(path: &Path) -> anyhow::Result<Graph> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("cannot open instance file {:?}", path))?;
    let mut lines = BufReader::new(file).lines();
    //
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(anyhow!("instance file {:?} is empty", path)),
    };
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(anyhow!(
            "bad header in {:?}, expecting nbvertex nbedge nbcenter, got {:?}",
            path,
            header
        ));
    }
    let nbvertex: usize = fields[0]
        .parse()
        .with_context(|| format!("bad vertex number in header of {:?}", path))?;
    let nbedge_announced: usize = fields[1]
        .parse()
        .with_context(|| format!("bad edge number in header of {:?}", path))?;
    let nbcenter: usize = fields[2]
        .parse()
        .with_context(|| format!("bad center number in header of {:?}", path))?;
    //
    let mut graph = Graph::new(nbvertex, nbcenter)
        .with_context(|| format!("invalid instance {:?}", path))?;
    for (rank, line) in lines.enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        // header is line 1
        let lineno = rank + 2;
        let v = parse_vertex(fields[0]).with_context(|| format!("{:?} line {}", path, lineno))?;
        let w = parse_vertex(fields[1]).with_context(|| format!("{:?} line {}", path, lineno))?;
        let weight: f64 = fields[2]
            .parse()
            .with_context(|| format!("bad weight at {:?} line {}", path, lineno))?;
        graph
            .add_edge(Edge::new(v, w, weight))
            .with_context(|| format!("{:?} line {}", path, lineno))?;
    }
    if graph.get_nb_edge() != nbedge_announced {
        log::warn!(
            "{:?} announced {} edges, read {}",
            path,
            nbedge_announced,
            graph.get_nb_edge()
        );
    }
    log::info!(
        "read {:?}, nbvertex : {}, nbedge : {}, nbcenter : {}",
        path,
        graph.get_nb_vertex(),
        graph.get_nb_edge(),
        graph.get_nb_center()
    );
    Ok(graph)
} // end of read_instance

// vertices are numbered from 1 in files
fn parse_vertex(field: &str) -> anyhow::Result<usize> {
    let v: usize = field
        .parse()
        .with_context(|| format!("bad vertex {:?}", field))?;
    if v == 0 {
        return Err(anyhow!("vertices are numbered from 1, got 0"));
    }
    Ok(v - 1)
}

// number N of a name pmedN.ext
fn pmed_number(name: &str) -> Option<u64> {
    let rest = name.strip_prefix("pmed")?;
    let digits = match rest.find('.') {
        Some(dot) => &rest[..dot],
        None => rest,
    };
    digits.parse().ok()
}

// pmedN files first ordered by N, then all other names lexicographically
fn instance_key(name: &str) -> (bool, u64, &str) {
    match pmed_number(name) {
        Some(n) => (false, n, name),
        None => (true, 0, name),
    }
}

/// pmedN files come first ordered by N (then by name), other files follow in lexicographic order.
pub fn compare_instance_names(name1: &str, name2: &str) -> Ordering {
    instance_key(name1).cmp(&instance_key(name2))
}

/// lists regular files of directory in instance order
pub fn list_instances(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        log::error!("{:?} does not exist or is not a directory", dir);
        return Err(anyhow!("{:?} does not exist or is not a directory", dir));
    }
    let mut files = Vec::<PathBuf>::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        log::warn!("there are no files in {:?}", dir);
    }
    files.sort_by(|p1, p2| compare_instance_names(&file_name(p1), &file_name(p2)));
    Ok(files)
} // end of list_instances

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

//=====================================================================================

// end of mod tests
