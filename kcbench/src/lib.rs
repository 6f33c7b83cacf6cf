//! Reading of k-center instances, deadline driven runs of the solvers and csv reports.

pub mod io;
pub mod report;
pub mod tester;
