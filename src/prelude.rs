// inclusion facility

pub use crate::graph::*;

pub use crate::distances::*;

pub use crate::result::*;

pub use crate::cancel::*;

pub use crate::farthest::*;

pub use crate::branchbound::*;
