//! This module focuses on reading a road network from its JSON
//! representation and using it to generate a petgraph graph object.

pub mod network;
pub mod petgraph;
