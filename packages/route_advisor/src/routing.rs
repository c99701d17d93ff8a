//! Route finding. Costs each road segment, searches the graph with A* and
//! itemises the cost of the route which is found.

pub mod astar;
pub mod breakdown;
pub mod cost;
pub mod frontier;
