//! Structs and helpers which are shared between the loading and routing
//! stages, along with the service configuration.

pub mod config;
pub mod geodesy;
pub mod graph_data;
pub mod road_graph;
