//! The read-only road network which every search runs against. A RoadGraph
//! can only be obtained from [`GraphBuilder`], which guarantees that all of
//! its invariants hold. Nothing mutates it afterwards, so a single instance
//! can be shared between any number of concurrent searches without locking.
//!
//! [`GraphBuilder`]: crate::loading::petgraph::GraphBuilder

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Graph};
use rustc_hash::FxHashMap;

use crate::common::graph_data::{CityData, EdgeData};
use crate::error::RouteError;

/// Underlying petgraph representation, nodes are cities and edges are
/// directed road segments
pub type CityGraph = Graph<CityData, EdgeData, Directed, u32>;

#[derive(Debug)]
pub struct RoadGraph {
    pub(crate) graph: CityGraph,
    pub(crate) index: FxHashMap<String, NodeIndex>,
    pub(crate) min_risk: f64,
    pub(crate) detour_floor: f64,
}

impl RoadGraph {
    /// Check whether a city with the provided name exists in the network
    pub fn contains(&self, city: &str) -> bool {
        self.index.contains_key(city)
    }

    /// Fetch the index of the provided city within the underlying graph
    pub fn node_index(&self, city: &str) -> Result<NodeIndex, RouteError> {
        self.index
            .get(city)
            .copied()
            .ok_or_else(|| RouteError::unknown_city(city))
    }

    /// Retrieve all cities which can be reached directly from the provided
    /// city, along with the road segment which leads to each of them. Where
    /// parallel segments exist, each of them is returned
    pub fn neighbors(
        &self,
        city: &str,
    ) -> Result<Vec<(&str, &EdgeData)>, RouteError> {
        let inx = self.node_index(city)?;

        let neighbors = self
            .graph
            .edges(inx)
            .map(|eref| {
                (self.graph[eref.target()].name.as_str(), eref.weight())
            })
            .collect();

        Ok(neighbors)
    }

    /// Latitude and longitude of the provided city, in degrees
    pub fn coordinates(&self, city: &str) -> Result<(f64, f64), RouteError> {
        let inx = self.node_index(city)?;
        let data = &self.graph[inx];
        Ok((data.lat, data.lon))
    }

    /// Names of every city in the network, sorted alphabetically
    pub fn city_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.graph.node_weights().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn cities(&self) -> impl Iterator<Item = &CityData> {
        self.graph.node_weights()
    }

    pub fn city_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Smallest risk multiplier present on any road segment. Any heuristic
    /// which scales travel time by a risk factor must not exceed this value
    pub fn min_risk(&self) -> f64 {
        self.min_risk
    }

    /// Smallest ratio of road length to straight-line distance across all
    /// road segments, capped at 1.0. Scaling great-circle distances by this
    /// factor can never exceed the length of a real road
    pub fn detour_floor(&self) -> f64 {
        self.detour_floor
    }

    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }
}
