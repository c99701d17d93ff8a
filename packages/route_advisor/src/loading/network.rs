//! Reading road networks from JSON. The file layout maps each city name to
//! its coordinates, and each city name to the cities reachable from it along
//! with the attributes of that segment:
//!
//! ```json
//! {
//!   "cities": {"Hyderabad": {"lat": 17.385, "lon": 78.4867}, ...},
//!   "graph": {"Hyderabad": {"Medak": {"distance_km": 70, "traffic_min": 15,
//!                                     "weather_min": 0, "risk": 1.03}}, ...}
//! }
//! ```
//!
//! Segments are directed, a two-way road must be listed under both of its
//! endpoints.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::common::graph_data::{Coordinates, RoadAttrs};
use crate::common::road_graph::RoadGraph;
use crate::error::RouteError;
use crate::loading::petgraph::GraphBuilder;

/// Mock dataset covering ten cities in Telangana. Distances are rough
/// driving distances, delays and risks are illustrative only
const TELANGANA: &str = include_str!("telangana.json");

/// Container for the raw contents of a network file. Ordered maps keep
/// graph construction, and therefore tie-breaking during search, stable
/// from one load to the next
#[derive(Deserialize, Debug)]
pub struct NetworkFile {
    pub cities: BTreeMap<String, Coordinates>,
    #[serde(default)]
    pub graph: BTreeMap<String, BTreeMap<String, RoadAttrs>>,
}

impl NetworkFile {
    pub fn from_json(contents: &str) -> Result<NetworkFile, RouteError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_path(path: &Path) -> Result<NetworkFile, RouteError> {
        let contents = fs::read_to_string(path)?;
        NetworkFile::from_json(&contents)
    }

    /// Validate the file contents and generate a RoadGraph from them
    pub fn into_graph(self) -> Result<RoadGraph, RouteError> {
        let mut builder = GraphBuilder::new();

        for (name, coords) in self.cities.iter() {
            builder.add_city(name, coords.lat, coords.lon);
        }

        for (src, targets) in self.graph.iter() {
            for (dst, attrs) in targets.iter() {
                builder.add_edge(src, dst, *attrs);
            }
        }

        builder.build()
    }
}

/// Build the bundled Telangana network
pub fn load_builtin() -> Result<RoadGraph, RouteError> {
    NetworkFile::from_json(TELANGANA)?.into_graph()
}

/// Build the network stored at the provided path, falling back to the
/// bundled dataset if no path is given
pub fn load_network(path: Option<&Path>) -> Result<RoadGraph, RouteError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading road network from file");
            NetworkFile::from_path(path)?.into_graph()
        }
        None => {
            info!("loading bundled Telangana road network");
            load_builtin()
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    /// The bundled dataset must pass validation in full
    #[test]
    fn test_load_builtin() {
        let graph = load_builtin().unwrap();

        assert_eq!(graph.city_count(), 10);
        assert_eq!(graph.edge_count(), 37);
        assert!(graph.contains("Hyderabad"));
        assert_eq!(graph.coordinates("Warangal").unwrap(), (17.9689, 79.5941));
        assert_eq!(graph.min_risk(), 1.02);
        // Suryapet -> Warangal is shorter by road than in a straight line
        assert!(graph.detour_floor() < 1.0);
    }

    /// Each direction of a road carries its own attributes
    #[test]
    fn test_directed_attributes() {
        let graph = load_builtin().unwrap();

        let to_medak = graph
            .neighbors("Hyderabad")
            .unwrap()
            .into_iter()
            .find(|(name, _)| *name == "Medak")
            .map(|(_, edge)| edge.traffic_min);
        let from_medak = graph
            .neighbors("Medak")
            .unwrap()
            .into_iter()
            .find(|(name, _)| *name == "Hyderabad")
            .map(|(_, edge)| edge.traffic_min);

        assert_eq!(to_medak, Some(15.0));
        assert_eq!(from_medak, Some(12.0));
    }

    /// Omitted delays default to zero and omitted risk to 1.0
    #[test]
    fn test_attribute_defaults() {
        let contents = r#"{
            "cities": {
                "A": {"lat": 1.0, "lon": 1.0},
                "B": {"lat": 1.5, "lon": 1.5}
            },
            "graph": {"A": {"B": {"distance_km": 90}}}
        }"#;

        let graph = NetworkFile::from_json(contents)
            .unwrap()
            .into_graph()
            .unwrap();
        let (_, edge) = graph.neighbors("A").unwrap()[0];

        assert_eq!(edge.distance_km, 90.0);
        assert_eq!(edge.traffic_min, 0.0);
        assert_eq!(edge.weather_min, 0.0);
        assert_eq!(edge.risk, 1.0);
    }

    /// A segment pointing at a city with no coordinates must be rejected
    #[test]
    fn test_dangling_segment_rejected() {
        let contents = r#"{
            "cities": {"A": {"lat": 1.0, "lon": 1.0}},
            "graph": {"A": {"B": {"distance_km": 90}}}
        }"#;

        let result = NetworkFile::from_json(contents).unwrap().into_graph();

        assert!(matches!(result, Err(RouteError::InvariantViolation(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = NetworkFile::from_json("{\"cities\": [}");
        assert!(matches!(result, Err(RouteError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_network(Some(Path::new("/definitely/not/here.json")));
        assert!(matches!(result, Err(RouteError::Io(_))));
    }
}
