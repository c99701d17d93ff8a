//! Weights stored against the nodes and edges of the petgraph graph which
//! backs a [`RoadGraph`](crate::common::road_graph::RoadGraph)

use serde::{Deserialize, Serialize};

/// A named location in the road network. Cities are never modified once the
/// graph has been built
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CityData {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Latitude & longitude of a city, in degrees. This is the shape in which
/// coordinates are read from network files and returned for map rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Attributes of a single directed road segment, as supplied by whichever
/// collaborator is loading the network. Delays default to zero and risk
/// defaults to a neutral multiplier when omitted
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RoadAttrs {
    pub distance_km: f64,
    #[serde(default)]
    pub traffic_min: f64,
    #[serde(default)]
    pub weather_min: f64,
    #[serde(default = "neutral_risk")]
    pub risk: f64,
}

fn neutral_risk() -> f64 {
    1.0
}

impl RoadAttrs {
    pub fn new(
        distance_km: f64,
        traffic_min: f64,
        weather_min: f64,
        risk: f64,
    ) -> RoadAttrs {
        RoadAttrs {
            distance_km,
            traffic_min,
            weather_min,
            risk,
        }
    }

    /// Attach the endpoints of the segment, generating the weight which will
    /// be stored in the graph
    pub fn prepare(self, src: &str, dst: &str) -> EdgeData {
        EdgeData {
            src: src.to_string(),
            dst: dst.to_string(),
            distance_km: self.distance_km,
            traffic_min: self.traffic_min,
            weather_min: self.weather_min,
            risk: self.risk,
        }
    }
}

/// Container for edge metadata which will be stored in the graph. Traffic
/// and weather are additive delays in minutes, risk multiplies the travel
/// time of the whole segment
#[derive(Default, Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub src: String,
    pub dst: String,
    pub distance_km: f64,
    pub traffic_min: f64,
    pub weather_min: f64,
    pub risk: f64,
}
