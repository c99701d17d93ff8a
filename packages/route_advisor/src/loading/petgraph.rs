use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::common::geodesy::city_distance_km;
use crate::common::graph_data::{CityData, EdgeData, RoadAttrs};
use crate::common::road_graph::{CityGraph, RoadGraph};
use crate::error::RouteError;

/// Collects cities and road segments in any order, then validates all of
/// them and generates a petgraph graph which can be used for route plotting.
/// Segments may reference cities which are added after them, endpoints are
/// only resolved in [`GraphBuilder::build`]
#[derive(Default)]
pub struct GraphBuilder {
    cities: Vec<CityData>,
    edges: Vec<EdgeData>,
}

impl GraphBuilder {
    pub fn new() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn add_city(&mut self, name: &str, lat: f64, lon: f64) -> &mut Self {
        self.cities.push(CityData {
            name: name.to_string(),
            lat,
            lon,
        });
        self
    }

    /// Add a single directed road segment from `src` to `dst`
    pub fn add_edge(
        &mut self,
        src: &str,
        dst: &str,
        attrs: RoadAttrs,
    ) -> &mut Self {
        self.edges.push(attrs.prepare(src, dst));
        self
    }

    /// Add the same segment in both directions
    pub fn add_road(
        &mut self,
        a: &str,
        b: &str,
        attrs: RoadAttrs,
    ) -> &mut Self {
        self.add_edge(a, b, attrs);
        self.add_edge(b, a, attrs)
    }

    /// Consume the builder, producing a RoadGraph if and only if every city
    /// and segment is valid. The first problem found is reported as an
    /// InvariantViolation
    pub fn build(self) -> Result<RoadGraph, RouteError> {
        let mut graph =
            CityGraph::with_capacity(self.cities.len(), self.edges.len());
        let mut index = FxHashMap::<String, NodeIndex>::default();

        for city in self.cities {
            validate_city(&city)?;
            if index.contains_key(&city.name) {
                return Err(RouteError::InvariantViolation(format!(
                    "city '{}' is defined more than once",
                    city.name
                )));
            }
            let name = city.name.clone();
            let inx = graph.add_node(city);
            index.insert(name, inx);
        }

        let mut min_risk = f64::INFINITY;
        let mut detour_floor: f64 = 1.0;

        for edge in self.edges {
            validate_edge(&edge)?;

            let src_inx = resolve_endpoint(&index, &edge, &edge.src)?;
            let dst_inx = resolve_endpoint(&index, &edge, &edge.dst)?;

            let straight_line =
                city_distance_km(&graph[src_inx], &graph[dst_inx]);
            if straight_line > 0.0 {
                detour_floor =
                    detour_floor.min(edge.distance_km / straight_line);
            }
            min_risk = min_risk.min(edge.risk);

            // Parallel segments are retained, the search picks the cheapest
            graph.add_edge(src_inx, dst_inx, edge);
        }

        if graph.edge_count() == 0 {
            min_risk = 1.0;
        }

        info!(
            cities = graph.node_count(),
            edges = graph.edge_count(),
            min_risk,
            detour_floor,
            "road network built"
        );

        Ok(RoadGraph {
            graph,
            index,
            min_risk,
            detour_floor,
        })
    }
}

fn resolve_endpoint(
    index: &FxHashMap<String, NodeIndex>,
    edge: &EdgeData,
    name: &str,
) -> Result<NodeIndex, RouteError> {
    index.get(name).copied().ok_or_else(|| {
        RouteError::InvariantViolation(format!(
            "segment {} -> {} references unknown city '{}'",
            edge.src, edge.dst, name
        ))
    })
}

fn validate_city(city: &CityData) -> Result<(), RouteError> {
    if city.name.is_empty() {
        return Err(RouteError::InvariantViolation(
            "city name must not be empty".to_string(),
        ));
    }

    let lat_ok = city.lat.is_finite() && (-90.0..=90.0).contains(&city.lat);
    let lon_ok = city.lon.is_finite() && (-180.0..=180.0).contains(&city.lon);
    if !(lat_ok && lon_ok) {
        return Err(RouteError::InvariantViolation(format!(
            "city '{}' has invalid coordinates ({}, {})",
            city.name, city.lat, city.lon
        )));
    }

    Ok(())
}

fn validate_edge(edge: &EdgeData) -> Result<(), RouteError> {
    let describe = |problem: &str| {
        RouteError::InvariantViolation(format!(
            "segment {} -> {} {}",
            edge.src, edge.dst, problem
        ))
    };

    if edge.src == edge.dst {
        return Err(describe("is a self loop"));
    }
    if !(edge.distance_km.is_finite() && edge.distance_km > 0.0) {
        return Err(describe("must have a positive distance"));
    }
    if !(edge.traffic_min.is_finite() && edge.traffic_min >= 0.0) {
        return Err(describe("has a negative traffic delay"));
    }
    if !(edge.weather_min.is_finite() && edge.weather_min >= 0.0) {
        return Err(describe("has a negative weather delay"));
    }
    if !(edge.risk.is_finite() && edge.risk > 0.0) {
        return Err(describe("must have a positive risk factor"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use approx::assert_relative_eq;

    use super::*;

    fn attrs() -> RoadAttrs {
        RoadAttrs::new(100.0, 0.0, 0.0, 1.0)
    }

    /// Builder with two valid cities, ready for a segment to be added
    fn get_test_builder() -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        builder.add_city("A", 17.0, 78.0).add_city("B", 17.5, 78.5);
        builder
    }

    /// Assert that building fails with an InvariantViolation whose message
    /// contains the provided fragment
    fn assert_violation(builder: GraphBuilder, fragment: &str) {
        match builder.build() {
            Err(RouteError::InvariantViolation(msg)) => {
                assert!(msg.contains(fragment), "unexpected message: {msg}")
            }
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
    }

    /// Roads are stored as a pair of directed segments
    #[test]
    fn test_add_road_both_directions() {
        let mut builder = get_test_builder();
        builder.add_road("A", "B", attrs());

        let graph = builder.build().unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors("A").unwrap()[0].0, "B");
        assert_eq!(graph.neighbors("B").unwrap()[0].0, "A");
    }

    /// Segments can be added before the cities they connect
    #[test]
    fn test_edges_before_cities() {
        let mut builder = GraphBuilder::new();
        builder
            .add_edge("A", "B", attrs())
            .add_city("B", 17.5, 78.5)
            .add_city("A", 17.0, 78.0);

        let graph = builder.build().unwrap();

        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_city() {
        let mut builder = get_test_builder();
        builder.add_city("A", 1.0, 1.0);
        assert_violation(builder, "more than once");
    }

    #[test]
    fn test_invalid_coordinates() {
        let mut builder = GraphBuilder::new();
        builder.add_city("A", 91.0, 0.0);
        assert_violation(builder, "invalid coordinates");

        let mut builder = GraphBuilder::new();
        builder.add_city("A", 0.0, f64::NAN);
        assert_violation(builder, "invalid coordinates");
    }

    #[test]
    fn test_dangling_endpoint() {
        let mut builder = get_test_builder();
        builder.add_edge("A", "Z", attrs());
        assert_violation(builder, "unknown city 'Z'");
    }

    #[test]
    fn test_self_loop() {
        let mut builder = get_test_builder();
        builder.add_edge("A", "A", attrs());
        assert_violation(builder, "self loop");
    }

    #[test]
    fn test_non_positive_distance() {
        let mut builder = get_test_builder();
        builder.add_edge("A", "B", RoadAttrs::new(0.0, 0.0, 0.0, 1.0));
        assert_violation(builder, "positive distance");

        let mut builder = get_test_builder();
        builder.add_edge("A", "B", RoadAttrs::new(-5.0, 0.0, 0.0, 1.0));
        assert_violation(builder, "positive distance");
    }

    #[test]
    fn test_negative_delays() {
        let mut builder = get_test_builder();
        builder.add_edge("A", "B", RoadAttrs::new(10.0, -1.0, 0.0, 1.0));
        assert_violation(builder, "traffic");

        let mut builder = get_test_builder();
        builder.add_edge("A", "B", RoadAttrs::new(10.0, 0.0, -1.0, 1.0));
        assert_violation(builder, "weather");
    }

    #[test]
    fn test_non_positive_risk() {
        let mut builder = get_test_builder();
        builder.add_edge("A", "B", RoadAttrs::new(10.0, 0.0, 0.0, 0.0));
        assert_violation(builder, "risk");

        let mut builder = get_test_builder();
        builder.add_edge("A", "B", RoadAttrs::new(10.0, 0.0, 0.0, -1.2));
        assert_violation(builder, "risk");
    }

    /// Minimum risk is tracked across all segments, and defaults to neutral
    /// when there are none
    #[test]
    fn test_min_risk() {
        let mut builder = get_test_builder();
        builder
            .add_edge("A", "B", RoadAttrs::new(100.0, 0.0, 0.0, 1.3))
            .add_edge("B", "A", RoadAttrs::new(100.0, 0.0, 0.0, 1.02));
        assert_eq!(builder.build().unwrap().min_risk(), 1.02);

        assert_eq!(get_test_builder().build().unwrap().min_risk(), 1.0);
    }

    /// A road which is shorter than the straight line between its endpoints
    /// pulls the detour floor below 1.0, longer roads leave it alone
    #[test]
    fn test_detour_floor() {
        let straight_line = city_distance_km(
            &CityData {
                name: "A".to_string(),
                lat: 17.0,
                lon: 78.0,
            },
            &CityData {
                name: "B".to_string(),
                lat: 17.5,
                lon: 78.5,
            },
        );

        let mut builder = get_test_builder();
        let longer = RoadAttrs::new(straight_line * 2.0, 0.0, 0.0, 1.0);
        builder.add_road("A", "B", longer);
        assert_eq!(builder.build().unwrap().detour_floor(), 1.0);

        let mut builder = get_test_builder();
        let shorter = RoadAttrs::new(straight_line / 2.0, 0.0, 0.0, 1.0);
        builder.add_road("A", "B", shorter);
        assert_relative_eq!(builder.build().unwrap().detour_floor(), 0.5);
    }
}
