//! Defines the structs returned for a completed route, and the logic which
//! itemises the cost of each leg. Values are held at full precision, they
//! are only rounded as they are serialized for the webapp

use serde::{Serialize, Serializer};

use crate::common::graph_data::EdgeData;
use crate::routing::cost::CostModel;

/// Cost breakdown for a single road segment within a route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    #[serde(serialize_with = "round_2dp")]
    pub distance_km: f64,
    #[serde(serialize_with = "round_2dp")]
    pub traffic_min: f64,
    #[serde(serialize_with = "round_2dp")]
    pub weather_min: f64,
    #[serde(serialize_with = "round_3dp")]
    pub risk: f64,
    #[serde(serialize_with = "round_2dp")]
    pub estimated_time_min: f64,
}

/// Totals across every leg of a route. risk_extra_time_min is the portion of
/// the estimated time which is caused purely by risk multipliers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    #[serde(serialize_with = "round_2dp")]
    pub total_distance_km: f64,
    #[serde(serialize_with = "round_2dp")]
    pub total_traffic_min: f64,
    #[serde(serialize_with = "round_2dp")]
    pub total_weather_min: f64,
    #[serde(serialize_with = "round_2dp")]
    pub risk_extra_time_min: f64,
    #[serde(serialize_with = "round_2dp")]
    pub estimated_total_time_min: f64,
    pub legs: Vec<Leg>,
}

/// The recommended path between two cities, start and end inclusive, along
/// with a breakdown of its cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub path: Vec<String>,
    pub breakdown: Breakdown,
}

impl Breakdown {
    /// Walk the provided segments in order, costing each one with the same
    /// model which was used to find them
    pub fn from_edges(costs: &CostModel, edges: &[&EdgeData]) -> Breakdown {
        let mut breakdown = Breakdown::default();
        let mut base_total = 0.0;

        for edge in edges {
            let estimated_time_min = costs.edge_cost_min(edge);

            base_total += costs.base_time_min(edge);
            breakdown.total_distance_km += edge.distance_km;
            breakdown.total_traffic_min += edge.traffic_min;
            breakdown.total_weather_min += edge.weather_min;
            breakdown.estimated_total_time_min += estimated_time_min;

            breakdown.legs.push(Leg {
                from: edge.src.clone(),
                to: edge.dst.clone(),
                distance_km: edge.distance_km,
                traffic_min: edge.traffic_min,
                weather_min: edge.weather_min,
                risk: edge.risk,
                estimated_time_min,
            });
        }

        breakdown.risk_extra_time_min = breakdown.estimated_total_time_min
            - (base_total
                + breakdown.total_traffic_min
                + breakdown.total_weather_min);

        breakdown
    }
}

impl RouteResult {
    /// Assemble the result for a route which begins at `start` and follows
    /// the provided segments. An empty list of segments is a route which
    /// never leaves the start city
    pub fn from_edges(
        costs: &CostModel,
        start: &str,
        edges: &[&EdgeData],
    ) -> RouteResult {
        let mut path = Vec::with_capacity(edges.len() + 1);
        path.push(start.to_string());
        path.extend(edges.iter().map(|edge| edge.dst.clone()));

        RouteResult {
            path,
            breakdown: Breakdown::from_edges(costs, edges),
        }
    }
}

fn round_to<S: Serializer>(
    value: f64,
    places: i32,
    s: S,
) -> Result<S::Ok, S::Error> {
    let factor = 10_f64.powi(places);
    s.serialize_f64((value * factor).round() / factor)
}

fn round_2dp<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    round_to(*value, 2, s)
}

fn round_3dp<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    round_to(*value, 3, s)
}

#[cfg(test)]
mod tests {

    use approx::assert_relative_eq;
    use serde_json::json;

    use super::*;
    use crate::common::graph_data::RoadAttrs;

    fn get_test_edges() -> Vec<EdgeData> {
        vec![
            RoadAttrs::new(100.0, 5.0, 0.0, 1.0).prepare("A", "B"),
            RoadAttrs::new(100.0, 0.0, 10.0, 1.2).prepare("B", "C"),
        ]
    }

    /// Check that each leg is costed individually and the totals line up
    #[test]
    fn test_from_edges() {
        let edges = get_test_edges();
        let erefs: Vec<&EdgeData> = edges.iter().collect();

        let result =
            RouteResult::from_edges(&CostModel::default(), "A", &erefs);

        assert_eq!(result.path, vec!["A", "B", "C"]);

        let breakdown = &result.breakdown;
        assert_eq!(breakdown.legs.len(), 2);
        assert_eq!(breakdown.legs[0].from, "A");
        assert_eq!(breakdown.legs[1].to, "C");
        let legs = &breakdown.legs;
        assert_relative_eq!(legs[0].estimated_time_min, 80.0, epsilon = 1e-9);
        assert_relative_eq!(legs[1].estimated_time_min, 102.0, epsilon = 1e-9);

        assert_relative_eq!(breakdown.total_distance_km, 200.0);
        assert_relative_eq!(breakdown.total_traffic_min, 5.0);
        assert_relative_eq!(breakdown.total_weather_min, 10.0);
        assert_relative_eq!(
            breakdown.estimated_total_time_min,
            182.0,
            epsilon = 1e-9
        );
        // 150 minutes of driving plus 15 of delays, the rest is risk
        assert_relative_eq!(
            breakdown.risk_extra_time_min,
            17.0,
            epsilon = 1e-9
        );
    }

    /// A route which never leaves the start has zero cost and no legs
    #[test]
    fn test_trivial_route() {
        let result = RouteResult::from_edges(&CostModel::default(), "A", &[]);

        assert_eq!(result.path, vec!["A"]);
        assert_eq!(result.breakdown, Breakdown::default());
        assert_eq!(result.breakdown.estimated_total_time_min, 0.0);
    }

    /// Field names must match what the webapp expects, and values should be
    /// rounded to 2 decimal places (3 for risk)
    #[test]
    fn test_serialize() {
        let edges = vec![
            RoadAttrs::new(70.0, 15.0, 0.0, 1.04).prepare("Hyderabad", "Medak"),
        ];
        let erefs: Vec<&EdgeData> = edges.iter().collect();

        let result =
            RouteResult::from_edges(&CostModel::default(), "Hyderabad", &erefs);
        let value = serde_json::to_value(&result).unwrap();

        // (52.5 + 15) * 1.04 = 70.2
        let target = json!({
            "path": ["Hyderabad", "Medak"],
            "breakdown": {
                "total_distance_km": 70.0,
                "total_traffic_min": 15.0,
                "total_weather_min": 0.0,
                "risk_extra_time_min": 2.7,
                "estimated_total_time_min": 70.2,
                "legs": [{
                    "from": "Hyderabad",
                    "to": "Medak",
                    "distance_km": 70.0,
                    "traffic_min": 15.0,
                    "weather_min": 0.0,
                    "risk": 1.04,
                    "estimated_time_min": 70.2
                }]
            }
        });

        assert_eq!(value, target);
    }
}
