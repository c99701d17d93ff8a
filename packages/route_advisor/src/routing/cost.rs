//! Route cost model. Every road segment is costed in minutes: free-flow
//! travel time at a fixed average speed, plus traffic and weather delays,
//! all scaled by the segment's risk factor. The same functions are used to
//! drive the search and to report the breakdown of a finished route.

use tracing::debug;

use crate::common::geodesy::great_circle_km;
use crate::common::graph_data::{CityData, EdgeData};
use crate::common::road_graph::RoadGraph;
use crate::error::RouteError;

/// Average free-flow speed across the network
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 80.0;

/// Typical risk across the network, used to scale the search heuristic.
/// Never used as-is if any road in the graph carries a lower risk
pub const DEFAULT_AVERAGE_RISK: f64 = 1.05;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Parameters used to cost every segment. Only obtainable through
/// [`CostModel::new`] or the defaults, so both values are always positive
/// and finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    average_speed_kmh: f64,
    average_risk: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            average_risk: DEFAULT_AVERAGE_RISK,
        }
    }
}

impl CostModel {
    pub fn new(
        average_speed_kmh: f64,
        average_risk: f64,
    ) -> Result<CostModel, RouteError> {
        if !(average_speed_kmh.is_finite() && average_speed_kmh > 0.0) {
            return Err(RouteError::InvariantViolation(format!(
                "average speed must be positive, got {average_speed_kmh}"
            )));
        }
        if !(average_risk.is_finite() && average_risk > 0.0) {
            return Err(RouteError::InvariantViolation(format!(
                "average risk must be positive, got {average_risk}"
            )));
        }

        Ok(CostModel {
            average_speed_kmh,
            average_risk,
        })
    }

    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    pub fn average_risk(&self) -> f64 {
        self.average_risk
    }

    /// Minutes taken to cover the provided distance at the average speed
    pub fn travel_time_min(&self, distance_km: f64) -> f64 {
        distance_km / self.average_speed_kmh * MINUTES_PER_HOUR
    }

    /// Free-flow time along a segment, ignoring delays and risk
    pub fn base_time_min(&self, edge: &EdgeData) -> f64 {
        self.travel_time_min(edge.distance_km)
    }

    /// Free-flow time along a segment plus its traffic and weather delays
    pub fn raw_time_min(&self, edge: &EdgeData) -> f64 {
        self.base_time_min(edge) + edge.traffic_min + edge.weather_min
    }

    /// Full cost of traversing a segment, this is the value which is
    /// accumulated during search and reported against each leg
    pub fn edge_cost_min(&self, edge: &EdgeData) -> f64 {
        self.raw_time_min(edge) * edge.risk
    }

    /// Risk factor which the heuristic applies for the provided graph. The
    /// configured average is only used if no road carries a lower risk,
    /// otherwise the heuristic could overestimate and lose optimality
    pub fn heuristic_risk(&self, graph: &RoadGraph) -> f64 {
        self.average_risk.min(graph.min_risk())
    }

    /// Check whether the configured average risk has to be lowered to keep
    /// the heuristic admissible on the provided graph
    pub fn is_risk_clamped(&self, graph: &RoadGraph) -> bool {
        self.average_risk > graph.min_risk()
    }
}

/// Lower bound on the remaining cost from any city to a fixed goal. The
/// straight-line distance is scaled down by the graph's detour floor so it
/// never exceeds a real road length, and converted to minutes using the
/// lowest risk present in the graph. Together this keeps the estimate
/// consistent: h(u) <= edge_cost(u, v) + h(v) for every segment
#[derive(Debug, Clone, Copy)]
pub struct Heuristic {
    goal: (f64, f64),
    min_per_km: f64,
}

impl Heuristic {
    pub fn new(
        graph: &RoadGraph,
        costs: &CostModel,
        goal: &str,
    ) -> Result<Heuristic, RouteError> {
        let goal = graph.coordinates(goal)?;

        if costs.is_risk_clamped(graph) {
            debug!(
                configured = costs.average_risk,
                used = graph.min_risk(),
                "heuristic risk lowered to network minimum"
            );
        }

        let min_per_km = costs.travel_time_min(1.0)
            * graph.detour_floor()
            * costs.heuristic_risk(graph);

        Ok(Heuristic { goal, min_per_km })
    }

    /// Estimated minutes from the provided city to the goal
    pub fn estimate(&self, city: &CityData) -> f64 {
        great_circle_km((city.lat, city.lon), self.goal) * self.min_per_km
    }

    /// Estimated minutes from the named city to the goal
    pub fn estimate_for(
        &self,
        graph: &RoadGraph,
        city: &str,
    ) -> Result<f64, RouteError> {
        let coords = graph.coordinates(city)?;
        Ok(great_circle_km(coords, self.goal) * self.min_per_km)
    }
}
