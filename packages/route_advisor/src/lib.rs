pub mod api;
pub mod common;
pub mod error;
pub mod loading;
pub mod routing;

pub use common::road_graph::RoadGraph;
pub use error::RouteError;
pub use routing::astar::find_route;
pub use routing::breakdown::{Breakdown, Leg, RouteResult};
pub use routing::cost::CostModel;
