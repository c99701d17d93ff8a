//! Great-circle helpers. Both graph validation and the search heuristic go
//! through [`great_circle_km`], so the two can never disagree about how far
//! apart two cities are.

use geo::{Distance, Haversine, Point};

use crate::common::graph_data::CityData;

/// Haversine distance between two (lat, lon) pairs, in kilometres
pub fn great_circle_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let from_point: Point = (from.1, from.0).into();
    let to_point: Point = (to.1, to.0).into();

    Haversine::distance(from_point, to_point) / 1000.0
}

/// Haversine distance between two cities, in kilometres
pub fn city_distance_km(from: &CityData, to: &CityData) -> f64 {
    great_circle_km((from.lat, from.lon), (to.lat, to.lon))
}
