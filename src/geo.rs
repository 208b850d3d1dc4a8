//! Geofence geometry: positions, the circular zone, and distance metrics.
//!
//! The zone radius is expressed in whatever unit the configured
//! [`DistanceMetric`] returns:
//!
//! | Metric      | Unit                   | Notes                                  |
//! |-------------|------------------------|----------------------------------------|
//! | `Planar`    | raw degrees            | Euclidean on (lat, lon); not geodesic  |
//! | `Haversine` | metres                 | great-circle on a 6 371 km sphere      |
//!
//! `Planar` is the deployed default.  It treats a degree of longitude as
//! equal to a degree of latitude, so the zone is only circular near the
//! equator and only for small radii.  This is a known modelling limitation;
//! switching to `Haversine` (with a radius in metres) fixes it without
//! touching the alarm state machine.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine metric (metres).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// One reported position fix, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both coordinates finite and within ±90° / ±180°.
    ///
    /// The controller assumes well-formed input; position sources use this
    /// to drop bad fixes before they reach it.
    pub fn is_well_formed(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Distance metric
// ---------------------------------------------------------------------------

/// Strategy used to measure the distance between a fix and the zone centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `sqrt(dlat² + dlon²)` on raw degrees.
    #[default]
    Planar,
    /// Great-circle distance in metres.
    Haversine,
}

impl DistanceMetric {
    pub fn distance(self, a: Position, b: Position) -> f64 {
        match self {
            Self::Planar => planar_distance(a, b),
            Self::Haversine => haversine_distance(a, b),
        }
    }

    /// Human-readable unit of [`distance`](Self::distance) results.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Planar => "deg",
            Self::Haversine => "m",
        }
    }
}

/// Euclidean distance on raw latitude/longitude differences (degrees).
pub fn planar_distance(a: Position, b: Position) -> f64 {
    let dx = a.latitude - b.latitude;
    let dy = a.longitude - b.longitude;
    (dx * dx + dy * dy).sqrt()
}

/// Great-circle distance in metres.
pub fn haversine_distance(a: Position, b: Position) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// Circular geofence.  Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub center: Position,
    /// Radius in the unit of the metric the zone is evaluated with.
    pub radius: f64,
}

impl Zone {
    pub const fn new(center: Position, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Distance from `position` to the centre under `metric`.
    pub fn distance_to(&self, position: Position, metric: DistanceMetric) -> f64 {
        metric.distance(position, self.center)
    }

    /// Boundary counts as inside (`dist <= radius`).
    pub fn contains(&self, position: Position, metric: DistanceMetric) -> bool {
        self.distance_to(position, metric) <= self.radius
    }
}
