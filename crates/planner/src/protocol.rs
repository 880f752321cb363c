//! JSON wire format of the planning service.
//!
//! Endpoints:
//! - `POST /route`: [`RouteRequest`] → [`RouteResponse`]
//! - `POST /obstacles`: [`ObstaclesRequest`] → [`ObstaclesResponse`]
//! - `GET /get-obstacles`: → [`AdminObstacles`]
//! - `POST /confirm-obstacles`: [`ConfirmObstaclesRequest`]
//! - `POST /delete-obstacle`: [`DeleteObstacleRequest`]
//!
//! Points are `[lat, lon]` arrays throughout.

use foundation::{GeoRect, LatLon, ObstacleId};
use serde::{Deserialize, Serialize};
use session::{Algorithm, ModeratedObstacle, Obstacle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: LatLon,
    pub end: LatLon,
    pub margin: f64,
    pub algorithm: Algorithm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Empty when the planner found no path inside the search region.
    #[serde(default)]
    pub route: Vec<LatLon>,
    #[serde(default)]
    pub bounding_box: Option<WireBoundingBox>,
}

/// Search region as reported by the planner.
///
/// Accepted as a list of `[lat, lon]` corners, as the four numbers
/// `[north, south, east, west]`, or as an object with those keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireBoundingBox {
    Corners(Vec<LatLon>),
    Edges([f64; 4]),
    Named {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },
}

impl WireBoundingBox {
    pub fn to_rect(&self) -> Option<GeoRect> {
        match self {
            WireBoundingBox::Corners(points) => GeoRect::from_points(points.iter().copied()),
            WireBoundingBox::Edges([north, south, east, west])
            | WireBoundingBox::Named {
                north,
                south,
                east,
                west,
            } => Some(GeoRect::new(*south, *west, *north, *east)),
        }
    }
}

/// Body of `POST /obstacles`. Without `obstacles` it only fetches the
/// current set (`{}` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstaclesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacles: Option<Vec<LatLon>>,
}

impl ObstaclesRequest {
    pub fn fetch() -> Self {
        Self { obstacles: None }
    }

    pub fn save(obstacles: Vec<LatLon>) -> Self {
        Self {
            obstacles: Some(obstacles),
        }
    }
}

/// An obstacle entry: a bare point or an identified one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireObstacle {
    Point(LatLon),
    Identified(ModeratedObstacle),
}

impl From<WireObstacle> for Obstacle {
    fn from(wire: WireObstacle) -> Self {
        match wire {
            WireObstacle::Point(p) => Obstacle::drawn(p),
            WireObstacle::Identified(o) => Obstacle::persisted(o.id, o.position()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstaclesResponse {
    #[serde(default)]
    pub obstacles: Vec<WireObstacle>,
}

impl ObstaclesResponse {
    pub fn into_obstacles(self) -> Vec<Obstacle> {
        self.obstacles.into_iter().map(Obstacle::from).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminObstacles {
    #[serde(default)]
    pub confirmed: Vec<ModeratedObstacle>,
    #[serde(default)]
    pub unconfirmed: Vec<ModeratedObstacle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmObstaclesRequest {
    pub confirmed_ids: Vec<ObstacleId>,
    pub all_ids: Vec<ObstacleId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeleteObstacleRequest {
    pub node_id: ObstacleId,
}

/// One Nominatim search result. Coordinates arrive as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl GeocodeHit {
    pub fn position(&self) -> Option<LatLon> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        let p = LatLon::new(lat, lon);
        p.is_finite().then_some(p)
    }
}
