use foundation::{LatLon, ObstacleId};

/// A reported blockage.
///
/// Obstacles drawn on the map have no id until the service has persisted
/// them; after a save the server's list replaces the local one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Obstacle {
    pub position: LatLon,
    pub id: Option<ObstacleId>,
}

impl Obstacle {
    pub fn drawn(position: LatLon) -> Self {
        Self { position, id: None }
    }

    pub fn persisted(id: ObstacleId, position: LatLon) -> Self {
        Self {
            position,
            id: Some(id),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
