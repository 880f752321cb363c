use foundation::{GeoRect, LatLon, path_length_m};

/// A planned path plus the search region the planner actually used.
///
/// `revision` is the session input revision the route was computed for; the
/// session compares it against its current revision to decide whether the
/// route is still current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    points: Vec<LatLon>,
    bounding_box: Option<GeoRect>,
    revision: u64,
}

impl Route {
    pub fn new(points: Vec<LatLon>, bounding_box: Option<GeoRect>, revision: u64) -> Self {
        Self {
            points,
            bounding_box,
            revision,
        }
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> Option<GeoRect> {
        self.bounding_box
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn length_m(&self) -> f64 {
        path_length_m(&self.points)
    }
}

/// How the stored route relates to the current session inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteStatus {
    /// No route has been planned.
    None,
    /// Planned for exactly the current markers, mode and planner settings.
    Current,
    /// Planned earlier; an input has changed since.
    Outdated,
}

#[cfg(test)]
mod tests {
    use super::Route;
    use foundation::{GeoRect, LatLon};

    #[test]
    fn default_route_is_empty() {
        let r = Route::default();
        assert!(r.is_empty());
        assert_eq!(r.bounding_box(), None);
        assert_eq!(r.length_m(), 0.0);
    }

    #[test]
    fn length_is_positive_for_real_path() {
        let r = Route::new(
            vec![LatLon::new(49.0, 24.0), LatLon::new(49.1, 24.1)],
            Some(GeoRect::new(48.8, 23.8, 49.3, 24.3)),
            3,
        );
        assert_eq!(r.len(), 2);
        assert_eq!(r.revision(), 3);
        assert!(r.length_m() > 10_000.0 && r.length_m() < 20_000.0);
    }
}
