use crate::geo::LatLon;

/// Axis-aligned geographic rectangle in degrees.
///
/// Edges are inclusive. Comparisons against NaN are always false, so a
/// non-finite coordinate is never contained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoRect {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoRect {
    /// Region served by the planner (mainland Ukraine).
    pub const SERVICE_REGION: GeoRect = GeoRect::new(44.38, 22.14, 52.38, 40.23);

    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        GeoRect {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest rectangle covering every point, or `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = LatLon>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = GeoRect::new(first.lat, first.lon, first.lat, first.lon);
        for p in iter {
            rect.south = rect.south.min(p.lat);
            rect.north = rect.north.max(p.lat);
            rect.west = rect.west.min(p.lon);
            rect.east = rect.east.max(p.lon);
        }
        Some(rect)
    }

    pub fn contains_lat(&self, lat: f64) -> bool {
        lat >= self.south && lat <= self.north
    }

    pub fn contains_lon(&self, lon: f64) -> bool {
        lon >= self.west && lon <= self.east
    }

    pub fn contains(&self, p: LatLon) -> bool {
        self.contains_lat(p.lat) && self.contains_lon(p.lon)
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Grows the rectangle by `margin_deg` on every side.
    pub fn expand(&self, margin_deg: f64) -> Self {
        GeoRect::new(
            self.south - margin_deg,
            self.west - margin_deg,
            self.north + margin_deg,
            self.east + margin_deg,
        )
    }

    /// Corners in `[south-west, north-east]` order.
    pub fn corners(&self) -> [LatLon; 2] {
        [
            LatLon::new(self.south, self.west),
            LatLon::new(self.north, self.east),
        ]
    }

    /// Geocoder `viewbox` parameter: `west,north,east,south`.
    pub fn viewbox(&self) -> String {
        format!("{},{},{},{}", self.west, self.north, self.east, self.south)
    }
}
