use serde::{Deserialize, Serialize};

/// WGS84 position in degrees.
///
/// On the wire this is always a two-element array `[lat, lon]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<[f64; 2]> for LatLon {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(p: LatLon) -> Self {
        [p.lat, p.lon]
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::LatLon;

    #[test]
    fn serializes_as_lat_lon_array() {
        let p = LatLon::new(49.5, 24.25);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[49.5,24.25]");

        let back: LatLon = serde_json::from_str("[50.0,30.5]").unwrap();
        assert_eq!(back, LatLon::new(50.0, 30.5));
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(serde_json::from_str::<LatLon>("[50.0]").is_err());
        assert!(serde_json::from_str::<LatLon>("[50.0,30.0,1.0]").is_err());
    }

    #[test]
    fn display_uses_five_decimals() {
        assert_eq!(LatLon::new(49.0, 24.123456).to_string(), "(49.00000, 24.12346)");
    }
}
