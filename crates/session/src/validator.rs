use foundation::{GeoRect, LatLon};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Latitude => "Latitude",
            Axis::Longitude => "Longitude",
        }
    }
}

/// A coordinate fell outside the service region on `axis`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ValidationError {
    pub axis: Axis,
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} must be between {} and {} (Ukraine territory).",
            self.axis.name(),
            self.min,
            self.max
        )
    }
}

impl std::error::Error for ValidationError {}

/// Accepts coordinates inside a fixed rectangle.
///
/// Latitude is checked before longitude, so a point that is out of range on
/// both axes always reports [`Axis::Latitude`]. The validator never touches
/// shared state; callers decide whether to surface the error.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordinateValidator {
    region: GeoRect,
}

impl Default for CoordinateValidator {
    fn default() -> Self {
        Self {
            region: GeoRect::SERVICE_REGION,
        }
    }
}

impl CoordinateValidator {
    pub fn new(region: GeoRect) -> Self {
        Self { region }
    }

    pub fn region(&self) -> GeoRect {
        self.region
    }

    pub fn validate(&self, lat: f64, lon: f64) -> Result<LatLon, ValidationError> {
        if !lat.is_finite() || !self.region.contains_lat(lat) {
            return Err(ValidationError {
                axis: Axis::Latitude,
                min: self.region.south,
                max: self.region.north,
            });
        }
        if !lon.is_finite() || !self.region.contains_lon(lon) {
            return Err(ValidationError {
                axis: Axis::Longitude,
                min: self.region.west,
                max: self.region.east,
            });
        }
        Ok(LatLon::new(lat, lon))
    }

    pub fn validate_point(&self, p: LatLon) -> Result<LatLon, ValidationError> {
        self.validate(p.lat, p.lon)
    }

    /// Validates free-form text fields. Text that does not parse as a number
    /// is treated as non-finite and fails on its axis.
    pub fn validate_text(&self, lat: &str, lon: &str) -> Result<LatLon, ValidationError> {
        self.validate(parse_degrees(lat), parse_degrees(lon))
    }
}

/// Validates against [`GeoRect::SERVICE_REGION`].
pub fn validate(lat: f64, lon: f64) -> Result<LatLon, ValidationError> {
    CoordinateValidator::default().validate(lat, lon)
}

fn parse_degrees(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}
