use serde::{Deserialize, Serialize};

/// Planner algorithm choice.
///
/// The wire string is opaque to the client and forwarded verbatim.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Heuristic best-first search.
    #[default]
    #[serde(rename = "A-star")]
    AStar,
    /// Swarm-based heuristic search.
    #[serde(rename = "Ant colony")]
    AntColony,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::AStar, Algorithm::AntColony];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::AStar => "A-star",
            Algorithm::AntColony => "Ant colony",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl std::fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown algorithm '{}' (expected 'A-star' or 'Ant colony')",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl std::str::FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the wire names plus loose spellings such as `astar` or
    /// `ant-colony`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "astar" => Ok(Algorithm::AStar),
            "antcolony" => Ok(Algorithm::AntColony),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Widening factor applied around the markers to form the planner's search
/// region. Always finite and within `[MIN, MAX]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SearchMargin(f64);

impl SearchMargin {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 5.0;
    /// Slider increment.
    pub const STEP: f64 = 0.1;
    pub const DEFAULT: SearchMargin = SearchMargin(0.2);

    pub fn new(value: f64) -> Result<Self, MarginError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(MarginError(value));
        }
        Ok(SearchMargin(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Next slider position up, saturating at `MAX`.
    pub fn widened(self) -> Self {
        let next = ((self.0 + Self::STEP) * 10.0).round() / 10.0;
        SearchMargin(next.min(Self::MAX))
    }
}

impl Default for SearchMargin {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for SearchMargin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarginError(pub f64);

impl std::fmt::Display for MarginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "search margin {} outside [{}, {}]",
            self.0,
            SearchMargin::MIN,
            SearchMargin::MAX
        )
    }
}

impl std::error::Error for MarginError {}
