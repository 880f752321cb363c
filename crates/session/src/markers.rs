use foundation::LatLon;

/// Start and end of a route; nothing more is ever tracked.
pub const MAX_MARKERS: usize = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkerRole {
    Start,
    End,
}

impl MarkerRole {
    pub fn for_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(MarkerRole::Start),
            1 => Some(MarkerRole::End),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            MarkerRole::Start => 0,
            MarkerRole::End => 1,
        }
    }
}

/// Ordered route markers.
///
/// Roles are positional: the first marker is the start, the second the end.
/// Removing the start promotes the end marker to start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    points: Vec<LatLon>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= MAX_MARKERS
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn get(&self, role: MarkerRole) -> Option<LatLon> {
        self.points.get(role.index()).copied()
    }

    /// Both endpoints, when exactly two markers are placed.
    pub fn pair(&self) -> Option<(LatLon, LatLon)> {
        match self.points.as_slice() {
            [start, end] => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerRole, LatLon)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| MarkerRole::for_index(idx).map(|role| (role, *p)))
    }

    /// Appends a marker. Returns its role, or `None` when the set is full.
    pub fn push(&mut self, point: LatLon) -> Option<MarkerRole> {
        let role = MarkerRole::for_index(self.points.len())?;
        self.points.push(point);
        Some(role)
    }

    pub fn remove(&mut self, index: usize) -> Option<LatLon> {
        if index >= self.points.len() {
            return None;
        }
        Some(self.points.remove(index))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
