use foundation::{LatLon, ObstacleId};
use serde::{Deserialize, Serialize};

/// Obstacle as listed for moderators.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratedObstacle {
    pub id: ObstacleId,
    pub lat: f64,
    pub lon: f64,
}

impl ModeratedObstacle {
    pub fn new(id: ObstacleId, position: LatLon) -> Self {
        Self {
            id,
            lat: position.lat,
            lon: position.lon,
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Partition {
    Confirmed,
    Unconfirmed,
}

impl Partition {
    pub fn other(self) -> Self {
        match self {
            Partition::Confirmed => Partition::Unconfirmed,
            Partition::Unconfirmed => Partition::Confirmed,
        }
    }
}

/// Confirmed and unconfirmed obstacles: two disjoint partitions of one id
/// space.
///
/// Toggling moves an obstacle to the end of the other partition and never
/// changes the total count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModerationBoard {
    confirmed: Vec<ModeratedObstacle>,
    unconfirmed: Vec<ModeratedObstacle>,
}

impl ModerationBoard {
    /// Builds a board from server lists. An id listed as both confirmed and
    /// unconfirmed is kept as confirmed only.
    pub fn new(confirmed: Vec<ModeratedObstacle>, unconfirmed: Vec<ModeratedObstacle>) -> Self {
        let unconfirmed = unconfirmed
            .into_iter()
            .filter(|u| !confirmed.iter().any(|c| c.id == u.id))
            .collect();
        Self {
            confirmed,
            unconfirmed,
        }
    }

    pub fn confirmed(&self) -> &[ModeratedObstacle] {
        &self.confirmed
    }

    pub fn unconfirmed(&self) -> &[ModeratedObstacle] {
        &self.unconfirmed
    }

    pub fn len(&self) -> usize {
        self.confirmed.len() + self.unconfirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.confirmed.clear();
        self.unconfirmed.clear();
    }

    pub fn partition_of(&self, id: ObstacleId) -> Option<Partition> {
        if self.confirmed.iter().any(|o| o.id == id) {
            Some(Partition::Confirmed)
        } else if self.unconfirmed.iter().any(|o| o.id == id) {
            Some(Partition::Unconfirmed)
        } else {
            None
        }
    }

    /// Moves `id` into the other partition. Returns the partition it now
    /// belongs to, or `None` for an unknown id.
    pub fn toggle(&mut self, id: ObstacleId) -> Option<Partition> {
        let from = self.partition_of(id)?;
        let (src, dst) = match from {
            Partition::Confirmed => (&mut self.confirmed, &mut self.unconfirmed),
            Partition::Unconfirmed => (&mut self.unconfirmed, &mut self.confirmed),
        };
        let pos = src.iter().position(|o| o.id == id)?;
        let obstacle = src.remove(pos);
        dst.push(obstacle);
        Some(from.other())
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<ModeratedObstacle> {
        if let Some(pos) = self.confirmed.iter().position(|o| o.id == id) {
            return Some(self.confirmed.remove(pos));
        }
        let pos = self.unconfirmed.iter().position(|o| o.id == id)?;
        Some(self.unconfirmed.remove(pos))
    }

    pub fn confirmed_ids(&self) -> Vec<ObstacleId> {
        self.confirmed.iter().map(|o| o.id).collect()
    }

    /// Every known id, confirmed first.
    pub fn all_ids(&self) -> Vec<ObstacleId> {
        self.confirmed
            .iter()
            .chain(self.unconfirmed.iter())
            .map(|o| o.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ModeratedObstacle, ModerationBoard, Partition};
    use foundation::{LatLon, ObstacleId};
    use pretty_assertions::assert_eq;

    fn obs(id: u64) -> ModeratedObstacle {
        ModeratedObstacle::new(ObstacleId(id), LatLon::new(49.0 + id as f64 * 0.01, 24.0))
    }

    fn board() -> ModerationBoard {
        ModerationBoard::new(vec![obs(1), obs(2), obs(3)], vec![obs(7), obs(9)])
    }

    #[test]
    fn toggle_preserves_total() {
        let mut b = board();
        for id in [7, 1, 9, 7, 2, 3, 1] {
            let before = b.len();
            assert!(b.toggle(ObstacleId(id)).is_some());
            assert_eq!(b.len(), before);
        }
    }

    #[test]
    fn toggle_moves_to_end_of_other_partition() {
        let mut b = board();
        assert_eq!(b.toggle(ObstacleId(7)), Some(Partition::Confirmed));
        assert_eq!(
            b.confirmed_ids(),
            vec![ObstacleId(1), ObstacleId(2), ObstacleId(3), ObstacleId(7)]
        );
        assert_eq!(b.unconfirmed().len(), 1);

        assert_eq!(b.toggle(ObstacleId(7)), Some(Partition::Unconfirmed));
        assert_eq!(b.partition_of(ObstacleId(7)), Some(Partition::Unconfirmed));
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let mut b = board();
        let before = b.clone();
        assert_eq!(b.toggle(ObstacleId(42)), None);
        assert_eq!(b, before);
    }

    #[test]
    fn remove_from_either_partition() {
        let mut b = board();
        assert_eq!(b.remove(ObstacleId(2)), Some(obs(2)));
        assert_eq!(b.remove(ObstacleId(9)), Some(obs(9)));
        assert_eq!(b.remove(ObstacleId(9)), None);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn duplicate_ids_stay_confirmed() {
        let b = ModerationBoard::new(vec![obs(1)], vec![obs(1), obs(2)]);
        assert_eq!(b.all_ids(), vec![ObstacleId(1), ObstacleId(2)]);
        assert_eq!(b.partition_of(ObstacleId(1)), Some(Partition::Confirmed));
    }

    #[test]
    fn decodes_server_shape() {
        let o: ModeratedObstacle =
            serde_json::from_str(r#"{"id": 123456789, "lat": 49.8, "lon": 24.0}"#).unwrap();
        assert_eq!(o.id, ObstacleId(123456789));
        assert_eq!(o.position(), LatLon::new(49.8, 24.0));
    }
}
