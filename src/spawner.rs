use std::collections::HashSet;

use rand::Rng;

use crate::config::SpawnOrder;
use crate::entities::{Entity, Position};

/// Picks lanes for new enemies and friends.
///
/// A lane is taken while any entity of the same category occupies it,
/// regardless of how far down the field that entity has fallen. New
/// entities start just above the top edge so they slide into view.
#[derive(Debug, Clone)]
pub struct Spawner {
    lanes: u16,
    order: SpawnOrder,
}

impl Spawner {
    pub fn new(lanes: u16, order: SpawnOrder) -> Self {
        Self { lanes, order }
    }

    /// Returns a free spot for an entity of `height`, or `None` when every lane is taken.
    pub fn next_spot<E: Entity, R: Rng>(
        &self,
        existing: &[E],
        height: f32,
        rng: &mut R,
    ) -> Option<Position> {
        if self.lanes == 0 {
            return None;
        }

        let lanes = u32::from(self.lanes);
        let start = match self.order {
            SpawnOrder::LeftToRight => 0,
            SpawnOrder::Shuffled => rng.random_range(0..lanes),
        };

        let taken: HashSet<u16> = existing.iter().map(|e| e.lane()).collect();
        // Wrapped in u32 so start + offset cannot overflow a u16 lane count
        (0..lanes)
            .map(|offset| ((start + offset) % lanes) as u16)
            .find(|lane| !taken.contains(lane))
            .map(|lane| Position::new(lane, -height))
    }
}
