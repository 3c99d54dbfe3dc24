use super::entity::{Entity, EntityId, EntityKind, Position};

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub lane: u16,
    pub y: f32,
    pub height: f32,
    /// Units per millisecond, upward
    pub speed: f32,
    pub destroyed: bool,
}

impl Projectile {
    pub fn new(id: EntityId, spot: Position, height: f32, speed: f32) -> Self {
        Self {
            id,
            lane: spot.lane,
            y: spot.y,
            height,
            speed,
            destroyed: false,
        }
    }

    /// Rises by `speed * dt_ms`; destroyed once the bottom edge clears the top of the field.
    pub fn update(&mut self, dt_ms: f32) {
        self.y -= self.speed * dt_ms;
        if self.bottom() < 0.0 {
            self.destroyed = true;
        }
    }

    /// Hit test against a target: same lane and strictly above its top edge.
    pub fn is_above<E: Entity>(&self, target: &E) -> bool {
        self.lane == target.lane() && self.y < target.top()
    }
}

impl Entity for Projectile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn position(&self) -> Position {
        Position::new(self.lane, self.y)
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
