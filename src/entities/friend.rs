use super::entity::{Entity, EntityId, EntityKind, Position};

/// Falling pickup that restores a fraction of a life when it reaches the player.
#[derive(Debug, Clone)]
pub struct Friend {
    pub id: EntityId,
    pub lane: u16,
    pub y: f32,
    pub height: f32,
    pub speed: f32,
    pub destroyed: bool,
}

impl Friend {
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

    pub fn update(&mut self, dt_ms: f32, field_height: f32) {
        self.y += self.speed * dt_ms;
        if self.y > field_height {
            self.destroyed = true;
        }
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        vec!["  .-.  ", " ( + ) ", "  '-'  "]
    }
}

impl Entity for Friend {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Friend
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
