use super::entity::{Entity, EntityId, EntityKind, Position};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub lane: u16,
    pub y: f32,
    pub height: f32,
    /// Units per millisecond, downward
    pub speed: f32,
    pub destroyed: bool,
    /// Set once the bottom edge has crossed the field floor and been scored
    pub escaped: bool,
}

impl Enemy {
    pub fn new(id: EntityId, spot: Position, height: f32, speed: f32) -> Self {
        Self {
            id,
            lane: spot.lane,
            y: spot.y,
            height,
            speed,
            destroyed: false,
            escaped: false,
        }
    }

    /// Falls by `speed * dt_ms`. Leaves play once the top edge is below `field_height`.
    pub fn update(&mut self, dt_ms: f32, field_height: f32) {
        self.y += self.speed * dt_ms;
        if self.y > field_height {
            self.destroyed = true;
        }
    }

    /// True while the bottom edge hangs past the floor.
    pub fn has_crossed_bottom(&self, field_height: f32) -> bool {
        self.bottom() > field_height
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        vec!["  \\|/  ", " {===} ", "  /_\\  "]
    }
}

impl Entity for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
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
