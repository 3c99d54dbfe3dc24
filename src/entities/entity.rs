/// Stable per-entity token. Allocated by the engine and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Enemy,
    Friend,
    Projectile,
}

/// Lane index plus the vertical position of the sprite's top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lane: u16,
    pub y: f32,
}

impl Position {
    pub fn new(lane: u16, y: f32) -> Self {
        Self { lane, y }
    }
}

/// Shared contract for everything that moves through the field.
pub trait Entity {
    fn id(&self) -> EntityId;
    fn kind(&self) -> EntityKind;
    fn position(&self) -> Position;
    fn height(&self) -> f32;
    fn is_destroyed(&self) -> bool;
    /// Marks the entity as out of play. Irreversible.
    fn destroy(&mut self);

    fn lane(&self) -> u16 {
        self.position().lane
    }

    fn top(&self) -> f32 {
        self.position().y
    }

    fn bottom(&self) -> f32 {
        self.position().y + self.height()
    }
}
