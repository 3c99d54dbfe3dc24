use super::entity::{EntityId, Position};
use super::projectile::Projectile;

#[derive(Debug, Clone)]
pub struct Player {
    pub lane: u16,
    /// Top edge; fixed for the whole game
    pub y: f32,
    pub height: f32,
    /// Live projectiles in firing order
    pub projectiles: Vec<Projectile>,
}

impl Player {
    pub fn new(lane: u16, y: f32, height: f32) -> Self {
        Self {
            lane,
            y,
            height,
            projectiles: Vec::new(),
        }
    }

    pub fn move_left(&mut self) {
        if self.lane > 0 {
            self.lane -= 1;
        }
    }

    /// Steps one lane right, staying inside `lanes`.
    pub fn move_right(&mut self, lanes: u16) {
        if self.lane + 1 < lanes {
            self.lane += 1;
        }
    }

    /// Appends a projectile at the player's lane and top edge.
    pub fn fire(&mut self, id: EntityId, height: f32, speed: f32) -> &Projectile {
        let spot = Position::new(self.lane, self.y);
        self.projectiles.push(Projectile::new(id, spot, height, speed));
        &self.projectiles[self.projectiles.len() - 1]
    }

    /// Advances every projectile; those leaving the top are flagged destroyed.
    pub fn update(&mut self, dt_ms: f32) {
        for projectile in &mut self.projectiles {
            projectile.update(dt_ms);
        }
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        vec![" _____ ", "(=====)", " ''''' "]
    }
}
