mod enemy;
mod entity;
mod friend;
mod game_state;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::Enemy;
pub use entity::{Entity, EntityId, EntityKind, Position};
pub use friend::Friend;
pub use game_state::GameState;
pub use player::Player;
pub use projectile::Projectile;
