// Library exports for testing
pub use config::{ConfigError, GameConfig, HitPolicy, SpawnOrder};
pub use driver::TickDriver;
pub use engine::{Engine, Intent, Schedule, TickReport};
pub use entities::{
    Enemy, Entity, EntityId, EntityKind, Friend, GameState, Player, Position, Projectile,
};
pub use scene::Scene;
pub use spawner::Spawner;

pub mod app;
pub mod config;
pub mod driver;
pub mod engine;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod spawner;
