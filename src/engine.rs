use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::{GameConfig, HitPolicy};
use crate::entities::{
    Enemy, Entity, EntityId, EntityKind, Friend, GameState, Player, Projectile,
};
use crate::spawner::Spawner;

/// Side effect requested by the engine, applied by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Spawned {
        id: EntityId,
        kind: EntityKind,
    },
    Despawned {
        id: EntityId,
        kind: EntityKind,
    },
    /// Displayed score (rounded)
    ScoreChanged(i64),
    /// Displayed lives (floored)
    LivesChanged(i64),
    GameOver {
        score: i64,
    },
    Restarted,
}

/// Whether the driver should arm another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Halt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub intents: Vec<Intent>,
    pub schedule: Schedule,
}

#[derive(Debug, Default)]
struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    fn next(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// The game loop. Owns every entity and the score/lives ledger.
///
/// Score and lives are derived from event counts rather than accumulated
/// floats, so ten pickups of a tenth of a life are exactly one life.
pub struct Engine {
    config: GameConfig,
    spawner: Spawner,
    rng: StdRng,
    ids: IdAllocator,
    state: GameState,
    player: Player,
    enemies: Vec<Enemy>,
    friends: Vec<Friend>,
    /// Enemies whose bottom edge crossed the floor
    escapes: u64,
    /// Friends collected
    pickups: u64,
    /// Collisions absorbed by a spare life
    lives_lost: u64,
    /// Enemy identities already credited with a player collision
    collided: HashSet<EntityId>,
    /// Friend identities already credited with a pickup
    collected: HashSet<EntityId>,
    shown_score: Option<i64>,
    shown_lives: Option<i64>,
}

impl Engine {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic engine for replays and tests.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let player = Player::new(config.lanes / 2, config.player_y(), config.player_height);
        let spawner = Spawner::new(config.lanes, config.spawn_order);

        Self {
            config,
            spawner,
            rng,
            ids: IdAllocator::default(),
            state: GameState::Running,
            player,
            enemies: Vec::new(),
            friends: Vec::new(),
            escapes: 0,
            pickups: 0,
            lives_lost: 0,
            collided: HashSet::new(),
            collected: HashSet::new(),
            shown_score: None,
            shown_lives: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.player.projectiles
    }

    pub fn score(&self) -> f64 {
        self.escapes as f64 * self.config.score_per_escape
    }

    pub fn lives(&self) -> f64 {
        self.pickups as f64 * self.config.life_per_pickup - self.lives_lost as f64
    }

    pub fn move_left(&mut self) {
        if self.state == GameState::Running {
            self.player.move_left();
        }
    }

    pub fn move_right(&mut self) {
        if self.state == GameState::Running {
            self.player.move_right(self.config.lanes);
        }
    }

    /// Launches a projectile from the player. Ignored once the game is over.
    pub fn fire(&mut self) -> Option<Intent> {
        if self.state != GameState::Running {
            return None;
        }

        let id = self.ids.next();
        let projectile = self.player.fire(
            id,
            self.config.projectile_height,
            self.config.projectile_speed,
        );
        debug!(?id, lane = projectile.lane, "Projectile fired");

        Some(Intent::Spawned {
            id,
            kind: EntityKind::Projectile,
        })
    }

    /// Advances the game by `dt_ms` of wall-clock time.
    pub fn tick(&mut self, dt_ms: f32) -> TickReport {
        if self.state == GameState::GameOver {
            return TickReport {
                intents: Vec::new(),
                schedule: Schedule::Halt,
            };
        }

        let mut intents = Vec::new();
        let field_height = self.config.field_height;

        self.player.update(dt_ms);
        for enemy in &mut self.enemies {
            enemy.update(dt_ms, field_height);
        }
        for friend in &mut self.friends {
            friend.update(dt_ms, field_height);
        }

        // Enemies that slipped past score, once each
        for enemy in &mut self.enemies {
            if !enemy.escaped && enemy.has_crossed_bottom(field_height) {
                enemy.escaped = true;
                self.escapes += 1;
            }
        }

        self.publish_hud(&mut intents);
        self.sweep(&mut intents);
        self.replenish(&mut intents);

        if self.check_enemy_contact() {
            self.state = GameState::GameOver;
            let score = self.score().round() as i64;
            info!(score, lives = self.lives(), "Game over");
            self.publish_hud(&mut intents);
            intents.push(Intent::GameOver { score });
            return TickReport {
                intents,
                schedule: Schedule::Halt,
            };
        }

        self.check_pickups();
        self.check_hits();

        // Pickups and hits destroy entities after the first sweep
        self.sweep(&mut intents);
        self.publish_hud(&mut intents);

        debug_assert!(self.enemies.len() <= self.config.max_enemies);

        TickReport {
            intents,
            schedule: Schedule::Continue,
        }
    }

    /// Starts a new game from `GameOver`. Returns `None` if the game is still running.
    pub fn restart(&mut self) -> Option<Vec<Intent>> {
        if self.state != GameState::GameOver {
            warn!("Restart requested while running, ignoring");
            return None;
        }

        let mut intents = Vec::new();
        despawn_all(&mut self.enemies, &mut intents);
        despawn_all(&mut self.friends, &mut intents);
        despawn_all(&mut self.player.projectiles, &mut intents);

        self.escapes = 0;
        self.pickups = 0;
        self.lives_lost = 0;
        self.collided.clear();
        self.collected.clear();
        self.shown_score = None;
        self.shown_lives = None;
        self.state = GameState::Running;

        intents.push(Intent::Restarted);
        self.publish_hud(&mut intents);
        info!("Game restarted");

        Some(intents)
    }

    fn publish_hud(&mut self, intents: &mut Vec<Intent>) {
        let score = self.score().round() as i64;
        if self.shown_score != Some(score) {
            self.shown_score = Some(score);
            intents.push(Intent::ScoreChanged(score));
        }

        let lives = self.lives().floor() as i64;
        if self.shown_lives != Some(lives) {
            self.shown_lives = Some(lives);
            intents.push(Intent::LivesChanged(lives));
        }
    }

    /// Drops destroyed entities and forgets identities that left play.
    fn sweep(&mut self, intents: &mut Vec<Intent>) {
        sweep_destroyed(&mut self.player.projectiles, intents);
        sweep_destroyed(&mut self.enemies, intents);
        sweep_destroyed(&mut self.friends, intents);

        self.collided
            .retain(|id| self.enemies.iter().any(|e| e.id == *id));
        self.collected
            .retain(|id| self.friends.iter().any(|f| f.id == *id));
    }

    fn replenish(&mut self, intents: &mut Vec<Intent>) {
        while self.enemies.len() < self.config.max_enemies {
            let Some(spot) =
                self.spawner
                    .next_spot(&self.enemies, self.config.enemy_height, &mut self.rng)
            else {
                debug!(enemies = self.enemies.len(), "No free lane for enemy, stalling spawn");
                break;
            };

            let id = self.ids.next();
            self.enemies.push(Enemy::new(
                id,
                spot,
                self.config.enemy_height,
                self.config.enemy_speed,
            ));
            debug!(?id, lane = spot.lane, "Enemy spawned");
            intents.push(Intent::Spawned {
                id,
                kind: EntityKind::Enemy,
            });
        }

        while self.friends.len() < self.config.target_friends {
            let Some(spot) =
                self.spawner
                    .next_spot(&self.friends, self.config.friend_height, &mut self.rng)
            else {
                debug!(friends = self.friends.len(), "No free lane for friend, stalling spawn");
                break;
            };

            let id = self.ids.next();
            self.friends.push(Friend::new(
                id,
                spot,
                self.config.friend_height,
                self.config.friend_speed,
            ));
            debug!(?id, lane = spot.lane, "Friend spawned");
            intents.push(Intent::Spawned {
                id,
                kind: EntityKind::Friend,
            });
        }
    }

    /// Credits each new enemy reaching the player's band once.
    /// A spare life absorbs the collision; without one the player dies.
    fn check_enemy_contact(&mut self) -> bool {
        let lane = self.player.lane;
        let band = self.player.y;
        let mut dead = false;

        for enemy in &self.enemies {
            let leading_edge = enemy.bottom() - self.config.enemy_contact_inset;
            if enemy.lane != lane || leading_edge < band || self.collided.contains(&enemy.id) {
                continue;
            }

            self.collided.insert(enemy.id);
            if self.lives() < 1.0 {
                dead = true;
            } else {
                self.lives_lost += 1;
                info!(id = ?enemy.id, lives = self.lives(), "Life lost");
            }
        }

        dead
    }

    fn check_pickups(&mut self) {
        let lane = self.player.lane;
        let band = self.player.y;

        for friend in &mut self.friends {
            let reach = friend.bottom() + self.config.friend_contact_reach;
            if friend.lane != lane || reach < band || self.collected.contains(&friend.id) {
                continue;
            }

            self.collected.insert(friend.id);
            self.pickups += 1;
            friend.destroy();
            info!(id = ?friend.id, pickups = self.pickups, "Friend collected");
        }
    }

    fn check_hits(&mut self) {
        for projectile in &mut self.player.projectiles {
            if projectile.is_destroyed() {
                continue;
            }

            let Some(target) = self
                .enemies
                .iter()
                .position(|e| !e.is_destroyed() && projectile.is_above(e))
            else {
                continue;
            };

            projectile.destroy();
            match self.config.hit_policy {
                HitPolicy::ClearWave => {
                    for enemy in &mut self.enemies {
                        enemy.destroy();
                    }
                    info!(projectile = ?projectile.id, "Wave cleared");
                }
                HitPolicy::SingleTarget => {
                    self.enemies[target].destroy();
                    debug!(id = ?self.enemies[target].id, "Enemy shot down");
                }
            }
        }
    }
}

fn sweep_destroyed<E: Entity>(items: &mut Vec<E>, intents: &mut Vec<Intent>) {
    items.retain(|item| {
        if item.is_destroyed() {
            intents.push(Intent::Despawned {
                id: item.id(),
                kind: item.kind(),
            });
            false
        } else {
            true
        }
    });
}

fn despawn_all<E: Entity>(items: &mut Vec<E>, intents: &mut Vec<Intent>) {
    intents.extend(items.drain(..).map(|item| Intent::Despawned {
        id: item.id(),
        kind: item.kind(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Position;
    use crate::scene::Scene;

    fn quiet_config() -> GameConfig {
        GameConfig {
            max_enemies: 1,
            target_friends: 0,
            ..GameConfig::default()
        }
    }

    /// Places an enemy whose leading edge sits exactly on the player's band.
    fn enemy_on_band(engine: &mut Engine) -> EntityId {
        let id = engine.ids.next();
        let y = engine.player.y + engine.config.enemy_contact_inset - engine.config.enemy_height;
        engine.enemies.push(Enemy::new(
            id,
            Position::new(engine.player.lane, y),
            engine.config.enemy_height,
            engine.config.enemy_speed,
        ));
        id
    }

    fn friend_on_band(engine: &mut Engine) -> EntityId {
        let id = engine.ids.next();
        let y =
            engine.player.y - engine.config.friend_contact_reach - engine.config.friend_height;
        engine.friends.push(Friend::new(
            id,
            Position::new(engine.player.lane, y),
            engine.config.friend_height,
            engine.config.friend_speed,
        ));
        id
    }

    #[test]
    fn test_first_tick_spawns_wave_and_friend() {
        let mut engine = Engine::with_seed(GameConfig::default(), 1);
        let report = engine.tick(20.0);

        assert_eq!(report.schedule, Schedule::Continue);
        assert_eq!(engine.enemies().len(), 3);
        assert_eq!(engine.friends().len(), 1);
        assert!(report.intents.contains(&Intent::ScoreChanged(0)));
        assert!(report.intents.contains(&Intent::LivesChanged(0)));

        let spawned_lanes: Vec<u16> = engine.enemies().iter().map(|e| e.lane).collect();
        assert_eq!(spawned_lanes, vec![0, 1, 2]);

        // Spawn intents name exactly the live entities the renderer will draw
        let mut scene = Scene::new();
        scene.apply(&report.intents);
        assert_eq!(scene.count_of(EntityKind::Enemy), 3);
        assert_eq!(scene.count_of(EntityKind::Friend), 1);
        assert!(engine.enemies().iter().all(|e| scene.contains(e.id)));
        assert!(engine.friends().iter().all(|f| scene.contains(f.id)));
    }

    #[test]
    fn test_replenish_stalls_when_lanes_run_out() {
        let config = GameConfig {
            max_enemies: 8,
            target_friends: 0,
            ..GameConfig::default()
        };
        let lanes = config.lanes as usize;
        let mut engine = Engine::with_seed(config, 1);

        let mut spawned = 0;
        for _ in 0..5 {
            let report = engine.tick(20.0);
            assert_eq!(report.schedule, Schedule::Continue);
            spawned += report
                .intents
                .iter()
                .filter(|i| matches!(i, Intent::Spawned { kind: EntityKind::Enemy, .. }))
                .count();
            assert_eq!(engine.enemies().len(), lanes);
        }
        assert_eq!(spawned, lanes);
    }

    #[test]
    fn test_contact_without_lives_ends_game() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        enemy_on_band(&mut engine);

        let report = engine.tick(0.0);
        assert_eq!(report.schedule, Schedule::Halt);
        assert_eq!(engine.state(), GameState::GameOver);
        assert!(report.intents.contains(&Intent::GameOver { score: 0 }));

        // No further ticks do anything
        let report = engine.tick(20.0);
        assert!(report.intents.is_empty());
        assert_eq!(report.schedule, Schedule::Halt);
    }

    #[test]
    fn test_spare_life_absorbs_one_collision() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        engine.pickups = 20;
        let id = enemy_on_band(&mut engine);

        let report = engine.tick(0.0);
        assert_eq!(report.schedule, Schedule::Continue);
        assert_eq!(engine.lives().floor() as i64, 1);
        assert!(engine.collided.contains(&id));

        // Same enemy still overlapping next tick: no second charge
        engine.tick(0.0);
        assert_eq!(engine.lives_lost, 1);
        assert_eq!(engine.state(), GameState::Running);
    }

    #[test]
    fn test_next_new_collision_after_last_life_is_fatal() {
        let config = GameConfig {
            max_enemies: 2,
            target_friends: 0,
            ..GameConfig::default()
        };
        let mut engine = Engine::with_seed(config, 1);
        engine.pickups = 10;
        enemy_on_band(&mut engine);

        engine.tick(0.0);
        assert_eq!(engine.lives_lost, 1);
        assert_eq!(engine.state(), GameState::Running);

        enemy_on_band(&mut engine);
        engine.enemies.retain(|e| e.lane == engine.player.lane);
        let report = engine.tick(0.0);
        assert_eq!(report.schedule, Schedule::Halt);
        assert_eq!(engine.state(), GameState::GameOver);
    }

    #[test]
    fn test_enemy_in_other_lane_is_harmless() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        enemy_on_band(&mut engine);
        engine.player.move_left();

        let report = engine.tick(0.0);
        assert_eq!(report.schedule, Schedule::Continue);
        assert!(engine.collided.is_empty());
    }

    #[test]
    fn test_friend_pickup_credits_once_and_removes_friend() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        let id = friend_on_band(&mut engine);

        let report = engine.tick(0.0);
        assert_eq!(engine.pickups, 1);
        assert!((engine.lives() - 0.1).abs() < 1e-9);
        assert!(report.intents.contains(&Intent::Despawned {
            id,
            kind: EntityKind::Friend,
        }));
        assert!(engine.friends().is_empty());

        engine.tick(0.0);
        assert_eq!(engine.pickups, 1);
    }

    #[test]
    fn test_ten_pickups_make_a_whole_life() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        for _ in 0..10 {
            friend_on_band(&mut engine);
            engine.tick(0.0);
        }
        assert_eq!(engine.lives(), 1.0);
        assert_eq!(engine.shown_lives, Some(1));
    }

    #[test]
    fn test_escape_scores_once_per_enemy() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        engine.player.move_left();
        let id = engine.ids.next();
        engine.enemies.push(Enemy::new(
            id,
            Position::new(4, 340.0),
            engine.config.enemy_height,
            engine.config.enemy_speed,
        ));

        engine.tick(20.0);
        assert_eq!(engine.escapes, 1);
        engine.tick(20.0);
        engine.tick(20.0);
        assert_eq!(engine.escapes, 1);
        assert!((engine.score() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_hit_clears_whole_wave() {
        let mut engine = Engine::with_seed(GameConfig::default(), 1);
        engine.tick(0.0);
        assert_eq!(engine.enemies().len(), 3);

        // Lane 2 enemy sits below a projectile in its lane
        engine.enemies[2].y = 100.0;
        engine.fire();
        engine.player.projectiles[0].y = 50.0;

        let report = engine.tick(0.0);
        let despawned_enemies = report
            .intents
            .iter()
            .filter(|i| matches!(i, Intent::Despawned { kind: EntityKind::Enemy, .. }))
            .count();
        assert_eq!(despawned_enemies, 3);
        assert!(engine.enemies().is_empty());
        assert!(engine.projectiles().is_empty());

        engine.tick(0.0);
        assert_eq!(engine.enemies().len(), 3);
    }

    #[test]
    fn test_single_target_policy_only_removes_match() {
        let config = GameConfig {
            hit_policy: HitPolicy::SingleTarget,
            ..GameConfig::default()
        };
        let mut engine = Engine::with_seed(config, 1);
        engine.tick(0.0);

        engine.enemies[2].y = 100.0;
        let target = engine.enemies[2].id;
        engine.fire();
        engine.player.projectiles[0].y = 50.0;

        let report = engine.tick(0.0);
        assert!(report.intents.contains(&Intent::Despawned {
            id: target,
            kind: EntityKind::Enemy,
        }));
        assert_eq!(engine.enemies().len(), 2);
    }

    #[test]
    fn test_projectile_below_enemy_misses() {
        let mut engine = Engine::with_seed(GameConfig::default(), 1);
        engine.tick(0.0);
        engine.enemies[2].y = 100.0;
        engine.fire();

        engine.tick(0.0);
        assert_eq!(engine.enemies().len(), 3);
        assert_eq!(engine.projectiles().len(), 1);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        assert!(engine.restart().is_none());

        enemy_on_band(&mut engine);
        engine.tick(0.0);
        assert_eq!(engine.state(), GameState::GameOver);

        let intents = engine.restart().expect("restart from game over");
        assert_eq!(engine.state(), GameState::Running);
        assert!(intents.contains(&Intent::Restarted));
        assert!(intents.contains(&Intent::ScoreChanged(0)));
        assert!(intents.contains(&Intent::LivesChanged(0)));
        assert!(engine.enemies().is_empty());
        assert!(engine.collided.is_empty());
        assert_eq!(engine.score(), 0.0);
        assert_eq!(engine.lives(), 0.0);

        // A second click is a no-op
        assert!(engine.restart().is_none());
    }

    #[test]
    fn test_controls_ignored_after_game_over() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        enemy_on_band(&mut engine);
        engine.tick(0.0);

        let lane = engine.player().lane;
        engine.move_left();
        assert_eq!(engine.player().lane, lane);
        assert!(engine.fire().is_none());
    }

    #[test]
    fn test_encountered_ids_are_pruned_when_enemy_leaves() {
        let mut engine = Engine::with_seed(quiet_config(), 1);
        engine.pickups = 10;
        let id = enemy_on_band(&mut engine);
        engine.tick(0.0);
        assert!(engine.collided.contains(&id));

        engine.tick(1_000.0);
        assert!(!engine.enemies().iter().any(|e| e.id == id));
        assert!(!engine.collided.contains(&id));
    }
}
