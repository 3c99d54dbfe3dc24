use thiserror::Error;

/// How a projectile hit resolves against the enemy wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPolicy {
    /// Any qualifying hit destroys every live enemy in that tick.
    ClearWave,
    /// Only the matched enemy is destroyed.
    SingleTarget,
}

/// Order in which the spawner scans lanes for a free spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOrder {
    /// Lane 0 first, always picking the leftmost free lane.
    LeftToRight,
    /// Start at a random lane and wrap around.
    Shuffled,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field must have at least one lane")]
    NoLanes,
    #[error("{0} must be a positive, finite number")]
    NotPositive(&'static str),
    #[error("tick interval must be at least 1 ms")]
    ZeroTick,
    #[error("max_enemies must be at least 1")]
    NoEnemies,
    #[error("{what} of {target} cannot fit in {lanes} lanes")]
    ExceedsLanes {
        what: &'static str,
        target: usize,
        lanes: u16,
    },
}

/// Gameplay constants. Distances are field units, speeds are units per millisecond.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub lanes: u16,
    pub field_height: f32,
    pub enemy_height: f32,
    /// Friends share the enemy sprite size
    pub friend_height: f32,
    pub player_height: f32,
    /// Gap between the player sprite and the bottom of the field
    pub player_margin: f32,
    pub projectile_height: f32,
    pub max_enemies: usize,
    pub target_friends: usize,
    pub tick_interval_ms: u64,
    pub enemy_speed: f32,
    pub friend_speed: f32,
    pub projectile_speed: f32,
    pub score_per_escape: f64,
    pub life_per_pickup: f64,
    /// How far an enemy's bottom edge may overlap the player before it counts
    pub enemy_contact_inset: f32,
    /// How far ahead of its bottom edge a friend can be collected
    pub friend_contact_reach: f32,
    pub hit_policy: HitPolicy,
    pub spawn_order: SpawnOrder,
    pub log_file: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lanes: 5,
            field_height: 500.0,
            enemy_height: 156.0,
            friend_height: 156.0,
            player_height: 54.0,
            player_margin: 10.0,
            projectile_height: 10.0,
            max_enemies: 3,
            target_friends: 1,
            tick_interval_ms: 20,
            enemy_speed: 0.25,
            friend_speed: 0.25,
            projectile_speed: 0.5,
            score_per_escape: 1.0 / 50.0,
            life_per_pickup: 1.0 / 10.0,
            enemy_contact_inset: 7.0,
            friend_contact_reach: 15.0,
            hit_policy: HitPolicy::ClearWave,
            spawn_order: SpawnOrder::LeftToRight,
            log_file: "lane_shooter.log".to_string(),
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(max_enemies) = std::env::var("LANE_SHOOTER_MAX_ENEMIES") {
            match max_enemies.parse::<usize>() {
                Ok(parsed) if parsed > 0 => config.max_enemies = parsed,
                _ => tracing::warn!(
                    "Invalid LANE_SHOOTER_MAX_ENEMIES '{}', using default",
                    max_enemies
                ),
            }
        }

        if let Ok(tick) = std::env::var("LANE_SHOOTER_TICK_MS") {
            match tick.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.tick_interval_ms = parsed,
                _ => tracing::warn!("Invalid LANE_SHOOTER_TICK_MS '{}', using default", tick),
            }
        }

        if let Ok(policy) = std::env::var("LANE_SHOOTER_HIT_POLICY") {
            match parse_hit_policy(&policy) {
                Some(parsed) => config.hit_policy = parsed,
                None => tracing::warn!(
                    "Invalid LANE_SHOOTER_HIT_POLICY '{}', using default",
                    policy
                ),
            }
        }

        if let Ok(order) = std::env::var("LANE_SHOOTER_SPAWN_ORDER") {
            match parse_spawn_order(&order) {
                Some(parsed) => config.spawn_order = parsed,
                None => tracing::warn!(
                    "Invalid LANE_SHOOTER_SPAWN_ORDER '{}', using default",
                    order
                ),
            }
        }

        if let Ok(path) = std::env::var("LANE_SHOOTER_LOG_FILE") {
            config.log_file = path;
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.max_enemies == 0 {
            return Err(ConfigError::NoEnemies);
        }
        // One entity per lane, so larger targets could never be reached
        let lanes = usize::from(self.lanes);
        if self.max_enemies > lanes {
            return Err(ConfigError::ExceedsLanes {
                what: "max_enemies",
                target: self.max_enemies,
                lanes: self.lanes,
            });
        }
        if self.target_friends > lanes {
            return Err(ConfigError::ExceedsLanes {
                what: "target_friends",
                target: self.target_friends,
                lanes: self.lanes,
            });
        }

        let positive = [
            ("field_height", self.field_height),
            ("enemy_height", self.enemy_height),
            ("friend_height", self.friend_height),
            ("player_height", self.player_height),
            ("projectile_height", self.projectile_height),
            ("enemy_speed", self.enemy_speed),
            ("friend_speed", self.friend_speed),
            ("projectile_speed", self.projectile_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive(name));
            }
        }

        Ok(())
    }

    /// Top edge of the player sprite; also the start of its contact band.
    pub fn player_y(&self) -> f32 {
        self.field_height - self.player_height - self.player_margin
    }
}

fn parse_hit_policy(value: &str) -> Option<HitPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "clear-wave" => Some(HitPolicy::ClearWave),
        "single-target" => Some(HitPolicy::SingleTarget),
        _ => None,
    }
}

fn parse_spawn_order(value: &str) -> Option<SpawnOrder> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left-to-right" => Some(SpawnOrder::LeftToRight),
        "shuffled" => Some(SpawnOrder::Shuffled),
        _ => None,
    }
}
