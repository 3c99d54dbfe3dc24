use std::collections::HashMap;

use tracing::warn;

use crate::engine::Intent;
use crate::entities::{EntityId, EntityKind};

pub const GAME_OVER_TEXT: &str = "Game Over!";

/// Presentation-side state: which display nodes exist, and what the
/// labels say. Only changed by applying engine intents.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<EntityId, EntityKind>,
    score_text: String,
    lives_text: String,
    banner: Option<String>,
    play_again_visible: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, intents: &[Intent]) {
        for intent in intents {
            self.apply_one(intent);
        }
    }

    fn apply_one(&mut self, intent: &Intent) {
        match intent {
            Intent::Spawned { id, kind, .. } => {
                if self.nodes.insert(*id, *kind).is_some() {
                    warn!(?id, ?kind, "Node created twice");
                }
            }
            Intent::Despawned { id, kind } => {
                if self.nodes.remove(id).is_none() {
                    warn!(?id, ?kind, "Removing a node that does not exist");
                }
            }
            Intent::ScoreChanged(score) => {
                self.score_text = format!("score:  {score}");
            }
            Intent::LivesChanged(lives) => {
                self.lives_text = format!("lives: {lives}");
            }
            Intent::GameOver { .. } => {
                self.banner = Some(GAME_OVER_TEXT.to_string());
                self.play_again_visible = true;
            }
            Intent::Restarted => {
                self.banner = None;
                self.play_again_visible = false;
            }
        }
    }

    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub fn lives_text(&self) -> &str {
        &self.lives_text
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn play_again_visible(&self) -> bool {
        self.play_again_visible
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.nodes.values().filter(|k| **k == kind).count()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }
}
