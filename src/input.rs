use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::entities::GameState;

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Fire,
    Restart,
    Quit,
}

/// Collects key presses between frames and translates them into game actions.
/// Every action is one-shot: the player steps a whole lane per press.
#[derive(Debug, Default)]
pub struct InputManager {
    actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits up to `timeout` for the first event, then drains whatever else is queued.
    pub fn poll_events(
        &mut self,
        game_state: GameState,
        timeout: Duration,
    ) -> color_eyre::Result<()> {
        self.actions.clear();

        let mut wait = timeout;
        while event::poll(wait)? {
            if let Event::Key(key_event) = event::read()?
                && let Some(action) = translate_key(key_event, game_state)
            {
                self.actions.push(action);
            }
            wait = Duration::ZERO;
        }

        Ok(())
    }

    /// Returns the actions gathered by the last `poll_events`
    pub fn get_actions(&self) -> &[InputAction] {
        &self.actions
    }
}

/// Maps a single key event to an action for the current game state.
pub fn translate_key(key_event: KeyEvent, game_state: GameState) -> Option<InputAction> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    // Quit works in any state
    if matches!(
        key_event.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key_event.code == KeyCode::Char('c')
        && key_event.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(InputAction::Quit);
    }

    match game_state {
        GameState::Running => match key_event.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(InputAction::MoveLeft),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                Some(InputAction::MoveRight)
            }
            // Holding fire should not stream projectiles
            KeyCode::Char(' ') if key_event.kind == KeyEventKind::Press => Some(InputAction::Fire),
            _ => None,
        },
        // The "play again" control only exists on the game over screen
        GameState::GameOver => match key_event.code {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_and_fire_while_running() {
        assert_eq!(
            translate_key(press(KeyCode::Left), GameState::Running),
            Some(InputAction::MoveLeft)
        );
        assert_eq!(
            translate_key(press(KeyCode::Char('d')), GameState::Running),
            Some(InputAction::MoveRight)
        );
        assert_eq!(
            translate_key(press(KeyCode::Char(' ')), GameState::Running),
            Some(InputAction::Fire)
        );
    }

    #[test]
    fn test_restart_only_on_game_over() {
        assert_eq!(translate_key(press(KeyCode::Char('r')), GameState::Running), None);
        assert_eq!(
            translate_key(press(KeyCode::Char('R')), GameState::GameOver),
            Some(InputAction::Restart)
        );
        assert_eq!(translate_key(press(KeyCode::Left), GameState::GameOver), None);
    }

    #[test]
    fn test_quit_in_any_state() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate_key(ctrl_c, GameState::Running), Some(InputAction::Quit));
        assert_eq!(
            translate_key(press(KeyCode::Esc), GameState::GameOver),
            Some(InputAction::Quit)
        );
    }

    #[test]
    fn test_release_and_repeat() {
        let mut release = press(KeyCode::Char(' '));
        release.kind = KeyEventKind::Release;
        assert_eq!(translate_key(release, GameState::Running), None);

        let mut repeat = press(KeyCode::Char(' '));
        repeat.kind = KeyEventKind::Repeat;
        assert_eq!(translate_key(repeat, GameState::Running), None);

        let mut repeat = press(KeyCode::Right);
        repeat.kind = KeyEventKind::Repeat;
        assert_eq!(
            translate_key(repeat, GameState::Running),
            Some(InputAction::MoveRight)
        );
    }
}
