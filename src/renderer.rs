use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::entities::{Enemy, Friend, GameState, Player, Projectile};
use crate::scene::Scene;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub friends: &'a [Friend],
    pub projectiles: &'a [Projectile],
    pub scene: &'a Scene,
    pub lanes: u16,
    pub field_height: f32,
    pub area: Rect,
}

/// Maps field coordinates (lane, units) onto terminal cells.
#[derive(Debug, Clone, Copy)]
struct FieldMapper {
    area: Rect,
    lane_width: u16,
    rows_per_unit: f32,
}

impl FieldMapper {
    fn new(area: Rect, lanes: u16, field_height: f32) -> Self {
        Self {
            area,
            lane_width: area.width / lanes.max(1),
            rows_per_unit: area.height as f32 / field_height,
        }
    }

    /// Terminal rect for a sprite, clipped to the field. `None` when fully off-field.
    fn sprite_rect(&self, lane: u16, y: f32, width: u16, rows: u16) -> Option<Rect> {
        let top = (y * self.rows_per_unit).floor() as i32;
        let bottom = top + rows as i32;
        if bottom <= 0 || top >= self.area.height as i32 {
            return None;
        }

        let width = width.min(self.lane_width);
        let x = self.area.x + lane * self.lane_width + (self.lane_width - width) / 2;
        let visible_top = top.max(0) as u16;
        let visible_bottom = (bottom as u16).min(self.area.height);

        Some(Rect {
            x,
            y: self.area.y + visible_top,
            width,
            height: visible_bottom - visible_top,
        })
    }

    /// Lines of a sprite that remain visible when its top is clipped away.
    fn skip_rows(&self, y: f32) -> usize {
        let top = (y * self.rows_per_unit).floor() as i32;
        (-top).max(0) as usize
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        if view.game_state == GameState::GameOver {
            self.render_game_over(frame, view);
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        // Header row for the HUD, footer row for controls
        let field_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(field_area);
        frame.render_widget(block, field_area);

        let mapper = FieldMapper::new(inner, view.lanes, view.field_height);

        for enemy in view.enemies {
            let lines = enemy.get_sprite_lines();
            self.render_sprite(frame, &mapper, enemy.lane, enemy.y, &lines, Color::Red);
        }

        for friend in view.friends {
            let lines = friend.get_sprite_lines();
            self.render_sprite(frame, &mapper, friend.lane, friend.y, &lines, Color::Cyan);
        }

        let player_lines = view.player.get_sprite_lines();
        self.render_sprite(
            frame,
            &mapper,
            view.player.lane,
            view.player.y,
            &player_lines,
            Color::Yellow,
        );

        // Projectiles are single cells, drawn straight into the buffer
        let buffer = frame.buffer_mut();
        for projectile in view.projectiles {
            if let Some(cell) = mapper.sprite_rect(projectile.lane, projectile.y, 1, 1) {
                buffer.set_string(
                    cell.x,
                    cell.y,
                    "|",
                    Style::default()
                        .fg(Color::LightYellow)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }

        let hud = Line::from(vec![
            Span::styled(
                view.scene.score_text().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled(
                view.scene.lives_text().to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let hud_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(hud), hud_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D or Arrows: Change lane] [Space: Fire] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_sprite(
        &self,
        frame: &mut Frame,
        mapper: &FieldMapper,
        lane: u16,
        y: f32,
        lines: &[&'static str],
        color: Color,
    ) {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let Some(rect) = mapper.sprite_rect(lane, y, width, lines.len() as u16) else {
            return;
        };

        let text: Vec<Line> = lines
            .iter()
            .skip(mapper.skip_rows(y))
            .map(|line| Line::from(*line).style(Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .collect();
        frame.render_widget(Paragraph::new(text), rect);
    }

    /// Renders the terminal banner and the play-again hint
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let Some(banner) = view.scene.banner() else {
            return;
        };

        let mut text = vec![
            Line::from(""),
            Line::from(banner.to_string()).centered().red().bold(),
            Line::from(""),
            Line::from(view.scene.score_text().to_string())
                .centered()
                .yellow(),
        ];
        if view.scene.play_again_visible() {
            text.push(Line::from(""));
            text.push(Line::from("Press R to play again").centered().white());
        }

        let box_area = Rect {
            x: area.x + area.width.saturating_sub(30) / 2,
            y: area.y + area.height.saturating_sub(8) / 2,
            width: area.width.min(30),
            height: area.height.min(8),
        };

        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            box_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_rect_maps_lane_and_row() {
        let area = Rect::new(0, 0, 50, 50);
        let mapper = FieldMapper::new(area, 5, 500.0);
        let rect = mapper.sprite_rect(2, 100.0, 7, 3).expect("visible");
        assert_eq!(rect, Rect::new(21, 10, 7, 3));
    }

    #[test]
    fn test_sprite_rect_clips_above_field() {
        let area = Rect::new(0, 0, 50, 50);
        let mapper = FieldMapper::new(area, 5, 500.0);
        assert_eq!(mapper.sprite_rect(0, -100.0, 7, 3), None);

        let rect = mapper.sprite_rect(0, -10.0, 7, 3).expect("partly visible");
        assert_eq!(rect.y, 0);
        assert_eq!(rect.height, 2);
        assert_eq!(mapper.skip_rows(-10.0), 1);
    }

    #[test]
    fn test_sprite_rect_clips_below_field() {
        let area = Rect::new(0, 0, 50, 50);
        let mapper = FieldMapper::new(area, 5, 500.0);
        assert_eq!(mapper.sprite_rect(4, 500.0, 7, 3), None);
        let rect = mapper.sprite_rect(4, 490.0, 7, 3).expect("partly visible");
        assert_eq!(rect.height, 1);
    }
}
