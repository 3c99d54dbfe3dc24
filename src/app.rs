use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::driver::TickDriver;
use crate::engine::{Engine, Schedule};
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::scene::Scene;

/// The main application: clock, tick driver, engine and the presentation layer.
pub struct App {
    running: bool,
    engine: Engine,
    scene: Scene,
    driver: TickDriver,
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        let interval = Duration::from_millis(config.tick_interval_ms);
        Self::with_engine(Engine::new(config), interval)
    }

    pub fn with_engine(engine: Engine, interval: Duration) -> Self {
        let mut driver = TickDriver::new(interval);
        driver.arm(Instant::now());

        Self {
            running: true,
            engine,
            scene: Scene::new(),
            driver,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting game loop");
        while self.running {
            terminal.draw(|frame| {
                let config = self.engine.config();
                let view = RenderView {
                    game_state: self.engine.state(),
                    player: self.engine.player(),
                    enemies: self.engine.enemies(),
                    friends: self.engine.friends(),
                    projectiles: self.engine.projectiles(),
                    scene: &self.scene,
                    lanes: config.lanes,
                    field_height: config.field_height,
                    area: frame.area(),
                };
                self.renderer.render(frame, &view);
            })?;

            // Block on input until the next tick is due
            let timeout = self.driver.time_until_due(Instant::now());
            self.input_manager
                .poll_events(self.engine.state(), timeout)?;
            let actions = self.input_manager.get_actions().to_vec();
            self.process_actions(&actions);

            self.step(Instant::now());
        }
        info!("Game loop stopped");
        Ok(())
    }

    /// Runs one engine tick if the driver says one is due.
    pub fn step(&mut self, now: Instant) {
        let Some(elapsed_ms) = self.driver.poll(now) else {
            return;
        };

        let report = self.engine.tick(elapsed_ms);
        self.scene.apply(&report.intents);
        self.apply_schedule(report.schedule);
    }

    /// Process input actions and update game state accordingly
    pub fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::MoveLeft => self.engine.move_left(),
                InputAction::MoveRight => self.engine.move_right(),
                InputAction::Fire => {
                    if let Some(intent) = self.engine.fire() {
                        self.scene.apply(&[intent]);
                    }
                }
                InputAction::Restart => self.restart(Instant::now()),
            }
        }
    }

    /// Re-enters the tick cycle after a game over. Extra requests are ignored.
    fn restart(&mut self, now: Instant) {
        let Some(intents) = self.engine.restart() else {
            return;
        };
        self.scene.apply(&intents);
        self.driver.arm(now);
        // Tick immediately rather than waiting out an interval
        let report = self.engine.tick(0.0);
        self.scene.apply(&report.intents);
        self.apply_schedule(report.schedule);
    }

    fn apply_schedule(&mut self, schedule: Schedule) {
        if schedule == Schedule::Halt {
            debug!("Tick cycle halted");
            self.driver.disarm();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }
}
