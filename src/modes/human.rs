use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::game::{GameConfig, SimulationEngine, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// What the frame loop should do after handling a frame's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    Continue,
    Exit,
}

pub struct HumanMode {
    engine: SimulationEngine,
    snapshot: Snapshot,
    renderer: Renderer,
    input_handler: InputHandler,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = SimulationEngine::new(config).context("Invalid game configuration")?;
        Ok(Self::with_engine(engine))
    }

    pub fn with_engine(engine: SimulationEngine) -> Self {
        Self {
            snapshot: engine.snapshot(),
            renderer: Renderer::new(engine.config()),
            input_handler: InputHandler::new(),
            engine,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let config = self.engine.config();
        let frame_period = Duration::from_secs_f64(1.0 / config.tick_rate_hz);
        info!(
            grid_size = config.grid_size,
            hard_walls = config.hard_walls,
            tick_rate_hz = config.tick_rate_hz,
            "Starting game"
        );

        let mut frame_timer = interval(frame_period);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = frame_timer.tick() => {
                    if self.frame() == LoopSignal::Exit {
                        info!(ticks = self.engine.ticks(), "Quit requested");
                        break;
                    }
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.snapshot, self.engine.ticks());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C delivered as a signal rather than a key
                _ = &mut ctrl_c => {
                    info!("Interrupted");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Apply the input queued since the last frame, then advance one tick
    fn frame(&mut self) -> LoopSignal {
        let actions: Vec<KeyAction> = self.input_handler.drain_terminal().collect();
        self.step(actions)
    }

    /// Frame step with input supplied by the caller
    pub fn step<I>(&mut self, actions: I) -> LoopSignal
    where
        I: IntoIterator<Item = KeyAction>,
    {
        for action in actions {
            if Self::apply_action(&mut self.engine, action) == LoopSignal::Exit {
                return LoopSignal::Exit;
            }
        }

        self.snapshot = self.engine.tick();
        LoopSignal::Continue
    }

    fn apply_action(engine: &mut SimulationEngine, action: KeyAction) -> LoopSignal {
        match action {
            KeyAction::Steer(direction) => {
                engine.set_direction(direction);
            }
            KeyAction::ClearFood => {
                engine.clear_food();
            }
            KeyAction::Restart => {
                engine.reset();
            }
            KeyAction::Quit => return LoopSignal::Exit,
            KeyAction::None => {}
        }

        LoopSignal::Continue
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
