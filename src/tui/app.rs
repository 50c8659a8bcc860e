//! Bench application state and event loop.

use std::time::{Duration, Instant};
use crate::circuit::{Circuit, ComponentId};
use crate::sim::Simulator;

/// Interactive bench state.
pub struct BenchApp {
    /// The simulation being driven.
    pub sim: Simulator,
    /// Circuit as loaded, for reset.
    initial: Circuit,
    /// Design name shown in the title bar.
    pub title: String,
    /// Delay between steps while running.
    pub cadence: Duration,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Index of the selected switch.
    pub selected: usize,
}

impl BenchApp {
    pub fn new(title: impl Into<String>, circuit: Circuit, cadence: Duration) -> Self {
        Self {
            sim: Simulator::new(circuit.clone()),
            initial: circuit,
            title: title.into(),
            cadence,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 't' to toggle, 'q' to quit.".into(),
            selected: 0,
        }
    }

    /// Switch ids in circuit order.
    pub fn switch_ids(&self) -> Vec<ComponentId> {
        self.sim.circuit().switches().map(|c| c.id().clone()).collect()
    }

    /// Step once.
    pub fn step(&mut self) {
        match self.sim.step() {
            Ok(n) => self.status = format!("Step {}", n),
            Err(e) => self.status = format!("Error: {}", e),
        }
    }

    /// Start stepping at the configured cadence.
    pub fn run(&mut self) {
        self.sim.start();
        self.status = format!("Running every {} ms...", self.cadence.as_millis());
    }

    pub fn pause(&mut self) {
        self.sim.stop();
        self.status = format!("Paused at step {}.", self.sim.steps());
    }

    /// One beat of continuous running.
    pub fn tick(&mut self) {
        if let Err(e) = self.sim.tick() {
            self.status = format!("Error: {}", e);
        }
    }

    /// Toggle the selected switch.
    pub fn toggle_selected(&mut self) {
        let ids = self.switch_ids();
        let Some(id) = ids.get(self.selected) else {
            self.status = "No switches in this circuit.".into();
            return;
        };
        match self.sim.toggle_switch(id.as_str()) {
            Ok(value) => self.status = format!("{} = {}", id, value),
            Err(e) => self.status = format!("Error: {}", e),
        }
    }

    pub fn select_next(&mut self) {
        let count = self.switch_ids().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.switch_ids().len();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    /// Restore the circuit as loaded.
    pub fn reset(&mut self) {
        self.sim = Simulator::new(self.initial.clone());
        self.status = "Reset. Ready.".into();
    }
}

/// Run the bench on a circuit until the user quits.
pub fn run_bench(title: &str, circuit: Circuit, cadence: Duration) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = BenchApp::new(title, circuit, cadence);
    let mut last_step = Instant::now();

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') => {
                            app.sim.stop();
                            app.step();
                        }
                        KeyCode::Char('r') => {
                            app.run();
                            last_step = Instant::now();
                        }
                        KeyCode::Char('p') => app.pause(),
                        KeyCode::Char('t') | KeyCode::Char(' ') => app.toggle_selected(),
                        KeyCode::Char('x') => app.reset(),
                        KeyCode::Up => app.select_prev(),
                        KeyCode::Down => app.select_next(),
                        _ => {}
                    }
                }
            }
        }

        if app.sim.is_running() && last_step.elapsed() >= app.cadence {
            app.tick();
            last_step = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::samples;
    use crate::ternary::Trit;

    fn app() -> BenchApp {
        let circuit = samples::full_adder(Trit::Pos, Trit::Pos, Trit::Null).unwrap();
        BenchApp::new("adder", circuit, Duration::from_millis(100))
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app();
        assert_eq!(app.switch_ids().len(), 3);
        app.select_prev();
        assert_eq!(app.selected, 2);
        app.select_next();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_toggle_and_reset() {
        let mut app = app();
        app.select_next();
        app.toggle_selected();
        assert_eq!(app.status, "b = -1");
        app.step();
        assert_eq!(app.sim.probe("sum"), Ok(Trit::Null));

        app.reset();
        assert_eq!(app.sim.steps(), 0);
        app.step();
        assert_eq!(app.sim.probe("sum"), Ok(Trit::Neg));
    }

    #[test]
    fn test_tick_follows_run_state() {
        let mut app = app();
        app.tick();
        assert_eq!(app.sim.steps(), 0);
        app.run();
        app.tick();
        app.tick();
        assert_eq!(app.sim.steps(), 2);
        app.pause();
        app.tick();
        assert_eq!(app.sim.steps(), 2);
    }
}
