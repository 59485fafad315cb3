use std::sync::Arc;
use std::time::{Duration, Instant};

use control::{RedrawSink, StepperController};
use log::error;
use simcore::StepperConfig;

use crate::panels::{self, Command};
use crate::theme;
use crate::trace::Trace;

pub const TITLE: &str = "STEPPER MOTOR CONTROL v2.0";

/// Repaint interval keeping the status pulse alive while running
const PULSE_INTERVAL: Duration = Duration::from_millis(100);
/// Telemetry window (s)
const TRACE_WINDOW_S: f64 = 30.0;
/// Telemetry sample interval (s)
const TRACE_SAMPLE_DT: f64 = 0.1;

pub struct PanelApp {
    controller: StepperController,
    // Slider position; the controller holds the clamped value
    speed_input: u32,
    trace: Trace,
    sink: Arc<dyn RedrawSink>,
    started: Instant,
    commands: Vec<Command>,
}

impl PanelApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::apply(&cc.egui_ctx);
        Self::with_sink(Arc::new(cc.egui_ctx.clone()))
    }

    /// App state without a window, redraw requests going to `sink`
    pub fn with_sink(sink: Arc<dyn RedrawSink>) -> Self {
        let controller = StepperController::new(StepperConfig::default());
        let mut app = Self {
            speed_input: controller.state().speed,
            controller,
            trace: Trace::new(TRACE_WINDOW_S, TRACE_SAMPLE_DT),
            sink,
            started: Instant::now(),
            commands: Vec::new(),
        };
        app.sample();
        app
    }

    pub fn controller(&self) -> &StepperController {
        &self.controller
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetSpeed(speed) => {
                self.controller.set_speed(speed);
                self.speed_input = self.controller.state().speed;
            }
            Command::SetDirection(direction) => self.controller.set_direction(direction),
            Command::Start => {
                if let Err(err) = self.controller.start(Arc::clone(&self.sink)) {
                    error!("{err}");
                }
            }
            Command::Stop => self.controller.stop(),
            Command::Reset => {
                self.controller.reset();
                self.trace.clear();
                self.sample();
            }
            Command::Step(steps) => {
                self.controller.manual_step(steps);
            }
        }
    }

    /// Apply pending driver ticks; returns how many steps were taken
    pub fn advance(&mut self) -> usize {
        let applied = self.controller.poll();
        if applied > 0 {
            self.sample();
        }
        applied
    }

    fn sample(&mut self) {
        let t = self.started.elapsed().as_secs_f64();
        self.trace.push(t, &self.controller.state().metrics);
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance();

        let snapshot = self.controller.snapshot();
        let config = self.controller.config().clone();
        let mut commands = std::mem::take(&mut self.commands);

        egui::SidePanel::left("left_column")
            .resizable(false)
            .exact_width(ctx.screen_rect().width() / 3.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::control_panel(ui, &snapshot, &mut self.speed_input, &config, &mut commands);
                    panels::stats_panel(ui, &snapshot, &mut commands);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                panels::visualization_panel(ui, &snapshot, &config);
                ui.columns(2, |cols| {
                    panels::status_panel(&mut cols[0], &snapshot);
                    panels::telemetry_panel(&mut cols[1], &self.trace);
                });
            });
        });

        for command in commands.drain(..) {
            self.apply(command);
        }
        self.commands = commands;

        if self.controller.is_running() {
            ctx.request_repaint_after(PULSE_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use control::NoRedraw;
    use simcore::Direction;

    fn app() -> PanelApp {
        PanelApp::with_sink(Arc::new(NoRedraw))
    }

    #[test]
    fn test_slider_value_clamped_back() {
        let mut app = app();
        app.apply(Command::SetSpeed(0));
        assert_eq!(app.speed_input, 1);
        app.apply(Command::SetSpeed(720));
        assert_eq!(app.speed_input, 500);
        assert_eq!(app.controller().state().speed, 500);
    }

    #[test]
    fn test_step_buttons_ignored_while_running() {
        let mut app = app();
        app.apply(Command::Step(10));
        app.apply(Command::Step(-1));
        assert_eq!(app.controller().state().current_step, 9);

        app.apply(Command::SetSpeed(1));
        app.apply(Command::Start);
        app.apply(Command::Start);
        assert!(app.controller().is_running());
        app.advance();
        let before = *app.controller().state();
        app.apply(Command::Step(10));
        assert_eq!(app.controller().state().current_step, before.current_step);
        assert_eq!(app.controller().state().total_steps, before.total_steps);

        app.apply(Command::Stop);
        assert!(!app.controller().is_running());
    }

    #[test]
    fn test_reset_clears_counters_and_trace() {
        let mut app = app();
        app.apply(Command::SetDirection(Direction::Ccw));
        app.apply(Command::Step(-5));
        app.apply(Command::Reset);

        let state = app.controller().state();
        assert_eq!(state.current_step, 0);
        assert_eq!(state.total_steps, 0);
        assert!(!state.running);
        assert_eq!(state.direction, Direction::Ccw);
        assert_eq!(app.trace().len(), 1);
    }
}
