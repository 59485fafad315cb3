//! Stepper Controller
//!
//! Owns the single [`MotorState`] and applies the panel's transitions to it:
//! speed and direction changes, start/stop/reset, manual stepping, and the
//! per-tick update posted by the animation driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

use electrical::MetricModel;
use log::{debug, info, warn};
use simcore::{Direction, MotorSnapshot, MotorState, StepperConfig};

use crate::driver::{DriverEvent, DriverHandle, RedrawSink, TICK_BACKLOG};
use crate::error::ControlError;

/// Motor state plus the machinery that animates it
pub struct StepperController {
    config: StepperConfig,
    model: MetricModel,
    /// `state.running` is the only running flag; it is true exactly while
    /// `driver` holds a live run
    state: MotorState,
    /// Speed published to the driver for its sleep period
    speed: Arc<AtomicU32>,
    events_tx: SyncSender<DriverEvent>,
    events_rx: Receiver<DriverEvent>,
    /// Generation of the most recently started driver
    generation: u64,
    driver: Option<DriverHandle>,
}

impl Default for StepperController {
    fn default() -> Self {
        Self::new(StepperConfig::default())
    }
}

impl StepperController {
    pub fn new(config: StepperConfig) -> Self {
        let state = MotorState::new(&config);
        let model = MetricModel::from_config(&config);
        let (events_tx, events_rx) = sync_channel(TICK_BACKLOG);

        Self {
            speed: Arc::new(AtomicU32::new(state.speed)),
            config,
            model,
            state,
            events_tx,
            events_rx,
            generation: 0,
            driver: None,
        }
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    pub fn state(&self) -> &MotorState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Set the speed in steps per second, clamped into the configured range.
    ///
    /// A running driver picks the new period up after its current sleep.
    pub fn set_speed(&mut self, speed: u32) {
        let speed = self.config.clamp_speed(speed);
        self.state.speed = speed;
        self.speed.store(speed, Ordering::Relaxed);
        debug!("speed set to {speed} steps/s");
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.state.direction = direction;
        debug!("direction set to {}", direction.label());
    }

    /// Start continuous stepping.
    ///
    /// Check and set of the running flag happen under the exclusive borrow,
    /// so a second start can never launch a second driver. Returns
    /// `Ok(false)` when the motor was already running.
    pub fn start(&mut self, sink: Arc<dyn RedrawSink>) -> Result<bool, ControlError> {
        if self.state.running {
            return Ok(false);
        }

        let generation = self.generation + 1;
        match DriverHandle::spawn(generation, Arc::clone(&self.speed), self.events_tx.clone(), sink) {
            Ok(handle) => {
                self.generation = generation;
                self.driver = Some(handle);
                self.state.running = true;
                info!("motor started at {} steps/s {}", self.state.speed, self.state.direction.label());
                Ok(true)
            }
            Err(err) => {
                warn!("could not start motor: {err}");
                Err(ControlError::DriverSpawn(err))
            }
        }
    }

    /// Stop continuous stepping. Idempotent.
    pub fn stop(&mut self) {
        if self.state.running {
            info!("motor stopped at step {}", self.state.current_step);
        }
        self.state.running = false;
        if let Some(driver) = self.driver.take() {
            driver.cancel();
        }
    }

    /// Stop and return the counters and readouts to their startup values.
    ///
    /// Speed and direction are kept.
    pub fn reset(&mut self) {
        self.stop();
        self.state.current_step = 0;
        self.state.total_steps = 0;
        self.state.metrics = self.model.base();
        debug!("motor reset");
    }

    /// Move by `steps` while stopped.
    ///
    /// Ignored while running, and when either counter would overflow.
    pub fn manual_step(&mut self, steps: i64) -> bool {
        if self.state.running {
            return false;
        }
        match (
            self.state.current_step.checked_add(steps),
            self.state.total_steps.checked_add(steps.unsigned_abs()),
        ) {
            (Some(current), Some(total)) => {
                self.state.current_step = current;
                self.state.total_steps = total;
                true
            }
            _ => {
                warn!("manual step of {steps} would overflow the step counters");
                false
            }
        }
    }

    /// Drain the driver queue, applying one step per tick of the live run.
    ///
    /// The queue holds at most `TICK_BACKLOG` ticks; ticks the driver posted
    /// while it was full are lost. Returns the number of steps applied.
    pub fn poll(&mut self) -> usize {
        let live = self.driver.as_ref().map(DriverHandle::generation);
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                DriverEvent::Tick { generation } => {
                    if live == Some(generation) && self.apply_tick() {
                        applied += 1;
                    }
                }
                DriverEvent::Exited { generation } => {
                    debug!("driver {generation} confirmed exit");
                }
            }
        }
        applied
    }

    /// One animation step: advance by the direction sign, count it, and
    /// recompute the readouts. Skipped when a counter would overflow.
    pub(crate) fn apply_tick(&mut self) -> bool {
        let (Some(current), Some(total)) = (
            self.state.current_step.checked_add(self.state.direction.sign()),
            self.state.total_steps.checked_add(1),
        ) else {
            return false;
        };
        self.state.current_step = current;
        self.state.total_steps = total;
        self.state.metrics = self.model.evaluate(self.state.speed, total);
        true
    }

    /// Rotor angle in degrees for the current position
    pub fn rotor_angle_deg(&self) -> f64 {
        self.state.current_step as f64 * self.config.step_angle_deg
    }

    /// Energized coil: one coil per two full steps, cycling through the stator
    pub fn active_coil(&self) -> usize {
        let coils = self.config.coil_count.max(1) as i64;
        self.state.current_step.div_euclid(2).rem_euclid(coils) as usize
    }

    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            running: self.state.running,
            direction: self.state.direction,
            speed: self.state.speed,
            current_step: self.state.current_step,
            total_steps: self.state.total_steps,
            metrics: self.state.metrics,
            rotor_angle_deg: self.rotor_angle_deg(),
            active_coil: self.active_coil(),
            load: self.model.load(self.state.speed),
        }
    }
}

impl Drop for StepperController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::NoRedraw;
    use std::thread;
    use std::time::Duration;

    fn sink() -> Arc<dyn RedrawSink> {
        Arc::new(NoRedraw)
    }

    #[test]
    fn test_starts_with_panel_defaults() {
        let ctrl = StepperController::default();
        let state = ctrl.state();
        assert!(!state.running);
        assert_eq!(state.direction, Direction::Cw);
        assert_eq!(state.speed, 100);
        assert_eq!(state.metrics.temperature, 42);
        assert_eq!(state.metrics.power, 120);
        assert_eq!(state.metrics.torque, 75);
    }

    #[test]
    fn test_set_speed_clamps() {
        let mut ctrl = StepperController::default();
        for (input, expected) in [(0, 1), (1, 1), (250, 250), (500, 500), (501, 500), (u32::MAX, 500)] {
            ctrl.set_speed(input);
            assert_eq!(ctrl.state().speed, expected);
            assert_eq!(ctrl.speed.load(Ordering::Relaxed), expected);
        }
    }

    #[test]
    fn test_set_speed_leaves_position_alone() {
        let mut ctrl = StepperController::default();
        ctrl.manual_step(3);
        ctrl.set_speed(300);
        assert_eq!(ctrl.state().current_step, 3);
        assert!(!ctrl.is_running());
    }

    #[test]
    fn test_manual_step_counts_magnitude() {
        let mut ctrl = StepperController::default();
        assert!(ctrl.manual_step(10));
        assert!(ctrl.manual_step(-1));
        assert!(ctrl.manual_step(-10));
        assert_eq!(ctrl.state().current_step, -1);
        assert_eq!(ctrl.state().total_steps, 21);
    }

    #[test]
    fn test_manual_step_ignored_while_running() {
        let mut ctrl = StepperController::default();
        ctrl.manual_step(4);
        ctrl.set_speed(1);
        assert!(ctrl.start(sink()).unwrap());
        ctrl.poll();
        let before = *ctrl.state();

        assert!(!ctrl.manual_step(10));
        assert_eq!(ctrl.state().current_step, before.current_step);
        assert_eq!(ctrl.state().total_steps, before.total_steps);
        ctrl.stop();
    }

    #[test]
    fn test_manual_step_overflow_ignored() {
        let mut ctrl = StepperController::default();
        assert!(ctrl.manual_step(i64::MAX));
        let before = *ctrl.state();

        assert!(!ctrl.manual_step(1));
        assert_eq!(ctrl.state().current_step, before.current_step);
        assert_eq!(ctrl.state().total_steps, before.total_steps);

        // stepping back down still works
        assert!(ctrl.manual_step(-1));
        assert_eq!(ctrl.state().current_step, i64::MAX - 1);
    }

    #[test]
    fn test_ticks_follow_direction() {
        let mut ctrl = StepperController::default();
        for _ in 0..7 {
            ctrl.apply_tick();
        }
        assert_eq!(ctrl.state().current_step, 7);
        assert_eq!(ctrl.state().total_steps, 7);

        ctrl.set_direction(Direction::Ccw);
        for _ in 0..10 {
            ctrl.apply_tick();
        }
        assert_eq!(ctrl.state().current_step, -3);
        assert_eq!(ctrl.state().total_steps, 17);
    }

    #[test]
    fn test_five_ticks_at_default_speed() {
        let mut ctrl = StepperController::default();
        for _ in 0..5 {
            ctrl.apply_tick();
        }
        let state = ctrl.state();
        assert_eq!(state.current_step, 5);
        assert_eq!(state.total_steps, 5);
        assert_eq!(state.metrics.temperature, 47);
        assert_eq!(state.metrics.power, 140);
        assert_eq!(state.metrics.torque, 80);
    }

    #[test]
    fn test_readouts_capped_after_long_run() {
        let mut ctrl = StepperController::default();
        ctrl.set_speed(500);
        for _ in 0..100_000 {
            ctrl.apply_tick();
        }
        assert_eq!(ctrl.state().metrics.temperature, 100);
        assert_eq!(ctrl.state().metrics.torque, 100);
        assert_eq!(ctrl.state().metrics.power, 220);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut ctrl = StepperController::default();
        ctrl.set_direction(Direction::Ccw);
        ctrl.set_speed(400);
        ctrl.manual_step(-42);
        for _ in 0..3 {
            ctrl.apply_tick();
        }
        ctrl.start(sink()).unwrap();

        ctrl.reset();
        let state = ctrl.state();
        assert!(!state.running);
        assert_eq!(state.current_step, 0);
        assert_eq!(state.total_steps, 0);
        assert_eq!(state.metrics, MetricModel::default().base());
        // speed and direction survive a reset
        assert_eq!(state.speed, 400);
        assert_eq!(state.direction, Direction::Ccw);

        // and a second reset is harmless
        ctrl.reset();
        assert_eq!(ctrl.state().current_step, 0);
    }

    #[test]
    fn test_double_start_spawns_one_driver() {
        let mut ctrl = StepperController::default();
        assert!(ctrl.start(sink()).unwrap());
        assert!(!ctrl.start(sink()).unwrap());
        assert_eq!(ctrl.generation, 1);
        ctrl.stop();
        ctrl.stop();
        assert!(!ctrl.is_running());
    }

    #[test]
    fn test_driver_advances_until_stopped() {
        let mut ctrl = StepperController::default();
        ctrl.set_speed(500);
        ctrl.start(sink()).unwrap();
        thread::sleep(Duration::from_millis(60));
        let applied = ctrl.poll();
        assert!(applied > 0);
        assert_eq!(ctrl.state().current_step, applied as i64);
        assert_eq!(ctrl.state().total_steps, applied as u64);

        ctrl.stop();
        let frozen = *ctrl.state();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ctrl.poll(), 0);
        assert_eq!(ctrl.state().current_step, frozen.current_step);
        assert_eq!(ctrl.state().total_steps, frozen.total_steps);
    }

    #[test]
    fn test_stale_generation_ignored_after_restart() {
        let mut ctrl = StepperController::default();
        ctrl.events_tx.send(DriverEvent::Tick { generation: 0 }).unwrap();
        ctrl.set_speed(1);
        ctrl.start(sink()).unwrap();
        // let the live driver post its immediate first tick
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ctrl.poll(), 1);
        ctrl.stop();
    }

    #[test]
    fn test_active_coil_cycles_every_two_steps() {
        let mut ctrl = StepperController::default();
        let mut coils = Vec::new();
        for _ in 0..9 {
            coils.push(ctrl.active_coil());
            ctrl.manual_step(1);
        }
        assert_eq!(coils, vec![0, 0, 1, 1, 2, 2, 3, 3, 0]);

        ctrl.reset();
        ctrl.manual_step(-1);
        assert_eq!(ctrl.active_coil(), 3);
        ctrl.manual_step(-2);
        assert_eq!(ctrl.active_coil(), 2);
    }

    #[test]
    fn test_snapshot_reports_angle_and_load() {
        let mut ctrl = StepperController::default();
        ctrl.manual_step(100);
        let snap = ctrl.snapshot();
        assert!((snap.rotor_angle_deg - 180.0).abs() < 1e-9);
        assert_eq!(snap.active_coil, 2);
        assert_eq!(snap.load, 20);
        assert!(!snap.running);
    }

    #[test]
    fn test_speed_change_reaches_running_driver() {
        let mut ctrl = StepperController::default();
        ctrl.set_speed(1);
        ctrl.start(sink()).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(ctrl.poll(), 1);

        // the driver is inside its one second sleep; once it wakes it paces at 2 ms
        ctrl.set_speed(500);
        thread::sleep(Duration::from_millis(1100));
        let applied = ctrl.poll();
        assert!(applied >= 10, "expected the faster period to apply, got {applied} steps");
        ctrl.stop();
    }

    #[test]
    fn test_backlog_bounded_when_not_polled() {
        let mut ctrl = StepperController::default();
        ctrl.set_speed(500);
        ctrl.start(sink()).unwrap();
        // roughly 200 periods pass without a poll
        thread::sleep(Duration::from_millis(400));

        let applied = ctrl.poll();
        assert!(applied > 0);
        assert!(applied <= TICK_BACKLOG, "applied {applied} queued steps");
        ctrl.stop();
    }

    #[test]
    fn test_dropping_controller_ends_driver() {
        let redraw = Arc::new(NoRedraw);
        let mut ctrl = StepperController::default();
        ctrl.set_speed(500);
        ctrl.start(redraw.clone()).unwrap();
        assert!(Arc::strong_count(&redraw) > 1);

        drop(ctrl);
        // the driver thread owns the other reference until it returns
        for _ in 0..50 {
            if Arc::strong_count(&redraw) == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(Arc::strong_count(&redraw), 1);
    }
}
