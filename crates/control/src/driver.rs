//! Animation Driver
//!
//! A background thread that paces the motor at `1/speed` seconds per step.
//! It never touches the motor state: each period it posts a [`DriverEvent`]
//! to the controller's queue and asks the UI for a redraw. The controller
//! applies the step on the UI thread when it drains the queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

/// Something that can wake the UI thread after an event was posted
pub trait RedrawSink: Send + Sync + 'static {
    fn request_redraw(&self);
}

impl RedrawSink for egui::Context {
    fn request_redraw(&self) {
        self.request_repaint();
    }
}

/// Sink for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedraw;

impl RedrawSink for NoRedraw {
    fn request_redraw(&self) {}
}

/// Event posted by the driver thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// One step period elapsed
    Tick { generation: u64 },
    /// The driver observed the stop and left its loop
    Exited { generation: u64 },
}

/// Ticks the queue holds before further ticks are dropped; bounds the burst
/// applied when the UI has not drained the queue for a while
pub const TICK_BACKLOG: usize = 64;

/// Step period for a speed in steps per second
pub fn step_period(speed: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(speed.max(1)))
}

/// Handle to one run of the driver thread
#[derive(Debug)]
pub struct DriverHandle {
    generation: u64,
    alive: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl DriverHandle {
    /// Spawn a driver for `generation`.
    ///
    /// `speed` is re-read every period so slider changes take effect on the
    /// next sleep.
    pub fn spawn(
        generation: u64,
        speed: Arc<AtomicU32>,
        events: SyncSender<DriverEvent>,
        sink: Arc<dyn RedrawSink>,
    ) -> std::io::Result<Self> {
        let alive = Arc::new(AtomicBool::new(true));
        let thread_alive = Arc::clone(&alive);

        let thread = thread::Builder::new()
            .name(format!("stepper-driver-{generation}"))
            .spawn(move || run(generation, thread_alive, speed, events, sink))?;

        Ok(Self {
            generation,
            alive,
            thread: Some(thread),
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|thread| thread.is_finished())
    }

    /// Ask the thread to leave its loop after the current sleep.
    ///
    /// Does not join: the UI thread must not block for up to one period.
    pub fn cancel(mut self) {
        self.alive.store(false, Ordering::Release);
        self.thread.take();
    }

    /// Cancel and wait for the thread to exit
    #[cfg(test)]
    pub(crate) fn join(mut self) {
        self.alive.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

fn run(
    generation: u64,
    alive: Arc<AtomicBool>,
    speed: Arc<AtomicU32>,
    events: SyncSender<DriverEvent>,
    sink: Arc<dyn RedrawSink>,
) {
    debug!("driver {generation} started");

    while alive.load(Ordering::Acquire) {
        match events.try_send(DriverEvent::Tick { generation }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!("driver {generation} dropped a tick, queue full"),
            // Controller is gone
            Err(TrySendError::Disconnected(_)) => return,
        }
        sink.request_redraw();

        thread::sleep(step_period(speed.load(Ordering::Relaxed)));
    }

    debug!("driver {generation} exited");
    let _ = events.try_send(DriverEvent::Exited { generation });
    sink.request_redraw();
}
