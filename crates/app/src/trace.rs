use std::collections::VecDeque;

use egui_plot::PlotPoints;
use simcore::MotorMetrics;

/// Rolling window of readout samples for the telemetry plot
pub struct Trace {
    pub t: VecDeque<f64>,
    pub temperature: VecDeque<f64>,
    pub power: VecDeque<f64>,
    pub torque: VecDeque<f64>,
    capacity: usize,
    sample_dt: f64,
}

impl Trace {
    pub fn new(seconds: f64, sample_dt: f64) -> Self {
        let capacity = (seconds / sample_dt).ceil() as usize + 1;
        Self {
            t: VecDeque::with_capacity(capacity),
            temperature: VecDeque::with_capacity(capacity),
            power: VecDeque::with_capacity(capacity),
            torque: VecDeque::with_capacity(capacity),
            capacity,
            sample_dt,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Record `metrics` at time `t` unless the previous sample is closer than
    /// the sample interval. Returns whether a sample was stored.
    pub fn push(&mut self, t: f64, metrics: &MotorMetrics) -> bool {
        if let Some(&last) = self.t.back() {
            if t - last < self.sample_dt {
                return false;
            }
        }
        self.t.push_back(t);
        self.temperature.push_back(f64::from(metrics.temperature));
        self.power.push_back(f64::from(metrics.power));
        self.torque.push_back(f64::from(metrics.torque));
        self.trim_to_capacity();
        true
    }

    pub fn clear(&mut self) {
        self.t.clear();
        self.temperature.clear();
        self.power.clear();
        self.torque.clear();
    }

    fn trim_to_capacity(&mut self) {
        let mut trim = |v: &mut VecDeque<f64>| while v.len() > self.capacity { v.pop_front(); };
        trim(&mut self.t);
        trim(&mut self.temperature);
        trim(&mut self.power);
        trim(&mut self.torque);
    }

    pub fn line<'a>(points: &'a VecDeque<f64>, t: &'a VecDeque<f64>) -> PlotPoints<'a> {
        PlotPoints::from_iter(
            t.iter()
                .copied()
                .zip(points.iter().copied())
                .map(|(x, y)| [x, y])
        )
    }
}
