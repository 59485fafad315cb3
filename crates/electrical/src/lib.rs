//! Simulated electrical/thermal readouts of the stepper motor

pub mod metrics;

pub use metrics::MetricModel;
