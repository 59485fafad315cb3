//! Fixed simulator defaults and limits
//!
//! Nothing here is read from disk or the environment; the only runtime
//! knobs are the panel's slider and buttons.

use serde::{Deserialize, Serialize};

use crate::traits::Direction;

/// Defaults and limits shared by the controller, metric model and renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepperConfig {
    /// Lowest accepted speed (steps/s)
    pub min_speed: u32,
    /// Highest accepted speed (steps/s)
    pub max_speed: u32,
    /// Speed at startup (steps/s)
    pub default_speed: u32,
    /// Direction at startup
    pub default_direction: Direction,
    /// Temperature readout before any stepping (°C)
    pub base_temperature: u32,
    /// Power readout before any stepping (W)
    pub base_power: u32,
    /// Torque readout before any stepping (%)
    pub base_torque: u32,
    /// Rotor increment per full step (degrees)
    pub step_angle_deg: f64,
    /// Number of stator coils drawn and energized in turn
    pub coil_count: usize,
    /// Number of permanent magnets on the rotor
    pub magnet_count: usize,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            min_speed: 1,
            max_speed: 500,
            default_speed: 100,
            default_direction: Direction::Cw,
            base_temperature: 42,
            base_power: 120,
            base_torque: 75,
            step_angle_deg: 1.8,
            coil_count: 4,
            magnet_count: 8,
        }
    }
}

impl StepperConfig {
    /// Set the startup speed (clamped into the speed range)
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.default_speed = self.clamp_speed(speed);
        self
    }

    /// Set the startup direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.default_direction = direction;
        self
    }

    /// Set the accepted speed range
    pub fn with_speed_range(mut self, min: u32, max: u32) -> Self {
        self.min_speed = min.max(1);
        self.max_speed = max.max(self.min_speed);
        self.default_speed = self.clamp_speed(self.default_speed);
        self
    }

    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    /// Full steps per mechanical revolution
    pub fn steps_per_revolution(&self) -> u32 {
        (360.0 / self.step_angle_deg).round() as u32
    }
}
