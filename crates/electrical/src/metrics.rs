//! Derived motor readouts
//!
//! Temperature, power and torque have no physical model behind them; they are
//! illustrative integer functions of the commanded speed and the number of
//! steps taken so far.

use serde::{Deserialize, Serialize};
use simcore::{MotorMetrics, StepperConfig};

/// Coefficients of the readout model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricModel {
    pub base_temperature: u32,
    /// Speed divisor for the temperature rise (°C per `n` steps/s)
    pub temperature_speed_divisor: u32,
    /// Step divisor for the temperature rise (°C per `n` cumulative steps)
    pub temperature_steps_divisor: u64,
    pub base_power: u32,
    /// Speed divisor for the power rise (W per `n` steps/s)
    pub power_speed_divisor: u32,
    pub base_torque: u32,
    /// Speed divisor for the torque rise (% per `n` steps/s)
    pub torque_speed_divisor: u32,
    /// Speed divisor for the load bar (% per `n` steps/s)
    pub load_speed_divisor: u32,
    /// Ceiling of every percentage/temperature readout
    pub ceiling: u32,
}

impl Default for MetricModel {
    fn default() -> Self {
        MetricModel::from_config(&StepperConfig::default())
    }
}

impl MetricModel {
    pub fn from_config(config: &StepperConfig) -> Self {
        MetricModel {
            base_temperature: config.base_temperature,
            temperature_speed_divisor: 20,
            temperature_steps_divisor: 1000,
            base_power: config.base_power,
            power_speed_divisor: 5,
            base_torque: config.base_torque,
            torque_speed_divisor: 20,
            load_speed_divisor: 5,
            ceiling: 100,
        }
    }

    /// Readouts before the motor has stepped
    pub fn base(&self) -> MotorMetrics {
        MotorMetrics {
            temperature: self.base_temperature,
            power: self.base_power,
            torque: self.base_torque,
        }
    }

    pub fn temperature(&self, speed: u32, total_steps: u64) -> u32 {
        let rise = u64::from(speed / self.temperature_speed_divisor)
            + total_steps / self.temperature_steps_divisor;
        let temperature = u64::from(self.base_temperature).saturating_add(rise);
        temperature.min(u64::from(self.ceiling)) as u32
    }

    pub fn power(&self, speed: u32) -> u32 {
        self.base_power.saturating_add(speed / self.power_speed_divisor)
    }

    pub fn torque(&self, speed: u32) -> u32 {
        self.base_torque
            .saturating_add(speed / self.torque_speed_divisor)
            .min(self.ceiling)
    }

    /// Load percentage for the load bar
    pub fn load(&self, speed: u32) -> u32 {
        (speed / self.load_speed_divisor).min(self.ceiling)
    }

    /// Recompute all readouts after an animation tick
    pub fn evaluate(&self, speed: u32, total_steps: u64) -> MotorMetrics {
        MotorMetrics {
            temperature: self.temperature(speed, total_steps),
            power: self.power(speed),
            torque: self.torque(speed),
        }
    }
}
