use serde::{Deserialize, Serialize};

use crate::config::StepperConfig;

/// Rotation direction of the rotor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Clockwise, positive step sign
    #[default]
    Cw,
    /// Counter-clockwise, negative step sign
    Ccw,
}

impl Direction {
    /// Signed step increment for one animation tick
    pub fn sign(self) -> i64 {
        match self {
            Direction::Cw => 1,
            Direction::Ccw => -1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Cw => "CW",
            Direction::Ccw => "CCW",
        }
    }
}

/// Simulated readouts derived from speed and cumulative steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorMetrics {
    /// Degrees Celsius, never above 100
    pub temperature: u32,
    /// Watts
    pub power: u32,
    /// Percent of rated torque, never above 100
    pub torque: u32,
}

impl MotorMetrics {
    pub fn base(config: &StepperConfig) -> Self {
        MotorMetrics {
            temperature: config.base_temperature,
            power: config.base_power,
            torque: config.base_torque,
        }
    }
}

impl Default for MotorMetrics {
    fn default() -> Self {
        MotorMetrics::base(&StepperConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorState {
    pub running: bool,
    pub direction: Direction,
    /// Steps per second, always within the configured speed range
    pub speed: u32,
    pub current_step: i64,
    pub total_steps: u64,
    pub metrics: MotorMetrics,
}

impl MotorState {
    pub fn new(config: &StepperConfig) -> Self {
        MotorState {
            running: false,
            direction: config.default_direction,
            speed: config.default_speed,
            current_step: 0,
            total_steps: 0,
            metrics: MotorMetrics::base(config),
        }
    }
}

impl Default for MotorState {
    fn default() -> Self {
        MotorState::new(&StepperConfig::default())
    }
}

/// Immutable view of the motor handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorSnapshot {
    pub running: bool,
    pub direction: Direction,
    pub speed: u32,
    pub current_step: i64,
    pub total_steps: u64,
    pub metrics: MotorMetrics,
    /// Rotor angle in degrees (current_step * step angle)
    pub rotor_angle_deg: f64,
    /// Index of the energized stator coil
    pub active_coil: usize,
    /// Load percentage shown on the load bar (0..=100)
    pub load: u32,
}
