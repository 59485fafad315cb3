//! Control of the simulated stepper motor
//!
//! This crate provides:
//! - `StepperController`, the owner of the motor state and its transitions
//! - the animation driver thread that paces continuous stepping
//! - the error type returned when the driver cannot be started

pub mod driver;
pub mod error;
pub mod motor_controller;

pub use driver::{DriverEvent, NoRedraw, RedrawSink, TICK_BACKLOG, step_period};
pub use error::ControlError;
pub use motor_controller::*;
