//! Shared state types for the stepper panel simulator

pub mod config;
pub mod traits;

pub use config::StepperConfig;
pub use traits::*;
