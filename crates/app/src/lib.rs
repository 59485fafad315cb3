//! Desktop front end of the stepper panel simulator

pub mod app;
pub mod color;
pub mod error;
pub mod icon;
pub mod logging;
pub mod panels;
pub mod rotor;
pub mod theme;
pub mod trace;

pub use app::PanelApp;
