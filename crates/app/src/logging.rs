use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, SimpleLogger, TermLogger, TerminalMode};

/// Crates whose records reach the terminal; egui/winit chatter is filtered out
const LOGGED_CRATES: [&str; 3] = ["stepper_panel", "control", "electrical"];

pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the terminal logger, or a plain stderr logger when no terminal is attached.
pub fn init() {
    let mut builder = ConfigBuilder::new();
    for name in LOGGED_CRATES {
        builder.add_filter_allow_str(name);
    }
    let config = builder.build();

    let level = default_level();
    if TermLogger::init(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        let _ = SimpleLogger::init(level, config);
    }
}
