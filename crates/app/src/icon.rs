//! Optional window icon

use std::path::Path;
use std::sync::Arc;

use egui::{IconData, ViewportBuilder};
use log::{debug, info};

use crate::error::AppError;

/// Icon looked up next to the working directory at startup
pub const ICON_PATH: &str = "image.png";

pub fn load_icon(path: impl AsRef<Path>) -> Result<IconData, AppError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AppError::IconRead {
        path: path.to_path_buf(),
        source,
    })?;
    eframe::icon_data::from_png_bytes(&bytes).map_err(|err| AppError::IconDecode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Attach the icon at `path` if it loads; otherwise leave the viewport as is.
pub fn with_optional_icon(viewport: ViewportBuilder, path: impl AsRef<Path>) -> ViewportBuilder {
    match load_icon(path) {
        Ok(icon) => {
            info!("window icon loaded ({}x{})", icon.width, icon.height);
            viewport.with_icon(Arc::new(icon))
        }
        Err(err) => {
            debug!("running without window icon: {err}");
            viewport
        }
    }
}
