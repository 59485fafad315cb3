use log::info;
use stepper_panel::app::TITLE;
use stepper_panel::{PanelApp, icon, logging};

fn main() -> eframe::Result<()> {
    logging::init();
    info!("starting {TITLE}");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 700.0])
        .with_min_inner_size([900.0, 560.0])
        .with_title(TITLE);
    let options = eframe::NativeOptions {
        viewport: icon::with_optional_icon(viewport, icon::ICON_PATH),
        centered: true,
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(|cc| Ok(Box::new(PanelApp::new(cc)))),
    )
}
