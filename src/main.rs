mod app;

use std::path::Path;

use eframe::egui;

use brand_showroom::ShowroomConfig;

use crate::app::ShowroomApp;

const CONFIG_FILE: &str = "showroom.json";
const TITLE: &str = "Brand Showroom";

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = ShowroomConfig::load_or_default(Path::new(CONFIG_FILE));
    log::info!("Catalog: {}", config.catalog);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.render.width as f32, config.render.height as f32 + 32.0])
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(ShowroomApp::new(&cc.egui_ctx, config)))),
    )
}
