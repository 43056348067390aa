//! Background boot. The pipeline does blocking I/O, so it never runs on
//! the UI thread.

use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use brand_showroom::{BootError, Showroom, ShowroomConfig, ShowroomPipeline};

pub type BootResult = Result<Showroom, BootError>;

/// Start booting. The receiver yields exactly one result; the UI is woken
/// when it arrives.
pub fn spawn(ctx: &egui::Context, config: ShowroomConfig) -> mpsc::Receiver<BootResult> {
    let (tx, rx) = mpsc::channel();
    let ctx = ctx.clone();

    std::thread::spawn(move || {
        let started = Instant::now();
        let result = ShowroomPipeline::new(config).boot();
        match &result {
            Ok(showroom) => log::info!(
                "Showroom ready in {:.0?}: {} items, {} placeholders, engine {}",
                started.elapsed(),
                showroom.catalog.len(),
                showroom.report.placeholders(),
                showroom.report.engine_name,
            ),
            Err(e) => log::debug!("Boot aborted in the {} phase", e.phase()),
        }
        let _ = tx.send(result);
        ctx.request_repaint();
    });

    rx
}
