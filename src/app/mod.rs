//! `ShowroomApp`, the top-level egui application.
//!
//! - `boot`: runs the pipeline on a background thread
//! - `viewport`: camera, rendering and picking

pub mod boot;
pub mod viewport;

use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use brand_showroom::render::render_loop::{FrameInfo, RenderLoop};
use brand_showroom::{BootError, Showroom, ShowroomConfig};

use self::boot::BootResult;
use self::viewport::Viewport;

// ─── Application state ───────────────────────────────────────────────────────

pub enum AppState {
    Loading {
        rx: mpsc::Receiver<BootResult>,
        started: Instant,
    },
    Ready {
        showroom: Box<Showroom>,
        viewport: Viewport,
    },
    Failed(BootFailure),
}

/// What the error screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct BootFailure {
    pub phase: &'static str,
    pub message: String,
}

impl From<BootError> for BootFailure {
    fn from(e: BootError) -> Self {
        Self {
            phase: e.phase(),
            message: e.to_string(),
        }
    }
}

pub struct ShowroomApp {
    pub state: AppState,
    pub render_loop: RenderLoop,
    catalog: String,
}

impl ShowroomApp {
    pub fn new(ctx: &egui::Context, config: ShowroomConfig) -> Self {
        let render_loop = RenderLoop::new(config.frame_interval());
        let catalog = config.catalog.clone();
        Self {
            state: AppState::Loading {
                rx: boot::spawn(ctx, config),
                started: Instant::now(),
            },
            render_loop,
            catalog,
        }
    }

    fn check_boot(&mut self) {
        let AppState::Loading { rx, .. } = &self.state else {
            return;
        };
        if let Some(next) = poll_boot(rx) {
            self.state = next;
        }
    }
}

/// State after a boot poll, or None while still booting.
fn poll_boot(rx: &mpsc::Receiver<BootResult>) -> Option<AppState> {
    match rx.try_recv() {
        Ok(Ok(showroom)) => {
            let viewport = Viewport::new(&showroom);
            Some(AppState::Ready {
                showroom: Box::new(showroom),
                viewport,
            })
        }
        Ok(Err(e)) => Some(AppState::Failed(e.into())),
        Err(mpsc::TryRecvError::Empty) => None,
        Err(mpsc::TryRecvError::Disconnected) => {
            log::error!("Boot thread exited without a result");
            Some(AppState::Failed(BootFailure {
                phase: "boot",
                message: "the boot thread stopped without a result".to_string(),
            }))
        }
    }
}

// ─── Drawing ─────────────────────────────────────────────────────────────────

fn draw_status(ui: &mut egui::Ui, state: &AppState, catalog: &str, frame: &FrameInfo) {
    ui.horizontal(|ui| {
        match state {
            AppState::Loading { started, .. } => {
                ui.spinner();
                ui.label(format!(
                    "Loading {} ({:.1}s)",
                    catalog,
                    started.elapsed().as_secs_f32()
                ));
            }
            AppState::Ready { showroom, viewport } => {
                let report = &showroom.report;
                ui.label(format!("{} brands", showroom.catalog.len()));
                if report.placeholders() > 0 {
                    ui.separator();
                    ui.label(format!("{} placeholder logos", report.placeholders()));
                }
                ui.separator();
                ui.label(format!("engine: {}", report.engine_name));
                if let Some(item) = viewport.hovered() {
                    ui.separator();
                    ui.strong(item.display_name.as_str());
                    ui.label(item.target_url.as_str());
                }
            }
            AppState::Failed(_) => {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), "Boot failed");
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("{:.1} ms", frame.dt.as_secs_f32() * 1000.0));
        });
    });
}

fn draw_failure(ui: &mut egui::Ui, failure: &BootFailure) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        ui.heading("The showroom could not be opened");
        ui.add_space(8.0);
        ui.label(format!("Failed while loading the {}.", failure.phase));
        ui.add_space(4.0);
        ui.monospace(failure.message.as_str());
    });
}

fn draw_central(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| match state {
            AppState::Loading { .. } => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            AppState::Ready { showroom, viewport } => {
                if let Some(url) = viewport.show(ui, showroom) {
                    ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
                }
            }
            AppState::Failed(e) => draw_failure(ui, e),
        });
}

impl eframe::App for ShowroomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_boot();

        let Self {
            state,
            render_loop,
            catalog,
        } = self;
        let interval = render_loop_interval(state);

        render_loop.tick(
            |_| {
                if let Some(interval) = interval {
                    ctx.request_repaint_after(interval);
                }
            },
            |frame| {
                egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                    draw_status(ui, state, catalog, frame);
                });
                draw_central(ctx, state);
            },
        );
    }
}

/// Repaint cadence: poll while booting, idle once failed.
fn render_loop_interval(state: &AppState) -> Option<std::time::Duration> {
    match state {
        AppState::Loading { .. } => Some(std::time::Duration::from_millis(100)),
        AppState::Ready { showroom, .. } => Some(showroom.context.config.frame_interval()),
        AppState::Failed(_) => None,
    }
}
