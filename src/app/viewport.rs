//! The 3-D view: orbit camera, offscreen render to a texture, hover
//! highlight and click activation.

use std::sync::Arc;

use eframe::egui;
use url::Url;

use brand_showroom::render::camera::CameraParams;
use brand_showroom::{BrandItem, Showroom};

// Drag radians per point, scroll units per point
const ORBIT_SPEED: f32 = 0.01;
const DOLLY_SPEED: f32 = 0.02;

pub struct Viewport {
    params: CameraParams,
    texture: Option<egui::TextureHandle>,
    dirty: bool,
    dragging: bool,
    hovered: Option<Arc<BrandItem>>,
    last_size: egui::Vec2,
}

impl Viewport {
    pub fn new(showroom: &Showroom) -> Self {
        Self {
            params: showroom.camera_params(),
            texture: None,
            dirty: true,
            dragging: false,
            hovered: None,
            last_size: egui::Vec2::ZERO,
        }
    }

    pub fn hovered(&self) -> Option<&BrandItem> {
        self.hovered.as_deref()
    }

    /// Draw the view into the remaining space. Returns the link of an item
    /// the user clicked this frame.
    pub fn show(&mut self, ui: &mut egui::Ui, showroom: &Showroom) -> Option<Url> {
        let response = ui.allocate_response(
            ui.available_size(),
            egui::Sense::click_and_drag().union(egui::Sense::hover()),
        );
        let rect = response.rect;
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return None;
        }
        if rect.size() != self.last_size {
            self.last_size = rect.size();
            self.dirty = true;
        }

        // Drag to orbit
        if response.dragged() {
            let delta = response.drag_delta();
            self.params.orbit(-delta.x * ORBIT_SPEED, delta.y * ORBIT_SPEED);
            self.dirty = true;
            self.dragging = true;
        } else if self.dragging {
            self.dragging = false;
            self.dirty = true;
        }

        // Scroll to dolly
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.params.dolly(-scroll * DOLLY_SPEED);
                self.dirty = true;
            }
        }

        let aspect = rect.width() / rect.height();
        let camera = showroom.camera(&self.params, aspect);
        let picker = showroom.picker();
        let local = |pos: egui::Pos2| pos - rect.min;

        // Hover: highlight only, never navigate
        let hovered = if self.dragging {
            None
        } else {
            response.hover_pos().and_then(|pos| {
                let p = local(pos);
                picker.pick(p.x, p.y, rect.width(), rect.height(), &camera).item
            })
        };
        let hovered_id = hovered.as_ref().map(|item| item.id.as_str());
        if hovered_id != self.hovered.as_ref().map(|item| item.id.as_str()) {
            self.dirty = true;
        }
        self.hovered = hovered;
        if self.hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let mut activated = None;
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let p = local(pos);
                let result = picker.pick(p.x, p.y, rect.width(), rect.height(), &camera);
                if let Some(item) = result.item {
                    log::info!("Activated {} -> {}", item.id, item.target_url);
                    activated = Some(item.target_url.clone());
                }
            }
        }

        if self.dirty || self.texture.is_none() {
            self.render(ui.ctx(), showroom, aspect);
        }

        if let Some(tex) = &self.texture {
            ui.painter().image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        activated
    }

    fn render(&mut self, ctx: &egui::Context, showroom: &Showroom, aspect: f32) {
        let config = &showroom.context.config.render;
        // Half resolution while the camera is moving
        let height = if self.dragging {
            (config.height / 2).max(1)
        } else {
            config.height
        };
        let width = ((height as f32 * aspect).round() as u32).max(1);

        let camera = showroom.camera(&self.params, width as f32 / height as f32);
        let frame = showroom.render(&camera, width, height, self.hovered.as_deref());
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.rgba,
        );

        match &mut self.texture {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("showroom", image, egui::TextureOptions::LINEAR))
            }
        }
        self.dirty = false;
    }
}
