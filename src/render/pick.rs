//! Pointer picking: screen point → ray → nearest hit → brand item.

use std::sync::Arc;

use glam::Vec2;

use super::camera::Camera;
use super::scene::{NodeHandle, Scene};
use super::scene_index::SceneIndex;
use crate::catalog::BrandItem;
use crate::engine::Engine;

/// Screen pixel to NDC: [-1, 1] on both axes, +Y up. None for an empty
/// viewport.
pub fn normalize_pointer(x: f32, y: f32, width: f32, height: f32) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    Some(Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub hit: bool,
    pub item: Option<Arc<BrandItem>>,
    /// Node that was hit, when `hit` is true
    pub handle: Option<NodeHandle>,
    pub distance: Option<f32>,
}

impl PickResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            item: None,
            handle: None,
            distance: None,
        }
    }
}

/// Read-only query over a built scene. Picking never mutates anything;
/// the caller decides what an activation does.
pub struct PickController<'a> {
    engine: &'a dyn Engine,
    scene: &'a Scene,
    index: &'a SceneIndex,
    candidates: Option<&'a [NodeHandle]>,
}

impl<'a> PickController<'a> {
    pub fn new(engine: &'a dyn Engine, scene: &'a Scene, index: &'a SceneIndex) -> Self {
        Self {
            engine,
            scene,
            index,
            candidates: None,
        }
    }

    /// Only test these nodes. Results are the same as a full query as
    /// long as every interactive node is listed.
    pub fn with_candidates(mut self, candidates: &'a [NodeHandle]) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn pick(
        &self,
        pointer_x: f32,
        pointer_y: f32,
        viewport_width: f32,
        viewport_height: f32,
        camera: &Camera,
    ) -> PickResult {
        let Some(ndc) = normalize_pointer(pointer_x, pointer_y, viewport_width, viewport_height)
        else {
            return PickResult::miss();
        };
        let camera = Camera {
            aspect: viewport_width / viewport_height,
            ..*camera
        };
        self.pick_ndc(ndc, &camera)
    }

    /// Pick at a point already in NDC; `camera.aspect` must match the viewport.
    pub fn pick_ndc(&self, ndc: Vec2, camera: &Camera) -> PickResult {
        let ray = self.engine.ray_from_ndc(camera, ndc);
        let hits = self.engine.intersect(self.scene, &ray, self.candidates);

        // Only the nearest surface counts; anything behind it is occluded
        let Some(nearest) = hits.first() else {
            return PickResult::miss();
        };
        match self.index.lookup(self.scene, nearest.handle) {
            Some(item) => {
                log::trace!("Pick hit {:?} -> {}", nearest.handle, item.id);
                PickResult {
                    hit: true,
                    item: Some(item),
                    handle: Some(nearest.handle),
                    distance: Some(nearest.distance),
                }
            }
            None => PickResult::miss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::engine::SoftwareEngine;
    use crate::render::scene::{Material, Shape, Transform};
    use glam::Vec3;
    use url::Url;

    fn item(id: &str) -> Arc<BrandItem> {
        Arc::new(BrandItem {
            id: id.to_string(),
            display_name: id.to_string(),
            accent_color: Rgba::DEFAULT_ACCENT,
            target_url: Url::parse(&format!("https://{}.example/", id)).unwrap(),
            asset_locator: None,
        })
    }

    #[test]
    fn pointer_normalization_inverts_y() {
        assert_eq!(normalize_pointer(0.0, 0.0, 200.0, 100.0), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(normalize_pointer(200.0, 100.0, 200.0, 100.0), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(normalize_pointer(100.0, 50.0, 200.0, 100.0), Some(Vec2::ZERO));
        assert_eq!(normalize_pointer(1.0, 1.0, 0.0, 100.0), None);
    }

    struct Fixture {
        scene: Scene,
        index: SceneIndex,
        board: NodeHandle,
        blocker: NodeHandle,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let sign = scene.add(
            None,
            "sign",
            Transform::from_translation(Vec3::new(0.0, 0.0, -10.0)),
            Shape::Group,
            Material::default(),
        );
        let board = scene.add(
            Some(sign),
            "board",
            Transform::IDENTITY,
            Shape::Plane { size: Vec2::splat(2.0) },
            Material::default(),
        );
        // Unregistered box off to the side
        let blocker = scene.add(
            None,
            "blocker",
            Transform::from_translation(Vec3::new(3.0, 0.0, -5.0)),
            Shape::Box { size: Vec3::splat(1.0) },
            Material::default(),
        );
        let mut index = SceneIndex::new();
        index.register(sign, item("acme")).unwrap();
        Fixture {
            scene,
            index,
            board,
            blocker,
        }
    }

    #[test]
    fn center_click_resolves_sub_part_to_item() {
        let f = fixture();
        let engine = SoftwareEngine::single_threaded();
        let cam = Camera::look_at(Vec3::ZERO, Vec3::NEG_Z, 45.0, 1.0);
        let picker = PickController::new(&engine, &f.scene, &f.index);

        let result = picker.pick(50.0, 50.0, 100.0, 100.0, &cam);
        assert!(result.hit);
        assert_eq!(result.item.unwrap().id, "acme");
        assert_eq!(result.handle, Some(f.board));
    }

    #[test]
    fn empty_space_and_unregistered_nodes_miss() {
        let f = fixture();
        let engine = SoftwareEngine::single_threaded();
        let cam = Camera::look_at(Vec3::ZERO, Vec3::NEG_Z, 45.0, 1.0);
        let picker = PickController::new(&engine, &f.scene, &f.index);

        // Top-left corner looks past everything
        assert_eq!(picker.pick(0.0, 0.0, 100.0, 100.0, &cam), PickResult::miss());

        // Aim straight at the blocker
        let toward_blocker = Camera::look_at(Vec3::ZERO, Vec3::new(3.0, 0.0, -5.0), 45.0, 1.0);
        let result = picker.pick_ndc(Vec2::ZERO, &toward_blocker);
        assert!(!result.hit);
        assert!(result.item.is_none());
        let ray = engine.ray_from_ndc(&toward_blocker, Vec2::ZERO);
        assert_eq!(engine.intersect(&f.scene, &ray, None)[0].handle, f.blocker);
    }

    #[test]
    fn candidate_restriction_skips_non_interactive_occluders() {
        let mut f = fixture();
        // Wall between camera and board, not a candidate
        f.scene.add(
            None,
            "wall",
            Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)),
            Shape::Plane { size: Vec2::splat(1.0) },
            Material::default(),
        );
        let engine = SoftwareEngine::single_threaded();
        let cam = Camera::look_at(Vec3::ZERO, Vec3::NEG_Z, 45.0, 1.0);

        let full = PickController::new(&engine, &f.scene, &f.index);
        assert!(!full.pick_ndc(Vec2::ZERO, &cam).hit);

        let candidates = [f.board];
        let restricted = PickController::new(&engine, &f.scene, &f.index).with_candidates(&candidates);
        assert!(restricted.pick_ndc(Vec2::ZERO, &cam).hit);
    }
}
