//! Rendering engine interface and the immutable boot context.
//!
//! The showroom core never talks to a renderer directly; it goes through
//! [`Engine`], which is resolved at boot like any other required module.

pub mod pipeline;
pub mod software;

use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::config::ShowroomConfig;
use crate::net::image::ImageData;
use crate::render::camera::{Camera, Ray};
use crate::render::scene::{NodeHandle, Scene};
use crate::resolve::{FnSource, ResourceRequest, SharedSource, SourceError};

pub use software::SoftwareEngine;

/// One ray/geometry intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub handle: NodeHandle,
    /// Distance along the (unit) ray
    pub distance: f32,
    pub point: Vec3,
    /// Texture coordinate at the hit, v = 0 at the top
    pub uv: Vec2,
    /// World-space surface normal
    pub normal: Vec3,
}

pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// Ray from the camera through a point in NDC.
    fn ray_from_ndc(&self, camera: &Camera, ndc: Vec2) -> Ray {
        camera.ray(ndc)
    }

    /// NDC of a world point, None when behind the camera.
    fn project(&self, camera: &Camera, point: Vec3) -> Option<Vec2> {
        camera.project(point)
    }

    /// Every hit along `ray`, nearest first. With `candidates`, only those
    /// nodes are tested.
    fn intersect(&self, scene: &Scene, ray: &Ray, candidates: Option<&[NodeHandle]>) -> Vec<Hit>;

    /// Render one RGBA frame. Highlighted nodes and their descendants are
    /// drawn brighter.
    fn draw(
        &self,
        scene: &Scene,
        camera: &Camera,
        width: u32,
        height: u32,
        highlighted: &[NodeHandle],
    ) -> ImageData;
}

/// Built once at boot and shared read-only by everything after it.
#[derive(Clone)]
pub struct EngineContext {
    pub engine: Arc<dyn Engine>,
    /// Index of the engine source that won resolution
    pub engine_source: usize,
    pub config: Arc<ShowroomConfig>,
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("engine", &self.engine.name())
            .field("engine_source", &self.engine_source)
            .field("config", &self.config)
            .finish()
    }
}

/// Engines that ship with the crate, best first: a dedicated render pool,
/// then a single-threaded fallback that cannot fail.
pub fn bundled_engine_sources(threads: usize) -> Vec<SharedSource<Arc<dyn Engine>>> {
    vec![
        Arc::new(FnSource::new(
            "software-parallel",
            move |_: &ResourceRequest, _| {
                SoftwareEngine::parallel(threads)
                    .map(|e| Arc::new(e) as Arc<dyn Engine>)
                    .map_err(|e| SourceError::Unavailable(e.to_string()))
            },
        )),
        Arc::new(FnSource::new(
            "software-single",
            |_: &ResourceRequest, _| Ok(Arc::new(SoftwareEngine::single_threaded()) as Arc<dyn Engine>),
        )),
    ]
}
