//! Showroom configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! gives the stock showroom: 14-unit ring around (0, 2.5, 0), camera at
//! (0, 6.5, 15) with a 45° vertical field of view.

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec3;
use serde::Deserialize;

use crate::render::camera::CameraParams;
use crate::render::ring::{ArcSpan, RingOptions};
use crate::resolve::AssetBase;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub radius: f32,
    pub focal_point: [f32; 3],
    /// Y of each sign's base
    pub slot_height: f32,
    /// None spreads over the full circle
    pub arc_width_deg: Option<f32>,
    pub angular_offset_deg: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: 14.0,
            focal_point: [0.0, 2.5, 0.0],
            slot_height: 0.0,
            arc_width_deg: None,
            angular_offset_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fov_y_deg: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 6.5, 15.0],
            target: [0.0, 2.5, 0.0],
            fov_y_deg: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Offscreen frame size
    pub width: u32,
    pub height: u32,
    /// Render pool size, 0 = one per core
    pub threads: usize,
    pub frame_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            threads: 0,
            frame_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowroomConfig {
    /// Catalog locator (path or http(s) URL)
    pub catalog: String,
    /// Base for relative logo locators. Defaults to the catalog's directory.
    pub asset_base: Option<String>,
    /// Optional centerpiece model
    pub decoration: Option<String>,
    /// Per-source attempt budget
    pub attempt_timeout_ms: u64,
    pub ring: RingConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl Default for ShowroomConfig {
    fn default() -> Self {
        Self {
            catalog: "stores.json".to_string(),
            asset_base: None,
            decoration: Some("assets/centerpiece.obj".to_string()),
            attempt_timeout_ms: 10_000,
            ring: RingConfig::default(),
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl ShowroomConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.sanitize();
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `load` when the file exists, defaults otherwise. A file that exists
    /// but cannot be read is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    fn sanitize(&mut self) {
        self.render.width = self.render.width.max(1);
        self.render.height = self.render.height.max(1);
        self.render.frame_interval_ms = self.render.frame_interval_ms.max(1);
        self.attempt_timeout_ms = self.attempt_timeout_ms.max(1);
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.render.frame_interval_ms)
    }

    pub fn focal_point(&self) -> Vec3 {
        Vec3::from_array(self.ring.focal_point)
    }

    pub fn ring_options(&self) -> RingOptions {
        RingOptions {
            arc_span: match self.ring.arc_width_deg {
                Some(w) => ArcSpan::BoundedArc { width: w.to_radians() },
                None => ArcSpan::FullCircle,
            },
            angular_offset: self.ring.angular_offset_deg.to_radians(),
            height: self.ring.slot_height,
        }
    }

    pub fn camera_params(&self) -> CameraParams {
        CameraParams::from_eye_target(
            Vec3::from_array(self.camera.eye),
            Vec3::from_array(self.camera.target),
        )
    }

    pub fn asset_base(&self) -> Option<AssetBase> {
        self.asset_base.as_deref().map(AssetBase::parse)
    }
}
