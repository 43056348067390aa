//! Camera model shared by picking and drawing.
//!
//! Conventions: right-handed, +Y up. NDC is [-1, 1] on both axes with +Y
//! pointing up (screen Y is inverted).

use glam::{Vec2, Vec3};

/// A half-line in world space. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

// ── Orbit parameters ──

/// Camera parameters for interactive 3D navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Horizontal orbit angle in radians (0 = looking down -Z from +Z)
    pub azimuth: f32,
    /// Vertical orbit angle in radians (positive = above the target)
    pub elevation: f32,
    /// Distance from the camera to the target point
    pub distance: f32,
    /// Target point the camera looks at [x, y, z]
    pub target: [f32; 3],
}

const MIN_ELEVATION: f32 = -0.2;
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - 0.05;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 120.0;

impl Default for CameraParams {
    fn default() -> Self {
        Self::from_eye_target(Vec3::new(0.0, 6.5, 15.0), Vec3::new(0.0, 2.5, 0.0))
    }
}

impl CameraParams {
    pub fn from_eye_target(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(MIN_DISTANCE);
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let azimuth = offset.x.atan2(offset.z);
        Self {
            azimuth,
            elevation,
            distance,
            target: target.to_array(),
        }
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }

    pub fn eye(&self) -> Vec3 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        self.target() + Vec3::new(ce * sa, se, ce * ca) * self.distance
    }

    /// Drag orbit; deltas in radians.
    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth += d_azimuth;
        self.elevation = (self.elevation + d_elevation).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }

    /// Scroll dolly; positive `amount` moves closer.
    pub fn dolly(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn camera(&self, fov_y_deg: f32, aspect: f32) -> Camera {
        Camera::look_at(self.eye(), self.target(), fov_y_deg, aspect)
    }
}

// ── Camera ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f32,
    /// width / height
    pub aspect: f32,
}

/// Points closer than this along the view axis do not project.
const NEAR: f32 = 1e-3;

impl Camera {
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_deg: f32, aspect: f32) -> Self {
        Self {
            eye,
            target,
            fov_y_deg,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
        }
    }

    /// (forward, right, up), orthonormal.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }

    fn half_height(&self) -> f32 {
        (self.fov_y_deg.to_radians() * 0.5).tan()
    }

    /// Ray from the eye through an NDC point.
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let (forward, right, up) = self.basis();
        let hh = self.half_height();
        let dir = forward + right * (ndc.x * hh * self.aspect) + up * (ndc.y * hh);
        Ray::new(self.eye, dir)
    }

    /// NDC of a world point, or None when it is behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let (forward, right, up) = self.basis();
        let d = point - self.eye;
        let z = d.dot(forward);
        if z <= NEAR {
            return None;
        }
        let hh = self.half_height();
        Some(Vec2::new(
            d.dot(right) / (z * hh * self.aspect),
            d.dot(up) / (z * hh),
        ))
    }
}
