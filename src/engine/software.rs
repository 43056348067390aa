//! CPU ray-casting engine.
//!
//! Every pixel casts one primary ray, collects all hits and composites
//! them front to back, so translucent label cards and logos with alpha
//! blend over what is behind them. Rows run in parallel on a dedicated
//! rayon pool when one is available.

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use super::{Engine, Hit};
use crate::color::Rgba;
use crate::net::image::ImageData;
use crate::render::camera::{Camera, Ray};
use crate::render::scene::{Mesh, Node, NodeHandle, Scene, Shape};

/// Hits closer than this are ignored (self-intersection)
const EPS: f32 = 1e-4;
/// Blend factor towards white for highlighted nodes
const HIGHLIGHT: f32 = 0.25;

pub struct SoftwareEngine {
    name: String,
    pool: Option<rayon::ThreadPool>,
}

impl SoftwareEngine {
    /// Engine with its own render pool. `threads == 0` lets rayon choose.
    pub fn parallel(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("showroom-render-{}", i))
            .build()?;
        let name = format!("software-parallel ({} threads)", pool.current_num_threads());
        log::debug!("Created {}", name);
        Ok(Self {
            name,
            pool: Some(pool),
        })
    }

    pub fn single_threaded() -> Self {
        Self {
            name: "software-single".to_string(),
            pool: None,
        }
    }

    fn shade(&self, scene: &Scene, ray: &Ray, highlighted: &[bool]) -> [u8; 4] {
        let light = Vec3::new(6.0, 10.0, 6.0).normalize();
        let mut acc = Vec3::ZERO;
        let mut alpha = 0.0f32;

        for hit in self.intersect(scene, ray, None) {
            let Some(node) = scene.node(hit.handle) else {
                continue;
            };
            let (base, a) = surface_color(scene, node, &hit);
            if a <= 0.0 {
                continue;
            }

            let mut col = if node.material.unlit {
                base
            } else {
                // Two-sided: light the face pointing at the viewer
                let n = if hit.normal.dot(ray.dir) > 0.0 {
                    -hit.normal
                } else {
                    hit.normal
                };
                base * (0.45 + 0.55 * n.dot(light).max(0.0))
            };
            if highlighted.get(hit.handle.index()).copied().unwrap_or(false) {
                col = col.lerp(Vec3::ONE, HIGHLIGHT);
            }

            acc += col * a * (1.0 - alpha);
            alpha += a * (1.0 - alpha);
            if alpha >= 0.995 {
                break;
            }
        }

        acc += sky_color(ray.dir, scene.background) * (1.0 - alpha);
        [
            (acc.x.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (acc.y.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (acc.z.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            255,
        ]
    }
}

impl Engine for SoftwareEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn intersect(&self, scene: &Scene, ray: &Ray, candidates: Option<&[NodeHandle]>) -> Vec<Hit> {
        let mut hits: Vec<Hit> = match candidates {
            Some(handles) => handles
                .iter()
                .filter_map(|&h| scene.node(h).and_then(|n| intersect_node(h, n, ray)))
                .collect(),
            None => scene
                .nodes()
                .filter_map(|(h, n)| intersect_node(h, n, ray))
                .collect(),
        };
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn draw(
        &self,
        scene: &Scene,
        camera: &Camera,
        width: u32,
        height: u32,
        highlighted: &[NodeHandle],
    ) -> ImageData {
        if width == 0 || height == 0 {
            return ImageData {
                width: 0,
                height: 0,
                rgba: Vec::new(),
            };
        }

        let camera = Camera {
            aspect: width as f32 / height as f32,
            ..*camera
        };
        let flags = highlight_flags(scene, highlighted);
        let row_size = width as usize * 4;
        let mut pixels = vec![0u8; row_size * height as usize];

        let render_row = |(py, row_buf): (usize, &mut [u8])| {
            let v = -((py as f32 + 0.5) / height as f32 * 2.0 - 1.0);
            for px in 0..width as usize {
                let u = (px as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                let ray = camera.ray(Vec2::new(u, v));
                let idx = px * 4;
                row_buf[idx..idx + 4].copy_from_slice(&self.shade(scene, &ray, &flags));
            }
        };

        match &self.pool {
            Some(pool) => pool.install(|| {
                pixels
                    .par_chunks_exact_mut(row_size)
                    .enumerate()
                    .for_each(render_row)
            }),
            None => pixels
                .chunks_exact_mut(row_size)
                .enumerate()
                .for_each(render_row),
        }

        ImageData {
            width,
            height,
            rgba: pixels,
        }
    }
}

/// Per-node flag: the node or one of its ancestors is highlighted.
fn highlight_flags(scene: &Scene, highlighted: &[NodeHandle]) -> Vec<bool> {
    let mut flags = vec![false; scene.len()];
    for h in highlighted {
        if let Some(f) = flags.get_mut(h.index()) {
            *f = true;
        }
    }
    // Parents precede children in the arena
    for (h, node) in scene.nodes() {
        if let Some(p) = node.parent {
            if flags[p.index()] {
                flags[h.index()] = true;
            }
        }
    }
    flags
}

// ── Sky ──

fn sky_color(dir: Vec3, (horizon, zenith): (Rgba, Rgba)) -> Vec3 {
    let t = (dir.y * 0.5 + 0.5).clamp(0.0, 1.0);
    let h = horizon.to_f32();
    let z = zenith.to_f32();
    Vec3::new(h[0], h[1], h[2]).lerp(Vec3::new(z[0], z[1], z[2]), t)
}

/// Base color and coverage at a hit.
fn surface_color(scene: &Scene, node: &Node, hit: &Hit) -> (Vec3, f32) {
    let tint = node.material.color.to_f32();
    match node.material.texture.and_then(|t| scene.texture(t)) {
        Some(tex) => {
            let texel = tex.sample(hit.uv.x, hit.uv.y);
            let rgb = Vec3::new(
                texel[0] as f32 / 255.0 * tint[0],
                texel[1] as f32 / 255.0 * tint[1],
                texel[2] as f32 / 255.0 * tint[2],
            );
            (rgb, texel[3] as f32 / 255.0 * tint[3])
        }
        None => (Vec3::new(tint[0], tint[1], tint[2]), tint[3]),
    }
}

// ── Intersection ──

fn intersect_node(handle: NodeHandle, node: &Node, ray: &Ray) -> Option<Hit> {
    if let Shape::Sprite { size } = node.shape {
        return intersect_sprite(handle, node, *ray, size);
    }

    // Local-space ray. The direction stays unnormalized so `t` is the
    // same parameter in both spaces.
    let inv = node.world_inverse();
    let o = inv.transform_point3(ray.origin);
    let d = inv.transform_vector3(ray.dir);

    let (t, uv, local_normal) = match &node.shape {
        Shape::Group | Shape::Sprite { .. } => return None,
        Shape::Box { size } => {
            let half = *size * 0.5;
            let (t_near, t_far) = slab(o, d, -half, half)?;
            let t = if t_near > EPS { t_near } else { t_far };
            (t, Vec2::ZERO, box_normal(o + d * t, half))
        }
        Shape::Plane { size } => {
            let (t, p) = planar(o, d)?;
            if p.x.abs() > size.x * 0.5 || p.y.abs() > size.y * 0.5 {
                return None;
            }
            (t, Vec2::new(p.x / size.x + 0.5, 0.5 - p.y / size.y), Vec3::Z)
        }
        Shape::Disc { radius } => {
            let (t, p) = planar(o, d)?;
            if p.x * p.x + p.y * p.y > radius * radius {
                return None;
            }
            let span = radius * 2.0;
            (t, Vec2::new(p.x / span + 0.5, 0.5 - p.y / span), Vec3::Z)
        }
        Shape::Mesh(mesh) => {
            let (t, n) = intersect_mesh(mesh, o, d)?;
            (t, Vec2::ZERO, n)
        }
    };

    let normal = inv
        .transpose()
        .transform_vector3(local_normal)
        .normalize_or_zero();
    Some(Hit {
        handle,
        distance: t,
        point: ray.at(t),
        uv,
        normal,
    })
}

/// Camera-facing quad centred on the node's world position.
fn intersect_sprite(handle: NodeHandle, node: &Node, ray: Ray, size: Vec2) -> Option<Hit> {
    let center = node.world_position();
    let n = (ray.origin - center).try_normalize()?;
    let right = Vec3::Y.cross(n).try_normalize().unwrap_or(Vec3::X);
    let up = n.cross(right);

    let denom = ray.dir.dot(n);
    if denom.abs() < 1e-8 {
        return None;
    }
    let t = (center - ray.origin).dot(n) / denom;
    if t <= EPS {
        return None;
    }
    let point = ray.at(t);
    let local = point - center;
    let (x, y) = (local.dot(right), local.dot(up));
    if x.abs() > size.x * 0.5 || y.abs() > size.y * 0.5 {
        return None;
    }
    Some(Hit {
        handle,
        distance: t,
        point,
        uv: Vec2::new(x / size.x + 0.5, 0.5 - y / size.y),
        normal: n,
    })
}

/// Ray against the local XY plane.
fn planar(o: Vec3, d: Vec3) -> Option<(f32, Vec3)> {
    if d.z.abs() < 1e-8 {
        return None;
    }
    let t = -o.z / d.z;
    if t <= EPS {
        return None;
    }
    Some((t, o + d * t))
}

/// Entry/exit parameters against an axis-aligned box.
fn slab(o: Vec3, d: Vec3, min: Vec3, max: Vec3) -> Option<(f32, f32)> {
    let inv = d.recip();
    let t0 = (min - o) * inv;
    let t1 = (max - o) * inv;
    let t_near = t0.min(t1).max_element();
    let t_far = t0.max(t1).min_element();
    if t_far >= t_near.max(EPS) {
        Some((t_near, t_far))
    } else {
        None
    }
}

fn box_normal(p: Vec3, half: Vec3) -> Vec3 {
    let q = (p / half.max(Vec3::splat(1e-6))).abs();
    if q.x >= q.y && q.x >= q.z {
        Vec3::new(p.x.signum(), 0.0, 0.0)
    } else if q.y >= q.z {
        Vec3::new(0.0, p.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, p.z.signum())
    }
}

fn intersect_mesh(mesh: &Mesh, o: Vec3, d: Vec3) -> Option<(f32, Vec3)> {
    if mesh.triangles.is_empty() {
        return None;
    }
    slab(o, d, mesh.bounds_min, mesh.bounds_max)?;

    let mut best: Option<(f32, Vec3)> = None;
    for i in 0..mesh.triangles.len() {
        let [a, b, c] = mesh.triangle(i);
        if let Some(t) = intersect_triangle(o, d, a, b, c) {
            if best.map_or(true, |(bt, _)| t < bt) {
                best = Some((t, (b - a).cross(c - a)));
            }
        }
    }
    best
}

/// Möller–Trumbore.
fn intersect_triangle(o: Vec3, d: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = d.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = o - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = d.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > EPS).then_some(t)
}
