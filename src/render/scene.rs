//! Scene graph arena.
//!
//! Nodes live in a flat `Vec` and are addressed by `NodeHandle`. A node's
//! parent is always added before it, so world matrices can be computed
//! once at insertion time and a single forward pass over the arena visits
//! parents before children.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::color::Rgba;
use crate::net::image::ImageData;

/// Opaque, engine-owned identity of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u32);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

/// Containment chain of a scene. The only thing the item index needs to
/// know about the engine.
pub trait SceneHierarchy {
    fn parent(&self, handle: NodeHandle) -> Option<NodeHandle>;

    /// Upper bound on chain length.
    fn node_count(&self) -> usize;
}

// ── Node data ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Indexed triangle mesh in local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Mesh {
    /// Triangles referencing missing vertices are dropped.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let n = positions.len() as u32;
        let triangles: Vec<[u32; 3]> = triangles
            .into_iter()
            .filter(|t| t.iter().all(|&i| i < n))
            .collect();
        let (bounds_min, bounds_max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(mn, mx), &p| (mn.min(p), mx.max(p)),
        );
        Self {
            positions,
            triangles,
            bounds_min,
            bounds_max,
        }
    }

    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }
}

/// Geometry of a node. All shapes except `Group` can be hit.
///
/// Planar shapes (`Plane`, `Disc`) lie in the local XY plane facing +Z.
/// A `Sprite` always faces the viewer and ignores rotation and scale.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Box { size: Vec3 },
    Plane { size: Vec2 },
    Disc { radius: f32 },
    Sprite { size: Vec2 },
    Mesh(Arc<Mesh>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgba,
    /// Texels replace `color` when present
    pub texture: Option<TextureId>,
    /// Skip lighting (labels, logos)
    pub unlit: bool,
}

impl Material {
    pub fn solid(color: Rgba) -> Self {
        Self {
            color,
            texture: None,
            unlit: false,
        }
    }

    pub fn textured(texture: TextureId) -> Self {
        Self {
            color: Rgba::WHITE,
            texture: Some(texture),
            unlit: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::solid(Rgba::WHITE)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeHandle>,
    pub local: Transform,
    pub shape: Shape,
    pub material: Material,
    world: Mat4,
    world_inv: Mat4,
}

impl Node {
    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn world_inverse(&self) -> Mat4 {
        self.world_inv
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

// ── Scene ──

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    textures: Vec<Arc<ImageData>>,
    /// Sky colors: (horizon, zenith)
    pub background: (Rgba, Rgba),
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            textures: Vec::new(),
            background: (Rgba::rgb(0x1b, 0x1f, 0x2a), Rgba::rgb(0x05, 0x07, 0x0c)),
        }
    }

    /// Add a node. A `parent` not in this scene is treated as no parent.
    pub fn add(
        &mut self,
        parent: Option<NodeHandle>,
        name: impl Into<String>,
        local: Transform,
        shape: Shape,
        material: Material,
    ) -> NodeHandle {
        let parent = parent.filter(|p| p.index() < self.nodes.len());
        let parent_world = parent.map_or(Mat4::IDENTITY, |p| self.nodes[p.index()].world);
        let world = parent_world * local.matrix();
        let handle = NodeHandle(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            parent,
            local,
            shape,
            material,
            world,
            world_inv: world.inverse(),
        });
        handle
    }

    pub fn add_texture(&mut self, image: Arc<ImageData>) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(image);
        id
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle.index())
    }

    pub fn texture(&self, id: TextureId) -> Option<&Arc<ImageData>> {
        self.textures.get(id.0 as usize)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeHandle(i as u32), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `handle` followed by each ancestor, innermost first.
    pub fn ancestors(&self, handle: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        let start = self.node(handle).map(|_| handle);
        std::iter::successors(start, move |h| self.parent(*h))
    }

    /// Texture image bound to a node, if any.
    pub fn node_texture(&self, handle: NodeHandle) -> Option<&Arc<ImageData>> {
        self.node(handle)
            .and_then(|n| n.material.texture)
            .and_then(|t| self.texture(t))
    }

    /// World-space center of a node's geometry.
    pub fn center(&self, handle: NodeHandle) -> Option<Vec3> {
        let node = self.node(handle)?;
        let local = match &node.shape {
            Shape::Mesh(mesh) if !mesh.positions.is_empty() => (mesh.bounds_min + mesh.bounds_max) * 0.5,
            _ => Vec3::ZERO,
        };
        Some(node.world.transform_point3(local))
    }
}

impl SceneHierarchy for Scene {
    fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.node(handle).and_then(|n| n.parent)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
