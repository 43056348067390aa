//! Builds the showroom scene: ground, one sign per item, optional
//! centerpiece.
//!
//! A sign is a group placed at its ring slot and turned towards the focal
//! point. It holds a pole, a frame in the item's accent color, a board
//! with the logo (or placeholder) and a camera-facing name label. The
//! group is what gets registered; frame, board and label are the pick
//! candidates and resolve to the item through the index's ancestor walk.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};

use super::placeholder::synthesize;
use super::ring::LayoutSlot;
use super::scene::{Material, Mesh, NodeHandle, Scene, Shape, Transform};
use super::scene_index::{IndexError, SceneIndex};
use crate::catalog::BrandItem;
use crate::color::Rgba;
use crate::net::image::ImageData;

// Sign dimensions, in world units
const GROUND_RADIUS: f32 = 30.0;
const POLE_SIZE: Vec3 = Vec3::new(0.3, 2.2, 0.3);
const POLE_Y: f32 = 1.1;
const FRAME_SIZE: Vec3 = Vec3::new(2.4, 3.2, 0.12);
const PANEL_Y: f32 = 2.5;
const BOARD_SIZE: Vec2 = Vec2::new(2.2, 3.0);
const BOARD_Z: f32 = 0.07;
const LABEL_SIZE: Vec2 = Vec2::new(4.2, 1.1);
const LABEL_POS: Vec3 = Vec3::new(0.0, 4.2, 0.06);

const GROUND_COLOR: Rgba = Rgba::rgb(0x22, 0x26, 0x30);
const POLE_COLOR: Rgba = Rgba::rgb(0x44, 0x44, 0x44);
const DECORATION_COLOR: Rgba = Rgba::rgb(0xb8, 0xc4, 0xd6);

// Stand-in arch for a centerpiece that failed to load
const ARCH_COLOR: Rgba = Rgba::rgb(0x3a, 0x3f, 0x55);
const ARCH_LEG_SIZE: Vec3 = Vec3::new(0.5, 4.0, 0.5);
const ARCH_LEG_X: f32 = 2.0;
const ARCH_CAP_SIZE: Vec3 = Vec3::new(4.5, 0.5, 0.5);

/// Nodes making up one sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignHandles {
    pub item_id: String,
    pub group: NodeHandle,
    pub pole: NodeHandle,
    pub frame: NodeHandle,
    pub board: NodeHandle,
    pub label: NodeHandle,
}

/// Output of scene construction.
#[derive(Debug, Clone)]
pub struct BuiltScene {
    pub scene: Scene,
    pub index: SceneIndex,
    /// Every interactive leaf node
    pub candidates: Vec<NodeHandle>,
    pub signs: Vec<SignHandles>,
    pub ground: NodeHandle,
    pub decoration: Option<NodeHandle>,
}

pub struct SceneBuilder {
    scene: Scene,
    index: SceneIndex,
    candidates: Vec<NodeHandle>,
    signs: Vec<SignHandles>,
    ground: NodeHandle,
    decoration: Option<NodeHandle>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// Start a scene containing only the ground.
    pub fn new() -> Self {
        let mut scene = Scene::new();
        let ground = scene.add(
            None,
            "ground",
            Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            Shape::Disc {
                radius: GROUND_RADIUS,
            },
            Material::solid(GROUND_COLOR),
        );
        Self {
            scene,
            index: SceneIndex::new(),
            candidates: Vec::new(),
            signs: Vec::new(),
            ground,
            decoration: None,
        }
    }

    /// Add a sign for `item` at `slot`. `board` is the logo or its
    /// placeholder, already resolved.
    pub fn add_sign(
        &mut self,
        item: Arc<BrandItem>,
        slot: &LayoutSlot,
        board: Arc<ImageData>,
    ) -> Result<SignHandles, IndexError> {
        let scene = &mut self.scene;
        let group = scene.add(
            None,
            format!("sign:{}", item.id),
            Transform::from_translation(slot.position).with_rotation(slot.orientation),
            Shape::Group,
            Material::default(),
        );

        let pole = scene.add(
            Some(group),
            "pole",
            Transform::from_translation(Vec3::new(0.0, POLE_Y, 0.0)),
            Shape::Box { size: POLE_SIZE },
            Material::solid(POLE_COLOR),
        );
        let frame = scene.add(
            Some(group),
            "frame",
            Transform::from_translation(Vec3::new(0.0, PANEL_Y, 0.0)),
            Shape::Box { size: FRAME_SIZE },
            Material::solid(item.accent_color),
        );

        let board_tex = scene.add_texture(board);
        let board = scene.add(
            Some(group),
            "board",
            Transform::from_translation(Vec3::new(0.0, PANEL_Y, BOARD_Z)),
            Shape::Plane { size: BOARD_SIZE },
            Material::textured(board_tex),
        );

        let label_tex = scene.add_texture(Arc::new(synthesize(&item.display_name, Rgba::WHITE)));
        let label = scene.add(
            Some(group),
            "label",
            Transform::from_translation(LABEL_POS),
            Shape::Sprite { size: LABEL_SIZE },
            Material::textured(label_tex),
        );

        let handles = SignHandles {
            item_id: item.id.clone(),
            group,
            pole,
            frame,
            board,
            label,
        };
        self.index.register(group, item)?;
        self.candidates.extend([frame, board, label]);
        self.signs.push(handles.clone());
        Ok(handles)
    }

    /// Add a non-interactive mesh standing at `position`.
    pub fn add_decoration(&mut self, mesh: Arc<Mesh>, position: Vec3) -> NodeHandle {
        let handle = self.scene.add(
            None,
            "centerpiece",
            Transform::from_translation(position),
            Shape::Mesh(mesh),
            Material::solid(DECORATION_COLOR),
        );
        self.decoration = Some(handle);
        handle
    }

    /// Primitive arch (two legs and a cap) in place of a centerpiece that
    /// is present but unusable. Not interactive.
    pub fn add_stand_in_arch(&mut self, position: Vec3) -> NodeHandle {
        let scene = &mut self.scene;
        let group = scene.add(
            None,
            "centerpiece",
            Transform::from_translation(position),
            Shape::Group,
            Material::default(),
        );
        for x in [-ARCH_LEG_X, ARCH_LEG_X] {
            scene.add(
                Some(group),
                "arch-leg",
                Transform::from_translation(Vec3::new(x, ARCH_LEG_SIZE.y * 0.5, 0.0)),
                Shape::Box { size: ARCH_LEG_SIZE },
                Material::solid(ARCH_COLOR),
            );
        }
        scene.add(
            Some(group),
            "arch-cap",
            Transform::from_translation(Vec3::new(0.0, ARCH_LEG_SIZE.y, 0.0)),
            Shape::Box {
                size: ARCH_CAP_SIZE,
            },
            Material::solid(ARCH_COLOR),
        );
        self.decoration = Some(group);
        group
    }

    pub fn finish(self) -> BuiltScene {
        BuiltScene {
            scene: self.scene,
            index: self.index,
            candidates: self.candidates,
            signs: self.signs,
            ground: self.ground,
            decoration: self.decoration,
        }
    }
}
