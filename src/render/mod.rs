//! Scene side of the showroom: camera, scene arena, layout, picking and
//! the frame loop.

pub mod builder;
pub mod camera;
pub mod obj;
pub mod pick;
pub mod placeholder;
pub mod render_loop;
pub mod ring;
pub mod scene;
pub mod scene_index;
