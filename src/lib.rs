pub mod catalog;
pub mod color;
pub mod config;
pub mod engine;
pub mod net;
pub mod render;
pub mod resolve;

pub use catalog::{BrandItem, Catalog};
pub use config::ShowroomConfig;
pub use engine::pipeline::{BootError, BootReport, Showroom, ShowroomPipeline};
