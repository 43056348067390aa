//! Boot pipeline: Catalog → Engine → Layout → Assets → Scene.
//!
//! Everything slow happens here, before the render loop starts. The
//! result is an immutable [`Showroom`]: scene, item index, engine context
//! and a report of what was loaded from where.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use rayon::prelude::*;

use super::{bundled_engine_sources, Engine, EngineContext};
use crate::catalog::{BrandItem, Catalog, CatalogError};
use crate::config::ShowroomConfig;
use crate::net::image::{decode_image, ImageData};
use crate::render::builder::{SceneBuilder, SignHandles};
use crate::render::camera::{Camera, CameraParams};
use crate::render::obj::parse_obj_bytes;
use crate::render::pick::PickController;
use crate::render::placeholder::synthesize;
use crate::render::ring::{layout, LayoutError, LayoutSlot};
use crate::render::scene::{Mesh, NodeHandle, Scene};
use crate::render::scene_index::{IndexError, SceneIndex};
use crate::resolve::{
    byte_source, describe_failures, AssetBase, Decoded, Locator, LocatorError, ResolutionOutcome,
    ResourceKind, ResourceRequest, Resolver, SharedSource, SourceFailure,
};

/// Boot failure. The only error a user ever sees.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("could not obtain {request}: {}", describe_failures(.failures))]
    FatalResolution {
        request: ResourceRequest,
        failures: Vec<SourceFailure>,
    },
    #[error("malformed catalog: {0}")]
    MalformedCatalog(#[from] CatalogError),
    #[error("bad catalog locator {raw:?}: {source}")]
    CatalogLocator {
        raw: String,
        #[source]
        source: LocatorError,
    },
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("scene construction failed: {0}")]
    Index(#[from] IndexError),
}

impl BootError {
    /// Which boot phase failed.
    pub fn phase(&self) -> &'static str {
        match self {
            BootError::FatalResolution { request, .. } => match request.kind {
                ResourceKind::EngineModule => "engine",
                ResourceKind::Catalog => "catalog",
                ResourceKind::ItemAsset => "assets",
                ResourceKind::Decoration => "decoration",
            },
            BootError::MalformedCatalog(_) | BootError::CatalogLocator { .. } => "catalog",
            BootError::Layout(_) => "layout",
            BootError::Index(_) => "scene",
        }
    }
}

// ── Report ──

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderReason {
    /// The catalog record has no logo
    NoLocator,
    /// The logo string could not be turned into a locator
    BadLocator(LocatorError),
    /// Every source failed
    Unresolved(Vec<SourceFailure>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus {
    Logo { source_index: usize },
    Placeholder(PlaceholderReason),
}

impl AssetStatus {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, AssetStatus::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub item_id: String,
    pub asset: AssetStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecorationStatus {
    /// Not configured
    Disabled,
    /// Probe found nothing
    Absent,
    Loaded { source_index: usize },
    /// Present but unusable; a primitive arch stands in
    Substituted(String),
    /// Locator could not be parsed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BootReport {
    pub engine_name: String,
    pub engine_source: usize,
    pub items: Vec<ItemReport>,
    pub decoration: DecorationStatus,
}

impl BootReport {
    pub fn placeholders(&self) -> usize {
        self.items.iter().filter(|r| r.asset.is_placeholder()).count()
    }
}

// ── Showroom ──

/// A fully constructed showroom. Immutable; safe to share across threads.
pub struct Showroom {
    pub catalog: Catalog,
    pub slots: Vec<LayoutSlot>,
    pub scene: Scene,
    pub index: SceneIndex,
    /// Interactive leaf nodes (frames, boards, labels)
    pub candidates: Vec<NodeHandle>,
    pub signs: Vec<SignHandles>,
    pub context: EngineContext,
    pub report: BootReport,
}

impl Showroom {
    pub fn engine(&self) -> &dyn Engine {
        self.context.engine.as_ref()
    }

    pub fn picker(&self) -> PickController<'_> {
        PickController::new(self.engine(), &self.scene, &self.index).with_candidates(&self.candidates)
    }

    /// Initial orbit parameters from the config.
    pub fn camera_params(&self) -> CameraParams {
        self.context.config.camera_params()
    }

    pub fn camera(&self, params: &CameraParams, aspect: f32) -> Camera {
        params.camera(self.context.config.camera.fov_y_deg, aspect)
    }

    pub fn sign_for(&self, item_id: &str) -> Option<&SignHandles> {
        self.signs.iter().find(|s| s.item_id == item_id)
    }

    /// Render a frame with the item's sign (if any) highlighted.
    pub fn render(&self, camera: &Camera, width: u32, height: u32, highlight: Option<&BrandItem>) -> ImageData {
        let highlighted: &[NodeHandle] = match highlight {
            Some(item) => self.index.handles_for(&item.id),
            None => &[],
        };
        self.engine().draw(&self.scene, camera, width, height, highlighted)
    }
}

// ── Pipeline ──

/// Boot-time configuration of where everything comes from.
pub struct ShowroomPipeline {
    config: Arc<ShowroomConfig>,
    resolver: Resolver,
    engine_sources: Vec<SharedSource<Arc<dyn Engine>>>,
    catalog_sources: Option<Vec<SharedSource<Vec<u8>>>>,
    decoration_sources: Option<Vec<SharedSource<Mesh>>>,
    asset_base: Option<AssetBase>,
}

impl ShowroomPipeline {
    pub fn new(config: ShowroomConfig) -> Self {
        let resolver = Resolver::new(config.attempt_timeout());
        let engine_sources = bundled_engine_sources(config.render.threads);
        let asset_base = config.asset_base();
        Self {
            config: Arc::new(config),
            resolver,
            engine_sources,
            catalog_sources: None,
            decoration_sources: None,
            asset_base,
        }
    }

    /// Replace the ranked engine module sources.
    pub fn with_engine_sources(mut self, sources: Vec<SharedSource<Arc<dyn Engine>>>) -> Self {
        self.engine_sources = sources;
        self
    }

    /// Replace the catalog source list (default: the configured locator).
    pub fn with_catalog_sources(mut self, sources: Vec<SharedSource<Vec<u8>>>) -> Self {
        self.catalog_sources = Some(sources);
        self
    }

    /// Replace the centerpiece source list (default: the configured locator).
    pub fn with_decoration_sources(mut self, sources: Vec<SharedSource<Vec<u8>>>) -> Self {
        self.decoration_sources = Some(sources.into_iter().map(obj_source).collect());
        self
    }

    pub fn with_asset_base(mut self, base: AssetBase) -> Self {
        self.asset_base = Some(base);
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ShowroomConfig {
        &self.config
    }

    pub fn boot(&self) -> Result<Showroom, BootError> {
        // Phase 1: catalog
        let (catalog, catalog_locator) = self.load_catalog()?;

        // Phase 2: engine module
        let request = ResourceRequest::new(ResourceKind::EngineModule, "renderer");
        let (engine, engine_source) = self
            .resolver
            .resolve(&request, &self.engine_sources)
            .into_result()
            .map_err(|failures| {
                log::error!("No rendering engine: {}", describe_failures(&failures));
                BootError::FatalResolution { request, failures }
            })?;
        log::info!("Engine: {} (source #{})", engine.name(), engine_source);
        let context = EngineContext {
            engine,
            engine_source,
            config: self.config.clone(),
        };

        // Phase 3: layout
        let ids: Vec<&str> = catalog.items().iter().map(|it| it.id.as_str()).collect();
        let slots = layout(
            &ids,
            self.config.ring.radius,
            self.config.focal_point(),
            &self.config.ring_options(),
        )?;

        // Phase 4: per-item assets, independent of each other
        let base = self
            .asset_base
            .clone()
            .or_else(|| catalog_locator.as_ref().and_then(base_of));
        let boards: Vec<(Arc<ImageData>, AssetStatus)> = catalog
            .items()
            .par_iter()
            .map(|item| self.resolve_board(item, base.as_ref()))
            .collect();

        // Phase 5: scene
        let mut builder = SceneBuilder::new();
        let mut items = Vec::with_capacity(boards.len());
        for ((item, slot), (board, asset)) in catalog.items().iter().zip(&slots).zip(boards) {
            builder.add_sign(item.clone(), slot, board)?;
            items.push(ItemReport {
                item_id: item.id.clone(),
                asset,
            });
        }
        let decoration = self.load_decoration(&mut builder, base.as_ref());
        let built = builder.finish();

        let report = BootReport {
            engine_name: context.engine.name().to_string(),
            engine_source,
            items,
            decoration,
        };
        log::info!(
            "Showroom ready: {} signs ({} placeholders), {} nodes",
            built.signs.len(),
            report.placeholders(),
            built.scene.len()
        );

        Ok(Showroom {
            catalog,
            slots,
            scene: built.scene,
            index: built.index,
            candidates: built.candidates,
            signs: built.signs,
            context,
            report,
        })
    }

    fn load_catalog(&self) -> Result<(Catalog, Option<Locator>), BootError> {
        let request = ResourceRequest::new(ResourceKind::Catalog, "catalog");
        let owned;
        let locator;
        let sources: &[SharedSource<Vec<u8>>] = match &self.catalog_sources {
            Some(sources) => {
                locator = None;
                sources
            }
            None => {
                let raw = &self.config.catalog;
                let parsed = Locator::parse(raw, None).map_err(|source| BootError::CatalogLocator {
                    raw: raw.clone(),
                    source,
                })?;
                owned = vec![byte_source(&parsed)];
                locator = Some(parsed);
                &owned
            }
        };

        let (bytes, _) = self
            .resolver
            .resolve(&request, sources)
            .into_result()
            .map_err(|failures| {
                log::error!("Catalog unavailable: {}", describe_failures(&failures));
                BootError::FatalResolution { request, failures }
            })?;
        let catalog = Catalog::from_json(&bytes).map_err(|e| {
            log::error!("Catalog rejected: {}", e);
            BootError::MalformedCatalog(e)
        })?;
        Ok((catalog, locator))
    }

    /// Logo for one item, or its placeholder. Never fails.
    fn resolve_board(&self, item: &BrandItem, base: Option<&AssetBase>) -> (Arc<ImageData>, AssetStatus) {
        let placeholder = |reason: PlaceholderReason| {
            (
                Arc::new(synthesize(&item.display_name, item.accent_color)),
                AssetStatus::Placeholder(reason),
            )
        };

        let Some(raw) = item.asset_locator.as_deref() else {
            log::debug!("{} has no logo, using placeholder", item.id);
            return placeholder(PlaceholderReason::NoLocator);
        };
        let locator = match Locator::parse(raw, base) {
            Ok(locator) => locator,
            Err(e) => {
                log::warn!("Logo for {} has a bad locator {:?}: {}", item.id, raw, e);
                return placeholder(PlaceholderReason::BadLocator(e));
            }
        };

        let request = ResourceRequest::new(ResourceKind::ItemAsset, item.id.clone());
        let sources: Vec<SharedSource<ImageData>> =
            vec![Arc::new(Decoded::new(byte_source(&locator), decode_image))];
        match self.resolver.resolve(&request, &sources) {
            ResolutionOutcome::Success {
                payload,
                source_index,
            } => (Arc::new(payload), AssetStatus::Logo { source_index }),
            ResolutionOutcome::Failure { errors } => {
                log::warn!(
                    "Logo for {} unavailable, using placeholder: {}",
                    item.id,
                    describe_failures(&errors)
                );
                placeholder(PlaceholderReason::Unresolved(errors))
            }
        }
    }

    /// Optional centerpiece: probe, then load. Absence is silent.
    fn load_decoration(&self, builder: &mut SceneBuilder, base: Option<&AssetBase>) -> DecorationStatus {
        let owned;
        let sources: &[SharedSource<Mesh>] = match (&self.decoration_sources, &self.config.decoration) {
            (Some(sources), _) => sources,
            (None, Some(raw)) => match Locator::parse(raw, base) {
                Ok(locator) => {
                    owned = vec![obj_source(byte_source(&locator))];
                    &owned
                }
                Err(e) => {
                    log::warn!("Centerpiece locator {:?} ignored: {}", raw, e);
                    return DecorationStatus::Failed(e.to_string());
                }
            },
            (None, None) => return DecorationStatus::Disabled,
        };

        let request = ResourceRequest::new(ResourceKind::Decoration, "centerpiece");
        if let Err(failures) = self.resolver.probe(&request, sources) {
            log::debug!("No centerpiece: {}", describe_failures(&failures));
            return DecorationStatus::Absent;
        }

        match self.resolver.resolve(&request, sources) {
            ResolutionOutcome::Success {
                payload,
                source_index,
            } => {
                let focal = self.config.focal_point();
                builder.add_decoration(Arc::new(payload), Vec3::new(focal.x, 0.0, focal.z));
                log::info!("Centerpiece loaded from source #{}", source_index);
                DecorationStatus::Loaded { source_index }
            }
            ResolutionOutcome::Failure { errors } => {
                let reason = describe_failures(&errors);
                log::warn!("Centerpiece present but unusable, using stand-in arch: {}", reason);
                let focal = self.config.focal_point();
                builder.add_stand_in_arch(Vec3::new(focal.x, 0.0, focal.z));
                DecorationStatus::Substituted(reason)
            }
        }
    }
}

/// Bytes that must parse as OBJ within the same attempt.
fn obj_source(bytes: SharedSource<Vec<u8>>) -> SharedSource<Mesh> {
    Arc::new(Decoded::new(bytes, parse_obj_bytes))
}

/// Directory or URL containing a catalog.
fn base_of(locator: &Locator) -> Option<AssetBase> {
    match locator {
        Locator::File(path) => Some(AssetBase::Dir(
            path.parent().map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf),
        )),
        Locator::Url(url) => url.join(".").ok().map(AssetBase::Url),
        Locator::Builtin(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::net::image::encode_png;
    use crate::render::pick::PickResult;
    use crate::resolve::{FileSource, FnSource, SourceError};
    use glam::Vec2;
    use std::path::PathBuf;

    const CATALOG: &str = r##"[
        {"id": "one", "name": "One", "logo": "logos/one.png", "color": "#ff0000", "link": "https://one.example/"},
        {"id": "two", "name": "Two", "color": "#00ff00", "link": "https://two.example/"},
        {"id": "three", "name": "Three", "logo": "logos/missing.png", "color": "#0000ff", "link": "https://three.example/"}
    ]"##;

    fn logo() -> ImageData {
        ImageData {
            width: 2,
            height: 2,
            rgba: [200u8, 30, 30, 255].repeat(4),
        }
    }

    /// Catalog plus one real logo in a temp dir.
    fn showroom_dir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("logos")).unwrap();
        std::fs::write(dir.path().join("logos/one.png"), encode_png(&logo()).unwrap()).unwrap();
        let catalog = dir.path().join("stores.json");
        std::fs::write(&catalog, CATALOG).unwrap();
        (dir, catalog)
    }

    fn config_for(catalog: &Path) -> ShowroomConfig {
        ShowroomConfig {
            catalog: catalog.display().to_string(),
            decoration: None,
            ..ShowroomConfig::default()
        }
    }

    fn failing_engine(name: &str) -> SharedSource<Arc<dyn Engine>> {
        Arc::new(FnSource::<Arc<dyn Engine>, _>::new(name, |_: &ResourceRequest, _| {
            Err(SourceError::Unavailable("no such module".into()))
        }))
    }

    fn to_pixels(ndc: Vec2, w: f32, h: f32) -> (f32, f32) {
        ((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h)
    }

    #[test]
    fn three_items_end_to_end() {
        let (_dir, catalog) = showroom_dir();
        let showroom = ShowroomPipeline::new(config_for(&catalog)).boot().unwrap();

        // Every item is interactive
        assert_eq!(showroom.index.item_count(), 3);
        assert_eq!(showroom.signs.len(), 3);
        assert_eq!(showroom.candidates.len(), 9);

        // Item 1 shows its logo, items 2 and 3 placeholders of their own name/color
        let report = &showroom.report;
        assert_eq!(report.items[0].asset, AssetStatus::Logo { source_index: 0 });
        assert_eq!(
            report.items[1].asset,
            AssetStatus::Placeholder(PlaceholderReason::NoLocator)
        );
        match &report.items[2].asset {
            AssetStatus::Placeholder(PlaceholderReason::Unresolved(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(matches!(errors[0].error, SourceError::NotFound(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(report.placeholders(), 2);

        let board = |id: &str| {
            let sign = showroom.sign_for(id).unwrap();
            showroom.scene.node_texture(sign.board).unwrap().clone()
        };
        assert_eq!(*board("one"), logo());
        assert_eq!(*board("two"), synthesize("Two", Rgba::rgb(0, 255, 0)));
        assert_eq!(*board("three"), synthesize("Three", Rgba::rgb(0, 0, 255)));

        // Look from the focal point at item 1's board and click its projected center
        let (w, h) = (800.0, 600.0);
        let focal = showroom.context.config.focal_point();
        let sign = showroom.sign_for("one").unwrap();
        let center = showroom.scene.center(sign.board).unwrap();
        let camera = Camera::look_at(focal, center, 45.0, w / h);
        let ndc = showroom.engine().project(&camera, center).unwrap();
        assert!(ndc.length() < 1e-3);
        let (px, py) = to_pixels(ndc, w, h);

        let result = showroom.picker().pick(px, py, w, h, &camera);
        assert!(result.hit);
        assert_eq!(result.item.as_ref().unwrap().id, "one");
        assert_eq!(
            result.item.unwrap().target_url.as_str(),
            "https://one.example/"
        );

        // Empty ground between the signs
        let ground = Camera::look_at(focal, Vec3::new(-3.0, 0.0, 0.0), 45.0, w / h);
        let (gx, gy) = to_pixels(Vec2::ZERO, w, h);
        assert_eq!(showroom.picker().pick(gx, gy, w, h, &ground), PickResult::miss());
        let full = PickController::new(showroom.engine(), &showroom.scene, &showroom.index);
        let ground_hit = full.pick(gx, gy, w, h, &ground);
        assert!(!ground_hit.hit);
        assert!(ground_hit.item.is_none());
    }

    #[test]
    fn rendering_highlights_without_touching_the_index() {
        let (_dir, catalog) = showroom_dir();
        let mut config = config_for(&catalog);
        config.render.threads = 2;
        let showroom = ShowroomPipeline::new(config).boot().unwrap();

        let sign = showroom.sign_for("three").unwrap();
        let center = showroom.scene.center(sign.board).unwrap();
        let params = CameraParams::from_eye_target(showroom.camera_params().eye(), center);
        let camera = showroom.camera(&params, 4.0 / 3.0);
        let plain = showroom.render(&camera, 64, 48, None);
        let item = showroom.catalog.get("three").unwrap().clone();
        let lit = showroom.render(&camera, 64, 48, Some(&item));
        assert_eq!(plain.rgba.len(), 64 * 48 * 4);
        assert_ne!(plain, lit);
        assert_eq!(showroom.index.item_count(), 3);
    }

    #[test]
    fn missing_engine_is_fatal_with_every_error() {
        let (_dir, catalog) = showroom_dir();
        let err = ShowroomPipeline::new(config_for(&catalog))
            .with_engine_sources(vec![failing_engine("bundled"), failing_engine("mirror")])
            .boot()
            .err()
            .unwrap();
        match &err {
            BootError::FatalResolution { request, failures } => {
                assert_eq!(request.kind, ResourceKind::EngineModule);
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].locator, Locator::Builtin("bundled".into()));
                assert_eq!(failures[1].locator, Locator::Builtin("mirror".into()));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.phase(), "engine");
    }

    #[test]
    fn engine_falls_back_to_next_source() {
        let (_dir, catalog) = showroom_dir();
        let mut sources = vec![failing_engine("bundled")];
        sources.extend(bundled_engine_sources(1));
        let showroom = ShowroomPipeline::new(config_for(&catalog))
            .with_engine_sources(sources)
            .boot()
            .unwrap();
        assert_eq!(showroom.report.engine_source, 1);
        assert_eq!(showroom.context.engine_source, 1);
    }

    #[test]
    fn missing_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShowroomPipeline::new(config_for(&dir.path().join("nope.json")))
            .boot()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BootError::FatalResolution { ref request, .. } if request.kind == ResourceKind::Catalog
        ));
        assert_eq!(err.phase(), "catalog");
    }

    #[test]
    fn malformed_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.json");
        std::fs::write(
            &path,
            r#"[{"id": "a", "link": "https://a.example"}, {"id": "a", "link": "https://b.example"}]"#,
        )
        .unwrap();
        let err = ShowroomPipeline::new(config_for(&path)).boot().err().unwrap();
        assert!(matches!(
            err,
            BootError::MalformedCatalog(CatalogError::DuplicateId { index: 1, .. })
        ));
    }

    #[test]
    fn empty_catalog_builds_an_empty_showroom() {
        let showroom = ShowroomPipeline::new(ShowroomConfig {
            decoration: None,
            ..ShowroomConfig::default()
        })
        .with_catalog_sources(vec![Arc::new(FnSource::new("inline", |_: &ResourceRequest, _| {
            Ok(b"[]".to_vec())
        }))])
        .boot()
        .unwrap();
        assert!(showroom.index.is_empty());
        assert!(showroom.slots.is_empty());
        // Ground only
        assert_eq!(showroom.scene.len(), 1);
    }

    #[test]
    fn centerpiece_is_optional() {
        let (dir, catalog) = showroom_dir();

        // Absent: silent no-op
        let mut config = config_for(&catalog);
        config.decoration = Some("assets/centerpiece.obj".into());
        let absent = ShowroomPipeline::new(config.clone()).boot().unwrap();
        assert_eq!(absent.report.decoration, DecorationStatus::Absent);

        // Present: loaded relative to the catalog directory, not interactive
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        let obj = dir.path().join("assets/centerpiece.obj");
        std::fs::write(&obj, "v -1 0 0\nv 1 0 0\nv 0 2 0\nf 1 2 3\n").unwrap();
        let loaded = ShowroomPipeline::new(config.clone()).boot().unwrap();
        assert_eq!(
            loaded.report.decoration,
            DecorationStatus::Loaded { source_index: 0 }
        );
        assert_eq!(loaded.scene.len(), absent.scene.len() + 1);
        assert_eq!(loaded.index.len(), absent.index.len());

        // Present but broken: warning, stand-in arch, showroom still boots
        std::fs::write(&obj, "v 1 2\n").unwrap();
        let broken = ShowroomPipeline::new(config).boot().unwrap();
        match &broken.report.decoration {
            DecorationStatus::Substituted(reason) => assert!(reason.contains("line 1"), "{}", reason),
            other => panic!("unexpected {:?}", other),
        }
        // Arch group plus two legs and a cap
        assert_eq!(broken.scene.len(), absent.scene.len() + 4);
        assert_eq!(broken.index.len(), absent.index.len());
        assert_eq!(broken.candidates, absent.candidates);
    }

    #[test]
    fn decoration_sources_fall_back_in_order() {
        let (dir, catalog) = showroom_dir();
        let bad = dir.path().join("bad.obj");
        let good = dir.path().join("good.obj");
        std::fs::write(&bad, "garbage").unwrap();
        std::fs::write(&good, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let showroom = ShowroomPipeline::new(config_for(&catalog))
            .with_decoration_sources(vec![
                Arc::new(FileSource::new(bad)),
                Arc::new(FileSource::new(good)),
            ])
            .boot()
            .unwrap();
        assert_eq!(
            showroom.report.decoration,
            DecorationStatus::Loaded { source_index: 1 }
        );
    }

    #[test]
    fn asset_base_of_catalog() {
        assert_eq!(
            base_of(&Locator::File(PathBuf::from("/srv/showroom/stores.json"))),
            Some(AssetBase::Dir(PathBuf::from("/srv/showroom")))
        );
        let url = url::Url::parse("https://shop.example/api/stores.json").unwrap();
        assert_eq!(
            base_of(&Locator::Url(url)),
            Some(AssetBase::Url(url::Url::parse("https://shop.example/api/").unwrap()))
        );
    }
}
