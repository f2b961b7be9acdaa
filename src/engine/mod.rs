//! Uniform block API over whichever rendering engine could be brought up.
//!
//! [`EngineLoader`] walks a preference list of [`EngineKind`]s and returns an
//! [`Engine`] backed by the first one that initializes on the given
//! [`Canvas`]. The choice is final for the lifetime of the handle.
//!
//! # Key types
//!
//! - [`BlockEngine`] is the capability set every engine adapter provides
//! - [`Backend`] is the closed set of adapters, selected once at load time
//! - [`Engine`] is the handle callers use: blocks by integer coordinate,
//!   sun, lifecycle
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use block_ngin::engine::{Canvas, EngineConfig, EngineKind, EngineLoader};
//! use block_ngin::data_structures::block::BlockSettings;
//!
//! let config = EngineConfig::default().with_preference([EngineKind::Gl, EngineKind::Software]);
//! let canvas = Canvas::headless(320, 240);
//! let mut engine = EngineLoader::new(config).load(&canvas).await?;
//! engine.add_block(0, 0, 0, BlockSettings::colored([1.0, 0.0, 0.0])).await?;
//! engine.start();
//! engine.render_frame()?;
//! # Ok(())
//! # }
//! ```

use std::{fmt, path::PathBuf, str::FromStr};

use crate::data_structures::{
    block::{BlockKey, BlockSettings},
    light::Sun,
    material::Material,
};

mod canvas;
mod config;
mod error;
#[cfg(feature = "gl-engine")]
mod gl_engine;
mod loader;
#[cfg(feature = "software-engine")]
mod software;
#[cfg(feature = "wgpu-engine")]
mod wgpu_engine;

pub use canvas::Canvas;
pub use config::{ENGINES_ENV, EngineConfig, parse_preference};
pub use error::{AttemptStage, CandidateFailure, ConfigError, EngineError, LoadError};
#[cfg(feature = "gl-engine")]
pub use gl_engine::GlEngine;
pub use loader::EngineLoader;
#[cfg(feature = "software-engine")]
pub use software::SoftwareEngine;
#[cfg(feature = "wgpu-engine")]
pub use wgpu_engine::WgpuEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Wgpu,
    Gl,
    Software,
}

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [EngineKind::Wgpu, EngineKind::Gl, EngineKind::Software];

    /// Whether this engine is compiled into the current build.
    pub fn is_available(self) -> bool {
        match self {
            EngineKind::Wgpu => cfg!(feature = "wgpu-engine"),
            EngineKind::Gl => cfg!(feature = "gl-engine"),
            EngineKind::Software => cfg!(feature = "software-engine"),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineKind::Wgpu => "wgpu",
            EngineKind::Gl => "gl",
            EngineKind::Software => "software",
        })
    }
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgpu" => Ok(EngineKind::Wgpu),
            "gl" | "webgl" | "opengl" => Ok(EngineKind::Gl),
            "software" | "cpu" => Ok(EngineKind::Software),
            _ => Err(ConfigError::UnknownEngine(s.to_string())),
        }
    }
}

/// What every engine adapter can do with blocks.
///
/// Frames are only produced while the engine is running: `render_frame` on a
/// stopped engine does nothing.
pub trait BlockEngine {
    /// Places a unit cube centred on `key`, replacing any block already there.
    fn add_block(&mut self, key: BlockKey, material: &Material) -> Result<(), EngineError>;
    /// Removes the block at `key`; `false` if there was none.
    fn remove_block(&mut self, key: BlockKey) -> bool;
    fn set_sun(&mut self, sun: Sun);
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    fn render_frame(&mut self) -> Result<(), EngineError>;
    /// Adapts to a new physical surface size.
    fn resize(&mut self, width: u32, height: u32);
    fn block_count(&self) -> usize;
    fn contains_block(&self, key: BlockKey) -> bool;
}

/// The engine adapter a handle was created with.
pub enum Backend {
    #[cfg(feature = "wgpu-engine")]
    Wgpu(WgpuEngine),
    #[cfg(feature = "gl-engine")]
    Gl(GlEngine),
    #[cfg(feature = "software-engine")]
    Software(SoftwareEngine),
    /// Stands in when no engine is compiled in, so `Backend` is never empty.
    #[cfg(not(any(
        feature = "wgpu-engine",
        feature = "gl-engine",
        feature = "software-engine"
    )))]
    Empty(std::convert::Infallible),
}

macro_rules! dispatch {
    ($backend:expr, $engine:ident => $body:expr) => {
        match $backend {
            #[cfg(feature = "wgpu-engine")]
            Backend::Wgpu($engine) => $body,
            #[cfg(feature = "gl-engine")]
            Backend::Gl($engine) => $body,
            #[cfg(feature = "software-engine")]
            Backend::Software($engine) => $body,
            #[cfg(not(any(
                feature = "wgpu-engine",
                feature = "gl-engine",
                feature = "software-engine"
            )))]
            Backend::Empty(never) => {
                let never: &std::convert::Infallible = &never;
                match *never {}
            }
        }
    };
}

impl Backend {
    pub fn kind(&self) -> EngineKind {
        match self {
            #[cfg(feature = "wgpu-engine")]
            Backend::Wgpu(_) => EngineKind::Wgpu,
            #[cfg(feature = "gl-engine")]
            Backend::Gl(_) => EngineKind::Gl,
            #[cfg(feature = "software-engine")]
            Backend::Software(_) => EngineKind::Software,
            #[cfg(not(any(
                feature = "wgpu-engine",
                feature = "gl-engine",
                feature = "software-engine"
            )))]
            Backend::Empty(never) => match *never {},
        }
    }

    /// Brings up the engine of the given kind on `canvas`.
    pub(crate) async fn init(
        kind: EngineKind,
        canvas: &Canvas,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        match kind {
            #[cfg(feature = "wgpu-engine")]
            EngineKind::Wgpu => WgpuEngine::new(canvas, config).await.map(Backend::Wgpu),
            #[cfg(feature = "gl-engine")]
            EngineKind::Gl => GlEngine::from_canvas(canvas, config).map(Backend::Gl),
            #[cfg(feature = "software-engine")]
            EngineKind::Software => SoftwareEngine::new(canvas, config).map(Backend::Software),
            #[allow(unreachable_patterns)]
            other => Err(EngineError::Unavailable(other)),
        }
    }

    fn dispose(self) {
        dispatch!(self, engine => engine.dispose())
    }
}

impl BlockEngine for Backend {
    fn add_block(&mut self, key: BlockKey, material: &Material) -> Result<(), EngineError> {
        dispatch!(self, engine => engine.add_block(key, material))
    }

    fn remove_block(&mut self, key: BlockKey) -> bool {
        dispatch!(self, engine => engine.remove_block(key))
    }

    fn set_sun(&mut self, sun: Sun) {
        dispatch!(self, engine => engine.set_sun(sun))
    }

    fn start(&mut self) {
        dispatch!(self, engine => engine.start())
    }

    fn stop(&mut self) {
        dispatch!(self, engine => engine.stop())
    }

    fn is_running(&self) -> bool {
        dispatch!(self, engine => engine.is_running())
    }

    fn render_frame(&mut self) -> Result<(), EngineError> {
        dispatch!(self, engine => engine.render_frame())
    }

    fn resize(&mut self, width: u32, height: u32) {
        dispatch!(self, engine => engine.resize(width, height))
    }

    fn block_count(&self) -> usize {
        dispatch!(self, engine => engine.block_count())
    }

    fn contains_block(&self, key: BlockKey) -> bool {
        dispatch!(self, engine => engine.contains_block(key))
    }
}

/// Handle to the engine the loader selected.
pub struct Engine {
    backend: Backend,
    asset_root: PathBuf,
    size: (u32, u32),
}

impl Engine {
    pub(crate) fn new(backend: Backend, config: &EngineConfig, canvas: &Canvas) -> Self {
        Self {
            backend,
            asset_root: config.asset_root.clone(),
            size: canvas.physical_size(),
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }

    /// Places a block at the integer coordinate, loading its texture first.
    ///
    /// A texture that fails to load is logged and the block gets its flat
    /// color instead.
    pub async fn add_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        settings: BlockSettings,
    ) -> Result<(), EngineError> {
        let material = Material::resolve(&settings, &self.asset_root).await;
        self.backend.add_block(BlockKey::new(x, y, z), &material)
    }

    /// Places many blocks, loading all their textures concurrently.
    pub async fn add_blocks(
        &mut self,
        blocks: impl IntoIterator<Item = (BlockKey, BlockSettings)>,
    ) -> Result<(), EngineError> {
        let asset_root = self.asset_root.clone();
        let blocks: Vec<_> = blocks.into_iter().collect();
        let materials = futures::future::join_all(
            blocks
                .iter()
                .map(|(_, settings)| Material::resolve(settings, &asset_root)),
        )
        .await;
        for ((key, _), material) in blocks.iter().zip(materials) {
            self.backend.add_block(*key, &material)?;
        }
        Ok(())
    }

    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> bool {
        self.backend.remove_block(BlockKey::new(x, y, z))
    }

    pub fn has_block(&self, x: i32, y: i32, z: i32) -> bool {
        self.backend.contains_block(BlockKey::new(x, y, z))
    }

    pub fn block_count(&self) -> usize {
        self.backend.block_count()
    }

    pub fn set_sun(&mut self, direction: cgmath::Vector3<f32>, color: [f32; 3], intensity: f32) {
        self.backend.set_sun(Sun::new(direction, color, intensity));
    }

    pub fn start(&mut self) {
        self.backend.start();
    }

    pub fn stop(&mut self) {
        self.backend.stop();
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_running()
    }

    /// Draws one frame if the engine is running.
    pub fn render_frame(&mut self) -> Result<(), EngineError> {
        self.backend.render_frame()
    }

    /// Reads the canvas' current physical size and adapts the projection
    /// (and surface) when it changed. Returns whether a resize happened.
    pub fn resize_if_needed(&mut self, canvas: &Canvas) -> bool {
        let size = canvas.physical_size();
        if size == self.size || size.0 == 0 || size.1 == 0 {
            return false;
        }
        log::debug!("canvas resized {:?} -> {:?}", self.size, size);
        self.size = size;
        self.backend.resize(size.0, size.1);
        true
    }

    /// Stops rendering and releases every GPU resource the engine created.
    pub fn dispose(mut self) {
        self.backend.stop();
        log::info!("disposing {} engine", self.kind());
        self.backend.dispose();
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("kind", &self.kind())
            .field("blocks", &self.block_count())
            .field("size", &self.size)
            .finish()
    }
}
