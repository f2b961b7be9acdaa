//! block-ngin
//!
//! A small block renderer. Two layers live in this crate:
//!
//! - a hand-rolled GL path: a column-major matrix library, shader
//!   compilation, meshes with their own GPU buffers, a camera and a scene that
//!   draws everything once per display frame
//! - a block API on top of whichever rendering engine can be brought up on
//!   the host's canvas (wgpu, GL or a CPU rasterizer), selected once by the
//!   [`engine::EngineLoader`]
//!
//! High-level modules
//! - `math`: 4x4 matrix operations on `[f32; 16]`
//! - `gl`: the narrow GL surface the hand-rolled path needs
//! - `shader`, `camera`, `scene`: program compilation, view state, frame loop
//! - `data_structures`: meshes, blocks, materials, lights and GPU layouts
//! - `resources`: cube geometry and asset loading
//! - `engine`: engine selection and the uniform block API
//!

pub mod camera;
#[cfg(feature = "wgpu-engine")]
pub mod context;
pub mod data_structures;
pub mod engine;
pub mod gl;
pub mod math;
#[cfg(feature = "wgpu-engine")]
pub mod pipelines;
pub mod raster;
pub mod resources;
pub mod scene;
pub mod shader;

pub use data_structures::block::{BlockKey, BlockSettings};
pub use engine::{Canvas, Engine, EngineConfig, EngineKind, EngineLoader};

/// Installs the platform logger: `env_logger` natively (configured through
/// `RUST_LOG`), the browser console on the web. Calling it twice is harmless.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            log::debug!("logger already initialized: {e}");
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::debug!("logger already initialized: {e}");
        }
    }
}
