//! Engine data structures: blocks, materials, lights, meshes and GPU layouts.
//!
//! - `block` holds block coordinates and per-block settings
//! - `material` is the resolved, engine independent look of a block
//! - `light` is the directional sun every engine shades with
//! - `mesh` is the GPU mesh of the hand-rolled GL path
//! - `instance` and `texture` are the wgpu engine's vertex layouts and textures

pub mod block;
#[cfg(feature = "wgpu-engine")]
pub mod instance;
pub mod light;
pub mod material;
pub mod mesh;
#[cfg(feature = "wgpu-engine")]
pub mod texture;
