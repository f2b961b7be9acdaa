//! Render pipelines of the wgpu engine.

pub mod basic;
pub mod light;
