use std::fmt;

use crate::{
    data_structures::mesh::MeshError, engine::EngineKind, scene::SceneError, shader::ShaderError,
};

/// Why one engine could not be loaded, initialized or driven.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0} engine is not compiled into this build")]
    Unavailable(EngineKind),
    #[error("canvas has no window to present to")]
    NoWindow,
    #[error("canvas has no GL context")]
    NoGlContext,
    #[error("canvas has no pixels ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),
    #[error("GPU device request failed: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("texture upload failed: {0}")]
    Texture(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// The step of a candidate attempt that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    /// The engine is not part of this build.
    Load,
    /// The engine is present but could not be set up on the canvas.
    Init,
}

#[derive(Debug)]
pub struct CandidateFailure {
    pub kind: EngineKind,
    pub stage: AttemptStage,
    pub error: EngineError,
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            AttemptStage::Load => "load",
            AttemptStage::Init => "init",
        };
        write!(f, "{} ({stage}): {}", self.kind, self.error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no engine available; tried: {}", summarize(.attempts))]
    NoEngineAvailable { attempts: Vec<CandidateFailure> },
}

impl LoadError {
    pub fn attempts(&self) -> &[CandidateFailure] {
        match self {
            LoadError::NoEngineAvailable { attempts } => attempts,
        }
    }
}

fn summarize(attempts: &[CandidateFailure]) -> String {
    if attempts.is_empty() {
        return "nothing (empty preference list)".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown engine {0:?} (expected wgpu, gl or software)")]
    UnknownEngine(String),
}
