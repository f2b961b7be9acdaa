use crate::engine::{
    AttemptStage, Backend, Canvas, CandidateFailure, Engine, EngineConfig, EngineError, EngineKind,
    LoadError,
};

/// Picks the first engine in the configured preference list that can be
/// brought up on a canvas.
#[derive(Debug, Clone)]
pub struct EngineLoader {
    config: EngineConfig,
}

impl EngineLoader {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tries every preferred engine in order, stopping at the first that
    /// initializes. A kind listed twice is only tried once.
    ///
    /// When nothing initializes, the error carries one failure per attempted
    /// engine, in preference order.
    pub async fn load(&self, canvas: &Canvas) -> Result<Engine, LoadError> {
        let mut attempts = Vec::new();
        let mut tried: Vec<EngineKind> = Vec::new();

        for &kind in &self.config.preference {
            if tried.contains(&kind) {
                log::debug!("{kind} engine listed more than once, skipping");
                continue;
            }
            tried.push(kind);

            if !kind.is_available() {
                log::warn!("{kind} engine is not compiled in");
                attempts.push(CandidateFailure {
                    kind,
                    stage: AttemptStage::Load,
                    error: EngineError::Unavailable(kind),
                });
                continue;
            }

            match Backend::init(kind, canvas, &self.config).await {
                Ok(backend) => {
                    log::info!("using {kind} engine on {canvas:?}");
                    return Ok(Engine::new(backend, &self.config, canvas));
                }
                Err(error) => {
                    log::warn!("{kind} engine failed to initialize: {error}");
                    attempts.push(CandidateFailure {
                        kind,
                        stage: AttemptStage::Init,
                        error,
                    });
                }
            }
        }

        Err(LoadError::NoEngineAvailable { attempts })
    }
}
