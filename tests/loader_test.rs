use block_ngin::{
    data_structures::block::BlockSettings,
    engine::{
        AttemptStage, Canvas, EngineConfig, EngineError, EngineKind, EngineLoader, LoadError,
    },
};

fn loader(preference: &[EngineKind]) -> EngineLoader {
    EngineLoader::new(EngineConfig::default().with_preference(preference.iter().copied()))
}

#[tokio::test]
#[cfg(feature = "software-engine")]
async fn headless_canvas_falls_back_to_software() {
    let canvas = Canvas::headless(64, 48);
    let engine = loader(&EngineKind::ALL).load(&canvas).await.unwrap();
    assert_eq!(engine.kind(), EngineKind::Software);
    assert_eq!(engine.block_count(), 0);
    assert!(!engine.is_running());
}

#[tokio::test]
#[cfg(feature = "software-engine")]
async fn first_working_engine_wins() {
    let canvas = Canvas::headless(64, 48);
    let engine = loader(&[EngineKind::Software, EngineKind::Gl])
        .load(&canvas)
        .await
        .unwrap();
    assert_eq!(engine.kind(), EngineKind::Software);
}

#[tokio::test]
#[cfg(all(feature = "wgpu-engine", feature = "gl-engine", feature = "software-engine"))]
async fn every_failure_is_reported_in_order() {
    let canvas = Canvas::headless(0, 0);
    let err = loader(&EngineKind::ALL).load(&canvas).await.unwrap_err();

    let attempts = err.attempts();
    assert_eq!(attempts.len(), 3);
    let kinds: Vec<_> = attempts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, EngineKind::ALL.to_vec());
    assert!(attempts.iter().all(|a| a.stage == AttemptStage::Init));
    assert!(matches!(attempts[0].error, EngineError::NoWindow));
    assert!(matches!(attempts[1].error, EngineError::NoGlContext));
    assert!(matches!(
        attempts[2].error,
        EngineError::ZeroSize { width: 0, height: 0 }
    ));

    let message = err.to_string();
    assert!(message.contains("wgpu (init)"), "{message}");
    assert!(message.contains("software (init)"), "{message}");
}

#[tokio::test]
async fn empty_preference_list_fails_without_attempts() {
    let err = loader(&[]).load(&Canvas::headless(8, 8)).await.unwrap_err();
    let LoadError::NoEngineAvailable { attempts } = &err;
    assert!(attempts.is_empty());
    assert!(err.to_string().contains("empty preference list"));
}

#[tokio::test]
async fn duplicate_kinds_are_tried_once() {
    let err = loader(&[EngineKind::Gl, EngineKind::Gl, EngineKind::Software, EngineKind::Gl])
        .load(&Canvas::headless(0, 10))
        .await
        .unwrap_err();
    let kinds: Vec<_> = err.attempts().iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![EngineKind::Gl, EngineKind::Software]);
}

#[tokio::test]
#[cfg(feature = "software-engine")]
async fn loaded_engine_takes_blocks() {
    let mut engine = loader(&[EngineKind::Software])
        .load(&Canvas::headless(32, 32))
        .await
        .unwrap();
    engine
        .add_block(1, 2, 3, BlockSettings::colored([0.0, 1.0, 0.0]))
        .await
        .unwrap();
    assert!(engine.has_block(1, 2, 3));
    assert!(!engine.has_block(3, 2, 1));
    assert!(engine.remove_block(1, 2, 3));
    assert!(!engine.remove_block(1, 2, 3));
    engine.dispose();
}

#[test]
#[cfg(feature = "software-engine")]
fn loading_works_from_a_plain_executor() {
    let engine = futures::executor::block_on(
        loader(&[EngineKind::Software]).load(&Canvas::headless(16, 16).with_pixel_ratio(2.0)),
    )
    .unwrap();
    assert_eq!(engine.kind(), EngineKind::Software);
}

#[tokio::test]
#[cfg(not(any(feature = "wgpu-engine", feature = "gl-engine", feature = "software-engine")))]
async fn build_without_engines_fails_every_candidate_at_load() {
    let err = loader(&EngineKind::ALL)
        .load(&Canvas::headless(64, 48))
        .await
        .unwrap_err();
    let attempts = err.attempts();
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().all(|a| a.stage == AttemptStage::Load));
    assert!(
        attempts
            .iter()
            .all(|a| matches!(a.error, EngineError::Unavailable(kind) if kind == a.kind))
    );
}
