use block_ngin::engine::{ConfigError, ENGINES_ENV, EngineConfig, EngineKind, parse_preference};

#[test]
fn default_prefers_every_engine_in_order() {
    let config = EngineConfig::default();
    assert_eq!(config.preference, EngineKind::ALL.to_vec());
}

#[test]
#[cfg(all(feature = "wgpu-engine", feature = "gl-engine", feature = "software-engine"))]
fn default_build_has_every_engine() {
    assert!(EngineKind::ALL.iter().all(|k| k.is_available()));
}

#[test]
#[cfg(not(feature = "gl-engine"))]
fn disabled_engine_reports_unavailable() {
    assert!(!EngineKind::Gl.is_available());
}

#[test]
fn parses_names_and_aliases() {
    assert_eq!(
        parse_preference("gl, software").unwrap(),
        vec![EngineKind::Gl, EngineKind::Software]
    );
    assert_eq!(
        parse_preference("WebGL,cpu,wgpu").unwrap(),
        vec![EngineKind::Gl, EngineKind::Software, EngineKind::Wgpu]
    );
    assert!(parse_preference(" , ").unwrap().is_empty());
}

#[test]
fn unknown_engine_is_an_error() {
    assert_eq!(
        parse_preference("gl,vulkan"),
        Err(ConfigError::UnknownEngine("vulkan".to_string()))
    );
}

#[test]
fn kind_display_round_trips() {
    for kind in EngineKind::ALL {
        assert_eq!(kind.to_string().parse::<EngineKind>().unwrap(), kind);
    }
}

#[test]
fn environment_overrides_preference() {
    // SAFETY: no other test in this binary reads or writes the environment.
    unsafe { std::env::set_var(ENGINES_ENV, "software,gl") };
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.preference, vec![EngineKind::Software, EngineKind::Gl]);

    unsafe { std::env::set_var(ENGINES_ENV, "directx") };
    assert!(EngineConfig::from_env().is_err());
    unsafe { std::env::remove_var(ENGINES_ENV) };
}

#[test]
fn camera_looks_at_target() {
    let config = EngineConfig::default();
    let camera = config.camera(2.0);
    assert_eq!(camera.aspect(), 2.0);
    assert_eq!(camera.position(), [0.0, 8.0, 12.0]);
}
