use std::{env, path::PathBuf};

use cgmath::Point3;

use crate::{
    camera::Camera,
    data_structures::light::Sun,
    engine::{EngineKind, error::ConfigError},
};

/// Environment variable overriding [`EngineConfig::preference`].
pub const ENGINES_ENV: &str = "BLOCK_NGIN_ENGINES";

/// Everything the loader and the engines need to know up front.
///
/// Passed explicitly to [`crate::engine::EngineLoader::new`]; there is no
/// global engine state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engines to try, in order. The first one that initializes wins.
    pub preference: Vec<EngineKind>,
    pub clear_color: [f32; 4],
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub sun: Sun,
    /// Directory (or base URL on the web) textures are loaded from.
    pub asset_root: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preference: EngineKind::ALL.to_vec(),
            clear_color: [0.1, 0.2, 0.3, 1.0],
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 500.0,
            eye: Point3::new(0.0, 8.0, 12.0),
            target: Point3::new(0.0, 0.0, 0.0),
            sun: Sun::default(),
            asset_root: PathBuf::from("./assets"),
        }
    }
}

impl EngineConfig {
    /// Default config with the preference list taken from `BLOCK_NGIN_ENGINES`
    /// when it is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = env::var(ENGINES_ENV) {
            config.preference = parse_preference(&value)?;
        }
        Ok(config)
    }

    pub fn with_preference(mut self, preference: impl IntoIterator<Item = EngineKind>) -> Self {
        self.preference = preference.into_iter().collect();
        self
    }

    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }

    /// A camera placed at `eye`, looking at `target`, with +Y up.
    pub fn camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::new(self.fov_y, aspect, self.near, self.far);
        camera.look_at(self.eye.into(), self.target.into(), [0.0, 1.0, 0.0]);
        camera
    }
}

/// Parses a comma separated engine list such as `"gl, software"`.
pub fn parse_preference(value: &str) -> Result<Vec<EngineKind>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse)
        .collect()
}
