//! Blocks: unit cubes placed on integer coordinates.

use std::{fmt, num::ParseIntError, str::FromStr};

/// Integer block coordinate.
///
/// Engines key their native block objects by this value. Its string form is
/// `"x,y,z"` (see [`fmt::Display`] and [`FromStr`]), which is also used as
/// the debug label of native resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockKey {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Center of the block in world space.
    pub fn center(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

impl From<(i32, i32, i32)> for BlockKey {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockKeyError {
    #[error("expected three comma separated coordinates, got {0:?}")]
    Arity(String),
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] ParseIntError),
}

impl FromStr for BlockKey {
    type Err = BlockKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [x, y, z] => Ok(Self::new(x.parse()?, y.parse()?, z.parse()?)),
            _ => Err(BlockKeyError::Arity(s.to_string())),
        }
    }
}

/// How a block should look.
///
/// `texture` is a path relative to the configured asset root. A texture that
/// cannot be loaded downgrades the block to its flat `color`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSettings {
    pub color: [f32; 3],
    pub texture: Option<String>,
}

impl BlockSettings {
    pub fn colored(color: [f32; 3]) -> Self {
        Self {
            color,
            texture: None,
        }
    }

    pub fn textured(texture: impl Into<String>) -> Self {
        Self {
            texture: Some(texture.into()),
            ..Default::default()
        }
    }
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            color: [0.8, 0.8, 0.8],
            texture: None,
        }
    }
}
