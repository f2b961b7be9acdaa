use cgmath::InnerSpace;

/// A directional light shared by every block.
///
/// `direction` is the way the light travels (from the sun towards the
/// scene) and is always kept normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sun {
    direction: cgmath::Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Sun {
    pub fn new(direction: cgmath::Vector3<f32>, color: [f32; 3], intensity: f32) -> Self {
        let direction = if direction.magnitude2() > 0.0 && direction.magnitude2().is_finite() {
            direction.normalize()
        } else {
            log::warn!("sun direction {:?} has no length, pointing straight down", direction);
            cgmath::Vector3::new(0.0, -1.0, 0.0)
        };
        Self {
            direction,
            color,
            intensity: intensity.max(0.0),
        }
    }

    pub fn direction(&self) -> cgmath::Vector3<f32> {
        self.direction
    }

    /// Color scaled by intensity, the value shaders multiply with.
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }

    /// Lambert factor for a surface with the given unit normal.
    pub fn diffuse(&self, normal: [f32; 3]) -> f32 {
        let n = cgmath::Vector3::from(normal);
        (-self.direction).dot(n).max(0.0)
    }
}

impl Default for Sun {
    fn default() -> Self {
        Self::new(cgmath::Vector3::new(-0.3, -1.0, -0.5), [1.0, 1.0, 1.0], 1.0)
    }
}
