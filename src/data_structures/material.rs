use std::{path::Path, sync::Arc};

use image::RgbaImage;

use crate::{data_structures::block::BlockSettings, resources};

/// The resolved look of a block, independent of any engine.
///
/// Engines turn this into their native material (a wgpu bind group, a GL
/// texture, or a CPU-side sampler).
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub image: Option<Arc<RgbaImage>>,
}

impl Material {
    pub fn flat(color: [f32; 3]) -> Self {
        Self { color, image: None }
    }

    /// Resolves block settings, loading the texture if one is named.
    ///
    /// Never fails: a texture that cannot be read or decoded is logged and
    /// the block falls back to its flat color.
    pub async fn resolve(settings: &BlockSettings, asset_root: &Path) -> Self {
        let Some(texture) = &settings.texture else {
            return Self::flat(settings.color);
        };
        match resources::load_texture_image(asset_root, texture).await {
            Ok(image) => Self {
                color: settings.color,
                image: Some(Arc::new(image)),
            },
            Err(e) => {
                log::warn!("texture {texture} could not be loaded, using flat color: {e:#}");
                Self::flat(settings.color)
            }
        }
    }

    pub fn is_textured(&self) -> bool {
        self.image.is_some()
    }

    pub fn rgba(&self) -> [f32; 4] {
        [self.color[0], self.color[1], self.color[2], 1.0]
    }

    /// Nearest-neighbour sample with repeat wrapping; white when untextured.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 3] {
        let Some(image) = &self.image else {
            return [1.0; 3];
        };
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return [1.0; 3];
        }
        let x = ((u.rem_euclid(1.0) * w as f32) as u32).min(w - 1);
        let y = ((v.rem_euclid(1.0) * h as f32) as u32).min(h - 1);
        let p = image.get_pixel(x, y);
        [
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
        ]
    }
}
