//! Minimal triangle rasterizer used by the software engine.
//!
//! Triangles arrive in clip space. Anything touching or behind the eye plane
//! is dropped whole (there is no clipping), back faces are culled, and the
//! rest is filled with a depth test and perspective-correct texture
//! coordinates.

use image::{Rgba, RgbaImage};

const MIN_W: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    pub clip: [f32; 4],
    pub uv: [f32; 2],
}

/// Color plus depth target.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    color: RgbaImage,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color: RgbaImage::new(width, height),
            depth: vec![1.0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.color.dimensions() {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        let pixel = Rgba(to_rgba8(color));
        for p in self.color.pixels_mut() {
            *p = pixel;
        }
        self.depth.fill(1.0);
    }

    pub fn color(&self) -> &RgbaImage {
        &self.color
    }

    /// Depth in `[0, 1]` at a pixel, `1.0` where nothing was drawn.
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.depth[(y * self.width() + x) as usize])
    }

    /// Fills one counter-clockwise triangle, calling `shade` with the
    /// interpolated texture coordinate of every pixel that passes the depth
    /// test. Returns the number of pixels written.
    pub fn draw_triangle(
        &mut self,
        vertices: [ClipVertex; 3],
        mut shade: impl FnMut([f32; 2]) -> [f32; 3],
    ) -> usize {
        if vertices.iter().any(|v| v.clip[3] <= MIN_W) {
            return 0;
        }
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return 0;
        }

        let ndc = vertices.map(|v| {
            let w = v.clip[3];
            [v.clip[0] / w, v.clip[1] / w, v.clip[2] / w]
        });
        let ndc_area = (ndc[1][0] - ndc[0][0]) * (ndc[2][1] - ndc[0][1])
            - (ndc[2][0] - ndc[0][0]) * (ndc[1][1] - ndc[0][1]);
        if ndc_area <= 0.0 {
            return 0;
        }

        let screen = ndc.map(|p| {
            [
                (p[0] * 0.5 + 0.5) * width as f32,
                (0.5 - p[1] * 0.5) * height as f32,
                p[2] * 0.5 + 0.5,
            ]
        });
        let area = edge(screen[0], screen[1], screen[2]);
        if area == 0.0 {
            return 0;
        }

        let min_x = screen.iter().map(|p| p[0]).fold(f32::INFINITY, f32::min);
        let max_x = screen.iter().map(|p| p[0]).fold(f32::NEG_INFINITY, f32::max);
        let min_y = screen.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min);
        let max_y = screen.iter().map(|p| p[1]).fold(f32::NEG_INFINITY, f32::max);
        if max_x < 0.0 || max_y < 0.0 || min_x >= width as f32 || min_y >= height as f32 {
            return 0;
        }
        let x0 = min_x.max(0.0).floor() as u32;
        let y0 = min_y.max(0.0).floor() as u32;
        let x1 = (max_x.ceil() as u32).min(width - 1);
        let y1 = (max_y.ceil() as u32).min(height - 1);

        let inv_w = vertices.map(|v| 1.0 / v.clip[3]);
        let mut written = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = [x as f32 + 0.5, y as f32 + 0.5, 0.0];
                let b = [
                    edge(screen[1], screen[2], p) / area,
                    edge(screen[2], screen[0], p) / area,
                    edge(screen[0], screen[1], p) / area,
                ];
                if b.iter().any(|&w| w < 0.0) {
                    continue;
                }
                let z = b[0] * screen[0][2] + b[1] * screen[1][2] + b[2] * screen[2][2];
                if !(0.0..=1.0).contains(&z) {
                    continue;
                }
                let index = (y * width + x) as usize;
                if z >= self.depth[index] {
                    continue;
                }

                let denom = b[0] * inv_w[0] + b[1] * inv_w[1] + b[2] * inv_w[2];
                let mut uv = [0.0; 2];
                for (i, c) in uv.iter_mut().enumerate() {
                    *c = (b[0] * vertices[0].uv[i] * inv_w[0]
                        + b[1] * vertices[1].uv[i] * inv_w[1]
                        + b[2] * vertices[2].uv[i] * inv_w[2])
                        / denom;
                }

                let rgb = shade(uv);
                self.depth[index] = z;
                self.color
                    .put_pixel(x, y, Rgba(to_rgba8([rgb[0], rgb[1], rgb[2], 1.0])));
                written += 1;
            }
        }
        written
    }
}

fn edge(a: [f32; 3], b: [f32; 3], p: [f32; 3]) -> f32 {
    (p[0] - a[0]) * (b[1] - a[1]) - (p[1] - a[1]) * (b[0] - a[0])
}

fn to_rgba8(c: [f32; 4]) -> [u8; 4] {
    c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}
