use std::sync::Arc;

use winit::window::Window;

#[cfg(feature = "gl-engine")]
use crate::gl::GlowContext;

/// The host-provided surface an engine renders to.
///
/// The host creates the window and, for the GL engine, the GL context; the
/// canvas only carries them to whichever engine the loader picks. Sizes are
/// read in real time from the window when there is one.
pub struct Canvas {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    window: Option<Arc<Window>>,
    #[cfg(feature = "gl-engine")]
    gl: Option<GlowContext>,
}

impl Canvas {
    /// A canvas without a window, `width` x `height` logical pixels.
    pub fn headless(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            window: None,
            #[cfg(feature = "gl-engine")]
            gl: None,
        }
    }

    pub fn from_window(window: Arc<Window>) -> Self {
        let size = window.inner_size();
        let pixel_ratio = window.scale_factor();
        Self {
            width: size.width,
            height: size.height,
            pixel_ratio,
            window: Some(window),
            #[cfg(feature = "gl-engine")]
            gl: None,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    #[cfg(feature = "gl-engine")]
    pub fn with_gl(mut self, gl: GlowContext) -> Self {
        self.gl = Some(gl);
        self
    }

    /// Current size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => (
                (self.width as f64 * self.pixel_ratio).round() as u32,
                (self.height as f64 * self.pixel_ratio).round() as u32,
            ),
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        match &self.window {
            Some(window) => window.scale_factor(),
            None => self.pixel_ratio,
        }
    }

    /// Width over height of the physical size; `1.0` for an empty canvas.
    pub fn aspect(&self) -> f32 {
        let (width, height) = self.physical_size();
        if width == 0 || height == 0 {
            return 1.0;
        }
        width as f32 / height as f32
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    #[cfg(feature = "gl-engine")]
    pub fn gl(&self) -> Option<&GlowContext> {
        self.gl.as_ref()
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Canvas");
        s.field("physical_size", &self.physical_size())
            .field("pixel_ratio", &self.pixel_ratio())
            .field("window", &self.window.is_some());
        #[cfg(feature = "gl-engine")]
        s.field("gl", &self.gl.is_some());
        s.finish()
    }
}
