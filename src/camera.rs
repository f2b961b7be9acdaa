//! Projection + view pair for the hand-rolled render path.

use crate::math::{self, Mat4, Vec3};

/// A perspective camera.
///
/// The projection is computed once by [`Camera::new`] and is not recomputed
/// when the surface is resized: whoever owns the surface calls
/// [`Camera::set_perspective`] with the new aspect ratio. The view matrix
/// starts as identity and is the caller's to populate, e.g. via
/// [`Camera::look_at`].
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Mat4,
    view: Mat4,
    position: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// `fov_y` is the vertical field of view in radians.
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut projection = [0.0; 16];
        math::perspective(&mut projection, fov_y, aspect, near, far);
        Self {
            projection,
            view: math::IDENTITY,
            position: [0.0; 3],
            fov_y,
            aspect,
            near,
            far,
        }
    }

    pub fn set_perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        math::perspective(&mut self.projection, fov_y, aspect, near, far);
        self.fov_y = fov_y;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
    }

    /// Recomputes the projection for a new aspect ratio, keeping fov and planes.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.set_perspective(self.fov_y, aspect, self.near, self.far);
    }

    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        math::look_at(&mut self.view, eye, center, up);
        self.position = eye;
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Direct access for callers that build the view themselves.
    pub fn view_mut(&mut self) -> &mut Mat4 {
        &mut self.view
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// `projection × view`, the matrix GPU uniforms usually want.
    pub fn view_projection(&self) -> Mat4 {
        let mut out = [0.0; 16];
        math::multiply(&mut out, &self.projection, &self.view);
        out
    }
}
