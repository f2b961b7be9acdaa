#![allow(dead_code)]

pub mod recording_gl;

use block_ngin::{
    math::{self, Mat4},
    resources,
};

/// Six vertices (two triangles) in the default stride-8 layout.
pub fn quad_vertices() -> Vec<f32> {
    #[rustfmt::skip]
    let v = vec![
        -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 1.0,
         0.5, -0.5, 0.0,  0.0, 0.0, 1.0,  1.0, 1.0,
         0.5,  0.5, 0.0,  0.0, 0.0, 1.0,  1.0, 0.0,
        -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 1.0,
         0.5,  0.5, 0.0,  0.0, 0.0, 1.0,  1.0, 0.0,
        -0.5,  0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0,
    ];
    v
}

pub fn cube() -> (Vec<f32>, Vec<u16>) {
    (resources::cube_vertices(), resources::cube_indices())
}

pub fn assert_mat_eq(a: &Mat4, b: &Mat4) {
    for i in 0..16 {
        approx::assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-5);
    }
}

pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    math::multiply(&mut out, a, b);
    out
}
