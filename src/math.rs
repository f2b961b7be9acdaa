//! 4x4 transform matrices stored as 16 contiguous floats.
//!
//! Matrices use the OpenGL column-major layout: element `(row, col)` lives at
//! index `col * 4 + row`, so a translation sits in indices 12, 13 and 14.
//!
//! Every operation writes into a caller-supplied `out` matrix and hands the
//! same reference back, which allows reusing scratch matrices frame after
//! frame without allocating:
//!
//! ```
//! use block_ngin::math::{self, Mat4};
//!
//! let mut model = math::IDENTITY;
//! let mut tmp: Mat4 = [0.0; 16];
//! math::rotate_y(&mut tmp, &model, 0.5);
//! math::translate(&mut model, &tmp, [1.0, 0.0, 0.0]);
//! ```
//!
//! Products follow the column-vector convention: `multiply(out, a, b)` yields
//! `a × b`, which applies `b` first and `a` second.

pub type Mat4 = [f32; 16];
pub type Vec3 = [f32; 3];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

pub fn identity(out: &mut Mat4) -> &mut Mat4 {
    *out = IDENTITY;
    out
}

pub fn copy<'a>(out: &'a mut Mat4, a: &Mat4) -> &'a mut Mat4 {
    out.copy_from_slice(a);
    out
}

/// `out = a × b`.
pub fn multiply<'a>(out: &'a mut Mat4, a: &Mat4, b: &Mat4) -> &'a mut Mat4 {
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    out
}

/// `out = a × T(v)`.
pub fn translate<'a>(out: &'a mut Mat4, a: &Mat4, v: Vec3) -> &'a mut Mat4 {
    let [x, y, z] = v;
    out[..12].copy_from_slice(&a[..12]);
    for row in 0..4 {
        out[12 + row] = a[row] * x + a[4 + row] * y + a[8 + row] * z + a[12 + row];
    }
    out
}

/// `out = a × S(v)`.
pub fn scale<'a>(out: &'a mut Mat4, a: &Mat4, v: Vec3) -> &'a mut Mat4 {
    for row in 0..4 {
        out[row] = a[row] * v[0];
        out[4 + row] = a[4 + row] * v[1];
        out[8 + row] = a[8 + row] * v[2];
        out[12 + row] = a[12 + row];
    }
    out
}

/// `out = a × Rx(rad)`.
pub fn rotate_x<'a>(out: &'a mut Mat4, a: &Mat4, rad: f32) -> &'a mut Mat4 {
    let (s, c) = rad.sin_cos();
    out[..4].copy_from_slice(&a[..4]);
    out[12..].copy_from_slice(&a[12..]);
    for row in 0..4 {
        let y = a[4 + row];
        let z = a[8 + row];
        out[4 + row] = y * c + z * s;
        out[8 + row] = z * c - y * s;
    }
    out
}

/// `out = a × Ry(rad)`.
pub fn rotate_y<'a>(out: &'a mut Mat4, a: &Mat4, rad: f32) -> &'a mut Mat4 {
    let (s, c) = rad.sin_cos();
    out[4..8].copy_from_slice(&a[4..8]);
    out[12..].copy_from_slice(&a[12..]);
    for row in 0..4 {
        let x = a[row];
        let z = a[8 + row];
        out[row] = x * c - z * s;
        out[8 + row] = x * s + z * c;
    }
    out
}

/// `out = a × Rz(rad)`.
pub fn rotate_z<'a>(out: &'a mut Mat4, a: &Mat4, rad: f32) -> &'a mut Mat4 {
    let (s, c) = rad.sin_cos();
    out[8..].copy_from_slice(&a[8..]);
    for row in 0..4 {
        let x = a[row];
        let y = a[4 + row];
        out[row] = x * c + y * s;
        out[4 + row] = y * c - x * s;
    }
    out
}

/// Cofactor pairs shared by [`determinant`] and [`invert`].
fn cofactors(a: &Mat4) -> [f32; 12] {
    [
        a[0] * a[5] - a[1] * a[4],
        a[0] * a[6] - a[2] * a[4],
        a[0] * a[7] - a[3] * a[4],
        a[1] * a[6] - a[2] * a[5],
        a[1] * a[7] - a[3] * a[5],
        a[2] * a[7] - a[3] * a[6],
        a[8] * a[13] - a[9] * a[12],
        a[8] * a[14] - a[10] * a[12],
        a[8] * a[15] - a[11] * a[12],
        a[9] * a[14] - a[10] * a[13],
        a[9] * a[15] - a[11] * a[13],
        a[10] * a[15] - a[11] * a[14],
    ]
}

fn det_from(b: &[f32; 12]) -> f32 {
    b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8] - b[4] * b[7] + b[5] * b[6]
}

pub fn determinant(a: &Mat4) -> f32 {
    det_from(&cofactors(a))
}

/// Inverts `a` into `out`.
///
/// Returns `None` when the determinant is exactly zero. `out` is not written
/// in that case, so callers must check the result before using the matrix.
pub fn invert<'a>(out: &'a mut Mat4, a: &Mat4) -> Option<&'a mut Mat4> {
    let b = cofactors(a);
    let det = det_from(&b);
    if det == 0.0 {
        return None;
    }
    let inv = 1.0 / det;

    out[0] = (a[5] * b[11] - a[6] * b[10] + a[7] * b[9]) * inv;
    out[1] = (a[2] * b[10] - a[1] * b[11] - a[3] * b[9]) * inv;
    out[2] = (a[13] * b[5] - a[14] * b[4] + a[15] * b[3]) * inv;
    out[3] = (a[10] * b[4] - a[9] * b[5] - a[11] * b[3]) * inv;
    out[4] = (a[6] * b[8] - a[4] * b[11] - a[7] * b[7]) * inv;
    out[5] = (a[0] * b[11] - a[2] * b[8] + a[3] * b[7]) * inv;
    out[6] = (a[14] * b[2] - a[12] * b[5] - a[15] * b[1]) * inv;
    out[7] = (a[8] * b[5] - a[10] * b[2] + a[11] * b[1]) * inv;
    out[8] = (a[4] * b[10] - a[5] * b[8] + a[7] * b[6]) * inv;
    out[9] = (a[1] * b[8] - a[0] * b[10] - a[3] * b[6]) * inv;
    out[10] = (a[12] * b[4] - a[13] * b[2] + a[15] * b[0]) * inv;
    out[11] = (a[9] * b[2] - a[8] * b[4] - a[11] * b[0]) * inv;
    out[12] = (a[5] * b[7] - a[4] * b[9] - a[6] * b[6]) * inv;
    out[13] = (a[0] * b[9] - a[1] * b[7] + a[2] * b[6]) * inv;
    out[14] = (a[13] * b[1] - a[12] * b[3] - a[14] * b[0]) * inv;
    out[15] = (a[8] * b[3] - a[9] * b[1] + a[10] * b[0]) * inv;
    Some(out)
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Normalizes `v`, or returns `None` for a zero-length (or non-finite) input.
pub fn normalize(v: Vec3) -> Option<Vec3> {
    let len = dot(v, v).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some([v[0] / len, v[1] / len, v[2] / len])
}

/// Right-handed view matrix looking from `eye` towards `center`.
///
/// Degenerate input never yields NaN: when `eye == center` the camera keeps
/// looking down `-Z`, and an `up` vector parallel to the view direction is
/// swapped for `+Z` (or `+X` when the view itself runs along Z).
pub fn look_at<'a>(out: &'a mut Mat4, eye: Vec3, center: Vec3, up: Vec3) -> &'a mut Mat4 {
    let z = normalize(sub(eye, center)).unwrap_or([0.0, 0.0, 1.0]);
    let x = normalize(cross(up, z)).unwrap_or_else(|| {
        let fallback = if z[2].abs() < 0.999 {
            [0.0, 0.0, 1.0]
        } else {
            [1.0, 0.0, 0.0]
        };
        normalize(cross(fallback, z)).unwrap_or([1.0, 0.0, 0.0])
    });
    let y = cross(z, x);

    *out = [
        x[0], y[0], z[0], 0.0, //
        x[1], y[1], z[1], 0.0, //
        x[2], y[2], z[2], 0.0, //
        -dot(x, eye), -dot(y, eye), -dot(z, eye), 1.0,
    ];
    out
}

/// OpenGL perspective projection (clip depth -1..1).
///
/// `far` may be `f32::INFINITY`, which produces the infinite far plane limit.
pub fn perspective(out: &mut Mat4, fovy: f32, aspect: f32, near: f32, far: f32) -> &mut Mat4 {
    let f = 1.0 / (fovy / 2.0).tan();
    *out = [0.0; 16];
    out[0] = f / aspect;
    out[5] = f;
    out[11] = -1.0;
    if far.is_finite() {
        let nf = 1.0 / (near - far);
        out[10] = (far + near) * nf;
        out[14] = 2.0 * far * near * nf;
    } else {
        out[10] = -1.0;
        out[14] = -2.0 * near;
    }
    out
}

/// OpenGL orthographic projection (clip depth -1..1).
pub fn ortho(
    out: &mut Mat4,
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> &mut Mat4 {
    let lr = 1.0 / (left - right);
    let bt = 1.0 / (bottom - top);
    let nf = 1.0 / (near - far);
    *out = [0.0; 16];
    out[0] = -2.0 * lr;
    out[5] = -2.0 * bt;
    out[10] = 2.0 * nf;
    out[12] = (left + right) * lr;
    out[13] = (top + bottom) * bt;
    out[14] = (far + near) * nf;
    out[15] = 1.0;
    out
}

/// Applies `m` to the point `p` (w = 1) and returns the homogeneous result.
pub fn transform_point(m: &Mat4, p: Vec3) -> [f32; 4] {
    let mut r = [0.0; 4];
    for (row, value) in r.iter_mut().enumerate() {
        *value = m[row] * p[0] + m[4 + row] * p[1] + m[8 + row] * p[2] + m[12 + row];
    }
    r
}

/// Applies the upper 3x3 block of `m` to the direction `v`.
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    let mut r = [0.0; 3];
    for (row, value) in r.iter_mut().enumerate() {
        *value = m[row] * v[0] + m[4 + row] * v[1] + m[8 + row] * v[2];
    }
    r
}

pub fn from_cgmath(m: &cgmath::Matrix4<f32>) -> Mat4 {
    *AsRef::<[f32; 16]>::as_ref(m)
}

pub fn to_cgmath(m: &Mat4) -> cgmath::Matrix4<f32> {
    cgmath::Matrix4::new(
        m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12], m[13],
        m[14], m[15],
    )
}

/// Column arrays in the `[[f32; 4]; 4]` shape GPU uniform structs expect.
pub fn to_cols(m: &Mat4) -> [[f32; 4]; 4] {
    [
        [m[0], m[1], m[2], m[3]],
        [m[4], m[5], m[6], m[7]],
        [m[8], m[9], m[10], m[11]],
        [m[12], m[13], m[14], m[15]],
    ]
}
