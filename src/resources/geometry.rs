//! Unit cube geometry shared by every engine.
//!
//! Vertices are interleaved `position(3) + normal(3) + uv(2)`, 24 of them
//! (four per face so every face gets its own normal), centred on the origin
//! with an edge length of 1. Faces wind counter-clockwise seen from outside.

use crate::data_structures::mesh::DEFAULT_STRIDE;

pub const CUBE_VERTEX_COUNT: usize = 24;
pub const CUBE_INDEX_COUNT: usize = 36;

const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    (
        [1.0, 0.0, 0.0],
        [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
    ),
    (
        [-1.0, 0.0, 0.0],
        [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
    ),
    (
        [0.0, 1.0, 0.0],
        [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
    ),
    (
        [0.0, -1.0, 0.0],
        [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
    ),
    (
        [0.0, 0.0, 1.0],
        [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
    ),
    (
        [0.0, 0.0, -1.0],
        [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]],
    ),
];

// Image rows grow downwards, so v = 0 is the top edge of a face.
const FACE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

pub fn cube_vertices() -> Vec<f32> {
    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT * DEFAULT_STRIDE);
    for (normal, corners) in FACES {
        for (corner, uv) in corners.iter().zip(FACE_UVS) {
            vertices.extend_from_slice(corner);
            vertices.extend_from_slice(&normal);
            vertices.extend_from_slice(&uv);
        }
    }
    vertices
}

pub fn cube_indices() -> Vec<u16> {
    (0..FACES.len() as u16)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}
