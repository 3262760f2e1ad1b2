//! Hand-coded primitive geometry.
//!
//! Vertex positions are tightly packed `f32` triples; index lists describe
//! face outlines into those vertices. The data is shared by the demo driver
//! and exercised directly by the model tests.

/// Components per vertex (x, y, z), tightly packed with no padding.
pub const VERTEX_COMPONENTS: usize = 3;

/// Unit prism: four base corners and an apex.
pub static PRISM_VERTICES: [f32; 15] = [
    -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, //
    1.0, -1.0, -1.0, //
    -1.0, -1.0, -1.0, //
    0.0, 1.0, 0.0, // apex
];

/// The prism's six triangles as a single outline (18 elements).
pub static PRISM_INDICES: [u32; 18] = [
    0, 1, 4, //
    1, 2, 4, //
    2, 3, 4, //
    3, 0, 4, //
    0, 3, 2, //
    2, 1, 0,
];

/// Unit cube: eight corners.
pub static CUBE_VERTICES: [f32; 24] = [
    -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, //
    1.0, 1.0, 1.0, //
    -1.0, 1.0, 1.0, //
    -1.0, -1.0, -1.0, //
    1.0, -1.0, -1.0, //
    1.0, 1.0, -1.0, //
    -1.0, 1.0, -1.0,
];

/// The cube's twelve triangles as a single outline (36 elements).
pub static CUBE_INDICES: [u32; 36] = [
    0, 1, 3, //
    3, 1, 2, //
    1, 5, 2, //
    2, 5, 6, //
    5, 4, 7, //
    7, 6, 5, //
    4, 0, 3, //
    3, 7, 4, //
    0, 4, 5, //
    5, 1, 0, //
    3, 2, 6, //
    7, 3, 6,
];

/// Number of vertices in a packed coordinate array.
pub fn vertex_count(points: &[f32]) -> usize {
    points.len() / VERTEX_COMPONENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prism_has_five_vertices() {
        assert_eq!(vertex_count(&PRISM_VERTICES), 5);
    }

    #[test]
    fn cube_has_eight_vertices() {
        assert_eq!(vertex_count(&CUBE_VERTICES), 8);
    }

    #[test]
    fn prism_indices_stay_in_range() {
        let bound = vertex_count(&PRISM_VERTICES) as u32;
        assert!(PRISM_INDICES.iter().all(|&i| i < bound));
    }

    #[test]
    fn cube_indices_stay_in_range() {
        let bound = vertex_count(&CUBE_VERTICES) as u32;
        assert!(CUBE_INDICES.iter().all(|&i| i < bound));
    }
}
