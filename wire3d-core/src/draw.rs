//! Flattening a scene into an ordered stream of face draws.
//!
//! Renderers consume [`FaceDraw`] records instead of walking the scene
//! themselves, so upload and render passes agree on draw order.

use nalgebra::Matrix4;

use crate::scene::{BufferId, Scene};

/// One face ready to draw: which buffer to bind, which indices to outline,
/// and the composed transform to hand to the shader.
#[derive(Debug, Clone)]
pub struct FaceDraw<'a> {
    /// Vertex buffer holding the owning primitive's points.
    pub buffer: BufferId,
    /// Index of the owning primitive within the scene.
    pub primitive: usize,
    /// Index of the face within its primitive.
    pub face: usize,
    /// Outline indices into the primitive's points.
    pub indices: &'a [u32],
    /// Primitive transform composed with the face's local transform.
    pub transform: Matrix4<f32>,
}

/// Flatten the scene into draw order: primitives first, faces within each.
///
/// Primitives without an attached buffer have nothing uploaded to draw from,
/// and faces without indices outline nothing; both are skipped.
pub fn face_draws<'a>(scene: &Scene<'a>) -> Vec<FaceDraw<'a>> {
    let mut draws = Vec::new();
    for (primitive_index, primitive) in scene.iter().enumerate() {
        let Some(buffer) = primitive.buffer() else {
            continue;
        };
        for (face_index, face) in primitive.faces().iter().enumerate() {
            if face.indices().is_empty() {
                continue;
            }
            draws.push(FaceDraw {
                buffer,
                primitive: primitive_index,
                face: face_index,
                indices: face.indices(),
                transform: primitive.transform() * face.transform(),
            });
        }
    }
    draws
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const OUTLINE: [u32; 3] = [0, 1, 2];

    #[test]
    fn draws_follow_scene_order() {
        let mut scene = Scene::new(2).unwrap();
        scene.init_faces(0, 2).unwrap();
        scene.init_faces(1, 1).unwrap();
        for (primitive, face) in [(0, 0), (0, 1), (1, 0)] {
            scene.face_mut(primitive, face).unwrap().set_indices(&OUTLINE);
        }
        scene.attach_buffer(0, BufferId(0)).unwrap();
        scene.attach_buffer(1, BufferId(1)).unwrap();

        let draws = face_draws(&scene);
        let order: Vec<_> = draws.iter().map(|d| (d.primitive, d.face)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(draws[2].buffer, BufferId(1));
    }

    #[test]
    fn transform_composes_primitive_then_face() {
        let mut scene = Scene::new(1).unwrap();
        scene.init_faces(0, 1).unwrap();
        scene.face_mut(0, 0).unwrap().set_indices(&OUTLINE);
        scene
            .face_mut(0, 0)
            .unwrap()
            .set_transform(Transform::scaling(2.0, 2.0, 2.0));
        scene
            .set_transform(0, Transform::translation(1.0, 0.0, 0.0))
            .unwrap();
        scene.attach_buffer(0, BufferId(0)).unwrap();

        let draws = face_draws(&scene);
        assert_eq!(draws.len(), 1);
        // Translation applies after the face's scale, not scaled by it.
        let p = draws[0].transform.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn unuploaded_primitives_are_skipped() {
        let mut scene = Scene::new(2).unwrap();
        scene.init_faces(0, 1).unwrap();
        scene.init_faces(1, 1).unwrap();
        scene.face_mut(0, 0).unwrap().set_indices(&OUTLINE);
        scene.face_mut(1, 0).unwrap().set_indices(&OUTLINE);
        scene.attach_buffer(1, BufferId(3)).unwrap();

        let draws = face_draws(&scene);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].primitive, 1);
    }

    #[test]
    fn cube_faces_flow_through_the_stream() {
        use crate::geometry::{CUBE_INDICES, CUBE_VERTICES};

        let mut scene = Scene::new(1).unwrap();
        scene.set_points(0, &CUBE_VERTICES).unwrap();
        scene.init_faces(0, 3).unwrap();
        for face in 0..3 {
            scene.face_mut(0, face).unwrap().set_indices(&CUBE_INDICES);
        }
        scene.face_mut(0, 1).unwrap().set_transform(
            Transform::scaling(0.2, 2.0, 2.0) * Transform::translation(10.0, 0.0, 0.0),
        );
        scene
            .set_transform(0, Transform::scaling(0.3, 0.3, 0.3))
            .unwrap();
        scene.attach_buffer(0, BufferId(0)).unwrap();

        let draws = face_draws(&scene);
        assert_eq!(draws.len(), 3);
        assert!(draws.iter().all(|draw| draw.indices.len() == 36));
        assert_eq!(draws[0].indices.as_ptr(), CUBE_INDICES.as_ptr());
        let flange = draws[1].transform.transform_point(&Point3::origin());
        assert_relative_eq!(flange, Point3::new(0.6, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn empty_faces_are_skipped() {
        let mut scene = Scene::new(1).unwrap();
        scene.init_faces(0, 2).unwrap();
        scene.face_mut(0, 1).unwrap().set_indices(&OUTLINE);
        scene.attach_buffer(0, BufferId(0)).unwrap();

        let draws = face_draws(&scene);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].face, 1);
    }
}
