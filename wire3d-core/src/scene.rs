//! Scene model: primitives made of faces, each with its own transform.
//!
//! A [`Scene`] owns a fixed set of [`Primitive`]s. Every primitive borrows a
//! packed coordinate array, carries a model transform, and holds the faces
//! drawn for it. Each [`Face`] borrows an index list and carries a local
//! transform that is composed with the primitive's when drawing.

use nalgebra::Matrix4;
use thiserror::Error;

use crate::transform::Transform;

/// Radians of yaw added to every primitive on each [`Scene::update`].
pub const SPIN_STEP: f32 = 0.005;

/// Errors raised by scene construction and indexed access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene must contain at least one primitive")]
    EmptyScene,
    #[error("primitive index {index} out of range for scene of {len}")]
    PrimitiveOutOfRange { index: usize, len: usize },
    #[error("face index {index} out of range for primitive with {len} faces")]
    FaceOutOfRange { index: usize, len: usize },
}

/// Handle to a renderer-side vertex buffer holding a primitive's points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferId(pub u32);

/// One face outline: an index list into the owning primitive's points and a
/// transform local to that primitive.
#[derive(Debug, Clone)]
pub struct Face<'a> {
    indices: &'a [u32],
    transform: Matrix4<f32>,
}

impl<'a> Face<'a> {
    /// An empty face with an identity transform.
    pub fn new() -> Self {
        Self {
            indices: &[],
            transform: Matrix4::identity(),
        }
    }

    /// Restore the face to its freshly initialized state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn set_indices(&mut self, indices: &'a [u32]) {
        self.indices = indices;
    }

    pub fn indices(&self) -> &'a [u32] {
        self.indices
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    pub fn transform(&self) -> &Matrix4<f32> {
        &self.transform
    }
}

impl<'a> Default for Face<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// A drawable object: shared points, per-object transform, and the faces
/// outlined over those points.
#[derive(Debug, Clone)]
pub struct Primitive<'a> {
    points: &'a [f32],
    faces: Vec<Face<'a>>,
    transform: Matrix4<f32>,
    buffer: Option<BufferId>,
}

impl<'a> Primitive<'a> {
    fn new() -> Self {
        Self {
            points: &[],
            faces: Vec::new(),
            transform: Matrix4::identity(),
            buffer: None,
        }
    }

    pub fn points(&self) -> &'a [f32] {
        self.points
    }

    /// Size of the point data in bytes, as uploaded to the vertex buffer.
    pub fn points_byte_len(&self) -> usize {
        std::mem::size_of_val(self.points)
    }

    pub fn faces(&self) -> &[Face<'a>] {
        &self.faces
    }

    pub fn transform(&self) -> &Matrix4<f32> {
        &self.transform
    }

    /// The vertex buffer this primitive's points were uploaded to, if any.
    pub fn buffer(&self) -> Option<BufferId> {
        self.buffer
    }
}

/// The full set of primitives animated and drawn each frame.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    primitives: Vec<Primitive<'a>>,
}

impl<'a> Scene<'a> {
    /// Create a scene holding `count` empty primitives.
    ///
    /// Every primitive starts with no points, no faces, an identity transform
    /// and no vertex buffer attached.
    pub fn new(count: usize) -> Result<Self, SceneError> {
        if count == 0 {
            return Err(SceneError::EmptyScene);
        }
        Ok(Self {
            primitives: (0..count).map(|_| Primitive::new()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive<'a>> {
        self.primitives.iter()
    }

    pub fn primitive(&self, index: usize) -> Result<&Primitive<'a>, SceneError> {
        self.primitives
            .get(index)
            .ok_or(SceneError::PrimitiveOutOfRange {
                index,
                len: self.primitives.len(),
            })
    }

    fn primitive_mut(&mut self, index: usize) -> Result<&mut Primitive<'a>, SceneError> {
        let len = self.primitives.len();
        self.primitives
            .get_mut(index)
            .ok_or(SceneError::PrimitiveOutOfRange { index, len })
    }

    /// Point the primitive at a packed coordinate array.
    pub fn set_points(&mut self, index: usize, points: &'a [f32]) -> Result<(), SceneError> {
        self.primitive_mut(index)?.points = points;
        Ok(())
    }

    /// Give the primitive `count` freshly initialized faces.
    ///
    /// Any faces the primitive already had are replaced.
    pub fn init_faces(&mut self, index: usize, count: usize) -> Result<(), SceneError> {
        let primitive = self.primitive_mut(index)?;
        primitive.faces = (0..count).map(|_| Face::new()).collect();
        Ok(())
    }

    pub fn face(&self, primitive: usize, face: usize) -> Result<&Face<'a>, SceneError> {
        let faces = self.primitive(primitive)?.faces();
        faces.get(face).ok_or(SceneError::FaceOutOfRange {
            index: face,
            len: faces.len(),
        })
    }

    pub fn face_mut(&mut self, primitive: usize, face: usize) -> Result<&mut Face<'a>, SceneError> {
        let faces = &mut self.primitive_mut(primitive)?.faces;
        let len = faces.len();
        faces
            .get_mut(face)
            .ok_or(SceneError::FaceOutOfRange { index: face, len })
    }

    pub fn set_transform(&mut self, index: usize, transform: Matrix4<f32>) -> Result<(), SceneError> {
        self.primitive_mut(index)?.transform = transform;
        Ok(())
    }

    pub fn transform(&self, index: usize) -> Result<&Matrix4<f32>, SceneError> {
        Ok(self.primitive(index)?.transform())
    }

    /// Record the vertex buffer a primitive's points were uploaded to.
    pub fn attach_buffer(&mut self, index: usize, buffer: BufferId) -> Result<(), SceneError> {
        let primitive = self.primitive_mut(index)?;
        debug_assert!(primitive.buffer.is_none(), "buffer attached twice");
        primitive.buffer = Some(buffer);
        Ok(())
    }

    /// Advance the animation one frame: every primitive yaws by [`SPIN_STEP`].
    ///
    /// The rotation is post-multiplied, so it spins each primitive about its
    /// own local Y axis.
    pub fn update(&mut self) {
        let spin = Transform::rotation_y(SPIN_STEP);
        for primitive in &mut self.primitives {
            primitive.transform *= spin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn empty_scene_is_rejected() {
        assert_eq!(Scene::new(0).unwrap_err(), SceneError::EmptyScene);
    }

    #[test]
    fn fresh_primitives_are_blank() {
        let scene = Scene::new(2).unwrap();
        assert_eq!(scene.len(), 2);
        for primitive in scene.iter() {
            assert!(primitive.points().is_empty());
            assert_eq!(primitive.points_byte_len(), 0);
            assert!(primitive.faces().is_empty());
            assert_eq!(primitive.transform(), &Matrix4::identity());
            assert_eq!(primitive.buffer(), None);
        }
    }

    #[test]
    fn points_report_their_byte_size() {
        let points = [0.0_f32, 1.0, 2.0, 3.0, 4.0, 5.0];
        let mut scene = Scene::new(1).unwrap();
        scene.set_points(0, &points).unwrap();
        let primitive = scene.primitive(0).unwrap();
        assert_eq!(primitive.points().len(), 6);
        assert_eq!(primitive.points_byte_len(), 6 * std::mem::size_of::<f32>());
    }

    #[test]
    fn init_faces_replaces_existing_faces() {
        let indices = [0_u32, 1, 2];
        let mut scene = Scene::new(1).unwrap();
        scene.init_faces(0, 3).unwrap();
        scene.face_mut(0, 2).unwrap().set_indices(&indices);

        scene.init_faces(0, 1).unwrap();
        assert_eq!(scene.primitive(0).unwrap().faces().len(), 1);
        assert_eq!(scene.face(0, 0).unwrap().index_count(), 0);
        assert_eq!(scene.face(0, 0).unwrap().transform(), &Matrix4::identity());
    }

    #[test]
    fn transform_round_trips() {
        let mut scene = Scene::new(2).unwrap();
        let placed = Transform::translation(1.0, 2.0, 3.0);
        scene.set_transform(1, placed).unwrap();
        assert_eq!(scene.transform(1).unwrap(), &placed);
        assert_eq!(scene.transform(0).unwrap(), &Matrix4::identity());
    }

    #[test]
    fn faces_round_trip_their_indices() {
        static FIRST: [u32; 2] = [0, 1];
        static SECOND: [u32; 3] = [1, 2, 3];
        static THIRD: [u32; 4] = [3, 2, 1, 0];

        let mut scene = Scene::new(1).unwrap();
        scene.init_faces(0, 3).unwrap();
        scene.face_mut(0, 0).unwrap().set_indices(&FIRST);
        scene.face_mut(0, 1).unwrap().set_indices(&SECOND);
        scene.face_mut(0, 2).unwrap().set_indices(&THIRD);

        assert_eq!(scene.face(0, 0).unwrap().index_count(), 2);
        assert_eq!(scene.face(0, 1).unwrap().index_count(), 3);
        assert_eq!(scene.face(0, 2).unwrap().index_count(), 4);
        // The face keeps a reference to the caller's data, not a copy.
        assert_eq!(scene.face(0, 1).unwrap().indices().as_ptr(), SECOND.as_ptr());
    }

    #[test]
    fn out_of_range_primitive_is_reported() {
        let mut scene = Scene::new(2).unwrap();
        let err = scene.set_points(5, &[]).unwrap_err();
        assert_eq!(err, SceneError::PrimitiveOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn out_of_range_face_is_reported() {
        let mut scene = Scene::new(1).unwrap();
        scene.init_faces(0, 2).unwrap();
        let err = scene.face(0, 2).unwrap_err();
        assert_eq!(err, SceneError::FaceOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn face_reset_clears_indices_and_transform() {
        let indices = [0_u32, 1, 2];
        let mut face = Face::new();
        face.set_indices(&indices);
        face.set_transform(Transform::translation(1.0, 2.0, 3.0));
        face.reset();
        assert_eq!(face.index_count(), 0);
        assert_eq!(face.transform(), &Matrix4::identity());
    }

    #[test]
    fn update_spins_about_y() {
        let mut scene = Scene::new(1).unwrap();
        let steps = 200;
        for _ in 0..steps {
            scene.update();
        }
        let m = scene.transform(0).unwrap();
        let angle = steps as f32 * SPIN_STEP;
        // A pure rotation keeps volume; its trace fixes the angle.
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(m.trace(), 2.0 + 2.0 * angle.cos(), epsilon = 1e-4);
        // Y is the spin axis, so height is preserved.
        let p = m.transform_point(&Point3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 3.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn update_composes_on_the_right() {
        let mut scene = Scene::new(1).unwrap();
        let offset = Transform::translation(5.0, 0.0, 0.0);
        scene.set_transform(0, offset).unwrap();
        scene.update();

        let expected = offset * Transform::rotation_y(SPIN_STEP);
        assert_relative_eq!(*scene.transform(0).unwrap(), expected, epsilon = 1e-6);
        // Post-multiplication leaves the translation column untouched.
        assert_relative_eq!(scene.transform(0).unwrap()[(0, 3)], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn attach_buffer_records_the_handle() {
        let mut scene = Scene::new(1).unwrap();
        scene.attach_buffer(0, BufferId(7)).unwrap();
        assert_eq!(scene.primitive(0).unwrap().buffer(), Some(BufferId(7)));
    }
}
