//! Position / rotation / scale of a renderable or a camera.

use cgmath::{InnerSpace, Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

/// Translation, rotation and scale composed on demand into a model matrix.
///
/// Each setter replaces its component and returns `&mut Self`, so a frame can
/// rewrite the whole transform in one chain:
///
/// ```
/// use cgmath::Vector3;
/// use playground::gfx::Transform;
///
/// let mut transform = Transform::default();
/// transform
///     .translate(Vector3::new(-2.0, 0.0, 0.0))
///     .rotate(Vector3::unit_y(), 0.5)
///     .scale(Vector3::new(0.5, 0.5, 0.5));
/// let model = transform.matrix();
/// # let _ = model;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Sets the translation.
    pub fn translate(&mut self, translation: Vector3<f32>) -> &mut Self {
        self.translation = translation;
        self
    }

    /// Sets the rotation to `angle` radians around `axis`.
    ///
    /// `axis` need not be unit length but must be non-zero.
    pub fn rotate(&mut self, axis: Vector3<f32>, angle: f32) -> &mut Self {
        self.rotation = Quaternion::from_axis_angle(axis.normalize(), Rad(angle));
        self
    }

    /// Sets the scale.
    pub fn scale(&mut self, scale: Vector3<f32>) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn position(&self) -> Vector3<f32> {
        self.translation
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    pub fn scaling(&self) -> Vector3<f32> {
        self.scale
    }

    /// Model matrix `T · R · S`, rebuilt from the components on every call.
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.translation);
        let r = Matrix4::from(self.rotation);
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, SquareMatrix, Vector4};

    fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
        for c in 0..4 {
            for r in 0..4 {
                assert!(
                    (a[c][r] - b[c][r]).abs() < 1e-5,
                    "column {c} row {r}: {} != {}",
                    a[c][r],
                    b[c][r]
                );
            }
        }
    }

    #[test]
    fn default_is_identity() {
        assert_matrix_eq(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn matrix_is_translation_rotation_scale_product() {
        let cases = [
            (Vector3::new(1.0, 2.0, 3.0), Vector3::unit_z(), 0.7, Vector3::new(0.5, 0.5, 0.5)),
            (Vector3::new(-2.0, 0.0, 0.0), Vector3::unit_y(), 3.1, Vector3::new(1.0, 2.0, 3.0)),
            (Vector3::new(0.0, 0.0, -12.0), Vector3::new(1.0, 1.0, 0.0), -1.2, Vector3::new(2.0, 1.0, 0.25)),
        ];

        for (translation, axis, angle, scale) in cases {
            let mut transform = Transform::default();
            transform.translate(translation).rotate(axis, angle).scale(scale);

            let expected = Matrix4::from_translation(translation)
                * Matrix4::from_axis_angle(axis.normalize(), Rad(angle))
                * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);

            assert_matrix_eq(transform.matrix(), expected);
        }
    }

    #[test]
    fn chain_order_does_not_change_the_composition() {
        let mut a = Transform::default();
        a.scale(Vector3::new(2.0, 2.0, 2.0))
            .rotate(Vector3::unit_x(), 0.3)
            .translate(Vector3::new(4.0, 0.0, 0.0));

        let mut b = Transform::default();
        b.translate(Vector3::new(4.0, 0.0, 0.0))
            .rotate(Vector3::unit_x(), 0.3)
            .scale(Vector3::new(2.0, 2.0, 2.0));

        assert_matrix_eq(a.matrix(), b.matrix());
    }

    #[test]
    fn setters_replace_rather_than_accumulate() {
        let mut transform = Transform::default();
        transform.translate(Vector3::new(1.0, 0.0, 0.0));
        transform.translate(Vector3::new(1.0, 0.0, 0.0));
        transform.rotate(Vector3::unit_z(), 1.0);
        transform.rotate(Vector3::unit_z(), 1.0);

        let expected = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0))
            * Matrix4::from_angle_z(Rad(1.0));
        assert_matrix_eq(transform.matrix(), expected);
    }

    #[test]
    fn scale_applies_before_rotation_and_translation() {
        let mut transform = Transform::default();
        transform
            .translate(Vector3::new(10.0, 0.0, 0.0))
            .rotate(Vector3::unit_z(), Rad::from(Deg(90.0)).0)
            .scale(Vector3::new(2.0, 1.0, 1.0));

        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (10,2,0)
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }
}
