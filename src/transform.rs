use nalgebra::{Rotation3, Vector3};

use crate::geometry::{Fp, Mat4f, Triangle, Vec3f, Vec4f, EPS};

/// Composes `T * Rx * Ry * Rz * S`. Rotation angles are in degrees.
pub fn build_transformation_matrix(translation: &Vec3f, rotation: &Vec3f, scale: &Vec3f) -> Mat4f {
    let rotation_matrix = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x.to_radians())
        * Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y.to_radians())
        * Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z.to_radians());
    Mat4f::new_translation(translation)
        * rotation_matrix.to_homogeneous()
        * Mat4f::new_nonuniform_scaling(scale)
}

/// Returns `(M^-1, (M^-1)^T)`, or `None` when `m` is singular.
pub fn inverse_transforms(m: &Mat4f) -> Option<(Mat4f, Mat4f)> {
    let inverse = m.try_inverse()?;
    let inverse_transpose = inverse.transpose();
    Some((inverse, inverse_transpose))
}

pub fn one_extend(v: &Vec3f) -> Vec4f {
    Vec4f::new(v.x, v.y, v.z, 1.0 as Fp)
}

pub fn zero_extend(v: &Vec3f) -> Vec4f {
    Vec4f::new(v.x, v.y, v.z, 0.0 as Fp)
}

pub fn pp4_vector_slice(v: &Vec4f) -> Vec3f {
    Vec3f::new(v.x, v.y, v.z)
}

/// Applies `m` to a point. No perspective divide: scene transforms are affine.
pub fn transform_point(m: &Mat4f, p: &Vec3f) -> Vec3f {
    pp4_vector_slice(&(m * one_extend(p)))
}

/// Applies a normal matrix (the inverse transpose of the object transform).
pub fn transform_normal(normal_matrix: &Mat4f, n: &Vec3f) -> Vec3f {
    let transformed = pp4_vector_slice(&(normal_matrix * zero_extend(n)));
    if transformed.norm() > EPS {
        transformed.normalize()
    } else {
        transformed
    }
}

/// Moves a triangle into world space in place. Normals follow only when a
/// normal matrix is available.
pub fn bake_triangle(triangle: &mut Triangle, transform: &Mat4f, normal_matrix: Option<&Mat4f>) {
    triangle.v0 = transform_point(transform, &triangle.v0);
    triangle.v1 = transform_point(transform, &triangle.v1);
    triangle.v2 = transform_point(transform, &triangle.v2);
    if let Some(normal_matrix) = normal_matrix {
        triangle.n0 = transform_normal(normal_matrix, &triangle.n0);
        triangle.n1 = transform_normal(normal_matrix, &triangle.n1);
        triangle.n2 = transform_normal(normal_matrix, &triangle.n2);
    }
}
