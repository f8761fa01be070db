/// Vector and matrix algebra primitives
///
/// Vectors are treated as rows and multiplied on the left of a matrix, so
/// transforms compose left to right: `model * view * projection`.
use nalgebra::{DMatrix, Matrix4, Point2, Vector3, Vector4};

use crate::error::MathError;

pub type Vec3 = Vector3<f64>;
pub type Vec4 = Vector4<f64>;
pub type Mat4 = Matrix4<f64>;

pub fn deg2rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

pub fn rad2deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

/// Multiply an N×M matrix by an M×K matrix
pub fn product_matrices(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>, MathError> {
    if a.ncols() != b.nrows() {
        return Err(MathError::DimensionMismatch {
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(a * b)
}

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    a.cross(b)
}

/// Cross product over untyped components; anything but two 3-vectors gives zero
pub fn cross_slices(a: &[f64], b: &[f64]) -> Vec3 {
    match (a, b) {
        ([ax, ay, az], [bx, by, bz]) => Vec3::new(
            ay * bz - az * by,
            az * bx - ax * bz,
            ax * by - ay * bx,
        ),
        _ => Vec3::zeros(),
    }
}

pub fn length(v: &Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Scale to unit length. A zero vector stays zero.
pub fn normalize(v: &Vec3) -> Vec3 {
    let len = length(v);
    if len == 0.0 {
        return Vec3::zeros();
    }
    v / len
}

/// Blend the attribute carried by two endpoints at `point`.
///
/// `point` is projected onto the segment direction and the resulting
/// parameter is used unclamped, so points beyond either end extrapolate.
/// Coincident endpoints yield the mean of their attributes.
pub fn linear_interpolation(point: Point2<f64>, start: (Point2<f64>, f64), end: (Point2<f64>, f64)) -> f64 {
    let (p0, a0) = start;
    let (p1, a1) = end;

    let direction = p1 - p0;
    let length_sq = direction.norm_squared();
    if length_sq == 0.0 {
        return (a0 + a1) / 2.0;
    }

    let t = (point - p0).dot(&direction) / length_sq;
    (a1 - a0) * t + a0
}
