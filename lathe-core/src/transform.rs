/// Standard 4x4 affine transform builders
///
/// All matrices act on row vectors, so translations live in the bottom row.
use crate::math::{deg2rad, Mat4};

/// Combined rotation Rx·Ry·Rz, angles in degrees
pub fn rotate_matrix(x: f64, y: f64, z: f64) -> Mat4 {
    let (sx, cx) = deg2rad(x).sin_cos();
    let rotate_x = Mat4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, cx, -sx, 0.0,
        0.0, sx, cx, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    let (sy, cy) = deg2rad(y).sin_cos();
    let rotate_y = Mat4::new(
        cy, 0.0, sy, 0.0,
        0.0, 1.0, 0.0, 0.0,
        -sy, 0.0, cy, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    let (sz, cz) = deg2rad(z).sin_cos();
    let rotate_z = Mat4::new(
        cz, -sz, 0.0, 0.0,
        sz, cz, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    rotate_x * rotate_y * rotate_z
}

pub fn scale_matrix(x: f64, y: f64, z: f64) -> Mat4 {
    Mat4::new_nonuniform_scaling(&nalgebra::Vector3::new(x, y, z))
}

pub fn translate_matrix(x: f64, y: f64, z: f64) -> Mat4 {
    Mat4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        x, y, z, 1.0,
    )
}

/// Reflect through the selected coordinate planes
pub fn mirror_matrix(yz: bool, xz: bool, xy: bool) -> Mat4 {
    let flip = |on: bool| if on { -1.0 } else { 1.0 };
    scale_matrix(flip(yz), flip(xz), flip(xy))
}

pub fn identity_matrix() -> Mat4 {
    Mat4::identity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    fn apply(m: &Mat4, v: Vec4) -> Vec4 {
        (v.transpose() * m).transpose()
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = rotate_matrix(0.0, 0.0, 0.0);
        assert!((matrix - identity_matrix()).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let m = rotate_matrix(30.0, -45.0, 110.0);
        assert!((m * m.transpose() - identity_matrix()).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_about_y() {
        // Row-vector convention: x axis turns toward +z for +90 degrees
        let rotated = apply(&rotate_matrix(0.0, 90.0, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!((rotated - Vec4::new(0.0, 0.0, 1.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_translation_in_bottom_row() {
        let moved = apply(&translate_matrix(1.0, 2.0, 3.0), Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(moved, Vec4::new(2.0, 3.0, 4.0, 1.0));
        // Directions ignore translation
        let direction = apply(&translate_matrix(1.0, 2.0, 3.0), Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(direction, Vec4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_scale_and_mirror() {
        let scaled = apply(&scale_matrix(2.0, 3.0, 4.0), Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(scaled, Vec4::new(2.0, 3.0, 4.0, 1.0));

        let mirrored = apply(&mirror_matrix(true, false, true), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(mirrored, Vec4::new(-1.0, 2.0, -3.0, 1.0));
    }
}
