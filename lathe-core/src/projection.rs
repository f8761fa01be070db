/// Camera, view/projection matrices and the homogeneous transform chain
use nalgebra::Point2;

use crate::error::TransformError;
use crate::input::OrbitState;
use crate::math::{normalize, Mat4, Vec3, Vec4};

/// Below this magnitude the perspective divide is refused
const W_EPSILON: f64 = 1e-12;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A vertex after viewport mapping, carrying its shading intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
}

impl ScreenVertex {
    pub fn new(x: f64, y: f64, intensity: f64) -> Self {
        Self { x, y, intensity }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Camera configuration for 3D rendering.
///
/// With `orbit` set, `position` is derived from the orbit around `target`
/// on every [`Camera::refresh`]; otherwise it stays where it was placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
    pub orbit: Option<OrbitState>,
}

impl Camera {
    /// Fixed camera looking from `position` at `target`
    pub fn fixed(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
            ..Self::default()
        }
    }

    /// Camera circling `target` at the given orbit
    pub fn orbiting(target: Vec3, orbit: OrbitState) -> Self {
        let mut camera = Self {
            target,
            orbit: Some(orbit),
            ..Self::default()
        };
        camera.refresh();
        camera
    }

    /// Re-derive the position from the orbit, if any
    pub fn refresh(&mut self) {
        if let Some(orbit) = &self.orbit {
            self.position = self.target + orbit.offset();
        }
    }

    /// Unit vector from the camera toward its target
    pub fn view_direction(&self) -> Vec3 {
        normalize(&(self.target - self.position))
    }

    pub fn view_matrix(&self) -> Mat4 {
        build_view_matrix(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self, aspect: f64) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => build_perspective_matrix(self.fov, aspect, self.near, self.far),
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * aspect;
                build_orthographic_matrix(width / 2.0, height / 2.0, self.near, self.far)
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: std::f64::consts::PI / 4.0, // 45 degrees
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
            orbit: None,
        }
    }
}

/// Right-handed look-at matrix; the camera looks down its local -z
pub fn build_view_matrix(position: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let z = normalize(&(position - target));
    let x = normalize(&up.cross(&z));
    let y = normalize(&z.cross(&x));

    Mat4::new(
        x.x, y.x, z.x, 0.0,
        x.y, y.y, z.y, 0.0,
        x.z, y.z, z.z, 0.0,
        -x.dot(position), -y.dot(position), -z.dot(position), 1.0,
    )
}

/// Symmetric frustum; `fov` is the vertical angle in radians
pub fn build_perspective_matrix(fov: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (fov / 2.0).tan();
    let range = 1.0 / (near - far);

    Mat4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (near + far) * range, -1.0,
        0.0, 0.0, 2.0 * near * far * range, 0.0,
    )
}

pub fn build_orthographic_matrix(half_width: f64, half_height: f64, near: f64, far: f64) -> Mat4 {
    let range = 1.0 / (near - far);

    Mat4::new(
        1.0 / half_width, 0.0, 0.0, 0.0,
        0.0, 1.0 / half_height, 0.0, 0.0,
        0.0, 0.0, 2.0 * range, 0.0,
        0.0, 0.0, (near + far) * range, 1.0,
    )
}

/// Push a point through `matrix` and divide by the resulting w
pub fn transform_vertex(vertex: &Vec3, matrix: &Mat4) -> Result<Vec3, TransformError> {
    let homogeneous = Vec4::new(vertex.x, vertex.y, vertex.z, 1.0).transpose() * matrix;
    let w = homogeneous[3];

    // Prevent division by near-zero w
    if w.abs() < W_EPSILON || !w.is_finite() {
        return Err(TransformError::DegenerateW { w });
    }

    Ok(Vec3::new(homogeneous[0] / w, homogeneous[1] / w, homogeneous[2] / w))
}

/// Map NDC to pixels; screen y grows downward
pub fn project_to_screen(ndc: &Vec3, width: usize, height: usize) -> Point2<f64> {
    Point2::new(
        (ndc.x + 1.0) * 0.5 * width as f64,
        (1.0 - ndc.y) * 0.5 * height as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{identity_matrix, rotate_matrix, translate_matrix};

    fn close(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn test_identity_transform() {
        for v in [
            Vec3::zeros(),
            Vec3::new(1.0, -2.0, 3.5),
            Vec3::new(-1e3, 42.0, 1e-4),
        ] {
            let out = transform_vertex(&v, &identity_matrix()).unwrap();
            assert!(close(&out, &v));
        }
    }

    #[test]
    fn test_transform_composition_order() {
        // Rotate first, then translate
        let m = rotate_matrix(0.0, 90.0, 0.0) * translate_matrix(0.0, 1.0, 0.0);
        let out = transform_vertex(&Vec3::x(), &m).unwrap();
        assert!(close(&out, &Vec3::new(0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_degenerate_w() {
        let mut m = identity_matrix();
        m[(3, 3)] = 0.0;
        let result = transform_vertex(&Vec3::new(1.0, 2.0, 3.0), &m);
        assert_eq!(result, Err(TransformError::DegenerateW { w: 0.0 }));
    }

    #[test]
    fn test_view_matrix() {
        let position = Vec3::new(1.0, 2.0, 5.0);
        let target = Vec3::new(1.0, 2.0, 0.0);
        let view = build_view_matrix(&position, &target, &Vec3::y());

        let eye = transform_vertex(&position, &view).unwrap();
        assert!(close(&eye, &Vec3::zeros()));

        // Target lies straight ahead on -z
        let ahead = transform_vertex(&target, &view).unwrap();
        assert!(close(&ahead, &Vec3::new(0.0, 0.0, -5.0)));

        // Up stays up
        let above = transform_vertex(&Vec3::new(1.0, 3.0, 0.0), &view).unwrap();
        assert!(above.y > 0.0);
    }

    #[test]
    fn test_perspective_depth_range() {
        let projection = build_perspective_matrix(std::f64::consts::FRAC_PI_2, 1.0, 1.0, 10.0);

        let near = transform_vertex(&Vec3::new(0.0, 0.0, -1.0), &projection).unwrap();
        assert!((near.z + 1.0).abs() < 1e-9);

        let far = transform_vertex(&Vec3::new(0.0, 0.0, -10.0), &projection).unwrap();
        assert!((far.z - 1.0).abs() < 1e-9);

        // 90 degree fov: the frustum edge maps to the NDC edge
        let edge = transform_vertex(&Vec3::new(2.0, 2.0, -2.0), &projection).unwrap();
        assert!((edge.x - 1.0).abs() < 1e-9);
        assert!((edge.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perspective_rejects_eye_plane() {
        let projection = build_perspective_matrix(1.0, 1.0, 0.1, 100.0);
        assert!(transform_vertex(&Vec3::new(1.0, 1.0, 0.0), &projection).is_err());
    }

    #[test]
    fn test_orthographic_depth_range() {
        let projection = build_orthographic_matrix(2.0, 1.0, 1.0, 10.0);
        let near = transform_vertex(&Vec3::new(2.0, -1.0, -1.0), &projection).unwrap();
        assert!(close(&near, &Vec3::new(1.0, -1.0, -1.0)));
        let far = transform_vertex(&Vec3::new(0.0, 0.0, -10.0), &projection).unwrap();
        assert!((far.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthographic_camera_frames_its_distance() {
        let camera = Camera {
            mode: ProjectionMode::Orthographic,
            ..Camera::fixed(Vec3::new(0.0, 0.0, 4.0), Vec3::zeros(), Vec3::y())
        };
        let projection = camera.projection_matrix(2.0);
        assert!((projection[(0, 0)] - 0.25).abs() < 1e-12);
        assert!((projection[(1, 1)] - 0.5).abs() < 1e-12);
        assert_eq!(projection[(2, 3)], 0.0);

        // Depth does not shrink anything
        let mvp = camera.view_matrix() * projection;
        let near = transform_vertex(&Vec3::new(4.0, 2.0, 2.0), &mvp).unwrap();
        let far = transform_vertex(&Vec3::new(4.0, 2.0, -2.0), &mvp).unwrap();
        assert!(close(&Vec3::new(near.x, near.y, 0.0), &Vec3::new(1.0, 1.0, 0.0)));
        assert!(close(&Vec3::new(far.x, far.y, 0.0), &Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_project_to_screen() {
        let top_left = project_to_screen(&Vec3::new(-1.0, 1.0, 0.0), 800, 600);
        assert_eq!(top_left, Point2::new(0.0, 0.0));
        let bottom_right = project_to_screen(&Vec3::new(1.0, -1.0, 0.0), 800, 600);
        assert_eq!(bottom_right, Point2::new(800.0, 600.0));
        let center = project_to_screen(&Vec3::zeros(), 800, 600);
        assert_eq!(center, Point2::new(400.0, 300.0));
    }

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!(close(&camera.view_direction(), &-Vec3::z()));
        assert!(camera.view_matrix().norm() > 0.0);
    }

    #[test]
    fn test_orbiting_camera_position() {
        let camera = Camera::orbiting(Vec3::zeros(), OrbitState::new(0.0, 0.0, 10.0));
        assert!(close(&camera.position, &Vec3::new(0.0, 0.0, 10.0)));

        let fixed = Camera::fixed(Vec3::new(0.0, 0.0, -5.0), Vec3::zeros(), Vec3::y());
        let mut refreshed = fixed.clone();
        refreshed.refresh();
        assert_eq!(refreshed, fixed);
    }
}
