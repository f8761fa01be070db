/// Solid-of-revolution mesh construction and vertex normals
use log::{debug, warn};
use nalgebra::Point2;

use crate::error::GeometryError;
use crate::math::{deg2rad, normalize, Vec3};

/// An indexed triangle mesh.
///
/// Vertices are stored ring-major: all profile points of ring 0, then ring 1,
/// and so on. Every triangle index is below `vertices.len()`; the fields are
/// private so that only [`Mesh::from_parts`] and the revolution builder can
/// create one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a mesh from raw buffers, checking every triangle index
    pub fn from_parts(vertices: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Result<Self, GeometryError> {
        for (triangle, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(GeometryError::IndexOutOfRange {
                    triangle,
                    index,
                    vertices: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, triangles })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }
}

/// Revolve `profile` around the y axis, rejecting invalid arguments
pub fn try_generate_revolution_mesh(profile: &[Point2<f64>], segments: usize) -> Result<Mesh, GeometryError> {
    if profile.len() < 2 {
        return Err(GeometryError::TooFewProfilePoints(profile.len()));
    }
    if segments < 3 {
        return Err(GeometryError::TooFewSegments(segments));
    }

    let mut vertices = Vec::with_capacity(segments * profile.len());
    for i in 0..segments {
        let angle = deg2rad(i as f64 / segments as f64 * 360.0);
        let (sin, cos) = angle.sin_cos();
        for point in profile {
            vertices.push(Vec3::new(point.x * cos, point.y, point.x * sin));
        }
    }

    let per_ring = profile.len();
    let mut triangles = Vec::with_capacity(2 * segments * (per_ring - 1));
    for i in 0..segments {
        let next = (i + 1) % segments;
        for j in 0..per_ring - 1 {
            let a = i * per_ring + j;
            let b = i * per_ring + j + 1;
            let c = next * per_ring + j;
            let d = next * per_ring + j + 1;

            triangles.push([a, b, c]);
            triangles.push([b, d, c]);
        }
    }

    debug!(
        "revolved {} profile points into {} vertices, {} triangles",
        per_ring,
        vertices.len(),
        triangles.len()
    );

    Ok(Mesh { vertices, triangles })
}

/// Revolve `profile` around the y axis.
///
/// Invalid arguments are logged and produce an empty mesh, which renders as
/// a no-op.
pub fn generate_revolution_mesh(profile: &[Point2<f64>], segments: usize) -> Mesh {
    try_generate_revolution_mesh(profile, segments).unwrap_or_else(|err| {
        warn!("generate_revolution_mesh: {}", err);
        Mesh::new()
    })
}

/// Area-weighted vertex normals.
///
/// Each triangle adds its unnormalized edge cross product to all three of its
/// vertices; the sums are normalized at the end. Vertices whose sum cancels
/// out get the zero vector.
pub fn compute_vertex_normals(vertices: &[Vec3], triangles: &[[usize; 3]]) -> Vec<Vec3> {
    let mut sums = vec![Vec3::zeros(); vertices.len()];
    for &[i1, i2, i3] in triangles {
        let normal = (vertices[i2] - vertices[i1]).cross(&(vertices[i3] - vertices[i1]));
        sums[i1] += normal;
        sums[i2] += normal;
        sums[i3] += normal;
    }
    sums.iter().map(normalize).collect()
}

/// Unit normal of a single triangle, following its winding
pub fn face_normal(vertices: &[Vec3], triangle: &[usize; 3]) -> Vec3 {
    let [i1, i2, i3] = *triangle;
    normalize(&(vertices[i2] - vertices[i1]).cross(&(vertices[i3] - vertices[i1])))
}

/// Half circle from the south pole to the north pole, `circles + 1` points
pub fn sphere_profile(circles: usize) -> Vec<Point2<f64>> {
    (0..=circles)
        .map(|i| {
            let angle = std::f64::consts::PI * (i as f64 / circles.max(1) as f64 - 0.5);
            Point2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Straight wall of an open cylinder standing on the xz plane
pub fn cylinder_profile(radius: f64, height: f64) -> Vec<Point2<f64>> {
    vec![Point2::new(radius, 0.0), Point2::new(radius, height)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_counts() {
        for (points, segments) in [(2, 3), (5, 8), (37, 36)] {
            let profile = sphere_profile(points - 1);
            assert_eq!(profile.len(), points);
            let mesh = generate_revolution_mesh(&profile, segments);
            assert_eq!(mesh.vertices().len(), segments * points);
            assert_eq!(mesh.triangles().len(), 2 * segments * (points - 1));
        }
    }

    #[test]
    fn test_triangle_indices_in_range() {
        let mesh = generate_revolution_mesh(&sphere_profile(12), 7);
        let count = mesh.vertices().len();
        assert!(mesh.triangles().iter().flatten().all(|&i| i < count));
    }

    #[test]
    fn test_invalid_arguments() {
        let profile = cylinder_profile(1.0, 1.0);
        assert_eq!(
            try_generate_revolution_mesh(&profile[..1], 4),
            Err(GeometryError::TooFewProfilePoints(1))
        );
        assert_eq!(
            try_generate_revolution_mesh(&profile, 2),
            Err(GeometryError::TooFewSegments(2))
        );
        assert!(generate_revolution_mesh(&[], 12).is_empty());
        assert!(generate_revolution_mesh(&profile, 0).is_empty());
    }

    #[test]
    fn test_unit_cylinder() {
        let mesh = generate_revolution_mesh(&cylinder_profile(1.0, 1.0), 4);
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.triangles().len(), 8);
        for v in mesh.vertices() {
            assert!(((v.x * v.x + v.z * v.z).sqrt() - 1.0).abs() < 1e-12);
            assert!(v.y == 0.0 || v.y == 1.0);
        }
        // Ring 1 sits a quarter turn from ring 0
        assert!((mesh.vertices()[2] - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = generate_revolution_mesh(&sphere_profile(18), 24);
        let normals = compute_vertex_normals(mesh.vertices(), mesh.triangles());
        assert_eq!(normals.len(), mesh.vertices().len());
        for n in &normals {
            let len = n.norm();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let mesh = generate_revolution_mesh(&cylinder_profile(1.0, 1.0), 16);
        let normals = compute_vertex_normals(mesh.vertices(), mesh.triangles());
        for (v, n) in mesh.vertices().iter().zip(&normals) {
            let radial = Vec3::new(v.x, 0.0, v.z);
            assert!(n.dot(&radial) > 0.0);
        }
        for triangle in mesh.triangles() {
            let n = face_normal(mesh.vertices(), triangle);
            let v = mesh.vertices()[triangle[0]];
            assert!(n.dot(&Vec3::new(v.x, 0.0, v.z)) > 0.0);
        }
    }

    #[test]
    fn test_from_parts_checks_indices() {
        let vertices = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        assert!(Mesh::from_parts(vertices.clone(), vec![[0, 1, 2]]).is_ok());
        assert_eq!(
            Mesh::from_parts(vertices, vec![[0, 1, 2], [2, 1, 3]]),
            Err(GeometryError::IndexOutOfRange {
                triangle: 1,
                index: 3,
                vertices: 3
            })
        );
    }

    #[test]
    fn test_cancelling_normals_give_zero() {
        // Same triangle with both windings
        let vertices = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        let normals = compute_vertex_normals(&vertices, &[[0, 1, 2], [0, 2, 1]]);
        assert!(normals.iter().all(|n| *n == Vec3::zeros()));
    }

    #[test]
    fn test_area_weighting() {
        // Small triangle facing +z, large triangle facing +x, sharing vertex 0
        let vertices = vec![
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
        ];
        let normals = compute_vertex_normals(&vertices, &[[0, 1, 2], [0, 3, 4]]);
        assert!(normals[0].x > normals[0].z * 50.0);
    }
}
