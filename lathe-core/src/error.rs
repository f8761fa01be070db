/// Error types for the rendering pipeline
use thiserror::Error;

/// Failures of the dynamically sized matrix algebra
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("cannot multiply a {left:?} matrix by a {right:?} matrix")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// Invalid arguments to mesh construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("profile curve needs at least 2 points, got {0}")]
    TooFewProfilePoints(usize),
    #[error("revolution needs at least 3 segments, got {0}")]
    TooFewSegments(usize),
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertices}")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertices: usize,
    },
}

/// Failures of the homogeneous transform chain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("perspective divide by degenerate w = {w}")]
    DegenerateW { w: f64 },
}
