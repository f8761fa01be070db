/// Scanline rasterizer with linearly interpolated (Gouraud) intensity
use crate::math::linear_interpolation;
use crate::projection::ScreenVertex;
use nalgebra::Point2;

/// Edges closer than this to vertical or horizontal, in pixels, skip the
/// slope solve and report their first endpoint's x
const EDGE_EPSILON: f64 = 0.1;

/// Grayscale pixel sink the rasterizer draws into
pub trait Framebuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Write one pixel; R = G = B = `luminance`
    fn plot(&mut self, x: usize, y: usize, luminance: u8);
    /// Fill the whole surface
    fn clear(&mut self, luminance: u8);
}

/// Plain in-memory luminance buffer, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFramebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GrayFramebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocate for a new viewport; contents are cleared
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height];
    }
}

impl Framebuffer for GrayFramebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, x: usize, y: usize, luminance: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = luminance;
        }
    }

    fn clear(&mut self, luminance: u8) {
        self.pixels.fill(luminance);
    }
}

/// Map an unclamped intensity onto 0..=255
pub fn quantize(intensity: f64) -> u8 {
    (intensity * 255.0).floor().clamp(0.0, 255.0) as u8
}

/// A screen-space triangle edge with intensity at both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: ScreenVertex,
    pub end: ScreenVertex,
}

impl Edge {
    pub fn new(start: ScreenVertex, end: ScreenVertex) -> Self {
        Self { start, end }
    }

    pub fn min_y(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    pub fn max_y(&self) -> f64 {
        self.start.y.max(self.end.y)
    }

    /// Solve the edge's line for x at scanline `y`
    pub fn x_at(&self, y: f64) -> f64 {
        let dx = self.start.x - self.end.x;
        let dy = self.start.y - self.end.y;
        if dx.abs() < EDGE_EPSILON || dy.abs() < EDGE_EPSILON {
            return self.start.x;
        }
        let k = dy / dx;
        let b = self.start.y - k * self.start.x;
        (y - b) / k
    }

    /// Intensity at `(x, y)` projected onto the edge
    pub fn intensity_at(&self, x: f64, y: f64) -> f64 {
        linear_interpolation(
            Point2::new(x, y),
            (self.start.position(), self.start.intensity),
            (self.end.position(), self.end.intensity),
        )
    }
}

/// Paint the horizontal strip bounded by two edges.
///
/// Only scanlines covered by both edges (and the framebuffer) are visited.
/// Pixels are overwritten, never blended. Returns the number of pixels
/// written.
pub fn fill_triangle_edge<F: Framebuffer + ?Sized>(framebuffer: &mut F, a: &Edge, b: &Edge) -> usize {
    let width = framebuffer.width() as i64;
    let height = framebuffer.height() as f64;

    let y_min = a.min_y().max(b.min_y()).max(0.0).ceil() as i64;
    let y_max = a.max_y().min(b.max_y()).min(height).ceil() as i64;

    let mut written = 0;
    for y in y_min..y_max {
        let yf = y as f64;
        let x0 = a.x_at(yf).trunc();
        let x1 = b.x_at(yf).trunc();

        let left = (Point2::new(x0, yf), a.intensity_at(x0, yf));
        let right = (Point2::new(x1, yf), b.intensity_at(x1, yf));

        let start = (x0.min(x1) as i64).max(0);
        let end = (x0.max(x1) as i64).min(width);
        for x in start..end {
            let intensity = linear_interpolation(Point2::new(x as f64, yf), left, right);
            framebuffer.plot(x as usize, y as usize, quantize(intensity));
            written += 1;
        }
    }
    written
}

/// Fill a triangle as three strips, one per pair of edges.
///
/// The pair meeting at the vertically middle vertex spans a single y value
/// and paints nothing, so the other two strips tile the triangle.
pub fn fill_triangle<F: Framebuffer + ?Sized>(
    framebuffer: &mut F,
    v1: ScreenVertex,
    v2: ScreenVertex,
    v3: ScreenVertex,
) -> usize {
    let e12 = Edge::new(v1, v2);
    let e13 = Edge::new(v1, v3);
    let e23 = Edge::new(v2, v3);

    fill_triangle_edge(framebuffer, &e12, &e13)
        + fill_triangle_edge(framebuffer, &e12, &e23)
        + fill_triangle_edge(framebuffer, &e13, &e23)
}

/// Clip a segment to the rectangle `[0, max_x] x [0, max_y]` (Liang-Barsky)
fn clip_line(from: Point2<f64>, to: Point2<f64>, max_x: f64, max_y: f64) -> Option<(Point2<f64>, Point2<f64>)> {
    let delta = to - from;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-delta.x, from.x),
        (delta.x, max_x - from.x),
        (-delta.y, from.y),
        (delta.y, max_y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((from + delta * t0, from + delta * t1))
}

/// Plot a one pixel wide line in a single luminance (Bresenham).
///
/// The segment is clipped to the framebuffer first, so endpoints far
/// off-screen cost nothing extra. Returns the number of pixels written.
pub fn draw_line<F: Framebuffer + ?Sized>(framebuffer: &mut F, from: Point2<f64>, to: Point2<f64>, luminance: u8) -> usize {
    let (width, height) = (framebuffer.width(), framebuffer.height());
    if width == 0 || height == 0 || !from.coords.iter().chain(to.coords.iter()).all(|c| c.is_finite()) {
        return 0;
    }
    let Some((from, to)) = clip_line(from, to, (width - 1) as f64, (height - 1) as f64) else {
        return 0;
    };

    let (mut x, mut y) = (from.x.round() as i64, from.y.round() as i64);
    let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut written = 0;
    loop {
        framebuffer.plot(x as usize, y as usize, luminance);
        written += 1;
        if x == x1 && y == y1 {
            break;
        }
        let err2 = 2 * err;
        if err2 >= dy {
            err += dy;
            x += sx;
        }
        if err2 <= dx {
            err += dx;
            y += sy;
        }
    }
    written
}
