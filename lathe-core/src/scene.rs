/// Per-frame driver: camera update, transform, lighting, culling, raster
use log::{debug, info, trace, warn};
use nalgebra::Point2;

use crate::geometry::{compute_vertex_normals, face_normal, generate_revolution_mesh, Mesh};
use crate::input::{InputCommand, InputSource, OrbitLimits};
use crate::lighting::LightingConfig;
use crate::math::{dot, normalize, Mat4, Vec3};
use crate::projection::{project_to_screen, transform_vertex, Camera, ProjectionMode, ScreenVertex};
use crate::raster::{draw_line, fill_triangle, Framebuffer};
use crate::transform::identity_matrix;

/// Build the revolution mesh for a scene; invalid input gives an empty mesh
pub fn build_scene(profile: &[Point2<f64>], segments: usize) -> Mesh {
    let mesh = generate_revolution_mesh(profile, segments);
    if mesh.is_empty() {
        warn!("scene has no geometry; frames will only clear the background");
    } else {
        info!(
            "scene built: {} vertices, {} triangles",
            mesh.vertices().len(),
            mesh.triangles().len()
        );
    }
    mesh
}

/// Configuration that stays fixed across frames
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub lighting: LightingConfig,
    /// Direction from the surface toward the light
    pub light_direction: Vec3,
    pub model: Mat4,
    /// Luminance the framebuffer is cleared to each frame
    pub background: u8,
    pub orbit_limits: OrbitLimits,
    /// Draw the world axes under the mesh
    pub show_axes: bool,
}

/// Half length of each world axis in the overlay
pub const AXIS_EXTENT: f64 = 2.0;
/// Luminance of the x, y and z axes
pub const AXIS_LUMINANCE: [u8; 3] = [40, 110, 180];

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lighting: LightingConfig::default(),
            light_direction: normalize(&Vec3::new(1.0, 1.0, 1.0)),
            model: identity_matrix(),
            background: 238,
            orbit_limits: OrbitLimits::default(),
            show_axes: false,
        }
    }
}

/// Everything one frame reads, captured before rendering starts
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub camera: Camera,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// Unit vector from the camera toward its target
    pub view_direction: Vec3,
    pub light_direction: Vec3,
    pub lighting: LightingConfig,
    pub width: usize,
    pub height: usize,
}

impl FrameSnapshot {
    pub fn new(camera: Camera, settings: &RenderSettings, width: usize, height: usize) -> Self {
        let aspect = width as f64 / height.max(1) as f64;
        Self::with_projection(camera.projection_matrix(aspect), camera, settings, width, height)
    }

    /// Like [`FrameSnapshot::new`], reusing an already built projection
    pub fn with_projection(
        projection: Mat4,
        camera: Camera,
        settings: &RenderSettings,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            view: camera.view_matrix(),
            view_direction: camera.view_direction(),
            projection,
            camera,
            model: settings.model,
            light_direction: normalize(&settings.light_direction),
            lighting: settings.lighting,
            width,
            height,
        }
    }

    /// Direction in which the camera sees `point`.
    ///
    /// Perspective rays fan out from the eye; orthographic ones are all
    /// parallel to the view direction.
    pub fn sight_line(&self, point: &Vec3) -> Vec3 {
        match self.camera.mode {
            ProjectionMode::Perspective => point - self.camera.position,
            ProjectionMode::Orthographic => self.view_direction,
        }
    }

    /// Screen position of a world point, if it lies in front of the near plane
    fn project_world(&self, point: &Vec3) -> Option<Point2<f64>> {
        let eye = transform_vertex(point, &self.view).ok()?;
        if eye.z > -self.camera.near {
            return None;
        }
        let ndc = transform_vertex(&eye, &self.projection).ok()?;
        Some(project_to_screen(&ndc, self.width, self.height))
    }
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
    /// Triangles dropped because a vertex could not be projected
    pub skipped: usize,
    pub pixels: usize,
}

/// Back faces point the same way as the sight line that reaches them
pub fn is_back_facing(face_normal: &Vec3, sight_line: &Vec3) -> bool {
    dot(face_normal, sight_line) > 0.0
}

/// Stroke the world x, y and z axes through view and projection.
///
/// Axes with an end behind the near plane are left out. Returns the number
/// of pixels written.
pub fn draw_axes<F: Framebuffer + ?Sized>(frame: &FrameSnapshot, framebuffer: &mut F) -> usize {
    let mut written = 0;
    for (axis, luminance) in [Vec3::x(), Vec3::y(), Vec3::z()].into_iter().zip(AXIS_LUMINANCE) {
        let from = frame.project_world(&(axis * -AXIS_EXTENT));
        let to = frame.project_world(&(axis * AXIS_EXTENT));
        if let (Some(from), Some(to)) = (from, to) {
            written += draw_line(framebuffer, from, to, luminance);
        }
    }
    written
}

/// Render `mesh` as seen in `frame` into `framebuffer`.
///
/// The mesh is only read; all transformed positions, normals and screen
/// vertices live for the duration of this call.
pub fn render_frame<F: Framebuffer + ?Sized>(mesh: &Mesh, frame: &FrameSnapshot, framebuffer: &mut F) -> FrameStats {
    let mut stats = FrameStats::default();
    if mesh.is_empty() {
        return stats;
    }

    // Model space drives lighting and culling, clip space drives raster
    let mvp = frame.model * frame.view * frame.projection;
    let mut world = Vec::with_capacity(mesh.vertices().len());
    for vertex in mesh.vertices() {
        match transform_vertex(vertex, &frame.model) {
            Ok(v) => world.push(v),
            Err(err) => {
                warn!("model matrix is not affine: {}", err);
                return stats;
            }
        }
    }
    let screen: Vec<Option<Point2<f64>>> = mesh
        .vertices()
        .iter()
        .map(|vertex| {
            transform_vertex(vertex, &mvp)
                .map(|ndc| project_to_screen(&ndc, frame.width, frame.height))
                .ok()
        })
        .collect();

    let normals = compute_vertex_normals(&world, mesh.triangles());
    let toward_viewer = -frame.view_direction;
    let intensities: Vec<f64> = normals
        .iter()
        .map(|normal| {
            frame
                .lighting
                .reflectance(normal, &toward_viewer, &frame.light_direction)
        })
        .collect();

    for triangle in mesh.triangles() {
        let [i1, i2, i3] = *triangle;
        let centroid = (world[i1] + world[i2] + world[i3]) / 3.0;
        if is_back_facing(&face_normal(&world, triangle), &frame.sight_line(&centroid)) {
            stats.culled += 1;
            continue;
        }

        let (Some(p1), Some(p2), Some(p3)) = (screen[i1], screen[i2], screen[i3]) else {
            stats.skipped += 1;
            continue;
        };

        stats.pixels += fill_triangle(
            framebuffer,
            ScreenVertex::new(p1.x, p1.y, intensities[i1]),
            ScreenVertex::new(p2.x, p2.y, intensities[i2]),
            ScreenVertex::new(p3.x, p3.y, intensities[i3]),
        );
        stats.drawn += 1;
    }

    if stats.skipped > 0 {
        debug!("{} triangles had unprojectable vertices", stats.skipped);
    }
    stats
}

/// Owns the scene and drives one frame per [`Orchestrator::tick`].
///
/// The framebuffer and input source are injected so the same driver runs
/// in a terminal, a browser canvas or a test.
pub struct Orchestrator<F: Framebuffer, I: InputSource> {
    framebuffer: F,
    input: I,
    mesh: Mesh,
    camera: Camera,
    settings: RenderSettings,
    width: usize,
    height: usize,
    projection: Mat4,
}

impl<F: Framebuffer, I: InputSource> Orchestrator<F, I> {
    pub fn new(framebuffer: F, input: I, mesh: Mesh, camera: Camera, settings: RenderSettings) -> Self {
        let (width, height) = (framebuffer.width(), framebuffer.height());
        let mut orchestrator = Self {
            framebuffer,
            input,
            mesh,
            camera,
            settings,
            width,
            height,
            projection: Mat4::identity(),
        };
        orchestrator.rebuild_projection();
        orchestrator
    }

    pub fn framebuffer(&self) -> &F {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut F {
        &mut self.framebuffer
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Swap in a new mesh, e.g. after the profile changed
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
    }

    /// Apply pending input, then render one complete frame
    pub fn tick(&mut self) -> FrameStats {
        for command in self.input.poll() {
            self.apply(&command);
        }

        self.camera.refresh();
        let frame = FrameSnapshot::with_projection(
            self.projection,
            self.camera.clone(),
            &self.settings,
            self.width,
            self.height,
        );

        self.framebuffer.clear(self.settings.background);
        if self.settings.show_axes {
            draw_axes(&frame, &mut self.framebuffer);
        }
        let stats = render_frame(&self.mesh, &frame, &mut self.framebuffer);
        trace!(
            "frame: {} drawn, {} culled, {} skipped, {} pixels",
            stats.drawn,
            stats.culled,
            stats.skipped,
            stats.pixels
        );
        stats
    }

    fn apply(&mut self, command: &InputCommand) {
        match *command {
            InputCommand::Resize { width, height } => {
                debug!("viewport resized to {}x{}", width, height);
                self.width = width;
                self.height = height;
                self.rebuild_projection();
            }
            _ => {
                if let Some(orbit) = self.camera.orbit.as_mut() {
                    orbit.apply(command, &self.settings.orbit_limits);
                }
            }
        }
    }

    fn rebuild_projection(&mut self) {
        let aspect = self.width as f64 / self.height.max(1) as f64;
        self.projection = self.camera.projection_matrix(aspect);
    }
}
