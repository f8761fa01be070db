/// Lathe Web - WASM front end drawing into a 2D canvas
///
/// The page owns the event wiring and the animation loop; it forwards
/// pointer, wheel and resize events to [`WebRenderer`] and calls
/// [`WebRenderer::render`] once per animation frame.

use lathe_core::{
    build_scene, sphere_profile, Camera, Framebuffer, InputCommand, OrbitLimits, OrbitState, Orchestrator,
    QueuedInput, RenderSettings,
};
use log::debug;
use nalgebra::Vector3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// RGBA pixel store matching the canvas backing size
pub struct CanvasFramebuffer {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl CanvasFramebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![255; width * height * 4],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.rgba = vec![255; width * height * 4];
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Copy the pixels onto the canvas
    pub fn present(&self, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.rgba.as_slice()),
            self.width as u32,
            self.height as u32,
        )?;
        context.put_image_data(&image, 0.0, 0.0)
    }
}

impl Framebuffer for CanvasFramebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, x: usize, y: usize, luminance: u8) {
        if x < self.width && y < self.height {
            let offset = (y * self.width + x) * 4;
            self.rgba[offset..offset + 4].copy_from_slice(&[luminance, luminance, luminance, 255]);
        }
    }

    fn clear(&mut self, luminance: u8) {
        for pixel in self.rgba.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[luminance, luminance, luminance, 255]);
        }
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    limits: OrbitLimits,
    orchestrator: Orchestrator<CanvasFramebuffer, QueuedInput>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with id `canvas_id` and build the default scene.
    ///
    /// Fails if the canvas or its 2D context cannot be acquired.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, circles: usize, segments: usize) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("Canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Could not get 2D context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mesh = build_scene(&sphere_profile(circles), segments);
        let settings = RenderSettings {
            show_axes: true,
            ..RenderSettings::default()
        };
        let limits = settings.orbit_limits;
        let camera = Camera::orbiting(Vector3::zeros(), OrbitState::default());
        let framebuffer = CanvasFramebuffer::new(canvas.width() as usize, canvas.height() as usize);

        Ok(WebRenderer {
            canvas,
            context,
            limits,
            orchestrator: Orchestrator::new(framebuffer, QueuedInput::new(), mesh, camera, settings),
        })
    }

    /// Render a frame
    pub fn render(&mut self) -> Result<(), JsValue> {
        let stats = self.orchestrator.tick();
        debug!("drew {} triangles, culled {}", stats.drawn, stats.culled);
        self.orchestrator.framebuffer().present(&self.context)
    }

    /// Pointer drag in CSS pixels
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        let command = self.limits.drag(dx, dy);
        self.orchestrator.input_mut().push(command);
    }

    /// Wheel delta as reported by the browser
    pub fn zoom(&mut self, delta_y: f64) {
        let command = self.limits.wheel(delta_y);
        self.orchestrator.input_mut().push(command);
    }

    /// Resize the canvas backing store and the projection
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let (width, height) = (width as usize, height as usize);
        self.orchestrator.framebuffer_mut().resize(width, height);
        self.orchestrator.input_mut().push(InputCommand::Resize { width, height });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_pixels_are_gray() {
        let mut fb = CanvasFramebuffer::new(2, 2);
        fb.clear(10);
        fb.plot(1, 0, 200);
        assert_eq!(&fb.rgba()[0..4], &[10, 10, 10, 255]);
        assert_eq!(&fb.rgba()[4..8], &[200, 200, 200, 255]);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut fb = CanvasFramebuffer::new(2, 2);
        fb.resize(3, 1);
        assert_eq!(fb.width(), 3);
        assert_eq!(fb.rgba().len(), 12);
    }
}
