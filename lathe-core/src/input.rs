/// Orbit camera state and the input messages that change it between frames
use std::collections::VecDeque;

use crate::math::{deg2rad, Vec3};

/// A change requested by the input layer, applied before the next frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Orbit angle deltas in degrees
    Rotate { yaw: f64, pitch: f64 },
    /// Orbit distance delta in world units
    Zoom(f64),
    /// New viewport size in pixels
    Resize { width: usize, height: usize },
}

/// Source of input commands, drained once per frame
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputCommand>;
}

/// In-memory command queue, filled by event callbacks
#[derive(Debug, Default)]
pub struct QueuedInput {
    pending: VecDeque<InputCommand>,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: InputCommand) {
        self.pending.push_back(command);
    }
}

impl InputSource for QueuedInput {
    fn poll(&mut self) -> Vec<InputCommand> {
        self.pending.drain(..).collect()
    }
}

/// Ranges and sensitivities for orbit control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    /// Pitch is kept within `[-max_pitch, max_pitch]` degrees
    pub max_pitch: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Degrees per dragged pixel
    pub drag_speed: f64,
    /// Distance per wheel unit
    pub zoom_speed: f64,
}

impl OrbitLimits {
    /// Translate a pointer drag in pixels into a rotation command
    pub fn drag(&self, dx: f64, dy: f64) -> InputCommand {
        InputCommand::Rotate {
            yaw: -dx * self.drag_speed,
            pitch: dy * self.drag_speed,
        }
    }

    /// Translate a wheel delta into a zoom command
    pub fn wheel(&self, delta: f64) -> InputCommand {
        InputCommand::Zoom(delta * self.zoom_speed)
    }
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            // Straight up or down would make the view basis degenerate
            max_pitch: 89.0,
            min_distance: 5.0,
            max_distance: 40.0,
            drag_speed: 0.5,
            zoom_speed: 0.01,
        }
    }
}

/// Spherical camera placement around a target, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub yaw: f64,
    pub pitch: f64,
    pub distance: f64,
}

impl OrbitState {
    pub fn new(yaw: f64, pitch: f64, distance: f64) -> Self {
        Self { yaw, pitch, distance }
    }

    /// Apply one command; resize is not an orbit concern and is ignored
    pub fn apply(&mut self, command: &InputCommand, limits: &OrbitLimits) {
        match *command {
            InputCommand::Rotate { yaw, pitch } => {
                self.yaw = (self.yaw + yaw) % 360.0;
                self.pitch = (self.pitch + pitch).clamp(-limits.max_pitch, limits.max_pitch);
            }
            InputCommand::Zoom(delta) => {
                self.distance = (self.distance + delta).clamp(limits.min_distance, limits.max_distance);
            }
            InputCommand::Resize { .. } => {}
        }
    }

    /// Camera position relative to the orbit target
    pub fn offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = deg2rad(self.yaw).sin_cos();
        let (sin_pitch, cos_pitch) = deg2rad(self.pitch).sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }
}

impl Default for OrbitState {
    fn default() -> Self {
        Self::new(-20.0, 20.0, 6.0)
    }
}
