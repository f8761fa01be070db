/// Terminal front end for the lathe software renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use lathe_core::{Camera, FrameStats, InputCommand, Mesh, OrbitState, Orchestrator, QueuedInput, RenderSettings};
use log::{debug, info};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiFramebuffer;

/// Degrees of orbit per key press
const ROTATE_STEP: f64 = 5.0;
/// Orbit distance per key press
const ZOOM_STEP: f64 = 0.5;
/// Yaw added every frame while auto-rotation is on
const AUTO_YAW_STEP: f64 = 1.0;
/// About 30 frames per second
const FRAME_BUDGET: Duration = Duration::from_millis(33);

/// Translate a key into an orbit command; `None` for unbound keys
pub fn key_command(code: KeyCode) -> Option<InputCommand> {
    let command = match code {
        KeyCode::Char('w') | KeyCode::Up => InputCommand::Rotate { yaw: 0.0, pitch: ROTATE_STEP },
        KeyCode::Char('s') | KeyCode::Down => InputCommand::Rotate { yaw: 0.0, pitch: -ROTATE_STEP },
        KeyCode::Char('a') | KeyCode::Left => InputCommand::Rotate { yaw: -ROTATE_STEP, pitch: 0.0 },
        KeyCode::Char('d') | KeyCode::Right => InputCommand::Rotate { yaw: ROTATE_STEP, pitch: 0.0 },
        KeyCode::Char('+') | KeyCode::Char('=') => InputCommand::Zoom(-ZOOM_STEP),
        KeyCode::Char('-') => InputCommand::Zoom(ZOOM_STEP),
        _ => return None,
    };
    Some(command)
}

/// Frame rate and per-frame pipeline counters, reported once a second
#[derive(Debug)]
pub struct FrameMeter {
    window_start: Instant,
    frames: u32,
    culled: usize,
    pixels: usize,
    fps: f32,
    last: FrameStats,
}

impl FrameMeter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            culled: 0,
            pixels: 0,
            fps: 0.0,
            last: FrameStats::default(),
        }
    }

    /// Record one finished frame; closes the window once a second has passed
    pub fn record(&mut self, stats: FrameStats, now: Instant) {
        self.frames += 1;
        self.culled += stats.culled;
        self.pixels += stats.pixels;
        self.last = stats;

        let elapsed = now.duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            debug!(
                "{:.1} fps, {} culled and {} pixels per frame on average",
                self.fps,
                self.culled / self.frames as usize,
                self.pixels / self.frames as usize
            );
            self.window_start = now;
            self.frames = 0;
            self.culled = 0;
            self.pixels = 0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// One-line status for the overlay
    pub fn status(&self) -> String {
        format!(
            "Lathe | FPS: {:.1} | drawn {} culled {} skipped {} | WASD/Arrows=Orbit +/-=Zoom Space=Spin Q=Quit",
            self.fps, self.last.drawn, self.last.culled, self.last.skipped
        )
    }
}

/// Terminal front end driving one [`Orchestrator`] tick per frame
pub struct TerminalApp {
    orchestrator: Orchestrator<AsciiFramebuffer, QueuedInput>,
    running: bool,
    auto_rotate: bool,
    meter: FrameMeter,
}

impl TerminalApp {
    pub fn new(mesh: Mesh) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let settings = RenderSettings {
            background: 0,
            show_axes: true,
            ..RenderSettings::default()
        };
        let camera = Camera::orbiting(Vector3::zeros(), OrbitState::default());
        let framebuffer = AsciiFramebuffer::new(width as usize, height as usize);

        Ok(Self {
            orchestrator: Orchestrator::new(framebuffer, QueuedInput::new(), mesh, camera, settings),
            running: true,
            auto_rotate: true,
            meter: FrameMeter::new(Instant::now()),
        })
    }

    /// Take over the terminal until the user quits; the screen is restored
    /// even when a frame fails
    pub fn run(&mut self) -> io::Result<()> {
        info!("terminal renderer starting");
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!("terminal renderer stopped at {:.1} fps", self.meter.fps());
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_input()?;
            }
            if self.auto_rotate {
                self.orchestrator.input_mut().push(InputCommand::Rotate {
                    yaw: AUTO_YAW_STEP,
                    pitch: 0.0,
                });
            }

            let stats = self.orchestrator.tick();
            self.present()?;
            self.meter.record(stats, Instant::now());

            if let Some(rest) = FRAME_BUDGET.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char(' ') => self.auto_rotate = !self.auto_rotate,
                code => {
                    if let Some(command) = key_command(code) {
                        self.orchestrator.input_mut().push(command);
                    }
                }
            },
            Event::Resize(width, height) => {
                let (width, height) = (width as usize, height as usize);
                self.orchestrator.framebuffer_mut().resize(width, height);
                self.orchestrator.input_mut().push(InputCommand::Resize { width, height });
            }
            _ => {}
        }
        Ok(())
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        self.orchestrator.framebuffer().draw(&mut stdout)?;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.meter.status()),
            ResetColor
        )?;
        stdout.flush()
    }
}
