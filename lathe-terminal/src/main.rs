/// Lathe Terminal Demo - Rotating solid of revolution
///
/// Revolves a profile curve into a mesh and renders it with Gouraud shading.
/// Usage: lathe-terminal [sphere|cylinder] [segments]
/// Controls:
///   - WASD / Arrow Keys: Orbit the camera
///   - +/-: Zoom
///   - Space: Toggle auto-rotation
///   - Q/ESC: Quit

use env_logger::Env;
use lathe_core::{build_scene, cylinder_profile, sphere_profile};
use lathe_terminal::TerminalApp;
use std::env;
use std::io;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let shape = args.get(1).map(String::as_str).unwrap_or("sphere");
    let segments = args.get(2).and_then(|s| s.parse::<usize>().ok()).unwrap_or(36);

    let profile = match shape {
        "cylinder" => cylinder_profile(1.5, 2.0),
        "sphere" => sphere_profile(36),
        other => {
            eprintln!("Usage: {} [sphere|cylinder] [segments]", args[0]);
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown shape: {}", other),
            ));
        }
    };

    let mesh = build_scene(&profile, segments);
    if mesh.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot revolve {} with {} segments", shape, segments),
        ));
    }

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(mesh)?;
    app.run()?;

    println!("Thank you for using the Lathe Terminal Renderer!");
    Ok(())
}
