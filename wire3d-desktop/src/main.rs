//! Wire3D Desktop Demo - Rotating Wireframe Primitives
//!
//! Draws a prism and an H-beam as spinning white outlines.
//! Usage: wire3d-desktop <vertex-shader> <fragment-shader>
//!
//! Press ESC or close the window to quit.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use wire3d_desktop::{demo_scene, DesktopApp, WindowConfig};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <vertex-shader> <fragment-shader>", args[0]);
        eprintln!(
            "example: {} wire3d-desktop/shaders/wireframe.vert.wgsl \
             wire3d-desktop/shaders/wireframe.frag.wgsl",
            args[0]
        );
        return ExitCode::FAILURE;
    }

    match run(Path::new(&args[1]), Path::new(&args[2])) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(vertex_shader: &Path, fragment_shader: &Path) -> Result<(), wire3d_desktop::Error> {
    let scene = demo_scene()?;
    let app = DesktopApp::new(&WindowConfig::default(), scene, vertex_shader, fragment_shader)?;
    app.run()
}
