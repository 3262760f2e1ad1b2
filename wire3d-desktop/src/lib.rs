//! Desktop wireframe renderer for the Wire3D scene model.
//!
//! Opens a window, loads the shader program, uploads the scene and spins it
//! with a fixed yaw increment per rendered frame.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use wire3d_core::{geometry, Scene, SceneError, Transform};

pub mod renderer;
pub mod shader;

pub use renderer::LineRenderer;
pub use shader::{load_program, ShaderError, ShaderProgram};

/// Top-level failures of the desktop renderer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter found")]
    NoAdapter,
    #[error("surface is not supported by the graphics adapter")]
    SurfaceUnsupported,
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Window parameters for the demo.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Wire3D Desktop".to_string(),
            resizable: false,
        }
    }
}

/// Build the stock scene: a prism hovering over an H-beam.
///
/// The beam is three stretched copies of the cube outline, a flat web with
/// a flange pushed out to either side, shrunk as a whole; the prism is
/// shrunk and lifted above it.
pub fn demo_scene() -> Result<Scene<'static>, SceneError> {
    let mut scene = Scene::new(2)?;

    // Prism: one outline covering all six triangles.
    scene.set_points(0, &geometry::PRISM_VERTICES)?;
    scene.init_faces(0, 1)?;
    scene.face_mut(0, 0)?.set_indices(&geometry::PRISM_INDICES);
    scene.set_transform(
        0,
        Transform::scaling(0.3, 0.3, 0.3) * Transform::translation(0.0, 1.2, 0.0),
    )?;

    // H-beam: web plus two flanges, all outlining the same cube points.
    scene.set_points(1, &geometry::CUBE_VERTICES)?;
    scene.init_faces(1, 3)?;
    for face in 0..3 {
        scene.face_mut(1, face)?.set_indices(&geometry::CUBE_INDICES);
    }
    scene
        .face_mut(1, 0)?
        .set_transform(Transform::scaling(2.0, 0.2, 2.0));
    scene.face_mut(1, 1)?.set_transform(
        Transform::scaling(0.2, 2.0, 2.0) * Transform::translation(10.0, 0.0, 0.0),
    );
    scene.face_mut(1, 2)?.set_transform(
        Transform::scaling(0.2, 2.0, 2.0) * Transform::translation(-10.0, 0.0, 0.0),
    );
    scene.set_transform(1, Transform::scaling(0.3, 0.3, 0.3))?;

    Ok(scene)
}

/// Main application struct for desktop wireframe rendering.
pub struct DesktopApp {
    window: Arc<Window>,
    event_loop: EventLoop<()>,
    renderer: LineRenderer,
    scene: Scene<'static>,
}

impl DesktopApp {
    /// Open the window, bring up the renderer, load the program from the
    /// given shader files and upload the scene.
    pub fn new(
        config: &WindowConfig,
        mut scene: Scene<'static>,
        vertex_shader: &Path,
        fragment_shader: &Path,
    ) -> Result<Self, Error> {
        let event_loop = EventLoop::new()?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&config.title)
                .with_inner_size(LogicalSize::new(config.width, config.height))
                .with_resizable(config.resizable)
                .build(&event_loop)?,
        );

        let mut renderer = LineRenderer::new(window.clone())?;
        let program = shader::load_program(
            renderer.device(),
            renderer.surface_format(),
            renderer.transform_layout(),
            vertex_shader,
            fragment_shader,
        )?;
        renderer.install(program);
        renderer.upload(&mut scene)?;

        Ok(Self {
            window,
            event_loop,
            renderer,
            scene,
        })
    }

    /// Run until the window closes or Escape is pressed.
    ///
    /// Every redraw advances the animation one step and draws the frame, so
    /// the spin rate is tied to the frame rate.
    pub fn run(self) -> Result<(), Error> {
        let Self {
            window,
            event_loop,
            mut renderer,
            mut scene,
        } = self;

        event_loop.run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event: key, .. } => {
                            if key.state == ElementState::Pressed
                                && key.logical_key == Key::Named(NamedKey::Escape)
                            {
                                elwt.exit();
                            }
                        }
                        WindowEvent::Resized(size) => renderer.resize(size),
                        WindowEvent::RedrawRequested => {
                            scene.update();
                            match renderer.render(&scene) {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    renderer.reconfigure();
                                }
                                Err(wgpu::SurfaceError::Timeout) => {
                                    log::warn!("frame timed out, skipping");
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("surface out of memory");
                                    elwt.exit();
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => window.request_redraw(),
                _ => {}
            }
        })?;

        Ok(())
    }
}
