//! Shader loading and pipeline construction.
//!
//! A program is built from two WGSL source files, vertex and fragment,
//! compiled separately and then linked into a line-strip pipeline. Every
//! stage reports failures with the offending file or the validation log
//! instead of aborting, so the caller decides how to bail out.

use std::borrow::Cow;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use thiserror::Error;

use wire3d_core::geometry::VERTEX_COMPONENTS;

/// Vertex pulling: tightly packed x, y, z positions at location 0.
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

/// Errors from reading, compiling or linking shader sources.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: &'static str, log: String },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
}

/// A compiled and linked wireframe pipeline, ready to install.
pub struct ShaderProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
}

/// Build a wireframe program from vertex and fragment shader files.
///
/// The vertex stage must expose `vs_main` and read the composed face
/// transform from the uniform at group 0, binding 0 (declared as
/// `transformation` in the stock shaders); the fragment stage must expose
/// `fs_main`.
pub fn load_program(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    transform_layout: &wgpu::BindGroupLayout,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<ShaderProgram, ShaderError> {
    let vertex = compile(device, "vertex", vertex_path)?;
    let fragment = compile(device, "fragment", fragment_path)?;

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("wireframe pipeline layout"),
        bind_group_layouts: &[transform_layout],
        push_constant_ranges: &[],
    });

    // Stage mismatches surface as validation errors while the pipeline is
    // built, the linking step of this backend.
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("wireframe pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (VERTEX_COMPONENTS * mem::size_of::<f32>()) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineStrip,
            strip_index_format: Some(wgpu::IndexFormat::Uint32),
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Link {
            log: error.to_string(),
        });
    }
    log::debug!("linked shader program");

    Ok(ShaderProgram { pipeline })
}

fn compile(
    device: &wgpu::Device,
    stage: &'static str,
    path: &Path,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let source = read_source(path)?;
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage),
        source: wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            stage,
            log: error.to_string(),
        });
    }
    log::debug!("compiled {} shader from {}", stage, path.display());
    Ok(module)
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
