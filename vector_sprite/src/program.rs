// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::num::NonZeroU64;

use vector_sprite_shaders::compile::{self, ShaderStage, UniformBinding};
use vector_sprite_shaders::{
    ShaderSources, BEZIER_UV_ATTRIBUTE, POSITION_ATTRIBUTE, PROJECTION_UNIFORM,
};
use wgpu::{
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BufferBindingType, ColorTargetState, ColorWrites, Device, FragmentState, MultisampleState,
    PipelineCompilationOptions, PipelineLayoutDescriptor, PrimitiveState, RenderPipeline,
    RenderPipelineDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages,
    TextureFormat, VertexAttribute, VertexBufferLayout, VertexFormat, VertexState,
    VertexStepMode,
};

use crate::{Error, ProjectionMatrix, Result};

const PROJECTION_TYPE: &str = "mat4x4<f32>";

/// Bytes per vertex in each of the two vertex buffers.
pub(crate) const VERTEX_STRIDE: u64 = 2 * std::mem::size_of::<f32>() as u64;

/// A curve shader program built on a device.
///
/// Construction validates and links the stages before anything touches the device, then
/// creates the shader modules and the render pipeline inside error scopes, so that the
/// failures a driver would report surface as [`Error`] values instead of device errors.
pub struct GpuProgram {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    position_location: u32,
    bezier_uv_location: u32,
    projection: UniformBinding,
    target_format: TextureFormat,
}

impl GpuProgram {
    pub async fn new(
        device: &Device,
        sources: ShaderSources<'_>,
        target_format: TextureFormat,
    ) -> Result<Self> {
        let program = compile::build_program(sources)?;
        let position_location = program.attribute(POSITION_ATTRIBUTE)?.location;
        let bezier_uv_location = program.attribute(BEZIER_UV_ATTRIBUTE)?.location;
        let projection = program.uniform(PROJECTION_UNIFORM)?.clone();
        check_projection(&projection)?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let created = async {
            let vertex = create_module(device, ShaderStage::Vertex, sources.vertex).await?;
            let fragment = create_module(device, ShaderStage::Fragment, sources.fragment).await?;
            let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: Some("curve_bind_group_layout"),
                entries: &[BindGroupLayoutEntry {
                    binding: projection.binding,
                    visibility: ShaderStages::VERTEX,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(projection.size.into()),
                    },
                    count: None,
                }],
            });
            let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("curve_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
            let position_attributes = [VertexAttribute {
                format: VertexFormat::Float32x2,
                offset: 0,
                shader_location: position_location,
            }];
            let bezier_uv_attributes = [VertexAttribute {
                format: VertexFormat::Float32x2,
                offset: 0,
                shader_location: bezier_uv_location,
            }];
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("curve_pipeline"),
                layout: Some(&layout),
                vertex: VertexState {
                    module: &vertex,
                    entry_point: program.vertex().entry_point(),
                    compilation_options: PipelineCompilationOptions::default(),
                    buffers: &[
                        VertexBufferLayout {
                            array_stride: VERTEX_STRIDE,
                            step_mode: VertexStepMode::Vertex,
                            attributes: &position_attributes,
                        },
                        VertexBufferLayout {
                            array_stride: VERTEX_STRIDE,
                            step_mode: VertexStepMode::Vertex,
                            attributes: &bezier_uv_attributes,
                        },
                    ],
                },
                fragment: Some(FragmentState {
                    module: &fragment,
                    entry_point: program.fragment().entry_point(),
                    compilation_options: PipelineCompilationOptions::default(),
                    targets: &[Some(ColorTargetState {
                        format: target_format,
                        blend: None,
                        write_mask: ColorWrites::ALL,
                    })],
                }),
                primitive: PrimitiveState::default(),
                depth_stencil: None,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });
            if let Some(error) = device.pop_error_scope().await {
                return Err(Error::ProgramLink(error.to_string()));
            }
            Ok::<_, Error>((pipeline, bind_group_layout))
        }
        .await;
        if let Some(error) = device.pop_error_scope().await {
            return Err(Error::ResourceAllocation(error.to_string()));
        }
        let (pipeline, bind_group_layout) = created?;
        log::debug!("created curve pipeline for {target_format:?}");

        Ok(Self {
            pipeline,
            bind_group_layout,
            position_location,
            bezier_uv_location,
            projection,
            target_format,
        })
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Layout of bind group 0, which holds the projection uniform.
    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bind_group_layout
    }

    /// Shader location of the control point attribute.
    pub fn position_location(&self) -> u32 {
        self.position_location
    }

    /// Shader location of the implicit coordinate attribute.
    pub fn bezier_uv_location(&self) -> u32 {
        self.bezier_uv_location
    }

    /// Binding of the projection uniform within group 0.
    pub fn projection(&self) -> &UniformBinding {
        &self.projection
    }

    pub fn target_format(&self) -> TextureFormat {
        self.target_format
    }
}

/// The projection is uploaded as a whole [`ProjectionMatrix`] on every draw, so the
/// uniform must be exactly that type in the first bind group.
fn check_projection(projection: &UniformBinding) -> Result<()> {
    if projection.group != 0 {
        return Err(Error::ProgramLink(format!(
            "`{PROJECTION_UNIFORM}` must be in @group(0), found @group({})",
            projection.group
        )));
    }
    if projection.ty != PROJECTION_TYPE
        || projection.size as usize != std::mem::size_of::<ProjectionMatrix>()
    {
        return Err(Error::ProgramLink(format!(
            "`{PROJECTION_UNIFORM}` must be a {PROJECTION_TYPE}, found {}",
            projection.ty
        )));
    }
    Ok(())
}

async fn create_module(device: &Device, stage: ShaderStage, source: &str) -> Result<ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "curve_vertex",
            ShaderStage::Fragment => "curve_fragment",
        }),
        source: ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        Some(error) => Err(Error::ShaderCompile {
            stage,
            diagnostic: error.to_string(),
        }),
        None => Ok(module),
    }
}
