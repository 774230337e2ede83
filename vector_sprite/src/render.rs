// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-device curve state and the draw call.

use vector_sprite_geometry::{QuadraticCurve, BEZIER_UV};
use vector_sprite_shaders::{CurveShading, ShaderSources};
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, Buffer, BufferUsages,
    CommandEncoderDescriptor, Device, LoadOp, Operations, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureFormat, TextureView,
};

use crate::{Error, GpuProgram, RenderParams, RendererOptions, Result};

/// Everything needed to draw one curve on one device.
///
/// The context holds the program, the two vertex buffers (control points and implicit
/// coordinates) and the projection uniform. It never touches state outside itself, so
/// any number of contexts can share a device.
pub struct RenderContext {
    program: GpuProgram,
    shading: Option<CurveShading>,
    curve: QuadraticCurve,
    position_buffer: Buffer,
    bezier_uv_buffer: Buffer,
    projection_buffer: Buffer,
    bind_group: BindGroup,
}

#[cfg(not(target_arch = "wasm32"))]
static_assertions::assert_impl_all!(RenderContext: Send);

impl RenderContext {
    /// Builds the program for `options.shading` and uploads `options.curve`.
    pub async fn new(device: &Device, options: &RendererOptions) -> Result<Self> {
        let mut context = Self::with_sources(device, options.shading.sources(), options).await?;
        context.shading = Some(options.shading);
        Ok(context)
    }

    /// Like [`new`](Self::new), but with caller supplied shader sources.
    ///
    /// The sources must declare the `a_position` and `a_bezier_uv` attributes and a
    /// `mat4x4<f32>` `u_projection` uniform in group 0; `options.shading` is ignored.
    pub async fn with_sources(
        device: &Device,
        sources: ShaderSources<'_>,
        options: &RendererOptions,
    ) -> Result<Self> {
        log::debug!("setting up curve render context");
        let program = GpuProgram::new(device, sources, options.target_format).await?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let position_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("curve_positions"),
            contents: bytemuck::cast_slice(&options.curve.positions()),
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        });
        let bezier_uv_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("curve_bezier_uv"),
            contents: bytemuck::cast_slice(&BEZIER_UV),
            usage: BufferUsages::VERTEX,
        });
        let projection_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("curve_projection"),
            size: program.projection().size.into(),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("curve_bind_group"),
            layout: program.bind_group_layout(),
            entries: &[BindGroupEntry {
                binding: program.projection().binding,
                resource: projection_buffer.as_entire_binding(),
            }],
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(Error::ResourceAllocation(error.to_string()));
        }

        Ok(Self {
            program,
            shading: None,
            curve: options.curve,
            position_buffer,
            bezier_uv_buffer,
            projection_buffer,
            bind_group,
        })
    }

    /// The built-in shading this context was created with, if any.
    pub fn shading(&self) -> Option<CurveShading> {
        self.shading
    }

    pub fn curve(&self) -> &QuadraticCurve {
        &self.curve
    }

    pub fn program(&self) -> &GpuProgram {
        &self.program
    }

    pub fn target_format(&self) -> TextureFormat {
        self.program.target_format()
    }

    /// Replaces the control points used by subsequent draws.
    pub fn set_curve(&mut self, queue: &Queue, curve: &QuadraticCurve) {
        queue.write_buffer(
            &self.position_buffer,
            0,
            bytemuck::cast_slice(&curve.positions()),
        );
        self.curve = *curve;
    }

    /// Clears `target` to `params.base_color` and draws the curve triangle over it.
    ///
    /// `target` must have the format the context was created for and be
    /// `params.width` by `params.height` pixels.
    pub fn draw(
        &self,
        device: &Device,
        queue: &Queue,
        target: &TextureView,
        params: &RenderParams,
    ) {
        let projection = params.projection();
        queue.write_buffer(&self.projection_buffer, 0, bytemuck::bytes_of(&projection));

        let base_color = params.base_color;
        let clear = wgpu::Color {
            r: f64::from(base_color.r) / 255.0,
            g: f64::from(base_color.g) / 255.0,
            b: f64::from(base_color.b) / 255.0,
            a: f64::from(base_color.a) / 255.0,
        };
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("curve_draw"),
        });
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("curve_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(clear),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(self.program.pipeline());
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.set_vertex_buffer(0, self.position_buffer.slice(..));
            pass.set_vertex_buffer(1, self.bezier_uv_buffer.slice(..));
            pass.draw(0..3, 0..1);
        }
        queue.submit([encoder.finish()]);
    }
}

/// Owns the outcome of setting up a [`RenderContext`].
///
/// A failed setup is logged and kept, and the renderer reports itself as not ready.
/// Drawing requires borrowing the context, so there is no way to draw without one.
pub struct CurveRenderer {
    state: Result<RenderContext>,
}

impl CurveRenderer {
    pub async fn new(device: &Device, options: &RendererOptions) -> Self {
        Self::from_setup(RenderContext::new(device, options).await)
    }

    pub async fn with_sources(
        device: &Device,
        sources: ShaderSources<'_>,
        options: &RendererOptions,
    ) -> Self {
        Self::from_setup(RenderContext::with_sources(device, sources, options).await)
    }

    fn from_setup(state: Result<RenderContext>) -> Self {
        if let Err(e) = &state {
            log::error!("curve renderer is not ready: {e}");
        }
        Self { state }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ok()
    }

    pub fn context(&self) -> Option<&RenderContext> {
        self.state.as_ref().ok()
    }

    pub fn context_mut(&mut self) -> Option<&mut RenderContext> {
        self.state.as_mut().ok()
    }

    /// Why setup failed, if it did.
    pub fn setup_error(&self) -> Option<&Error> {
        self.state.as_ref().err()
    }

    pub fn into_context(self) -> Result<RenderContext> {
        self.state
    }
}
