// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple helpers for managing wgpu state and reading rendered curves back.

use std::future::Future;

use wgpu::{
    Adapter, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Device, Extent3d,
    ImageCopyBuffer, ImageDataLayout, Instance, Queue, Texture, TextureDescriptor,
    TextureFormat, TextureUsages, TextureView,
};

use crate::{Error, RenderContext, RenderParams, Result};

/// Simple context that maintains the wgpu instance and the devices created from it.
pub struct GpuContext {
    pub instance: Instance,
    pub devices: Vec<DeviceHandle>,
}

pub struct DeviceHandle {
    adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    #[allow(
        clippy::new_without_default,
        reason = "Creating a wgpu Instance is something which should only be done rarely"
    )]
    pub fn new() -> Self {
        let backends = wgpu::util::backend_bits_from_env().unwrap_or_default();
        let flags = wgpu::InstanceFlags::from_build_config().with_env();
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends,
            flags,
            ..Default::default()
        });
        Self {
            instance,
            devices: Vec::new(),
        }
    }

    /// Finds or creates a device handle id.
    pub async fn device(&mut self) -> Option<usize> {
        if self.devices.is_empty() {
            return self.new_device().await;
        }
        Some(0)
    }

    /// Creates a device handle id.
    async fn new_device(&mut self) -> Option<usize> {
        let adapter = wgpu::util::initialize_adapter_from_env_or_default(&self.instance, None)
            .await?;
        log::debug!("using adapter {:?}", adapter.get_info());
        // A single triangle needs nothing beyond what WebGL2 guarantees.
        let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: limits,
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| log::warn!("couldn't create device: {e}"))
            .ok()?;
        self.devices.push(DeviceHandle {
            adapter,
            device,
            queue,
        });
        Some(self.devices.len() - 1)
    }

    /// Like [`device`](Self::device), failing with [`Error::NoCompatibleDevice`].
    pub async fn require_device(&mut self) -> Result<&DeviceHandle> {
        let id = self.device().await.ok_or(Error::NoCompatibleDevice)?;
        Ok(&self.devices[id])
    }
}

impl DeviceHandle {
    /// Returns the adapter associated with the device.
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}

struct NullWake;

impl std::task::Wake for NullWake {
    fn wake(self: std::sync::Arc<Self>) {}
}

/// Block on a future, polling the device as needed.
///
/// This will deadlock if the future is awaiting anything other than GPU progress.
#[cfg_attr(docsrs, doc(hidden))]
pub fn block_on_wgpu<F: Future>(device: &Device, fut: F) -> F::Output {
    if cfg!(target_arch = "wasm32") {
        panic!("Blocking can't work on WASM, so don't try");
    }
    let waker = std::task::Waker::from(std::sync::Arc::new(NullWake));
    let mut context = std::task::Context::from_waker(&waker);
    // Same logic as `pin_mut!` macro from `pin_utils`.
    let mut fut = std::pin::pin!(fut);
    loop {
        match fut.as_mut().poll(&mut context) {
            std::task::Poll::Pending => {
                let _ = device.poll(wgpu::Maintain::Wait);
            }
            std::task::Poll::Ready(item) => break item,
        }
    }
}

/// Creates a texture which can be drawn into and copied out of.
pub fn create_target(
    device: &Device,
    width: u32,
    height: u32,
    format: TextureFormat,
) -> (Texture, TextureView) {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("curve_target"),
        size: Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Draws `context` into a fresh offscreen target and returns its pixels, row-major RGBA8
/// without padding.
///
/// The context must target `Rgba8Unorm` or `Rgba8UnormSrgb`. Blocks until the GPU is done,
/// so this can't be used on the web.
pub fn render_to_rgba8(
    device: &Device,
    queue: &Queue,
    context: &RenderContext,
    params: &RenderParams,
) -> Result<Vec<u8>> {
    let format = context.target_format();
    if !matches!(
        format,
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb
    ) {
        return Err(Error::UnsupportedReadbackFormat(format));
    }
    let (width, height) = (params.width, params.height);
    let (target, view) = create_target(device, width, height, format);
    context.draw(device, queue, &view, params);

    let padded_byte_width = (width * 4).next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
    let buffer = device.create_buffer(&BufferDescriptor {
        label: Some("curve_readback"),
        size: u64::from(padded_byte_width) * u64::from(height),
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
        label: Some("Copy out buffer"),
    });
    encoder.copy_texture_to_buffer(
        target.as_image_copy(),
        ImageCopyBuffer {
            buffer: &buffer,
            layout: ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_byte_width),
                rows_per_image: None,
            },
        },
        target.size(),
    );
    queue.submit([encoder.finish()]);

    let buf_slice = buffer.slice(..);
    let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
    buf_slice.map_async(wgpu::MapMode::Read, move |v| {
        // The receiver only goes away if we've stopped waiting.
        let _ = sender.send(v);
    });
    block_on_wgpu(device, receiver.receive()).ok_or(Error::MapAbandoned)??;

    let row_bytes = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    {
        let data = buf_slice.get_mapped_range();
        for row in data.chunks_exact(padded_byte_width as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }
    }
    buffer.unmap();
    Ok(pixels)
}
