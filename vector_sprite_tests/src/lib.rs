// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector Sprite tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::allow_attributes_without_reason
)]

use std::env;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use vector_sprite::peniko::Color;
use vector_sprite::util::{render_to_rgba8, GpuContext};
use vector_sprite::{
    CurveShading, ProjectionMatrix, QuadraticCurve, RenderContext, RenderParams, RendererOptions,
    ViewBox,
};
use vector_sprite_shaders::cpu::{self, CpuTexture};

mod compare;

pub use compare::{compare_gpu_cpu, compare_gpu_cpu_sync, GpuCpuComparison};

pub struct TestParams {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub shading: CurveShading,
    pub curve: QuadraticCurve,
    pub view_box: Option<ViewBox>,
    pub base_color: Color,
    pub use_cpu: bool,
}

impl TestParams {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            shading: CurveShading::default(),
            curve: RendererOptions::DEFAULT_CURVE,
            view_box: None,
            base_color: Color::WHITE,
            use_cpu: false,
        }
    }

    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            width: self.width,
            height: self.height,
            view_box: self.view_box,
            base_color: self.base_color,
        }
    }

    pub fn renderer_options(&self) -> RendererOptions {
        RendererOptions {
            shading: self.shading,
            curve: self.curve,
            ..Default::default()
        }
    }
}

/// Row-major RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Rendered {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = ((y * self.width + x) * 4) as usize;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.data[start..start + 4]);
        pixel
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Whether a device can be created on this machine.
///
/// GPU tests return early when this is false, so that they pass on machines without any
/// adapter even when `VECTOR_SPRITE_CI_GPU_SUPPORT` is not set.
pub fn gpu_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let available = pollster::block_on(GpuContext::new().device()).is_some();
        if !available {
            eprintln!("No compatible device found, skipping GPU tests");
        }
        available
    })
}

pub fn render_sync(params: &TestParams) -> Result<Rendered> {
    pollster::block_on(render(params))
}

pub async fn render(params: &TestParams) -> Result<Rendered> {
    let data = if params.use_cpu {
        render_cpu(params)
    } else {
        render_gpu(params).await?
    };
    Ok(Rendered {
        width: params.width,
        height: params.height,
        data,
    })
}

fn render_cpu(params: &TestParams) -> Vec<u8> {
    let mut target = CpuTexture::new(params.width as usize, params.height as usize);
    let Color { r, g, b, a } = params.base_color;
    target.clear([r, g, b, a].map(|c| f32::from(c) / 255.0));
    let projection =
        ProjectionMatrix::calculate(params.width as f32, params.height as f32, params.view_box);
    cpu::render_curve(params.shading, &params.curve, &projection, &mut target);
    target.to_rgba8()
}

async fn render_gpu(params: &TestParams) -> Result<Vec<u8>> {
    let mut context = GpuContext::new();
    let device_id = context
        .device()
        .await
        .ok_or_else(|| anyhow!("No compatible device found"))?;
    let device_handle = &context.devices[device_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;
    let render_context = RenderContext::new(device, &params.renderer_options())
        .await
        .map_err(|e| anyhow!("{e}"))?;
    render_to_rgba8(device, queue, &render_context, &params.render_params())
        .map_err(|e| anyhow!("{e}"))
}

/// Renders, writing a PNG to `debug_outputs` when `VECTOR_SPRITE_DEBUG_TEST` names this test.
pub fn render_then_debug_sync(params: &TestParams) -> Result<Rendered> {
    pollster::block_on(render_then_debug(params))
}

pub async fn render_then_debug(params: &TestParams) -> Result<Rendered> {
    let image = render(params).await?;
    let suffix = if params.use_cpu { "cpu" } else { "gpu" };
    let name = format!("{}_{suffix}", &params.name);
    let out_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("debug_outputs")
        .join(name)
        .with_extension("png");
    if env_var_relates_to("VECTOR_SPRITE_DEBUG_TEST", &params.name, params.use_cpu) {
        write_png_to_file(&out_path, &image)?;
        println!(
            "Wrote debug result ({}x{}) to {out_path:?}",
            image.width, image.height
        );
    } else {
        match std::fs::remove_file(&out_path) {
            Ok(()) => (),
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(image)
}

pub fn write_png_to_file(out_path: &Path, image: &Rendered) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(out_path)?;
    let mut encoder = png::Encoder::new(file, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.data)?;
    writer.finish()?;
    Ok(())
}

fn env_var_relates_to(env_var: &'static str, name: &str, use_cpu: bool) -> bool {
    if let Ok(val) = env::var(env_var) {
        if val.eq_ignore_ascii_case("all")
            || val.eq_ignore_ascii_case("cpu") && use_cpu
            || val.eq_ignore_ascii_case("gpu") && !use_cpu
        {
            return true;
        }
        let suffix = if use_cpu { "_cpu" } else { "_gpu" };
        for test in val.split(',') {
            if test.trim_end_matches(suffix).eq_ignore_ascii_case(name) {
                return true;
            }
        }
    }
    false
}
