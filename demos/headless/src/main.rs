// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless

// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    clippy::cast_possible_truncation,
    clippy::allow_attributes_without_reason
)]

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use vector_sprite::util::{render_to_rgba8, GpuContext};
use vector_sprite::{
    CubicCurve, CurveShading, ProjectionMatrix, QuadraticCurve, RenderContext, RenderParams,
    RendererOptions, Vector2, ViewBox,
};
use vector_sprite_shaders::cpu::{render_curve, CpuTexture};

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = Args::parse();
    let &[x0, y0, x1, y1, x2, y2, x3, y3] = args.cubic.as_slice() else {
        bail!("expected 8 numbers for --cubic, got {}", args.cubic.len());
    };
    let cubic = CubicCurve::new(
        Vector2::new(x0, y0),
        Vector2::new(x1, y1),
        Vector2::new(x2, y2),
        Vector2::new(x3, y3),
    );
    let quads = cubic.approximate_quadratics();
    let Some(&curve) = quads.first() else {
        bail!("approximation produced no quadratic curves");
    };
    log::info!(
        "approximated control point: ({}, {})",
        curve.p1.x(),
        curve.p1.y()
    );
    let view_box = match args.view_box.as_deref() {
        Some(&[min_x, min_y, width, height]) => ViewBox::new(min_x, min_y, width, height),
        Some(other) => bail!("expected 4 numbers for --view-box, got {}", other.len()),
        None => padded_bounds(&curve),
    };
    let params = RenderParams {
        view_box: Some(view_box),
        ..RenderParams::new(args.width, args.height)
    };

    let pixels = if args.use_cpu {
        render_cpu(&curve, args.shading, &params)
    } else {
        pollster::block_on(render_gpu(&curve, args.shading, &params))?
    };

    let out_path = &args.out;
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(out_path)?;
    let mut png_encoder = png::Encoder::new(&mut file, args.width, args.height);
    png_encoder.set_color(png::ColorType::Rgba);
    png_encoder.set_depth(png::BitDepth::Eight);
    let mut writer = png_encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    println!(
        "Wrote result ({}x{}) to {out_path:?}",
        args.width, args.height
    );
    Ok(())
}

/// The curve's control box with a tenth of its size added on every side.
fn padded_bounds(curve: &QuadraticCurve) -> ViewBox {
    let points = curve.points();
    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x());
        min_y = min_y.min(p.y());
        max_x = max_x.max(p.x());
        max_y = max_y.max(p.y());
    }
    let pad_x = ((max_x - min_x) * 0.1).max(1.0);
    let pad_y = ((max_y - min_y) * 0.1).max(1.0);
    ViewBox::new(
        min_x - pad_x,
        min_y - pad_y,
        max_x - min_x + 2.0 * pad_x,
        max_y - min_y + 2.0 * pad_y,
    )
}

fn render_cpu(curve: &QuadraticCurve, shading: CurveShading, params: &RenderParams) -> Vec<u8> {
    let mut target = CpuTexture::new(params.width as usize, params.height as usize);
    target.clear([1.0; 4]);
    let projection =
        ProjectionMatrix::calculate(params.width as f32, params.height as f32, params.view_box);
    render_curve(shading, curve, &projection, &mut target);
    target.to_rgba8()
}

async fn render_gpu(
    curve: &QuadraticCurve,
    shading: CurveShading,
    params: &RenderParams,
) -> Result<Vec<u8>> {
    let mut context = GpuContext::new();
    let device_id = context
        .device()
        .await
        .ok_or_else(|| anyhow!("No compatible device found"))?;
    let device_handle = &context.devices[device_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;
    let options = RendererOptions {
        shading,
        curve: *curve,
        ..Default::default()
    };
    let render_context = RenderContext::new(device, &options)
        .await
        .map_err(|e| anyhow!("{e}"))?;
    render_to_rgba8(device, queue, &render_context, params).map_err(|e| anyhow!("{e}"))
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name="cargo run -p headless --")]
struct Args {
    /// Control points of the cubic curve, as x0,y0,x1,y1,x2,y2,x3,y3
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "0,0,0,100,100,100,100,0"
    )]
    cubic: Vec<f32>,
    /// Output width in pixels
    #[arg(long, short = 'x', default_value_t = 400)]
    width: u32,
    /// Output height in pixels
    #[arg(long, short = 'y', default_value_t = 400)]
    height: u32,
    /// Logical rectangle to show, as min_x,min_y,width,height
    /// Defaults to the curve's control box with some padding
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    view_box: Option<Vec<f32>>,
    /// One of aliased, antialiased or antialiased_stroke
    #[arg(long, short, default_value = "antialiased")]
    shading: CurveShading,
    #[arg(long)]
    /// Whether to use the CPU reference shaders
    use_cpu: bool,
    /// File to write the image to
    #[arg(long, default_value_os_t = default_output())]
    out: PathBuf,
}

fn default_output() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("outputs")
        .join("curve.png")
}
