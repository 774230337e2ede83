// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vector_sprite::peniko::Color;
use vector_sprite::util::{render_to_rgba8, GpuContext};
use vector_sprite::{
    CurveRenderer, CurveShading, Error, QuadraticCurve, RenderContext, RenderParams,
    RendererOptions, ShaderSources, Vector2,
};
use vector_sprite_shaders::compile::ShaderStage;
use vector_sprite_shaders::{BACKGROUND_COLOR, CURVE_COLOR};
use vector_sprite_tests::{gpu_available, render_then_debug_sync, Rendered, TestParams};

fn to_bytes(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c * 255.0).round() as u8)
}

fn render(params: &TestParams) -> Rendered {
    render_then_debug_sync(params).unwrap()
}

fn base_color_outside_triangle(use_cpu: bool) {
    let params = TestParams {
        base_color: Color::PLUM,
        use_cpu,
        ..TestParams::new("base_color_outside_triangle", 200, 200)
    };
    let image = render(&params);
    let Color { r, g, b, a } = Color::PLUM;
    assert_eq!(image.pixel(2, 2), [r, g, b, a]);
    assert_eq!(image.pixel(197, 197), [r, g, b, a]);
    // The default curve bulges towards (180, 180); its inside is next to that corner.
    assert_eq!(image.pixel(170, 170), to_bytes(CURVE_COLOR));
    // Between the curve and the control point.
    assert_eq!(image.pixel(170, 40), to_bytes(BACKGROUND_COLOR));
}

fn aliased_keeps_base_color(use_cpu: bool) {
    let params = TestParams {
        shading: CurveShading::Aliased,
        use_cpu,
        ..TestParams::new("aliased_keeps_base_color", 200, 200)
    };
    let image = render(&params);
    assert_eq!(image.pixel(170, 40), [255; 4]);
    assert_eq!(image.pixel(170, 170), to_bytes(CURVE_COLOR));
    for pixel in image.pixels() {
        assert!(
            pixel == [255; 4] || pixel == to_bytes(CURVE_COLOR),
            "unexpected aliased pixel {pixel:?}"
        );
    }
}

#[test]
fn base_color_outside_triangle_cpu() {
    base_color_outside_triangle(true);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn base_color_outside_triangle_gpu() {
    if gpu_available() {
        base_color_outside_triangle(false);
    }
}

#[test]
fn aliased_keeps_base_color_cpu() {
    aliased_keeps_base_color(true);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn aliased_keeps_base_color_gpu() {
    if gpu_available() {
        aliased_keeps_base_color(false);
    }
}

const BROKEN_VERTEX: &str = "@vertex fn main( -> @builtin(position) vec4<f32> {}";

const RENAMED_ATTRIBUTE_VERTEX: &str = r#"
@group(0) @binding(0)
var<uniform> u_projection: mat4x4<f32>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) bezier_uv: vec2<f32>,
}

@vertex
fn main(@location(0) a_point: vec2<f32>, @location(1) a_bezier_uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = u_projection * vec4(a_point, 0.0, 1.0);
    out.bezier_uv = a_bezier_uv;
    return out;
}
"#;

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn failed_setup_leaves_renderer_not_ready() {
    if !gpu_available() {
        return;
    }
    pollster::block_on(async {
        let mut context = GpuContext::new();
        let handle = context.require_device().await.unwrap();
        let device = &handle.device;
        let options = RendererOptions::default();
        let fragment = CurveShading::Antialiased.sources().fragment;

        let renderer = CurveRenderer::with_sources(
            device,
            ShaderSources {
                vertex: BROKEN_VERTEX,
                fragment,
            },
            &options,
        )
        .await;
        assert!(!renderer.is_ready());
        assert!(renderer.context().is_none());
        assert!(matches!(
            renderer.setup_error(),
            Some(Error::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            })
        ));

        let renderer = CurveRenderer::with_sources(
            device,
            ShaderSources {
                vertex: RENAMED_ATTRIBUTE_VERTEX,
                fragment,
            },
            &options,
        )
        .await;
        assert!(matches!(
            renderer.setup_error(),
            Some(Error::AttributeNotFound(name)) if name == "a_position"
        ));

        // A projection the size of one row would be overrun by every draw.
        let vector_projection = CurveShading::Antialiased
            .sources()
            .vertex
            .replace("u_projection: mat4x4<f32>", "u_projection: vec4<f32>");
        let renderer = CurveRenderer::with_sources(
            device,
            ShaderSources {
                vertex: &vector_projection,
                fragment,
            },
            &options,
        )
        .await;
        assert!(!renderer.is_ready());
        assert!(matches!(
            renderer.setup_error(),
            Some(Error::ProgramLink(_))
        ));

        let mut renderer = CurveRenderer::new(device, &options).await;
        assert!(renderer.is_ready());
        assert!(renderer.context_mut().is_some());
    });
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn set_curve_moves_the_triangle() {
    if !gpu_available() {
        return;
    }
    pollster::block_on(async {
        let mut context = GpuContext::new();
        let handle = context.require_device().await.unwrap();
        let (device, queue) = (&handle.device, &handle.queue);
        let mut render_context = RenderContext::new(device, &RendererOptions::default())
            .await
            .unwrap();
        let params = RenderParams::new(200, 200);
        let before = render_to_rgba8(device, queue, &render_context, &params).unwrap();

        // Mirror the curve into the left half.
        let mirrored = QuadraticCurve::new(
            Vector2::new(180.0, 180.0),
            Vector2::new(20.0, 20.0),
            Vector2::new(20.0, 180.0),
        );
        render_context.set_curve(queue, &mirrored);
        assert_eq!(render_context.curve(), &mirrored);
        let after = render_to_rgba8(device, queue, &render_context, &params).unwrap();

        let pixel = |data: &[u8], x: usize, y: usize| {
            let i = (y * 200 + x) * 4;
            [data[i], data[i + 1], data[i + 2], data[i + 3]]
        };
        assert_eq!(pixel(&before, 170, 170), to_bytes(CURVE_COLOR));
        assert_eq!(pixel(&before, 25, 170), [255; 4]);
        assert_eq!(pixel(&after, 25, 170), to_bytes(CURVE_COLOR));
        assert_eq!(pixel(&after, 185, 170), [255; 4]);
    });
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn readback_requires_rgba8() {
    if !gpu_available() {
        return;
    }
    pollster::block_on(async {
        let mut context = GpuContext::new();
        let handle = context.require_device().await.unwrap();
        let (device, queue) = (&handle.device, &handle.queue);
        let options = RendererOptions {
            target_format: vector_sprite::wgpu::TextureFormat::Bgra8Unorm,
            ..Default::default()
        };
        let render_context = RenderContext::new(device, &options).await.unwrap();
        assert!(matches!(
            render_to_rgba8(device, queue, &render_context, &RenderParams::new(16, 16)),
            Err(Error::UnsupportedReadbackFormat(_))
        ));
    });
}
