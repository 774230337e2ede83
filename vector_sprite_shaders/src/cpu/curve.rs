// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vector_sprite_geometry::{ProjectionMatrix, QuadraticCurve, BEZIER_UV};

use super::CpuTexture;
use crate::{CurveShading, BACKGROUND_COLOR, CURVE_COLOR, STROKE_COLOR, STROKE_WIDTH};

/// Interpolated values and their screen space derivatives at one pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FragmentInput {
    pub bezier_uv: [f32; 2],
    pub duv_dx: [f32; 2],
    pub duv_dy: [f32; 2],
    /// Derivatives of the draw space position, used for the stroke width.
    pub dpos_dx: [f32; 2],
    pub dpos_dy: [f32; 2],
}

fn length([x, y]: [f32; 2]) -> f32 {
    x.hypot(y)
}

fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    core::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

/// Approximate distance in pixels from the fragment to the curve, negative inside.
pub fn curve_signed_distance(input: &FragmentInput) -> f32 {
    let [u, v] = input.bezier_uv;
    let (dx, dy) = (input.duv_dx, input.duv_dy);
    let gradient = [2.0 * u * dx[0] - dx[1], 2.0 * u * dy[0] - dy[1]];
    (u * u - v) / length(gradient)
}

/// Runs the fragment stage of `shading`. `None` means the fragment is discarded.
pub fn shade(shading: CurveShading, input: &FragmentInput) -> Option<[f32; 4]> {
    let [u, v] = input.bezier_uv;
    match shading {
        CurveShading::Aliased => (u * u - v <= 0.0).then_some(CURVE_COLOR),
        CurveShading::Antialiased => {
            let curve_alpha = (0.5 - curve_signed_distance(input)).clamp(0.0, 1.0);
            Some(mix(BACKGROUND_COLOR, CURVE_COLOR, curve_alpha))
        }
        CurveShading::AntialiasedStroke => {
            let curve_sd = curve_signed_distance(input);
            let scale = 0.5 * (length(input.dpos_dx) + length(input.dpos_dy));
            let curve_alpha = (0.5 - curve_sd).clamp(0.0, 1.0);
            let stroke_width = STROKE_WIDTH / scale;
            let inner_alpha = (-0.5 + curve_sd + stroke_width * 0.5).clamp(0.0, 1.0);
            let outer_alpha = (0.5 - (curve_sd - stroke_width * 0.5)).clamp(0.0, 1.0);
            if inner_alpha > 0.0 && outer_alpha > 0.0 {
                let stroke = mix(BACKGROUND_COLOR, STROKE_COLOR, outer_alpha);
                Some(mix(CURVE_COLOR, stroke, inner_alpha))
            } else {
                Some(mix(BACKGROUND_COLOR, CURVE_COLOR, curve_alpha))
            }
        }
    }
}

/// Rasterizes the control triangle of `curve` into `target`.
///
/// Pixels are covered when their centre lies inside the triangle. Degenerate triangles
/// cover nothing.
pub fn render_curve(
    shading: CurveShading,
    curve: &QuadraticCurve,
    projection: &ProjectionMatrix,
    target: &mut CpuTexture,
) {
    let (width, height) = (target.width as f32, target.height as f32);
    let pixels = curve
        .points()
        .map(|p| projection.transform_to_pixel(p, width, height));
    let draw = curve.positions();
    let [p0, p1, p2] = pixels;
    let e1 = [p1[0] - p0[0], p1[1] - p0[1]];
    let e2 = [p2[0] - p0[0], p2[1] - p0[1]];
    let det = e1[0] * e2[1] - e1[1] * e2[0];
    if !det.is_finite() || det.abs() < f32::EPSILON {
        return;
    }

    // Attributes are affine in screen space, so `[d/dx, d/dy]` is constant over the triangle.
    let derivatives = |a: [[f32; 2]; 3], axis: usize| -> [f32; 2] {
        let d1 = a[1][axis] - a[0][axis];
        let d2 = a[2][axis] - a[0][axis];
        [
            (d1 * e2[1] - d2 * e1[1]) / det,
            (d2 * e1[0] - d1 * e2[0]) / det,
        ]
    };
    let du = derivatives(BEZIER_UV, 0);
    let dv = derivatives(BEZIER_UV, 1);
    let dpx = derivatives(draw, 0);
    let dpy = derivatives(draw, 1);
    let base = FragmentInput {
        duv_dx: [du[0], dv[0]],
        duv_dy: [du[1], dv[1]],
        dpos_dx: [dpx[0], dpy[0]],
        dpos_dy: [dpx[1], dpy[1]],
        ..FragmentInput::default()
    };

    let min_x = p0[0].min(p1[0]).min(p2[0]).floor().max(0.0) as usize;
    let min_y = p0[1].min(p1[1]).min(p2[1]).floor().max(0.0) as usize;
    let max_x = p0[0].max(p1[0]).max(p2[0]).ceil().min(width) as usize;
    let max_y = p0[1].max(p1[1]).max(p2[1]).ceil().min(height) as usize;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let d = [x as f32 + 0.5 - p0[0], y as f32 + 0.5 - p0[1]];
            let b1 = (d[0] * e2[1] - d[1] * e2[0]) / det;
            let b2 = (e1[0] * d[1] - e1[1] * d[0]) / det;
            let b0 = 1.0 - b1 - b2;
            if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                continue;
            }
            let interpolate =
                |a: [[f32; 2]; 3], i: usize| b0 * a[0][i] + b1 * a[1][i] + b2 * a[2][i];
            let input = FragmentInput {
                bezier_uv: [interpolate(BEZIER_UV, 0), interpolate(BEZIER_UV, 1)],
                ..base
            };
            if let Some(color) = shade(shading, &input) {
                target.store(x, y, color);
            }
        }
    }
}
