// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests which ensure that the GPU pipeline and the CPU reference shaders give the same
//! results.

use vector_sprite::{CubicCurve, CurveShading, QuadraticCurve, Vector2, ViewBox};
use vector_sprite_tests::{compare_gpu_cpu_sync, gpu_available, TestParams};

fn compare(params: TestParams) {
    if !gpu_available() {
        return;
    }
    let mut comparison = compare_gpu_cpu_sync(params).unwrap();
    comparison.assert_mean_less_than(0.02).unwrap();
    comparison
        .assert_differing_fraction_less_than(0.02, 2)
        .unwrap();
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn compare_aliased() {
    let params = TestParams {
        shading: CurveShading::Aliased,
        ..TestParams::new("compare_aliased", 200, 200)
    };
    compare(params);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn compare_antialiased() {
    let params = TestParams {
        shading: CurveShading::Antialiased,
        ..TestParams::new("compare_antialiased", 200, 200)
    };
    compare(params);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn compare_antialiased_stroke() {
    let params = TestParams {
        shading: CurveShading::AntialiasedStroke,
        ..TestParams::new("compare_antialiased_stroke", 200, 200)
    };
    compare(params);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn compare_view_box() {
    // Zoomed in 2x horizontally and 3x vertically; the stroke stays 10 units wide.
    let params = TestParams {
        shading: CurveShading::AntialiasedStroke,
        view_box: Some(ViewBox::new(10.0, 10.0, 100.0, 100.0)),
        ..TestParams::new("compare_view_box", 200, 300)
    };
    compare(params);
}

#[test]
#[cfg_attr(skip_gpu_tests, ignore)]
fn compare_approximated_cubic() {
    let cubic = CubicCurve::new(
        Vector2::new(10.0, 10.0),
        Vector2::new(10.0, 110.0),
        Vector2::new(110.0, 110.0),
        Vector2::new(110.0, 10.0),
    );
    let curve: QuadraticCurve = cubic.approximate_quadratics()[0];
    let params = TestParams {
        curve,
        view_box: Some(ViewBox::new(0.0, 0.0, 120.0, 180.0)),
        ..TestParams::new("compare_approximated_cubic", 240, 360)
    };
    compare(params);
}
