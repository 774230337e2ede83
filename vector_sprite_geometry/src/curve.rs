// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo;

use crate::Vector2;

/// Local `(u, v)` coordinates assigned to the three control points of a quadratic curve.
///
/// Interpolated across the control triangle, these make `u² - v = 0` trace the curve
/// itself, negative on the inside and positive on the outside. Any other assignment
/// describes a different curve.
pub const BEZIER_UV: [[f32; 2]; 3] = [[0.0, 0.0], [0.5, 0.0], [1.0, 1.0]];

/// Quadratic Bézier curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticCurve {
    pub p0: Vector2,
    pub p1: Vector2,
    pub p2: Vector2,
}

impl QuadraticCurve {
    pub const fn new(p0: Vector2, p1: Vector2, p2: Vector2) -> Self {
        Self { p0, p1, p2 }
    }

    pub const fn points(&self) -> [Vector2; 3] {
        [self.p0, self.p1, self.p2]
    }

    /// Control points flattened as the contents of a `vec2<f32>` vertex buffer.
    pub const fn positions(&self) -> [[f32; 2]; 3] {
        [self.p0.to_array(), self.p1.to_array(), self.p2.to_array()]
    }

    /// Evaluates the curve at parameter `t`.
    pub fn eval(&self, t: f32) -> Vector2 {
        let mt = 1.0 - t;
        let (b0, b1, b2) = (mt * mt, 2.0 * mt * t, t * t);
        Vector2::new(
            b0 * self.p0.x() + b1 * self.p1.x() + b2 * self.p2.x(),
            b0 * self.p0.y() + b1 * self.p1.y() + b2 * self.p2.y(),
        )
    }
}

impl From<QuadraticCurve> for kurbo::QuadBez {
    fn from(curve: QuadraticCurve) -> Self {
        Self::new(curve.p0, curve.p1, curve.p2)
    }
}

impl From<kurbo::QuadBez> for QuadraticCurve {
    fn from(quad: kurbo::QuadBez) -> Self {
        Self::new(quad.p0.into(), quad.p1.into(), quad.p2.into())
    }
}

/// Cubic Bézier curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicCurve {
    pub p0: Vector2,
    pub p1: Vector2,
    pub p2: Vector2,
    pub p3: Vector2,
}

impl CubicCurve {
    pub const fn new(p0: Vector2, p1: Vector2, p2: Vector2, p3: Vector2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub const fn points(&self) -> [Vector2; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Evaluates the curve at parameter `t`.
    pub fn eval(&self, t: f32) -> Vector2 {
        let mt = 1.0 - t;
        let (b0, b1, b2, b3) = (
            mt * mt * mt,
            3.0 * mt * mt * t,
            3.0 * mt * t * t,
            t * t * t,
        );
        Vector2::new(
            b0 * self.p0.x() + b1 * self.p1.x() + b2 * self.p2.x() + b3 * self.p3.x(),
            b0 * self.p0.y() + b1 * self.p1.y() + b2 * self.p2.y() + b3 * self.p3.y(),
        )
    }
}

impl From<CubicCurve> for kurbo::CubicBez {
    fn from(curve: CubicCurve) -> Self {
        Self::new(curve.p0, curve.p1, curve.p2, curve.p3)
    }
}

impl From<kurbo::CubicBez> for CubicCurve {
    fn from(cubic: kurbo::CubicBez) -> Self {
        Self::new(
            cubic.p0.into(),
            cubic.p1.into(),
            cubic.p2.into(),
            cubic.p3.into(),
        )
    }
}
