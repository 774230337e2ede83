// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic to quadratic degree reduction.

use smallvec::SmallVec;

use crate::{CubicCurve, QuadraticCurve, Vector2};

/// Quadratic curves produced by approximating a single cubic.
///
/// Inline storage is sized for single segment strategies; longer results spill to the heap.
pub type Quadratics = SmallVec<[QuadraticCurve; 1]>;

/// A strategy for replacing a cubic curve with quadratic curves.
pub trait QuadraticApproximation {
    /// Returns zero or more quadratics which together approximate `curve`.
    fn approximate(&self, curve: &CubicCurve) -> Quadratics;
}

/// Reversed degree elevation matched at the curve midpoint.
///
/// Always yields exactly one quadratic, which shares the cubic's endpoints and passes
/// through the cubic's point at `t = 0.5`. No error bound is computed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MidpointApproximation;

impl QuadraticApproximation for MidpointApproximation {
    fn approximate(&self, curve: &CubicCurve) -> Quadratics {
        approximate_midpoint(curve)
    }
}

/// Approximates `curve` with a single quadratic using [`MidpointApproximation`].
///
/// The control point is `-1/4 Q0 + 3/4 Q1 + 3/4 Q2 - 1/4 Q3`, applied to each axis.
pub fn approximate_midpoint(curve: &CubicCurve) -> Quadratics {
    let axis = |q0: f32, q1: f32, q2: f32, q3: f32| -0.25 * q0 + 0.75 * q1 + 0.75 * q2 - 0.25 * q3;
    let control = Vector2::new(
        axis(curve.p0.x(), curve.p1.x(), curve.p2.x(), curve.p3.x()),
        axis(curve.p0.y(), curve.p1.y(), curve.p2.y(), curve.p3.y()),
    );
    smallvec::smallvec![QuadraticCurve::new(curve.p0, control, curve.p3)]
}

impl CubicCurve {
    /// Shorthand for [`approximate_midpoint`].
    pub fn approximate_quadratics(&self) -> Quadratics {
        approximate_midpoint(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{approximate_midpoint, MidpointApproximation, QuadraticApproximation};
    use crate::{CubicCurve, QuadraticCurve, Vector2};

    fn arch() -> CubicCurve {
        CubicCurve::new(
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 100.0),
            Vector2::new(100.0, 100.0),
            Vector2::new(100.0, 0.0),
        )
    }

    #[test]
    fn arch_control_point() {
        let quads = approximate_midpoint(&arch());
        assert_eq!(
            quads.as_slice(),
            &[QuadraticCurve::new(
                Vector2::new(0.0, 0.0),
                Vector2::new(50.0, 150.0),
                Vector2::new(100.0, 0.0),
            )]
        );
    }

    #[test]
    fn endpoints_are_kept() {
        let cubics = [
            arch(),
            CubicCurve::new(
                Vector2::new(-12.5, 3.0),
                Vector2::new(7.0, -40.0),
                Vector2::new(18.0, 90.0),
                Vector2::new(250.0, 1.0),
            ),
            CubicCurve::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO, Vector2::ZERO),
        ];
        for cubic in cubics {
            let quads = MidpointApproximation.approximate(&cubic);
            assert_eq!(quads.len(), 1);
            assert_eq!(quads[0].p0, cubic.p0);
            assert_eq!(quads[0].p2, cubic.p3);
        }
    }

    #[test]
    fn midpoints_coincide() {
        let cubics = [
            arch(),
            CubicCurve::new(
                Vector2::new(20.0, 180.0),
                Vector2::new(40.0, 20.0),
                Vector2::new(160.0, 30.0),
                Vector2::new(180.0, 180.0),
            ),
            CubicCurve::new(
                Vector2::new(-5.0, 8.0),
                Vector2::new(300.0, -2.0),
                Vector2::new(-120.0, 64.0),
                Vector2::new(9.0, 9.0),
            ),
        ];
        for cubic in cubics {
            let quad = cubic.approximate_quadratics()[0];
            let a = cubic.eval(0.5);
            let b = quad.eval(0.5);
            assert!((a.x() - b.x()).abs() < 1e-3, "{a:?} != {b:?}");
            assert!((a.y() - b.y()).abs() < 1e-3, "{a:?} != {b:?}");
        }
    }
}
