// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry model for Vector Sprite.
//!
//! This crate holds the plain value types every other part of the project is built on:
//! fixed-size [`Vector2`]/[`Vector3`] vectors, the row-major [`Matrix3x3`], the
//! [`QuadraticCurve`] and [`CubicCurve`] Bézier curves, the cubic to quadratic
//! [midpoint approximation](approximate_midpoint), and the orthographic
//! [`ProjectionMatrix`] used to map curve space onto normalized device coordinates.
//!
//! All types are immutable values. Every operation returns a new value, and none of them
//! touch shared state, so they can be used freely from any thread.
//!
//! ```
//! use vector_sprite_geometry::{CubicCurve, Vector2, approximate_midpoint};
//!
//! let cubic = CubicCurve::new(
//!     Vector2::new(0.0, 0.0),
//!     Vector2::new(0.0, 100.0),
//!     Vector2::new(100.0, 100.0),
//!     Vector2::new(100.0, 0.0),
//! );
//! let quads = approximate_midpoint(&cubic);
//! assert_eq!(quads[0].p1, Vector2::new(50.0, 150.0));
//! ```

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(
    clippy::return_self_not_must_use,
    clippy::missing_assert_message,
    reason = "Deferred"
)]

mod approx;
mod curve;
mod error;
mod matrix;
mod projection;
mod vector;

pub use approx::{approximate_midpoint, MidpointApproximation, QuadraticApproximation, Quadratics};
pub use curve::{CubicCurve, QuadraticCurve, BEZIER_UV};
pub use error::TypeMismatch;
pub use matrix::Matrix3x3;
pub use projection::{calculate_projection, ProjectionMatrix, ViewBox};
pub use vector::{Vector2, Vector3};

/// 2D geometry, with a focus on curves.
pub use peniko::kurbo;
