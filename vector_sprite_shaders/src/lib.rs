// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve shaders for Vector Sprite.
//!
//! Each [`CurveShading`] variant is a pair of WGSL sources, one vertex stage and one fragment
//! stage. Both stages expect a single triangle whose vertices are the control points of a
//! quadratic curve, paired with the fixed [`BEZIER_UV`](vector_sprite_geometry::BEZIER_UV)
//! coordinates.
//!
//! The [`compile`] module turns a source pair into a linked [`Program`](compile::Program),
//! reporting compile and link diagnostics without needing a GPU. Binding the program to a
//! device is left to the client.
//!
//! The [`cpu`] module contains Rust transcriptions of the fragment stages, used as a
//! reference when testing the GPU output.

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
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    reason = "Deferred"
)]

pub mod compile;
pub mod cpu;

/// Name of the vertex attribute carrying the curve control points.
pub const POSITION_ATTRIBUTE: &str = "a_position";
/// Name of the vertex attribute carrying the implicit curve coordinates.
pub const BEZIER_UV_ATTRIBUTE: &str = "a_bezier_uv";
/// Name of the uniform holding the column-major projection matrix.
pub const PROJECTION_UNIFORM: &str = "u_projection";

/// Fill outside the curve, inside the control triangle.
pub const BACKGROUND_COLOR: [f32; 4] = [235.0 / 255.0, 237.0 / 255.0, 240.0 / 255.0, 1.0];
/// Fill inside the curve.
pub const CURVE_COLOR: [f32; 4] = [62.0 / 255.0, 142.0 / 255.0, 204.0 / 255.0, 1.0];
/// Outline of the stroked variant.
pub const STROKE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Full width of the outline band, in draw space units.
pub const STROKE_WIDTH: f32 = 10.0;

/// Vertex and fragment source for one program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// How the pixels inside the control triangle are shaded.
///
/// Each variant strictly extends the previous one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveShading {
    /// Binary inside test; pixels outside the curve are discarded.
    Aliased,
    /// Coverage from the gradient based signed distance to the curve.
    #[default]
    Antialiased,
    /// Anti-aliased fill with a [`STROKE_WIDTH`] wide outline along the curve.
    AntialiasedStroke,
}

impl CurveShading {
    pub const ALL: [Self; 3] = [Self::Aliased, Self::Antialiased, Self::AntialiasedStroke];

    pub const fn sources(self) -> ShaderSources<'static> {
        match self {
            Self::Aliased => ShaderSources {
                vertex: include_str!("../shader/curve_vertex.wgsl"),
                fragment: include_str!("../shader/aliased.wgsl"),
            },
            Self::Antialiased => ShaderSources {
                vertex: include_str!("../shader/curve_vertex.wgsl"),
                fragment: include_str!("../shader/antialiased.wgsl"),
            },
            Self::AntialiasedStroke => ShaderSources {
                vertex: include_str!("../shader/curve_stroke_vertex.wgsl"),
                fragment: include_str!("../shader/antialiased_stroke.wgsl"),
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aliased => "aliased",
            Self::Antialiased => "antialiased",
            Self::AntialiasedStroke => "antialiased_stroke",
        }
    }

    /// Compiles and links this variant's sources.
    pub fn build(self) -> Result<compile::Program, compile::Error> {
        compile::build_program(self.sources())
    }
}

impl core::str::FromStr for CurveShading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shading| shading.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown curve shading `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::{CurveShading, BEZIER_UV_ATTRIBUTE, POSITION_ATTRIBUTE, PROJECTION_UNIFORM};

    #[test]
    fn every_variant_builds() {
        for shading in CurveShading::ALL {
            let program = shading
                .build()
                .unwrap_or_else(|e| panic!("{}: {e}", shading.name()));
            assert_eq!(program.attribute(POSITION_ATTRIBUTE).unwrap().location, 0);
            assert_eq!(program.attribute(BEZIER_UV_ATTRIBUTE).unwrap().location, 1);
            let projection = program.uniform(PROJECTION_UNIFORM).unwrap();
            assert_eq!((projection.group, projection.binding), (0, 0));
            assert_eq!(projection.size, 64);
        }
    }

    #[test]
    fn names_round_trip() {
        for shading in CurveShading::ALL {
            assert_eq!(shading.name().parse::<CurveShading>(), Ok(shading));
        }
        assert!("bogus".parse::<CurveShading>().is_err());
    }
}
