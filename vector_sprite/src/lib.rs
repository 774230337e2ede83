// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector Sprite renders quadratic Bézier curves on the GPU with analytic anti-aliasing.
//!
//! A quadratic curve is drawn as a single triangle, its control polygon. Each vertex carries
//! a fixed implicit coordinate from [`BEZIER_UV`], so that after interpolation the curve is
//! the zero set of `u² - v`. The fragment shader divides that function by the length of its
//! screen space gradient to estimate the distance to the curve in pixels, and uses the
//! estimate as coverage. Cubic curves are first reduced to a quadratic with
//! [`approximate_midpoint`].
//!
//! Rendering goes through a [`RenderContext`], which owns the pipeline and buffers for one
//! [`wgpu::Device`]. [`CurveRenderer`] wraps context creation for callers which would rather
//! treat a failed setup as "not ready" than handle the error.
//!
//! ```no_run
//! use vector_sprite::kurbo::CubicBez;
//! use vector_sprite::peniko::Color;
//! use vector_sprite::{CubicCurve, RenderContext, RenderParams, RendererOptions};
//!
//! # use vector_sprite::wgpu;
//! # async fn example(device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) -> vector_sprite::Result<()> {
//! let cubic = CubicCurve::from(CubicBez::new((0., 0.), (0., 100.), (100., 100.), (100., 0.)));
//! let options = RendererOptions {
//!     curve: cubic.approximate_quadratics()[0],
//!     ..Default::default()
//! };
//! let context = RenderContext::new(device, &options).await?;
//! context.draw(
//!     device,
//!     queue,
//!     view,
//!     &RenderParams {
//!         width: 100,
//!         height: 150,
//!         view_box: None,
//!         base_color: Color::WHITE,
//!     },
//! );
//! # Ok(())
//! # }
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
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    missing_debug_implementations,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    reason = "Deferred"
)]

mod program;
mod render;

pub mod util;

/// Styling and composition primitives.
pub use peniko;
/// 2D geometry, with a focus on curves.
pub use peniko::kurbo;
pub use wgpu;

pub use program::GpuProgram;
pub use render::{CurveRenderer, RenderContext};
pub use vector_sprite_geometry::{
    approximate_midpoint, calculate_projection, CubicCurve, Matrix3x3, MidpointApproximation,
    ProjectionMatrix, QuadraticApproximation, QuadraticCurve, Quadratics, TypeMismatch, Vector2,
    Vector3, ViewBox, BEZIER_UV,
};
pub use vector_sprite_shaders::{CurveShading, ShaderSources};

use peniko::Color;
use thiserror::Error;
use vector_sprite_shaders::compile::{self, ShaderStage};

/// Errors that can occur while setting up or using the curve pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// There is no available device.
    #[error("Couldn't find suitable device")]
    NoCompatibleDevice,
    /// A shader stage failed to compile, either during validation or on the device.
    #[error("{stage} shader failed to compile:\n{diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },
    /// The shader stages do not fit together, or the device rejected the pipeline.
    #[error("Failed to link program:\n{0}")]
    ProgramLink(String),
    /// The program has no vertex attribute with this name.
    #[error("Vertex attribute `{0}` not found")]
    AttributeNotFound(String),
    /// The program has no uniform with this name.
    #[error("Uniform `{0}` not found")]
    UniformNotFound(String),
    /// The device ran out of memory while creating a GPU object.
    #[error("Couldn't allocate GPU resources: {0}")]
    ResourceAllocation(String),
    /// Pixels can only be read back from 8 bit RGBA targets.
    #[error("Can't read back pixels of a {0:?} target")]
    UnsupportedReadbackFormat(wgpu::TextureFormat),
    /// Failed to async map a buffer.
    /// See [`wgpu::BufferAsyncError`] for more information.
    #[error("Failed to async map a buffer")]
    BufferAsyncError(#[from] wgpu::BufferAsyncError),
    /// The buffer mapping callback was dropped without being called.
    #[error("Buffer mapping was abandoned")]
    MapAbandoned,
    #[error("wgpu Error from scope")]
    WgpuErrorFromScope(#[from] wgpu::Error),
}

impl From<compile::Error> for Error {
    fn from(error: compile::Error) -> Self {
        match error {
            compile::Error::Compile { stage, diagnostic } => {
                Self::ShaderCompile { stage, diagnostic }
            }
            compile::Error::Link(diagnostic) => Self::ProgramLink(diagnostic),
            compile::Error::MissingAttribute(name) => Self::AttributeNotFound(name),
            compile::Error::MissingUniform(name) => Self::UniformNotFound(name),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Options which are set once, when the [`RenderContext`] is created.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RendererOptions {
    /// Format of the textures which will be drawn into.
    pub target_format: wgpu::TextureFormat,
    pub shading: CurveShading,
    /// Initial curve; replace it later with [`RenderContext::set_curve`].
    pub curve: QuadraticCurve,
}

impl RendererOptions {
    /// The curve drawn when no other is given.
    pub const DEFAULT_CURVE: QuadraticCurve = QuadraticCurve::new(
        Vector2::new(20.0, 180.0),
        Vector2::new(180.0, 20.0),
        Vector2::new(180.0, 180.0),
    );
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            target_format: wgpu::TextureFormat::Rgba8Unorm,
            shading: CurveShading::default(),
            curve: Self::DEFAULT_CURVE,
        }
    }
}

/// Parameters used in a single render that are configurable by the client.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Width of the target in pixels.
    pub width: u32,
    /// Height of the target in pixels.
    pub height: u32,
    /// Logical rectangle mapped onto the target. `None` maps one unit to one pixel.
    pub view_box: Option<ViewBox>,
    /// The color which the target is cleared to before the curve is drawn.
    pub base_color: Color,
}

impl RenderParams {
    /// Parameters for a `width` by `height` target cleared to white.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            view_box: None,
            base_color: Color::WHITE,
        }
    }

    pub fn projection(&self) -> ProjectionMatrix {
        ProjectionMatrix::calculate(self.width as f32, self.height as f32, self.view_box)
    }
}

#[cfg(test)]
mod tests {
    use vector_sprite_shaders::compile::ShaderStage;
    use vector_sprite_shaders::ShaderSources;

    use super::{Error, RenderParams, ViewBox};

    #[test]
    fn compile_errors_convert() {
        let err = vector_sprite_shaders::compile::build_program(ShaderSources {
            vertex: "fn",
            fragment: "fn",
        })
        .unwrap_err();
        assert!(matches!(
            Error::from(err),
            Error::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        let err = vector_sprite_shaders::CurveShading::Aliased
            .build()
            .unwrap()
            .uniform("u_missing")
            .unwrap_err();
        assert!(matches!(Error::from(err), Error::UniformNotFound(name) if name == "u_missing"));
    }

    #[test]
    fn params_projection() {
        let params = RenderParams {
            view_box: Some(ViewBox::new(0.0, 0.0, 100.0, 100.0)),
            ..RenderParams::new(200, 100)
        };
        let projection = params.projection();
        assert_eq!(projection.scale_x(), 0.02);
        assert_eq!(projection.scale_y(), -0.02);
        assert_eq!(RenderParams::new(200, 100).projection().scale_x(), 0.01);
    }
}
