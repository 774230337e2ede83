// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Result};
use nv_flip::FlipPool;

use crate::{render_then_debug, write_png_to_file, Rendered, TestParams};

fn comparison_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("comparisons")
}

#[must_use]
/// A curve rendered on the CPU and the same curve rendered on the GPU
pub struct GpuCpuComparison {
    pub statistics: FlipPool,
    pub cpu_path: PathBuf,
    pub gpu_path: PathBuf,
    pub cpu_rendered: Rendered,
    pub gpu_rendered: Rendered,
    pub params: TestParams,
}

impl GpuCpuComparison {
    pub fn assert_mean_less_than(&mut self, value: f32) -> Result<()> {
        assert!(
            value < 0.1,
            "Mean should be less than 0.1 in almost all cases for a successful test"
        );
        let mean = self.statistics.mean();
        if mean > value {
            self.handle_failure(format!("Expected mean to be less than {value}, got {mean}"))?;
        }
        self.handle_success()
    }

    /// Number of pixels where some channel differs by more than `tolerance`.
    pub fn differing_pixels(&self, tolerance: u8) -> usize {
        self.cpu_rendered
            .pixels()
            .zip(self.gpu_rendered.pixels())
            .filter(|(cpu, gpu)| cpu.iter().zip(gpu).any(|(a, b)| a.abs_diff(*b) > tolerance))
            .count()
    }

    /// Fails unless fewer than `fraction` of all pixels differ by more than `tolerance`.
    ///
    /// Rasterization rules for pixels whose centre lies exactly on a triangle edge, and
    /// rounding in the derivative units, can differ between the two paths, so a small
    /// number of edge pixels is allowed to disagree.
    pub fn assert_differing_fraction_less_than(
        &mut self,
        fraction: f32,
        tolerance: u8,
    ) -> Result<()> {
        assert!(
            fraction < 0.1,
            "Fraction should be less than 0.1 in almost all cases for a successful test"
        );
        let total = (self.params.width * self.params.height) as usize;
        let differing = self.differing_pixels(tolerance);
        if differing as f32 > fraction * total as f32 {
            self.handle_failure(format!(
                "Expected fewer than {fraction} of pixels to differ, got {differing} of {total}"
            ))?;
        }
        self.handle_success()
    }

    fn handle_success(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.cpu_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            res => return res.map_err(Into::into),
        }
        match std::fs::remove_file(&self.gpu_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            res => res.map_err(Into::into),
        }
    }

    fn handle_failure(&mut self, message: String) -> Result<()> {
        write_png_to_file(&self.cpu_path, &self.cpu_rendered)?;
        write_png_to_file(&self.gpu_path, &self.gpu_rendered)?;
        eprintln!(
            "Wrote CPU result from test {} to {:?}\n\
            Wrote GPU result to {:?}\n",
            self.params.name, &self.cpu_path, &self.gpu_path
        );

        bail!("{}", message);
    }
}

/// Renders a curve with both the CPU reference shaders and the GPU pipeline
pub fn compare_gpu_cpu_sync(params: TestParams) -> Result<GpuCpuComparison> {
    pollster::block_on(compare_gpu_cpu(params))
}

pub async fn compare_gpu_cpu(mut params: TestParams) -> Result<GpuCpuComparison> {
    params.use_cpu = false;
    let gpu_rendered = render_then_debug(&params).await?;
    params.use_cpu = true;
    let cpu_rendered = render_then_debug(&params).await?;

    let path_root = &comparison_dir().join(&params.name);
    let cpu_path = path_root.with_extension("cpu.png");
    let gpu_path = path_root.with_extension("gpu.png");

    ensure!(
        gpu_rendered.width == cpu_rendered.width && gpu_rendered.height == cpu_rendered.height,
        "GPU and CPU results have different sizes"
    );
    let cpu_flip = flip_image(&cpu_rendered);
    let gpu_flip = flip_image(&gpu_rendered);
    let error_map = nv_flip::flip(cpu_flip, gpu_flip, nv_flip::DEFAULT_PIXELS_PER_DEGREE);
    let statistics = FlipPool::from_image(&error_map);

    Ok(GpuCpuComparison {
        statistics,
        cpu_path,
        gpu_path,
        cpu_rendered,
        gpu_rendered,
        params,
    })
}

/// Drops the alpha channel; both renderers only produce opaque pixels.
fn flip_image(image: &Rendered) -> nv_flip::FlipImageRgb8 {
    let rgb = image
        .pixels()
        .flat_map(|[r, g, b, _]| [r, g, b])
        .collect::<Vec<_>>();
    nv_flip::FlipImageRgb8::with_data(image.width, image.height, &rgb)
}
