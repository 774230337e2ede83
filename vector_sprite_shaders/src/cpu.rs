// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU implementations of the curve shaders.
//!
//! These rasterize one control triangle the way the GPU pipeline does, sampling at pixel
//! centres and computing screen space derivatives analytically. They are meant for
//! testing and debugging; they are not a fallback renderer.

mod curve;

pub use curve::{curve_signed_distance, render_curve, shade, FragmentInput};

/// An RGBA8 image with one packed `u32` per pixel, red in the low byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuTexture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl CpuTexture {
    /// Creates a transparent black texture.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Fills every pixel with `color`.
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(pack4x8unorm(color));
    }

    /// Returns the pixel at `(x, y)` as RGBA bytes.
    ///
    /// Panics if the coordinates are outside the texture.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y * self.width + x].to_le_bytes()
    }

    pub(crate) fn store(&mut self, x: usize, y: usize, color: [f32; 4]) {
        self.pixels[y * self.width + x] = pack4x8unorm(color);
    }

    /// Row-major RGBA8 bytes, as read back from a GPU texture.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
    }
}

pub fn pack4x8unorm(x: [f32; 4]) -> u32 {
    let mut result = 0;
    for (i, c) in x.into_iter().enumerate() {
        let byte = (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        result |= byte << (i * 8);
    }
    result
}

pub fn unpack4x8unorm(x: u32) -> [f32; 4] {
    let mut result = [0.0; 4];
    for (i, c) in result.iter_mut().enumerate() {
        *c = ((x >> (i * 8)) & 0xff) as f32 * (1.0 / 255.0);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{pack4x8unorm, unpack4x8unorm, CpuTexture};

    #[test]
    fn packing_is_rgba_little_endian() {
        let packed = pack4x8unorm([1.0, 0.0, 0.5, 2.0]);
        assert_eq!(packed.to_le_bytes(), [255, 0, 128, 255]);
        assert_eq!(unpack4x8unorm(packed)[0], 1.0);
    }

    #[test]
    fn clear_and_read() {
        let mut texture = CpuTexture::new(3, 2);
        assert_eq!(texture.pixel(2, 1), [0, 0, 0, 0]);
        texture.clear([1.0, 1.0, 1.0, 1.0]);
        assert_eq!(texture.pixel(2, 1), [255; 4]);
        assert_eq!(texture.to_rgba8().len(), 3 * 2 * 4);
    }
}
