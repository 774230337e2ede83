// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};

use crate::Vector2;

/// Logical coordinate rectangle mapped onto the rendering surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub const fn new(min_x: f32, min_y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }
}

impl From<[f32; 4]> for ViewBox {
    fn from([min_x, min_y, width, height]: [f32; 4]) -> Self {
        Self::new(min_x, min_y, width, height)
    }
}

/// Orthographic view to clip space transform, as a column-major 4x4 matrix.
///
/// Logical y grows downwards on the surface while clip space y grows upwards, so the
/// y scale is negative.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ProjectionMatrix([f32; 16]);

static_assertions::assert_eq_size!(ProjectionMatrix, [u8; 64]);

impl ProjectionMatrix {
    /// Computes the projection for a `width` by `height` surface.
    ///
    /// Without a view box the surface shows `[0, 0, width, height]`. A zero sized view box
    /// produces non-finite entries.
    pub fn calculate(width: f32, height: f32, view_box: Option<ViewBox>) -> Self {
        let ViewBox {
            min_x,
            min_y,
            width: box_width,
            height: box_height,
        } = view_box.unwrap_or(ViewBox::new(0.0, 0.0, width, height));
        let scale_x = 2.0 / box_width;
        let scale_y = -2.0 / box_height;
        let translate_x = -1.0 - min_x * scale_x;
        let translate_y = 1.0 - min_y * scale_y;
        #[rustfmt::skip]
        let m = [
            scale_x, 0.0, 0.0, 0.0,
            0.0, scale_y, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            translate_x, translate_y, 0.0, 1.0,
        ];
        Self(m)
    }

    pub const fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    pub const fn scale_x(&self) -> f32 {
        self.0[0]
    }

    pub const fn scale_y(&self) -> f32 {
        self.0[5]
    }

    pub const fn translate_x(&self) -> f32 {
        self.0[12]
    }

    pub const fn translate_y(&self) -> f32 {
        self.0[13]
    }

    /// Maps a logical point to normalized device coordinates.
    pub fn transform_point(&self, point: Vector2) -> [f32; 2] {
        [
            point.x() * self.scale_x() + self.translate_x(),
            point.y() * self.scale_y() + self.translate_y(),
        ]
    }

    /// Maps a logical point to pixel coordinates on a `width` by `height` surface, with the
    /// origin in the top left corner.
    pub fn transform_to_pixel(&self, point: Vector2, width: f32, height: f32) -> [f32; 2] {
        let [x, y] = self.transform_point(point);
        [(x + 1.0) * 0.5 * width, (1.0 - y) * 0.5 * height]
    }
}

/// Shorthand for [`ProjectionMatrix::calculate`].
pub fn calculate_projection(
    width: f32,
    height: f32,
    view_box: Option<ViewBox>,
) -> ProjectionMatrix {
    ProjectionMatrix::calculate(width, height, view_box)
}

#[cfg(test)]
mod tests {
    use super::{calculate_projection, ProjectionMatrix, ViewBox};
    use crate::Vector2;

    #[test]
    fn default_view_box() {
        let p = calculate_projection(200.0, 100.0, None);
        assert_eq!(p.scale_x(), 0.01);
        assert_eq!(p.scale_y(), -0.02);
        assert_eq!(p.translate_x(), -1.0);
        assert_eq!(p.translate_y(), 1.0);
    }

    #[test]
    fn explicit_view_box() {
        let p = calculate_projection(200.0, 100.0, Some([0.0, 0.0, 100.0, 100.0].into()));
        assert_eq!(p.scale_x(), 0.02);
        assert_eq!(p.scale_y(), -0.02);
        assert_eq!(p.translate_x(), -1.0);
        assert_eq!(p.translate_y(), 1.0);
    }

    #[test]
    fn layout_is_column_major() {
        let p =
            ProjectionMatrix::calculate(200.0, 100.0, Some(ViewBox::new(10.0, 20.0, 50.0, 40.0)));
        #[rustfmt::skip]
        let expected = [
            0.04, 0.0, 0.0, 0.0,
            0.0, -0.05, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            -1.4, 2.0, 0.0, 1.0,
        ];
        for (a, b) in p.as_array().iter().zip(expected) {
            assert!((a - b).abs() < 1e-6, "{:?}", p.as_array());
        }
    }

    #[test]
    fn view_box_corners_hit_clip_corners() {
        let view_box = ViewBox::new(-30.0, 15.0, 60.0, 90.0);
        let p = ProjectionMatrix::calculate(640.0, 480.0, Some(view_box));
        let top_left = p.transform_point(Vector2::new(-30.0, 15.0));
        let bottom_right = p.transform_point(Vector2::new(30.0, 105.0));
        assert!((top_left[0] + 1.0).abs() < 1e-6 && (top_left[1] - 1.0).abs() < 1e-6);
        assert!((bottom_right[0] - 1.0).abs() < 1e-6 && (bottom_right[1] + 1.0).abs() < 1e-6);
        let [x, y] = p.transform_to_pixel(Vector2::new(0.0, 60.0), 640.0, 480.0);
        assert!((x - 320.0).abs() < 1e-3 && (y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn zero_view_box_is_not_finite() {
        let p = ProjectionMatrix::calculate(0.0, 0.0, None);
        assert!(!p.scale_x().is_finite());
    }
}
