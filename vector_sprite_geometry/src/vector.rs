// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::mem::size_of;
use core::ops::Index;

use bytemuck::{Pod, Zeroable};
use peniko::kurbo;

use crate::TypeMismatch;

/// Two component vector.
///
/// Components are stored as `f32` in `x, y` order, which is also the layout of a
/// vertex attribute of type `vec2<f32>`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector2 {
    x: f32,
    y: f32,
}

static_assertions::assert_eq_size!(Vector2, [f32; 2]);

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Builds a vector from exactly two components.
    pub fn from_components(components: &[f32]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Vector2", "components", 2, components.len())?;
        Ok(Self::new(components[0], components[1]))
    }

    /// Builds a vector from the native-endian bytes of two `f32`s.
    pub fn from_buffer(bytes: &[u8]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Vector2", "bytes", size_of::<Self>(), bytes.len())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    pub const fn x(self) -> f32 {
        self.x
    }

    pub const fn y(self) -> f32 {
        self.y
    }

    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Index<usize> for Vector2 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vector2 index out of bounds: {index}"),
        }
    }
}

impl From<[f32; 2]> for Vector2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl TryFrom<&[f32]> for Vector2 {
    type Error = TypeMismatch;

    fn try_from(components: &[f32]) -> Result<Self, Self::Error> {
        Self::from_components(components)
    }
}

impl From<kurbo::Point> for Vector2 {
    fn from(point: kurbo::Point) -> Self {
        Self::new(point.x as f32, point.y as f32)
    }
}

impl From<Vector2> for kurbo::Point {
    fn from(v: Vector2) -> Self {
        Self::new(v.x as f64, v.y as f64)
    }
}

/// Three component vector, used as the row type of [`Matrix3x3`](crate::Matrix3x3).
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3 {
    x: f32,
    y: f32,
    z: f32,
}

static_assertions::assert_eq_size!(Vector3, [f32; 3]);

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Builds a vector from exactly three components.
    pub fn from_components(components: &[f32]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Vector3", "components", 3, components.len())?;
        Ok(Self::new(components[0], components[1], components[2]))
    }

    /// Builds a vector from the native-endian bytes of three `f32`s.
    pub fn from_buffer(bytes: &[u8]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Vector3", "bytes", size_of::<Self>(), bytes.len())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    pub const fn x(self) -> f32 {
        self.x
    }

    pub const fn y(self) -> f32 {
        self.y
    }

    pub const fn z(self) -> f32 {
        self.z
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of bounds: {index}"),
        }
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl TryFrom<&[f32]> for Vector3 {
    type Error = TypeMismatch;

    fn try_from(components: &[f32]) -> Result<Self, Self::Error> {
        Self::from_components(components)
    }
}

#[cfg(test)]
mod tests {
    use super::{Vector2, Vector3};
    use crate::TypeMismatch;

    #[test]
    fn zero_and_default_agree() {
        assert_eq!(Vector2::zero(), Vector2::default());
        assert_eq!(Vector2::zero(), Vector2::new(0.0, 0.0));
        assert_eq!(Vector3::zero(), Vector3::default());
        assert_eq!(Vector3::zero(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn named_and_positional_access() {
        let v = Vector2::from_components(&[1.0, 2.0]).unwrap();
        assert_eq!((v.x(), v.y()), (1.0, 2.0));
        assert_eq!((v[0], v[1]), (1.0, 2.0));

        let v = Vector3::from_components(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!((v.x(), v.y(), v.z()), (1.0, 2.0, 3.0));
        assert_eq!((v[0], v[1], v[2]), (1.0, 2.0, 3.0));
    }

    #[test]
    fn copy_is_equal() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = v1;
        assert_eq!(v1, v2);
    }

    #[test]
    fn from_buffer_reads_f32s() {
        let bytes: Vec<u8> = bytemuck::cast_slice(&[1.5_f32, -2.0]).to_vec();
        assert_eq!(Vector2::from_buffer(&bytes), Ok(Vector2::new(1.5, -2.0)));

        let bytes: Vec<u8> = bytemuck::cast_slice(&[1.0_f32, 2.0, 3.0]).to_vec();
        assert_eq!(Vector3::from_buffer(&bytes), Ok(Vector3::new(1.0, 2.0, 3.0)));
        // Unaligned input is fine.
        let mut shifted = vec![0_u8];
        shifted.extend_from_slice(&bytes);
        assert_eq!(
            Vector3::from_buffer(&shifted[1..]),
            Ok(Vector3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn wrong_length_is_a_mismatch() {
        assert_eq!(
            Vector2::from_components(&[1.0, 2.0, 3.0]),
            Err(TypeMismatch {
                target: "Vector2",
                unit: "components",
                expected: 2,
                found: 3,
            })
        );
        assert!(Vector2::from_components(&[]).is_err());
        assert!(Vector3::from_components(&[1.0, 2.0]).is_err());
        assert!(Vector2::from_buffer(&[0; 4]).is_err());
        assert!(Vector3::from_buffer(&[0; 16]).is_err());
        assert!(Vector2::try_from(&[1.0_f32][..]).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_past_the_end_panics() {
        let _ = Vector2::zero()[2];
    }
}
