// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::mem::size_of;
use core::ops::Index;

use bytemuck::{Pod, Zeroable};

use crate::{TypeMismatch, Vector3};

/// 3x3 matrix stored as three row vectors.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix3x3 {
    rows: [Vector3; 3],
}

static_assertions::assert_eq_size!(Matrix3x3, [f32; 9]);

impl Matrix3x3 {
    pub const IDENTITY: Self = Self::from_rows([
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ]);

    pub const ZERO: Self = Self::from_rows([Vector3::ZERO; 3]);

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn zero() -> Self {
        Self::ZERO
    }

    pub const fn from_rows(rows: [Vector3; 3]) -> Self {
        Self { rows }
    }

    /// Builds a matrix from exactly nine components in row-major order.
    pub fn from_components(components: &[f32]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Matrix3x3", "components", 9, components.len())?;
        Ok(Self::from_rows([
            Vector3::from_components(&components[0..3])?,
            Vector3::from_components(&components[3..6])?,
            Vector3::from_components(&components[6..9])?,
        ]))
    }

    /// Builds a matrix from exactly three row vectors.
    pub fn from_row_slice(rows: &[Vector3]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Matrix3x3", "rows", 3, rows.len())?;
        Ok(Self::from_rows([rows[0], rows[1], rows[2]]))
    }

    /// Builds a matrix from the native-endian bytes of nine row-major `f32`s.
    pub fn from_buffer(bytes: &[u8]) -> Result<Self, TypeMismatch> {
        TypeMismatch::check("Matrix3x3", "bytes", size_of::<Self>(), bytes.len())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    pub const fn row(&self, index: usize) -> Vector3 {
        self.rows[index]
    }

    pub const fn rows(&self) -> [Vector3; 3] {
        self.rows
    }

    /// Returns the matrix with rows and columns swapped.
    pub fn transpose(&self) -> Self {
        let [r0, r1, r2] = self.rows;
        Self::from_rows([
            Vector3::new(r0.x(), r1.x(), r2.x()),
            Vector3::new(r0.y(), r1.y(), r2.y()),
            Vector3::new(r0.z(), r1.z(), r2.z()),
        ])
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Matrix3x3 {
    type Output = Vector3;

    fn index(&self, index: usize) -> &Vector3 {
        &self.rows[index]
    }
}

impl TryFrom<&[f32]> for Matrix3x3 {
    type Error = TypeMismatch;

    fn try_from(components: &[f32]) -> Result<Self, Self::Error> {
        Self::from_components(components)
    }
}

impl TryFrom<&[Vector3]> for Matrix3x3 {
    type Error = TypeMismatch;

    fn try_from(rows: &[Vector3]) -> Result<Self, Self::Error> {
        Self::from_row_slice(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::Matrix3x3;
    use crate::Vector3;

    const SEQUENCE: [f32; 9] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

    #[test]
    fn identity() {
        let m = Matrix3x3::identity();
        assert_eq!(
            m,
            Matrix3x3::from_components(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap()
        );
        assert_eq!(m, Matrix3x3::default());
    }

    #[test]
    fn zero() {
        assert_eq!(
            Matrix3x3::zero(),
            Matrix3x3::from_components(&[0.0; 9]).unwrap()
        );
    }

    #[test]
    fn construction_shapes_agree() {
        let from_flat = Matrix3x3::from_components(&SEQUENCE).unwrap();
        let from_rows = Matrix3x3::from_row_slice(&[
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        ])
        .unwrap();
        let from_buffer = Matrix3x3::from_buffer(bytemuck::cast_slice(&SEQUENCE)).unwrap();
        assert_eq!(from_flat, from_rows);
        assert_eq!(from_flat, from_buffer);
        let copy = from_flat;
        assert_eq!(copy, from_flat);
    }

    #[test]
    fn row_access() {
        let m = Matrix3x3::from_components(&SEQUENCE).unwrap();
        assert_eq!(m[0], Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m[1], Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(m.row(2), Vector3::new(7.0, 8.0, 9.0));
        assert_eq!(m[2][1], 8.0);
    }

    #[test]
    fn transpose() {
        let m = Matrix3x3::from_components(&SEQUENCE).unwrap();
        let t = m.transpose();
        assert_eq!(
            t,
            Matrix3x3::from_components(&[1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]).unwrap()
        );
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(t[i][j], m[j][i]);
            }
        }
        assert_eq!(t.transpose(), m);
        // The source is untouched.
        assert_eq!(m, Matrix3x3::from_components(&SEQUENCE).unwrap());
    }

    #[test]
    fn invalid_shapes() {
        assert!(Matrix3x3::from_components(&[]).is_err());
        assert!(Matrix3x3::from_components(&[1.0, 2.0, 3.0]).is_err());
        assert!(Matrix3x3::from_components(&[0.0; 10]).is_err());
        assert!(Matrix3x3::from_row_slice(&[Vector3::new(1.0, 2.0, 3.0)]).is_err());
        assert!(Matrix3x3::from_buffer(&[0; 12]).is_err());
    }
}
