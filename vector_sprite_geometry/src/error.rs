// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// A vector or matrix was constructed from input of the wrong shape.
///
/// This is raised by every fallible factory in this crate, whether the input was a slice
/// of components, a slice of rows or a raw byte buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot build {target} from {found} {unit}, expected {expected}")]
pub struct TypeMismatch {
    /// Name of the type that was being constructed.
    pub target: &'static str,
    /// What was being counted: `"components"`, `"rows"` or `"bytes"`.
    pub unit: &'static str,
    pub expected: usize,
    pub found: usize,
}

impl TypeMismatch {
    pub(crate) fn check(
        target: &'static str,
        unit: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self {
                target,
                unit,
                expected,
                found,
            })
        }
    }
}
