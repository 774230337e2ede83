// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lets CI machines without an adapter opt out of the GPU half of the curve tests.
//!
//! `VECTOR_SPRITE_CI_GPU_SUPPORT=no` sets the `skip_gpu_tests` cfg, which marks every test
//! that needs a device as ignored. Locally those tests also return early when no device
//! can be created.

use std::env;

const GPU_SUPPORT_VAR: &str = "VECTOR_SPRITE_CI_GPU_SUPPORT";

fn main() {
    println!("cargo:rerun-if-env-changed={GPU_SUPPORT_VAR}");
    println!("cargo:rustc-check-cfg=cfg(skip_gpu_tests)");
    let Ok(value) = env::var(GPU_SUPPORT_VAR) else {
        return;
    };
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" => {}
        "no" | "n" => println!("cargo:rustc-cfg=skip_gpu_tests"),
        other => println!(
            "cargo:warning={GPU_SUPPORT_VAR} should be yes/y or no/n, got `{other}`; running GPU curve tests"
        ),
    }
}
