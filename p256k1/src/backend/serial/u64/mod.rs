// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! The `u64` backend uses `u64`s with 128-bit products.

pub mod constants;
pub mod field;
pub mod scalar;
