// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Serial (non-vectorized) arithmetic backends.

pub mod u64;
