// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Pluggable implementations for different architectures.
//!
//! The backend code is the low-level arithmetic over field elements and
//! scalars; wrapper types in the crate root select a backend and expose a
//! uniform API on top of it. Only a serial 64-bit backend is provided.

pub mod serial;
