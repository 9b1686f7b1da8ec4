// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! A pure-Rust implementation of the secp256k1 group, BIP-340 Schnorr
//! signatures, and x-only Diffie-Hellman.
//!
//! # Overview
//!
//! The crate is organized the way the arithmetic composes:
//!
//! * field elements modulo \\(p = 2\^{256} - 2\^{32} - 977\\) with explicit
//!   magnitude tracking ([`FieldElement`]);
//! * scalars modulo the group order ([`Scalar`]);
//! * curve points in affine and Jacobian coordinates ([`AffinePoint`],
//!   [`JacobianPoint`]) with complete constant-time addition for secret
//!   paths and faster variable-time paths for public data;
//! * precomputed-table scalar multiplication owned by a [`Context`]:
//!   a constant-time fixed-base comb for \\(kG\\) and an interleaved wNAF
//!   linear combination for verification;
//! * BIP-340 signing and verification ([`sign`], [`verify`]) and x-only
//!   ECDH ([`shared_secret`]).
//!
//! # Example
//!
//! ```
//! use p256k1::{sign, verify, Context, ContextFlags, Keypair};
//!
//! let ctx = Context::new(ContextFlags::None);
//! let keypair = Keypair::from_seckey_bytes(&ctx, &[0x17; 32]).unwrap();
//! let (pubkey, _parity) = keypair.xonly_public_key();
//!
//! let msg = *b"cryptography is not broken, only";
//! let sig = sign(&ctx, &keypair, &msg, Some(&[0x42; 32])).unwrap();
//! assert!(verify(&ctx, &sig, &msg, &pubkey));
//! ```
//!
//! # Constant-time discipline
//!
//! Operations that touch secrets (signing, key derivation, ECDH, the
//! fixed-base comb lookups) are branch-free and scan their tables with
//! masked selection; failure conditions that depend on secret data are
//! folded into a mask applied to the output buffer. Verification and
//! parsing of public data use the variable-time paths.
//!
//! A built [`Context`] is read-only and may be shared freely across
//! threads; rerandomizing it requires exclusive access.

#![no_std]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

mod affine;
mod backend;
pub mod constants;
mod context;
mod ecdh;
mod ecmult;
mod ecmult_gen;
mod errors;
mod field;
mod hash;
mod jacobian;
mod keypair;
mod scalar;
mod schnorr;
mod window;

pub use crate::affine::{AffinePoint, PointStorage};
#[cfg(feature = "std")]
pub use crate::context::verification_context;
pub use crate::context::{Context, ContextFlags};
pub use crate::ecdh::shared_secret;
pub use crate::errors::Error;
pub use crate::field::FieldElement;
pub use crate::jacobian::JacobianPoint;
pub use crate::keypair::Keypair;
pub use crate::scalar::Scalar;
pub use crate::schnorr::{sign, verify, Signature, XOnlyPublicKey};
