// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Errors which may occur when parsing keys or producing signatures.

use core::fmt;

/// Internal errors. Most application-level errors come from input
/// validation; the cryptographic failure modes are rare by construction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A secret key was zero, not canonical, or otherwise out of range.
    InvalidSecretKey,
    /// A public key encoding had a bad tag or length, encoded a coordinate
    /// at or above the field size, or named a point off the curve.
    InvalidPublicKey,
    /// A keypair encoding was inconsistent.
    InvalidKeypair,
    /// A signature encoding was malformed.
    InvalidSignature,
    /// Nonce derivation produced the zero scalar.
    NonceGeneration,
    /// The operation requires a signing-capable context, but the supplied
    /// context was built for verification only.
    SigningContextRequired,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSecretKey => write!(f, "invalid secret key"),
            Error::InvalidPublicKey => write!(f, "invalid public key"),
            Error::InvalidKeypair => write!(f, "invalid keypair encoding"),
            Error::InvalidSignature => write!(f, "invalid signature encoding"),
            Error::NonceGeneration => write!(f, "nonce derivation produced zero"),
            Error::SigningContextRequired => {
                write!(f, "operation requires a signing-capable context")
            }
        }
    }
}

impl core::error::Error for Error {}
