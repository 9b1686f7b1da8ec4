// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Streaming SHA-256 and the BIP-340 tagged-hash variants.
//!
//! The compression function comes from the `sha2` crate; the streaming
//! state lives here because tagged hashing needs to start from a saved
//! midstate, which the one-shot digest API cannot do.
//!
//! A BIP-340 tagged hash of `data` is `SHA256(SHA256(tag) || SHA256(tag) ||
//! data)`. Since `SHA256(tag) || SHA256(tag)` is exactly one compression
//! block, each fixed tag collapses to a precomputed eight-word midstate at
//! byte count 64. The three tags the signing scheme uses are hard-coded
//! below and checked against the generic path in tests.

use sha2::compress256;
use sha2::digest::generic_array::GenericArray;
use zeroize::Zeroize;

/// SHA-256 initial state.
const IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
    0x5be0cd19,
];

/// Midstate for the tag `BIP0340/aux`.
const MIDSTATE_AUX: [u32; 8] = [
    0xd413ccce, 0x24b7aad3, 0x3174be05, 0xfb190c37, 0x7ab31682, 0xf315944e, 0xbf55c3a1,
    0xe5eb75f6,
];

/// Midstate for the tag `BIP0340/nonce`.
const MIDSTATE_NONCE: [u32; 8] = [
    0xd413ccce, 0xa7ea998c, 0xc27c7440, 0xf1900a7c, 0x14c13e34, 0x69b8f5bf, 0x261e7bb9,
    0x19254e68,
];

/// Midstate for the tag `BIP0340/challenge`.
const MIDSTATE_CHALLENGE: [u32; 8] = [
    0xd413ccce, 0x5de28aeb, 0x03237749, 0xd639a54b, 0x36046945, 0x78b4c1a2, 0xfe020e2c,
    0x0274a3a2,
];

/// The tagged-hash domains used by BIP-340.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Tag {
    /// `BIP0340/aux`: masks auxiliary randomness into the secret key.
    Aux,
    /// `BIP0340/nonce`: derives the signing nonce.
    Nonce,
    /// `BIP0340/challenge`: derives the Fiat-Shamir challenge.
    Challenge,
}

/// A streaming SHA-256 engine.
#[derive(Clone)]
pub(crate) struct Sha256 {
    state: [u32; 8],
    buffer: [u8; 64],
    /// Bytes absorbed so far, including those still sitting in `buffer`.
    total: u64,
}

impl Sha256 {
    /// Start a hash from the standard initial state.
    pub fn new() -> Sha256 {
        Sha256::from_midstate(IV, 0)
    }

    /// Start a hash from a saved midstate at a given absorbed byte count.
    ///
    /// The byte count must be a multiple of the 64-byte block size.
    pub fn from_midstate(state: [u32; 8], bytes_consumed: u64) -> Sha256 {
        debug_assert!(bytes_consumed % 64 == 0);
        Sha256 {
            state,
            buffer: [0u8; 64],
            total: bytes_consumed,
        }
    }

    /// Start a tagged hash, preloaded with `SHA256(tag) || SHA256(tag)`.
    pub fn tagged(tag: Tag) -> Sha256 {
        let midstate = match tag {
            Tag::Aux => MIDSTATE_AUX,
            Tag::Nonce => MIDSTATE_NONCE,
            Tag::Challenge => MIDSTATE_CHALLENGE,
        };
        Sha256::from_midstate(midstate, 64)
    }

    /// Start a tagged hash for an arbitrary tag, computing the midstate on
    /// the fly.
    pub fn tagged_init(tag: &[u8]) -> Sha256 {
        let mut th = Sha256::new();
        th.update(tag);
        let t = th.finalize();
        let mut h = Sha256::new();
        h.update(&t);
        h.update(&t);
        debug_assert!(h.total == 64);
        h
    }

    /// Absorb `data`.
    pub fn update(&mut self, data: &[u8]) {
        let mut filled = (self.total % 64) as usize;
        self.total += data.len() as u64;

        let mut rest = data;
        if filled > 0 {
            let take = rest.len().min(64 - filled);
            self.buffer[filled..filled + take].copy_from_slice(&rest[..take]);
            filled += take;
            rest = &rest[take..];
            if filled == 64 {
                let block = *GenericArray::from_slice(&self.buffer);
                compress256(&mut self.state, &[block]);
            } else {
                return;
            }
        }

        let mut chunks = rest.chunks_exact(64);
        for chunk in &mut chunks {
            let block = *GenericArray::from_slice(chunk);
            compress256(&mut self.state, &[block]);
        }

        let tail = chunks.remainder();
        self.buffer[..tail.len()].copy_from_slice(tail);
    }

    /// Pad, compress the final block(s), and return the digest.
    pub fn finalize(mut self) -> [u8; 32] {
        let filled = (self.total % 64) as usize;
        let bit_len = self.total * 8;

        let mut pad = [0u8; 128];
        pad[..filled].copy_from_slice(&self.buffer[..filled]);
        pad[filled] = 0x80;
        let pad_len = if filled < 56 { 64 } else { 128 };
        pad[pad_len - 8..pad_len].copy_from_slice(&bit_len.to_be_bytes());

        for chunk in pad[..pad_len].chunks_exact(64) {
            let block = *GenericArray::from_slice(chunk);
            compress256(&mut self.state, &[block]);
        }

        let mut out = [0u8; 32];
        for (i, word) in self.state.iter().enumerate() {
            out[4 * i..4 * i + 4].copy_from_slice(&word.to_be_bytes());
        }
        self.state.zeroize();
        self.buffer.zeroize();
        out
    }
}
