// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Variable-base scalar multiplication.
//!
//! Two strategies live here. Verification uses a variable-time interleaved
//! wNAF scan computing the linear combination \\(n_a P + n_g G\\), with odd
//! multiples of \\(P\\) built per call and odd multiples of \\(G\\) served
//! from a precomputed table. Secret scalars (ECDH) instead use a
//! constant-time signed radix-16 ladder whose table lookups scan every
//! entry.

use alloc::boxed::Box;

use crate::affine::{AffinePoint, PointStorage};
use crate::constants::GENERATOR;
use crate::jacobian::JacobianPoint;
use crate::scalar::Scalar;
use crate::window::LookupTable;

/// Window size for the per-call odd-multiples table of `P`.
const WINDOW_A: usize = 5;
/// Window size for the precomputed odd-multiples table of `G`.
const WINDOW_G: usize = 8;
/// Number of entries in the `P` table: odd multiples up to `15P`.
const TABLE_SIZE_A: usize = 1 << (WINDOW_A - 2);
/// Number of entries in the `G` table: odd multiples up to `127G`.
const TABLE_SIZE_G: usize = 1 << (WINDOW_G - 2);

/// Precomputed state for variable-base multiplication: the odd multiples
/// \\(G, 3G, 5G, \ldots, 127G\\) in storage form.
#[derive(Clone)]
pub(crate) struct EcmultContext {
    pre_g: Box<[PointStorage; TABLE_SIZE_G]>,
}

/// Compute the odd multiples \\(P, 3P, \ldots, (2N-1)P\\) of a finite point,
/// normalized to affine with a single inversion. Variable time.
fn odd_multiples_var<const N: usize>(p: &JacobianPoint) -> [AffinePoint; N] {
    debug_assert!(!bool::from(p.is_infinity()));
    let d = p.double();
    let mut jac = [*p; N];
    for i in 1..N {
        jac[i] = jac[i - 1].add_var(&d);
    }
    let affine = JacobianPoint::batch_to_affine(&jac);
    let mut out = [AffinePoint::IDENTITY; N];
    out.copy_from_slice(&affine);
    out
}

/// Convert a scalar to its width-`w` non-adjacent form.
///
/// Returns one signed odd digit per bit position (most positions zero) and
/// the number of meaningful positions. Digits satisfy
/// \\(|d| < 2\^{w-1}\\) and reconstruct the scalar as
/// \\(\sum_i d_i 2\^i \pmod n\\). Variable time.
fn wnaf_var(s: &Scalar, w: usize) -> ([i32; 256], usize) {
    debug_assert!(w >= 2 && w <= 31);
    let mut wnaf = [0i32; 256];
    let mut sc = *s;
    let mut sign = 1i32;

    // Keep the working value below 2^255 so every window fits.
    if sc.bits(255, 1) == 1 {
        sc = sc.negate();
        sign = -1;
    }

    let mut bit = 0usize;
    let mut carry = 0u32;
    let mut len = 0usize;
    while bit < 256 {
        if sc.bits(bit, 1) == carry {
            bit += 1;
            continue;
        }

        let now = w.min(256 - bit);
        let mut word = sc.bits(bit, now) as i32 + carry as i32;
        carry = ((word >> (w - 1)) & 1) as u32;
        word -= (carry as i32) << w;

        wnaf[bit] = sign * word;
        len = bit + 1;
        bit += now;
    }
    debug_assert!(carry == 0);
    (wnaf, len)
}

/// Fetch \\(nP\\) from a table of odd multiples of \\(P\\), for odd `n`.
/// Variable time.
fn table_get_var(table: &[AffinePoint], n: i32) -> AffinePoint {
    debug_assert!(n & 1 == 1);
    if n > 0 {
        table[(n - 1) as usize / 2]
    } else {
        table[(-n - 1) as usize / 2].negate()
    }
}

impl EcmultContext {
    /// Build the generator table.
    pub(crate) fn new() -> EcmultContext {
        let g = JacobianPoint::from_affine(&GENERATOR);
        let multiples: [AffinePoint; TABLE_SIZE_G] = odd_multiples_var(&g);
        let mut pre_g = Box::new([PointStorage::default(); TABLE_SIZE_G]);
        for (slot, point) in pre_g.iter_mut().zip(multiples.iter()) {
            *slot = point.to_storage();
        }
        EcmultContext { pre_g }
    }

    /// Compute \\(n_a A + n_g G\\) in variable time.
    ///
    /// Either contribution may vanish (zero scalar or identity point); if
    /// both do, the result is the identity.
    pub(crate) fn lincomb_var(
        &self,
        a: &AffinePoint,
        na: &Scalar,
        ng: &Scalar,
    ) -> JacobianPoint {
        let mut wnaf_a = [0i32; 256];
        let mut bits_a = 0usize;
        let mut pre_a = [AffinePoint::IDENTITY; TABLE_SIZE_A];
        let have_a = !bool::from(a.is_infinity() | na.is_zero());
        if have_a {
            pre_a = odd_multiples_var(&JacobianPoint::from_affine(a));
            let (w, l) = wnaf_var(na, WINDOW_A);
            wnaf_a = w;
            bits_a = l;
        }

        let (wnaf_g, bits_g) = wnaf_var(ng, WINDOW_G);

        let mut r = JacobianPoint::INFINITY;
        for i in (0..bits_a.max(bits_g)).rev() {
            r = r.double();

            let n = wnaf_a[i];
            if i < bits_a && n != 0 {
                r = r.add_affine_var(&table_get_var(&pre_a, n));
            }
            let n = if i < bits_g { wnaf_g[i] } else { 0 };
            if n != 0 {
                let idx = if n > 0 { (n - 1) / 2 } else { (-n - 1) / 2 };
                let entry = AffinePoint::from_storage(&self.pre_g[idx as usize]);
                let entry = if n > 0 { entry } else { entry.negate() };
                r = r.add_affine_var(&entry);
            }
        }
        r
    }
}

/// Compute \\(kP\\) in constant time with respect to `k`.
///
/// The scalar is rewritten in signed radix 16 (65 digits in \\([-8, 8]\\));
/// each window costs four doublings and one masked table lookup, and no step
/// short-circuits on the scalar's bits. An identity input point yields the
/// identity.
pub(crate) fn ecmult_const(p: &AffinePoint, k: &Scalar) -> JacobianPoint {
    if bool::from(p.is_infinity()) {
        // The point is public; only the scalar is secret.
        return JacobianPoint::INFINITY;
    }

    let table = LookupTable::from(p);
    let digits = k.as_radix_16();

    let mut r = JacobianPoint::from_affine(&table.select(digits[64]));
    for i in (0..64).rev() {
        r = r.double().double().double().double();
        r = r.add_affine(&table.select(digits[i]));
    }
    r
}
