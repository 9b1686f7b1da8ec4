// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Fixed-base scalar multiplication: \\(kG\\) for the secp256k1 generator,
//! in constant time, using a precomputed comb table.
//!
//! The table has 64 windows of 16 entries; window \\(j\\), entry \\(i\\)
//! holds \\(i \cdot 16\^j G + 2\^j U\\), where \\(U\\) is a fixed curve
//! point whose discrete logarithm nobody knows (its x-coordinate is the
//! SHA-256 digest of the uncompressed generator encoding). The offsets keep
//! every entry finite and are cancelled by the accumulator's initial value.
//!
//! Every lookup scans all 16 entries of its window and selects with masks,
//! so the memory access pattern is independent of the scalar. An optional
//! blinding factor, refreshed through [`EcmultGenContext::randomize`],
//! shifts the scalar and the initial value in tandem so that even the
//! selected window values decorrelate from the secret across calls.

use alloc::boxed::Box;
use alloc::vec::Vec;

use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::affine::{AffinePoint, PointStorage};
use crate::backend::serial::u64::constants::{OFFSET_X, OFFSET_Y};
use crate::constants::GENERATOR;
use crate::hash::Sha256;
use crate::jacobian::JacobianPoint;
use crate::scalar::Scalar;

/// Number of 4-bit windows in a 256-bit scalar.
const WINDOWS: usize = 64;
/// Entries per window.
const WINDOW_SIZE: usize = 16;

/// Precomputed state for constant-time multiplication of the generator.
#[derive(Clone)]
pub(crate) struct EcmultGenContext {
    table: Box<[[PointStorage; WINDOW_SIZE]; WINDOWS]>,
    /// Scalar subtracted from every multiplicand before the scan.
    blind: Scalar,
    /// Accumulator seed: cancels the table offsets and the blind.
    initial: JacobianPoint,
    /// Accumulator seed with no blinding applied.
    base_initial: JacobianPoint,
}

impl EcmultGenContext {
    /// Build the comb table. This performs roughly a thousand point
    /// additions and a single field inversion.
    pub(crate) fn new() -> EcmultGenContext {
        let offset = AffinePoint::from_raw_coordinates(OFFSET_X, OFFSET_Y);

        let mut entries: Vec<JacobianPoint> = Vec::with_capacity(WINDOWS * WINDOW_SIZE);
        let mut gbase = JacobianPoint::from_affine(&GENERATOR); // 16^j * G
        let mut ubase = JacobianPoint::from_affine(&offset); // 2^j * U
        let mut offset_total = JacobianPoint::INFINITY;
        for _ in 0..WINDOWS {
            // Entry i of window j is ubase + i * gbase.
            entries.push(ubase);
            for _ in 1..WINDOW_SIZE {
                let prev = entries[entries.len() - 1];
                entries.push(prev.add_var(&gbase));
            }
            offset_total = offset_total.add_var(&ubase);
            for _ in 0..4 {
                gbase = gbase.double();
            }
            ubase = ubase.double();
        }

        let affine = JacobianPoint::batch_to_affine(&entries);
        let mut table = Box::new([[PointStorage::default(); WINDOW_SIZE]; WINDOWS]);
        for j in 0..WINDOWS {
            for i in 0..WINDOW_SIZE {
                table[j][i] = affine[j * WINDOW_SIZE + i].to_storage();
            }
        }

        let base_initial = offset_total.negate();
        EcmultGenContext {
            table,
            blind: Scalar::ZERO,
            initial: base_initial,
            base_initial,
        }
    }

    /// Compute \\(kG\\) in constant time.
    ///
    /// Scans least-significant window first; a zero scalar yields the
    /// identity (as a Jacobian point whose coordinates never say so until
    /// converted). No window is skipped whatever the scalar's bits.
    pub(crate) fn ecmult_gen(&self, k: &Scalar) -> JacobianPoint {
        let mut r = self.initial;
        let mut shifted = k - &self.blind;

        for j in 0..WINDOWS {
            let bits = shifted.bits(4 * j, 4) as u8;
            let mut entry = PointStorage::default();
            for (i, candidate) in self.table[j].iter().enumerate() {
                entry = PointStorage::conditional_select(&entry, candidate, bits.ct_eq(&(i as u8)));
            }
            r = r.add_affine(&AffinePoint::from_storage(&entry));
        }

        shifted.zeroize();
        r
    }

    /// Rerandomize the blinding state from a 32-byte seed.
    ///
    /// The blind scalar is derived by hashing the seed with the previous
    /// blind, chaining randomness forward across calls. Passing `None`
    /// removes blinding and restores the reproducible initial state.
    pub(crate) fn randomize(&mut self, seed: Option<&[u8; 32]>) {
        let seed = match seed {
            Some(seed) => seed,
            None => {
                self.blind = Scalar::ZERO;
                self.initial = self.base_initial;
                return;
            }
        };

        let mut h = Sha256::new();
        h.update(seed);
        h.update(&self.blind.to_bytes());
        let mut digest = h.finalize();
        let (b, _) = Scalar::from_bytes_reduced(&digest);
        digest.zeroize();

        // R = initial' + sum(window entries of (k - blind')) must equal kG:
        // with blind' = b, initial' = base_initial + bG.
        let gb = self.ecmult_gen(&b);
        self.initial = self.base_initial.add_affine(&gb.to_affine());
        self.blind = b;
    }
}

impl Zeroize for EcmultGenContext {
    fn zeroize(&mut self) {
        for window in self.table.iter_mut() {
            for entry in window.iter_mut() {
                entry.zeroize();
            }
        }
        self.blind.zeroize();
        self.initial.zeroize();
        self.base_initial.zeroize();
    }
}

impl Drop for EcmultGenContext {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gen_ctx() -> EcmultGenContext {
        EcmultGenContext::new()
    }

    fn reference_mul_g(k: u64) -> AffinePoint {
        let mut r = JacobianPoint::INFINITY;
        for i in (0..64).rev() {
            r = r.double();
            if (k >> i) & 1 == 1 {
                r = r.add_affine_var(&GENERATOR);
            }
        }
        r.to_affine()
    }

    #[test]
    fn small_multiples_match_reference() {
        let ctx = gen_ctx();
        for k in [1u64, 2, 3, 16, 17, 255, 65535, 0x0123_4567_89ab_cdef] {
            let got = ctx.ecmult_gen(&Scalar::from_u64(k)).to_affine();
            assert_eq!(got, reference_mul_g(k), "k = {k}");
        }
    }

    #[test]
    fn zero_scalar_gives_identity() {
        let ctx = gen_ctx();
        assert!(bool::from(
            ctx.ecmult_gen(&Scalar::ZERO).to_affine().is_infinity()
        ));
    }

    #[test]
    fn order_minus_one_is_negated_generator() {
        let ctx = gen_ctx();
        let n_minus_1 = Scalar::ONE.negate();
        let got = ctx.ecmult_gen(&n_minus_1).to_affine();
        assert_eq!(got, GENERATOR.negate());
    }

    #[test]
    fn randomize_preserves_results() {
        let mut ctx = gen_ctx();
        let k = Scalar::from_u64(0xfeed_face_cafe_beef);
        let before = ctx.ecmult_gen(&k).to_affine();

        ctx.randomize(Some(&[7u8; 32]));
        assert_eq!(ctx.ecmult_gen(&k).to_affine(), before);

        // Chained rerandomization keeps working.
        ctx.randomize(Some(&[42u8; 32]));
        assert_eq!(ctx.ecmult_gen(&k).to_affine(), before);

        // And removal restores the unblinded state.
        ctx.randomize(None);
        assert_eq!(ctx.ecmult_gen(&k).to_affine(), before);
        assert!(bool::from(ctx.blind.is_zero()));
    }
}
