// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{256} - 2\^{32} - 977\\).
//!
//! The `p256k1::field` module provides a type alias `p256k1::field::FieldElement`
//! to a field element type defined in the `backend` module, either
//! `FieldElement52` or a future alternative.
//!
//! Field operations defined in terms of other field operations, such as
//! inversion and square roots, are defined here; the limb arithmetic and the
//! magnitude bookkeeping live in the backend.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::backend::serial::u64::field::FieldElement52;

/// A `FieldElement` represents an element of the field underlying secp256k1.
pub type FieldElement = FieldElement52;

impl FieldElement {
    /// Raise this field element to the power \\(2\^k\\) by successive
    /// squarings.
    fn pow2k(&self, k: u32) -> FieldElement {
        debug_assert!(k > 0);
        let mut z = self.square();
        for _ in 1..k {
            z = z.square();
        }
        z
    }

    /// The shared prefix of the inversion and square-root addition chains:
    /// returns \\((a\^{2\^{223}-1}, a\^{2\^{22}-1}, a\^3, a\)\\)-adjacent
    /// building blocks `(x223, x22, x3, x2)`.
    fn sparse_pow_prefix(&self) -> (FieldElement, FieldElement, FieldElement, FieldElement) {
        // The binary expansions of p - 2 and (p + 1)/4 consist almost
        // entirely of ones, so both chains are built from blocks of the form
        // a^(2^k - 1).
        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);
        (x223, x22, x3, x2)
    }

    /// Compute the multiplicative inverse of this field element.
    ///
    /// Uses the exponentiation \\(a\^{p-2}\\); the inverse of zero is zero.
    /// Constant time in the value of `self`.
    pub fn invert(&self) -> FieldElement {
        let (x223, x22, _, x2) = self.sparse_pow_prefix();
        let t = x223.pow2k(23).mul(&x22);
        let t = t.pow2k(5).mul(self);
        let t = t.pow2k(3).mul(&x2);
        t.pow2k(2).mul(self)
    }

    /// Variable-time inverse.
    ///
    /// The exponentiation chain itself has a fixed shape, so this is an
    /// alias for [`FieldElement::invert`]; it exists so call sites document
    /// whether they are allowed to be variable time.
    pub fn invert_var(&self) -> FieldElement {
        self.invert()
    }

    /// Attempt to compute the square root of this field element.
    ///
    /// Since \\(p \equiv 3 \pmod 4\\), the candidate root is
    /// \\(a\^{(p+1)/4}\\); squaring it back decides whether `self` is a
    /// quadratic residue. Of the two roots, this exponent yields the even
    /// or odd one unpredictably; callers adjust parity themselves.
    ///
    /// Returns the candidate root together with a `Choice` that is set iff
    /// the root is valid.
    pub fn sqrt(&self) -> (FieldElement, Choice) {
        let (x223, x22, _, x2) = self.sparse_pow_prefix();
        let t = x223.pow2k(23).mul(&x22);
        let t = t.pow2k(6).mul(&x2);
        let root = t.pow2k(2);
        let ok = root.square().ct_eq(self);
        (root.normalize(), ok)
    }

    /// Conditionally negate this field element, producing a normalized
    /// result either way.
    ///
    /// The input must be normalized so the negation's magnitude bound holds.
    pub fn conditional_negate_normalized(&self, flag: Choice) -> FieldElement {
        debug_assert!(self.is_normalized());
        FieldElement::conditional_select(self, &self.negate(1).normalize(), flag)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fe_hex(hex32: &str) -> FieldElement {
        let mut b = [0u8; 32];
        b.copy_from_slice(&hex::decode(hex32).unwrap());
        FieldElement::from_bytes_mod(&b)
    }

    #[test]
    fn invert_times_self_is_one() {
        let cases = [
            "0000000000000000000000000000000000000000000000000000000000000002",
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2e",
        ];
        for c in cases {
            let a = fe_hex(c);
            let prod = a.invert().mul(&a).normalize();
            assert_eq!(prod.to_bytes(), FieldElement::ONE.to_bytes());
        }
    }

    #[test]
    fn invert_of_zero_is_zero() {
        assert!(bool::from(FieldElement::ZERO.invert().normalize().is_zero()));
    }

    #[test]
    fn invert_var_matches_invert() {
        let a = fe_hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");
        assert_eq!(
            a.invert().normalize().to_bytes(),
            a.invert_var().normalize().to_bytes()
        );
    }

    #[test]
    fn sqrt_of_square_round_trips() {
        let a = fe_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        let sq = a.square();
        let (root, ok) = sqrt_of(&sq);
        assert!(bool::from(ok));
        // The root is either a or -a.
        let neg = a.normalize().negate(1).normalize();
        let a = a.normalize();
        assert!(root.to_bytes() == a.to_bytes() || root.to_bytes() == neg.to_bytes());
    }

    fn sqrt_of(x: &FieldElement) -> (FieldElement, subtle::Choice) {
        x.sqrt()
    }

    #[test]
    fn sqrt_of_non_residue_fails() {
        // x^3 + 7 for x = 5 is not a quadratic residue, so 5 is not a valid
        // x-coordinate on the curve.
        let x = FieldElement::from_u64(5);
        let candidate = x.square().mul(&x).add_int(7);
        let (_, ok) = candidate.sqrt();
        assert!(!bool::from(ok));
    }
}
