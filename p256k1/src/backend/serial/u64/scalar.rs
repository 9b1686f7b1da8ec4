// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Arithmetic modulo the secp256k1 group order
//! \\(n = \mathtt{0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141}\\),
//! using four 64-bit limbs in little-endian order.
//!
//! A `Scalar64` is always reduced: every constructor either rejects or folds
//! inputs at or above \\(n\\). Multiplication accumulates the 512-bit
//! schoolbook product through a 160-bit running window and reduces it in
//! three passes (512 → 385 → 258 → 256 bits) using the negated modulus.

use core::fmt::Debug;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

/// The group order `n`, little-endian.
pub(crate) const MODULUS: [u64; 4] = [
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// Limbs of \\(2\^{256} - n\\).
const NEG_MODULUS: [u64; 4] = [!MODULUS[0] + 1, !MODULUS[1], !MODULUS[2], !MODULUS[3]];

/// Limbs of \\(\lfloor n/2 \rfloor\\).
const FRAC_MODULUS_2: [u64; 4] = [
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
];

/// Add with carry-in, returning the sum limb and carry-out.
#[inline(always)]
fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// Subtract with borrow-in, returning the difference limb and borrow-out
/// (0 or `u64::MAX`).
#[inline(always)]
fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (t as u64, (t >> 64) as u64)
}

#[inline(always)]
fn sbb_array(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], u64) {
    let (r0, borrow) = sbb(lhs[0], rhs[0], 0);
    let (r1, borrow) = sbb(lhs[1], rhs[1], borrow);
    let (r2, borrow) = sbb(lhs[2], rhs[2], borrow);
    let (r3, borrow) = sbb(lhs[3], rhs[3], borrow);
    ([r0, r1, r2, r3], borrow)
}

/// Subtract, reporting underflow as a `Choice`.
#[inline(always)]
fn sbb_array_with_underflow(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], Choice) {
    let (res, borrow) = sbb_array(lhs, rhs);
    (res, Choice::from((borrow >> 63) as u8))
}

#[inline(always)]
fn adc_array(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], u64) {
    let (r0, carry) = adc(lhs[0], rhs[0], 0);
    let (r1, carry) = adc(lhs[1], rhs[1], carry);
    let (r2, carry) = adc(lhs[2], rhs[2], carry);
    let (r3, carry) = adc(lhs[3], rhs[3], carry);
    ([r0, r1, r2, r3], carry)
}

#[inline(always)]
fn adc_array_with_overflow(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], Choice) {
    let (res, carry) = adc_array(lhs, rhs);
    (res, Choice::from(carry as u8))
}

#[inline(always)]
fn select(a: &[u64; 4], b: &[u64; 4], choice: Choice) -> [u64; 4] {
    [
        u64::conditional_select(&a[0], &b[0], choice),
        u64::conditional_select(&a[1], &b[1], choice),
        u64::conditional_select(&a[2], &b[2], choice),
        u64::conditional_select(&a[3], &b[3], choice),
    ]
}

/// Branch-free `a < b` as a 0/1 limb.
#[inline(always)]
fn ct_less(a: u64, b: u64) -> u64 {
    (a < b) as u64
}

/// Add `a` to the accumulator `(c0, c1, c2)`. `c2` must not overflow.
#[inline(always)]
fn sumadd(a: u64, c0: u64, c1: u64, c2: u64) -> (u64, u64, u64) {
    let new_c0 = c0.wrapping_add(a);
    let over = ct_less(new_c0, a);
    let new_c1 = c1.wrapping_add(over);
    let new_c2 = c2 + ct_less(new_c1, over);
    (new_c0, new_c1, new_c2)
}

/// Add `a` to the truncated accumulator `(c0, c1)`. `c1` must not overflow.
#[inline(always)]
fn sumadd_fast(a: u64, c0: u64, c1: u64) -> (u64, u64) {
    let new_c0 = c0.wrapping_add(a);
    let new_c1 = c1 + ct_less(new_c0, a);
    debug_assert!((new_c1 != 0) | (new_c0 >= a));
    (new_c0, new_c1)
}

/// Add `a * b` to the accumulator `(c0, c1, c2)`. `c2` must not overflow.
#[inline(always)]
fn muladd(a: u64, b: u64, c0: u64, c1: u64, c2: u64) -> (u64, u64, u64) {
    let t = (a as u128) * (b as u128);
    let th = (t >> 64) as u64;
    let tl = t as u64;

    let new_c0 = c0.wrapping_add(tl);
    let new_th = th + ct_less(new_c0, tl);
    let new_c1 = c1.wrapping_add(new_th);
    let new_c2 = c2 + ct_less(new_c1, new_th);
    debug_assert!((new_c1 >= new_th) || (new_c2 != 0));
    (new_c0, new_c1, new_c2)
}

/// Add `a * b` to the truncated accumulator `(c0, c1)`. `c1` must not
/// overflow.
#[inline(always)]
fn muladd_fast(a: u64, b: u64, c0: u64, c1: u64) -> (u64, u64) {
    let t = (a as u128) * (b as u128);
    let th = (t >> 64) as u64;
    let tl = t as u64;

    let new_c0 = c0.wrapping_add(tl);
    let new_th = th + ct_less(new_c0, tl);
    let new_c1 = c1 + new_th;
    debug_assert!(new_c1 >= new_th);
    (new_c0, new_c1)
}

/// A `Scalar64` holds an element of \\(\mathbb Z / n \mathbb Z\\), the
/// integers modulo the secp256k1 group order, as four 64-bit limbs.
#[derive(Copy, Clone, Debug, Default)]
pub struct Scalar64(pub(crate) [u64; 4]);

impl ConditionallySelectable for Scalar64 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Scalar64(select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar64 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl Zeroize for Scalar64 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Scalar64 {
    /// The scalar \\(0\\).
    pub const ZERO: Scalar64 = Scalar64([0, 0, 0, 0]);

    /// The scalar \\(1\\).
    pub const ONE: Scalar64 = Scalar64([1, 0, 0, 0]);

    /// Construct a scalar from a small integer.
    pub const fn from_u64(v: u64) -> Scalar64 {
        Scalar64([v, 0, 0, 0])
    }

    fn limbs_from_bytes(bytes: &[u8; 32]) -> [u64; 4] {
        let load = |b: &[u8]| -> u64 {
            let mut w = [0u8; 8];
            w.copy_from_slice(b);
            u64::from_be_bytes(w)
        };
        [
            load(&bytes[24..32]),
            load(&bytes[16..24]),
            load(&bytes[8..16]),
            load(&bytes[0..8]),
        ]
    }

    /// Attempt to parse 32 big-endian bytes as a canonical scalar.
    ///
    /// Fails if the value is not below the group order.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Scalar64> {
        let w = Self::limbs_from_bytes(bytes);
        let (_, underflow) = sbb_array_with_underflow(&w, &MODULUS);
        CtOption::new(Scalar64(w), underflow)
    }

    /// Parse 32 big-endian bytes, reducing modulo the group order.
    ///
    /// Also reports whether the input overflowed (was not canonical).
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> (Scalar64, Choice) {
        let w = Self::limbs_from_bytes(bytes);
        let (reduced, underflow) = sbb_array_with_underflow(&w, &MODULUS);
        (Scalar64(select(&w, &reduced, !underflow)), !underflow)
    }

    /// Parse 32 big-endian bytes as a secret key scalar.
    ///
    /// Fails unless the value is canonical and nonzero.
    pub fn from_seckey_bytes(bytes: &[u8; 32]) -> CtOption<Scalar64> {
        let w = Self::limbs_from_bytes(bytes);
        let (_, underflow) = sbb_array_with_underflow(&w, &MODULUS);
        let nonzero = !(w[0] | w[1] | w[2] | w[3]).ct_eq(&0);
        CtOption::new(Scalar64(w), underflow & nonzero)
    }

    /// Serialize to 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&self.0[3].to_be_bytes());
        out[8..16].copy_from_slice(&self.0[2].to_be_bytes());
        out[16..24].copy_from_slice(&self.0[1].to_be_bytes());
        out[24..32].copy_from_slice(&self.0[0].to_be_bytes());
        out
    }

    /// Test whether this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        (self.0[0] | self.0[1] | self.0[2] | self.0[3]).ct_eq(&0)
    }

    /// Test whether the low bit is clear.
    pub fn is_even(&self) -> Choice {
        !Choice::from((self.0[0] & 1) as u8)
    }

    /// Test whether this scalar exceeds \\(n/2\\).
    pub fn is_high(&self) -> Choice {
        let (_, underflow) = sbb_array_with_underflow(&FRAC_MODULUS_2, &self.0);
        underflow
    }

    /// Compute \\(-a \bmod n\\).
    pub fn negate(&self) -> Scalar64 {
        let (res, _) = sbb_array(&MODULUS, &self.0);
        Scalar64::conditional_select(&Scalar64(res), &Scalar64::ZERO, self.is_zero())
    }

    /// Compute \\(a + b \bmod n\\).
    pub fn add(&self, rhs: &Scalar64) -> Scalar64 {
        let (sum, overflow) = adc_array_with_overflow(&self.0, &rhs.0);
        let (reduced, underflow) = sbb_array_with_underflow(&sum, &MODULUS);
        Scalar64(select(&sum, &reduced, overflow | !underflow))
    }

    /// Compute \\(a - b \bmod n\\).
    pub fn sub(&self, rhs: &Scalar64) -> Scalar64 {
        let (diff, underflow) = sbb_array_with_underflow(&self.0, &rhs.0);
        let (wrapped, _) = adc_array(&diff, &MODULUS);
        Scalar64(select(&diff, &wrapped, underflow))
    }

    /// Compute \\(a / 2 \bmod n\\).
    pub fn half(&self) -> Scalar64 {
        // If odd, add n first; the sum is even and (a + n)/2 < n.
        let odd = 0u64.wrapping_sub(self.0[0] & 1);
        let masked = [
            MODULUS[0] & odd,
            MODULUS[1] & odd,
            MODULUS[2] & odd,
            MODULUS[3] & odd,
        ];
        let (sum, carry) = adc_array(&self.0, &masked);
        Scalar64([
            (sum[0] >> 1) | (sum[1] << 63),
            (sum[1] >> 1) | (sum[2] << 63),
            (sum[2] >> 1) | (sum[3] << 63),
            (sum[3] >> 1) | (carry << 63),
        ])
    }

    /// Extract `count` bits starting at `offset`.
    ///
    /// `count` must be at most 32 and `offset + count` at most 256. The limb
    /// access pattern depends only on the (public) offsets, never on the
    /// scalar value.
    pub fn bits(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count >= 1 && count <= 32);
        debug_assert!(offset + count <= 256);
        let idx = offset >> 6;
        let shift = offset & 63;
        let mut w = self.0[idx] >> shift;
        if shift + count > 64 {
            w |= self.0[idx + 1] << (64 - shift);
        }
        (w as u32) & (((1u64 << count) - 1) as u32)
    }

    /// Compute \\(a \cdot b \bmod n\\).
    pub fn mul(&self, rhs: &Scalar64) -> Scalar64 {
        Self::reduce_wide(&self.mul_wide(rhs))
    }

    /// Multiply without reduction, producing eight product limbs.
    #[inline(always)]
    fn mul_wide(&self, rhs: &Scalar64) -> [u64; 8] {
        let a = &self.0;
        let b = &rhs.0;

        // 160-bit accumulator.
        let c0 = 0;
        let c1 = 0;
        let c2 = 0;

        let (c0, c1) = muladd_fast(a[0], b[0], c0, c1);
        let (l0, c0, c1) = (c0, c1, 0);
        let (c0, c1, c2) = muladd(a[0], b[1], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[1], b[0], c0, c1, c2);
        let (l1, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = muladd(a[0], b[2], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[1], b[1], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[2], b[0], c0, c1, c2);
        let (l2, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = muladd(a[0], b[3], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[1], b[2], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[2], b[1], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[3], b[0], c0, c1, c2);
        let (l3, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = muladd(a[1], b[3], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[2], b[2], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[3], b[1], c0, c1, c2);
        let (l4, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = muladd(a[2], b[3], c0, c1, c2);
        let (c0, c1, c2) = muladd(a[3], b[2], c0, c1, c2);
        let (l5, c0, c1, _c2) = (c0, c1, c2, 0);
        let (c0, c1) = muladd_fast(a[3], b[3], c0, c1);
        let (l6, c0, _c1) = (c0, c1, 0);
        let l7 = c0;

        [l0, l1, l2, l3, l4, l5, l6, l7]
    }

    /// Reduce eight product limbs modulo `n`.
    #[inline(always)]
    fn reduce_wide(l: &[u64; 8]) -> Scalar64 {
        let (n0, n1, n2, n3) = (l[4], l[5], l[6], l[7]);

        // 512 bits into 385: m[0..6] = l[0..3] + n[0..3] * NEG_MODULUS.
        let c0 = l[0];
        let c1 = 0;
        let c2 = 0;
        let (c0, c1) = muladd_fast(n0, NEG_MODULUS[0], c0, c1);
        let (m0, c0, c1) = (c0, c1, 0);
        let (c0, c1) = sumadd_fast(l[1], c0, c1);
        let (c0, c1, c2) = muladd(n1, NEG_MODULUS[0], c0, c1, c2);
        let (c0, c1, c2) = muladd(n0, NEG_MODULUS[1], c0, c1, c2);
        let (m1, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = sumadd(l[2], c0, c1, c2);
        let (c0, c1, c2) = muladd(n2, NEG_MODULUS[0], c0, c1, c2);
        let (c0, c1, c2) = muladd(n1, NEG_MODULUS[1], c0, c1, c2);
        let (c0, c1, c2) = sumadd(n0, c0, c1, c2);
        let (m2, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = sumadd(l[3], c0, c1, c2);
        let (c0, c1, c2) = muladd(n3, NEG_MODULUS[0], c0, c1, c2);
        let (c0, c1, c2) = muladd(n2, NEG_MODULUS[1], c0, c1, c2);
        let (c0, c1, c2) = sumadd(n1, c0, c1, c2);
        let (m3, c0, c1, c2) = (c0, c1, c2, 0);
        let (c0, c1, c2) = muladd(n3, NEG_MODULUS[1], c0, c1, c2);
        let (c0, c1, c2) = sumadd(n2, c0, c1, c2);
        let (m4, c0, c1, _c2) = (c0, c1, c2, 0);
        let (c0, c1) = sumadd_fast(n3, c0, c1);
        let (m5, c0, _c1) = (c0, c1, 0);
        debug_assert!(c0 <= 1);
        let m6 = c0;

        // 385 bits into 258: p[0..4] = m[0..3] + m[4..6] * NEG_MODULUS.
        let c0 = m0;
        let c1 = 0;
        let c2 = 0;
        let (c0, c1) = muladd_fast(m4, NEG_MODULUS[0], c0, c1);
        let (p0, c0, c1) = (c0, c1, 0);
        let (c0, c1) = sumadd_fast(m1, c0, c1);
        let (c0, c1, c2) = muladd(m5, NEG_MODULUS[0], c0, c1, c2);
        let (c0, c1, c2) = muladd(m4, NEG_MODULUS[1], c0, c1, c2);
        let (p1, c0, c1) = (c0, c1, 0);
        let (c0, c1, c2) = sumadd(m2, c0, c1, c2);
        let (c0, c1, c2) = muladd(m6, NEG_MODULUS[0], c0, c1, c2);
        let (c0, c1, c2) = muladd(m5, NEG_MODULUS[1], c0, c1, c2);
        let (c0, c1, c2) = sumadd(m4, c0, c1, c2);
        let (p2, c0, c1, _c2) = (c0, c1, c2, 0);
        let (c0, c1) = sumadd_fast(m3, c0, c1);
        let (c0, c1) = muladd_fast(m6, NEG_MODULUS[1], c0, c1);
        let (c0, c1) = sumadd_fast(m5, c0, c1);
        let (p3, c0, _c1) = (c0, c1, 0);
        let p4 = c0 + m6;
        debug_assert!(p4 <= 2);

        // 258 bits into 256: r[0..3] = p[0..3] + p[4] * NEG_MODULUS.
        let mut c = (p0 as u128) + (NEG_MODULUS[0] as u128) * (p4 as u128);
        let r0 = c as u64;
        c >>= 64;
        c += (p1 as u128) + (NEG_MODULUS[1] as u128) * (p4 as u128);
        let r1 = c as u64;
        c >>= 64;
        c += (p2 as u128) + (p4 as u128);
        let r2 = c as u64;
        c >>= 64;
        c += p3 as u128;
        let r3 = c as u64;
        c >>= 64;

        // One final conditional subtraction of n.
        let high_bit = Choice::from(c as u8);
        let w = [r0, r1, r2, r3];
        let (reduced, underflow) = sbb_array_with_underflow(&w, &MODULUS);
        Scalar64(select(&w, &reduced, !underflow | high_bit))
    }
}
