// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Field arithmetic modulo \\(p = 2\^{256} - 2\^{32} - 977\\), using 64-bit
//! limbs with 128-bit products.
//!
//! A `FieldElement52` holds an element of \\(\mathbb Z / p \mathbb Z\\) as
//! five 64-bit limbs in radix \\(2\^{52}\\), so that sums of cross products
//! fit in 128-bit accumulators with a single folding of the prime's sparse
//! tail \\(2\^{32} + 977\\).
//!
//! Every value carries a *magnitude*, an upper bound on how far each limb may
//! exceed the canonical limb range, and a *normalized* flag recording whether
//! the value is the unique representative in \\([0, p)\\). Additions and
//! negations inflate the magnitude; multiplication and squaring require
//! inputs of magnitude at most [`MAX_MAGNITUDE_MUL`] and weakly normalize
//! larger inputs before use.

use core::fmt::Debug;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Mask of the 52 low bits, the canonical range of the four lower limbs.
const LOW_52_BIT_MASK: u64 = (1u64 << 52) - 1;
/// Mask of the 48 low bits, the canonical range of the top limb.
const LOW_48_BIT_MASK: u64 = (1u64 << 48) - 1;
/// The prime's tail: \\(2\^{256} \equiv 2\^{32} + 977 \pmod p\\).
const P_TAIL: u64 = 0x1000003D1;
/// The tail shifted into the position used by the multiplication folds.
const R_FOLD: u64 = 0x1000003D10;

/// Largest magnitude accepted by `mul`/`square` without weak normalization.
pub(crate) const MAX_MAGNITUDE_MUL: u32 = 8;

/// Largest magnitude any operation is allowed to produce.
pub(crate) const MAX_MAGNITUDE: u32 = 32;

/// A `FieldElement52` represents an element of the field
/// \\(\mathbb Z / (2\^{256} - 2\^{32} - 977)\\).
///
/// In the 64-bit implementation, a `FieldElement52` is represented in radix
/// \\(2\^{52}\\) as five `u64`s, together with the magnitude and normalized
/// flags described in the module documentation.
#[derive(Copy, Clone)]
pub struct FieldElement52 {
    pub(crate) limbs: [u64; 5],
    magnitude: u32,
    normalized: bool,
}

impl Debug for FieldElement52 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "FieldElement52({:?}, magnitude {}, normalized {})",
            &self.limbs, self.magnitude, self.normalized
        )
    }
}

impl Zeroize for FieldElement52 {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
        self.magnitude = 1;
        self.normalized = true;
    }
}

impl ConditionallySelectable for FieldElement52 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldElement52 {
            limbs: [
                u64::conditional_select(&a.limbs[0], &b.limbs[0], choice),
                u64::conditional_select(&a.limbs[1], &b.limbs[1], choice),
                u64::conditional_select(&a.limbs[2], &b.limbs[2], choice),
                u64::conditional_select(&a.limbs[3], &b.limbs[3], choice),
                u64::conditional_select(&a.limbs[4], &b.limbs[4], choice),
            ],
            magnitude: a.magnitude.max(b.magnitude),
            normalized: a.normalized && b.normalized,
        }
    }
}

impl ConstantTimeEq for FieldElement52 {
    /// Test equality between two `FieldElement52`s by subtracting them and
    /// checking whether the difference normalizes to zero.
    fn ct_eq(&self, other: &Self) -> Choice {
        other.negate(other.magnitude).add(self).normalizes_to_zero()
    }
}

impl FieldElement52 {
    /// The zero element, with magnitude 1 so it can feed any operation.
    pub const ZERO: FieldElement52 = FieldElement52 {
        limbs: [0, 0, 0, 0, 0],
        magnitude: 1,
        normalized: true,
    };

    /// The multiplicative identity.
    pub const ONE: FieldElement52 = FieldElement52 {
        limbs: [1, 0, 0, 0, 0],
        magnitude: 1,
        normalized: true,
    };

    /// Construct a field element from canonical limbs.
    ///
    /// The caller must supply limbs encoding the unique representative in
    /// \\([0, p)\\); this is intended for compile-time constants.
    pub const fn from_raw_limbs(limbs: [u64; 5]) -> FieldElement52 {
        FieldElement52 {
            limbs,
            magnitude: 1,
            normalized: true,
        }
    }

    /// Construct the field element corresponding to a small integer.
    pub const fn from_u64(v: u64) -> FieldElement52 {
        debug_assert!(v <= LOW_52_BIT_MASK);
        FieldElement52 {
            limbs: [v, 0, 0, 0, 0],
            magnitude: 1,
            normalized: true,
        }
    }

    /// The magnitude bound currently carried by this element.
    pub(crate) fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// Whether this element is known to be the canonical representative.
    pub(crate) fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Load a field element from 32 big-endian bytes, reducing modulo p.
    ///
    /// Any 256-bit input is accepted; the result is fully normalized.
    pub fn from_bytes_mod(bytes: &[u8; 32]) -> FieldElement52 {
        Self::unpack(bytes).normalize()
    }

    /// Load a field element from 32 big-endian bytes, additionally reporting
    /// whether the input was already below p.
    ///
    /// The returned element is the value modulo p either way; the `Choice` is
    /// set iff the encoding was canonical.
    pub fn from_bytes(bytes: &[u8; 32]) -> (FieldElement52, Choice) {
        let fe = Self::unpack(bytes);
        let l = &fe.limbs;
        // The input overflows iff it is at least p, i.e. the upper limbs are
        // saturated and the low limb reaches the prime's low digits.
        let overflow = l[4].ct_eq(&LOW_48_BIT_MASK)
            & (l[3] & l[2] & l[1]).ct_eq(&LOW_52_BIT_MASK)
            & Choice::from((l[0] >= 0xFFFFEFFFFFC2F) as u8);
        (fe.normalize(), !overflow)
    }

    fn unpack(bytes: &[u8; 32]) -> FieldElement52 {
        let load = |b: &[u8]| -> u64 {
            let mut w = [0u8; 8];
            w.copy_from_slice(b);
            u64::from_be_bytes(w)
        };
        let w3 = load(&bytes[0..8]);
        let w2 = load(&bytes[8..16]);
        let w1 = load(&bytes[16..24]);
        let w0 = load(&bytes[24..32]);
        FieldElement52 {
            limbs: [
                w0 & LOW_52_BIT_MASK,
                (w0 >> 52) | ((w1 << 12) & LOW_52_BIT_MASK),
                (w1 >> 40) | ((w2 << 24) & LOW_52_BIT_MASK),
                (w2 >> 28) | ((w3 << 36) & LOW_52_BIT_MASK),
                w3 >> 16,
            ],
            magnitude: 1,
            normalized: false,
        }
    }

    /// Serialize this field element to 32 big-endian bytes.
    ///
    /// The element must be normalized.
    pub fn to_bytes(&self) -> [u8; 32] {
        debug_assert!(self.normalized);
        let l = &self.limbs;
        let w0 = l[0] | (l[1] << 52);
        let w1 = (l[1] >> 12) | (l[2] << 40);
        let w2 = (l[2] >> 24) | (l[3] << 28);
        let w3 = (l[3] >> 36) | (l[4] << 16);
        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&w3.to_be_bytes());
        out[8..16].copy_from_slice(&w2.to_be_bytes());
        out[16..24].copy_from_slice(&w1.to_be_bytes());
        out[24..32].copy_from_slice(&w0.to_be_bytes());
        out
    }

    /// Fully reduce to the unique representative in \\([0, p)\\).
    pub fn normalize(&self) -> FieldElement52 {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.limbs;

        // Fold the excess above 2^256 into the low limb, then carry.
        let x = t4 >> 48;
        t4 &= LOW_48_BIT_MASK;
        t0 += x * P_TAIL;
        t1 += t0 >> 52;
        t0 &= LOW_52_BIT_MASK;
        t2 += t1 >> 52;
        t1 &= LOW_52_BIT_MASK;
        let mut m = t1;
        t3 += t2 >> 52;
        t2 &= LOW_52_BIT_MASK;
        m &= t2;
        t4 += t3 >> 52;
        t3 &= LOW_52_BIT_MASK;
        m &= t3;

        debug_assert!(t4 >> 49 == 0);

        // At most one copy of p may remain; detect and subtract it by adding
        // the tail and masking off bit 256.
        let x = (t4 >> 48)
            | ((t4 == LOW_48_BIT_MASK) & (m == LOW_52_BIT_MASK) & (t0 >= 0xFFFFEFFFFFC2F)) as u64;
        t0 += x * P_TAIL;
        t1 += t0 >> 52;
        t0 &= LOW_52_BIT_MASK;
        t2 += t1 >> 52;
        t1 &= LOW_52_BIT_MASK;
        t3 += t2 >> 52;
        t2 &= LOW_52_BIT_MASK;
        t4 += t3 >> 52;
        t3 &= LOW_52_BIT_MASK;
        t4 &= LOW_48_BIT_MASK;

        FieldElement52 {
            limbs: [t0, t1, t2, t3, t4],
            magnitude: 1,
            normalized: true,
        }
    }

    /// Reduce to magnitude 1 without producing the canonical representative.
    pub fn normalize_weak(&self) -> FieldElement52 {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.limbs;

        let x = t4 >> 48;
        t4 &= LOW_48_BIT_MASK;
        t0 += x * P_TAIL;
        t1 += t0 >> 52;
        t0 &= LOW_52_BIT_MASK;
        t2 += t1 >> 52;
        t1 &= LOW_52_BIT_MASK;
        t3 += t2 >> 52;
        t2 &= LOW_52_BIT_MASK;
        t4 += t3 >> 52;
        t3 &= LOW_52_BIT_MASK;

        FieldElement52 {
            limbs: [t0, t1, t2, t3, t4],
            magnitude: 1,
            normalized: false,
        }
    }

    /// Variable-time normalization, permissible outside secret paths.
    pub fn normalize_var(&self) -> FieldElement52 {
        let weak = self.normalize_weak();
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = weak.limbs;

        let needs_sub = (t4 >> 48 != 0)
            || ((t4 == LOW_48_BIT_MASK)
                && (t1 & t2 & t3) == LOW_52_BIT_MASK
                && t0 >= 0xFFFFEFFFFFC2F);
        if needs_sub {
            t0 += P_TAIL;
            t1 += t0 >> 52;
            t0 &= LOW_52_BIT_MASK;
            t2 += t1 >> 52;
            t1 &= LOW_52_BIT_MASK;
            t3 += t2 >> 52;
            t2 &= LOW_52_BIT_MASK;
            t4 += t3 >> 52;
            t3 &= LOW_52_BIT_MASK;
            t4 &= LOW_48_BIT_MASK;
        }

        FieldElement52 {
            limbs: [t0, t1, t2, t3, t4],
            magnitude: 1,
            normalized: true,
        }
    }

    /// Test whether this element reduces to zero, without computing the
    /// reduction.
    pub fn normalizes_to_zero(&self) -> Choice {
        let [mut t0, mut t1, mut t2, mut t3, mut t4] = self.limbs;

        let x = t4 >> 48;
        t4 &= LOW_48_BIT_MASK;
        t0 += x * P_TAIL;

        // z0 tracks "all limbs zero"; z1 tracks "value equals p exactly".
        t1 += t0 >> 52;
        t0 &= LOW_52_BIT_MASK;
        let mut z0 = t0;
        let mut z1 = t0 ^ 0x1000003D0;
        t2 += t1 >> 52;
        t1 &= LOW_52_BIT_MASK;
        z0 |= t1;
        z1 &= t1;
        t3 += t2 >> 52;
        t2 &= LOW_52_BIT_MASK;
        z0 |= t2;
        z1 &= t2;
        t4 += t3 >> 52;
        t3 &= LOW_52_BIT_MASK;
        z0 |= t3;
        z1 &= t3;
        z0 |= t4;
        z1 &= t4 ^ 0xF000000000000;

        z0.ct_eq(&0) | z1.ct_eq(&LOW_52_BIT_MASK)
    }

    /// Add two field elements. Magnitudes add.
    pub fn add(&self, rhs: &FieldElement52) -> FieldElement52 {
        debug_assert!(self.magnitude + rhs.magnitude <= MAX_MAGNITUDE);
        FieldElement52 {
            limbs: [
                self.limbs[0] + rhs.limbs[0],
                self.limbs[1] + rhs.limbs[1],
                self.limbs[2] + rhs.limbs[2],
                self.limbs[3] + rhs.limbs[3],
                self.limbs[4] + rhs.limbs[4],
            ],
            magnitude: self.magnitude + rhs.magnitude,
            normalized: false,
        }
    }

    /// Add a small integer constant. Increments the magnitude by one.
    pub fn add_int(&self, v: u64) -> FieldElement52 {
        debug_assert!(v <= LOW_52_BIT_MASK);
        debug_assert!(self.magnitude < MAX_MAGNITUDE);
        let mut limbs = self.limbs;
        limbs[0] += v;
        FieldElement52 {
            limbs,
            magnitude: self.magnitude + 1,
            normalized: false,
        }
    }

    /// Multiply every limb by a small integer `k` in \\([1, 32]\\).
    /// Multiplies the magnitude by `k`.
    pub fn mul_int(&self, k: u32) -> FieldElement52 {
        debug_assert!(k >= 1 && k <= 32);
        debug_assert!(self.magnitude * k <= MAX_MAGNITUDE);
        let k = k as u64;
        FieldElement52 {
            limbs: [
                self.limbs[0] * k,
                self.limbs[1] * k,
                self.limbs[2] * k,
                self.limbs[3] * k,
                self.limbs[4] * k,
            ],
            magnitude: self.magnitude * k as u32,
            normalized: false,
        }
    }

    /// Negate, given an upper bound `m` on the input's magnitude.
    ///
    /// The result has magnitude `m + 1` and represents \\(-a \bmod p\\).
    pub fn negate(&self, m: u32) -> FieldElement52 {
        debug_assert!(self.magnitude <= m);
        debug_assert!(m < MAX_MAGNITUDE);
        // Subtract from 2(m+1) copies of p, which dominates any value of
        // magnitude m limb by limb.
        let k = 2 * (m as u64 + 1);
        FieldElement52 {
            limbs: [
                0xFFFFEFFFFFC2F * k - self.limbs[0],
                LOW_52_BIT_MASK * k - self.limbs[1],
                LOW_52_BIT_MASK * k - self.limbs[2],
                LOW_52_BIT_MASK * k - self.limbs[3],
                LOW_48_BIT_MASK * k - self.limbs[4],
            ],
            magnitude: m + 1,
            normalized: false,
        }
    }

    /// Multiply two field elements. The result has magnitude 1.
    ///
    /// Inputs above [`MAX_MAGNITUDE_MUL`] are weakly normalized first; the
    /// magnitude flag is metadata about value bounds, never secret data, so
    /// the branch is data-independent.
    pub fn mul(&self, rhs: &FieldElement52) -> FieldElement52 {
        let a = if self.magnitude > MAX_MAGNITUDE_MUL {
            self.normalize_weak()
        } else {
            *self
        };
        let b = if rhs.magnitude > MAX_MAGNITUDE_MUL {
            rhs.normalize_weak()
        } else {
            *rhs
        };
        FieldElement52 {
            limbs: Self::mul_inner(&a.limbs, &b.limbs),
            magnitude: 1,
            normalized: false,
        }
    }

    /// Square a field element. The result has magnitude 1.
    pub fn square(&self) -> FieldElement52 {
        let a = if self.magnitude > MAX_MAGNITUDE_MUL {
            self.normalize_weak()
        } else {
            *self
        };
        FieldElement52 {
            limbs: Self::square_inner(&a.limbs),
            magnitude: 1,
            normalized: false,
        }
    }

    /// Test whether the low bit is set. The element must be normalized.
    pub fn is_odd(&self) -> Choice {
        debug_assert!(self.normalized);
        Choice::from((self.limbs[0] & 1) as u8)
    }

    /// Test whether this is the zero element. The element must be normalized.
    pub fn is_zero(&self) -> Choice {
        debug_assert!(self.normalized);
        let l = &self.limbs;
        (l[0] | l[1] | l[2] | l[3] | l[4]).ct_eq(&0)
    }

    /// Schoolbook multiplication with interleaved reduction.
    ///
    /// The 512-bit product is folded on the fly using
    /// \\(2\^{256} \equiv 2\^{32} + 977\\), producing limbs of magnitude 1.
    /// Inputs must have limbs below \\(2\^{56}\\) (magnitude at most 8).
    #[rustfmt::skip]
    fn mul_inner(a: &[u64; 5], b: &[u64; 5]) -> [u64; 5] {
        const M: u64 = LOW_52_BIT_MASK;
        const R: u64 = R_FOLD;
        let (a0, a1, a2, a3, a4) = (a[0], a[1], a[2], a[3], a[4]);
        let (b0, b1, b2, b3, b4) = (b[0], b[1], b[2], b[3], b[4]);
        let m = |x: u64, y: u64| (x as u128) * (y as u128);

        let mut d = m(a0, b3) + m(a1, b2) + m(a2, b1) + m(a3, b0);
        let mut c = m(a4, b4);
        d += m(R, c as u64); c >>= 64;
        let t3 = (d as u64) & M; d >>= 52;

        d += m(a0, b4) + m(a1, b3) + m(a2, b2) + m(a3, b1) + m(a4, b0);
        d += m(R << 12, c as u64);
        let mut t4 = (d as u64) & M; d >>= 52;
        let tx = t4 >> 48; t4 &= LOW_48_BIT_MASK;

        c = m(a0, b0);
        d += m(a1, b4) + m(a2, b3) + m(a3, b2) + m(a4, b1);
        let mut u0 = (d as u64) & M; d >>= 52;
        u0 = (u0 << 4) | tx;
        c += m(u0, R >> 4);
        let t0 = (c as u64) & M; c >>= 52;

        c += m(a0, b1) + m(a1, b0);
        d += m(a2, b4) + m(a3, b3) + m(a4, b2);
        c += m((d as u64) & M, R); d >>= 52;
        let t1 = (c as u64) & M; c >>= 52;

        c += m(a0, b2) + m(a1, b1) + m(a2, b0);
        d += m(a3, b4) + m(a4, b3);
        c += m(R, d as u64); d >>= 64;
        let r2 = (c as u64) & M; c >>= 52;

        c += m(R << 12, d as u64) + (t3 as u128);
        let r3 = (c as u64) & M; c >>= 52;
        let r4 = (c as u64) + t4;

        [t0, t1, r2, r3, r4]
    }

    /// Squaring with interleaved reduction; the symmetric cross products are
    /// combined up front.
    #[rustfmt::skip]
    fn square_inner(a: &[u64; 5]) -> [u64; 5] {
        const M: u64 = LOW_52_BIT_MASK;
        const R: u64 = R_FOLD;
        let (a0, a1, a2, a3, mut a4) = (a[0], a[1], a[2], a[3], a[4]);
        let m = |x: u64, y: u64| (x as u128) * (y as u128);

        let mut d = m(a0 * 2, a3) + m(a1 * 2, a2);
        let mut c = m(a4, a4);
        d += m(R, c as u64); c >>= 64;
        let t3 = (d as u64) & M; d >>= 52;

        a4 *= 2;
        d += m(a0, a4) + m(a1 * 2, a3) + m(a2, a2);
        d += m(R << 12, c as u64);
        let mut t4 = (d as u64) & M; d >>= 52;
        let tx = t4 >> 48; t4 &= LOW_48_BIT_MASK;

        c = m(a0, a0);
        d += m(a1, a4) + m(a2 * 2, a3);
        let mut u0 = (d as u64) & M; d >>= 52;
        u0 = (u0 << 4) | tx;
        c += m(u0, R >> 4);
        let t0 = (c as u64) & M; c >>= 52;

        let a0_2 = a0 * 2;
        c += m(a0_2, a1);
        d += m(a2, a4) + m(a3, a3);
        c += m((d as u64) & M, R); d >>= 52;
        let t1 = (c as u64) & M; c >>= 52;

        c += m(a0_2, a2) + m(a1, a1);
        d += m(a3, a4);
        c += m(R, d as u64); d >>= 64;
        let r2 = (c as u64) & M; c >>= 52;

        c += m(R << 12, d as u64) + (t3 as u128);
        let r3 = (c as u64) & M; c >>= 52;
        let r4 = (c as u64) + t4;

        [t0, t1, r2, r3, r4]
    }

    /// Pack a normalized element into the 4-limb storage form.
    pub fn to_storage(&self) -> FieldStorage {
        debug_assert!(self.normalized);
        let l = &self.limbs;
        FieldStorage([
            l[0] | (l[1] << 52),
            (l[1] >> 12) | (l[2] << 40),
            (l[2] >> 24) | (l[3] << 28),
            (l[3] >> 36) | (l[4] << 16),
        ])
    }

    /// Unpack a storage form back into a normalized element.
    pub fn from_storage(s: &FieldStorage) -> FieldElement52 {
        let w = &s.0;
        FieldElement52 {
            limbs: [
                w[0] & LOW_52_BIT_MASK,
                (w[0] >> 52) | ((w[1] << 12) & LOW_52_BIT_MASK),
                (w[1] >> 40) | ((w[2] << 24) & LOW_52_BIT_MASK),
                (w[2] >> 28) | ((w[3] << 36) & LOW_52_BIT_MASK),
                w[3] >> 16,
            ],
            magnitude: 1,
            normalized: true,
        }
    }
}

/// Packed 4×64 form of a normalized field element, used inside precomputed
/// point tables where density matters more than arithmetic readiness.
#[derive(Copy, Clone, Debug, Default)]
pub struct FieldStorage(pub(crate) [u64; 4]);

impl ConditionallySelectable for FieldStorage {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldStorage([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl Zeroize for FieldStorage {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
