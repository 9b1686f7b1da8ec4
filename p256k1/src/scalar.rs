// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Arithmetic on scalars (integers mod the group order).
//!
//! Both the secp256k1 base point and every public key generate a group of
//! prime order
//! \\(n = \mathtt{0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141}\\).
//! All arithmetic on `Scalar`s is done modulo \\(n\\), and every `Scalar`
//! constructed through the public API is canonical (fully reduced).

use core::ops::{Add, Mul, Neg, Sub};

use subtle::Choice;
#[cfg(feature = "rand_core")]
use zeroize::Zeroize;

#[cfg(feature = "rand_core")]
use rand_core::{CryptoRng, RngCore};

use crate::backend::serial::u64::scalar::Scalar64;

/// A `Scalar` represents an element of \\(\mathbb Z / n \mathbb Z\\), where
/// \\(n\\) is the order of the secp256k1 group.
pub type Scalar = Scalar64;

/// The big-endian bytes of \\(n - 2\\), the exponent of Fermat inversion.
const N_MINUS_TWO: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
    0x41, 0x3f,
];

impl Scalar {
    /// Compute the multiplicative inverse of this scalar.
    ///
    /// Uses Fermat's little theorem, \\(a\^{-1} = a\^{n-2}\\), evaluated with
    /// a fixed 4-bit window. The exponent is a public constant, so the
    /// branch structure is independent of the scalar; the inverse of zero is
    /// zero.
    pub fn invert(&self) -> Scalar {
        // table[i] = self^(i+1)
        let mut table = [*self; 15];
        for i in 1..15 {
            table[i] = table[i - 1].mul(*self);
        }

        let mut r = Scalar::ONE;
        for byte in N_MINUS_TWO {
            for nibble in [byte >> 4, byte & 0xf] {
                r = r.mul(r);
                r = r.mul(r);
                r = r.mul(r);
                r = r.mul(r);
                if nibble != 0 {
                    r = r.mul(table[nibble as usize - 1]);
                }
            }
        }
        r
    }

    /// Test whether this scalar is one.
    pub fn is_one(&self) -> Choice {
        use subtle::ConstantTimeEq;
        self.ct_eq(&Scalar::ONE)
    }

    /// Write this scalar in radix 16 with signed coefficients, i.e. compute
    /// \\(a\_i\\) such that
    /// $$
    ///    a = a\_0 + a\_1 16\^1 + \cdots + a\_{64} 16\^{64},
    /// $$
    /// with \\(-8 \leq a\_i < 8\\) for \\(0 \leq i < 64\\) and
    /// \\(0 \leq a\_{64} \leq 8\\).
    ///
    /// Unlike a curve with a 252-bit order, secp256k1 scalars use all 256
    /// bits, so the recentering carry needs a 65th digit.
    pub(crate) fn as_radix_16(&self) -> [i8; 65] {
        let bytes = self.to_bytes();
        let mut output = [0i8; 65];

        // Radix 256 (bytes, big-endian) to radix 16 (nibbles, little-endian).
        for i in 0..32 {
            output[2 * i] = (bytes[31 - i] & 0xf) as i8;
            output[2 * i + 1] = (bytes[31 - i] >> 4) as i8;
        }

        // Recenter coefficients from [0, 16) to [-8, 8).
        for i in 0..64 {
            let carry = (output[i] + 8) >> 4;
            output[i] -= carry << 4;
            output[i + 1] += carry;
        }

        output
    }

    /// Return a random canonical scalar from the supplied RNG, by rejection
    /// sampling (the retry probability is about \\(2\^{-128}\\)).
    #[cfg(feature = "rand_core")]
    pub fn random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Scalar {
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            let s = Scalar::from_bytes(&bytes);
            if bool::from(s.is_some()) {
                bytes.zeroize();
                return s.unwrap();
            }
        }
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;
    fn add(self, rhs: &Scalar) -> Scalar {
        Scalar64::add(self, rhs)
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar64::add(&self, &rhs)
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;
    fn sub(self, rhs: &Scalar) -> Scalar {
        Scalar64::sub(self, rhs)
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar64::sub(&self, &rhs)
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &Scalar) -> Scalar {
        Scalar64::mul(self, rhs)
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar64::mul(&self, &rhs)
    }
}

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.negate()
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.negate()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use subtle::ConditionallyNegatable;

    fn sc_hex(hex32: &str) -> Scalar {
        let mut b = [0u8; 32];
        b.copy_from_slice(&hex::decode(hex32).unwrap());
        Scalar::from_bytes(&b).unwrap()
    }

    #[test]
    fn invert_times_self_is_one() {
        let cases = [
            "0000000000000000000000000000000000000000000000000000000000000002",
            "000000000000000000000000000000000000000000000000000000000000000f",
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
            "7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a1",
        ];
        for c in cases {
            let a = sc_hex(c);
            assert!(bool::from(a.invert().mul(a).is_one()));
        }
    }

    #[test]
    fn invert_of_zero_is_zero() {
        assert!(bool::from(Scalar::ZERO.invert().is_zero()));
    }

    #[test]
    fn radix_16_reconstructs() {
        let s = sc_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");
        let digits = s.as_radix_16();
        // Reconstruct sum(digits[i] * 16^i) mod n.
        let sixteen = Scalar::from_u64(16);
        let mut acc = Scalar::ZERO;
        for i in (0..65).rev() {
            acc = acc.mul(sixteen);
            let d = digits[i];
            let mag = Scalar::from_u64(d.unsigned_abs() as u64);
            let mut term = mag;
            term.conditional_negate(Choice::from((d < 0) as u8));
            acc = acc.add(term);
        }
        use subtle::ConstantTimeEq;
        assert!(bool::from(acc.ct_eq(&s)));
    }

    #[test]
    fn conditional_negate() {
        let a = sc_hex("0000000000000000000000000000000000000000000000000000000000000007");
        let mut b = a;
        b.conditional_negate(Choice::from(0u8));
        assert_eq!(b.to_bytes(), a.to_bytes());
        b.conditional_negate(Choice::from(1u8));
        assert_eq!(b.to_bytes(), a.negate().to_bytes());
    }

    #[cfg(feature = "rand_core")]
    #[test]
    fn random_scalars_differ() {
        let mut rng = rand::rng();
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);
        assert_ne!(a.to_bytes(), b.to_bytes());
    }
}
