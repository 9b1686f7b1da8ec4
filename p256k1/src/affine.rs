// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Affine points on the secp256k1 curve \\(y\^2 = x\^3 + 7\\), together with
//! their packed storage form and the SEC1 wire encodings.
//!
//! An `AffinePoint` keeps its coordinates fully normalized, so parity tests,
//! serialization, and equality never need to reduce. The point at infinity
//! is carried as an explicit flag with zeroed coordinates.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use crate::backend::serial::u64::constants;
use crate::backend::serial::u64::field::FieldStorage;
use crate::errors::Error;
use crate::field::FieldElement;

/// SEC1 tag for a compressed point with even y.
pub(crate) const TAG_PUBKEY_EVEN: u8 = 0x02;
/// SEC1 tag for a compressed point with odd y.
pub(crate) const TAG_PUBKEY_ODD: u8 = 0x03;
/// SEC1 tag for an uncompressed point.
pub(crate) const TAG_PUBKEY_UNCOMPRESSED: u8 = 0x04;

/// A point on the secp256k1 curve in affine coordinates.
#[derive(Copy, Clone, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    infinity: u8,
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // The identity is stored with zeroed coordinates, so coordinate
        // equality is meaningful for it too.
        self.x.ct_eq(&other.x)
            & self.y.ct_eq(&other.y)
            & self.infinity.ct_eq(&other.infinity)
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Zeroize for AffinePoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.infinity = 1;
    }
}

impl AffinePoint {
    /// The point at infinity.
    pub const IDENTITY: AffinePoint = AffinePoint {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Construct a finite point from normalized coordinates, without
    /// checking the curve equation.
    pub(crate) const fn from_raw_coordinates(x: FieldElement, y: FieldElement) -> AffinePoint {
        AffinePoint { x, y, infinity: 0 }
    }

    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// The x-coordinate. Meaningless for the identity.
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    /// Whether the y-coordinate is odd. Meaningless for the identity.
    pub fn y_is_odd(&self) -> Choice {
        self.y.is_odd()
    }

    /// Check the curve equation \\(y\^2 = x\^3 + 7\\) for a finite point.
    pub fn is_on_curve(&self) -> Choice {
        let x3_b = self.x.square().mul(&self.x).add(&constants::CURVE_B);
        self.y.square().add(&x3_b.negate(2)).normalizes_to_zero() & !self.is_infinity()
    }

    /// Recover a point from an x-coordinate and a requested y parity.
    ///
    /// Computes \\(y = \sqrt{x\^3 + 7}\\) and negates it to match `y_odd`.
    /// Fails if `x` is not the abscissa of a curve point.
    pub fn lift_x(x: &FieldElement, y_odd: Choice) -> CtOption<AffinePoint> {
        debug_assert!(x.is_normalized());
        let candidate = x.square().mul(x).add(&constants::CURVE_B);
        let (y, is_residue) = candidate.sqrt();
        let y = y.conditional_negate_normalized(y.is_odd() ^ y_odd);
        CtOption::new(AffinePoint { x: *x, y, infinity: 0 }, is_residue)
    }

    /// Negate this point; the identity negates to itself.
    pub fn negate(&self) -> AffinePoint {
        AffinePoint {
            x: self.x,
            y: self.y.negate(1).normalize(),
            infinity: self.infinity,
        }
    }

    /// Conditionally negate the y-coordinate in constant time.
    pub(crate) fn conditional_negate_y(&self, flag: Choice) -> AffinePoint {
        AffinePoint {
            x: self.x,
            y: self.y.conditional_negate_normalized(flag),
            infinity: self.infinity,
        }
    }

    /// Pack a finite point into its 64-byte storage form.
    pub fn to_storage(&self) -> PointStorage {
        debug_assert!(!bool::from(self.is_infinity()));
        PointStorage {
            x: self.x.to_storage(),
            y: self.y.to_storage(),
        }
    }

    /// Unpack a storage form into a finite point.
    pub fn from_storage(s: &PointStorage) -> AffinePoint {
        AffinePoint {
            x: FieldElement::from_storage(&s.x),
            y: FieldElement::from_storage(&s.y),
            infinity: 0,
        }
    }

    /// Serialize a finite point as 64 bytes of raw coordinates.
    pub fn to_bytes(&self) -> [u8; 64] {
        debug_assert!(!bool::from(self.is_infinity()));
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&self.x.to_bytes());
        out[32..64].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Parse the 64-byte raw-coordinate form, validating range and the curve
    /// equation.
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<AffinePoint, Error> {
        let mut xb = [0u8; 32];
        let mut yb = [0u8; 32];
        xb.copy_from_slice(&bytes[0..32]);
        yb.copy_from_slice(&bytes[32..64]);
        let (x, x_ok) = FieldElement::from_bytes(&xb);
        let (y, y_ok) = FieldElement::from_bytes(&yb);
        if !bool::from(x_ok & y_ok) {
            return Err(Error::InvalidPublicKey);
        }
        let p = AffinePoint { x, y, infinity: 0 };
        if !bool::from(p.is_on_curve()) {
            return Err(Error::InvalidPublicKey);
        }
        Ok(p)
    }

    /// Serialize a finite point in compressed SEC1 form (33 bytes).
    pub fn serialize_compressed(&self) -> [u8; 33] {
        debug_assert!(!bool::from(self.is_infinity()));
        let mut out = [0u8; 33];
        out[0] = TAG_PUBKEY_EVEN + self.y_is_odd().unwrap_u8();
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out
    }

    /// Serialize a finite point in uncompressed SEC1 form (65 bytes).
    pub fn serialize_uncompressed(&self) -> [u8; 65] {
        debug_assert!(!bool::from(self.is_infinity()));
        let mut out = [0u8; 65];
        out[0] = TAG_PUBKEY_UNCOMPRESSED;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..65].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Parse a SEC1-encoded public key, either compressed (33 bytes) or
    /// uncompressed (65 bytes).
    pub fn parse_sec1(bytes: &[u8]) -> Result<AffinePoint, Error> {
        match bytes {
            [TAG_PUBKEY_EVEN, rest @ ..] | [TAG_PUBKEY_ODD, rest @ ..] if rest.len() == 32 => {
                let mut xb = [0u8; 32];
                xb.copy_from_slice(rest);
                let (x, x_ok) = FieldElement::from_bytes(&xb);
                if !bool::from(x_ok) {
                    return Err(Error::InvalidPublicKey);
                }
                let odd = Choice::from((bytes[0] == TAG_PUBKEY_ODD) as u8);
                let p = AffinePoint::lift_x(&x, odd);
                if bool::from(p.is_some()) {
                    Ok(p.unwrap())
                } else {
                    Err(Error::InvalidPublicKey)
                }
            }
            [TAG_PUBKEY_UNCOMPRESSED, rest @ ..] if rest.len() == 64 => {
                let mut b = [0u8; 64];
                b.copy_from_slice(rest);
                AffinePoint::from_bytes(&b)
            }
            _ => Err(Error::InvalidPublicKey),
        }
    }
}

/// Packed 64-byte representation of a finite affine point: two
/// [`FieldStorage`] coordinates. Used for precomputed tables, where entries
/// are scanned with constant-time selection.
#[derive(Copy, Clone, Debug, Default)]
pub struct PointStorage {
    pub(crate) x: FieldStorage,
    pub(crate) y: FieldStorage,
}

impl ConditionallySelectable for PointStorage {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        PointStorage {
            x: FieldStorage::conditional_select(&a.x, &b.x, choice),
            y: FieldStorage::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl Zeroize for PointStorage {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
    }
}
