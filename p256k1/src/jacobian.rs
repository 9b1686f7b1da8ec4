// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Points on the secp256k1 curve in Jacobian projective coordinates.
//!
//! A `JacobianPoint` \\((X, Y, Z)\\) represents the affine point
//! \\((X/Z\^2, Y/Z\^3)\\); additions and doublings avoid the field inversion
//! an affine formula would need. All chained arithmetic happens here, and a
//! result is converted back to affine once, at the API boundary.
//!
//! Coordinates carry field magnitudes greater than one between operations;
//! the formulas below weakly normalize where a magnitude bound would
//! otherwise be exceeded.

use alloc::vec::Vec;

use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

use crate::affine::AffinePoint;
use crate::field::FieldElement;

/// A point on the secp256k1 curve, in Jacobian coordinates.
#[derive(Copy, Clone, Debug)]
pub struct JacobianPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    infinity: u8,
}

impl ConditionallySelectable for JacobianPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        JacobianPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl Zeroize for JacobianPoint {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.z.zeroize();
        self.infinity = 1;
    }
}

impl JacobianPoint {
    /// The point at infinity.
    pub const INFINITY: JacobianPoint = JacobianPoint {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        z: FieldElement::ZERO,
        infinity: 1,
    };

    /// Lift an affine point into Jacobian coordinates with \\(Z = 1\\).
    pub fn from_affine(a: &AffinePoint) -> JacobianPoint {
        JacobianPoint {
            x: a.x,
            y: a.y,
            z: FieldElement::ONE,
            infinity: a.is_infinity().unwrap_u8(),
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Negate this point.
    pub fn negate(&self) -> JacobianPoint {
        JacobianPoint {
            x: self.x,
            y: self.y.negate(self.y.magnitude()).normalize_weak(),
            z: self.z,
            infinity: self.infinity,
        }
    }

    /// Double this point.
    ///
    /// Uses the doubling formula specialized for curves with \\(a = 0\\):
    /// \\(S = 4XY\^2\\), \\(M = 3X\^2\\), \\(X' = M\^2 - 2S\\),
    /// \\(Y' = M(S - X') - 8Y\^4\\), \\(Z' = 2YZ\\). Branch-free; the
    /// infinity flag propagates (secp256k1 has no points of order two, so
    /// \\(Y = 0\\) never occurs on valid inputs).
    pub fn double(&self) -> JacobianPoint {
        let z3 = self.y.mul(&self.z).mul_int(2);
        let m = self.x.square().mul_int(3);
        let y2 = self.y.square();
        let s = self.x.mul(&y2).mul_int(4);
        let y4_8 = y2.square().mul_int(8);

        let x3 = m.square().add(&s.mul_int(2).negate(8));
        let s_minus_x3 = s.add(&x3.negate(10));
        let y3 = m.mul(&s_minus_x3).add(&y4_8.negate(8));

        JacobianPoint {
            x: x3.normalize_weak(),
            y: y3.normalize_weak(),
            z: z3,
            infinity: self.infinity,
        }
    }

    /// Add an affine point, in variable time.
    ///
    /// Detects the doubling and cancellation cases by normalize-and-compare,
    /// so it must only see public data.
    pub fn add_affine_var(&self, b: &AffinePoint) -> JacobianPoint {
        if bool::from(b.is_infinity()) {
            return *self;
        }
        if bool::from(self.is_infinity()) {
            return JacobianPoint::from_affine(b);
        }

        let z1z1 = self.z.square();
        let u2 = b.x.mul(&z1z1);
        let s2 = b.y.mul(&z1z1).mul(&self.z);
        let h = u2.add(&self.x.negate(self.x.magnitude()));
        let rr = s2.add(&self.y.negate(self.y.magnitude())).mul_int(2);

        if bool::from(h.normalizes_to_zero()) {
            if bool::from(rr.normalizes_to_zero()) {
                return self.double();
            }
            return JacobianPoint::INFINITY;
        }

        self.add_inner(&h, &rr)
    }

    /// Add another Jacobian point, in variable time.
    pub fn add_var(&self, b: &JacobianPoint) -> JacobianPoint {
        if bool::from(b.is_infinity()) {
            return *self;
        }
        if bool::from(self.is_infinity()) {
            return *b;
        }

        let z1z1 = self.z.square();
        let z2z2 = b.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = b.x.mul(&z1z1);
        let s1 = self.y.mul(&b.z).mul(&z2z2);
        let s2 = b.y.mul(&self.z).mul(&z1z1);
        let h = u2.add(&u1.negate(1));
        let rr = s2.add(&s1.negate(1)).mul_int(2);

        if bool::from(h.normalizes_to_zero()) {
            if bool::from(rr.normalizes_to_zero()) {
                return self.double();
            }
            return JacobianPoint::INFINITY;
        }

        // The shared tail uses U1 and S1 in place of X1 and Y1, and scales
        // Z3 by Z2 afterwards.
        let i = h.mul_int(2).square();
        let j = h.mul(&i);
        let v = u1.mul(&i);
        let x3 = rr.square().add(&j.negate(1)).add(&v.mul_int(2).negate(2));
        let v_minus_x3 = v.add(&x3.negate(6));
        let y3 = rr.mul(&v_minus_x3).add(&s1.mul(&j).mul_int(2).negate(2));
        let z3 = self.z.mul(&b.z).mul(&h).mul_int(2);

        JacobianPoint {
            x: x3.normalize_weak(),
            y: y3.normalize_weak(),
            z: z3,
            infinity: 0,
        }
    }

    /// Add an affine point in constant time, handling every special case
    /// (either operand at infinity, doubling, cancellation) by computing all
    /// candidate results and selecting with masks.
    pub fn add_affine(&self, b: &AffinePoint) -> JacobianPoint {
        let z1z1 = self.z.square();
        let u2 = b.x.mul(&z1z1);
        let s2 = b.y.mul(&z1z1).mul(&self.z);
        let h = u2.add(&self.x.negate(self.x.magnitude()));
        let rr = s2.add(&self.y.negate(self.y.magnitude())).mul_int(2);

        let h_zero = h.normalizes_to_zero();
        let rr_zero = rr.normalizes_to_zero();

        let generic = self.add_inner(&h, &rr);
        let doubled = self.double();

        let mut r = generic;
        r = JacobianPoint::conditional_select(&r, &doubled, h_zero & rr_zero);
        r = JacobianPoint::conditional_select(&r, &JacobianPoint::INFINITY, h_zero & !rr_zero);
        r = JacobianPoint::conditional_select(&r, &JacobianPoint::from_affine(b), self.is_infinity());
        r = JacobianPoint::conditional_select(&r, self, b.is_infinity());
        r
    }

    /// The generic mixed-addition tail, valid when `h` is nonzero:
    /// \\(I = (2H)\^2\\), \\(J = HI\\), \\(V = X_1 I\\),
    /// \\(X_3 = r\^2 - J - 2V\\), \\(Y_3 = r(V - X_3) - 2Y_1 J\\),
    /// \\(Z_3 = 2 Z_1 H\\), with \\(r = 2(S_2 - Y_1)\\).
    fn add_inner(&self, h: &FieldElement, rr: &FieldElement) -> JacobianPoint {
        let i = h.mul_int(2).square();
        let j = h.mul(&i);
        let v = self.x.mul(&i);
        let x3 = rr.square().add(&j.negate(1)).add(&v.mul_int(2).negate(2));
        let v_minus_x3 = v.add(&x3.negate(6));
        let y1j = self.y.mul(&j);
        let y3 = rr.mul(&v_minus_x3).add(&y1j.mul_int(2).negate(2));
        let z3 = self.z.mul(h).mul_int(2);

        JacobianPoint {
            x: x3.normalize_weak(),
            y: y3.normalize_weak(),
            z: z3,
            infinity: 0,
        }
    }

    /// Convert to affine coordinates with a single field inversion.
    /// Constant time; the identity converts to the affine identity.
    pub fn to_affine(&self) -> AffinePoint {
        let zi = self.z.invert();
        let zi2 = zi.square();
        let zi3 = zi2.mul(&zi);
        let x = self.x.mul(&zi2).normalize();
        let y = self.y.mul(&zi3).normalize();
        AffinePoint::conditional_select(
            &AffinePoint::from_raw_coordinates(x, y),
            &AffinePoint::IDENTITY,
            self.is_infinity(),
        )
    }

    /// Convert a batch of finite points to affine with a single inversion,
    /// using Montgomery's trick.
    pub(crate) fn batch_to_affine(points: &[JacobianPoint]) -> Vec<AffinePoint> {
        let mut prefix = Vec::with_capacity(points.len());
        let mut acc = FieldElement::ONE;
        for p in points {
            debug_assert!(!bool::from(p.is_infinity()));
            prefix.push(acc);
            acc = acc.mul(&p.z);
        }

        let mut inv = acc.invert();
        let mut out = alloc::vec![AffinePoint::IDENTITY; points.len()];
        for i in (0..points.len()).rev() {
            let zi = inv.mul(&prefix[i]);
            inv = inv.mul(&points[i].z);
            let zi2 = zi.square();
            let zi3 = zi2.mul(&zi);
            out[i] = AffinePoint::from_raw_coordinates(
                points[i].x.mul(&zi2).normalize(),
                points[i].y.mul(&zi3).normalize(),
            );
        }
        out
    }
}
