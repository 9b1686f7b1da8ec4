// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Code for fixed- and sliding-window functionality.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::affine::AffinePoint;
use crate::jacobian::JacobianPoint;

/// A lookup table of precomputed multiples of a point \\(P\\), used to
/// compute \\(xP\\) for \\(-8 \leq x \leq 8\\) in constant time.
///
/// The computation of \\(xP\\) is done in constant time by the `select`
/// function, which scans every entry and combines the match with masks.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LookupTable(pub(crate) [AffinePoint; 8]);

impl LookupTable {
    /// Given \\(-8 \leq x \leq 8\\), return \\(xP\\) in constant time.
    ///
    /// A zero digit yields the identity, which the complete addition
    /// formulas absorb.
    pub fn select(&self, x: i8) -> AffinePoint {
        debug_assert!(x >= -8);
        debug_assert!(x <= 8);

        // Compute xabs = |x|.
        let xmask = x >> 7;
        let xabs = ((x + xmask) ^ xmask) as u8;

        // Scan the whole table; keep only the matching entry.
        let mut t = AffinePoint::IDENTITY;
        for j in 1..9u8 {
            let c = xabs.ct_eq(&j);
            t = AffinePoint::conditional_select(&t, &self.0[j as usize - 1], c);
        }
        // Now t == |x| * P; negate if x was negative.
        t.conditional_negate_y(Choice::from((xmask & 1) as u8))
    }
}

impl From<&AffinePoint> for LookupTable {
    /// Build the table \\([P, 2P, \ldots, 8P]\\).
    ///
    /// The chained additions go through the complete constant-time formula
    /// (the second step is a doubling), and the batch is normalized back to
    /// affine with a single inversion.
    fn from(p: &AffinePoint) -> Self {
        debug_assert!(!bool::from(p.is_infinity()));
        let mut jac = [JacobianPoint::from_affine(p); 8];
        for j in 0..7 {
            jac[j + 1] = jac[j].add_affine(p);
        }
        let affine = JacobianPoint::batch_to_affine(&jac);
        let mut points = [AffinePoint::IDENTITY; 8];
        points.copy_from_slice(&affine);
        LookupTable(points)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::GENERATOR;

    #[test]
    fn select_matches_sign_and_magnitude() {
        let table = LookupTable::from(&GENERATOR);
        assert!(bool::from(table.select(0).is_infinity()));
        assert_eq!(table.select(1), GENERATOR);
        assert_eq!(table.select(-1), GENERATOR.negate());

        let five = JacobianPoint::from_affine(&GENERATOR)
            .double()
            .double()
            .add_affine_var(&GENERATOR)
            .to_affine();
        assert_eq!(table.select(5), five);
        assert_eq!(table.select(-5), five.negate());

        let eight = JacobianPoint::from_affine(&GENERATOR)
            .double()
            .double()
            .double()
            .to_affine();
        assert_eq!(table.select(8), eight);
    }
}
