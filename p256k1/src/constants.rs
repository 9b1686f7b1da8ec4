// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Various constants, such as the secp256k1 base point and group order.

use crate::affine::AffinePoint;
use crate::backend::serial::u64::constants as backend;

/// The secp256k1 base point, as an [`AffinePoint`].
pub const GENERATOR: AffinePoint =
    AffinePoint::from_raw_coordinates(backend::GENERATOR_X, backend::GENERATOR_Y);

/// The order of the secp256k1 group, as 32 big-endian bytes.
pub const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
    0x41, 0x41,
];

/// The field characteristic \\(p = 2\^{256} - 2\^{32} - 977\\), as 32
/// big-endian bytes.
pub const FIELD_SIZE: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff,
    0xfc, 0x2f,
];

#[cfg(test)]
mod test {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn generator_coordinates_match_reference_bytes() {
        let bytes = GENERATOR.to_bytes();
        assert_eq!(
            hex::encode(bytes),
            concat!(
                "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
                "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
            )
        );
    }

    #[test]
    fn order_bytes_are_the_scalar_modulus() {
        // n reduces to zero as a scalar.
        let (s, overflow) = Scalar::from_bytes_reduced(&CURVE_ORDER);
        assert!(bool::from(overflow));
        assert!(bool::from(s.is_zero()));
    }

    #[test]
    fn field_size_bytes_reduce_to_zero() {
        use crate::field::FieldElement;
        assert!(bool::from(
            FieldElement::from_bytes_mod(&FIELD_SIZE).is_zero()
        ));
    }
}
