// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! This module contains backend-specific constant values, such as the curve
//! parameters in limb form and the fixed offset point used by the
//! fixed-base precomputation.

use super::field::FieldElement52;

/// The x-coordinate of the secp256k1 generator,
/// `0x79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798`.
pub(crate) const GENERATOR_X: FieldElement52 = FieldElement52::from_raw_limbs([
    0x2815b16f81798,
    0xdb2dce28d959f,
    0xe870b07029bfc,
    0xbbac55a06295c,
    0x079be667ef9dc,
]);

/// The y-coordinate of the secp256k1 generator,
/// `0x483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8`.
pub(crate) const GENERATOR_Y: FieldElement52 = FieldElement52::from_raw_limbs([
    0x7d08ffb10d4b8,
    0x48a68554199c4,
    0xe1108a8fd17b4,
    0xc4655da4fbfc0,
    0x0483ada7726a3,
]);

/// The curve equation constant `b = 7` of `y^2 = x^3 + 7`.
pub(crate) const CURVE_B: FieldElement52 = FieldElement52::from_u64(7);

/// The x-coordinate of the table offset point: the SHA-256 digest of the
/// uncompressed generator encoding, interpreted as a field element. The
/// digest happens to be a valid x-coordinate; nobody knows a discrete
/// logarithm for the lifted point.
pub(crate) const OFFSET_X: FieldElement52 = FieldElement52::from_raw_limbs([
    0xfee9ace803ac0,
    0x0f28ec96d547b,
    0x5e97a5e078a5a,
    0x4954b78b4b603,
    0x050929b74c1a0,
]);

/// The even y-coordinate matching [`OFFSET_X`].
pub(crate) const OFFSET_Y: FieldElement52 = FieldElement52::from_raw_limbs([
    0xc2313f3a38904,
    0x8af1766968c30,
    0x1b5f40a36dac2,
    0x926e049e637cb,
    0x031d3c6863973,
]);
