// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Elliptic-curve Diffie-Hellman over x-only public keys.
//!
//! The shared secret for local secret \\(d\\) and peer point \\(P\\) (lifted
//! with even y) is the SHA-256 digest of the compressed serialization of
//! \\(dP\\). Hashing the whole compressed point, parity byte included,
//! matches the behavior callers of the original signer agreed on, and keeps
//! the output independent of which party computes it.

use zeroize::Zeroize;

use crate::ecmult::ecmult_const;
use crate::errors::Error;
use crate::hash::Sha256;
use crate::scalar::Scalar;
use crate::schnorr::XOnlyPublicKey;

/// Compute the 32-byte ECDH shared secret between `seckey` and `peer`.
///
/// The point multiplication is constant time in the secret scalar. Fails if
/// the secret is zero.
pub fn shared_secret(seckey: &Scalar, peer: &XOnlyPublicKey) -> Result<[u8; 32], Error> {
    if bool::from(seckey.is_zero()) {
        return Err(Error::InvalidSecretKey);
    }

    let mut q = ecmult_const(peer.point(), seckey);
    let mut q_affine = q.to_affine();

    // Compressed serialization: parity tag then x. The tag byte is computed
    // arithmetically, not by branching on the secret-derived parity.
    let mut buf = [0u8; 33];
    buf[0] = 0x02 + q_affine.y_is_odd().unwrap_u8();
    buf[1..33].copy_from_slice(&q_affine.x().to_bytes());

    let mut h = Sha256::new();
    h.update(&buf);
    let out = h.finalize();

    buf.zeroize();
    q_affine.zeroize();
    q.zeroize();
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::{Context, ContextFlags};
    use crate::keypair::Keypair;

    #[test]
    fn symmetric_between_both_sides() {
        let ctx = Context::new(ContextFlags::None);
        // Both keypairs normalized to even y, matching the signer facade's
        // convention.
        let a = Keypair::from_seckey_bytes(&ctx, &[0x01u8; 32])
            .unwrap()
            .with_even_y();
        let b = Keypair::from_seckey_bytes(&ctx, &[0x02u8; 32])
            .unwrap()
            .with_even_y();

        let (pk_a, _) = a.xonly_public_key();
        let (pk_b, _) = b.xonly_public_key();

        let s_ab = shared_secret(a.secret_scalar(), &pk_b).unwrap();
        let s_ba = shared_secret(b.secret_scalar(), &pk_a).unwrap();
        assert_eq!(s_ab, s_ba);
        assert_eq!(
            hex::encode(s_ab),
            "33263a206dcc706e9a22d8f837ef150361bf294b75cd53da7c826ba5963f18ae"
        );
    }

    #[test]
    fn zero_secret_fails() {
        let ctx = Context::new(ContextFlags::None);
        let b = Keypair::from_seckey_bytes(&ctx, &[0x02u8; 32]).unwrap();
        let (pk_b, _) = b.xonly_public_key();
        assert_eq!(
            shared_secret(&Scalar::ZERO, &pk_b).err(),
            Some(Error::InvalidSecretKey)
        );
    }
}
