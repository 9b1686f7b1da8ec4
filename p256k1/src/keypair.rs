// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Secret/public keypairs.
//!
//! A `Keypair` carries a secret scalar together with its precomputed public
//! point, so signing never recomputes the public key. The opaque encoding
//! is 96 bytes: the 32-byte secret scalar followed by the 64-byte packed
//! point. Secrets are zeroized when the keypair is dropped.

use subtle::{Choice, ConditionallyNegatable};
use zeroize::Zeroize;

#[cfg(feature = "rand_core")]
use rand_core::{CryptoRng, RngCore};

use crate::affine::AffinePoint;
use crate::context::Context;
use crate::errors::Error;
use crate::scalar::Scalar;
use crate::schnorr::XOnlyPublicKey;

/// A secp256k1 keypair.
#[derive(Clone)]
pub struct Keypair {
    secret: Scalar,
    public: AffinePoint,
}

impl Keypair {
    /// Derive a keypair from 32 secret-key bytes.
    ///
    /// Fails unless the bytes encode a canonical nonzero scalar. Requires a
    /// signing-capable context for the public-key derivation.
    pub fn from_seckey_bytes(ctx: &Context, bytes: &[u8; 32]) -> Result<Keypair, Error> {
        let gen = ctx.gen()?;
        let secret = Scalar::from_seckey_bytes(bytes);
        if !bool::from(secret.is_some()) {
            return Err(Error::InvalidSecretKey);
        }
        let secret = secret.unwrap();
        let public = gen.ecmult_gen(&secret).to_affine();
        Ok(Keypair { secret, public })
    }

    /// Generate a fresh random keypair.
    ///
    /// Rejection-samples the secret scalar, so the retry loop is entered
    /// with probability about \\(2\^{-128}\\).
    #[cfg(feature = "rand_core")]
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        ctx: &Context,
        rng: &mut R,
    ) -> Result<Keypair, Error> {
        let gen = ctx.gen()?;
        let mut secret = Scalar::random(rng);
        while bool::from(secret.is_zero()) {
            secret = Scalar::random(rng);
        }
        let public = gen.ecmult_gen(&secret).to_affine();
        Ok(Keypair { secret, public })
    }

    /// Serialize to the opaque 96-byte form.
    pub fn to_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[0..32].copy_from_slice(&self.secret.to_bytes());
        out[32..96].copy_from_slice(&self.public.to_bytes());
        out
    }

    /// Parse the opaque 96-byte form.
    ///
    /// Validates that the secret scalar is canonical and nonzero and that
    /// the stored point is on the curve; it does not re-derive the point
    /// from the scalar.
    pub fn from_bytes(bytes: &[u8; 96]) -> Result<Keypair, Error> {
        let mut sk = [0u8; 32];
        sk.copy_from_slice(&bytes[0..32]);
        let secret = Scalar::from_seckey_bytes(&sk);
        sk.zeroize();
        if !bool::from(secret.is_some()) {
            return Err(Error::InvalidKeypair);
        }

        let mut pk = [0u8; 64];
        pk.copy_from_slice(&bytes[32..96]);
        let public = AffinePoint::from_bytes(&pk).map_err(|_| Error::InvalidKeypair)?;

        Ok(Keypair {
            secret: secret.unwrap(),
            public,
        })
    }

    /// The public point.
    pub fn public_key(&self) -> &AffinePoint {
        &self.public
    }

    /// The x-only public key and the parity of the full point's
    /// y-coordinate (set means odd).
    pub fn xonly_public_key(&self) -> (XOnlyPublicKey, Choice) {
        let parity = self.public.y_is_odd();
        (
            XOnlyPublicKey::from_even_point(self.public.conditional_negate_y(parity)),
            parity,
        )
    }

    /// Normalize the keypair so the public point has even y, negating the
    /// secret if necessary. Constant time.
    ///
    /// Key-agreement callers use this so that x-only views of the public
    /// key agree with the secret they hold.
    pub fn with_even_y(mut self) -> Keypair {
        let parity = self.public.y_is_odd();
        self.secret.conditional_negate(parity);
        self.public = self.public.conditional_negate_y(parity);
        self
    }

    /// The secret scalar.
    pub fn secret_scalar(&self) -> &Scalar {
        &self.secret
    }
}

impl Zeroize for Keypair {
    fn zeroize(&mut self) {
        self.secret.zeroize();
        self.public.zeroize();
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::{Context, ContextFlags};

    fn ctx() -> Context {
        Context::new(ContextFlags::None)
    }

    #[test]
    fn known_seckey_three() {
        let mut sk = [0u8; 32];
        sk[31] = 3;
        let kp = Keypair::from_seckey_bytes(&ctx(), &sk).unwrap();
        let (xonly, _) = kp.xonly_public_key();
        assert_eq!(
            hex::encode(xonly.to_bytes()),
            "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
    }

    #[test]
    fn invalid_seckeys_rejected() {
        let c = ctx();
        assert_eq!(
            Keypair::from_seckey_bytes(&c, &[0u8; 32]).err(),
            Some(Error::InvalidSecretKey)
        );
        // The group order itself is out of range.
        let mut n = [0u8; 32];
        n.copy_from_slice(
            &hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap(),
        );
        assert_eq!(
            Keypair::from_seckey_bytes(&c, &n).err(),
            Some(Error::InvalidSecretKey)
        );
    }

    #[test]
    fn bytes_round_trip() {
        let mut sk = [0u8; 32];
        sk[31] = 42;
        let kp = Keypair::from_seckey_bytes(&ctx(), &sk).unwrap();
        let restored = Keypair::from_bytes(&kp.to_bytes()).unwrap();
        assert_eq!(restored.to_bytes(), kp.to_bytes());
    }

    #[test]
    fn corrupted_encoding_rejected() {
        let mut sk = [0u8; 32];
        sk[31] = 42;
        let kp = Keypair::from_seckey_bytes(&ctx(), &sk).unwrap();
        let mut bytes = kp.to_bytes();
        bytes[40] ^= 1; // breaks the curve equation
        assert_eq!(Keypair::from_bytes(&bytes).err(), Some(Error::InvalidKeypair));
    }

    #[test]
    fn even_y_normalization_is_consistent() {
        let c = ctx();
        let kp = Keypair::from_seckey_bytes(&c, &[0x01u8; 32]).unwrap().with_even_y();
        assert!(!bool::from(kp.public_key().y_is_odd()));
        // The normalized secret still derives the normalized point.
        let rederived = c.gen().unwrap().ecmult_gen(kp.secret_scalar()).to_affine();
        assert_eq!(rederived, *kp.public_key());
    }

    #[test]
    fn verification_context_cannot_derive() {
        let c = Context::verification_only(ContextFlags::None);
        let mut sk = [0u8; 32];
        sk[31] = 3;
        assert_eq!(
            Keypair::from_seckey_bytes(&c, &sk).err(),
            Some(Error::SigningContextRequired)
        );
    }
}
