// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! A byte-oriented signer facade over the `p256k1` curve core: BIP-340
//! Schnorr signatures and x-only Diffie-Hellman with 32-byte keys.
//!
//! # Key convention
//!
//! BIP-340 public keys carry only an x-coordinate, with the even-y lift as
//! the canonical point. A [`SigningKey`] therefore normalizes its secret on
//! construction: if the derived public point has odd y, the secret is
//! negated. This keeps [`SigningKey::to_bytes`], the x-only public key, and
//! [`SigningKey::diffie_hellman`] mutually consistent — two parties
//! exchanging x-only keys derive the same shared secret from either side.
//!
//! # Example
//!
//! ```
//! use p256k1_signer::{SigningKey, VerifyingKey};
//!
//! let mut rng = rand::rng();
//! let alice = SigningKey::generate(&mut rng).unwrap();
//! let msg = [0xab; 32];
//! let sig = alice.sign(&msg).unwrap();
//!
//! let verifier = VerifyingKey::from_bytes(&alice.verifying_key().to_bytes()).unwrap();
//! assert!(verifier.verify(&msg, &sig));
//!
//! let bob = SigningKey::generate(&mut rng).unwrap();
//! let ab = alice.diffie_hellman(&bob.verifying_key().to_bytes()).unwrap();
//! let ba = bob.diffie_hellman(&alice.verifying_key().to_bytes()).unwrap();
//! assert_eq!(ab, ba);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::OnceLock;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use p256k1::{shared_secret, sign, verify, Context, ContextFlags, Keypair, XOnlyPublicKey};

pub use p256k1::{Error, Signature};

/// The shared signing-capable context, built on first use.
fn context() -> &'static Context {
    static CONTEXT: OnceLock<Context> = OnceLock::new();
    CONTEXT.get_or_init(|| Context::new(ContextFlags::None))
}

/// A secret key capable of signing, key agreement, and deriving its
/// verification key. Zeroized on drop.
pub struct SigningKey {
    keypair: Keypair,
}

impl SigningKey {
    /// Generate a fresh random signing key.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<SigningKey, Error> {
        let keypair = Keypair::generate(context(), rng)?;
        Ok(SigningKey {
            keypair: keypair.with_even_y(),
        })
    }

    /// Construct a signing key from 32 secret bytes.
    ///
    /// Fails if the bytes are not a canonical nonzero scalar. The secret is
    /// normalized to the even-y convention, so the key that comes back from
    /// [`SigningKey::to_bytes`] may be the negation of the input.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<SigningKey, Error> {
        let keypair = Keypair::from_seckey_bytes(context(), bytes)?;
        Ok(SigningKey {
            keypair: keypair.with_even_y(),
        })
    }

    /// The (normalized) secret scalar bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.keypair.secret_scalar().to_bytes()
    }

    /// The corresponding verification key.
    pub fn verifying_key(&self) -> VerifyingKey {
        let (key, _parity) = self.keypair.xonly_public_key();
        VerifyingKey { key }
    }

    /// Sign a 32-byte message deterministically (no auxiliary randomness).
    pub fn sign(&self, msg: &[u8; 32]) -> Result<Signature, Error> {
        sign(context(), &self.keypair, msg, None)
    }

    /// Sign a 32-byte message, mixing in 32 bytes of auxiliary randomness
    /// as BIP-340 recommends.
    pub fn sign_with_aux_rand(
        &self,
        msg: &[u8; 32],
        aux_rand: &[u8; 32],
    ) -> Result<Signature, Error> {
        sign(context(), &self.keypair, msg, Some(aux_rand))
    }

    /// Verify a signature under this key's verification key.
    pub fn verify(&self, msg: &[u8; 32], signature: &Signature) -> bool {
        self.verifying_key().verify(msg, signature)
    }

    /// Compute the x-only ECDH shared secret with a peer's 32-byte public
    /// key.
    pub fn diffie_hellman(&self, peer_public: &[u8; 32]) -> Result<[u8; 32], Error> {
        let peer = XOnlyPublicKey::from_bytes(peer_public)?;
        // The keypair was normalized to even y on construction, so the
        // secret here matches the x-only public key the peer sees.
        shared_secret(self.keypair.secret_scalar(), &peer)
    }
}

impl Zeroize for SigningKey {
    fn zeroize(&mut self) {
        self.keypair.zeroize();
    }
}

/// A public key capable of verifying signatures and nothing else.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VerifyingKey {
    key: XOnlyPublicKey,
}

impl VerifyingKey {
    /// Parse a 32-byte x-only public key.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<VerifyingKey, Error> {
        Ok(VerifyingKey {
            key: XOnlyPublicKey::from_bytes(bytes)?,
        })
    }

    /// The 32-byte x-only encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.key.to_bytes()
    }

    /// Verify a BIP-340 signature over a 32-byte message.
    pub fn verify(&self, msg: &[u8; 32], signature: &Signature) -> bool {
        verify(context(), signature, msg, &self.key)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_sign_verify() {
        let mut rng = rand::rng();
        let key = SigningKey::generate(&mut rng).unwrap();
        let msg = [7u8; 32];
        let sig = key.sign(&msg).unwrap();
        assert!(key.verify(&msg, &sig));
        assert!(!key.verify(&[8u8; 32], &sig));
    }

    #[test]
    fn even_y_normalization_of_imported_secret() {
        // 0x01...01 derives a public point with odd y, so the stored secret
        // is the negation of the input.
        let key = SigningKey::from_bytes(&[0x01u8; 32]).unwrap();
        assert_eq!(
            hex::encode(key.to_bytes()),
            "fefefefefefefefefefefefefefefefdb9addbe5ae479f3abed15d8bcf354040"
        );
        assert_eq!(
            hex::encode(key.verifying_key().to_bytes()),
            "1b84c5567b126440995d3ed5aaba0565d71e1834604819ff9c17f5e9d5dd078f"
        );

        // An even-y secret imports unchanged.
        let key = SigningKey::from_bytes(&[0x02u8; 32]).unwrap();
        assert_eq!(hex::encode(key.to_bytes()), hex::encode([0x02u8; 32]));
    }

    #[test]
    fn invalid_inputs() {
        assert!(SigningKey::from_bytes(&[0u8; 32]).is_err());
        // x = 5 is not on the curve.
        let mut bad_pk = [0u8; 32];
        bad_pk[31] = 5;
        assert!(VerifyingKey::from_bytes(&bad_pk).is_err());
        let key = SigningKey::from_bytes(&[0x02u8; 32]).unwrap();
        assert!(key.diffie_hellman(&bad_pk).is_err());
    }

    #[test]
    fn ecdh_reference_vector() {
        let a = SigningKey::from_bytes(&[0x01u8; 32]).unwrap();
        let b = SigningKey::from_bytes(&[0x02u8; 32]).unwrap();
        let ab = a.diffie_hellman(&b.verifying_key().to_bytes()).unwrap();
        let ba = b.diffie_hellman(&a.verifying_key().to_bytes()).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(
            hex::encode(ab),
            "33263a206dcc706e9a22d8f837ef150361bf294b75cd53da7c826ba5963f18ae"
        );
    }

    #[test]
    fn signatures_are_interchangeable_between_key_views() {
        let key = SigningKey::from_bytes(&[0x03u8; 32]).unwrap();
        let msg = [0u8; 32];
        let sig = key.sign_with_aux_rand(&msg, &[0u8; 32]).unwrap();
        let standalone = VerifyingKey::from_bytes(&key.verifying_key().to_bytes()).unwrap();
        assert!(standalone.verify(&msg, &sig));
    }
}
