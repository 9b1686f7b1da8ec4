// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! BIP-340 Schnorr signatures.
//!
//! Signing is deterministic given `(seckey, msg, aux_rand)` and follows the
//! BIP-340 default signing algorithm: the secret is normalized to an even-y
//! public point, masked with the tagged hash of the auxiliary randomness,
//! and the nonce and challenge come from the `BIP0340/nonce` and
//! `BIP0340/challenge` tagged hashes.
//!
//! The only intrinsic failure is the nonce reducing to zero, which has
//! vanishing probability. Signing does not branch on it: the failure is
//! folded into a mask, the nonce is replaced by one so the remaining
//! arithmetic stays well-defined, and the mask conditionally wipes the
//! output buffer before the error surfaces.
//!
//! Verification is variable time; it handles no secrets.

use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::affine::AffinePoint;
use crate::context::Context;
use crate::errors::Error;
use crate::field::FieldElement;
use crate::hash::{Sha256, Tag};
use crate::keypair::Keypair;
use crate::scalar::Scalar;

/// `TaggedSHA256("BIP0340/aux", [0u8; 32])`: the key mask applied when the
/// caller provides no auxiliary randomness.
const ZERO_AUX_MASK: [u8; 32] = [
    0x54, 0xf1, 0x69, 0xcf, 0xc9, 0xe2, 0xe5, 0x72, 0x74, 0x80, 0x44, 0x1f, 0x90, 0xba, 0x25,
    0xc4, 0x88, 0xf4, 0x61, 0xc7, 0x0b, 0x5e, 0xa5, 0xdc, 0xaa, 0xf7, 0xaf, 0x69, 0x27, 0x0a,
    0xa5, 0x14,
];

/// A 64-byte BIP-340 Schnorr signature: the x-coordinate of the nonce point
/// followed by the response scalar, both big-endian.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Signature(pub(crate) [u8; 64]);

impl Signature {
    /// Wrap raw signature bytes. Range validation happens at verification.
    pub fn from_bytes(bytes: &[u8; 64]) -> Signature {
        Signature(*bytes)
    }

    /// The signature bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    /// Borrow the signature bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

/// A BIP-340 x-only public key: a curve point with implicitly even y.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct XOnlyPublicKey {
    point: AffinePoint,
}

impl XOnlyPublicKey {
    /// Parse a 32-byte x-only public key, lifting to the even-y point.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<XOnlyPublicKey, Error> {
        let (x, in_range) = FieldElement::from_bytes(bytes);
        if !bool::from(in_range) {
            return Err(Error::InvalidPublicKey);
        }
        let point = AffinePoint::lift_x(&x, Choice::from(0u8));
        if bool::from(point.is_some()) {
            Ok(XOnlyPublicKey {
                point: point.unwrap(),
            })
        } else {
            Err(Error::InvalidPublicKey)
        }
    }

    /// Wrap a point already known to have even y.
    pub(crate) fn from_even_point(point: AffinePoint) -> XOnlyPublicKey {
        debug_assert!(!bool::from(point.y_is_odd()));
        XOnlyPublicKey { point }
    }

    /// Serialize to the 32-byte x-only form.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.point.x().to_bytes()
    }

    /// The underlying even-y point.
    pub(crate) fn point(&self) -> &AffinePoint {
        &self.point
    }
}

/// Overwrite `buf` with zeros iff `flag` is set, in constant time.
fn conditional_clear(buf: &mut [u8], flag: Choice) {
    for byte in buf.iter_mut() {
        *byte = u8::conditional_select(byte, &0, flag);
    }
}

/// Produce a BIP-340 signature over `msg`.
///
/// `aux_rand` is the optional 32-byte auxiliary randomness; omitting it
/// makes the signature a pure function of `(seckey, msg)`. Requires a
/// signing-capable context.
pub fn sign(
    ctx: &Context,
    keypair: &Keypair,
    msg: &[u8],
    aux_rand: Option<&[u8; 32]>,
) -> Result<Signature, Error> {
    let gen = ctx.gen()?;

    // Normalize the secret to the even-y public point.
    let public = keypair.public_key();
    let pk_bytes = public.x().to_bytes();
    let mut d = *keypair.secret_scalar();
    d.conditional_negate(public.y_is_odd());

    // Mask the secret with the (possibly absent) auxiliary randomness.
    let mask = match aux_rand {
        Some(aux) => {
            let mut h = Sha256::tagged(Tag::Aux);
            h.update(aux);
            h.finalize()
        }
        None => ZERO_AUX_MASK,
    };
    let mut t = d.to_bytes();
    for (b, m) in t.iter_mut().zip(mask.iter()) {
        *b ^= m;
    }

    // Derive the nonce.
    let mut h = Sha256::tagged(Tag::Nonce);
    h.update(&t);
    h.update(&pk_bytes);
    h.update(msg);
    let mut nonce_bytes = h.finalize();
    t.zeroize();

    let (k0, _) = Scalar::from_bytes_reduced(&nonce_bytes);
    nonce_bytes.zeroize();
    let failure = k0.is_zero();
    // Substitute k = 1 on failure so the remaining computation is defined;
    // the output is wiped below either way.
    let mut k = Scalar::conditional_select(&k0, &Scalar::ONE, failure);

    let r_point = gen.ecmult_gen(&k).to_affine();
    k.conditional_negate(r_point.y_is_odd());

    let mut sig = [0u8; 64];
    sig[0..32].copy_from_slice(&r_point.x().to_bytes());

    let mut h = Sha256::tagged(Tag::Challenge);
    h.update(&sig[0..32]);
    h.update(&pk_bytes);
    h.update(msg);
    let (e, _) = Scalar::from_bytes_reduced(&h.finalize());

    let s = &k + &(&e * &d);
    sig[32..64].copy_from_slice(&s.to_bytes());

    k.zeroize();
    d.zeroize();

    conditional_clear(&mut sig, failure);
    if bool::from(failure) {
        Err(Error::NonceGeneration)
    } else {
        Ok(Signature(sig))
    }
}

/// Verify a BIP-340 signature over `msg`. Variable time.
pub fn verify(ctx: &Context, sig: &Signature, msg: &[u8], pubkey: &XOnlyPublicKey) -> bool {
    let mut rb = [0u8; 32];
    rb.copy_from_slice(&sig.0[0..32]);
    let (r, r_in_range) = FieldElement::from_bytes(&rb);
    if !bool::from(r_in_range) {
        return false;
    }

    let mut sb = [0u8; 32];
    sb.copy_from_slice(&sig.0[32..64]);
    let s = Scalar::from_bytes(&sb);
    if !bool::from(s.is_some()) {
        return false;
    }
    let s = s.unwrap();

    let mut h = Sha256::tagged(Tag::Challenge);
    h.update(&sig.0[0..32]);
    h.update(&pubkey.to_bytes());
    h.update(msg);
    let (e, _) = Scalar::from_bytes_reduced(&h.finalize());

    // R = sG - eP.
    let r_point = ctx.ecmult().lincomb_var(pubkey.point(), &e.negate(), &s);
    if bool::from(r_point.is_infinity()) {
        return false;
    }
    let r_affine = r_point.to_affine();

    !bool::from(r_affine.y_is_odd()) && bool::from(r_affine.x().ct_eq(&r))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::{Context, ContextFlags};

    fn ctx() -> Context {
        Context::new(ContextFlags::None)
    }

    fn keypair(c: &Context, sk_hex: &str) -> Keypair {
        let mut sk = [0u8; 32];
        sk.copy_from_slice(&hex::decode(sk_hex).unwrap());
        Keypair::from_seckey_bytes(c, &sk).unwrap()
    }

    #[test]
    fn deterministic_with_zero_aux() {
        let c = ctx();
        let kp = keypair(
            &c,
            "0101010101010101010101010101010101010101010101010101010101010101",
        );
        let msg = [0x42u8; 32];
        let sig1 = sign(&c, &kp, &msg, Some(&[0u8; 32])).unwrap();
        let sig2 = sign(&c, &kp, &msg, Some(&[0u8; 32])).unwrap();
        assert_eq!(sig1, sig2);
        // Absent aux randomness uses the precomputed zero mask.
        let sig3 = sign(&c, &kp, &msg, None).unwrap();
        assert_eq!(sig1, sig3);
        assert_eq!(
            hex::encode(sig1.to_bytes()),
            "986772fa32fddf568c8232f0d3c53a88198c50bfa48958b0f67739ed06c19cdd\
             d144182bff50a47670162a6a785a81a68c79fc95f6e17e5cfc5b9b79b1b92c97"
        );
    }

    #[test]
    fn sign_verify_round_trip() {
        let c = ctx();
        let kp = keypair(
            &c,
            "000000000000000000000000000000000000000000000000000000000000000b",
        );
        let (pk, _) = kp.xonly_public_key();
        let msg = b"this message is not even 32 bytes long";
        let sig = sign(&c, &kp, msg, Some(&[9u8; 32])).unwrap();
        assert!(verify(&c, &sig, msg, &pk));
        assert!(!verify(&c, &sig, b"a different message", &pk));
    }

    #[test]
    fn odd_y_keypair_signs_correctly() {
        let c = ctx();
        // This secret key derives a public point with odd y.
        let kp = keypair(
            &c,
            "0101010101010101010101010101010101010101010101010101010101010101",
        );
        assert!(bool::from(kp.public_key().y_is_odd()));
        let (pk, parity) = kp.xonly_public_key();
        assert!(bool::from(parity));
        let sig = sign(&c, &kp, &[0u8; 32], None).unwrap();
        assert!(verify(&c, &sig, &[0u8; 32], &pk));
    }

    #[test]
    fn high_s_is_rejected() {
        let c = ctx();
        let kp = keypair(
            &c,
            "000000000000000000000000000000000000000000000000000000000000000b",
        );
        let (pk, _) = kp.xonly_public_key();
        let msg = [1u8; 32];
        let sig = sign(&c, &kp, &msg, None).unwrap();
        // Replace s with n, which must fail the range check.
        let mut bad = sig.to_bytes();
        bad[32..64].copy_from_slice(
            &hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap(),
        );
        assert!(!verify(&c, &Signature::from_bytes(&bad), &msg, &pk));
    }

    #[test]
    fn r_at_field_size_is_rejected() {
        let c = ctx();
        let kp = keypair(
            &c,
            "000000000000000000000000000000000000000000000000000000000000000b",
        );
        let (pk, _) = kp.xonly_public_key();
        let msg = [1u8; 32];
        let sig = sign(&c, &kp, &msg, None).unwrap();
        let mut bad = sig.to_bytes();
        bad[0..32].copy_from_slice(
            &hex::decode("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")
                .unwrap(),
        );
        assert!(!verify(&c, &Signature::from_bytes(&bad), &msg, &pk));
    }

    #[test]
    fn xonly_pubkey_parsing() {
        // x = 5 is not on the curve.
        let mut bad = [0u8; 32];
        bad[31] = 5;
        assert_eq!(
            XOnlyPublicKey::from_bytes(&bad).err(),
            Some(Error::InvalidPublicKey)
        );
        // x at the field size is out of range.
        let mut too_big = [0u8; 32];
        too_big.copy_from_slice(
            &hex::decode("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")
                .unwrap(),
        );
        assert_eq!(
            XOnlyPublicKey::from_bytes(&too_big).err(),
            Some(Error::InvalidPublicKey)
        );

        let good = hex::decode("f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9")
            .unwrap();
        let mut gb = [0u8; 32];
        gb.copy_from_slice(&good);
        let pk = XOnlyPublicKey::from_bytes(&gb).unwrap();
        assert_eq!(pk.to_bytes(), gb);
        assert!(!bool::from(pk.point().y_is_odd()));
    }

    #[test]
    fn verification_only_context_cannot_sign() {
        let c = ctx();
        let kp = keypair(
            &c,
            "000000000000000000000000000000000000000000000000000000000000000b",
        );
        let vc = Context::verification_only(ContextFlags::None);
        assert_eq!(
            sign(&vc, &kp, &[0u8; 32], None).err(),
            Some(Error::SigningContextRequired)
        );
    }
}
