//! BIP-340 test vectors and end-to-end signing scenarios.
//!
//! The signing vectors are the first three from the BIP-340 reference test
//! file; they pin down every moving part of the scheme at once (key
//! normalization, aux masking, nonce derivation, challenge hashing).

use p256k1::{sign, verify, Context, ContextFlags, Keypair, Signature, XOnlyPublicKey};

struct SignVector {
    seckey: &'static str,
    pubkey: &'static str,
    aux_rand: &'static str,
    msg: &'static str,
    sig: &'static str,
}

const SIGN_VECTORS: &[SignVector] = &[
    SignVector {
        seckey: "0000000000000000000000000000000000000000000000000000000000000003",
        pubkey: "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9",
        aux_rand: "0000000000000000000000000000000000000000000000000000000000000000",
        msg: "0000000000000000000000000000000000000000000000000000000000000000",
        sig: "e907831f80848d1069a5371b402410364bdf1c5f8307b0084c55f1ce2dca8215\
              25f66a4a85ea8b71e482a74f382d2ce5ebeee8fdb2172f477df4900d310536c0",
    },
    SignVector {
        seckey: "b7e151628aed2a6abf7158809cf4f3c762e7160f38b4da56a784d9045190cfef",
        pubkey: "dff1d77f2a671c5f36183726db2341be58feae1da2deced843240f7b502ba659",
        aux_rand: "0000000000000000000000000000000000000000000000000000000000000001",
        msg: "243f6a8885a308d313198a2e03707344a4093822299f31d0082efa98ec4e6c89",
        sig: "6896bd60eeae296db48a229ff71dfe071bde413e6d43f917dc8dcf8c78de3341\
              8906d11ac976abccb20b091292bff4ea897efcb639ea871cfa95f6de339e4b0a",
    },
    SignVector {
        seckey: "c90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74020bbea63b14e5c9",
        pubkey: "dd308afec5777e13121fa72b9cc1b7cc0139715309b086c960e18fd969774eb8",
        aux_rand: "c87aa53824b4d7ae2eb035a2b5bbbccc080e76cdc6d1692c4b0b62d798e6d906",
        msg: "7e2d58d8b3bcdf1abadec7829054f90dda9805aab56c77333024b9d0a508b75c",
        sig: "5831aaeed7b44bb74e5eab94ba9d4294c49bcf2a60728d8b4c200f50dd313c1b\
              ab745879a5ad954a72c45a91c3a51d3c7adea98d82f8481e0e1e03674a6f3fb7",
    },
];

fn hex32(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hex::decode(s).unwrap());
    out
}

fn hex64(s: &str) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&hex::decode(s).unwrap());
    out
}

#[test]
fn sign_vectors_produce_reference_signatures() {
    let ctx = Context::new(ContextFlags::None);
    for (i, v) in SIGN_VECTORS.iter().enumerate() {
        let keypair = Keypair::from_seckey_bytes(&ctx, &hex32(v.seckey)).unwrap();
        let (pubkey, _) = keypair.xonly_public_key();
        assert_eq!(pubkey.to_bytes(), hex32(v.pubkey), "pubkey, vector {i}");

        let msg = hex32(v.msg);
        let sig = sign(&ctx, &keypair, &msg, Some(&hex32(v.aux_rand))).unwrap();
        assert_eq!(sig.to_bytes(), hex64(v.sig), "signature, vector {i}");

        assert!(verify(&ctx, &sig, &msg, &pubkey), "verify, vector {i}");
    }
}

#[test]
fn reference_signature_verifies_without_signing() {
    // A signature produced by an independent implementation must verify
    // through a verification-only context.
    let ctx = Context::verification_only(ContextFlags::None);
    let v = &SIGN_VECTORS[1];
    let pubkey = XOnlyPublicKey::from_bytes(&hex32(v.pubkey)).unwrap();
    let sig = Signature::from_bytes(&hex64(v.sig));
    assert!(verify(&ctx, &sig, &hex32(v.msg), &pubkey));
}

#[test]
fn every_single_bit_flip_invalidates_the_signature() {
    let ctx = Context::new(ContextFlags::None);
    let v = &SIGN_VECTORS[0];
    let pubkey = XOnlyPublicKey::from_bytes(&hex32(v.pubkey)).unwrap();
    let msg = hex32(v.msg);
    let good = hex64(v.sig);

    for bit in 0..512 {
        let mut bad = good;
        bad[bit / 8] ^= 1 << (bit % 8);
        assert!(
            !verify(&ctx, &Signature::from_bytes(&bad), &msg, &pubkey),
            "flipped bit {bit} still verified"
        );
    }
}

#[test]
fn signing_is_deterministic_for_fixed_aux() {
    let ctx = Context::new(ContextFlags::None);
    let keypair = Keypair::from_seckey_bytes(&ctx, &hex32(SIGN_VECTORS[2].seckey)).unwrap();
    let msg = [0x5au8; 32];
    let a = sign(&ctx, &keypair, &msg, Some(&[0u8; 32])).unwrap();
    let b = sign(&ctx, &keypair, &msg, Some(&[0u8; 32])).unwrap();
    assert_eq!(a, b);
    // Different aux randomness moves the nonce, but both must verify.
    let c = sign(&ctx, &keypair, &msg, Some(&[1u8; 32])).unwrap();
    assert_ne!(a, c);
    let (pubkey, _) = keypair.xonly_public_key();
    assert!(verify(&ctx, &a, &msg, &pubkey));
    assert!(verify(&ctx, &c, &msg, &pubkey));
}

#[test]
fn wrong_message_and_wrong_key_fail() {
    let ctx = Context::new(ContextFlags::None);
    let v = &SIGN_VECTORS[0];
    let sig = Signature::from_bytes(&hex64(v.sig));
    let pubkey = XOnlyPublicKey::from_bytes(&hex32(v.pubkey)).unwrap();

    let mut other_msg = hex32(v.msg);
    other_msg[0] ^= 0xff;
    assert!(!verify(&ctx, &sig, &other_msg, &pubkey));

    let other_key = XOnlyPublicKey::from_bytes(&hex32(SIGN_VECTORS[1].pubkey)).unwrap();
    assert!(!verify(&ctx, &sig, &hex32(v.msg), &other_key));
}

#[test]
fn messages_of_arbitrary_length_round_trip() {
    let ctx = Context::new(ContextFlags::None);
    let keypair = Keypair::from_seckey_bytes(&ctx, &hex32(SIGN_VECTORS[1].seckey)).unwrap();
    let (pubkey, _) = keypair.xonly_public_key();

    for msg in [&b""[..], &b"x"[..], &[0u8; 100][..]] {
        let sig = sign(&ctx, &keypair, msg, None).unwrap();
        assert!(verify(&ctx, &sig, msg, &pubkey), "len {}", msg.len());
    }
}

#[test]
fn randomized_keys_round_trip() {
    use rand::RngCore;

    let ctx = Context::new(ContextFlags::None);
    let mut rng = rand::rng();
    for _ in 0..8 {
        let mut sk = [0u8; 32];
        rng.fill_bytes(&mut sk);
        let keypair = match Keypair::from_seckey_bytes(&ctx, &sk) {
            Ok(kp) => kp,
            // Out-of-range draws are astronomically unlikely but legal.
            Err(_) => continue,
        };
        let (pubkey, _) = keypair.xonly_public_key();

        let mut msg = [0u8; 32];
        rng.fill_bytes(&mut msg);
        let mut aux = [0u8; 32];
        rng.fill_bytes(&mut aux);

        let sig = sign(&ctx, &keypair, &msg, Some(&aux)).unwrap();
        assert!(verify(&ctx, &sig, &msg, &pubkey));
    }
}

#[test]
fn off_curve_x_only_key_is_rejected() {
    // From the BIP-340 verification vectors: this x does not name a point.
    let bad = hex32("eefdea4cdb677750a420fee807eacf21eb9898ae79b9768766e4faa04a2d4a34");
    assert!(XOnlyPublicKey::from_bytes(&bad).is_err());
}
