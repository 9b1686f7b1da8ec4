// -*- mode: rust; -*-
//
// This file is part of p256k1.
// See LICENSE for licensing information.

//! Context objects owning the precomputed multiplication tables.
//!
//! A `Context` is built once and is then logically read-only: any number of
//! threads may sign and verify through a shared reference concurrently.
//! [`Context::randomize`] is the only mutator; callers must serialize it
//! against all other use of the same context, which the `&mut self` receiver
//! enforces at the type level.
//!
//! Verification needs only the generator odd-multiples table; a context
//! built with [`Context::verification_only`] skips the (much larger)
//! fixed-base comb, and signing through it fails with
//! [`Error::SigningContextRequired`].

use crate::ecmult::EcmultContext;
use crate::ecmult_gen::EcmultGenContext;
use crate::errors::Error;

/// Flags controlling context construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextFlags {
    /// Ordinary operation.
    #[default]
    None,
    /// Marks the context as belonging to a test harness that deliberately
    /// declassifies secret-dependent state. Has no runtime effect.
    Declassify,
}

/// Precomputed tables for signing and verification.
#[derive(Clone)]
pub struct Context {
    gen: Option<EcmultGenContext>,
    ecmult: EcmultContext,
    flags: ContextFlags,
}

impl Context {
    /// Build a signing-capable context. This precomputes the fixed-base
    /// comb table (64 KiB) and the generator odd-multiples table.
    pub fn new(flags: ContextFlags) -> Context {
        Context {
            gen: Some(EcmultGenContext::new()),
            ecmult: EcmultContext::new(),
            flags,
        }
    }

    /// Build a verification-only context.
    pub fn verification_only(flags: ContextFlags) -> Context {
        Context {
            gen: None,
            ecmult: EcmultContext::new(),
            flags,
        }
    }

    /// Whether this context can serve signing and public-key derivation.
    pub fn can_sign(&self) -> bool {
        self.gen.is_some()
    }

    /// The flags this context was built with.
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Rerandomize the fixed-base blinding from a 32-byte seed; `None`
    /// removes blinding. A no-op on verification-only contexts, which hold
    /// no secret-dependent state to protect.
    pub fn randomize(&mut self, seed: Option<&[u8; 32]>) {
        if let Some(gen) = self.gen.as_mut() {
            gen.randomize(seed);
        }
    }

    /// The fixed-base machinery, or a state error for verification-only
    /// contexts.
    pub(crate) fn gen(&self) -> Result<&EcmultGenContext, Error> {
        self.gen.as_ref().ok_or(Error::SigningContextRequired)
    }

    /// The variable-base machinery.
    pub(crate) fn ecmult(&self) -> &EcmultContext {
        &self.ecmult
    }
}

/// A process-wide verification-only context, built on first use.
///
/// It supports parsing and verification but not signing, and the shared
/// reference rules out rerandomization; signing callers build their own
/// [`Context`].
#[cfg(feature = "std")]
pub fn verification_context() -> &'static Context {
    use std::sync::OnceLock;
    static CONTEXT: OnceLock<Context> = OnceLock::new();
    CONTEXT.get_or_init(|| Context::verification_only(ContextFlags::None))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capabilities() {
        assert!(Context::new(ContextFlags::None).can_sign());
        assert!(!Context::verification_only(ContextFlags::None).can_sign());
        assert_eq!(
            Context::new(ContextFlags::Declassify).flags(),
            ContextFlags::Declassify
        );
    }

    #[test]
    fn clone_is_deep_and_independent() {
        let mut a = Context::new(ContextFlags::None);
        let b = a.clone();
        // Randomizing one must not change results computed with the other.
        a.randomize(Some(&[3u8; 32]));
        let k = crate::scalar::Scalar::from_u64(77);
        let ra = a.gen().unwrap().ecmult_gen(&k).to_affine();
        let rb = b.gen().unwrap().ecmult_gen(&k).to_affine();
        assert_eq!(ra, rb);
    }

    #[cfg(feature = "std")]
    #[test]
    fn static_context_verifies() {
        let ctx = verification_context();
        assert!(!ctx.can_sign());
        // Same instance on repeated calls.
        let again = verification_context();
        assert!(core::ptr::eq(ctx, again));
    }
}
