//! Ed25519 signing and verification using aws-lc-rs

use aws_lc_rs::rand::{SecureRandom, SystemRandom};
use aws_lc_rs::signature::{Ed25519KeyPair, KeyPair as _, UnparsedPublicKey, ED25519};

use crate::error::{Error, Result};

/// Length of an Ed25519 private seed in bytes
pub const SEED_LEN: usize = 32;

/// Length of an Ed25519 public point in bytes
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature in bytes
pub const SIGNATURE_LEN: usize = 64;

/// An Ed25519 signing key, constructed from a raw 32-byte seed.
pub struct SigningKey {
    keypair: Ed25519KeyPair,
    seed: [u8; SEED_LEN],
}

impl SigningKey {
    /// Derives the key pair from a raw seed.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Result<Self> {
        let keypair = Ed25519KeyPair::from_seed_unchecked(seed)?;
        Ok(Self {
            keypair,
            seed: *seed,
        })
    }

    /// Generates a fresh key from the system RNG.
    pub fn generate() -> Result<Self> {
        let rng = SystemRandom::new();
        let mut seed = [0u8; SEED_LEN];
        rng.fill(&mut seed)?;
        Self::from_seed(&seed)
    }

    /// The raw seed this key was derived from.
    pub fn seed(&self) -> &[u8; SEED_LEN] {
        &self.seed
    }

    /// The matching public key.
    pub fn verifying_key(&self) -> VerifyingKey {
        let mut point = [0u8; PUBLIC_KEY_LEN];
        point.copy_from_slice(self.keypair.public_key().as_ref());
        VerifyingKey::new(point)
    }

    /// Signs a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        let signature = self.keypair.sign(message);
        let mut out = [0u8; SIGNATURE_LEN];
        out.copy_from_slice(signature.as_ref());
        out
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the seed
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

/// An Ed25519 public key as a raw 32-byte point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyingKey([u8; PUBLIC_KEY_LEN]);

impl VerifyingKey {
    pub fn new(point: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(point)
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(Error::InvalidKey(format!(
                "Ed25519 public key must be {PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut point = [0u8; PUBLIC_KEY_LEN];
        point.copy_from_slice(bytes);
        Ok(Self(point))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Verifies a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let key = UnparsedPublicKey::new(&ED25519, &self.0);
        key.verify(message, signature)
            .map_err(|_| Error::Verification("Ed25519 signature invalid".to_string()))
    }
}
