//! RSA key operations.
//!
//! This module provides functions for generating RSA keypairs and signing
//! certificate bodies with SHA-256 / PKCS#1 v1.5.

use crate::error::{RandCertError, Result};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::EncodePublicKey;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// An RSA keypair consisting of a private key and its public half.
#[derive(Debug, Clone)]
pub struct Keypair {
    pub private: RsaPrivateKey,
    pub public: RsaPublicKey,
}

impl Keypair {
    /// Create a keypair from a private key.
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = private.to_public_key();
        Self { private, public }
    }

    /// Serialize the private key into PKCS#1 DER.
    pub fn private_key_der(&self) -> Result<Vec<u8>> {
        self.private
            .to_pkcs1_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| {
                RandCertError::KeyGeneration(format!("Failed to encode private key: {}", e))
            })
    }

    /// Serialize the public key into SubjectPublicKeyInfo DER.
    pub fn public_key_spki_der(&self) -> Result<Vec<u8>> {
        self.public
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| {
                RandCertError::KeyGeneration(format!("Failed to encode public key: {}", e))
            })
    }

    /// Sign a message with SHA-256 / PKCS#1 v1.5.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signer = SigningKey::<Sha256>::new(self.private.clone());
        let signature = signer
            .try_sign(message)
            .map_err(|e| RandCertError::Certificate(format!("Signing failed: {}", e)))?;
        Ok(signature.to_vec())
    }

    /// Verify a SHA-256 / PKCS#1 v1.5 signature.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let verifier = VerifyingKey::<Sha256>::new(self.public.clone());
        let signature = Signature::try_from(signature)
            .map_err(|e| RandCertError::Certificate(format!("Malformed signature: {}", e)))?;
        verifier
            .verify(message, &signature)
            .map_err(|e| RandCertError::Certificate(format!("Signature verification failed: {}", e)))
    }
}

/// Generate a fresh RSA keypair of the requested bit size.
///
/// The size is caller-supplied and never adjusted: unreasonably small sizes
/// produce weak keys, and sizes the RSA implementation rejects outright
/// (such as 0) surface as [`RandCertError::KeyGeneration`].
///
/// # Example
///
/// ```rust,no_run
/// use randcert::crypto::rsa::generate_rsa_keypair;
///
/// let keypair = generate_rsa_keypair(2048).unwrap();
/// assert!(!keypair.private_key_der().unwrap().is_empty());
/// ```
pub fn generate_rsa_keypair(bits: usize) -> Result<Keypair> {
    let private = RsaPrivateKey::new(&mut OsRng, bits).map_err(|e| {
        RandCertError::KeyGeneration(format!("Failed to generate {}-bit RSA key: {}", bits, e))
    })?;
    Ok(Keypair::from_private(private))
}
