//! Cryptographic operations module.
//!
//! This module provides the RSA primitives used to key and sign the
//! generated certificate chain:
//!
//! - RSA keypair generation at a caller-supplied size
//! - PKCS#1 v1.5 / SHA-256 signing and verification
//! - PKCS#1 and SubjectPublicKeyInfo encodings

pub mod rsa;
