//! randcert: randomized X.509 certificate chains for ephemeral TLS.
//!
//! This library fabricates a plausible-looking but entirely synthetic
//! certificate chain — a self-signed root authority and a server leaf it
//! signs — with randomized identities, serial numbers, key identifiers,
//! and validity windows, then packages the leaf as a credential a rustls
//! server can present. Useful for tests, decoys, and ephemeral endpoints
//! where no real certificate authority is wanted.
//!
//! # Architecture
//!
//! Generation is three composed stages with strictly forward data flow:
//! secure randomness ([`random`]) feeds certificate descriptors and keys
//! ([`cert`], [`crypto`]), whose signed DER output is armored and paired
//! into a TLS credential ([`credential`]). Each call is independent and
//! synchronous; nothing is cached or shared between invocations, and all
//! failures return `Result` errors rather than degraded output.
//!
//! # Example
//!
//! ```rust,no_run
//! use randcert::generate_random_credential;
//!
//! fn example() -> randcert::Result<()> {
//!     let credential = generate_random_credential(2048)?;
//!     let config = credential.into_server_config()?;
//!     // hand `config` to a TLS listener
//!     # let _ = config;
//!     Ok(())
//! }
//! ```

pub mod cert;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod random;

// Re-export commonly used types
pub use cert::chain::{build_chain, CertificateChain};
pub use credential::{to_credential, TlsCredential};
pub use error::{RandCertError, Result};

/// Generate a fresh randomized TLS credential.
///
/// Builds a complete chain with RSA keys of `key_size` bits and returns
/// only the leaf certificate and key, paired and ready for a TLS listener.
/// The root signs the leaf and is then discarded; callers who want the
/// root material as well should use [`build_chain`] directly.
pub fn generate_random_credential(key_size: usize) -> Result<TlsCredential> {
    let chain = build_chain(key_size)?;
    to_credential(&chain.leaf_cert_der, &chain.leaf_key_der)
}
