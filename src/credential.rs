//! Credential assembly: PEM armoring and rustls pairing.
//!
//! Turns the chain builder's raw DER output into a certificate + private
//! key pair that a rustls server configuration can consume directly.

use crate::error::{RandCertError, Result};
use log::debug;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use rustls_pemfile::Item;
use std::io::Cursor;
use std::sync::Arc;

/// Wrap certificate DER in a `CERTIFICATE` PEM block.
pub fn cert_to_pem(cert_der: &[u8]) -> String {
    pem::encode(&pem::Pem::new("CERTIFICATE", cert_der.to_vec()))
}

/// Wrap PKCS#1 private key DER in an `RSA PRIVATE KEY` PEM block.
pub fn key_to_pem(key_der: &[u8]) -> String {
    pem::encode(&pem::Pem::new("RSA PRIVATE KEY", key_der.to_vec()))
}

/// A paired leaf certificate and private key ready for a TLS listener.
pub struct TlsCredential {
    /// The leaf certificate, DER-encoded.
    pub cert_chain: Vec<CertificateDer<'static>>,
    /// The leaf private key, PKCS#1 DER-encoded.
    pub key: PrivateKeyDer<'static>,
}

impl TlsCredential {
    /// Build a rustls server configuration using this credential as the
    /// sole server certificate.
    ///
    /// A certificate/key mismatch or an unusable key surfaces here as
    /// [`RandCertError::Credential`].
    pub fn into_server_config(self) -> Result<Arc<ServerConfig>> {
        // Install default crypto provider if not already set
        let _ = rustls::crypto::ring::default_provider().install_default();

        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(self.cert_chain, self.key)
            .map_err(|e| {
                RandCertError::Credential(format!("Certificate and key do not pair: {}", e))
            })?;

        Ok(Arc::new(config))
    }
}

/// Pair leaf certificate and private key DER into a loadable TLS credential.
///
/// Both inputs are armored into PEM and re-parsed, so blocks of the wrong
/// type are rejected here rather than at listener setup.
pub fn to_credential(leaf_cert_der: &[u8], leaf_key_der: &[u8]) -> Result<TlsCredential> {
    let cert_pem = cert_to_pem(leaf_cert_der);
    let key_pem = key_to_pem(leaf_key_der);

    let cert = match read_pem_item(&cert_pem)? {
        Item::X509Certificate(cert) => cert,
        _ => {
            return Err(RandCertError::Pem(
                "PEM block does not contain a certificate".to_string(),
            ))
        }
    };

    let key = match read_pem_item(&key_pem)? {
        Item::Pkcs1Key(key) => PrivateKeyDer::from(key),
        _ => {
            return Err(RandCertError::Pem(
                "PEM block does not contain an RSA private key".to_string(),
            ))
        }
    };

    debug!(
        "assembled TLS credential ({} byte certificate)",
        cert.as_ref().len()
    );

    Ok(TlsCredential {
        cert_chain: vec![cert],
        key,
    })
}

fn read_pem_item(pem_str: &str) -> Result<Item> {
    let mut cursor = Cursor::new(pem_str.as_bytes());
    match rustls_pemfile::read_one(&mut cursor)
        .map_err(|e| RandCertError::Pem(format!("Failed to read PEM: {}", e)))?
    {
        Some(item) => Ok(item),
        None => Err(RandCertError::Pem("Empty PEM input".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::chain::build_chain;

    #[test]
    fn test_cert_to_pem_format() {
        let pem = cert_to_pem(&[1, 2, 3]);
        assert!(pem.contains("BEGIN CERTIFICATE"));
        assert!(pem.contains("END CERTIFICATE"));
    }

    #[test]
    fn test_key_to_pem_format() {
        let pem = key_to_pem(&[1, 2, 3]);
        assert!(pem.contains("BEGIN RSA PRIVATE KEY"));
        assert!(pem.contains("END RSA PRIVATE KEY"));
    }

    #[test]
    fn test_to_credential_preserves_certificate_bytes() {
        let chain = build_chain(512).unwrap();
        let credential = to_credential(&chain.leaf_cert_der, &chain.leaf_key_der).unwrap();

        assert_eq!(credential.cert_chain.len(), 1);
        assert_eq!(
            credential.cert_chain[0].as_ref(),
            chain.leaf_cert_der.as_slice()
        );
        assert!(matches!(credential.key, PrivateKeyDer::Pkcs1(_)));
    }

    #[test]
    fn test_read_pem_item_empty_input() {
        assert!(read_pem_item("").is_err());
    }
}
