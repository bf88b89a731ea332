//! Chain construction: a self-signed root and the leaf it signs.

use crate::cert::builder::{self, Identity};
use crate::crypto::rsa::{generate_rsa_keypair, Keypair};
use crate::error::{RandCertError, Result};
use crate::random;
use der::asn1::BitString;
use der::Encode;
use log::debug;
use x509_cert::certificate::Version;
use x509_cert::name::Name;
use x509_cert::time::Validity;
use x509_cert::{Certificate, TbsCertificate};

/// Subject key identifier length for the root certificate.
const ROOT_SKI_LEN: usize = 5;
/// Subject key identifier length for the leaf certificate.
const LEAF_SKI_LEN: usize = 6;

/// DER material for a generated chain.
///
/// Certificates are X.509 DER, private keys PKCS#1 DER. The root is
/// self-signed and also signs the leaf. Root material is exposed so
/// callers can validate the chain themselves; the convenience API in the
/// crate root only hands out the leaf credential.
#[derive(Debug, Clone)]
pub struct CertificateChain {
    pub root_cert_der: Vec<u8>,
    pub root_key_der: Vec<u8>,
    pub leaf_cert_der: Vec<u8>,
    pub leaf_key_der: Vec<u8>,
}

/// Randomized descriptor for one certificate in the chain.
struct Descriptor {
    identity: Identity,
    serial: [u8; 16],
    subject_key_id: Vec<u8>,
    is_ca: bool,
}

impl Descriptor {
    fn random(is_ca: bool, ski_len: usize) -> Result<Self> {
        Ok(Self {
            identity: Identity::random()?,
            serial: random::rand_serial()?,
            subject_key_id: random::rand_bytes(ski_len)?,
            is_ca,
        })
    }
}

/// Assemble and sign one certificate.
///
/// `issuer_name` and `issuer_key` are the signing side; for a self-signed
/// root they are the root's own name and key.
fn sign_certificate(
    descriptor: &Descriptor,
    validity: &Validity,
    subject_keypair: &Keypair,
    issuer_name: &Name,
    issuer_key: &Keypair,
) -> Result<Vec<u8>> {
    let subject = descriptor.identity.to_name()?;
    let spki_der = subject_keypair.public_key_spki_der()?;
    let signature_algorithm = builder::rsa_signature_algorithm();
    let extensions =
        builder::build_extensions(&subject, descriptor.is_ca, &descriptor.subject_key_id)?;

    let tbs = TbsCertificate {
        version: Version::V3,
        serial_number: builder::to_serial(&descriptor.serial)?,
        signature: signature_algorithm.clone(),
        issuer: issuer_name.clone(),
        validity: validity.clone(),
        subject,
        subject_public_key_info: builder::to_spki(&spki_der)?,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: Some(extensions),
    };

    let tbs_der = tbs
        .to_der()
        .map_err(|e| RandCertError::Certificate(format!("Failed to encode TBS: {}", e)))?;
    let signature = issuer_key.sign(&tbs_der)?;

    let cert = Certificate {
        tbs_certificate: tbs,
        signature_algorithm,
        signature: BitString::from_bytes(&signature).map_err(|e| {
            RandCertError::Certificate(format!("Failed to encode signature: {}", e))
        })?,
    };

    cert.to_der()
        .map_err(|e| RandCertError::Certificate(format!("Failed to encode certificate: {}", e)))
}

/// Build a randomized root+leaf certificate chain with RSA keys of the
/// requested bit size.
///
/// Both certificates share the same randomized validity window but carry
/// independent identities, serials, key identifiers, and keypairs. Any
/// failure along the way is returned as an error; there is no partial
/// output.
pub fn build_chain(key_size: usize) -> Result<CertificateChain> {
    let (not_before, not_after) = random::rand_validity()?;
    let validity = builder::to_validity(not_before, not_after)?;

    // Root: self-signed authority.
    let root_descriptor = Descriptor::random(true, ROOT_SKI_LEN)?;
    let root_keypair = generate_rsa_keypair(key_size)?;
    let root_name = root_descriptor.identity.to_name()?;
    let root_cert_der = sign_certificate(
        &root_descriptor,
        &validity,
        &root_keypair,
        &root_name,
        &root_keypair,
    )?;

    // Leaf: fresh identity and keypair, signed by the root.
    let leaf_descriptor = Descriptor::random(false, LEAF_SKI_LEN)?;
    let leaf_keypair = generate_rsa_keypair(key_size)?;
    let leaf_cert_der = sign_certificate(
        &leaf_descriptor,
        &validity,
        &leaf_keypair,
        &root_name,
        &root_keypair,
    )?;

    debug!(
        "generated chain: root CN={}, leaf CN={}, valid {} through {}",
        root_descriptor.identity.common_name,
        leaf_descriptor.identity.common_name,
        not_before,
        not_after,
    );

    Ok(CertificateChain {
        root_cert_der,
        root_key_der: root_keypair.private_key_der()?,
        leaf_cert_der,
        leaf_key_der: leaf_keypair.private_key_der()?,
    })
}
