//! Certificate descriptor utilities.
//!
//! Helpers that turn randomized field material into the DER structures
//! `x509-cert` expects: distinguished names, validity windows, extensions,
//! serial numbers, and algorithm identifiers.

use crate::error::{RandCertError, Result};
use crate::random;
use der::asn1::{AnyRef, OctetString, SetOfVec, UtcTime, Utf8StringRef};
use der::Decode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::ext::pkix::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, KeyUsages, SubjectKeyIdentifier,
};
use x509_cert::ext::{AsExtension, Extension};
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::{Time, Validity};

/// Randomized subject identity fields.
#[derive(Debug, Clone)]
pub struct Identity {
    pub common_name: String,
    pub country: String,
    pub organization: String,
    pub organizational_unit: String,
}

impl Identity {
    /// Generate a fresh identity with independent random attributes.
    ///
    /// # Example
    ///
    /// ```
    /// use randcert::cert::builder::Identity;
    ///
    /// let identity = Identity::random().unwrap();
    /// assert!(identity.common_name.len() >= 4);
    /// ```
    pub fn random() -> Result<Self> {
        Ok(Self {
            common_name: random::rand_string(4, 16)?,
            country: random::rand_string(4, 16)?,
            organization: random::rand_string(4, 16)?,
            organizational_unit: random::rand_string(4, 16)?,
        })
    }

    /// Build the X.501 name for this identity.
    pub fn to_name(&self) -> Result<Name> {
        let attrs = [
            (const_oid::db::rfc4519::CN, &self.common_name),
            (const_oid::db::rfc4519::C, &self.country),
            (const_oid::db::rfc4519::O, &self.organization),
            (const_oid::db::rfc4519::OU, &self.organizational_unit),
        ];

        let mut rdns = Vec::with_capacity(attrs.len());
        for (oid, value) in attrs {
            let attr = AttributeTypeAndValue {
                oid,
                value: Utf8StringRef::new(value)
                    .map_err(|e| {
                        RandCertError::Certificate(format!("Invalid attribute value: {}", e))
                    })?
                    .into(),
            };

            let mut attr_set = SetOfVec::new();
            attr_set.insert_ordered(attr).map_err(|e| {
                RandCertError::Certificate(format!("Failed to add attribute: {}", e))
            })?;
            rdns.push(RelativeDistinguishedName::from(attr_set));
        }

        Ok(RdnSequence(rdns))
    }
}

/// Create a DER serial number from raw material.
pub fn to_serial(bytes: &[u8]) -> Result<SerialNumber> {
    SerialNumber::new(bytes)
        .map_err(|e| RandCertError::Certificate(format!("Failed to create serial number: {}", e)))
}

/// Convert a validity window into the UTCTime-based DER form.
pub fn to_validity(not_before: OffsetDateTime, not_after: OffsetDateTime) -> Result<Validity> {
    Ok(Validity {
        not_before: to_time(not_before)?,
        not_after: to_time(not_after)?,
    })
}

fn to_time(ts: OffsetDateTime) -> Result<Time> {
    let secs = ts.unix_timestamp();
    if secs < 0 {
        return Err(RandCertError::Certificate(
            "Validity timestamp predates the UNIX epoch".to_string(),
        ));
    }

    UtcTime::from_unix_duration(std::time::Duration::from_secs(secs as u64))
        .map(Time::UtcTime)
        .map_err(|e| RandCertError::Certificate(format!("Invalid validity time: {}", e)))
}

/// SHA-256 with RSA encryption, NULL parameters per RFC 5912.
pub fn rsa_signature_algorithm() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
        parameters: Some(AnyRef::NULL.into()),
    }
}

/// Decode an encoded SubjectPublicKeyInfo into its owned DER structure.
pub fn to_spki(spki_der: &[u8]) -> Result<SubjectPublicKeyInfoOwned> {
    SubjectPublicKeyInfoOwned::from_der(spki_der)
        .map_err(|e| RandCertError::Certificate(format!("Invalid public key info: {}", e)))
}

/// Build the extension list for one certificate in the chain.
///
/// `is_ca` drives BasicConstraints; both chain members carry the same key
/// usages (digital signature + certificate signing) and extended usages
/// (TLS client and server authentication). `subject_key_id` is the
/// randomized identifier for the SubjectKeyIdentifier extension.
pub fn build_extensions(
    subject: &Name,
    is_ca: bool,
    subject_key_id: &[u8],
) -> Result<Vec<Extension>> {
    let mut extensions = Vec::with_capacity(4);

    let basic_constraints = BasicConstraints {
        ca: is_ca,
        path_len_constraint: None,
    };
    let ext = basic_constraints
        .to_extension(subject, &extensions)
        .map_err(ext_err)?;
    extensions.push(ext);

    let key_usage = KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign);
    let ext = key_usage
        .to_extension(subject, &extensions)
        .map_err(ext_err)?;
    extensions.push(ext);

    let extended_key_usage = ExtendedKeyUsage(vec![
        const_oid::db::rfc5280::ID_KP_CLIENT_AUTH,
        const_oid::db::rfc5280::ID_KP_SERVER_AUTH,
    ]);
    let ext = extended_key_usage
        .to_extension(subject, &extensions)
        .map_err(ext_err)?;
    extensions.push(ext);

    let ski = SubjectKeyIdentifier(OctetString::new(subject_key_id).map_err(ext_err)?);
    let ext = ski.to_extension(subject, &extensions).map_err(ext_err)?;
    extensions.push(ext);

    Ok(extensions)
}

fn ext_err<E: std::fmt::Display>(e: E) -> RandCertError {
    RandCertError::Certificate(format!("Failed to build extension: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Encode;
    use time::Duration;

    #[test]
    fn test_random_identity_field_shape() {
        let identity = Identity::random().unwrap();
        for field in [
            &identity.common_name,
            &identity.country,
            &identity.organization,
            &identity.organizational_unit,
        ] {
            assert!(field.len() >= 4 && field.len() < 16);
            assert!(field.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_random_identities_are_independent() {
        let a = Identity::random().unwrap();
        let b = Identity::random().unwrap();
        assert_ne!(a.common_name, b.common_name);
    }

    #[test]
    fn test_to_name_has_four_rdns() {
        let identity = Identity::random().unwrap();
        let name = identity.to_name().unwrap();
        assert_eq!(name.0.len(), 4);
    }

    #[test]
    fn test_to_serial_from_random_material() {
        let serial = random::rand_serial().unwrap();
        assert!(to_serial(&serial).is_ok());
    }

    #[test]
    fn test_to_validity_roundtrip() {
        let (start, end) = random::rand_validity().unwrap();
        let validity = to_validity(start, end).unwrap();

        let not_before = validity.not_before.to_unix_duration().as_secs() as i64;
        let not_after = validity.not_after.to_unix_duration().as_secs() as i64;
        assert_eq!(not_before, start.unix_timestamp());
        assert_eq!(not_after, end.unix_timestamp());
    }

    #[test]
    fn test_to_validity_rejects_pre_epoch() {
        let start = OffsetDateTime::UNIX_EPOCH - Duration::days(1);
        let end = OffsetDateTime::UNIX_EPOCH + Duration::days(1);
        assert!(to_validity(start, end).is_err());
    }

    #[test]
    fn test_build_extensions_ca_flag() {
        let identity = Identity::random().unwrap();
        let name = identity.to_name().unwrap();

        let extensions = build_extensions(&name, true, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(extensions.len(), 4);

        let bc_ext = extensions
            .iter()
            .find(|e| e.extn_id == const_oid::db::rfc5280::ID_CE_BASIC_CONSTRAINTS)
            .unwrap();
        let bc = BasicConstraints::from_der(bc_ext.extn_value.as_bytes()).unwrap();
        assert!(bc.ca);

        let extensions = build_extensions(&name, false, &[1, 2, 3, 4, 5, 6]).unwrap();
        let bc_ext = extensions
            .iter()
            .find(|e| e.extn_id == const_oid::db::rfc5280::ID_CE_BASIC_CONSTRAINTS)
            .unwrap();
        let bc = BasicConstraints::from_der(bc_ext.extn_value.as_bytes()).unwrap();
        assert!(!bc.ca);
    }

    #[test]
    fn test_build_extensions_carries_subject_key_id() {
        let identity = Identity::random().unwrap();
        let name = identity.to_name().unwrap();
        let ski_bytes = random::rand_bytes(6).unwrap();

        let extensions = build_extensions(&name, false, &ski_bytes).unwrap();
        let ski_ext = extensions
            .iter()
            .find(|e| e.extn_id == const_oid::db::rfc5280::ID_CE_SUBJECT_KEY_IDENTIFIER)
            .unwrap();
        let ski = SubjectKeyIdentifier::from_der(ski_ext.extn_value.as_bytes()).unwrap();
        assert_eq!(ski.0.as_bytes(), ski_bytes.as_slice());
    }

    #[test]
    fn test_signature_algorithm_encodes() {
        let alg = rsa_signature_algorithm();
        assert!(alg.to_der().is_ok());
    }
}
