//! Error types for the randcert library.
//!
//! This module defines all error types used throughout the library.
//! All errors implement `std::error::Error` and are designed to provide
//! clear, actionable error messages.

use thiserror::Error;

/// The main error type for randcert operations.
///
/// This enum covers all possible errors that can occur during randomness
/// collection, key generation, certificate signing, and credential assembly.
#[derive(Error, Debug)]
pub enum RandCertError {
    /// Reading from the system's secure randomness source failed
    #[error("Entropy error: {0}")]
    Entropy(String),

    /// Asymmetric key generation or encoding failed
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Certificate construction or signing error
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// PEM encoding/decoding error
    #[error("PEM error: {0}")]
    Pem(String),

    /// Certificate/key pairing failed to produce a usable TLS credential
    #[error("Credential error: {0}")]
    Credential(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for randcert operations.
pub type Result<T> = std::result::Result<T, RandCertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RandCertError::Certificate("test error".to_string());
        assert_eq!(err.to_string(), "Certificate error: test error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandCertError>();
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(RandCertError::Entropy("test".to_string()));
        assert!(err_result.is_err());
    }
}
