//! Certificate chain generation module.
//!
//! This module builds a randomized two-certificate chain: a self-signed
//! root authority and a server leaf certificate signed by it.

pub mod builder;
pub mod chain;
