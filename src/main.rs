//! randcert CLI.
//!
//! Generates a randomized certificate chain and writes the PEM blocks to
//! stdout or files, for feeding into a TLS listener or test fixture.

use clap::Parser;
use randcert::cert::chain::build_chain;
use randcert::credential::{cert_to_pem, key_to_pem};
use randcert::error::Result;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "randcert")]
#[command(about = "Generate a randomized X.509 certificate chain", long_about = None)]
struct Cli {
    /// RSA key size in bits
    #[arg(long, default_value_t = 2048)]
    key_size: usize,

    /// Write the leaf certificate PEM to this file instead of stdout
    #[arg(long)]
    cert_out: Option<PathBuf>,

    /// Write the leaf private key PEM to this file instead of stdout
    #[arg(long)]
    key_out: Option<PathBuf>,

    /// Also emit the root certificate and key on stdout
    #[arg(long)]
    include_root: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let chain = build_chain(cli.key_size)?;

    let cert_pem = cert_to_pem(&chain.leaf_cert_der);
    match &cli.cert_out {
        Some(path) => fs::write(path, &cert_pem)?,
        None => print!("{}", cert_pem),
    }

    let key_pem = key_to_pem(&chain.leaf_key_der);
    match &cli.key_out {
        Some(path) => fs::write(path, &key_pem)?,
        None => print!("{}", key_pem),
    }

    if cli.include_root {
        print!("{}", cert_to_pem(&chain.root_cert_der));
        print!("{}", key_to_pem(&chain.root_key_der));
    }

    Ok(())
}
