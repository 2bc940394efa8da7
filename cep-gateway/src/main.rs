//! Binary crate for the `cep-gateway` service.
//!
//! This crate focuses on:
//! - Validating inbound CEP lookups
//! - Relaying them to `cep-resolver` with trace context attached
//! - Mapping resolver outcomes to client-facing responses

use clap::Parser;

mod app;
mod cli;
mod client;
mod error;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
