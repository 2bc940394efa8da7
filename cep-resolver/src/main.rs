//! Binary crate for the `cep-resolver` service.
//!
//! Answers `GET /weather?cep=` by looking the CEP up on ViaCEP, then asking
//! WeatherAPI.com for the locality's current temperature.

use clap::Parser;

mod app;
mod cli;
mod error;
mod service;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
