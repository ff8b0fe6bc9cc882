//! Smoke checks for a full node after the large-values token scenario.
//!
//! The scenario funds an address with the whole token supply and then mints
//! a custom token with `2^63` units, paying the 1% deposit in the base token.
//! These checks fetch the two resulting transactions from the node and
//! verify their inputs and outputs.

pub mod checks;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod report;
pub mod transactions;

pub use checks::{run_checks, CheckFailure};
pub use config::{NodeConfig, ReportFormat};
pub use constants::Constants;
pub use error::SmokeError;
pub use report::{CheckOutcome, CheckRecord, Renderer, Report};
pub use transactions::{build_client, fetch_transactions, FetchError};

/// Fetches the latest transactions and runs every check against them,
/// streaming progress to `renderer`. A failed check is returned as
/// `SmokeError::Check` after its record has been rendered.
pub async fn run_smoke_test(
    client: &reqwest::Client,
    config: &NodeConfig,
    constants: &Constants,
    renderer: &mut dyn Renderer,
) -> Result<Report, SmokeError> {
    let response = fetch_transactions(client, config).await?;
    log::debug!("Got {} transactions", response.transactions.len());

    let report = run_checks(&response.transactions, constants, renderer)?;
    match report.failure() {
        Some(failure) => Err(SmokeError::Check(failure.clone())),
        None => Ok(report),
    }
}

/// Closes the run on `renderer` and returns whether it passed. A failed
/// check already has its record rendered, so only errors that stopped the
/// run early go through `Renderer::fatal`.
pub fn finish_run(
    renderer: &mut dyn Renderer,
    outcome: Result<Report, SmokeError>,
) -> Result<bool, SmokeError> {
    match outcome {
        Ok(_) => {
            renderer.finish(true)?;
            Ok(true)
        }
        Err(SmokeError::Check(_)) => {
            renderer.finish(false)?;
            Ok(false)
        }
        Err(SmokeError::Report(err)) => Err(SmokeError::Report(err)),
        Err(err) => {
            renderer.fatal(&anyhow::Error::from(err))?;
            renderer.finish(false)?;
            Ok(false)
        }
    }
}
