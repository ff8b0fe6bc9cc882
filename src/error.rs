use std::io;

use thiserror::Error;

use crate::checks::CheckFailure;
use crate::transactions::FetchError;

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("failed to fetch transactions from the full node")]
    Fetch(#[from] FetchError),

    #[error("check failed: {0}")]
    Check(CheckFailure),

    #[error("failed to write check report")]
    Report(#[from] io::Error),
}
