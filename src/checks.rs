//! Structural and value checks for the large-values scenario.
//!
//! The node is expected to list two transactions, newest first:
//!
//! * `transactions[1]` moves the whole supply (`all_tokens`) into a single
//!   output that later funds the deposit.
//! * `transactions[0]` spends that output, returns the change in the base
//!   token and mints `max_output_value` units of a new token whose id is
//!   the minting transaction's own id.

use log::debug;
use thiserror::Error;

use crate::config::TX_COUNT;
use crate::constants::{Constants, BASE_TOKEN_ID};
use crate::models::Transaction;
use crate::report::{CheckOutcome, CheckRecord, Renderer, Report};

/// Outputs a token minting transaction carries: change, minted token and
/// the two authority outputs.
pub const MINT_OUTPUT_COUNT: usize = 4;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckFailure {
    #[error("expected {expected} transactions, found {found}")]
    TransactionCount { expected: usize, found: usize },

    #[error("expected {expected} input(s), found {found}")]
    InputCount { expected: usize, found: usize },

    #[error("expected {expected} output(s), found {found}")]
    OutputCount { expected: usize, found: usize },

    #[error("expected input {index} to contain {expected}, found {found}")]
    InputValue { index: usize, expected: u64, found: u64 },

    #[error("expected output {index} to contain {expected}, found {found}")]
    OutputValue { index: usize, expected: u64, found: u64 },

    #[error("expected output {index} to hold token {expected:?}, found {found:?}")]
    OutputToken {
        index: usize,
        expected: String,
        found: String,
    },
}

pub type CheckFn = fn(&[Transaction], &Constants) -> Result<(), CheckFailure>;

/// Checks in the order they run. Later checks rely on the earlier shape
/// checks having passed.
pub const CHECKS: [(&str, CheckFn); 3] = [
    ("transaction list", check_transaction_list),
    ("first transaction", check_funding_transaction),
    ("second transaction", check_minting_transaction),
];

/// Runs every check in order and stops at the first failure. Records for
/// checks that never ran are left out of the report.
pub fn run_checks(
    transactions: &[Transaction],
    constants: &Constants,
    renderer: &mut dyn Renderer,
) -> std::io::Result<Report> {
    let mut report = Report::default();

    for (label, check) in CHECKS {
        renderer.check_started(label)?;
        let outcome = match check(transactions, constants) {
            Ok(()) => CheckOutcome::Passed,
            Err(failure) => CheckOutcome::Failed(failure),
        };
        let record = CheckRecord { label, outcome };
        renderer.check_finished(&record)?;

        let failed = record.outcome.is_failed();
        report.records.push(record);
        if failed {
            break;
        }
    }

    Ok(report)
}

pub fn check_transaction_list(
    transactions: &[Transaction],
    _constants: &Constants,
) -> Result<(), CheckFailure> {
    expect_count(transactions.len(), TX_COUNT, |expected, found| {
        CheckFailure::TransactionCount { expected, found }
    })
}

/// The older transaction: exactly one input and one output, both carrying
/// the whole supply.
pub fn check_funding_transaction(
    transactions: &[Transaction],
    constants: &Constants,
) -> Result<(), CheckFailure> {
    let tx = nth_transaction(transactions, 1)?;

    expect_input_count(tx, 1)?;
    expect_output_count(tx, 1)?;
    expect_input_value(tx, 0, constants.all_tokens)?;
    expect_output_value(tx, 0, constants.all_tokens)
}

/// The newest transaction: one input with the whole supply, the change in
/// the base token and the freshly minted token named after this
/// transaction.
pub fn check_minting_transaction(
    transactions: &[Transaction],
    constants: &Constants,
) -> Result<(), CheckFailure> {
    let tx = nth_transaction(transactions, 0)?;

    expect_input_count(tx, 1)?;
    expect_output_count(tx, MINT_OUTPUT_COUNT)?;
    expect_input_value(tx, 0, constants.all_tokens)?;
    expect_output_token(tx, 0, BASE_TOKEN_ID)?;
    expect_output_value(tx, 0, constants.change_amount)?;
    expect_output_token(tx, 1, &tx.tx_id)?;
    expect_output_value(tx, 1, constants.max_output_value)?;

    for (index, output) in tx.outputs.iter().enumerate().skip(2) {
        debug!(
            "tx {} output {} not asserted: token={} value={}",
            tx.tx_id, index, output.token, output.value
        );
    }
    Ok(())
}

fn nth_transaction(transactions: &[Transaction], index: usize) -> Result<&Transaction, CheckFailure> {
    transactions.get(index).ok_or(CheckFailure::TransactionCount {
        expected: TX_COUNT,
        found: transactions.len(),
    })
}

fn expect_count(
    found: usize,
    expected: usize,
    failure: impl FnOnce(usize, usize) -> CheckFailure,
) -> Result<(), CheckFailure> {
    if found == expected {
        Ok(())
    } else {
        Err(failure(expected, found))
    }
}

fn expect_input_count(tx: &Transaction, expected: usize) -> Result<(), CheckFailure> {
    expect_count(tx.inputs.len(), expected, |expected, found| {
        CheckFailure::InputCount { expected, found }
    })
}

fn expect_output_count(tx: &Transaction, expected: usize) -> Result<(), CheckFailure> {
    expect_count(tx.outputs.len(), expected, |expected, found| {
        CheckFailure::OutputCount { expected, found }
    })
}

fn expect_input_value(tx: &Transaction, index: usize, expected: u64) -> Result<(), CheckFailure> {
    let found = tx.inputs[index].value;
    if found == expected {
        Ok(())
    } else {
        Err(CheckFailure::InputValue { index, expected, found })
    }
}

fn expect_output_value(tx: &Transaction, index: usize, expected: u64) -> Result<(), CheckFailure> {
    let found = tx.outputs[index].value;
    if found == expected {
        Ok(())
    } else {
        Err(CheckFailure::OutputValue { index, expected, found })
    }
}

fn expect_output_token(tx: &Transaction, index: usize, expected: &str) -> Result<(), CheckFailure> {
    let found = &tx.outputs[index].token;
    if found == expected {
        Ok(())
    } else {
        Err(CheckFailure::OutputToken {
            index,
            expected: expected.to_string(),
            found: found.clone(),
        })
    }
}
