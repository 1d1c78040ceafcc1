//! Batch execution over a list of input items.
//!
//! Items run strictly in order, one at a time. Output records keep item
//! order; an item that fails in continue-on-fail mode contributes exactly one
//! `{"error": .., "json": {}}` record at its position.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::client::ZapSignClient;
use crate::error::ZapSignError;
use crate::operation::InputItem;
use crate::payload::ResultAccumulator;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionOptions {
    /// Record failures and keep going instead of aborting the batch.
    pub continue_on_fail: bool,
}

impl ExecutionOptions {
    pub fn continue_on_fail() -> Self {
        Self {
            continue_on_fail: true,
        }
    }
}

/// The first failure of a batch run without continue-on-fail. Records of
/// earlier items are discarded.
#[derive(Debug, Error)]
#[error("item {item_index}: {source}")]
pub struct BatchError {
    /// Zero-based position of the failing item.
    pub item_index: usize,
    pub source: ZapSignError,
}

pub fn execute_batch<T>(
    client: &ZapSignClient,
    transport: &T,
    items: &[InputItem],
    options: ExecutionOptions,
) -> Result<Vec<Value>, BatchError>
where
    T: Transport + ?Sized,
{
    info!(
        items = items.len(),
        continue_on_fail = options.continue_on_fail,
        "executing batch"
    );
    let mut results = ResultAccumulator::new();
    for (index, item) in items.iter().enumerate() {
        match client.execute(transport, item) {
            Ok(records) => {
                info!(
                    item = index,
                    resource = %item.resource,
                    operation = %item.operation,
                    records = records.len(),
                    "item processed"
                );
                results.push_records(records);
            }
            Err(err) if options.continue_on_fail => {
                error!(
                    item = index,
                    resource = %item.resource,
                    operation = %item.operation,
                    error = %err,
                    "item failed, continuing"
                );
                results.push_error(&err.to_string());
            }
            Err(err) => {
                error!(
                    item = index,
                    resource = %item.resource,
                    operation = %item.operation,
                    error = %err,
                    "item failed"
                );
                return Err(BatchError {
                    item_index: index,
                    source: err,
                });
            }
        }
    }
    info!(records = results.len(), "batch finished");
    Ok(results.into_records())
}
