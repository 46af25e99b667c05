//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! Commands own lifecycle logging (`log_op_start!`, `log_op_end!`,
//! `log_op_error!`). The store only emits `tracing::debug!` details.

pub mod author;
pub mod book;
pub mod joint_update;

use libris_core::{log_op_end, log_op_error};
use libris_store::Result;
use std::time::Instant;

/// Close the lifecycle of `op`, logging success or failure
pub(crate) fn finish<T>(op: &'static str, start: Instant, result: Result<T>) -> Result<T> {
    let elapsed = start.elapsed().as_millis() as u64;
    match result {
        Ok(value) => {
            log_op_end!(op, duration_ms = elapsed);
            Ok(value)
        }
        Err(err) => {
            let err = err.with_op(op);
            log_op_error!(op, err, duration_ms = elapsed);
            Err(err)
        }
    }
}

