//! Operation lifecycle macros
//!
//! One `start` line, then either `end` or `end_error`, all stamped with the
//! calling module as `component`. Field names and event values come from
//! `libris_core_types::schema`; callers only need `libris-core`.

/// Log the start of an operation; extra `tracing` fields may follow
///
/// ```
/// # use libris_core::log_op_start;
/// log_op_start!("create_author");
/// log_op_start!("update_book", book_id = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use libris_core::log_op_end;
/// log_op_end!("create_author", duration_ms = 4);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation
///
/// `$err` is borrowed as an `ExError`, so the caller keeps ownership.
///
/// ```
/// # use libris_core::{log_op_error, ExError, LibrisError};
/// let err = ExError::from(LibrisError::BookNotFound { book_id: 1 });
/// log_op_error!("get_book", err, duration_ms = 10);
/// assert!(err.is_not_found());
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err = %ex_err,
            $($($field)*)?
        );
    }};
}
