//! Blocking bridge for the async remote clients.

use std::future::Future;

use crate::error::{HalError, HalResult};

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// The synchronous execute path calls this once per remote job. Calling it
/// from inside a tokio runtime would deadlock the caller's worker, so that
/// case is reported as an error instead.
pub fn block_on<F, T>(future: F) -> HalResult<T>
where
    F: Future<Output = HalResult<T>>,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(HalError::Backend(
            "remote execution is blocking and cannot run inside an async runtime".into(),
        ));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| HalError::Backend(format!("failed to start runtime: {e}")))?;
    runtime.block_on(future)
}
