use crate::retry::{RetryConfig, with_retry};
use crate::{OpContext, Result as EngineResult};

use std::future::Future;

/// Execute a store read with retry. Reads are safe to re-issue.
pub(crate) async fn store_read<F, Fut, T>(
    retry: &RetryConfig,
    ctx: &OpContext,
    operation_name: &str,
    operation: F,
) -> EngineResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = EngineResult<T>>,
{
    log::debug!("{} Starting {}", ctx.log_prefix(), operation_name);

    with_retry(retry, operation_name, operation).await
}

/// Execute a store write. Writes are not retried here: a failed write
/// inside a paired sequence is compensated by the caller, and the retry
/// affordance re-issues the whole operation instead.
pub(crate) async fn store_write<F, Fut, T>(
    ctx: &OpContext,
    operation_name: &str,
    operation: F,
) -> EngineResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = EngineResult<T>>,
{
    log::debug!("{} Starting {}", ctx.log_prefix(), operation_name);

    let result = operation().await;

    match &result {
        Ok(_) => {
            log::debug!("{} {} succeeded", ctx.log_prefix(), operation_name);
        }
        Err(e) => {
            log::warn!("{} {} failed: {}", ctx.log_prefix(), operation_name, e);
        }
    }

    result
}
