//! Batch Tools

mod tests;

use futures_util::future::join_all;
use std::future::Future;
use std::time::Duration;

/// Run one async operation per item with staggered starts and wait for all
/// to settle.
///
/// Item `i` starts `step × i` after the first, so a batch does not fire every
/// request simultaneously. Operations run logically interleaved on the
/// calling task; completion order is unspecified but results come back in
/// item order. A failure inside one operation cannot abort the others.
pub async fn staggered<T, F, Fut, R>(items: Vec<T>, step: Duration, operation: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let futures = items.into_iter().enumerate().map(|(i, item)| {
        let fut = operation(item);
        async move {
            if i > 0 {
                tokio::time::sleep(step * i as u32).await;
            }
            fut.await
        }
    });
    join_all(futures).await
}
