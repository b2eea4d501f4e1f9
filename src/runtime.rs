//! Shared tokio runtime for the synchronous CLI boundary.

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .thread_name("sitewatch-worker")
        .enable_all()
        .build()
        .expect("failed to build global runtime")
});

/// Drive a future to completion on the shared runtime. The CLI is the only
/// intended caller; async hosts use the api functions directly.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    RUNTIME.block_on(future)
}
