//! Scope-bound async tasks.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages start requests whose continuations write into the session store.
//! `spawn_scoped` ties each task to the reactive owner that spawned it so a
//! torn-down page aborts its in-flight work instead of updating state after
//! it is gone.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use std::future::Future;

use futures::future::{AbortHandle, Abortable, abortable};
use leptos::prelude::{Owner, on_cleanup};

/// Wrap `fut` so it can be aborted through the returned handle.
pub fn cancellable<F>(fut: F) -> (Abortable<F>, AbortHandle)
where
    F: Future<Output = ()>,
{
    abortable(fut)
}

/// Spawn `fut` on the local executor and abort it when the current owner is
/// cleaned up.
pub fn spawn_scoped<F>(fut: F) -> AbortHandle
where
    F: Future<Output = ()> + 'static,
{
    let (task, handle) = cancellable(fut);
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        if task.await.is_err() {
            leptos::logging::log!("scoped task aborted");
        }
    });
    #[cfg(not(feature = "hydrate"))]
    drop(task);

    let cleanup = handle.clone();
    on_cleanup(move || cleanup.abort());
    handle
}

/// `spawn_scoped` under `owner`; event handlers run outside the owner of the
/// component that declared them.
pub fn spawn_in<F>(owner: Option<&Owner>, fut: F) -> AbortHandle
where
    F: Future<Output = ()> + 'static,
{
    match owner {
        Some(owner) => owner.with(|| spawn_scoped(fut)),
        None => spawn_scoped(fut),
    }
}
