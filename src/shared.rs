//! Cloneable registry handle shared by every fragment on a page.

use crate::registry::{Aggregator, Delivery, Registry};
use crate::types::ImplementorsTable;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Page context owning the one [`Registry`] that all fragments submit to.
///
/// The aggregator runs while the lock is held, so it must not submit back
/// through the same handle.
#[derive(Debug)]
pub struct SharedRegistry<A> {
    inner: Arc<Mutex<Registry<A>>>,
}

impl<A> Clone for SharedRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Aggregator> Default for SharedRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregator> SharedRegistry<A> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// See [`Registry::submit`].
    pub fn submit(&self, table: ImplementorsTable) -> Delivery {
        self.lock().submit(table)
    }

    /// See [`Registry::install`].
    pub fn install(&self, aggregator: A) -> Option<A> {
        self.lock().install(aggregator)
    }

    /// See [`Registry::uninstall`].
    pub fn uninstall(&self) -> Option<A> {
        self.lock().uninstall()
    }

    /// Run `f` against the installed aggregator, if there is one.
    pub fn with_aggregator<R>(&self, f: impl FnOnce(&A) -> R) -> Option<R> {
        self.lock().aggregator().map(f)
    }

    pub fn take_pending(&self) -> Vec<ImplementorsTable> {
        self.lock().take_pending()
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending_len()
    }

    pub fn is_ready(&self) -> bool {
        self.lock().is_ready()
    }

    // A panicking aggregator loses at most the table it was handed; install
    // pops one table at a time, so everything behind it stays queued.
    fn lock(&self) -> MutexGuard<'_, Registry<A>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Registry lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}
