//! Load-order-safe handoff of implementor tables to the page aggregator.
//!
//! Fragments and the aggregator initialize in whatever order the page runs
//! them. A fragment calls [`Registry::submit`]: if an aggregator is installed
//! the table goes straight to it, otherwise it waits in the pending queue.
//! [`Registry::install`] drains that queue before returning, so both orderings
//! end with the aggregator having seen every table exactly once.

use crate::types::ImplementorsTable;
use std::collections::VecDeque;

/// Page-wide consumer of implementor tables.
pub trait Aggregator {
    /// Merge one fragment's table into the page.
    fn register_implementors(&mut self, table: ImplementorsTable);
}

impl<F> Aggregator for F
where
    F: FnMut(ImplementorsTable),
{
    fn register_implementors(&mut self, table: ImplementorsTable) {
        self(table);
    }
}

/// Which branch a submission took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Aggregator was installed and received the table synchronously.
    Delivered,
    /// No aggregator yet; the table is waiting in the pending queue.
    Buffered,
}

/// Handoff point between fragments (producers) and the aggregator (consumer).
///
/// Invariant: while an aggregator is installed the pending queue is empty.
#[derive(Debug)]
pub struct Registry<A> {
    aggregator: Option<A>,
    pending: VecDeque<ImplementorsTable>,
}

impl<A> Default for Registry<A> {
    fn default() -> Self {
        Self {
            aggregator: None,
            pending: VecDeque::new(),
        }
    }
}

impl<A: Aggregator> Registry<A> {
    /// Create an empty registry with no aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand a table to the aggregator, or buffer it until one is installed.
    pub fn submit(&mut self, table: ImplementorsTable) -> Delivery {
        if let Some(aggregator) = self.aggregator.as_mut() {
            tracing::debug!(groups = table.len(), "Delivering implementors");
            aggregator.register_implementors(table);
            Delivery::Delivered
        } else {
            tracing::debug!(
                groups = table.len(),
                pending = self.pending.len() + 1,
                "Buffering implementors until aggregator is installed"
            );
            self.pending.push_back(table);
            Delivery::Buffered
        }
    }

    /// Install the aggregator and drain pending tables into it in submission order.
    ///
    /// Returns the previously installed aggregator, if any. Tables already
    /// delivered to it are not replayed.
    ///
    /// If the aggregator panics, only the table it was handed is lost; the
    /// rest stay pending and the aggregator is not installed.
    pub fn install(&mut self, mut aggregator: A) -> Option<A> {
        let mut drained = 0;
        while let Some(table) = self.pending.pop_front() {
            aggregator.register_implementors(table);
            drained += 1;
        }
        if drained > 0 {
            tracing::info!(drained, "Aggregator consumed buffered implementors");
        }
        self.aggregator.replace(aggregator)
    }

    /// Remove the aggregator; later submissions buffer again.
    pub fn uninstall(&mut self) -> Option<A> {
        self.aggregator.take()
    }
}

impl<A> Registry<A> {
    /// Read and clear the pending queue, for consumers that drain it themselves.
    pub fn take_pending(&mut self) -> Vec<ImplementorsTable> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ImplementorsTable> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether an aggregator is installed.
    pub const fn is_ready(&self) -> bool {
        self.aggregator.is_some()
    }

    pub const fn aggregator(&self) -> Option<&A> {
        self.aggregator.as_ref()
    }

    pub const fn aggregator_mut(&mut self) -> Option<&mut A> {
        self.aggregator.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupKey, ImplementorEntry};

    #[derive(Debug, Default)]
    struct Recorder {
        received: Vec<ImplementorsTable>,
    }

    impl Aggregator for Recorder {
        fn register_implementors(&mut self, table: ImplementorsTable) {
            self.received.push(table);
        }
    }

    fn table(key: &str, entry: &str) -> ImplementorsTable {
        [(
            GroupKey::new_unchecked(key),
            vec![ImplementorEntry::new(entry)],
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_aggregator_first_delivers() {
        let mut registry = Registry::new();
        registry.install(Recorder::default());

        let delivery = registry.submit(table("crateA", "implA for TypeX"));

        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(registry.pending_len(), 0);
        let received = &registry.aggregator().unwrap().received;
        assert_eq!(received, &[table("crateA", "implA for TypeX")]);
    }

    #[test]
    fn test_fragment_first_buffers() {
        let mut registry: Registry<Recorder> = Registry::new();

        let delivery = registry.submit(table("crateA", "implA for TypeX"));

        assert_eq!(delivery, Delivery::Buffered);
        assert!(!registry.is_ready());
        assert_eq!(
            registry.pending().collect::<Vec<_>>(),
            vec![&table("crateA", "implA for TypeX")]
        );
    }

    #[test]
    fn test_install_drains_in_order() {
        let mut registry = Registry::new();
        registry.submit(table("a", "1"));
        registry.submit(table("b", "2"));
        registry.submit(table("c", "3"));

        assert!(registry.install(Recorder::default()).is_none());

        assert_eq!(registry.pending_len(), 0);
        let received = &registry.aggregator().unwrap().received;
        assert_eq!(
            received,
            &[table("a", "1"), table("b", "2"), table("c", "3")]
        );
    }

    #[test]
    fn test_replacing_aggregator_does_not_replay() {
        let mut registry = Registry::new();
        registry.submit(table("a", "1"));
        registry.install(Recorder::default());

        let previous = registry.install(Recorder::default()).unwrap();
        registry.submit(table("b", "2"));

        assert_eq!(previous.received, vec![table("a", "1")]);
        assert_eq!(
            registry.aggregator().unwrap().received,
            vec![table("b", "2")]
        );
    }

    #[test]
    fn test_uninstall_resumes_buffering() {
        let mut registry = Registry::new();
        registry.install(Recorder::default());
        let removed = registry.uninstall().unwrap();

        assert_eq!(registry.submit(table("a", "1")), Delivery::Buffered);
        assert!(removed.received.is_empty());
        assert_eq!(registry.take_pending(), vec![table("a", "1")]);
        assert_eq!(registry.pending_len(), 0);
    }

    #[derive(Debug, Default)]
    struct PanicsOnFirst {
        calls: usize,
    }

    impl Aggregator for PanicsOnFirst {
        fn register_implementors(&mut self, _table: ImplementorsTable) {
            self.calls += 1;
            assert!(self.calls > 1, "aggregator failed");
        }
    }

    #[test]
    fn test_panicking_install_keeps_remaining_tables() {
        let mut registry = Registry::new();
        registry.submit(table("a", "1"));
        registry.submit(table("b", "2"));
        registry.submit(table("c", "3"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.install(PanicsOnFirst::default());
        }));

        assert!(result.is_err());
        assert!(!registry.is_ready());
        assert_eq!(registry.take_pending(), vec![table("b", "2"), table("c", "3")]);
    }

    #[test]
    fn test_aggregator_mut_reaches_installed_consumer() {
        let mut registry = Registry::new();
        registry.install(Recorder::default());
        registry.submit(table("a", "1"));

        registry.aggregator_mut().unwrap().received.clear();

        assert!(registry.aggregator().unwrap().received.is_empty());
    }

    #[test]
    fn test_closure_aggregator() {
        let mut seen = 0;
        {
            let mut registry = Registry::new();
            registry.submit(table("a", "1"));
            registry.install(|t: ImplementorsTable| seen += t.entry_count());
            registry.submit(table("b", "2"));
        }
        assert_eq!(seen, 2);
    }
}
