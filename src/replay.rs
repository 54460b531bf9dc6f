//! Replays a page load: fragments and the aggregator initialize in a chosen order.

use crate::fragment::Fragment;
use crate::page::PageImplementors;
use crate::registry::Delivery;
use crate::shared::SharedRegistry;

/// Outcome of one simulated page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub page: PageImplementors,
    /// Fragments handed straight to the aggregator.
    pub delivered: usize,
    /// Fragments that waited in the pending queue.
    pub buffered: usize,
}

/// Submit `fragments` in order, installing the aggregator after the first
/// `aggregator_after` of them. Values past the fragment count install it last.
pub fn replay(fragments: Vec<Fragment>, aggregator_after: usize) -> ReplayReport {
    let page: SharedRegistry<PageImplementors> = SharedRegistry::new();
    let mut delivered = 0;
    let mut buffered = 0;

    let install_at = aggregator_after.min(fragments.len());
    for (index, fragment) in fragments.into_iter().enumerate() {
        if index == install_at {
            page.install(PageImplementors::new());
        }
        match fragment.register_shared(&page) {
            Delivery::Delivered => delivered += 1,
            Delivery::Buffered => buffered += 1,
        }
    }
    if !page.is_ready() {
        page.install(PageImplementors::new());
    }

    let page = page.uninstall().unwrap_or_default();
    tracing::info!(
        delivered,
        buffered,
        groups = page.group_count(),
        entries = page.entry_count(),
        "Page load replayed"
    );

    ReplayReport {
        page,
        delivered,
        buffered,
    }
}
