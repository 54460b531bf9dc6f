//! Load-order-safe delivery of rustdoc implementor tables to a page aggregator.

pub mod cli;
pub mod error;
pub mod fragment;
pub mod loader;
pub mod page;
pub mod registry;
pub mod replay;
pub mod shared;
pub mod tracing;
pub mod types;

pub use fragment::Fragment;
pub use page::PageImplementors;
pub use registry::{Aggregator, Delivery, Registry};
pub use shared::SharedRegistry;
pub use types::{GroupKey, ImplementorEntry, ImplementorsTable};
