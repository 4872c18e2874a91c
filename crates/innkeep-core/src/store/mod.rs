// ── Reactive data store ──
//
// Lock-free entity storage with push-based change notification and
// optimistic edits keyed by operation id.

mod collection;
mod data_store;
mod optimistic;

pub use collection::EntityCollection;
pub use data_store::DataStore;
pub use optimistic::OperationId;
pub(crate) use optimistic::Edit;
