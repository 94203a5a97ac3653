//! Model lifecycle: snapshot fetching and the process-lifetime handle

mod fetch;
mod handle;

pub use fetch::SnapshotFetcher;
pub use handle::ModelHandle;
