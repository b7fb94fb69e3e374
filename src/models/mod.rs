pub mod invocation;
pub mod item;
pub mod snapshot;

pub use invocation::{IngestionOutcome, IngestionReport, InvocationResponse};
pub use item::{ItemError, ItemMap, ItemValue};
pub use snapshot::SnapshotRecord;
