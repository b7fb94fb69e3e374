pub mod connection;
pub mod snapshot_table;

pub use connection::*;
pub use snapshot_table::*;
