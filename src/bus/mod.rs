pub mod transaction;
pub mod types;

pub use transaction::Transaction;
pub use types::{BusEvent, ByteEvent, ByteRole, Timestamp};
