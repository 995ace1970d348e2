pub mod registry;
pub mod types;

pub use registry::{is_known, lookup, COMMANDS};
pub use types::{opcode, CommandDescriptor, FieldName, FieldOverflow};
