pub mod annotation;
pub mod context;
pub mod machine;

pub use annotation::{Annotation, AnnotationKind, ByteAnnotation, HexBytes, Label, TransactionSummary};
pub use context::DeferredResponseContext;
pub use machine::TransactionDecoder;
