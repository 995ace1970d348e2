#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod commands;
pub mod config;
pub mod decoder;

pub use bus::{BusEvent, ByteEvent, ByteRole, Timestamp, Transaction};
pub use commands::{lookup, CommandDescriptor, FieldOverflow};
pub use decoder::{
    Annotation, AnnotationKind, ByteAnnotation, DeferredResponseContext, TransactionDecoder,
    TransactionSummary,
};
