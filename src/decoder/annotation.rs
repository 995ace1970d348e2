//! Annotations emitted by the transaction decoder
//!
//! Byte annotations and transaction summaries are separate types: a byte
//! carries exactly one value, only a summary needs room for a whole
//! transaction.

use crate::bus::types::Timestamp;
use crate::config::protocol::{MAX_LABEL_LEN, MAX_TRANSACTION_LEN};
use core::fmt;
use heapless::{String, Vec};

/// Bounded annotation label
pub type Label = String<MAX_LABEL_LEN>;

/// What an annotation describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Whole transaction, from NSEL assert to deassert
    TransactionSummary,
    /// The opcode byte
    CommandByte,
    /// A MOSI argument byte
    ArgumentByte,
    /// A MISO response byte
    ResponseByte,
}

/// A single classified byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteAnnotation {
    pub start: Timestamp,
    pub end: Timestamp,
    pub kind: AnnotationKind,
    pub label: Label,
    pub value: u8,
}

impl ByteAnnotation {
    pub fn new(kind: AnnotationKind, start: Timestamp, end: Timestamp, label: Label, value: u8) -> Self {
        Self {
            start,
            end,
            kind,
            label,
            value,
        }
    }

    pub fn hex_payload(&self) -> HexBytes<'_> {
        HexBytes(core::slice::from_ref(&self.value))
    }
}

/// Summary of one NSEL transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSummary {
    pub start: Timestamp,
    pub end: Timestamp,
    /// Command name
    pub label: Label,
    /// Retained bytes, in bus order
    pub payload: Vec<u8, MAX_TRANSACTION_LEN>,
    /// Extra status, e.g. a CTS poll that was not ready
    pub note: Option<&'static str>,
    /// The transaction had more bytes than were retained
    pub truncated: bool,
}

impl TransactionSummary {
    pub fn hex_payload(&self) -> HexBytes<'_> {
        HexBytes(&self.payload)
    }
}

/// One decoded item, ready for rendering by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Byte(ByteAnnotation),
    Summary(TransactionSummary),
}

impl Annotation {
    pub fn start(&self) -> Timestamp {
        match self {
            Annotation::Byte(b) => b.start,
            Annotation::Summary(s) => s.start,
        }
    }

    pub fn end(&self) -> Timestamp {
        match self {
            Annotation::Byte(b) => b.end,
            Annotation::Summary(s) => s.end,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Byte(b) => b.kind,
            Annotation::Summary(_) => AnnotationKind::TransactionSummary,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Annotation::Byte(b) => b.label.as_str(),
            Annotation::Summary(s) => s.label.as_str(),
        }
    }

    /// Raw bytes covered by the annotation, in bus order
    pub fn payload(&self) -> &[u8] {
        match self {
            Annotation::Byte(b) => core::slice::from_ref(&b.value),
            Annotation::Summary(s) => &s.payload,
        }
    }

    /// Summary note; byte annotations never carry one
    pub fn note(&self) -> Option<&'static str> {
        match self {
            Annotation::Byte(_) => None,
            Annotation::Summary(s) => s.note,
        }
    }

    pub fn truncated(&self) -> bool {
        matches!(self, Annotation::Summary(s) if s.truncated)
    }

    /// Hex rendering of the payload, e.g. `0x15 0x03`
    pub fn hex_payload(&self) -> HexBytes<'_> {
        HexBytes(self.payload())
    }
}

impl From<ByteAnnotation> for Annotation {
    fn from(byte: ByteAnnotation) -> Self {
        Annotation::Byte(byte)
    }
}

impl From<TransactionSummary> for Annotation {
    fn from(summary: TransactionSummary) -> Self {
        Annotation::Summary(summary)
    }
}

/// Displays bytes as space-separated `0x`-prefixed lowercase hex
#[derive(Debug, Clone, Copy)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "0x{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Format a label, truncating silently if it does not fit.
pub fn label(args: fmt::Arguments) -> Label {
    use core::fmt::Write;

    let mut s = Label::new();
    let _ = s.write_fmt(args);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_payload_format() {
        assert_eq!(HexBytes(&[0x51, 0xAA, 0x0b]).to_string(), "0x51 0xaa 0x0b");
        assert_eq!(HexBytes(&[0x99]).to_string(), "0x99");
        assert_eq!(HexBytes(&[]).to_string(), "");
    }

    #[test]
    fn test_byte_annotation() {
        let byte = ByteAnnotation::new(
            AnnotationKind::ArgumentByte,
            10,
            18,
            label(format_args!("> {}", "GROUP")),
            0x20,
        );
        assert_eq!(byte.hex_payload().to_string(), "0x20");

        let ann = Annotation::from(byte);
        assert_eq!(ann.label(), "> GROUP");
        assert_eq!(ann.kind(), AnnotationKind::ArgumentByte);
        assert_eq!((ann.start(), ann.end()), (10, 18));
        assert_eq!(ann.payload(), &[0x20]);
        assert_eq!(ann.note(), None);
        assert!(!ann.truncated());
    }

    #[test]
    fn test_byte_annotation_does_not_reserve_transaction_buffer() {
        let byte = core::mem::size_of::<ByteAnnotation>();
        let summary = core::mem::size_of::<TransactionSummary>();
        assert!(byte < MAX_TRANSACTION_LEN / 2);
        assert!(summary > MAX_TRANSACTION_LEN);
    }

    #[test]
    fn test_summary_accessors() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&[0x44, 0x00]).unwrap();
        let ann = Annotation::from(TransactionSummary {
            start: 0,
            end: 30,
            label: label(format_args!("READ_CMD_BUFF")),
            payload,
            note: Some("not yet ready"),
            truncated: false,
        });
        assert_eq!(ann.kind(), AnnotationKind::TransactionSummary);
        assert_eq!(ann.hex_payload().to_string(), "0x44 0x00");
        assert_eq!(ann.note(), Some("not yet ready"));
    }

    #[test]
    fn test_label_truncates() {
        let long = "X".repeat(MAX_LABEL_LEN * 2);
        let l = label(format_args!("{}", long));
        assert!(l.len() <= MAX_LABEL_LEN);
    }
}
