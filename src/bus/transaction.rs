//! Byte accumulator for a single chip-select span

use crate::bus::types::{ByteEvent, Timestamp};
use crate::config::protocol::MAX_TRANSACTION_LEN;
use heapless::Vec;

/// Bytes exchanged between one NSEL assert and the matching deassert.
///
/// Bytes are kept in bus order. Once the buffer is full, further bytes are
/// counted but not stored, so a runaway transfer cannot exhaust memory.
#[derive(Debug, Clone)]
pub struct Transaction {
    start: Timestamp,
    command_id: Option<u8>,
    bytes: Vec<ByteEvent, MAX_TRANSACTION_LEN>,
    dropped: usize,
}

impl Transaction {
    /// Open a new, empty transaction at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            start,
            command_id: None,
            bytes: Vec::new(),
            dropped: 0,
        }
    }

    /// Append a byte in bus order.
    ///
    /// The first byte pushed fixes the command id. Returns the 0-based offset
    /// of the byte within the transaction.
    pub fn push(&mut self, event: ByteEvent) -> usize {
        let offset = self.len();
        if self.command_id.is_none() {
            self.command_id = Some(event.value);
        }

        if self.bytes.push(event).is_err() {
            self.dropped += 1;
        }

        offset
    }

    /// Time the transaction was opened.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Opcode of the transaction, once the first byte has arrived.
    pub fn command_id(&self) -> Option<u8> {
        self.command_id
    }

    /// Retained bytes in bus order.
    pub fn bytes(&self) -> &[ByteEvent] {
        &self.bytes
    }

    /// Total number of bytes seen, including any that were not retained.
    pub fn len(&self) -> usize {
        self.bytes.len() + self.dropped
    }

    /// Returns true if no byte has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if bytes were seen past the retention limit.
    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::types::ByteRole;

    fn byte(value: u8, t: Timestamp) -> ByteEvent {
        ByteEvent {
            value,
            start: t,
            end: t + 8,
            role: ByteRole::Argument,
        }
    }

    #[test]
    fn test_first_byte_sets_command() {
        let mut tx = Transaction::new(100);
        assert!(tx.is_empty());
        assert_eq!(tx.command_id(), None);

        assert_eq!(tx.push(byte(0x15, 110)), 0);
        assert_eq!(tx.push(byte(0x03, 120)), 1);

        assert_eq!(tx.command_id(), Some(0x15));
        assert_eq!(tx.start(), 100);
        assert_eq!(tx.len(), 2);
        let values: std::vec::Vec<u8> = tx.bytes().iter().map(|b| b.value).collect();
        assert_eq!(values, [0x15, 0x03]);
    }

    #[test]
    fn test_overflow_counts_without_storing() {
        let mut tx = Transaction::new(0);
        for i in 0..MAX_TRANSACTION_LEN + 3 {
            assert_eq!(tx.push(byte(i as u8, i as Timestamp)), i);
        }

        assert!(tx.is_truncated());
        assert_eq!(tx.len(), MAX_TRANSACTION_LEN + 3);
        assert_eq!(tx.bytes().len(), MAX_TRANSACTION_LEN);
        assert_eq!(tx.command_id(), Some(0));
    }
}
