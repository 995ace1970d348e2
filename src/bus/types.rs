//! Bus event types delivered by the byte-event producer

/// Capture timestamp in producer ticks
pub type Timestamp = u64;

/// Semantic role of a byte within a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRole {
    /// Opcode, first MOSI byte of the transaction
    Command,
    /// Host-to-device argument (MOSI)
    Argument,
    /// Device-to-host response (MISO)
    Response,
}

/// A single classified byte of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteEvent {
    pub value: u8,
    pub start: Timestamp,
    pub end: Timestamp,
    pub role: ByteRole,
}

/// Raw event on the SPI bus, in bus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// NSEL went active
    Assert(Timestamp),
    /// One full-duplex byte transfer
    Byte {
        mosi: u8,
        miso: u8,
        start: Timestamp,
        end: Timestamp,
    },
    /// NSEL went inactive
    Deassert(Timestamp),
}

impl BusEvent {
    /// Earliest timestamp carried by this event
    pub fn timestamp(&self) -> Timestamp {
        match self {
            BusEvent::Assert(t) | BusEvent::Deassert(t) => *t,
            BusEvent::Byte { start, .. } => *start,
        }
    }
}
