//! Command descriptor types for the Si4467 SPI command set
//!
//! # Transaction Format
//!
//! Every exchange on the bus is bracketed by NSEL (chip select). The first
//! MOSI byte is always the opcode:
//! ```text
//! NSEL low  [opcode][arg1][arg2]...[argN]  NSEL high
//! ```
//!
//! Most commands do not answer in the same transaction. The host polls with
//! `READ_CMD_BUFF` until CTS reads `0xFF`, and the bytes after CTS are the
//! response of the previously issued command:
//! ```text
//! NSEL low  [0x44][CTS][resp0][resp1]...  NSEL high
//! ```
//!
//! The FRR reads and the two FIFO drains answer immediately, in the same
//! transaction, right after the opcode byte.

use core::fmt;

/// Si4467 command opcodes
pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const PART_INFO: u8 = 0x01;
    pub const POWER_UP: u8 = 0x02;
    pub const FUNC_INFO: u8 = 0x10;
    pub const SET_PROPERTY: u8 = 0x11;
    pub const GET_PROPERTY: u8 = 0x12;
    pub const GPIO_PIN_CFG: u8 = 0x13;
    pub const GET_ADC_READING: u8 = 0x14;
    pub const FIFO_INFO: u8 = 0x15;
    pub const PACKET_INFO: u8 = 0x16;
    pub const IRCAL: u8 = 0x17;
    pub const IRCAL_MANUAL: u8 = 0x1A;
    pub const GET_INT_STATUS: u8 = 0x20;
    pub const GET_PH_STATUS: u8 = 0x21;
    pub const GET_MODEM_STATUS: u8 = 0x22;
    pub const GET_CHIP_STATUS: u8 = 0x23;
    pub const START_TX: u8 = 0x31;
    pub const START_RX: u8 = 0x32;
    pub const REQUEST_DEVICE_STATE: u8 = 0x33;
    pub const CHANGE_STATE: u8 = 0x34;
    pub const RX_HOP: u8 = 0x36;
    pub const TX_HOP: u8 = 0x37;
    pub const OFFLINE_RECAL: u8 = 0x38;
    pub const READ_CMD_BUFF: u8 = 0x44;
    pub const FRR_A_READ: u8 = 0x50;
    pub const FRR_B_READ: u8 = 0x51;
    pub const FRR_C_READ: u8 = 0x53;
    pub const FRR_D_READ: u8 = 0x57;
    pub const WRITE_TX_FIFO: u8 = 0x66;
    pub const READ_RX_FIFO: u8 = 0x77;
}

/// Naming rule for byte offsets past the end of a declared field list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOverflow {
    /// The offset has no meaning for this command
    Unknown,
    /// Payload of data-dependent length, named `BASE[n]` with `n` the byte's
    /// offset within the transaction (the opcode is offset 0)
    Indexed(&'static str),
}

/// Resolved name of a single byte position within a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    /// Literal entry of the descriptor's field list
    Named(&'static str),
    /// Generated placeholder for open-ended payloads, carrying the byte offset
    Indexed(&'static str, usize),
    /// Offset outside anything the command defines
    Missing,
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Named(name) => f.write_str(name),
            FieldName::Indexed(base, index) => write!(f, "{}[{}]", base, index),
            FieldName::Missing => Ok(()),
        }
    }
}

/// Static description of one Si4467 command
///
/// `argument_fields[0]` is always the opcode placeholder `"CMD"`; entry `k`
/// names the MOSI byte at offset `k` of the transaction. `response_fields`
/// lists the response bytes in the order the chip returns them, CTS excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub id: u8,
    pub name: &'static str,
    pub argument_fields: &'static [&'static str],
    pub response_fields: &'static [&'static str],
    /// Response follows the opcode in the same transaction, without a CTS gate
    pub immediate_response: bool,
    pub argument_overflow: FieldOverflow,
    pub response_overflow: FieldOverflow,
}

impl CommandDescriptor {
    /// Name used for opcodes missing from the command table
    pub const UNKNOWN_NAME: &'static str = "Unknown command";

    /// Build the placeholder descriptor for an unmapped opcode
    pub const fn unknown(id: u8) -> Self {
        Self {
            id,
            name: Self::UNKNOWN_NAME,
            argument_fields: &[],
            response_fields: &[],
            immediate_response: false,
            argument_overflow: FieldOverflow::Unknown,
            response_overflow: FieldOverflow::Unknown,
        }
    }

    /// Returns true if this is a synthesized descriptor for an unmapped opcode
    pub fn is_unknown(&self) -> bool {
        self.argument_fields.is_empty()
    }

    /// Name of the MOSI byte at `offset` (0 is the opcode itself)
    pub fn argument_field(&self, offset: usize) -> FieldName {
        resolve(self.argument_fields, self.argument_overflow, offset, offset)
    }

    /// Name of the `index`-th response byte (0 is the first byte after CTS
    /// or, for immediate commands, after the opcode)
    ///
    /// Only immediate commands declare an open-ended response, so an indexed
    /// name carries offset `index + 1`.
    pub fn response_field(&self, index: usize) -> FieldName {
        resolve(self.response_fields, self.response_overflow, index, index + 1)
    }
}

fn resolve(
    fields: &'static [&'static str],
    overflow: FieldOverflow,
    index: usize,
    offset: usize,
) -> FieldName {
    match fields.get(index) {
        Some(name) => FieldName::Named(name),
        None => match overflow {
            FieldOverflow::Indexed(base) => FieldName::Indexed(base, offset),
            FieldOverflow::Unknown => FieldName::Missing,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIFO_WRITE: CommandDescriptor = CommandDescriptor {
        id: opcode::WRITE_TX_FIFO,
        name: "WRITE_TX_FIFO",
        argument_fields: &["CMD"],
        response_fields: &[],
        immediate_response: false,
        argument_overflow: FieldOverflow::Indexed("DATA"),
        response_overflow: FieldOverflow::Unknown,
    };

    #[test]
    fn test_indexed_overflow_uses_byte_offset() {
        assert_eq!(FIFO_WRITE.argument_field(0), FieldName::Named("CMD"));
        assert_eq!(FIFO_WRITE.argument_field(1), FieldName::Indexed("DATA", 1));
        assert_eq!(FIFO_WRITE.argument_field(5), FieldName::Indexed("DATA", 5));
        assert_eq!(FIFO_WRITE.response_field(0), FieldName::Missing);
    }

    #[test]
    fn test_indexed_response_uses_byte_offset() {
        let fifo_read = CommandDescriptor {
            id: opcode::READ_RX_FIFO,
            name: "READ_RX_FIFO",
            argument_fields: &["CMD"],
            response_fields: &[],
            immediate_response: true,
            argument_overflow: FieldOverflow::Unknown,
            response_overflow: FieldOverflow::Indexed("DATA"),
        };
        assert_eq!(fifo_read.response_field(0), FieldName::Indexed("DATA", 1));
        assert_eq!(fifo_read.response_field(3), FieldName::Indexed("DATA", 4));
        assert_eq!(fifo_read.argument_field(1), FieldName::Missing);
    }

    #[test]
    fn test_field_name_display() {
        assert_eq!(FieldName::Named("GROUP").to_string(), "GROUP");
        assert_eq!(FieldName::Indexed("DATA", 12).to_string(), "DATA[12]");
        assert_eq!(FieldName::Missing.to_string(), "");
    }

    #[test]
    fn test_unknown_descriptor() {
        let desc = CommandDescriptor::unknown(0x99);
        assert_eq!(desc.id, 0x99);
        assert_eq!(desc.name, "Unknown command");
        assert!(desc.is_unknown());
        assert!(!desc.immediate_response);
        assert_eq!(desc.argument_field(0), FieldName::Missing);
        assert_eq!(desc.response_field(0), FieldName::Missing);
    }
}
