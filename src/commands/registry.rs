//! Static Si4467 command table
//!
//! Field names follow the Si446x API reference. Response lists exclude the
//! CTS byte, which the decoder handles itself.

use crate::commands::types::{opcode, CommandDescriptor, FieldOverflow};

/// Command whose response is fetched later through `READ_CMD_BUFF`
const fn polled(
    id: u8,
    name: &'static str,
    argument_fields: &'static [&'static str],
    response_fields: &'static [&'static str],
) -> CommandDescriptor {
    CommandDescriptor {
        id,
        name,
        argument_fields,
        response_fields,
        immediate_response: false,
        argument_overflow: FieldOverflow::Unknown,
        response_overflow: FieldOverflow::Unknown,
    }
}

/// Command answering in the same transaction, right after the opcode
const fn immediate(
    id: u8,
    name: &'static str,
    response_fields: &'static [&'static str],
) -> CommandDescriptor {
    CommandDescriptor {
        id,
        name,
        argument_fields: &["CMD"],
        response_fields,
        immediate_response: true,
        argument_overflow: FieldOverflow::Unknown,
        response_overflow: FieldOverflow::Unknown,
    }
}

const HOP_ARGS: &[&str] = &["CMD", "INTE", "FRAC2", "FRAC1", "FRAC0", "VCO_CNT1", "VCO_CNT0"];

const GPIO_FIELDS: &[&str] = &["GPIO0", "GPIO1", "GPIO2", "GPIO3", "NIRQ", "SDO", "GEN_CONFIG"];

/// Every command known to the decoder, one entry per opcode
pub static COMMANDS: &[CommandDescriptor] = &[
    polled(opcode::NOP, "NOP", &["CMD"], &[]),
    polled(
        opcode::PART_INFO,
        "PART_INFO",
        &["CMD"],
        &["CHIPREV", "PART_HI", "PART_LO", "PBUILD", "ID_HI", "ID_LO", "CUSTOMER", "ROMID"],
    ),
    polled(
        opcode::POWER_UP,
        "POWER_UP",
        &["CMD", "BOOT_OPTIONS", "XTAL_OPTIONS", "XO_FREQ_3", "XO_FREQ_2", "XO_FREQ_1", "XO_FREQ_0"],
        &[],
    ),
    polled(
        opcode::FUNC_INFO,
        "FUNC_INFO",
        &["CMD"],
        &["REVEXT", "REVBRANCH", "REVINT", "PATCH_HI", "PATCH_LO", "FUNC"],
    ),
    polled(
        opcode::SET_PROPERTY,
        "SET_PROPERTY",
        &[
            "CMD", "GROUP", "NUM_PROPS", "START_PROP", "DATA0", "DATA1", "DATA2", "DATA3",
            "DATA4", "DATA5", "DATA6", "DATA7", "DATA8", "DATA9", "DATA10", "DATA11",
        ],
        &[],
    ),
    polled(
        opcode::GET_PROPERTY,
        "GET_PROPERTY",
        &["CMD", "GROUP", "NUM_PROPS", "START_PROP"],
        &[
            "DATA0", "DATA1", "DATA2", "DATA3", "DATA4", "DATA5", "DATA6", "DATA7", "DATA8",
            "DATA9", "DATA10", "DATA11", "DATA12", "DATA13", "DATA14", "DATA15",
        ],
    ),
    polled(
        opcode::GPIO_PIN_CFG,
        "GPIO_PIN_CFG",
        &["CMD", "GPIO0", "GPIO1", "GPIO2", "GPIO3", "NIRQ", "SDO", "GEN_CONFIG"],
        GPIO_FIELDS,
    ),
    polled(
        opcode::GET_ADC_READING,
        "GET_ADC_READING",
        &["CMD", "ADC_EN", "ADC_CFG"],
        &[
            "GPIO_ADC_HI",
            "GPIO_ADC_LO",
            "BATTERY_ADC_HI",
            "BATTERY_ADC_LO",
            "TEMP_ADC_HI",
            "TEMP_ADC_LO",
            "TEMP_SLOPE",
            "TEMP_INTERCEPT",
        ],
    ),
    polled(
        opcode::FIFO_INFO,
        "FIFO_INFO",
        &["CMD", "FIFO"],
        &["RX_FIFO_COUNT", "TX_FIFO_SPACE"],
    ),
    polled(
        opcode::PACKET_INFO,
        "PACKET_INFO",
        &["CMD", "FIELD_NUMBER", "LEN_HI", "LEN_LO", "DIFF_LEN_HI", "DIFF_LEN_LO"],
        &["LENGTH_HI", "LENGTH_LO"],
    ),
    polled(
        opcode::IRCAL,
        "IRCAL",
        &["CMD", "SEARCHING_STEP_SIZE", "SEARCHING_RSSI_AVG", "RX_CHAIN_SETTING1", "RX_CHAIN_SETTING2"],
        &[],
    ),
    polled(
        opcode::IRCAL_MANUAL,
        "IRCAL_MANUAL",
        &["CMD", "IRCAL_AMP", "IRCAL_PH"],
        &["IRCAL_AMP_REPLY", "IRCAL_PH_REPLY"],
    ),
    polled(
        opcode::GET_INT_STATUS,
        "GET_INT_STATUS",
        &["CMD", "PH_CLR_PEND", "MODEM_CLR_PEND", "CHIP_CLR_PEND"],
        &[
            "INT_PEND",
            "INT_STATUS",
            "PH_PEND",
            "PH_STATUS",
            "MODEM_PEND",
            "MODEM_STATUS",
            "CHIP_PEND",
            "CHIP_STATUS",
        ],
    ),
    polled(
        opcode::GET_PH_STATUS,
        "GET_PH_STATUS",
        &["CMD", "PH_CLR_PEND"],
        &["PH_PEND", "PH_STATUS"],
    ),
    polled(
        opcode::GET_MODEM_STATUS,
        "GET_MODEM_STATUS",
        &["CMD", "MODEM_CLR_PEND"],
        &[
            "MODEM_PEND",
            "MODEM_STATUS",
            "CURR_RSSI",
            "LATCH_RSSI",
            "ANT1_RSSI",
            "ANT2_RSSI",
            "AFC_FREQ_OFFSET_HI",
            "AFC_FREQ_OFFSET_LO",
        ],
    ),
    polled(
        opcode::GET_CHIP_STATUS,
        "GET_CHIP_STATUS",
        &["CMD", "CHIP_CLR_PEND"],
        &["CHIP_PEND", "CHIP_STATUS", "CMD_ERR_STATUS", "CMD_ERR_CMD_ID"],
    ),
    polled(
        opcode::START_TX,
        "START_TX",
        &["CMD", "CHANNEL", "CONDITION", "TX_LEN_HI", "TX_LEN_LO", "TX_DELAY", "NUM_REPEAT"],
        &[],
    ),
    polled(
        opcode::START_RX,
        "START_RX",
        &[
            "CMD",
            "CHANNEL",
            "CONDITION",
            "RX_LEN_HI",
            "RX_LEN_LO",
            "NEXT_STATE1",
            "NEXT_STATE2",
            "NEXT_STATE3",
        ],
        &[],
    ),
    polled(
        opcode::REQUEST_DEVICE_STATE,
        "REQUEST_DEVICE_STATE",
        &["CMD"],
        &["CURR_STATE", "CURRENT_CHANNEL"],
    ),
    polled(opcode::CHANGE_STATE, "CHANGE_STATE", &["CMD", "NEXT_STATE1"], &[]),
    polled(opcode::RX_HOP, "RX_HOP", HOP_ARGS, &[]),
    polled(opcode::TX_HOP, "TX_HOP", HOP_ARGS, &[]),
    polled(opcode::OFFLINE_RECAL, "OFFLINE_RECAL", &["CMD"], &[]),
    immediate(opcode::READ_CMD_BUFF, "READ_CMD_BUFF", &["CTS"]),
    // FRR reads return all four registers, rotated to start at their own
    immediate(
        opcode::FRR_A_READ,
        "FRR_A_READ",
        &["FRR_A_VALUE", "FRR_B_VALUE", "FRR_C_VALUE", "FRR_D_VALUE"],
    ),
    immediate(
        opcode::FRR_B_READ,
        "FRR_B_READ",
        &["FRR_B_VALUE", "FRR_C_VALUE", "FRR_D_VALUE", "FRR_A_VALUE"],
    ),
    immediate(
        opcode::FRR_C_READ,
        "FRR_C_READ",
        &["FRR_C_VALUE", "FRR_D_VALUE", "FRR_A_VALUE", "FRR_B_VALUE"],
    ),
    immediate(
        opcode::FRR_D_READ,
        "FRR_D_READ",
        &["FRR_D_VALUE", "FRR_A_VALUE", "FRR_B_VALUE", "FRR_C_VALUE"],
    ),
    CommandDescriptor {
        id: opcode::WRITE_TX_FIFO,
        name: "WRITE_TX_FIFO",
        argument_fields: &["CMD"],
        response_fields: &[],
        immediate_response: false,
        argument_overflow: FieldOverflow::Indexed("DATA"),
        response_overflow: FieldOverflow::Unknown,
    },
    CommandDescriptor {
        id: opcode::READ_RX_FIFO,
        name: "READ_RX_FIFO",
        argument_fields: &["CMD"],
        response_fields: &[],
        immediate_response: true,
        argument_overflow: FieldOverflow::Unknown,
        // RX FIFO drains are as open-ended as TX FIFO writes
        response_overflow: FieldOverflow::Indexed("DATA"),
    },
];

/// Look up the descriptor for an opcode.
///
/// Never fails: unmapped opcodes get a synthesized "Unknown command"
/// descriptor carrying the queried id.
pub fn lookup(id: u8) -> CommandDescriptor {
    COMMANDS
        .iter()
        .find(|desc| desc.id == id)
        .copied()
        .unwrap_or(CommandDescriptor::unknown(id))
}

/// Returns true if the opcode has an entry in the command table
pub fn is_known(id: u8) -> bool {
    COMMANDS.iter().any(|desc| desc.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRR_NAMES: [&str; 4] = ["FRR_A_VALUE", "FRR_B_VALUE", "FRR_C_VALUE", "FRR_D_VALUE"];

    #[test]
    fn test_lookup_returns_queried_id() {
        for id in 0..=u8::MAX {
            assert_eq!(lookup(id).id, id);
        }
    }

    #[test]
    fn test_one_descriptor_per_opcode() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate opcode 0x{:02x}", a.id);
            }
        }
    }

    #[test]
    fn test_argument_lists_start_with_cmd() {
        for desc in COMMANDS {
            assert_eq!(desc.argument_fields.first(), Some(&"CMD"), "{}", desc.name);
        }
    }

    #[test]
    fn test_frr_rotation() {
        let variants = [
            (opcode::FRR_A_READ, 0),
            (opcode::FRR_B_READ, 1),
            (opcode::FRR_C_READ, 2),
            (opcode::FRR_D_READ, 3),
        ];

        for (id, start) in variants {
            let desc = lookup(id);
            assert!(desc.immediate_response);
            assert_eq!(desc.response_fields.len(), 4);
            for (k, field) in desc.response_fields.iter().enumerate() {
                assert_eq!(*field, FRR_NAMES[(start + k) % 4]);
            }
        }
    }

    #[test]
    fn test_immediate_response_set() {
        let immediate: Vec<u8> = COMMANDS
            .iter()
            .filter(|desc| desc.immediate_response)
            .map(|desc| desc.id)
            .collect();
        assert_eq!(immediate, vec![0x44, 0x50, 0x51, 0x53, 0x57, 0x77]);
    }

    #[test]
    fn test_unknown_opcode() {
        assert!(!is_known(0x99));
        let desc = lookup(0x99);
        assert_eq!(desc.name, "Unknown command");
        assert!(desc.argument_fields.is_empty());
        assert!(desc.response_fields.is_empty());
        assert!(!desc.immediate_response);
    }

    #[test]
    fn test_known_opcodes() {
        assert!(is_known(opcode::NOP));
        assert_eq!(lookup(0x15).name, "FIFO_INFO");
        assert_eq!(lookup(0x66).name, "WRITE_TX_FIFO");
        assert_eq!(lookup(0x02).argument_fields[1], "BOOT_OPTIONS");
    }
}
