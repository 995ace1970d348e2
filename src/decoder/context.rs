//! Cross-transaction state for `READ_CMD_BUFF` polling

use crate::commands::CommandDescriptor;

/// Remembers the last command whose answer must be polled.
///
/// Owned by a single decoder instance. Written when a non-immediate
/// transaction closes, read when a later `READ_CMD_BUFF` opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeferredResponseContext {
    last_non_immediate: Option<u8>,
}

impl DeferredResponseContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Opcode of the most recent non-immediate command, if any
    pub fn last_non_immediate(&self) -> Option<u8> {
        self.last_non_immediate
    }

    /// Record a closed transaction. Immediate commands are ignored.
    pub fn record(&mut self, descriptor: &CommandDescriptor) {
        if !descriptor.immediate_response {
            self.last_non_immediate = Some(descriptor.id);
        }
    }

    /// Forget everything, for a new capture
    pub fn clear(&mut self) {
        self.last_non_immediate = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{lookup, opcode};

    #[test]
    fn test_immediate_commands_do_not_overwrite() {
        let mut ctx = DeferredResponseContext::new();
        assert_eq!(ctx.last_non_immediate(), None);

        ctx.record(&lookup(opcode::FIFO_INFO));
        assert_eq!(ctx.last_non_immediate(), Some(opcode::FIFO_INFO));

        ctx.record(&lookup(opcode::FRR_A_READ));
        ctx.record(&lookup(opcode::READ_CMD_BUFF));
        assert_eq!(ctx.last_non_immediate(), Some(opcode::FIFO_INFO));

        ctx.record(&lookup(0x99));
        assert_eq!(ctx.last_non_immediate(), Some(0x99));

        ctx.clear();
        assert_eq!(ctx.last_non_immediate(), None);
    }
}
