//! Protocol constants for the Si4467 control bus decoder

/// Si4467 command protocol constants
pub mod protocol {
    /// Value returned in the CTS byte when the command buffer is ready
    pub const CTS_READY: u8 = 0xFF;

    /// Combined TX/RX FIFO size in bytes.
    ///
    /// FIFO_INFO counts above this value are impossible on a healthy chip.
    pub const FIFO_SIZE_LIMIT: u8 = 129;

    /// Maximum number of bytes retained per transaction
    pub const MAX_TRANSACTION_LEN: usize = 256;

    /// Maximum length of a single annotation label
    pub const MAX_LABEL_LEN: usize = 48;
}
