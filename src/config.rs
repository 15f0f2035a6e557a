//! Decoder resource limits

/// Limits applied by every decode container
///
/// A peer controls declared lengths and nesting before sending any matching
/// content, so both are bounded before anything is buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum number of simultaneously open constructed values, including
    /// those opened by enclosing decodes of embedded structures
    pub max_nesting_depth: usize,
    /// Largest value the container will materialize for a single TLV
    pub max_value_length: usize,
    /// Largest total size of the outermost TLV of a message
    pub max_pdu_size: usize,
}

impl DecoderConfig {
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;
    pub const DEFAULT_MAX_VALUE_LENGTH: usize = 1 << 20;
    pub const DEFAULT_MAX_PDU_SIZE: usize = 4 << 20;

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_max_value_length(mut self, length: usize) -> Self {
        self.max_value_length = length;
        self
    }

    pub fn with_max_pdu_size(mut self, size: usize) -> Self {
        self.max_pdu_size = size;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
            max_value_length: Self::DEFAULT_MAX_VALUE_LENGTH,
            max_pdu_size: Self::DEFAULT_MAX_PDU_SIZE,
        }
    }
}
