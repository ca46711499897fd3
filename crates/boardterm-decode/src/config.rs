//! Decoder configuration (§4.1, §1.1 ambient configuration layer).

/// Behavior switches for [`crate::machine::Decoder`] (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Accept raw `0x80..=0x9F` as C1 controls rather than requiring the
    /// 7-bit `ESC` re-entry form.
    pub c1_8bit_representation_enabled: bool,
    /// OSC command strings may terminate on `BEL` as well as `ESC \`/`ST`.
    pub osc_terminated_by_bel: bool,
    /// DCS/PM/APC command strings may terminate on `BEL`.
    pub command_string_terminated_by_bel: bool,
    /// SOS character strings may terminate on `BEL`.
    pub character_string_terminated_by_bel: bool,
    /// Recognize `ESC k … ST` as a title-definition character string.
    pub title_definition_string_enabled: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            c1_8bit_representation_enabled: true,
            osc_terminated_by_bel: true,
            command_string_terminated_by_bel: false,
            character_string_terminated_by_bel: false,
            title_definition_string_enabled: true,
        }
    }
}
