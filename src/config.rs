//! Static per-model configuration.

use bitflags::bitflags;

use crate::format::PixelFormat;

bitflags! {
    /// What a model can do beyond a plain full refresh.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Has a partial-refresh init sequence.
        const PARTIAL = 1 << 0;
        /// Has a fast-refresh init sequence.
        const FAST = 1 << 1;
        /// Four-level grayscale panel.
        const GRAYSCALE = 1 << 2;
        /// Refresh transmits two buffers (black + chromatic plane).
        const DUAL_BUF = 1 << 3;
        /// Supports window-limited regional refresh.
        const REGIONAL = 1 << 4;
    }
}

/// The level the BUSY pin holds while the controller is processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyPolarity {
    High,
    Low,
}

impl BusyPolarity {
    /// The opposite level; some power-off waits watch the pin release in
    /// the other direction.
    pub const fn inverted(self) -> BusyPolarity {
        match self {
            BusyPolarity::High => BusyPolarity::Low,
            BusyPolarity::Low => BusyPolarity::High,
        }
    }
}

/// Which refresh behavior a model's controller needs beyond the generic
/// interpreted path. Selects the override wiring in
/// [`Driver::for_model`](crate::drivers::Driver::for_model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerFamily {
    /// Fully served by the interpreted sequences.
    Generic,
    /// SSD1680-class: waveform LUT loaded at init, 0x22/0x20 activation.
    Ssd1680,
    /// SSD1677/SSD1683-class: 0x22/0x20 activation with 0xF7/0xFF modes.
    Ssd1677,
    /// Four-color gate-driver panels with the charge-pump dance.
    GateColor4,
    /// Seven-color ACeP with power-cycled refresh.
    Acep,
    /// ACeP variant that re-programs the booster before each refresh.
    AcepRebooster,
    /// UC8176: two data transmissions per refresh.
    Uc8176,
    /// UC8179 mono: second buffer is the bitwise inversion of the first.
    Uc8179Mono,
    /// UC8179 black/white/red: two planes plus regional windows.
    Uc8179Bwr,
}

/// Which init sequence to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    #[default]
    Full,
    Fast,
    Partial,
}

/// One display model, as emitted into the static table.
#[derive(Debug)]
pub struct ModelConfig {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub busy: BusyPolarity,
    /// Reset pin timing: pre-high, low, post-high milliseconds.
    pub reset_ms: [u16; 3],
    /// Primary framebuffer transmission command.
    pub display_cmd: u8,
    /// Secondary transmission command; zero means none.
    pub display_cmd_2: u8,
    pub seq_full: &'static [u8],
    pub seq_fast: Option<&'static [u8]>,
    pub seq_partial: Option<&'static [u8]>,
    pub sleep_cmd: u8,
    pub sleep_data: &'static [u8],
    pub caps: Capabilities,
    pub family: ControllerFamily,
}

impl ModelConfig {
    /// The init sequence for `mode`, falling back to the full sequence
    /// when the model has no dedicated one.
    pub fn sequence_for(&self, mode: RefreshMode) -> &'static [u8] {
        match mode {
            RefreshMode::Full => self.seq_full,
            RefreshMode::Fast => self.seq_fast.unwrap_or(self.seq_full),
            RefreshMode::Partial => self.seq_partial.unwrap_or(self.seq_full),
        }
    }

    /// Whether refresh data travels as two mono planes instead of one
    /// packed buffer.
    pub fn dual_plane(&self) -> bool {
        self.caps.contains(Capabilities::DUAL_BUF)
    }

    /// Byte length of one mono plane of this panel.
    pub fn plane_len(&self) -> usize {
        PixelFormat::Mono.buffer_len(self.width, self.height)
    }

    /// Byte length of the primary transmission buffer.
    pub fn frame_len(&self) -> usize {
        if self.dual_plane() {
            self.plane_len()
        } else {
            self.format.buffer_len(self.width, self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_fallback_order() {
        let config = ModelConfig {
            name: "test",
            width: 8,
            height: 8,
            format: PixelFormat::Mono,
            busy: BusyPolarity::High,
            reset_ms: [20, 2, 20],
            display_cmd: 0x24,
            display_cmd_2: 0,
            seq_full: &[0xFE],
            seq_fast: None,
            seq_partial: Some(&[0xFC, 0xFE]),
            sleep_cmd: 0x10,
            sleep_data: &[0x01],
            caps: Capabilities::PARTIAL,
            family: ControllerFamily::Generic,
        };
        assert_eq!(config.sequence_for(RefreshMode::Full), &[0xFE]);
        // No fast sequence: falls back to full.
        assert_eq!(config.sequence_for(RefreshMode::Fast), &[0xFE]);
        assert_eq!(config.sequence_for(RefreshMode::Partial), &[0xFC, 0xFE]);
    }

    #[test]
    fn dual_plane_framing() {
        let mut config = ModelConfig {
            name: "test",
            width: 16,
            height: 4,
            format: PixelFormat::Color4,
            busy: BusyPolarity::Low,
            reset_ms: [20, 2, 20],
            display_cmd: 0x10,
            display_cmd_2: 0x13,
            seq_full: &[0xFE],
            seq_fast: None,
            seq_partial: None,
            sleep_cmd: 0x07,
            sleep_data: &[0xA5],
            caps: Capabilities::DUAL_BUF,
            family: ControllerFamily::Uc8176,
        };
        // Two mono planes: 2 bytes per row.
        assert_eq!(config.frame_len(), 8);
        config.caps = Capabilities::empty();
        // Single packed color4 buffer: 8 bytes per row.
        assert_eq!(config.frame_len(), 32);
    }

    #[test]
    fn busy_polarity_inverts() {
        assert_eq!(BusyPolarity::High.inverted(), BusyPolarity::Low);
        assert_eq!(BusyPolarity::Low.inverted(), BusyPolarity::High);
    }
}
