//! SSD1680-class overrides: waveform LUT load at init, master activation
//! with mode-specific update control.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{ModelConfig, RefreshMode};
use crate::error::DriverResult;
use crate::interface::{DisplayInterface, BUSY_TIMEOUT_MS};

/// Waveform for a clean full refresh.
#[rustfmt::skip]
const LUT_FULL: [u8; 30] = [
    0x02, 0x02, 0x01, 0x11, 0x12, 0x12, 0x22, 0x22, 0x66, 0x69,
    0x69, 0x59, 0x58, 0x99, 0x99, 0x88, 0x00, 0x00, 0x00, 0x00,
    0xF8, 0xB4, 0x13, 0x51, 0x35, 0x51, 0x51, 0x19, 0x01, 0x00,
];

/// Short waveform for partial refreshes; ghosts until the next full one.
#[rustfmt::skip]
const LUT_PARTIAL: [u8; 30] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, 0x08, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x13, 0x14,
    0x44, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Interpreted init plus the 0x32 LUT load matching the mode.
pub(crate) fn init<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    mode: RefreshMode,
    cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    super::generic_init(io, spi, config, mode, cancel)?;
    let lut: &[u8] = match mode {
        RefreshMode::Partial => &LUT_PARTIAL,
        RefreshMode::Full | RefreshMode::Fast => &LUT_FULL,
    };
    io.cmd_with_data(spi, 0x32, lut)
}

/// Display update control, master activation, frame-write terminator.
pub(crate) fn post_display<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    mode: RefreshMode,
    cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    match mode {
        RefreshMode::Partial => {
            io.cmd_with_data(spi, 0x22, &[0x1C])?;
            io.cmd(spi, 0x20)?;
        }
        RefreshMode::Full | RefreshMode::Fast => {
            io.cmd_with_data(spi, 0x22, &[0xC4])?;
            io.cmd(spi, 0x20)?;
            io.cmd(spi, 0xFF)?;
        }
    }
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusyPolarity, Capabilities, ControllerFamily};
    use crate::format::PixelFormat;
    use crate::mock::{BusOp, MockPins};
    use crate::sequence::SEQ_END;

    static MODEL: ModelConfig = ModelConfig {
        name: "lut-test",
        width: 128,
        height: 296,
        format: PixelFormat::Mono,
        busy: BusyPolarity::High,
        reset_ms: [20, 2, 20],
        display_cmd: 0x24,
        display_cmd_2: 0,
        seq_full: &[SEQ_END],
        seq_fast: None,
        seq_partial: Some(&[SEQ_END]),
        sleep_cmd: 0x10,
        sleep_data: &[0x01],
        caps: Capabilities::PARTIAL,
        family: ControllerFamily::Ssd1680,
    };

    #[test]
    fn init_appends_the_mode_lut() {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::High);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let cancel = AtomicBool::new(false);
        init(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        let ops = pins.ops();
        assert_eq!(ops[0], BusOp::Command(0x32));
        assert_eq!(ops.len(), 31);
        assert_eq!(ops[1], BusOp::Data(LUT_FULL[0]));

        pins.clear_ops();
        init(&mut io, &mut spi, &MODEL, RefreshMode::Partial, &cancel).unwrap();
        assert_eq!(pins.ops()[1], BusOp::Data(LUT_PARTIAL[0]));
    }

    #[test]
    fn full_and_partial_activation_differ() {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::High);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let cancel = AtomicBool::new(false);
        post_display(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        assert_eq!(
            pins.ops(),
            vec![
                BusOp::Command(0x22),
                BusOp::Data(0xC4),
                BusOp::Command(0x20),
                BusOp::Command(0xFF),
            ]
        );
        pins.clear_ops();
        post_display(&mut io, &mut spi, &MODEL, RefreshMode::Partial, &cancel).unwrap();
        assert_eq!(
            pins.ops(),
            vec![BusOp::Command(0x22), BusOp::Data(0x1C), BusOp::Command(0x20)]
        );
    }
}
