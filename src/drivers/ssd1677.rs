//! SSD1677/SSD1683-class overrides. These controllers carry their waveform
//! in OTP; only the update-control mode differs between full and partial.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{ModelConfig, RefreshMode};
use crate::error::DriverResult;
use crate::interface::{DisplayInterface, BUSY_TIMEOUT_MS};

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
    let update_mode = match mode {
        RefreshMode::Partial => 0xFF,
        RefreshMode::Full | RefreshMode::Fast => 0xF7,
    };
    io.cmd_with_data(spi, 0x22, &[update_mode])?;
    io.cmd(spi, 0x20)?;
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
        name: "otp-test",
        width: 400,
        height: 300,
        format: PixelFormat::Mono,
        busy: BusyPolarity::High,
        reset_ms: [20, 2, 20],
        display_cmd: 0x24,
        display_cmd_2: 0,
        seq_full: &[SEQ_END],
        seq_fast: None,
        seq_partial: None,
        sleep_cmd: 0x10,
        sleep_data: &[0x01],
        caps: Capabilities::PARTIAL,
        family: ControllerFamily::Ssd1677,
    };

    #[test]
    fn update_mode_selects_by_refresh_kind() {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::High);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let cancel = AtomicBool::new(false);
        post_display(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        assert_eq!(
            pins.ops(),
            vec![BusOp::Command(0x22), BusOp::Data(0xF7), BusOp::Command(0x20)]
        );
        pins.clear_ops();
        post_display(&mut io, &mut spi, &MODEL, RefreshMode::Partial, &cancel).unwrap();
        assert_eq!(
            pins.ops(),
            vec![BusOp::Command(0x22), BusOp::Data(0xFF), BusOp::Command(0x20)]
        );
    }
}
