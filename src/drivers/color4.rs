//! Four-color gate-driver panel overrides: the charge pump must be enabled
//! around every refresh and powered back down afterwards.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{ModelConfig, RefreshMode};
use crate::error::DriverResult;
use crate::interface::{DisplayInterface, BUSY_TIMEOUT_MS};

/// Charge pump on, power on, wait ready.
pub(crate) fn pre_display<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    _mode: RefreshMode,
    cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    io.cmd_with_data(spi, 0x68, &[0x01])?;
    io.cmd(spi, 0x04)?;
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)
}

/// Charge pump off, refresh, power off.
pub(crate) fn post_display<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    _mode: RefreshMode,
    cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    io.cmd_with_data(spi, 0x68, &[0x00])?;
    io.cmd_with_data(spi, 0x12, &[0x01])?;
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)?;
    io.cmd_with_data(spi, 0x02, &[0x00])?;
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
        name: "gate-test",
        width: 122,
        height: 250,
        format: PixelFormat::Color4,
        busy: BusyPolarity::Low,
        reset_ms: [20, 2, 20],
        display_cmd: 0x10,
        display_cmd_2: 0,
        seq_full: &[SEQ_END],
        seq_fast: None,
        seq_partial: None,
        sleep_cmd: 0x07,
        sleep_data: &[0xA5],
        caps: Capabilities::empty(),
        family: ControllerFamily::GateColor4,
    };

    #[test]
    fn charge_pump_brackets_the_refresh() {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::Low);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let cancel = AtomicBool::new(false);
        pre_display(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        assert_eq!(
            pins.ops(),
            vec![
                BusOp::Command(0x68),
                BusOp::Data(0x01),
                BusOp::Command(0x04),
            ]
        );
        pins.clear_ops();
        post_display(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        assert_eq!(
            pins.ops(),
            vec![
                BusOp::Command(0x68),
                BusOp::Data(0x00),
                BusOp::Command(0x12),
                BusOp::Data(0x01),
                BusOp::Command(0x02),
                BusOp::Data(0x00),
            ]
        );
    }
}
