//! Seven-color ACeP overrides. These panels power the high-voltage rails
//! up for every refresh and fully down afterwards; the power-off release
//! is signalled on the opposite busy polarity.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{ModelConfig, RefreshMode};
use crate::error::DriverResult;
use crate::interface::{DisplayInterface, BUSY_TIMEOUT_MS};

/// Booster values re-programmed before each refresh on the 7.3" E variant.
const REBOOST: [u8; 4] = [0x6F, 0x1F, 0x17, 0x17];

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
    power_cycle(io, spi, config, cancel, false)
}

pub(crate) fn post_display_rebooster<SPI, BUSY, DC, RST, DELAY>(
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
    power_cycle(io, spi, config, cancel, true)
}

fn power_cycle<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    cancel: &AtomicBool,
    rebooster: bool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    io.cmd(spi, 0x04)?;
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)?;
    if rebooster {
        io.cmd_with_data(spi, 0x06, &REBOOST)?;
    }
    io.cmd_with_data(spi, 0x12, &[0x00])?;
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)?;
    io.cmd_with_data(spi, 0x02, &[0x00])?;
    // The rails discharge with the busy pin released the other way.
    io.wait_until_idle(config.busy.inverted(), BUSY_TIMEOUT_MS, cancel)?;
    io.delay_ms(200);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusyPolarity, Capabilities, ControllerFamily};
    use crate::format::PixelFormat;
    use crate::mock::MockPins;
    use crate::sequence::SEQ_END;

    static MODEL: ModelConfig = ModelConfig {
        name: "acep-test",
        width: 600,
        height: 448,
        format: PixelFormat::Color7,
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
        family: ControllerFamily::Acep,
    };

    #[test]
    fn refresh_is_power_cycled() {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::Low);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let cancel = AtomicBool::new(false);
        post_display(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        assert_eq!(pins.commands(), vec![0x04, 0x12, 0x02]);
        // The 200 ms settle hold at the end.
        assert!(pins.elapsed_ms() >= 200);
    }

    #[test]
    fn rebooster_variant_reprograms_the_booster() {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::Low);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let cancel = AtomicBool::new(false);
        post_display_rebooster(&mut io, &mut spi, &MODEL, RefreshMode::Full, &cancel).unwrap();
        assert_eq!(pins.commands(), vec![0x04, 0x06, 0x12, 0x02]);
    }
}
