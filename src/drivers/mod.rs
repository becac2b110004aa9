//! The two-tier driver runtime.
//!
//! Tier one is the generic interpreted path: init walks the model's byte
//! sequence, display transmits the framebuffer behind the model's display
//! command, sleep sends the configured command/data pair. Tier two is a set
//! of per-controller-family overrides for refresh behavior the sequence
//! language cannot express; [`Driver::for_model`] wires them into the five
//! optional slots from the model's family tag.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{ControllerFamily, ModelConfig, RefreshMode};
use crate::error::DriverResult;
use crate::interface::DisplayInterface;
use crate::rect::Rect;
use crate::sequence::run_sequence;

pub(crate) mod acep;
pub(crate) mod color4;
pub(crate) mod ssd1677;
pub(crate) mod ssd1680;
pub(crate) mod uc8179;

/// Replaces the whole interpreted init.
pub(crate) type InitFn<SPI, BUSY, DC, RST, DELAY> = fn(
    &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    &mut SPI,
    &ModelConfig,
    RefreshMode,
    &AtomicBool,
) -> DriverResult;

/// Replaces the generic framebuffer transmission. Receives the primary
/// buffer and, for two-plane panels, the chromatic one.
pub(crate) type DisplayFn<SPI, BUSY, DC, RST, DELAY> = fn(
    &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    &mut SPI,
    &ModelConfig,
    &[u8],
    Option<&[u8]>,
    &AtomicBool,
) -> DriverResult;

/// Runs before or after the display body.
pub(crate) type HookFn<SPI, BUSY, DC, RST, DELAY> = fn(
    &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    &mut SPI,
    &ModelConfig,
    RefreshMode,
    &AtomicBool,
) -> DriverResult;

/// Transmits one window of the full-panel buffer.
pub(crate) type RegionFn<SPI, BUSY, DC, RST, DELAY> = fn(
    &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    &mut SPI,
    &ModelConfig,
    &[u8],
    Rect,
    &AtomicBool,
) -> DriverResult;

/// A model's configuration plus its override slots. Empty slots fall back
/// to the generic interpreted path.
#[derive(Debug)]
pub struct Driver<SPI, BUSY, DC, RST, DELAY> {
    pub(crate) config: &'static ModelConfig,
    pub(crate) custom_init: Option<InitFn<SPI, BUSY, DC, RST, DELAY>>,
    pub(crate) custom_display: Option<DisplayFn<SPI, BUSY, DC, RST, DELAY>>,
    pub(crate) pre_display: Option<HookFn<SPI, BUSY, DC, RST, DELAY>>,
    pub(crate) post_display: Option<HookFn<SPI, BUSY, DC, RST, DELAY>>,
    pub(crate) custom_display_region: Option<RegionFn<SPI, BUSY, DC, RST, DELAY>>,
    pub(crate) post_display_region: Option<HookFn<SPI, BUSY, DC, RST, DELAY>>,
}

impl<SPI, BUSY, DC, RST, DELAY> Driver<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Wires the override slots for `config`'s controller family.
    pub fn for_model(config: &'static ModelConfig) -> Self {
        let mut driver = Driver {
            config,
            custom_init: None,
            custom_display: None,
            pre_display: None,
            post_display: None,
            custom_display_region: None,
            post_display_region: None,
        };
        match config.family {
            ControllerFamily::Generic => {}
            ControllerFamily::Ssd1680 => {
                driver.custom_init = Some(ssd1680::init);
                driver.post_display = Some(ssd1680::post_display);
            }
            ControllerFamily::Ssd1677 => {
                driver.post_display = Some(ssd1677::post_display);
            }
            ControllerFamily::GateColor4 => {
                driver.pre_display = Some(color4::pre_display);
                driver.post_display = Some(color4::post_display);
            }
            ControllerFamily::Acep => {
                driver.post_display = Some(acep::post_display);
            }
            ControllerFamily::AcepRebooster => {
                driver.post_display = Some(acep::post_display_rebooster);
            }
            ControllerFamily::Uc8176 => {
                driver.custom_display = Some(uc8179::display_two_planes);
                driver.post_display = Some(uc8179::post_display);
            }
            ControllerFamily::Uc8179Mono => {
                driver.custom_display = Some(uc8179::display_inverted);
                driver.post_display = Some(uc8179::post_display);
                driver.custom_display_region = Some(uc8179::display_region);
                driver.post_display_region = Some(uc8179::post_display_region);
            }
            ControllerFamily::Uc8179Bwr => {
                driver.custom_display = Some(uc8179::display_two_planes);
                driver.post_display = Some(uc8179::post_display);
                driver.custom_display_region = Some(uc8179::display_region_bwr);
                driver.post_display_region = Some(uc8179::post_display_region);
            }
        }
        driver
    }

    pub fn config(&self) -> &'static ModelConfig {
        self.config
    }
}

/// Interpreted init: walk the sequence selected by `mode`.
pub(crate) fn generic_init<SPI, BUSY, DC, RST, DELAY>(
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
    run_sequence(io, spi, config, config.sequence_for(mode), cancel)
}

/// Generic transmission: primary buffer behind `display_cmd`; the
/// secondary command is announced without payload unless a second plane is
/// supplied (overrides send real data there).
pub(crate) fn generic_display<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    primary: &[u8],
    secondary: Option<&[u8]>,
    _cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    io.cmd(spi, config.display_cmd)?;
    io.data(spi, primary)?;
    if config.display_cmd_2 != 0 {
        io.cmd(spi, config.display_cmd_2)?;
        if let Some(secondary) = secondary {
            io.data(spi, secondary)?;
        }
    }
    Ok(())
}

pub(crate) fn generic_sleep<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    io.cmd_with_data(spi, config.sleep_cmd, config.sleep_data)
}
