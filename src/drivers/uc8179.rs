//! UC8176/UC8179 overrides: every refresh transmits two buffers, and the
//! UC8179 additionally supports byte-aligned regional windows.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::config::{ModelConfig, RefreshMode};
use crate::error::DriverResult;
use crate::format::PixelFormat;
use crate::interface::{DisplayInterface, BUSY_TIMEOUT_MS};
use crate::rect::Rect;

/// Two-plane transmission for black/chromatic panels. Without a chromatic
/// plane the secondary transmission is blanked, which displays black-only
/// content.
pub(crate) fn display_two_planes<SPI, BUSY, DC, RST, DELAY>(
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
    io.cmd(spi, config.display_cmd_2)?;
    match secondary {
        Some(secondary) => io.data(spi, secondary),
        None => io.data_x_times(spi, 0xFF, primary.len() as u32),
    }
}

/// UC8179 mono transmission: the second buffer must be the bitwise
/// inversion of the first. The inverted copy lives only for this call.
pub(crate) fn display_inverted<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    primary: &[u8],
    _secondary: Option<&[u8]>,
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
    let inverted: Vec<u8> = primary.iter().map(|b| !b).collect();
    io.cmd(spi, config.display_cmd_2)?;
    io.data(spi, &inverted)
}

/// Refresh, settle, wait ready.
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
    io.cmd(spi, 0x12)?;
    io.delay_ms(100);
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)
}

/// Regional write on the UC8179 mono panels: enter partial mode, program
/// the byte-aligned window, stream the window's rows out of the full
/// framebuffer, refresh.
pub(crate) fn display_region<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    buffer: &[u8],
    region: Rect,
    _cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    enter_partial_window(io, spi, region)?;
    io.cmd(spi, config.display_cmd)?;
    send_region_rows(io, spi, config, buffer, region)?;
    io.cmd(spi, 0x12)?;
    io.delay_ms(100);
    Ok(())
}

/// The black/white/red variant first blanks the old-data plane over the
/// window, then streams the new data on the secondary command.
pub(crate) fn display_region_bwr<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    buffer: &[u8],
    region: Rect,
    _cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    enter_partial_window(io, spi, region)?;
    io.cmd(spi, config.display_cmd)?;
    io.data_x_times(spi, 0xFF, region.aligned_row_bytes() * region.h)?;
    io.cmd(spi, config.display_cmd_2)?;
    send_region_rows(io, spi, config, buffer, region)?;
    io.cmd(spi, 0x12)?;
    io.delay_ms(100);
    Ok(())
}

/// Wait out the refresh, then leave partial mode.
pub(crate) fn post_display_region<SPI, BUSY, DC, RST, DELAY>(
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
    io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)?;
    io.cmd(spi, 0x92)
}

fn enter_partial_window<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    region: Rect,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    let x_end = region.x_end();
    let y_end = region.y_end();
    io.cmd(spi, 0x91)?;
    io.cmd_with_data(
        spi,
        0x90,
        &[
            (region.x >> 8) as u8,
            region.x as u8 & 0xF8,
            (x_end >> 8) as u8,
            x_end as u8 | 0x07,
            (region.y >> 8) as u8,
            region.y as u8,
            (y_end >> 8) as u8,
            y_end as u8,
            0x01,
        ],
    )
}

/// Streams the byte-aligned horizontal slice of each row in the window.
fn send_region_rows<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    buffer: &[u8],
    region: Rect,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    let row_bytes = PixelFormat::Mono.row_bytes(config.width);
    let cols = region.byte_cols();
    for y in region.y..=region.y_end() {
        let row = y as usize * row_bytes;
        io.data(spi, &buffer[row + cols.start()..=row + cols.end()])?;
    }
    Ok(())
}
