//! The physical connection between the host and the display controller.

use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::warn;

use crate::config::BusyPolarity;
use crate::error::{DriverError, DriverResult};

/// Ceiling for a single busy wait.
pub(crate) const BUSY_TIMEOUT_MS: u32 = 5000;

/// The wiring every supported panel shares: SPI plus BUSY/DC/RST lines and
/// a delay source. Chip select is the SPI device's business.
///
/// SPI itself is passed into each call so the bus can be shared between
/// refreshes.
#[derive(Debug)]
pub struct DisplayInterface<BUSY, DC, RST, DELAY> {
    /// Held by the controller while it processes; polarity per model.
    busy: BUSY,
    /// Data/command control (high for data, low for commands).
    dc: DC,
    /// Active-low hardware reset.
    rst: RST,
    delay: DELAY,
}

impl<BUSY, DC, RST, DELAY> DisplayInterface<BUSY, DC, RST, DELAY>
where
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            busy,
            dc,
            rst,
            delay,
        }
    }

    /// Sends a command byte (DC low).
    pub(crate) fn cmd<SPI: SpiDevice>(&mut self, spi: &mut SPI, command: u8) -> DriverResult {
        self.dc.set_low().map_err(gpio_err)?;
        self.write(spi, &[command])
    }

    /// Sends data bytes (DC high).
    pub(crate) fn data<SPI: SpiDevice>(&mut self, spi: &mut SPI, data: &[u8]) -> DriverResult {
        self.dc.set_high().map_err(gpio_err)?;
        self.write(spi, data)
    }

    pub(crate) fn cmd_with_data<SPI: SpiDevice>(
        &mut self,
        spi: &mut SPI,
        command: u8,
        data: &[u8],
    ) -> DriverResult {
        self.cmd(spi, command)?;
        if !data.is_empty() {
            self.data(spi, data)?;
        }
        Ok(())
    }

    /// Sends the same data byte `repetitions` times; used by whole-screen
    /// fills that have no backing buffer.
    pub(crate) fn data_x_times<SPI: SpiDevice>(
        &mut self,
        spi: &mut SPI,
        val: u8,
        repetitions: u32,
    ) -> DriverResult {
        self.dc.set_high().map_err(gpio_err)?;
        let chunk = [val; 256];
        let mut left = repetitions as usize;
        while left > 0 {
            let n = left.min(chunk.len());
            self.write(spi, &chunk[..n])?;
            left -= n;
        }
        Ok(())
    }

    fn write<SPI: SpiDevice>(&mut self, spi: &mut SPI, data: &[u8]) -> DriverResult {
        // Linux caps a single spidev transfer at 4096 bytes.
        if cfg!(target_os = "linux") {
            for chunk in data.chunks(4096) {
                spi.write(chunk).map_err(spi_err)?;
            }
            Ok(())
        } else {
            spi.write(data).map_err(spi_err)
        }
    }

    /// Three-phase hardware reset: settle high, pulse low, settle high.
    /// Timing differs per model; the low pulse is 2 ms on some controllers
    /// and 10 ms on most.
    pub(crate) fn reset(&mut self, timing_ms: [u16; 3]) {
        let _ = self.rst.set_high();
        self.delay.delay_ms(timing_ms[0] as u32);
        let _ = self.rst.set_low();
        self.delay.delay_ms(timing_ms[1] as u32);
        let _ = self.rst.set_high();
        self.delay.delay_ms(timing_ms[2] as u32);
    }

    /// Polls the busy pin in 1 ms steps until the controller is idle.
    ///
    /// The cancel flag is observed before every pin read, so an external
    /// cancellation lands within one polling interval. Both cancellation
    /// and the `timeout_ms` ceiling surface as a timeout.
    pub(crate) fn wait_until_idle(
        &mut self,
        polarity: BusyPolarity,
        timeout_ms: u32,
        cancel: &AtomicBool,
    ) -> DriverResult {
        for _ in 0..=timeout_ms {
            if cancel.load(Ordering::Acquire) {
                warn!("busy wait cancelled");
                return Err(DriverError::Timeout { cancelled: true });
            }
            let level_high = self.busy.is_high().map_err(gpio_err)?;
            let busy = match polarity {
                BusyPolarity::High => level_high,
                BusyPolarity::Low => !level_high,
            };
            if !busy {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        warn!("busy wait timed out after {timeout_ms} ms");
        Err(DriverError::Timeout { cancelled: false })
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

fn spi_err<E: core::fmt::Debug>(e: E) -> DriverError {
    DriverError::Io(format!("spi: {e:?}"))
}

fn gpio_err<E: core::fmt::Debug>(e: E) -> DriverError {
    DriverError::Io(format!("gpio: {e:?}"))
}
