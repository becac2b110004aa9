//! Device lifecycle and the refresh pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::debug;

use crate::config::{Capabilities, ModelConfig, RefreshMode};
use crate::drivers::{generic_display, generic_init, generic_sleep, Driver};
use crate::error::{DriverError, DriverResult, Error, Result};
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;
use crate::interface::DisplayInterface;
use crate::models;
use crate::rect::Rect;
use crate::surface::Surface;

/// A cloneable handle that can abort a refresh from another thread.
///
/// The flag is observed between busy polls, so cancellation lands within
/// one polling interval; the refresh then surfaces as a cancelled
/// [`Error::BusyTimeout`]. The device stays open and usable.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Closed,
    Open,
}

/// One physical panel: its wiring, its model configuration and the driver
/// wired for its controller family.
///
/// The SPI bus is passed into each operation so it can be shared;
/// everything else is owned. Operations take `&mut self`, so one device
/// cannot interleave two refreshes.
#[derive(Debug)]
pub struct Device<SPI, BUSY, DC, RST, DELAY> {
    driver: Driver<SPI, BUSY, DC, RST, DELAY>,
    interface: DisplayInterface<BUSY, DC, RST, DELAY>,
    state: DeviceState,
    mode: RefreshMode,
    cancel: Arc<AtomicBool>,
}

impl<SPI, BUSY, DC, RST, DELAY> Device<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Binds a model by name. Fails with `NotFound` (including near-miss
    /// suggestions) for unknown names; the hardware is not touched until
    /// [`open`](Device::open).
    pub fn new(model: &str, busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Result<Self> {
        let config = models::lookup(model)?;
        Ok(Self::from_config(config, busy, dc, rst, delay))
    }

    /// Binds an explicit configuration, bypassing the name lookup.
    pub fn from_config(
        config: &'static ModelConfig,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
    ) -> Self {
        Device {
            driver: Driver::for_model(config),
            interface: DisplayInterface::new(busy, dc, rst, delay),
            state: DeviceState::Closed,
            mode: RefreshMode::Full,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &'static ModelConfig {
        self.driver.config()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.config().caps
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DeviceState::Open
    }

    /// A handle for aborting in-flight refreshes from other threads.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.cancel.clone())
    }

    /// Initializes the panel for full refreshes. Re-opening an open device
    /// is a no-op.
    pub fn open(&mut self, spi: &mut SPI) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        debug!("opening {}", self.config().name);
        self.run_init(spi, RefreshMode::Full)
            .map_err(DriverError::into_init_error)?;
        self.state = DeviceState::Open;
        Ok(())
    }

    /// Puts the panel to sleep and releases it. Closing a closed device is
    /// a no-op.
    pub fn close(&mut self, spi: &mut SPI) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        debug!("closing {}", self.config().name);
        let config = self.config();
        generic_sleep(&mut self.interface, spi, config)
            .map_err(DriverError::into_display_error)?;
        self.state = DeviceState::Closed;
        Ok(())
    }

    /// Re-initializes into another refresh mode. Fast and partial modes
    /// require the matching capability.
    pub fn init(&mut self, spi: &mut SPI, mode: RefreshMode) -> Result<()> {
        self.ensure_open()?;
        let required = match mode {
            RefreshMode::Full => None,
            RefreshMode::Fast => Some(Capabilities::FAST),
            RefreshMode::Partial => Some(Capabilities::PARTIAL),
        };
        if let Some(required) = required {
            if !self.config().caps.contains(required) {
                return Err(Error::invalid(format!(
                    "{} does not support {mode:?} refresh",
                    self.config().name
                )));
            }
        }
        self.run_init(spi, mode).map_err(DriverError::into_init_error)
    }

    /// Sends the panel to deep sleep without closing it; any display
    /// operation after [`wake`](Device::wake) works again.
    pub fn sleep(&mut self, spi: &mut SPI) -> Result<()> {
        self.ensure_open()?;
        let config = self.config();
        generic_sleep(&mut self.interface, spi, config)
            .map_err(DriverError::into_display_error)
    }

    /// Wakes from deep sleep by re-running the current mode's init.
    pub fn wake(&mut self, spi: &mut SPI) -> Result<()> {
        self.ensure_open()?;
        self.run_init(spi, self.mode)
            .map_err(DriverError::into_init_error)
    }

    /// Transmits a full frame and refreshes the panel.
    ///
    /// Two-plane models accept the black plane here; the chromatic plane
    /// is blanked (or derived, where the controller wants an inverted
    /// copy).
    pub fn display(&mut self, spi: &mut SPI, frame: &Framebuffer) -> Result<()> {
        self.ensure_open()?;
        self.validate_plane(frame)?;
        self.run_display(spi, frame.bytes(), None)
    }

    /// Transmits black and chromatic planes and refreshes. Only valid on
    /// dual-buffer models.
    pub fn display_dual(
        &mut self,
        spi: &mut SPI,
        black: &Framebuffer,
        chromatic: &Framebuffer,
    ) -> Result<()> {
        self.ensure_open()?;
        if !self.config().dual_plane() {
            return Err(Error::invalid(format!(
                "{} takes a single buffer",
                self.config().name
            )));
        }
        self.validate_plane(black)?;
        self.validate_plane(chromatic)?;
        self.run_display(spi, black.bytes(), Some(chromatic.bytes()))
    }

    /// Refreshes only `region`, clipped to the panel. The frame is still
    /// the full-panel buffer; controllers take byte-aligned windows out of
    /// it. Only valid on models with regional support.
    pub fn display_region(&mut self, spi: &mut SPI, frame: &Framebuffer, region: Rect) -> Result<()> {
        self.ensure_open()?;
        let Some(body) = self.driver.custom_display_region else {
            return Err(Error::invalid(format!(
                "{} does not support regional refresh",
                self.config().name
            )));
        };
        self.validate_plane(frame)?;
        let Some(region) = region.clipped_to(self.config().width, self.config().height) else {
            return Ok(());
        };
        self.cancel.store(false, Ordering::Release);
        debug!("regional refresh on {}: {:?}", self.config().name, region);
        let config = self.driver.config();
        let result = body(&mut self.interface, spi, config, frame.bytes(), region, &self.cancel)
            .and_then(|()| match self.driver.post_display_region {
                Some(post) => post(&mut self.interface, spi, config, self.mode, &self.cancel),
                None => Ok(()),
            });
        result.map_err(DriverError::into_display_error)
    }

    /// Whole-screen wipe to white, without needing a framebuffer.
    pub fn clear(&mut self, spi: &mut SPI) -> Result<()> {
        self.ensure_open()?;
        let config = self.config();
        if config.dual_plane() {
            let plane = vec![0xFF; config.plane_len()];
            self.run_display(spi, &plane, Some(&plane))
        } else {
            let fill = vec![config.format.white_fill(); config.frame_len()];
            self.run_display(spi, &fill, None)
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::Device(format!(
                "{} is not open",
                self.config().name
            )))
        }
    }

    /// A frame headed for the wire: must match the panel extent and the
    /// wire format (mono planes on dual-buffer models).
    fn validate_plane(&self, frame: &Framebuffer) -> Result<()> {
        let config = self.config();
        let expected = if config.dual_plane() {
            PixelFormat::Mono
        } else {
            config.format
        };
        if frame.format() != expected {
            return Err(Error::FormatMismatch {
                expected,
                found: frame.format(),
            });
        }
        if frame.width() != config.width || frame.height() != config.height {
            return Err(Error::invalid(format!(
                "framebuffer is {}x{}, {} is {}x{}",
                frame.width(),
                frame.height(),
                config.name,
                config.width,
                config.height
            )));
        }
        Ok(())
    }

    fn run_init(&mut self, spi: &mut SPI, mode: RefreshMode) -> DriverResult {
        self.cancel.store(false, Ordering::Release);
        let config = self.driver.config();
        let result = match self.driver.custom_init {
            Some(init) => init(&mut self.interface, spi, config, mode, &self.cancel),
            None => generic_init(&mut self.interface, spi, config, mode, &self.cancel),
        };
        if result.is_ok() {
            self.mode = mode;
        }
        result
    }

    /// The refresh pipeline: reset the cancel flag, pre hook, body, post
    /// hook. The first failure short-circuits and is translated to a typed
    /// error; after a timeout or cancellation the device stays open.
    fn run_display(&mut self, spi: &mut SPI, primary: &[u8], secondary: Option<&[u8]>) -> Result<()> {
        self.cancel.store(false, Ordering::Release);
        let config = self.driver.config();
        debug!("refresh on {} ({:?})", config.name, self.mode);
        let result = (|| -> DriverResult {
            if let Some(pre) = self.driver.pre_display {
                pre(&mut self.interface, spi, config, self.mode, &self.cancel)?;
            }
            match self.driver.custom_display {
                Some(body) => {
                    body(&mut self.interface, spi, config, primary, secondary, &self.cancel)?
                }
                None => generic_display(
                    &mut self.interface,
                    spi,
                    config,
                    primary,
                    secondary,
                    &self.cancel,
                )?,
            }
            if let Some(post) = self.driver.post_display {
                post(&mut self.interface, spi, config, self.mode, &self.cancel)?;
            }
            Ok(())
        })();
        debug!("refresh on {} finished: {result:?}", config.name);
        result.map_err(DriverError::into_display_error)
    }
}
