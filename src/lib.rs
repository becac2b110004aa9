//! Host-side rendering and SPI driver runtime for Waveshare ePaper
//! displays.
//!
//! The crate is three layers:
//!
//! 1. A drawing engine: an RGBA [`Canvas`] with shared [`Draw`]/
//!    [`DrawText`](text::DrawText) primitives, clipped [`Layer`] views and
//!    bit-packed [`Framebuffer`]s in the controllers' native formats.
//! 2. A quantization pipeline: [`Renderer`] maps canvases onto a panel's
//!    [`Palette`](palette::Palette) with threshold, ordered (Bayer) or
//!    Floyd-Steinberg [`Dither`] strategies, including the dual-plane
//!    split for black/white/red panels.
//! 3. A driver runtime: a static [model table](models) interpreted by a
//!    small init-sequence language, per-controller-family refresh
//!    overrides, and a [`Device`] that owns the busy-wait/cancellation
//!    contract over `embedded-hal` SPI and GPIO.
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//!
//! # Example
//!
//! ```no_run
//! # fn run<SPI, BUSY, DC, RST, DELAY>(mut spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY)
//! # -> epd_host::Result<()>
//! # where
//! #     SPI: embedded_hal::spi::SpiDevice,
//! #     BUSY: embedded_hal::digital::InputPin,
//! #     DC: embedded_hal::digital::OutputPin,
//! #     RST: embedded_hal::digital::OutputPin,
//! #     DELAY: embedded_hal::delay::DelayNs,
//! # {
//! use epd_host::prelude::*;
//!
//! let mut canvas = Canvas::new(800, 480, NamedColor::White.color())?;
//! canvas
//!     .draw_rect(40, 40, 200, 120, Some(NamedColor::Black.color()), None, 2)
//!     .draw_circle(400, 240, 80, None, Some(NamedColor::Black.color()), 1);
//!
//! let renderer = Renderer::new(PixelFormat::Mono, Dither::FloydSteinberg);
//! let frame = renderer.render(&canvas)?;
//!
//! let mut device = Device::new("epd7in5_v2", busy, dc, rst, delay)?;
//! device.open(&mut spi)?;
//! device.display(&mut spi, &frame)?;
//! device.close(&mut spi)?;
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod color;
pub mod config;
pub mod device;
pub mod dither;
pub mod drawing;
pub mod drivers;
pub mod error;
pub mod format;
pub mod framebuffer;
mod interface;
pub mod layer;
pub mod mock;
pub mod models;
pub mod palette;
pub mod rect;
pub mod render;
mod sequence;
pub mod surface;
pub mod text;

#[cfg(any(feature = "truetype", feature = "image"))]
pub mod host;

pub use canvas::Canvas;
pub use color::{Color, NamedColor};
pub use config::{BusyPolarity, Capabilities, ModelConfig, RefreshMode};
pub use device::{CancelHandle, Device, DeviceState};
pub use dither::Dither;
pub use drawing::Draw;
pub use error::{Error, Result};
pub use format::PixelFormat;
pub use framebuffer::Framebuffer;
pub use layer::Layer;
pub use rect::Rect;
pub use render::Renderer;
pub use sequence::{
    SEQ_DELAY_MS, SEQ_END, SEQ_HW_RESET, SEQ_SET_CURSOR, SEQ_SET_WINDOW, SEQ_SW_RESET,
    SEQ_WAIT_BUSY,
};
pub use surface::Surface;

pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::color::{Color, NamedColor};
    pub use crate::config::RefreshMode;
    pub use crate::device::Device;
    pub use crate::dither::Dither;
    pub use crate::drawing::Draw;
    pub use crate::format::PixelFormat;
    pub use crate::framebuffer::Framebuffer;
    pub use crate::layer::Layer;
    pub use crate::render::Renderer;
    pub use crate::surface::Surface;
    pub use crate::text::{Align, DrawText, TextStyle};
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
