//! End-to-end: draw, quantize, transmit through the mock HAL.

use epd_host::mock::{BusOp, MockPins};
use epd_host::prelude::*;

#[test]
fn drawn_content_reaches_the_wire() {
    let config = epd_host::models::lookup("epd2in13_v4").unwrap();
    let mut canvas = Canvas::new(config.width, config.height, NamedColor::White.color()).unwrap();
    canvas
        .draw_rect(4, 4, 40, 20, Some(NamedColor::Black.color()), None, 1)
        .draw_circle(60, 120, 16, None, Some(NamedColor::Black.color()), 1);

    let renderer = Renderer::new(PixelFormat::Mono, Dither::Threshold);
    let frame = renderer.render(&canvas).unwrap();

    let mut pins = MockPins::new();
    let (busy, dc, rst, delay) = pins.wire(config.busy);
    let mut device = Device::from_config(config, busy, dc, rst, delay);
    let mut spi = pins.spi();
    device.open(&mut spi).unwrap();
    pins.clear_ops();
    device.display(&mut spi, &frame).unwrap();

    let sent: Vec<u8> = pins
        .ops()
        .iter()
        .skip_while(|op| **op != BusOp::Command(0x24))
        .skip(1)
        .take_while(|op| matches!(op, BusOp::Data(_)))
        .map(|op| match op {
            BusOp::Data(b) => *b,
            BusOp::Command(_) => unreachable!(),
        })
        .collect();
    assert_eq!(sent, frame.bytes());
    // The drawn rectangle must survive into the packed bytes: its top-left
    // corner pixel is black.
    assert_eq!(frame.get_pixel(4, 4), Some(NamedColor::Black));
}

#[test]
fn tri_color_render_feeds_dual_buffers() {
    let config = epd_host::models::lookup("epd2in13bc").unwrap();
    let mut canvas = Canvas::new(config.width, config.height, NamedColor::White.color()).unwrap();
    canvas.draw_rect(0, 0, 50, 50, None, Some(NamedColor::Red.color()), 1);
    canvas.draw_rect(0, 100, 50, 50, None, Some(NamedColor::Black.color()), 1);

    let renderer = Renderer::new(PixelFormat::Color4, Dither::Threshold);
    let (black, red) = renderer.render_dual(&canvas).unwrap();

    let mut pins = MockPins::new();
    let (busy, dc, rst, delay) = pins.wire(config.busy);
    let mut device = Device::from_config(config, busy, dc, rst, delay);
    let mut spi = pins.spi();
    device.open(&mut spi).unwrap();
    pins.clear_ops();
    device.display_dual(&mut spi, &black, &red).unwrap();

    // Black plane behind 0x10, chromatic plane behind 0x13, then the
    // UC8176 refresh kick.
    let cmds = pins.commands();
    assert_eq!(cmds, vec![0x10, 0x13, 0x12]);
    // The red square is marked (bit low) in the chromatic plane only.
    assert_eq!(red.get_pixel(10, 10), Some(NamedColor::Black));
    assert_eq!(black.get_pixel(10, 10), Some(NamedColor::White));
    // The black square is marked in the achromatic plane only.
    assert_eq!(black.get_pixel(10, 110), Some(NamedColor::Black));
    assert_eq!(red.get_pixel(10, 110), Some(NamedColor::White));
}

#[test]
fn stuck_refresh_times_out_and_the_device_survives() {
    let config = epd_host::models::lookup("epd5in65f").unwrap();
    let mut pins = MockPins::new();
    let (busy, dc, rst, delay) = pins.wire(config.busy);
    let mut device = Device::from_config(config, busy, dc, rst, delay);
    let mut spi = pins.spi();
    device.open(&mut spi).unwrap();

    // Jam the pin high. This panel is busy-low, so the power-on and
    // refresh waits still pass, but the power-off wait watches the
    // opposite polarity and starves.
    pins.hold_busy();
    let handle = device.cancel_handle();
    let canvas = Canvas::new(config.width, config.height, NamedColor::White.color()).unwrap();
    let frame = Renderer::new(PixelFormat::Color7, Dither::Threshold)
        .render(&canvas)
        .unwrap();
    // A cancellation left over from before the call is cleared on entry,
    // so the outcome is a plain timeout, not a cancelled one.
    handle.cancel();
    let err = device.display(&mut spi, &frame).unwrap_err();
    assert!(matches!(
        err,
        epd_host::Error::BusyTimeout { cancelled: false }
    ));
    assert!(device.is_open());
    assert!(!handle.is_cancelled());
}
