//! The init-sequence byte language and its interpreter.
//!
//! A sequence is a flat byte stream. Bytes below `0xF0` are controller
//! commands, each followed by a one-byte data count and that many data
//! bytes. Bytes at `0xF0` and above are sentinel opcodes for structured
//! actions the table cannot express as plain writes. `SEQ_END` terminates;
//! running out of bytes mid-element is a parameter error and nothing past
//! the truncation point is sent.

use std::sync::atomic::AtomicBool;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::trace;

use crate::config::ModelConfig;
use crate::error::{DriverError, DriverResult};
use crate::interface::{DisplayInterface, BUSY_TIMEOUT_MS};

/// Emit the cursor-reset commands (0x4E = 0, 0x4F = 0, 0).
pub const SEQ_SET_CURSOR: u8 = 0xF9;
/// Emit the X/Y window commands for the model's full extent.
pub const SEQ_SET_WINDOW: u8 = 0xFA;
/// Send 0x12 and wait for busy.
pub const SEQ_SW_RESET: u8 = 0xFB;
/// Execute the three-phase reset pin toggle.
pub const SEQ_HW_RESET: u8 = 0xFC;
/// Delay for the following byte's milliseconds.
pub const SEQ_DELAY_MS: u8 = 0xFD;
/// Terminate successfully.
pub const SEQ_END: u8 = 0xFE;
/// Poll the busy pin with the standard timeout.
pub const SEQ_WAIT_BUSY: u8 = 0xFF;

/// First sentinel value; everything below is a command byte.
pub const SEQ_SENTINEL_BASE: u8 = 0xF0;

/// Walks `seq` against the wire, threading the model's busy polarity,
/// reset timing and dimensions into the sentinel opcodes.
pub(crate) fn run_sequence<SPI, BUSY, DC, RST, DELAY>(
    io: &mut DisplayInterface<BUSY, DC, RST, DELAY>,
    spi: &mut SPI,
    config: &ModelConfig,
    seq: &[u8],
    cancel: &AtomicBool,
) -> DriverResult
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    let mut i = 0;
    while i < seq.len() {
        let op = seq[i];
        i += 1;
        match op {
            SEQ_END => return Ok(()),
            SEQ_WAIT_BUSY => {
                trace!("seq: wait busy");
                io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)?;
            }
            SEQ_DELAY_MS => {
                let ms = *seq
                    .get(i)
                    .ok_or(DriverError::Param("sequence truncated in delay"))?;
                i += 1;
                trace!("seq: delay {ms} ms");
                io.delay_ms(ms as u32);
            }
            SEQ_HW_RESET => {
                trace!("seq: hardware reset");
                io.reset(config.reset_ms);
            }
            SEQ_SW_RESET => {
                trace!("seq: software reset");
                io.cmd(spi, 0x12)?;
                io.wait_until_idle(config.busy, BUSY_TIMEOUT_MS, cancel)?;
            }
            SEQ_SET_WINDOW => {
                trace!("seq: set window {}x{}", config.width, config.height);
                let last_col = ((config.width - 1) / 8) as u8;
                io.cmd_with_data(spi, 0x44, &[0x00, last_col])?;
                let last_row = config.height - 1;
                io.cmd_with_data(
                    spi,
                    0x45,
                    &[0x00, 0x00, (last_row & 0xFF) as u8, (last_row >> 8) as u8],
                )?;
            }
            SEQ_SET_CURSOR => {
                trace!("seq: reset cursor");
                io.cmd_with_data(spi, 0x4E, &[0x00])?;
                io.cmd_with_data(spi, 0x4F, &[0x00, 0x00])?;
            }
            op if op >= SEQ_SENTINEL_BASE => {
                return Err(DriverError::Param("unknown sequence opcode"));
            }
            cmd => {
                let count = *seq
                    .get(i)
                    .ok_or(DriverError::Param("sequence truncated in data count"))?
                    as usize;
                i += 1;
                let data = seq
                    .get(i..i + count)
                    .ok_or(DriverError::Param("sequence truncated in data"))?;
                i += count;
                trace!("seq: cmd {cmd:#04x} with {count} data bytes");
                io.cmd_with_data(spi, cmd, data)?;
            }
        }
    }
    Err(DriverError::Param("sequence missing end marker"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusyPolarity, Capabilities, ControllerFamily};
    use crate::format::PixelFormat;
    use crate::mock::{BusOp, MockPins};

    fn test_config(seq: &'static [u8]) -> ModelConfig {
        ModelConfig {
            name: "test",
            width: 128,
            height: 296,
            format: PixelFormat::Mono,
            busy: BusyPolarity::High,
            reset_ms: [20, 2, 20],
            display_cmd: 0x24,
            display_cmd_2: 0,
            seq_full: seq,
            seq_fast: None,
            seq_partial: None,
            sleep_cmd: 0x10,
            sleep_data: &[0x01],
            caps: Capabilities::empty(),
            family: ControllerFamily::Generic,
        }
    }

    fn run(seq: &'static [u8]) -> (MockPins, DriverResult) {
        let mut pins = MockPins::new();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::High);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let config = test_config(seq);
        let cancel = AtomicBool::new(false);
        let result = run_sequence(&mut io, &mut spi, &config, seq, &cancel);
        (pins, result)
    }

    #[test]
    fn commands_data_delay_and_wait() {
        let seq: &[u8] = &[0x01, 0x03, 0x10, 0x20, 0x30, SEQ_DELAY_MS, 0x64, SEQ_WAIT_BUSY, SEQ_END];
        let (pins, result) = run(seq);
        result.unwrap();
        assert_eq!(
            pins.ops(),
            vec![
                BusOp::Command(0x01),
                BusOp::Data(0x10),
                BusOp::Data(0x20),
                BusOp::Data(0x30),
            ]
        );
        // 100 ms delay plus at most a couple of busy polls.
        assert!(pins.elapsed_ms() >= 100 && pins.elapsed_ms() < 110);
    }

    #[test]
    fn truncated_delay_is_a_param_error_with_no_side_effects() {
        let seq: &[u8] = &[0x01, 0x03, 0x10, 0x20, 0x30, SEQ_DELAY_MS];
        let (pins, result) = run(seq);
        assert_eq!(result, Err(DriverError::Param("sequence truncated in delay")));
        // Everything before the truncation went out, nothing after.
        assert_eq!(pins.ops().len(), 4);
        assert_eq!(pins.elapsed_ms(), 0);
    }

    #[test]
    fn truncated_data_stops_before_the_command() {
        let seq: &[u8] = &[0x01, 0x05, 0x10, 0x20, SEQ_END];
        let (pins, result) = run(seq);
        assert_eq!(result, Err(DriverError::Param("sequence truncated in data")));
        assert!(pins.ops().is_empty());
    }

    #[test]
    fn missing_end_marker_is_malformed() {
        let seq: &[u8] = &[0x01, 0x01, 0xAA];
        let (_, result) = run(seq);
        assert_eq!(
            result,
            Err(DriverError::Param("sequence missing end marker"))
        );
    }

    #[test]
    fn unknown_sentinel_is_rejected() {
        let seq: &[u8] = &[0xF0, SEQ_END];
        let (_, result) = run(seq);
        assert_eq!(result, Err(DriverError::Param("unknown sequence opcode")));
    }

    #[test]
    fn window_and_cursor_use_model_extent() {
        let seq: &[u8] = &[SEQ_SET_WINDOW, SEQ_SET_CURSOR, SEQ_END];
        let (pins, result) = run(seq);
        result.unwrap();
        // 128 wide: last byte column 15; 296 tall: 0x127.
        assert_eq!(
            pins.ops(),
            vec![
                BusOp::Command(0x44),
                BusOp::Data(0x00),
                BusOp::Data(0x0F),
                BusOp::Command(0x45),
                BusOp::Data(0x00),
                BusOp::Data(0x00),
                BusOp::Data(0x27),
                BusOp::Data(0x01),
                BusOp::Command(0x4E),
                BusOp::Data(0x00),
                BusOp::Command(0x4F),
                BusOp::Data(0x00),
                BusOp::Data(0x00),
            ]
        );
    }

    #[test]
    fn hw_and_sw_reset() {
        let seq: &[u8] = &[SEQ_HW_RESET, SEQ_SW_RESET, SEQ_END];
        let (pins, result) = run(seq);
        result.unwrap();
        assert_eq!(pins.rst_transitions(), vec![true, false, true]);
        assert_eq!(pins.commands(), vec![0x12]);
    }

    #[test]
    fn cancelled_wait_aborts_the_walk() {
        let seq: &[u8] = &[SEQ_WAIT_BUSY, 0x01, 0x00, SEQ_END];
        let mut pins = MockPins::new();
        pins.hold_busy();
        let (busy, dc, rst, delay) = pins.wire(BusyPolarity::High);
        let mut io = DisplayInterface::new(busy, dc, rst, delay);
        let mut spi = pins.spi();
        let config = test_config(seq);
        let cancel = AtomicBool::new(true);
        let result = run_sequence(&mut io, &mut spi, &config, seq, &cancel);
        assert_eq!(result, Err(DriverError::Timeout { cancelled: true }));
        assert!(pins.ops().is_empty());
    }

    #[test]
    fn reinit_is_idempotent() {
        let seq: &[u8] = &[SEQ_HW_RESET, 0x3C, 0x01, 0x80, SEQ_WAIT_BUSY, SEQ_END];
        let (pins, first) = run(seq);
        first.unwrap();
        let first_ops = pins.ops();
        let (pins, second) = run(seq);
        second.unwrap();
        assert_eq!(pins.ops(), first_ops);
    }
}
