//! A recording mock HAL for host development and tests.
//!
//! The pins and SPI device handed out by [`MockPins`] share one bus state,
//! so SPI writes are recorded as commands or data according to the DC
//! level at the time of the transfer. The BUSY pin alternates on every
//! read unless held, which lets busy waits of either polarity resolve
//! within the timeout. All state is owned per [`MockPins`] instance; two
//! mock devices never interfere.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};

use crate::config::BusyPolarity;

/// One recorded bus transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    /// A byte written while DC was low.
    Command(u8),
    /// A byte written while DC was high.
    Data(u8),
}

#[derive(Debug, Default)]
struct BusState {
    ops: Vec<BusOp>,
    dc_high: bool,
    rst_transitions: Vec<bool>,
    elapsed_ns: u64,
    busy_level: bool,
    busy_held: bool,
}

/// Factory for one mock device's pins, SPI and delay source.
#[derive(Debug, Default)]
pub struct MockPins {
    state: Rc<RefCell<BusState>>,
}

impl MockPins {
    pub fn new() -> Self {
        MockPins::default()
    }

    /// The BUSY, DC, RST and delay peripherals, all sharing this
    /// instance's state. The BUSY pin starts at the busy level for
    /// `polarity` so a wait observes at least one busy poll.
    pub fn wire(
        &mut self,
        polarity: BusyPolarity,
    ) -> (MockBusyPin, MockOutputPin, MockOutputPin, MockDelay) {
        self.state.borrow_mut().busy_level = matches!(polarity, BusyPolarity::High);
        (
            MockBusyPin {
                state: self.state.clone(),
            },
            MockOutputPin {
                state: self.state.clone(),
                is_dc: true,
            },
            MockOutputPin {
                state: self.state.clone(),
                is_dc: false,
            },
            MockDelay {
                state: self.state.clone(),
            },
        )
    }

    pub fn spi(&self) -> MockSpi {
        MockSpi {
            state: self.state.clone(),
        }
    }

    /// Freezes the BUSY pin at logic high, so high-polarity waits starve.
    pub fn hold_busy(&mut self) {
        let mut state = self.state.borrow_mut();
        state.busy_level = true;
        state.busy_held = true;
    }

    /// Everything written over SPI so far.
    pub fn ops(&self) -> Vec<BusOp> {
        self.state.borrow().ops.clone()
    }

    /// Command bytes only, in order.
    pub fn commands(&self) -> Vec<u8> {
        self.state
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Command(b) => Some(*b),
                BusOp::Data(_) => None,
            })
            .collect()
    }

    /// Reset pin levels in the order they were set.
    pub fn rst_transitions(&self) -> Vec<bool> {
        self.state.borrow().rst_transitions.clone()
    }

    /// Total simulated delay in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.state.borrow().elapsed_ns / 1_000_000
    }

    /// Drops the recording so a test can focus on what follows.
    pub fn clear_ops(&mut self) {
        self.state.borrow_mut().ops.clear();
    }
}

/// The BUSY input; alternates on each read unless held.
#[derive(Debug)]
pub struct MockBusyPin {
    state: Rc<RefCell<BusState>>,
}

impl PinErrorType for MockBusyPin {
    type Error = Infallible;
}

impl InputPin for MockBusyPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let mut state = self.state.borrow_mut();
        let level = state.busy_level;
        if !state.busy_held {
            state.busy_level = !level;
        }
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

/// DC or RST output.
#[derive(Debug)]
pub struct MockOutputPin {
    state: Rc<RefCell<BusState>>,
    is_dc: bool,
}

impl PinErrorType for MockOutputPin {
    type Error = Infallible;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let mut state = self.state.borrow_mut();
        if self.is_dc {
            state.dc_high = false;
        } else {
            state.rst_transitions.push(false);
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut state = self.state.borrow_mut();
        if self.is_dc {
            state.dc_high = true;
        } else {
            state.rst_transitions.push(true);
        }
        Ok(())
    }
}

/// Records written bytes as commands or data by the current DC level.
#[derive(Debug)]
pub struct MockSpi {
    state: Rc<RefCell<BusState>>,
}

impl SpiErrorType for MockSpi {
    type Error = Infallible;
}

impl SpiDevice<u8> for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut state = self.state.borrow_mut();
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let dc_high = state.dc_high;
                    state.ops.extend(bytes.iter().map(|&b| {
                        if dc_high {
                            BusOp::Data(b)
                        } else {
                            BusOp::Command(b)
                        }
                    }));
                }
                Operation::Read(buf) | Operation::TransferInPlace(buf) => {
                    buf.fill(0);
                }
                Operation::Transfer(read, _) => {
                    read.fill(0);
                }
                Operation::DelayNs(ns) => {
                    state.elapsed_ns += *ns as u64;
                }
            }
        }
        Ok(())
    }
}

/// Accumulates requested delays instead of sleeping.
#[derive(Debug)]
pub struct MockDelay {
    state: Rc<RefCell<BusState>>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().elapsed_ns += ns as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_pin_alternates_per_instance() {
        let mut a = MockPins::new();
        let mut b = MockPins::new();
        let (mut busy_a, _, _, _) = a.wire(BusyPolarity::High);
        let (mut busy_b, _, _, _) = b.wire(BusyPolarity::High);
        assert!(busy_a.is_high().unwrap());
        // Toggling one device's pin leaves the other untouched.
        assert!(busy_b.is_high().unwrap());
        assert!(!busy_a.is_high().unwrap());
    }

    #[test]
    fn writes_split_by_dc_level() {
        let mut pins = MockPins::new();
        let (_, mut dc, _, _) = pins.wire(BusyPolarity::High);
        let mut spi = pins.spi();
        dc.set_low().unwrap();
        spi.write(&[0x12]).unwrap();
        dc.set_high().unwrap();
        spi.write(&[0x34]).unwrap();
        assert_eq!(pins.ops(), vec![BusOp::Command(0x12), BusOp::Data(0x34)]);
    }

    #[test]
    fn delay_accumulates() {
        let mut pins = MockPins::new();
        let (_, _, _, mut delay) = pins.wire(BusyPolarity::High);
        delay.delay_ms(41);
        delay.delay_us(1000);
        assert_eq!(pins.elapsed_ms(), 42);
    }
}
