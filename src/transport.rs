//! The L0 transport contract: byte-level register access on a fixed 7-bit
//! I²C slave, plus a monotonic millisecond clock and a microsecond delay.
//!
//! Everything above this layer — the transaction engine, the DALI command
//! codec, commissioning — is generic over [`Transport`] and never touches
//! an I²C bus, a microcontroller peripheral or a host ioctl directly: the
//! hiding happens behind a trait, since the underlying transport is
//! swapped out entirely (Linux `/dev/i2c-*`, a microcontroller I2C
//! peripheral, or a mock in tests).

/// Four operations are all the core ever needs from a transport.
///
/// Implementors talk to one fixed I²C slave address (the LW14 bridge,
/// default `0x23`); `register` is one of the LW14 register map addresses
/// in `crate::engine` (`STATUS`, `COMMAND`, ...).
pub trait Transport {
    /// Transport-level error type, opaque to the core beyond "it failed".
    type Error;

    /// Reads `buf.len()` bytes starting at `register`.
    fn read_register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` starting at `register`.
    fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Blocks the calling context for approximately `us` microseconds.
    fn delay_microseconds(&mut self, us: u32);

    /// Returns a monotonically increasing millisecond timestamp. The epoch
    /// is unspecified; only differences between two calls are meaningful.
    fn millis(&mut self) -> u32;
}

#[cfg(any(test, feature = "std"))]
pub use mock::MockTransport;

#[cfg(feature = "cli")]
pub mod linux;

#[cfg(feature = "cli")]
pub use linux::LinuxTransport;

#[cfg(any(test, feature = "std"))]
mod mock {
    use super::Transport;
    use std::vec::Vec;

    /// A scriptable transport for tests: it replays a queue of
    /// status-register bytes so that a test can script an entire
    /// multi-poll Phase A/D sequence, and records every command-register
    /// write for the test to assert against.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        /// Bytes returned in order for successive reads of the status
        /// register (`0x00`). Exhausted reads repeat the last entry.
        pub status_sequence: Vec<u8>,
        next_status: usize,
        /// Byte returned when the command register (`0x01`) is read.
        pub reply_byte: u8,
        /// Millisecond clock, advanced explicitly by tests via `advance_ms`.
        pub clock_ms: u32,
        /// Every `(register, data)` pair written, in order.
        pub writes: Vec<(u8, Vec<u8>)>,
        /// Every microsecond delay requested, in order.
        pub delays: Vec<u32>,
        /// Total microseconds advanced on the clock by `delay_microseconds`.
        pub advance_clock_on_delay: bool,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn advance_ms(&mut self, ms: u32) {
            self.clock_ms = self.clock_ms.wrapping_add(ms);
        }
    }

    impl Transport for MockTransport {
        type Error = ();

        fn read_register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
            match register {
                0x00 => {
                    let byte = self
                        .status_sequence
                        .get(self.next_status)
                        .copied()
                        .or_else(|| self.status_sequence.last().copied())
                        .unwrap_or(0);
                    if self.next_status < self.status_sequence.len() {
                        self.next_status += 1;
                    }
                    for slot in buf.iter_mut() {
                        *slot = byte;
                    }
                    Ok(())
                }
                0x01 => {
                    for slot in buf.iter_mut() {
                        *slot = self.reply_byte;
                    }
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.writes.push((register, data.to_vec()));
            Ok(())
        }

        fn delay_microseconds(&mut self, us: u32) {
            self.delays.push(us);
            if self.advance_clock_on_delay {
                self.advance_ms(us / 1000);
            }
        }

        fn millis(&mut self) -> u32 {
            self.clock_ms
        }
    }
}
