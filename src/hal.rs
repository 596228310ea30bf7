//! Bridges [`crate::transport::Transport`] onto `embedded-hal` 1.0's
//! [`embedded_hal::i2c::I2c`] and [`embedded_hal::delay::DelayNs`] traits:
//! an arbitrary `embedded-hal` I2C peripheral gains our `Transport` impl,
//! so firmware built on any HAL can drive this crate.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::transport::Transport;

/// Assumed floor latency of one register access, used only to advance the
/// clock `Transport::millis` exposes so that `LW14Adapter`'s Phase D
/// timeout can still fire on hardware with no independent tick source.
const REGISTER_ACCESS_LATENCY_US: u32 = 200;

/// Wraps an `embedded-hal` I2C peripheral and delay provider as a
/// [`Transport`] talking to one fixed 7-bit slave address.
pub struct EmbeddedHalTransport<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    millis: u32,
}

impl<I, D> EmbeddedHalTransport<I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// `address` is the LW14 bridge's 7-bit I2C slave address (default
    /// `crate::status::LW14_DEFAULT_ADDRESS`).
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        EmbeddedHalTransport {
            i2c,
            delay,
            address,
            millis: 0,
        }
    }

    /// Releases the wrapped peripheral and delay provider.
    pub fn into_parts(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}

impl<I, D> Transport for EmbeddedHalTransport<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn read_register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let result = self.i2c.write_read(self.address, &[register], buf);
        // The engine's completion poll never sleeps between reads, so the
        // clock used for its timeout has to advance on its own here;
        // approximate with the transaction's own floor latency.
        self.delay.delay_us(REGISTER_ACCESS_LATENCY_US);
        self.millis = self
            .millis
            .wrapping_add(REGISTER_ACCESS_LATENCY_US / 1000 + 1);
        result
    }

    fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        // The LW14 bridge expects one write transaction of `register`
        // followed immediately by `data`, not two separate transactions.
        let mut frame = [0u8; 3];
        frame[0] = register;
        frame[1..1 + data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &frame[..1 + data.len()])
    }

    fn delay_microseconds(&mut self, us: u32) {
        self.delay.delay_us(us);
        self.millis = self.millis.wrapping_add(us / 1000);
    }

    fn millis(&mut self) -> u32 {
        self.millis
    }
}
