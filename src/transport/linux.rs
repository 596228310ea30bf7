//! A concrete [`crate::transport::Transport`] built on `/dev/i2c-*` via the
//! `i2cdev` crate: a register read is a write of the register byte
//! followed by a plain read of the reply, with a short settle delay
//! between the two.

use std::time::{SystemTime, UNIX_EPOCH};

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use crate::transport::Transport;

/// Gap the original driver waits between selecting a register and reading
/// it back, to give the bridge time to prepare its reply.
const REGISTER_SELECT_SETTLE_US: u64 = 1_000;

/// Talks to the LW14 bridge over a Linux `/dev/i2c-*` character device.
pub struct LinuxTransport {
    device: LinuxI2CDevice,
}

impl LinuxTransport {
    /// Opens `path` (e.g. `/dev/i2c-1`) and binds to 7-bit slave
    /// `address` (default `crate::status::LW14_DEFAULT_ADDRESS`).
    pub fn open(path: &str, address: u16) -> Result<Self, LinuxI2CError> {
        let device = LinuxI2CDevice::new(path, address)?;
        Ok(LinuxTransport { device })
    }
}

impl Transport for LinuxTransport {
    type Error = LinuxI2CError;

    fn read_register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.device.write(&[register])?;
        std::thread::sleep(std::time::Duration::from_micros(REGISTER_SELECT_SETTLE_US));
        self.device.read(buf)
    }

    fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut frame = [0u8; 3];
        frame[0] = register;
        frame[1..1 + data.len()].copy_from_slice(data);
        self.device.write(&frame[..1 + data.len()])
    }

    fn delay_microseconds(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }

    fn millis(&mut self) -> u32 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_millis() as u32
    }
}
